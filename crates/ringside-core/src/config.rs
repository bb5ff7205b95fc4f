//! Configuration loading and typed config structures for Ringside.
//!
//! The configuration lives in `ringside-config.yaml` in the working
//! directory. Every field has a default, so a missing file or an empty
//! document yields a usable configuration.

use std::path::Path;

use serde::Deserialize;

use crate::buffer::DEFAULT_INPUT_DELAY;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but holds an unusable value.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
///
/// Mirrors the structure of `ringside-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RingsideConfig {
    /// Agent controller settings.
    #[serde(default)]
    pub controller: ControllerConfig,

    /// Match driver settings.
    #[serde(default, rename = "match")]
    pub match_settings: MatchConfig,

    /// Stage and fighter constants for the dry-run driver.
    #[serde(default)]
    pub stage: StageConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RingsideConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `RINGSIDE_LOG` overrides `logging.level` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.logging.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.controller.input_delay_frames == 0 {
            return Err(ConfigError::Invalid {
                reason: "controller.input_delay_frames must be at least 1".to_owned(),
            });
        }
        if self.match_settings.rounds == 0 {
            return Err(ConfigError::Invalid {
                reason: "match.rounds must be at least 1".to_owned(),
            });
        }
        if self.match_settings.frames_per_round == 0 {
            return Err(ConfigError::Invalid {
                reason: "match.frames_per_round must be at least 1".to_owned(),
            });
        }
        Ok(())
    }
}

/// Agent controller configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ControllerConfig {
    /// Capacity of the snapshot buffer: how many ticks old the snapshot an
    /// agent decides on is.
    #[serde(default = "default_input_delay_frames")]
    pub input_delay_frames: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            input_delay_frames: default_input_delay_frames(),
        }
    }
}

/// Which demo policy drives a side in the dry-run driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// Always neutral.
    #[default]
    Idle,
    /// Cycles through `match.script`.
    Scripted,
    /// Picks a random action each time the queue drains.
    Random,
}

/// Match driver configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MatchConfig {
    /// Number of rounds to play.
    #[serde(default = "default_rounds")]
    pub rounds: u32,

    /// Ticks per round.
    #[serde(default = "default_frames_per_round")]
    pub frames_per_round: u32,

    /// Seed for the random policy.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Policy driving player one.
    #[serde(default = "default_p1_policy")]
    pub p1_policy: PolicyKind,

    /// Policy driving player two.
    #[serde(default)]
    pub p2_policy: PolicyKind,

    /// Action names (or literal notation) cycled by the scripted policy.
    #[serde(default = "default_script")]
    pub script: Vec<String>,

    /// How long the driver waits for both controllers before re-checking
    /// for a stop request. This is a polling interval, not a decision
    /// deadline: the driver keeps waiting after it elapses.
    #[serde(default = "default_collect_timeout_ms")]
    pub collect_timeout_ms: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            rounds: default_rounds(),
            frames_per_round: default_frames_per_round(),
            seed: default_seed(),
            p1_policy: default_p1_policy(),
            p2_policy: PolicyKind::default(),
            script: default_script(),
            collect_timeout_ms: default_collect_timeout_ms(),
        }
    }
}

/// Stage and fighter constants.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StageConfig {
    /// Stage width in pixels.
    #[serde(default = "default_stage_width")]
    pub width: u32,

    /// Stage height in pixels.
    #[serde(default = "default_stage_height")]
    pub height: u32,

    /// Hit points each fighter starts a round with.
    #[serde(default = "default_max_hp")]
    pub max_hp: i32,

    /// Energy gauge ceiling for each fighter.
    #[serde(default = "default_max_energy")]
    pub max_energy: i32,

    /// Character played by player one.
    #[serde(default = "default_character")]
    pub p1_character: String,

    /// Character played by player two.
    #[serde(default = "default_character")]
    pub p2_character: String,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            width: default_stage_width(),
            height: default_stage_height(),
            max_hp: default_max_hp(),
            max_energy: default_max_energy(),
            p1_character: default_character(),
            p2_character: default_character(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default `tracing` filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl LoggingConfig {
    /// Override the level with `RINGSIDE_LOG` when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("RINGSIDE_LOG") {
            self.level = val;
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_input_delay_frames() -> usize {
    DEFAULT_INPUT_DELAY
}

const fn default_rounds() -> u32 {
    3
}

const fn default_frames_per_round() -> u32 {
    3600
}

const fn default_seed() -> u64 {
    42
}

const fn default_p1_policy() -> PolicyKind {
    PolicyKind::Scripted
}

fn default_script() -> Vec<String> {
    ["DASH", "STAND_A", "CROUCH_B", "STAND_D_DF_FA"]
        .into_iter()
        .map(str::to_owned)
        .collect()
}

const fn default_collect_timeout_ms() -> u64 {
    1000
}

const fn default_stage_width() -> u32 {
    960
}

const fn default_stage_height() -> u32 {
    640
}

const fn default_max_hp() -> i32 {
    400
}

const fn default_max_energy() -> i32 {
    300
}

fn default_character() -> String {
    "ZEN".to_owned()
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = RingsideConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.controller.input_delay_frames, 15);
        assert_eq!(config.match_settings.rounds, 3);
        assert_eq!(config.match_settings.p1_policy, PolicyKind::Scripted);
        assert_eq!(config.match_settings.p2_policy, PolicyKind::Idle);
        assert_eq!(config.stage.max_hp, 400);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
controller:
  input_delay_frames: 10

match:
  rounds: 1
  frames_per_round: 600
  seed: 7
  p1_policy: random
  p2_policy: scripted
  script: [JUMP, "6 _ B"]
  collect_timeout_ms: 250

stage:
  width: 800
  height: 600
  max_hp: 300
  max_energy: 200
  p1_character: GARNET
  p2_character: LUD

logging:
  level: "ringside_core=debug"
"#;

        let config = RingsideConfig::parse(yaml).unwrap();
        assert_eq!(config.controller.input_delay_frames, 10);
        assert_eq!(config.match_settings.rounds, 1);
        assert_eq!(config.match_settings.p1_policy, PolicyKind::Random);
        assert_eq!(config.match_settings.p2_policy, PolicyKind::Scripted);
        assert_eq!(config.match_settings.script, vec!["JUMP", "6 _ B"]);
        assert_eq!(config.stage.p2_character, "LUD");
        assert_eq!(config.match_settings.collect_timeout_ms, 250);
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = RingsideConfig::parse("match:\n  seed: 99\n").unwrap();
        assert_eq!(config.match_settings.seed, 99);
        assert_eq!(config.match_settings.frames_per_round, 3600);
        assert_eq!(config.controller.input_delay_frames, 15);
    }

    #[test]
    fn parse_empty_yaml() {
        assert!(RingsideConfig::parse("").is_ok());
    }

    #[test]
    fn zero_delay_is_rejected() {
        let err = RingsideConfig::parse("controller:\n  input_delay_frames: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn zero_rounds_is_rejected() {
        let err = RingsideConfig::parse("match:\n  rounds: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn unknown_policy_is_a_yaml_error() {
        let err = RingsideConfig::parse("match:\n  p1_policy: genius\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
    }
}
