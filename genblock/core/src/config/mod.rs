//! Card Configuration
//!
//! Centralized configuration loading for the card core, supporting a TOML
//! file at `~/.config/genblock/card.toml`.
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest first):
//! 1. CLI arguments ([`ConfigOverrides`])
//! 2. Environment variables (`GENBLOCK_*`)
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! kind = "bullet"
//!
//! [timing]
//! base_reveal_ms = 500
//! per_character_reveal_ms = 30
//! header_settle_ms = 300
//! content_hide_settle_ms = 300
//! commit_settle_ms = 300
//! visibility_restore_ms = 100
//! copy_feedback_ms = 2000
//!
//! [samples]
//! paragraph = ["A sentence.", "Another sentence."]
//! bullet = ["A task", "Another task"]
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::content::ContentKind;
use crate::reveal::RevealTiming;
use crate::samples::SamplePools;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// A sample pool has nothing to draw from
    #[error("Sample pool for {kind} content is empty")]
    EmptyPool {
        /// The kind whose pool is empty
        kind: ContentKind,
    },
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Timing section of the TOML configuration (all values in milliseconds)
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingToml {
    /// Fixed rest added to every unit's reveal
    pub base_reveal_ms: Option<u64>,
    /// Typing time per character
    pub per_character_reveal_ms: Option<u64>,
    /// Pause after the header collapses
    pub header_settle_ms: Option<u64>,
    /// Pause after the content hides
    pub content_hide_settle_ms: Option<u64>,
    /// Pause after the last reveal, before committing
    pub commit_settle_ms: Option<u64>,
    /// Pause between header expansion and content becoming visible again
    pub visibility_restore_ms: Option<u64>,
    /// How long the "Copied!" indicator stays up
    pub copy_feedback_ms: Option<u64>,
}

/// Samples section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplesToml {
    /// Replacement pool for paragraph content
    pub paragraph: Option<Vec<String>>,
    /// Replacement pool for bullet content
    pub bullet: Option<Vec<String>>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CardToml {
    /// Initial content kind ("paragraph" or "bullet")
    pub kind: Option<String>,
    /// Timing section
    pub timing: TimingToml,
    /// Samples section
    pub samples: SamplesToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Resolved card configuration
///
/// Use [`load_config`] to load it with proper priority handling.
#[derive(Clone, Debug)]
pub struct CardConfig {
    /// Kind of the content the host starts with
    pub kind: ContentKind,
    /// Fixed rest added to every unit's reveal
    pub base_reveal_delay: Duration,
    /// Typing time per character (must be non-zero)
    pub per_character_reveal_delay: Duration,
    /// Pause after the header collapses, before the content hides
    pub header_settle_delay: Duration,
    /// Pause after the content hides, before the first reveal
    pub content_hide_settle_delay: Duration,
    /// Pause after the last reveal, before the new units are committed
    pub commit_settle_delay: Duration,
    /// Pause between header expansion and content becoming visible again
    pub visibility_restore_delay: Duration,
    /// How long a successful copy is signalled
    pub copy_feedback: Duration,
    /// Sample pools drawn from on regeneration
    pub samples: SamplePools,
    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,
    source: ConfigSource,
}

impl Default for CardConfig {
    fn default() -> Self {
        let reveal = RevealTiming::default();
        Self {
            kind: ContentKind::Paragraph,
            base_reveal_delay: reveal.base,
            per_character_reveal_delay: reveal.per_character,
            header_settle_delay: Duration::from_millis(300),
            content_hide_settle_delay: Duration::from_millis(300),
            commit_settle_delay: Duration::from_millis(300),
            visibility_restore_delay: Duration::from_millis(100),
            copy_feedback: Duration::from_secs(2),
            samples: SamplePools::default(),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl CardConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reveal timing
    #[must_use]
    pub fn with_reveal(mut self, base: Duration, per_character: Duration) -> Self {
        self.base_reveal_delay = base;
        self.per_character_reveal_delay = per_character;
        self
    }

    /// Set the sample pools
    #[must_use]
    pub fn with_samples(mut self, samples: SamplePools) -> Self {
        self.samples = samples;
        self
    }

    /// Reveal timing derived from this configuration
    #[must_use]
    pub fn reveal_timing(&self) -> RevealTiming {
        RevealTiming {
            base: self.base_reveal_delay,
            per_character: self.per_character_reveal_delay,
        }
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Set the configuration source
    pub fn set_source(&mut self, source: ConfigSource) {
        self.source = source;
    }

    /// Check the configuration can drive an orchestrator
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] for a zero per-character delay
    /// and [`ConfigError::EmptyPool`] for an empty sample pool.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.per_character_reveal_delay.is_zero() {
            return Err(ConfigError::ValidationError(
                "per_character_reveal_delay must be greater than zero".to_string(),
            ));
        }
        self.samples.validate()
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/genblock/card.toml` or
/// `~/.config/genblock/card.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("genblock").join("card.toml"))
}

/// Load configuration from the default file and the environment
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if the
/// resulting configuration is invalid. A missing config file is not an error.
pub fn load_config() -> Result<CardConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path and the environment
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed,
/// or if the resulting configuration is invalid.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<CardConfig, ConfigError> {
    let mut config = CardConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: CardToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config)?;
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, |key| std::env::var(key).ok());

    config.validate()?;
    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut CardConfig, toml: &CardToml) -> Result<(), ConfigError> {
    if let Some(ref kind) = toml.kind {
        config.kind = ContentKind::parse(kind)
            .ok_or_else(|| ConfigError::ValidationError(format!("unknown content kind '{kind}'")))?;
    }

    let timing = &toml.timing;
    let fields = [
        (timing.base_reveal_ms, &mut config.base_reveal_delay),
        (timing.per_character_reveal_ms, &mut config.per_character_reveal_delay),
        (timing.header_settle_ms, &mut config.header_settle_delay),
        (timing.content_hide_settle_ms, &mut config.content_hide_settle_delay),
        (timing.commit_settle_ms, &mut config.commit_settle_delay),
        (timing.visibility_restore_ms, &mut config.visibility_restore_delay),
        (timing.copy_feedback_ms, &mut config.copy_feedback),
    ];
    for (ms, target) in fields {
        if let Some(ms) = ms {
            *target = Duration::from_millis(ms);
        }
    }

    if let Some(ref paragraph) = toml.samples.paragraph {
        config.samples.paragraph.clone_from(paragraph);
    }
    if let Some(ref bullet) = toml.samples.bullet {
        config.samples.bullet.clone_from(bullet);
    }

    Ok(())
}

/// Apply environment variable overrides to the config
///
/// Unparseable values are ignored with a warning.
fn apply_env_config<F>(config: &mut CardConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(kind) = lookup("GENBLOCK_KIND") {
        match ContentKind::parse(&kind) {
            Some(kind) => {
                config.kind = kind;
                config.source = ConfigSource::Env;
            }
            None => tracing::warn!(value = %kind, "Ignoring unknown GENBLOCK_KIND"),
        }
    }

    let fields = [
        ("GENBLOCK_BASE_REVEAL_MS", &mut config.base_reveal_delay),
        ("GENBLOCK_PER_CHAR_REVEAL_MS", &mut config.per_character_reveal_delay),
        ("GENBLOCK_HEADER_SETTLE_MS", &mut config.header_settle_delay),
        ("GENBLOCK_CONTENT_HIDE_SETTLE_MS", &mut config.content_hide_settle_delay),
        ("GENBLOCK_COMMIT_SETTLE_MS", &mut config.commit_settle_delay),
        ("GENBLOCK_VISIBILITY_RESTORE_MS", &mut config.visibility_restore_delay),
    ];
    let mut touched = false;
    for (key, target) in fields {
        if let Some(value) = lookup(key) {
            match value.parse::<u64>() {
                Ok(ms) => {
                    *target = Duration::from_millis(ms);
                    touched = true;
                }
                Err(_) => tracing::warn!(key, value = %value, "Ignoring non-numeric delay"),
            }
        }
    }
    if touched {
        config.source = ConfigSource::Env;
    }
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
///
/// Use this after [`load_config`] to apply command-line argument overrides.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Content kind override
    pub kind: Option<ContentKind>,
    /// Base reveal delay override (milliseconds)
    pub base_reveal_ms: Option<u64>,
    /// Per-character reveal delay override (milliseconds)
    pub per_character_reveal_ms: Option<u64>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set content kind override
    #[must_use]
    pub fn with_kind(mut self, kind: ContentKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Set base reveal delay override
    #[must_use]
    pub fn with_base_reveal_ms(mut self, ms: u64) -> Self {
        self.base_reveal_ms = Some(ms);
        self
    }

    /// Set per-character reveal delay override
    #[must_use]
    pub fn with_per_character_reveal_ms(mut self, ms: u64) -> Self {
        self.per_character_reveal_ms = Some(ms);
        self
    }

    /// Apply overrides to a configuration and re-validate it
    ///
    /// # Errors
    ///
    /// Returns an error if the overridden configuration is invalid.
    pub fn apply(&self, config: &mut CardConfig) -> Result<(), ConfigError> {
        if self.kind.is_some() || self.base_reveal_ms.is_some() || self.per_character_reveal_ms.is_some() {
            config.source = ConfigSource::Cli;
        }

        if let Some(kind) = self.kind {
            config.kind = kind;
        }
        if let Some(ms) = self.base_reveal_ms {
            config.base_reveal_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = self.per_character_reveal_ms {
            config.per_character_reveal_delay = Duration::from_millis(ms);
        }

        config.validate()
    }
}

// =============================================================================
// Tests
// =============================================================================
