//! Decoder Configuration Module
//!
//! Provides configuration loading for the envelope decoder. Settings come
//! from a TOML file or the built-in defaults, with `ENVELOPE_*` environment
//! variables applied on top.

use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Environment variable names recognised by [`DecoderConfig::from_env`]
pub mod env {
    pub const MAX_DEPTH: &str = "ENVELOPE_MAX_DEPTH";
    pub const MAX_COLLECTION_LEN: &str = "ENVELOPE_MAX_COLLECTION_LEN";
    pub const UNKNOWN_TOP_LEVEL: &str = "ENVELOPE_UNKNOWN_TOP_LEVEL";
    pub const UNKNOWN_NESTED: &str = "ENVELOPE_UNKNOWN_NESTED";
    pub const REQUIRE_PREAMBLE: &str = "ENVELOPE_REQUIRE_PREAMBLE";
    pub const UNWRAP_ENVELOPE: &str = "ENVELOPE_UNWRAP_ENVELOPE";
}

/// What to do with a composite whose descriptor has no registered constructor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownTypeAction {
    /// Keep the composite's raw bytes as an opaque payload
    Capture,
    /// Fail the decode with an unknown-descriptor error
    Reject,
}

impl FromStr for UnknownTypeAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "capture" => Ok(UnknownTypeAction::Capture),
            "reject" => Ok(UnknownTypeAction::Reject),
            other => Err(format!("expected 'capture' or 'reject', got '{other}'")),
        }
    }
}

/// Unknown-descriptor handling, split by slot position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnknownTypePolicy {
    /// Applies to the root object of a stream
    pub top_level: UnknownTypeAction,
    /// Applies to every polymorphic slot below the root
    pub nested: UnknownTypeAction,
}

impl Default for UnknownTypePolicy {
    fn default() -> Self {
        Self {
            top_level: UnknownTypeAction::Reject,
            nested: UnknownTypeAction::Capture,
        }
    }
}

impl UnknownTypePolicy {
    pub fn capture_all() -> Self {
        Self {
            top_level: UnknownTypeAction::Capture,
            nested: UnknownTypeAction::Capture,
        }
    }

    pub fn reject_all() -> Self {
        Self {
            top_level: UnknownTypeAction::Reject,
            nested: UnknownTypeAction::Reject,
        }
    }

    pub fn action_for(&self, top_level: bool) -> UnknownTypeAction {
        if top_level {
            self.top_level
        } else {
            self.nested
        }
    }
}

/// Bounds applied while walking a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeLimits {
    /// Maximum number of open frames; every composite opens two
    pub max_depth: usize,
    /// Maximum element count accepted for a single list or map
    pub max_collection_len: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_depth: 128,
            max_collection_len: 1 << 20,
        }
    }
}

/// Stream framing expectations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FramingConfig {
    /// Reject streams that do not start with the serialisation magic
    pub require_preamble: bool,
    /// Decode the object inside an envelope composite instead of the envelope itself
    pub unwrap_envelope: bool,
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            require_preamble: false,
            unwrap_envelope: true,
        }
    }
}

/// Complete decoder configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DecoderConfig {
    pub unknown_types: UnknownTypePolicy,
    pub limits: DecodeLimits,
    pub framing: FramingConfig,
}

impl DecoderConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: DecoderConfig =
            toml::from_str(source).context("Failed to parse decoder configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML file and apply environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config = Self::from_toml_str(&source)
            .with_context(|| format!("Invalid config file {}", path.display()))?
            .with_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        info!(path = %path.display(), "Loaded decoder configuration");
        Ok(config)
    }

    /// Defaults with environment overrides applied
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a key lookup; unparsable values are ignored with a warning
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(depth) = parse_override(&lookup, env::MAX_DEPTH) {
            self.limits.max_depth = depth;
        }
        if let Some(len) = parse_override(&lookup, env::MAX_COLLECTION_LEN) {
            self.limits.max_collection_len = len;
        }
        if let Some(action) = parse_override(&lookup, env::UNKNOWN_TOP_LEVEL) {
            self.unknown_types.top_level = action;
        }
        if let Some(action) = parse_override(&lookup, env::UNKNOWN_NESTED) {
            self.unknown_types.nested = action;
        }
        if let Some(flag) = parse_override(&lookup, env::REQUIRE_PREAMBLE) {
            self.framing.require_preamble = flag;
        }
        if let Some(flag) = parse_override(&lookup, env::UNWRAP_ENVELOPE) {
            self.framing.unwrap_envelope = flag;
        }
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.limits.max_depth < 2 {
            bail!(
                "limits.max_depth must be at least 2 (one composite), got {}",
                self.limits.max_depth
            );
        }
        if self.limits.max_depth > 4096 {
            bail!(
                "limits.max_depth cannot exceed 4096, got {}",
                self.limits.max_depth
            );
        }
        if self.limits.max_collection_len == 0 {
            bail!("limits.max_collection_len must be greater than 0");
        }
        Ok(())
    }

    /// Process-wide configuration, read from the environment once
    pub fn global() -> &'static DecoderConfig {
        &CONFIG
    }
}

fn parse_override<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => {
            debug!(key, value = %raw, "Applying configuration override");
            Some(value)
        }
        Err(e) => {
            warn!(key, value = %raw, error = %e, "Ignoring unparsable configuration override");
            None
        }
    }
}

/// Global configuration loaded once at startup
pub static CONFIG: Lazy<DecoderConfig> = Lazy::new(|| {
    let config = DecoderConfig::from_env();
    if let Err(e) = config.validate() {
        warn!(error = %e, "Invalid decoder configuration in environment, using defaults");
        DecoderConfig::default()
    } else {
        config
    }
});
