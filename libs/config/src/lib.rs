//! # Envelope Decoder Configuration
//!
//! Centralized configuration for the envelope decoder. One [`DecoderConfig`]
//! value carries every tunable the decoder reads:
//!
//! - **Unknown types**: capture or reject composites with no registered constructor
//! - **Limits**: nesting depth and collection size bounds
//! - **Framing**: whether the serialisation preamble is mandatory, and envelope unwrapping
//!
//! ## Usage
//!
//! ```rust
//! use config::{DecoderConfig, UnknownTypeAction};
//!
//! let config = DecoderConfig::from_toml_str("[unknown_types]\nnested = \"reject\"\n").unwrap();
//! assert_eq!(config.unknown_types.nested, UnknownTypeAction::Reject);
//! assert_eq!(config.limits.max_depth, 128);
//! ```

pub mod decoder_config;

pub use decoder_config::{
    env, DecodeLimits, DecoderConfig, FramingConfig, UnknownTypeAction, UnknownTypePolicy, CONFIG,
};
