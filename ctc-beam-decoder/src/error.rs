//! Error types for alphabet construction, configuration, and decoding.

/// Errors raised while parsing or validating a [`crate::config::DecoderConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Errors raised at decoder construction or before the frame loop starts.
///
/// Runtime decoding itself does not fail on degenerate input (see spec §7) —
/// these variants only cover configuration and shape problems caught eagerly.
#[derive(Debug, thiserror::Error)]
pub enum DecoderError {
    #[error("alphabet has no labels")]
    EmptyAlphabet,
    #[error("BPE alphabet normalization is not supported")]
    BpeNotSupported,
    #[error("logits has {cols} columns but alphabet has {vocab_size} entries")]
    ShapeMismatch { cols: usize, vocab_size: usize },
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}
