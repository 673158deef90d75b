//! Decoder configuration knobs (spec §6) and the constants fixed by contract.
//!
//! Unlike `lex_core::settings`, this is not a process-wide `OnceLock`
//! singleton: a `BeamSearchDecoderCtc` is constructed with an explicit
//! `DecoderConfig` value, so that `decode` remains a pure function of
//! `(logits, config, alphabet, lm)`.

use serde::Deserialize;

use crate::error::ConfigError;

/// Embedded default configuration, validated at compile time by `build.rs`.
pub const DEFAULT_CONFIG_TOML: &str = include_str!("default_config.toml");

/// Leading/trailing BPE word-piece boundary marker (SentencePiece style).
pub const BPE_TOKEN: &str = "\u{2581}"; // "▁"
/// Alternate BPE boundary marker (WordPiece style).
pub const BPE_TOKEN_ALT: &str = "##";
/// Canonical glyph substituted for `<unk>`/`[unk]`-style alphabet entries.
pub const UNK_TOKEN: &str = "\u{2047}"; // "⁇"
/// Average token length used to scale OOV penalties for long partial words.
pub const AVG_TOKEN_LEN: usize = 6;
/// Minimum probability mass clipped into log-probabilities to avoid `-inf`.
pub const MIN_TOKEN_CLIP_P: f32 = 1e-15;
/// Converts a base-10 log-probability to natural log: `1 / log10(e)`.
pub const LOG_BASE_CHANGE_FACTOR: f32 = std::f32::consts::LN_10;

// Per-field serde defaults. `#[serde(default)]` at the *container* level
// would construct a `DecoderConfig::default()` on every parse to backfill
// missing fields, and our `Default` impl itself parses `DEFAULT_CONFIG_TOML`
// — the two would recurse into each other forever. Per-field defaults here
// are plain functions, so `Default::default()` stays a leaf call.
fn default_beam_width() -> usize {
    100
}
fn default_beam_prune_logp() -> f32 {
    -10.0
}
fn default_token_min_logp() -> f32 {
    -5.0
}
fn default_hotword_weight() -> f32 {
    10.0
}
fn default_alpha() -> f32 {
    0.5
}
fn default_beta() -> f32 {
    1.5
}
fn default_unk_score_offset() -> f32 {
    -10.0
}
fn default_score_lm_boundary() -> bool {
    true
}

/// Per-decode configuration knobs (spec §6).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DecoderConfig {
    /// Max surviving `LMBeam`s per frame after trim.
    #[serde(default = "default_beam_width")]
    pub beam_width: usize,
    /// Beams below `max_lm_score + beam_prune_logp` are dropped.
    #[serde(default = "default_beam_prune_logp")]
    pub beam_prune_logp: f32,
    /// Tokens below this log-prob are skipped (argmax is always considered).
    #[serde(default = "default_token_min_logp")]
    pub token_min_logp: f32,
    /// Enable §4.5 history pruning.
    #[serde(default)]
    pub prune_history: bool,
    /// User-supplied hotwords, whitespace-split into unigrams by `HotwordScorer`.
    #[serde(default)]
    pub hotwords: Vec<String>,
    /// Weight applied to hotword matches.
    #[serde(default = "default_hotword_weight")]
    pub hotword_weight: f32,
    /// LM weight.
    #[serde(default = "default_alpha")]
    pub alpha: f32,
    /// Per-word LM bonus.
    #[serde(default = "default_beta")]
    pub beta: f32,
    /// Additive penalty for out-of-vocabulary words/partial tokens.
    #[serde(default = "default_unk_score_offset")]
    pub unk_score_offset: f32,
    /// Whether the LM scores begin/end-of-sentence boundaries.
    #[serde(default = "default_score_lm_boundary")]
    pub score_lm_boundary: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        DecoderConfig {
            beam_width: default_beam_width(),
            beam_prune_logp: default_beam_prune_logp(),
            token_min_logp: default_token_min_logp(),
            prune_history: false,
            hotwords: Vec::new(),
            hotword_weight: default_hotword_weight(),
            alpha: default_alpha(),
            beta: default_beta(),
            unk_score_offset: default_unk_score_offset(),
            score_lm_boundary: default_score_lm_boundary(),
        }
    }
}

impl DecoderConfig {
    /// Parse and validate a config from TOML text.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        parse_config_toml(toml_str)
    }
}

fn parse_config_toml(toml_str: &str) -> Result<DecoderConfig, ConfigError> {
    let cfg: DecoderConfig =
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate(&cfg)?;
    Ok(cfg)
}

fn validate(cfg: &DecoderConfig) -> Result<(), ConfigError> {
    if cfg.beam_width == 0 {
        return Err(ConfigError::InvalidValue {
            field: "beam_width".to_string(),
            reason: "must be positive".to_string(),
        });
    }
    if cfg.beam_prune_logp > 0.0 {
        return Err(ConfigError::InvalidValue {
            field: "beam_prune_logp".to_string(),
            reason: "must be non-positive".to_string(),
        });
    }
    if cfg.hotword_weight < 0.0 {
        return Err(ConfigError::InvalidValue {
            field: "hotword_weight".to_string(),
            reason: "must be non-negative".to_string(),
        });
    }
    Ok(())
}
