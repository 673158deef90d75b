//! CTC beam-search decoder: frame-level logits to ranked text hypotheses.
//!
//! The public entry point is [`decoder::BeamSearchDecoderCtc`]. Construct one
//! with an [`alphabet::Alphabet`], a [`config::DecoderConfig`], and an
//! optional [`lm::LanguageModel`] collaborator, then call `decode_beams` on a
//! `[frames, vocab]` logits matrix.

pub mod alphabet;
pub mod beam;
pub mod config;
pub mod decoder;
pub mod error;
pub mod hotword;
pub mod lm;
pub mod softmax;

pub use alphabet::Alphabet;
pub use beam::{Frames, OutputBeam, WordFrames, NO_FRAMES};
pub use config::DecoderConfig;
pub use decoder::BeamSearchDecoderCtc;
pub use error::{ConfigError, DecoderError};
pub use hotword::HotwordScorer;
pub use lm::{LanguageModel, NullLanguageModel};
