//! Language model collaborator interface (spec §4.3).
//!
//! Grounded in `examples/original_source/src/language_model.hpp`'s
//! `AbstractLanguageModel`, reshaped as a plain trait the way
//! `lex_core::dict::Dictionary` is a trait collaborator rather than a
//! runtime-polymorphic base class. Per Design Note §9 the decoder is
//! generic over its `LanguageModel` implementation and holds it directly
//! as an `Option<L>` field — there is no registry, and the associated
//! `State` type is owned exclusively by the cache for one `decode` call.

/// A scoring collaborator over an opaque state space.
///
/// Implementations load their model (n-gram backend, vocabulary, etc.)
/// outside of this trait; construction failures are the caller's concern.
pub trait LanguageModel {
    /// Opaque per-hypothesis context carried between word scores.
    type State: Clone;

    /// Context length in words; used for history pruning.
    fn order(&self) -> usize;

    /// Initial state for a fresh decode.
    fn start_state(&self) -> Self::State;

    /// Score appending `word` to a hypothesis currently in `state`.
    ///
    /// Returns `(log10_probability, new_state)`. If `is_eos`, the returned
    /// score additionally folds in `log10 p(</s> | new_state)`, subject to
    /// the implementation's own `score_lm_boundary` policy. Out-of-vocabulary
    /// words incur the implementation's configured `unk_score_offset`.
    fn score(&self, state: &Self::State, word: &str, is_eos: bool) -> (f32, Self::State);

    /// Penalty for a word still being built (OOV likelihood proxy).
    ///
    /// Returns 0 if `partial` is a prefix of some known vocabulary entry;
    /// otherwise a negative penalty scaled by `max(1, |partial| / AVG_TOKEN_LEN)`.
    fn score_partial_token(&self, partial: &str) -> f32;
}

/// Placeholder `LanguageModel` used as the decoder's default type parameter
/// when no language model is supplied. Never constructed as an active
/// collaborator — `BeamSearchDecoderCtc::without_lm` stores `None` for
/// the `lm` field regardless of `L`, so this type's methods are dead code
/// in practice; it exists only so `BeamSearchDecoderCtc<L>` has a concrete
/// default to name.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLanguageModel;

impl LanguageModel for NullLanguageModel {
    type State = ();

    fn order(&self) -> usize {
        0
    }

    fn start_state(&self) {}

    fn score(&self, _state: &(), _word: &str, _is_eos: bool) -> (f32, ()) {
        (0.0, ())
    }

    fn score_partial_token(&self, _partial: &str) -> f32 {
        0.0
    }
}
