//! The CTC beam-search decoder's public API: construction, the per-frame
//! loop, and finalization (spec §2, §4, §6).

mod expand;
mod finalize;
mod merge;
mod prune;
mod score;

#[cfg(test)]
mod lm_scenarios;
#[cfg(test)]
mod properties;

use tracing::debug;

use crate::alphabet::Alphabet;
use crate::beam::{lm_beam_from, Beam, LMBeam, LmScoreCache, OutputBeam, PartialTokenCache};
use crate::config::DecoderConfig;
use crate::error::DecoderError;
use crate::hotword::HotwordScorer;
use crate::lm::LanguageModel;
use crate::softmax::prepare_log_probs;

use expand::{candidate_tokens, expand_frame};
use finalize::finalize;
use merge::merge_beams;
use prune::{history_prune, prune, trim};
use score::get_lm_beam;

/// A CTC beam-search decoder bound to one alphabet, configuration, and
/// optional language model.
///
/// Construction is the only place errors that aren't about a particular
/// `decode` call's input surface (spec §7): the alphabet's own validation
/// happens in [`Alphabet::new`] before a decoder can even be built. A
/// decoder holds no mutable state between `decode`/`decode_beams` calls —
/// each call builds a fresh beam frontier and fresh LM/hotword caches, so
/// `decode` is a pure function of `(logits, config, alphabet, lm)` (spec
/// invariant P6).
pub struct BeamSearchDecoderCtc<L: LanguageModel> {
    alphabet: Alphabet,
    config: DecoderConfig,
    hotword: HotwordScorer,
    lm: Option<L>,
}

impl<L: LanguageModel> BeamSearchDecoderCtc<L> {
    /// Build a decoder from an alphabet, configuration, and optional LM.
    pub fn new(alphabet: Alphabet, config: DecoderConfig, lm: Option<L>) -> Self {
        let hotword = HotwordScorer::new(&config.hotwords, config.hotword_weight);
        BeamSearchDecoderCtc {
            alphabet,
            config,
            hotword,
            lm,
        }
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode a `[frames, vocab]` row-major logits matrix, returning only
    /// the top hypothesis's text (spec §6 Output).
    pub fn decode(&self, logits: &[f32], cols: usize) -> Result<String, DecoderError> {
        self.decode_with_lm_start_state(logits, cols, None)
    }

    /// Decode, returning every surviving hypothesis ranked best-first.
    pub fn decode_beams(
        &self,
        logits: &[f32],
        cols: usize,
    ) -> Result<Vec<OutputBeam<L::State>>, DecoderError> {
        self.decode_beams_with_lm_start_state(logits, cols, None)
    }

    /// Decode with an overridden LM seed state (spec §6 `lm_start_state`),
    /// e.g. to continue scoring context across utterances. `None` uses the
    /// LM's own `start_state()`.
    pub fn decode_with_lm_start_state(
        &self,
        logits: &[f32],
        cols: usize,
        lm_start_state: Option<L::State>,
    ) -> Result<String, DecoderError> {
        let beams = self.decode_beams_with_lm_start_state(logits, cols, lm_start_state)?;
        Ok(beams.into_iter().next().map(|b| b.text).unwrap_or_default())
    }

    /// Full beam-search pipeline: shape check, log-softmax prep, frame
    /// loop, finalize.
    pub fn decode_beams_with_lm_start_state(
        &self,
        logits: &[f32],
        cols: usize,
        lm_start_state: Option<L::State>,
    ) -> Result<Vec<OutputBeam<L::State>>, DecoderError> {
        let vocab_size = self.alphabet.size();
        if cols != vocab_size {
            return Err(DecoderError::ShapeMismatch { cols, vocab_size });
        }

        let span = tracing::debug_span!("decode_beams", frames = logits.len() / cols.max(1));
        let _enter = span.enter();

        let log_probs = prepare_log_probs(logits, cols);
        let labels = self.alphabet.labels();
        let is_bpe = self.alphabet.is_bpe();

        let start_state = lm_start_state.or_else(|| self.lm.as_ref().map(|lm| lm.start_state()));
        let mut lm_cache: LmScoreCache<Option<L::State>> = LmScoreCache::seeded(start_state);
        let mut partial_cache = PartialTokenCache::new();

        let mut lm_beams: Vec<LMBeam> = vec![lm_beam_from(&Beam::empty(), 0.0)];

        for frame_idx in 0..log_probs.rows() {
            let row = log_probs.row(frame_idx);
            let candidates = candidate_tokens(row, self.config.token_min_logp);

            let plain_beams: Vec<Beam> = lm_beams.iter().map(|b| b.project()).collect();
            let expanded = expand_frame(
                &plain_beams,
                row,
                labels,
                &candidates,
                frame_idx as i32,
                is_bpe,
            );
            let merged = merge_beams(expanded);
            let scored: Vec<LMBeam> = merged
                .iter()
                .map(|b| {
                    get_lm_beam(
                        b,
                        self.lm.as_ref(),
                        &self.hotword,
                        &mut lm_cache,
                        &mut partial_cache,
                        false,
                        self.config.alpha,
                        self.config.beta,
                    )
                })
                .collect();
            let pruned = prune(scored, self.config.beam_prune_logp);
            let trimmed = trim(pruned, self.config.beam_width);

            lm_beams = if self.config.prune_history {
                let order = self.lm.as_ref().map_or(1, |lm| lm.order());
                history_prune(trimmed, order)
            } else {
                trimmed
            };

            debug!(frame_idx, surviving = lm_beams.len(), "frame expanded");
        }

        Ok(finalize(
            lm_beams,
            self.lm.as_ref(),
            &self.hotword,
            &mut lm_cache,
            &mut partial_cache,
            self.config.beam_prune_logp,
            self.config.beam_width,
            self.config.alpha,
            self.config.beta,
        ))
    }
}
