//! End-to-end language-model rescoring scenarios (spec §8): a two-word
//! "bugs" vs "bunny" fork where the acoustic signal alone favors one word
//! and a toy LM's word preference and OOV handling can flip the winner.
//!
//! The fixture is deliberately small and self-contained (not the upstream
//! project's published reference matrix, which isn't available here) but
//! is built to reproduce the same qualitative behavior: an LM-free decode
//! prefers the acoustically dominant word, and LM rescoring with a strong
//! enough word preference or OOV penalty can flip that preference either
//! direction.

use std::collections::HashSet;

use crate::alphabet::Alphabet;
use crate::config::{DecoderConfig, AVG_TOKEN_LEN};
use crate::lm::LanguageModel;

use super::BeamSearchDecoderCtc;

fn alphabet() -> Alphabet {
    let labels: Vec<String> = [" ", "b", "g", "n", "s", "u", "y", ""]
        .iter()
        .map(|s| s.to_string())
        .collect();
    Alphabet::new(labels).unwrap()
}

/// 13x8 logits forking the first word between "bugs" and "bunny" at every
/// diverging frame in favor of "bunny" (the high-probability branch spells
/// "bunny" at each fork), so a no-LM decode would prefer "bunny bunny".
/// Columns: `[" ","b","g","n","s","u","y",""]`.
fn bugs_vs_bunny_logits() -> Vec<f32> {
    #[rustfmt::skip]
    let rows: [[f32; 8]; 13] = [
        // b
        [0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        // u
        [0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0],
        // g (bugs, 0.45) vs n (bunny, 0.55)
        [0.0, 0.0, 0.45, 0.55, 0.0, 0.0, 0.0, 0.0],
        // s (bugs, 0.45) vs blank (bunny's n-separator, 0.55)
        [0.0, 0.0, 0.0, 0.0, 0.45, 0.0, 0.0, 0.55],
        // blank (bugs pad, 0.45) vs n (bunny's 2nd n, 0.55)
        [0.0, 0.0, 0.0, 0.55, 0.0, 0.0, 0.0, 0.45],
        // blank (bugs pad, 0.45) vs y (bunny finishes, 0.55)
        [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.55, 0.45],
        // word break
        [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        // second word, unambiguous: b u n <blank> n y
        [0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0],
        [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0],
    ];
    rows.into_iter().flatten().collect()
}

/// A toy word-level LM scoring only "bugs" and "bunny" plausibly; every
/// other word (the many acoustically-possible but nonsensical hybrids the
/// beam search also explores, e.g. "bugn", "buny") gets a heavily
/// implausible fallback score so it never contends for the top hypothesis.
///
/// `unigram_set` models the spec §4.3 OOV rule: `None` means no
/// restriction; `Some(set)` with a nonempty set makes any word outside it
/// OOV, incurring `unk_score_offset` on top of its base score (spec §9's
/// "additive" framing, verbatim for partial tokens per the open question).
struct ToyWordLm {
    unigram_set: Option<HashSet<String>>,
    unk_score_offset: f32,
}

impl ToyWordLm {
    fn base_log10(word: &str) -> f32 {
        match word {
            "bugs" => -0.5,
            "bunny" => -1.5,
            _ => -20.0,
        }
    }

    fn is_known(&self, word: &str) -> bool {
        match &self.unigram_set {
            None => true,
            Some(set) if set.is_empty() => true,
            Some(set) => set.contains(word),
        }
    }
}

impl LanguageModel for ToyWordLm {
    type State = ();

    fn order(&self) -> usize {
        1
    }

    fn start_state(&self) {}

    fn score(&self, _state: &(), word: &str, is_eos: bool) -> (f32, ()) {
        let mut score = Self::base_log10(word);
        if !self.is_known(word) {
            score += self.unk_score_offset;
        }
        if is_eos {
            // Flat end-of-sentence adjustment; identical for every
            // hypothesis in these scenarios since they all end on the
            // same second word, so it never affects ranking between them.
            score += -0.2;
        }
        (score, ())
    }

    fn score_partial_token(&self, partial: &str) -> f32 {
        match &self.unigram_set {
            None => 0.0,
            Some(set) if set.is_empty() => 0.0,
            Some(set) => {
                if set.iter().any(|w| w.starts_with(partial)) {
                    0.0
                } else {
                    self.unk_score_offset * (partial.len() as f32 / AVG_TOKEN_LEN as f32).max(1.0)
                }
            }
        }
    }
}

fn decode_with(config: DecoderConfig, lm: ToyWordLm) -> String {
    let decoder = BeamSearchDecoderCtc::new(alphabet(), config, Some(lm));
    decoder.decode(&bugs_vs_bunny_logits(), 8).unwrap()
}

#[test]
fn no_lm_prefers_the_acoustically_dominant_word() {
    let decoder =
        BeamSearchDecoderCtc::<ToyWordLm>::new(alphabet(), DecoderConfig::default(), None);
    let text = decoder.decode(&bugs_vs_bunny_logits(), 8).unwrap();
    assert_eq!(text, "bunny bunny");
}

#[test]
fn lm_with_default_weights_and_no_unigram_restriction_flips_to_bugs() {
    let config = DecoderConfig::default();
    let lm = ToyWordLm {
        unigram_set: None,
        unk_score_offset: config.unk_score_offset,
    };
    assert_eq!(decode_with(config, lm), "bugs bunny");
}

#[test]
fn lm_with_empty_unigram_set_and_higher_alpha_still_prefers_bugs() {
    let mut config = DecoderConfig::default();
    config.alpha = 1.0;
    let lm = ToyWordLm {
        unigram_set: Some(HashSet::new()),
        unk_score_offset: config.unk_score_offset,
    };
    assert_eq!(decode_with(config, lm), "bugs bunny");
}

#[test]
fn lm_with_restrictive_unigrams_and_zero_unk_offset_still_allows_bugs() {
    let mut config = DecoderConfig::default();
    config.unk_score_offset = 0.0;
    let lm = ToyWordLm {
        unigram_set: Some(["bunny".to_string()].into_iter().collect()),
        unk_score_offset: 0.0,
    };
    assert_eq!(decode_with(config, lm), "bugs bunny");
}

#[test]
fn lm_with_restrictive_unigrams_and_harsh_unk_offset_flips_back_to_bunny() {
    let config = DecoderConfig::default(); // unk_score_offset = -10.0
    let lm = ToyWordLm {
        unigram_set: Some(["bunny".to_string()].into_iter().collect()),
        unk_score_offset: config.unk_score_offset,
    };
    assert_eq!(decode_with(config, lm), "bunny bunny");
}
