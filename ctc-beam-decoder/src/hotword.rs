//! Hotword boosting (spec §4.2).
//!
//! Grounded in `examples/original_source/src/language_model.cpp`'s
//! `HotWordScorer`, reshaped onto two off-the-shelf primitives instead of a
//! hand-rolled trie and `std::regex`: an [`fst::Set`] for prefix containment
//! and a [`fancy_regex::Regex`] for the whole-word lookaround match, since
//! plain `regex` has no lookaround support.

use fancy_regex::Regex;
use fst::automaton::{Automaton, Str};
use fst::{IntoStreamer, Set, Streamer};

/// Weighted matcher for a fixed set of user-supplied hotwords.
pub struct HotwordScorer {
    trie: Set<Vec<u8>>,
    whole_word: Regex,
    weight: f32,
}

impl HotwordScorer {
    /// Build a scorer from raw hotwords and a weight.
    ///
    /// Each hotword is trimmed and split on whitespace into unigrams; an
    /// empty `hotwords` slice produces a no-op scorer (empty trie, a regex
    /// that can never match).
    pub fn new(hotwords: &[String], weight: f32) -> Self {
        let mut unigrams: Vec<String> = hotwords
            .iter()
            .flat_map(|h| h.trim().split_whitespace())
            .map(|w| w.to_string())
            .collect();
        unigrams.sort();
        unigrams.dedup();

        let trie = Set::from_iter(unigrams.iter().map(|s| s.as_bytes().to_vec()))
            .expect("sorted, deduplicated input always builds a valid fst::Set");

        let whole_word = if unigrams.is_empty() {
            // Matches only a zero-length word boundary: never true against
            // non-empty text, and false against "" (no boundary exists).
            Regex::new(r"^\b$").expect("static pattern is valid")
        } else {
            let alternation = unigrams
                .iter()
                .map(|w| fancy_regex::escape(w))
                .collect::<Vec<_>>()
                .join("|");
            let pattern = format!(r"(?<!\S)(?:{alternation})(?!\S)");
            Regex::new(&pattern).expect("alternation of escaped literals is always valid")
        };

        HotwordScorer {
            trie,
            whole_word,
            weight,
        }
    }

    /// Number of whole-word hotword matches in `text`, times the weight.
    pub fn score(&self, text: &str) -> f32 {
        let count = self.whole_word.find_iter(text).count();
        count as f32 * self.weight
    }

    /// Partial-token score for a word still being built.
    ///
    /// If `text` is a prefix of some hotword, scales the weight by
    /// `|text| / min(|k| : k is a hotword with prefix text)`; otherwise 0.
    pub fn score_partial_token(&self, text: &str) -> f32 {
        match self.min_key_len_with_prefix(text) {
            Some(min_len) if min_len > 0 => {
                self.weight * (text.len() as f32 / min_len as f32)
            }
            _ => 0.0,
        }
    }

    /// True if some hotword starts with `text`.
    pub fn contains(&self, text: &str) -> bool {
        self.min_key_len_with_prefix(text).is_some()
    }

    fn min_key_len_with_prefix(&self, prefix: &str) -> Option<usize> {
        let automaton = Str::new(prefix).starts_with();
        let mut stream = self.trie.search(automaton).into_stream();
        let mut min_len: Option<usize> = None;
        while let Some(key) = stream.next() {
            let len = key.len();
            min_len = Some(min_len.map_or(len, |m: usize| m.min(len)));
        }
        min_len
    }
}
