//! Standalone checks for testable properties (spec §8) not already pinned
//! down by a more specific unit test elsewhere in this module tree.

use crate::alphabet::Alphabet;
use crate::config::DecoderConfig;
use crate::hotword::HotwordScorer;
use crate::lm::NullLanguageModel;

use super::BeamSearchDecoderCtc;

fn alphabet() -> Alphabet {
    let labels: Vec<String> = [" ", "b", "g", "n", "s", "u", "y", ""]
        .iter()
        .map(|s| s.to_string())
        .collect();
    Alphabet::new(labels).unwrap()
}

fn reference_logits() -> Vec<f32> {
    #[rustfmt::skip]
    let rows: [[f32; 8]; 13] = [
        [0.0, 0.9, 0.0, 0.0, 0.0, 0.0, 0.0, 0.1],
        [0.0, 0.0, 0.0, 0.0, 0.0, 0.9, 0.0, 0.1],
        [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0],
        [0.0, 0.0, 0.0, 0.9, 0.0, 0.0, 0.0, 0.1],
        [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.9, 0.1],
        [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0],
        [0.9, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.1],
        [0.0, 0.9, 0.0, 0.0, 0.0, 0.0, 0.0, 0.1],
        [0.0, 0.0, 0.0, 0.0, 0.0, 0.9, 0.0, 0.1],
        [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0],
        [0.0, 0.0, 0.0, 0.9, 0.0, 0.0, 0.0, 0.1],
        [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.9, 0.1],
        [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0],
    ];
    rows.into_iter().flatten().collect()
}

/// P8: with no LM configured, ranking reduces to `logit_score + hotword_score`.
#[test]
fn p8_without_lm_ranking_is_logit_plus_hotword_score() {
    let mut config = DecoderConfig::default();
    config.hotwords = vec!["bunny".to_string(), "bugs".to_string()];
    config.hotword_weight = 3.0;
    let decoder =
        BeamSearchDecoderCtc::<NullLanguageModel>::new(alphabet(), config.clone(), None);
    let beams = decoder.decode_beams(&reference_logits(), 8).unwrap();
    assert!(!beams.is_empty());

    let hotword = HotwordScorer::new(&config.hotwords, config.hotword_weight);
    for beam in &beams {
        let expected = beam.logit_score + hotword.score(&beam.text);
        assert!((beam.lm_score - expected).abs() < 1e-4);
    }
    for pair in beams.windows(2) {
        assert!(pair[0].lm_score >= pair[1].lm_score);
    }
}

/// P7: an all-blank-dominant matrix decodes to the empty string regardless
/// of matrix length.
#[test]
fn p7_all_blank_dominant_matrix_decodes_to_empty_string() {
    let config = DecoderConfig::default();
    let decoder = BeamSearchDecoderCtc::<NullLanguageModel>::new(alphabet(), config, None);
    let mut logits = vec![0.0f32; 20 * 8];
    for frame in logits.chunks_mut(8) {
        frame[7] = 1.0;
    }
    assert_eq!(decoder.decode(&logits, 8).unwrap(), "");
}
