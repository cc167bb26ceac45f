use serde::{Deserialize, Serialize};

/// Decoding recipe handed to a [`crate::SummaryModel`].
///
/// Beam search and sampling are both switched on, so two runs over the same
/// input are not expected to produce the same text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub num_beams: usize,
    pub max_length: usize,
    pub min_length: usize,
    pub length_penalty: f64,
    pub early_stopping: bool,
    pub do_sample: bool,
    pub no_repeat_ngram_size: usize,
    pub top_k: usize,
    pub top_p: f64,
}

impl GenerationConfig {
    pub const NUM_BEAMS: usize = 4;
    pub const LENGTH_PENALTY: f64 = 2.0;
    pub const NO_REPEAT_NGRAM_SIZE: usize = 3;
    pub const TOP_K: usize = 40;
    pub const TOP_P: f64 = 0.8;

    /// Builds the recipe for a requested summary length.
    /// Output is bounded to `[length * 2, length * 4]` tokens.
    pub fn for_length(length: usize) -> Self {
        Self {
            num_beams: Self::NUM_BEAMS,
            max_length: length * 4,
            min_length: length * 2,
            length_penalty: Self::LENGTH_PENALTY,
            early_stopping: true,
            do_sample: true,
            no_repeat_ngram_size: Self::NO_REPEAT_NGRAM_SIZE,
            top_k: Self::TOP_K,
            top_p: Self::TOP_P,
        }
    }
}
