use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

/// One encoded example: fixed-length word ids, the number of
/// real (non-padding) positions and the class id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextSample {
    pub word_ids: Vec<u32>,
    pub seq_len:  usize,
    pub label:    usize,
}

pub struct TextDataset {
    samples: Vec<TextSample>,
}

impl TextDataset {
    pub fn new(samples: Vec<TextSample>) -> Self { Self { samples } }

    pub fn sample_count(&self) -> usize { self.samples.len() }

    /// Number of mini-batches one pass over the dataset produces
    pub fn batch_count(&self, batch_size: usize) -> usize {
        self.samples.len().div_ceil(batch_size.max(1))
    }
}

impl Dataset<TextSample> for TextDataset {
    fn get(&self, index: usize) -> Option<TextSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
