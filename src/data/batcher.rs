// ============================================================
// Layer 4 — Text Batcher
// ============================================================
// Implements Burn's Batcher trait to stack a Vec<TextSample>
// into tensors for one forward pass.
//
// Besides ids, lengths and labels, every batch carries a
// `reverse_index`: for a row of true length L,
//
//   reverse_index[t] = L - 1 - t   for t <  L
//   reverse_index[t] = t           for t >= L
//
// Gathering along the time axis with it reverses the real words
// of each row while padding stays at the tail. The backward LSTM
// runs on that view, so it never reads padding before the text.
// Applying the same gather again restores the original order.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::TextSample;

/// Per-row time reversal of the first `seq_len` positions
pub fn reverse_positions(seq_len: usize, max_seq_len: usize) -> Vec<i32> {
    (0..max_seq_len)
        .map(|t| if t < seq_len { (seq_len - 1 - t) as i32 } else { t as i32 })
        .collect()
}

#[derive(Debug, Clone)]
pub struct TextBatch<B: Backend> {
    /// Word ids — shape: [batch_size, max_seq_len]
    pub word_ids: Tensor<B, 2, Int>,

    /// True lengths — shape: [batch_size]
    pub seq_lens: Tensor<B, 1, Int>,

    /// Length-aware reversal index — shape: [batch_size, max_seq_len]
    pub reverse_index: Tensor<B, 2, Int>,

    /// Class ids — shape: [batch_size]
    pub labels: Tensor<B, 1, Int>,
}

#[derive(Clone, Debug)]
pub struct TextBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> TextBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<TextSample, TextBatch<B>> for TextBatcher<B> {
    fn batch(&self, items: Vec<TextSample>) -> TextBatch<B> {
        let batch_size = items.len();
        // Samples are pre-padded to the same length
        let seq_len    = items[0].word_ids.len();

        let ids_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.word_ids.iter().map(|&x| x as i32))
            .collect();

        let reverse_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| reverse_positions(s.seq_len, seq_len))
            .collect();

        let lens: Vec<i32> = items.iter().map(|s| s.seq_len as i32).collect();
        let labels: Vec<i32> = items.iter().map(|s| s.label as i32).collect();

        let word_ids = Tensor::<B, 2, Int>::from_ints(
            TensorData::new(ids_flat, [batch_size, seq_len]), &self.device,
        );
        let reverse_index = Tensor::<B, 2, Int>::from_ints(
            TensorData::new(reverse_flat, [batch_size, seq_len]), &self.device,
        );
        let seq_lens = Tensor::<B, 1, Int>::from_ints(
            TensorData::new(lens, [batch_size]), &self.device,
        );
        let labels = Tensor::<B, 1, Int>::from_ints(
            TensorData::new(labels, [batch_size]), &self.device,
        );

        TextBatch { word_ids, seq_lens, reverse_index, labels }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_reverse_positions() {
        assert_eq!(reverse_positions(3, 5), vec![2, 1, 0, 3, 4]);
        assert_eq!(reverse_positions(5, 5), vec![4, 3, 2, 1, 0]);
        assert_eq!(reverse_positions(1, 3), vec![0, 1, 2]);
    }

    #[test]
    fn test_reverse_positions_is_an_involution() {
        for len in 1..=6 {
            let idx = reverse_positions(len, 6);
            for t in 0..6 {
                assert_eq!(idx[idx[t] as usize] as usize, t);
            }
        }
    }

    #[test]
    fn test_batch_shapes_and_values() {
        let batcher = TextBatcher::<TestBackend>::new(Default::default());
        let batch = batcher.batch(vec![
            TextSample { word_ids: vec![5, 6, 0, 0], seq_len: 2, label: 1 },
            TextSample { word_ids: vec![7, 8, 9, 2], seq_len: 4, label: 0 },
        ]);

        assert_eq!(batch.word_ids.dims(), [2, 4]);
        assert_eq!(batch.reverse_index.dims(), [2, 4]);
        assert_eq!(batch.seq_lens.dims(), [2]);

        let lens: Vec<i64> = batch.seq_lens.into_data().iter::<i64>().collect();
        assert_eq!(lens, vec![2, 4]);

        let labels: Vec<i64> = batch.labels.into_data().iter::<i64>().collect();
        assert_eq!(labels, vec![1, 0]);

        let rev: Vec<i64> = batch.reverse_index.into_data().iter::<i64>().collect();
        assert_eq!(rev, vec![1, 0, 2, 3, 3, 2, 1, 0]);
    }
}
