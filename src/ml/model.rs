use burn::{
    module::Param,
    nn::{
        loss::CrossEntropyLossConfig,
        Dropout, DropoutConfig,
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
        Lstm, LstmConfig,
    },
    prelude::*,
};

use crate::data::batcher::TextBatch;

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct TextRnnConfig {
    pub vocab_size:    usize,
    pub embedding_dim: usize,
    pub hidden_size:   usize,
    pub num_layers:    usize,
    pub bidirectional: bool,
    pub dropout:       f64,
    pub num_labels:    usize,
}

impl TextRnnConfig {
    /// Model with a randomly initialised embedding table
    pub fn init<B: Backend>(&self, device: &B::Device) -> TextRnn<B> {
        let embedding = EmbeddingConfig::new(self.vocab_size, self.embedding_dim).init(device);
        self.build(embedding, device)
    }

    /// Model whose embedding table starts from `weights`
    /// ([vocab_size, embedding_dim]), e.g. pretrained word vectors.
    pub fn init_with_embedding<B: Backend>(
        &self,
        weights: Tensor<B, 2>,
        device:  &B::Device,
    ) -> TextRnn<B> {
        assert_eq!(
            weights.dims(),
            [self.vocab_size, self.embedding_dim],
            "embedding weights must be [vocab_size, embedding_dim]"
        );
        let mut embedding = EmbeddingConfig::new(self.vocab_size, self.embedding_dim).init(device);
        embedding.weight = Param::from_tensor(weights);
        self.build(embedding, device)
    }

    fn build<B: Backend>(&self, embedding: Embedding<B>, device: &B::Device) -> TextRnn<B> {
        assert!(self.num_layers > 0, "TextRnn needs at least one recurrent layer");
        let directions = if self.bidirectional { 2 } else { 1 };

        let layer_input = |layer: usize| {
            if layer == 0 { self.embedding_dim } else { self.hidden_size * directions }
        };

        let forward_layers: Vec<Lstm<B>> = (0..self.num_layers)
            .map(|l| LstmConfig::new(layer_input(l), self.hidden_size, true).init(device))
            .collect();

        let backward_layers: Vec<Lstm<B>> = if self.bidirectional {
            (0..self.num_layers)
                .map(|l| LstmConfig::new(layer_input(l), self.hidden_size, true).init(device))
                .collect()
        } else {
            Vec::new()
        };

        let classifier = LinearConfig::new(self.hidden_size * directions, self.num_labels).init(device);
        let dropout    = DropoutConfig::new(self.dropout).init();

        TextRnn {
            embedding,
            forward_layers,
            backward_layers,
            dropout,
            classifier,
            hidden_size: self.hidden_size,
        }
    }
}

/// Stacked (bi)directional LSTM text classifier.
///
/// The backward layers read each row reversed within its true
/// length (see `TextBatch::reverse_index`), so padding never
/// reaches either recurrent state that feeds the classifier.
#[derive(Module, Debug)]
pub struct TextRnn<B: Backend> {
    pub embedding:       Embedding<B>,
    pub forward_layers:  Vec<Lstm<B>>,
    pub backward_layers: Vec<Lstm<B>>,
    pub dropout:         Dropout,
    pub classifier:      Linear<B>,
    pub hidden_size:     usize,
}

/// Gather along the time axis with a per-row index [batch, seq]
fn reorder_steps<B: Backend>(x: Tensor<B, 3>, index: &Tensor<B, 2, Int>) -> Tensor<B, 3> {
    let [batch_size, seq_len, dim] = x.dims();
    let index = index.clone()
        .reshape([batch_size, seq_len, 1])
        .expand([batch_size, seq_len, dim]);
    x.gather(1, index)
}

/// Pick one time step per row: positions [batch] → [batch, dim]
fn step_at<B: Backend>(x: Tensor<B, 3>, positions: Tensor<B, 1, Int>) -> Tensor<B, 2> {
    let [batch_size, _, dim] = x.dims();
    let index = positions
        .reshape([batch_size, 1, 1])
        .expand([batch_size, 1, dim]);
    x.gather(1, index).reshape([batch_size, dim])
}

impl<B: Backend> TextRnn<B> {
    pub fn is_bidirectional(&self) -> bool {
        !self.backward_layers.is_empty()
    }

    /// word_ids, reverse_index: [batch, seq_len]; seq_lens: [batch]
    /// → logits: [batch, num_labels]
    pub fn forward(
        &self,
        word_ids:      Tensor<B, 2, Int>,
        seq_lens:      Tensor<B, 1, Int>,
        reverse_index: Tensor<B, 2, Int>,
    ) -> Tensor<B, 2> {
        let [batch_size, _] = word_ids.dims();
        let hidden = self.hidden_size;

        let mut x = self.embedding.forward(word_ids); // [batch, seq_len, embedding_dim]

        for (layer, forward_lstm) in self.forward_layers.iter().enumerate() {
            if layer > 0 {
                x = self.dropout.forward(x);
            }
            let (forward_out, _) = forward_lstm.forward(x.clone(), None);

            x = match self.backward_layers.get(layer) {
                Some(backward_lstm) => {
                    let (reversed_out, _) = backward_lstm.forward(reorder_steps(x, &reverse_index), None);
                    // Back to the original order so both directions line up per step
                    let backward_out = reorder_steps(reversed_out, &reverse_index);
                    Tensor::cat(vec![forward_out, backward_out], 2)
                }
                None => forward_out,
            };
        }

        // Forward direction: state after the last real word.
        let last = step_at(x.clone(), seq_lens.sub_scalar(1));
        let features = if self.is_bidirectional() {
            let forward_state = last.slice([0..batch_size, 0..hidden]);
            // Backward direction: position 0 has consumed the whole text.
            let backward_state = x
                .slice([0..batch_size, 0..1, hidden..2 * hidden])
                .reshape([batch_size, hidden]);
            Tensor::cat(vec![forward_state, backward_state], 1)
        } else {
            last
        };

        self.classifier.forward(self.dropout.forward(features))
    }

    /// Forward pass plus cross-entropy against the batch labels.
    /// Returns (loss [1], logits [batch, num_labels]).
    pub fn forward_classification(&self, batch: TextBatch<B>) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let logits = self.forward(batch.word_ids, batch.seq_lens, batch.reverse_index);
        let ce = CrossEntropyLossConfig::new().init(&logits.device());
        let loss = ce.forward(logits.clone(), batch.labels);
        (loss, logits)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::data::dataloader::batcher::Batcher;

    use crate::data::{batcher::TextBatcher, dataset::TextSample};

    type TestBackend = NdArray;

    fn config(bidirectional: bool) -> TextRnnConfig {
        TextRnnConfig::new(10, 6, 5, 2, bidirectional, 0.0, 3)
    }

    fn batch(device: &<TestBackend as Backend>::Device) -> TextBatch<TestBackend> {
        TextBatcher::<TestBackend>::new(device.clone()).batch(vec![
            TextSample { word_ids: vec![2, 3, 4, 0, 0], seq_len: 3, label: 0 },
            TextSample { word_ids: vec![5, 6, 7, 8, 9], seq_len: 5, label: 2 },
        ])
    }

    #[test]
    fn test_logit_shape() {
        let device = Default::default();
        for bidirectional in [true, false] {
            let model: TextRnn<TestBackend> = config(bidirectional).init(&device);
            let b = batch(&device);
            let logits = model.forward(b.word_ids, b.seq_lens, b.reverse_index);
            assert_eq!(logits.dims(), [2, 3]);
        }
    }

    #[test]
    fn test_padding_does_not_change_logits() {
        // The same text padded to two different lengths must score the same
        let device = Default::default();
        let model: TextRnn<TestBackend> = config(true).init(&device);
        let batcher = TextBatcher::<TestBackend>::new(device);

        let short = batcher.batch(vec![TextSample { word_ids: vec![2, 3, 4, 0], seq_len: 3, label: 0 }]);
        let long  = batcher.batch(vec![TextSample { word_ids: vec![2, 3, 4, 0, 0, 0, 0], seq_len: 3, label: 0 }]);

        let a: Vec<f32> = model
            .forward(short.word_ids, short.seq_lens, short.reverse_index)
            .into_data().iter::<f32>().collect();
        let b: Vec<f32> = model
            .forward(long.word_ids, long.seq_lens, long.reverse_index)
            .into_data().iter::<f32>().collect();

        for (x, y) in a.iter().zip(&b) {
            assert!((x - y).abs() < 1e-5, "{x} vs {y}");
        }
    }

    #[test]
    fn test_loss_is_finite_and_positive() {
        let device = Default::default();
        let model: TextRnn<TestBackend> = config(true).init(&device);
        let (loss, logits) = model.forward_classification(batch(&device));
        let loss: f32 = loss.into_scalar().elem();
        assert!(loss.is_finite() && loss > 0.0);
        assert_eq!(logits.dims(), [2, 3]);
    }

    #[test]
    fn test_init_with_embedding_uses_weights() {
        let device = Default::default();
        let weights = Tensor::<TestBackend, 2>::ones([10, 6], &device);
        let model = config(false).init_with_embedding(weights, &device);
        let sum: f32 = model.embedding.weight.val().sum().into_scalar().elem();
        assert_eq!(sum, 60.0);
    }
}
