// ============================================================
// Layer 5 — Predictor
// ============================================================
// Single-text inference from the best checkpoint:
//
//   clean → segment → ids (unknown → 1) → pad / truncate
//   → forward pass → softmax → argmax → label name
//
// Runs on a plain (non-autodiff) backend, so dropout is off and
// no gradient graph is recorded.

use anyhow::Result;
use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
    tensor::activation::softmax,
};
use std::sync::Arc;

use crate::data::{
    batcher::TextBatcher,
    dataset::TextSample,
    encoder::TextEncoder,
    loader::{read_labels, read_vocab},
};
use crate::domain::{
    example::Prediction,
    labels::LabelMap,
    traits::{Segmenter, TextClassifier},
};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::TextRnn;

/// Answer given when the predicted class has no name in labels.txt
pub const UNRECOGNISED: &str = "不好意思，我没有识别出来";

pub struct Predictor<B: Backend, S: Segmenter> {
    model:   TextRnn<B>,
    encoder: TextEncoder<S>,
    labels:  LabelMap,
    batcher: TextBatcher<B>,
}

impl<B: Backend, S: Segmenter> Predictor<B, S> {
    pub fn new(model: TextRnn<B>, encoder: TextEncoder<S>, labels: LabelMap, device: B::Device) -> Self {
        Self { model, encoder, labels, batcher: TextBatcher::new(device) }
    }

    /// Rebuild the model from train_config.json and load the best
    /// weights. Vocabulary and labels come from the paths recorded
    /// at training time.
    pub fn from_checkpoint(ckpt: &CheckpointManager, segmenter: S, device: B::Device) -> Result<Self> {
        let cfg    = ckpt.load_config()?;
        cfg.validate()?;
        let vocab  = read_vocab(&cfg.vocab_file)?;
        let labels = read_labels(&cfg.labels_file)?;
        cfg.check_matches(&vocab, &labels)?;

        let model: TextRnn<B> = cfg.model_config().init(&device);
        let model = ckpt.load_model(model, &device)?;
        tracing::info!("Model loaded from checkpoint in '{}'", ckpt.dir().display());

        let encoder = TextEncoder::new(segmenter, Arc::new(vocab), cfg.max_seq_len);
        Ok(Self::new(model, encoder, labels, device))
    }

    pub fn labels(&self) -> &LabelMap {
        &self.labels
    }

    pub fn predict(&self, text: &str) -> Result<Prediction> {
        let encoded = self.encoder.encode(text);
        tracing::debug!("Encoded {} words: {:?}", encoded.seq_len, &encoded.word_ids[..encoded.seq_len]);

        let batch = self.batcher.batch(vec![TextSample {
            word_ids: encoded.word_ids,
            seq_len:  encoded.seq_len,
            label:    0,
        }]);

        let logits = self.model.forward(batch.word_ids, batch.seq_lens, batch.reverse_index);
        let probs: Vec<f32> = softmax(logits, 1).into_data().iter::<f32>().collect();

        let (label_id, confidence) = probs
            .iter()
            .copied()
            .enumerate()
            .fold((0usize, f32::NEG_INFINITY), |best, (i, p)| if p > best.1 { (i, p) } else { best });

        let label = self.labels.name(label_id).unwrap_or(UNRECOGNISED).to_string();
        Ok(Prediction { label_id, label, confidence })
    }
}

impl<B: Backend, S: Segmenter> TextClassifier for Predictor<B, S> {
    fn classify(&self, text: &str) -> Result<Prediction> {
        self.predict(text)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::module::Param;

    use crate::data::segmenter::WhitespaceSegmenter;
    use crate::domain::vocab::Vocab;
    use crate::ml::model::TextRnnConfig;

    type TestBackend = NdArray;

    fn predictor(num_labels: usize, label_names: &[&str]) -> Predictor<TestBackend, WhitespaceSegmenter> {
        let device = Default::default();
        let vocab  = Vocab::from_lines(["<PAD>", "<UNK>", "国足", "备战", "股市"]).unwrap();
        let labels = LabelMap::from_lines(label_names.iter().copied()).unwrap();
        let model: TextRnn<TestBackend> = TextRnnConfig::new(5, 4, 3, 1, true, 0.0, num_labels).init(&device);
        let encoder = TextEncoder::new(WhitespaceSegmenter, Arc::new(vocab), 6);
        Predictor::new(model, encoder, labels, device)
    }

    #[test]
    fn test_prediction_is_a_known_label() {
        let p = predictor(3, &["体育", "财经", "房产"]);
        let pred = p.classify("国足 备战").unwrap();
        assert!(pred.label_id < 3);
        assert_eq!(Some(pred.label.as_str()), p.labels().name(pred.label_id));
        assert!(pred.confidence > 0.0 && pred.confidence <= 1.0);
    }

    #[test]
    fn test_empty_and_unknown_text_still_predict() {
        let p = predictor(2, &["体育", "财经"]);
        assert!(p.predict("").is_ok());
        assert!(p.predict("完全 陌生 的 词").is_ok());
    }

    #[test]
    fn test_unnamed_class_gives_fallback_answer() {
        // One label name for a two-class head; the bias makes class 1 win
        let mut p = predictor(2, &["体育"]);
        let device = Default::default();
        p.model.classifier.weight = Param::from_tensor(Tensor::zeros([6, 2], &device));
        p.model.classifier.bias = Some(Param::from_tensor(Tensor::from_floats([0.0, 5.0], &device)));

        let pred = p.predict("股市").unwrap();
        assert_eq!(pred.label_id, 1);
        assert_eq!(pred.label, UNRECOGNISED);
        assert!(pred.confidence > 0.99);
    }
}
