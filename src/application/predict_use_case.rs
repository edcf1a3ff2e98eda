// ============================================================
// Layer 2 — PredictUseCase
// ============================================================
// Classifies free text with the best checkpoint, either one
// sentence at a time or every line of a labelled file (printing
// the true label next to the prediction).

use anyhow::Result;
use burn::prelude::*;

use crate::data::{loader::CorpusLoader, segmenter::JiebaSegmenter};
use crate::domain::{
    example::Prediction,
    traits::{CorpusSource, TextClassifier},
};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::inferencer::Predictor;

/// One line of a labelled prediction file
#[derive(Debug, Clone)]
pub struct LabeledPrediction {
    pub text:       String,
    pub true_label: String,
    pub prediction: Prediction,
}

impl LabeledPrediction {
    pub fn is_correct(&self) -> bool {
        self.true_label == self.prediction.label
    }
}

pub struct PredictUseCase<B: Backend> {
    predictor: Predictor<B, JiebaSegmenter>,
}

impl<B: Backend> PredictUseCase<B> {
    pub fn new(output_dir: &str, device: B::Device) -> Result<Self> {
        let ckpt      = CheckpointManager::new(output_dir)?;
        let predictor = Predictor::from_checkpoint(&ckpt, JiebaSegmenter::new(), device)?;
        Ok(Self { predictor })
    }

    pub fn predict(&self, text: &str) -> Result<Prediction> {
        self.predictor.classify(text)
    }

    /// Predict every example in a labelled file
    pub fn predict_file(&self, path: &str) -> Result<Vec<LabeledPrediction>> {
        let labels   = self.predictor.labels();
        let examples = CorpusLoader::new(path, labels).load_all()?;

        examples
            .into_iter()
            .map(|ex| -> Result<LabeledPrediction> {
                let prediction = self.predictor.classify(&ex.text)?;
                Ok(LabeledPrediction {
                    true_label: labels.name(ex.label).unwrap_or_default().to_string(),
                    text: ex.text,
                    prediction,
                })
            })
            .collect()
    }
}

/// Fraction of predictions that match their true label
pub fn file_accuracy(rows: &[LabeledPrediction]) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }
    rows.iter().filter(|r| r.is_correct()).count() as f64 / rows.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    use crate::application::test_support::{train, write_corpus};

    fn row(true_label: &str, predicted: &str) -> LabeledPrediction {
        LabeledPrediction {
            text: "文本".to_string(),
            true_label: true_label.to_string(),
            prediction: Prediction { label_id: 0, label: predicted.to_string(), confidence: 0.9 },
        }
    }

    #[test]
    fn test_file_accuracy() {
        assert_eq!(file_accuracy(&[]), 0.0);
        let rows = [row("体育", "体育"), row("财经", "体育"), row("财经", "财经"), row("房产", "财经")];
        assert_eq!(file_accuracy(&rows), 0.5);
    }

    #[test]
    fn test_predicts_from_trained_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = write_corpus(dir.path());
        train(&cfg, false);

        let use_case = PredictUseCase::<NdArray>::new(&cfg.output_dir, Default::default()).unwrap();
        let prediction = use_case.predict("国足比赛进球").unwrap();
        assert!(["体育", "财经"].contains(&prediction.label.as_str()));
        assert!(prediction.confidence >= 0.5 && prediction.confidence <= 1.0);

        let rows = use_case.predict_file(cfg.test_file.as_deref().unwrap()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].true_label, "体育");
        assert_eq!(rows[1].true_label, "财经");
        assert_eq!(rows[1].text, "基金 上涨");
        let acc = file_accuracy(&rows);
        assert!((0.0..=1.0).contains(&acc));
    }

    #[test]
    fn test_invalid_saved_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = write_corpus(dir.path());
        train(&cfg, false);

        let ckpt = CheckpointManager::new(&cfg.output_dir).unwrap();
        let mut saved = ckpt.load_config().unwrap();
        saved.max_seq_len = 0;
        ckpt.save_config(&saved).unwrap();

        assert!(PredictUseCase::<NdArray>::new(&cfg.output_dir, Default::default()).is_err());
    }

    #[test]
    fn test_missing_checkpoint_fails() {
        let dir = tempfile::tempdir().unwrap();
        let res = PredictUseCase::<NdArray>::new(dir.path().to_str().unwrap(), Default::default());
        assert!(res.is_err());
    }
}
