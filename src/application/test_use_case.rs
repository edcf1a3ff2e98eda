// ============================================================
// Layer 2 — TestUseCase
// ============================================================
// Scores a held-out split with the best checkpoint:
//
//   Step 1: Reload train_config.json              (Layer 6 - infra)
//   Step 2: Read vocab / labels, check they match (Layer 4 - data)
//   Step 3: Rebuild model + optimizer             (Layer 5 - ml)
//   Step 4: Restore the checkpoint and evaluate   (Layer 5 - ml)
//   Step 5: Accuracy, F1 and per-class report     (Layer 5 - ml)

use anyhow::{Context, Result};
use burn::{
    optim::Optimizer,
    tensor::backend::AutodiffBackend,
};
use std::sync::Arc;

use crate::data::{
    dataset::TextDataset,
    encoder::TextEncoder,
    loader::{read_labels, read_vocab, CorpusLoader},
    segmenter::JiebaSegmenter,
};
use crate::domain::{
    labels::LabelMap,
    traits::{CorpusSource, Segmenter},
};
use crate::infra::checkpoint::{CheckpointManager, CheckpointMeta};
use crate::ml::{
    model::TextRnn,
    scoring::{ClassificationReport, ClassificationScores},
    trainer::{adamw_config, EvalOutput, Trainer},
};

/// Test-set results for the best checkpoint
#[derive(Debug)]
pub struct TestReport {
    pub output:     EvalOutput,
    pub scores:     ClassificationScores,
    pub report:     ClassificationReport,
    pub checkpoint: CheckpointMeta,
}

/// Load `test_file`, restore the trainer's best checkpoint and score it.
/// Shared by `train` (after the epoch loop) and `test`.
pub fn score_test_split<B, O, S>(
    trainer:   Trainer<B, O>,
    encoder:   &TextEncoder<S>,
    labels:    &LabelMap,
    test_file: &str,
) -> Result<TestReport>
where
    B: AutodiffBackend,
    O: Optimizer<TextRnn<B>, B>,
    S: Segmenter,
{
    let examples = CorpusLoader::new(test_file, labels).load_all()?;
    let dataset  = TextDataset::new(encoder.encode_all(&examples));

    let (output, checkpoint) = trainer.test(dataset)?;
    let scores = output.scores();
    let report = ClassificationReport::new(&output.predictions, &output.targets, labels.names());

    tracing::info!(
        "[test] loss: {:.6} accuracy: {:.4} micro_f1: {:.4} macro_f1: {:.4}",
        output.total_loss, scores.accuracy, scores.micro_f1, scores.macro_f1
    );
    tracing::info!("\n{}", report);

    Ok(TestReport { output, scores, report, checkpoint })
}

pub struct TestUseCase {
    output_dir: String,
    test_file:  Option<String>,
}

impl TestUseCase {
    /// `test_file` overrides the test split recorded at training time
    pub fn new(output_dir: impl Into<String>, test_file: Option<String>) -> Self {
        Self { output_dir: output_dir.into(), test_file }
    }

    pub fn execute<B: AutodiffBackend>(&self, device: B::Device) -> Result<TestReport> {
        let ckpt = CheckpointManager::new(&self.output_dir)?;
        let cfg  = ckpt.load_config()?;
        cfg.validate()?;

        let vocab  = read_vocab(&cfg.vocab_file)?;
        let labels = read_labels(&cfg.labels_file)?;
        cfg.check_matches(&vocab, &labels)?;

        let test_file = self
            .test_file
            .clone()
            .or_else(|| cfg.test_file.clone())
            .context("No test file given and none recorded in train_config.json")?;

        let encoder = TextEncoder::new(JiebaSegmenter::new(), Arc::new(vocab), cfg.max_seq_len);
        let model: TextRnn<B> = cfg.model_config().init(&device);
        let optim = adamw_config().init::<B, TextRnn<B>>();
        let trainer = Trainer::new(cfg, model, optim, device, ckpt);

        score_test_split(trainer, &encoder, &labels, &test_file)
    }
}
