// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates a full training run in order:
//
//   Step 1: Validate config, seed the backend     (Layer 2)
//   Step 2: Read vocab.txt and labels.txt         (Layer 4 - data)
//   Step 3: Load, clean, segment, encode splits   (Layer 4 - data)
//   Step 4: Drop a stale checkpoint, save config  (Layer 6 - infra)
//   Step 5: Build model (+ pretrained vectors)    (Layer 5 - ml)
//   Step 6: Optionally resume from checkpoint     (Layer 6 - infra)
//   Step 7: Run the training loop                 (Layer 5 - ml)
//   Step 8: Score the test split, if present      (Layer 2 - test)
//
// Reference: Burn Book §5 (Training)

use anyhow::{bail, Result};
use burn::{
    prelude::*,
    tensor::backend::AutodiffBackend,
};
use serde::{Deserialize, Serialize};
use std::{path::Path, sync::Arc};

use crate::application::test_use_case::{score_test_split, TestReport};
use crate::data::{
    dataset::TextDataset,
    encoder::TextEncoder,
    loader::{read_labels, read_vocab, CorpusLoader},
    segmenter::JiebaSegmenter,
    splitter::split_train_dev,
};
use crate::domain::{labels::LabelMap, traits::CorpusSource, vocab::Vocab};
use crate::infra::{
    checkpoint::CheckpointManager,
    embedding_store::load_word2vec,
    metrics::MetricsLogger,
};
use crate::ml::{
    model::{TextRnn, TextRnnConfig},
    trainer::{adamw_config, Trainer},
};

// ─── Training Configuration ──────────────────────────────────────────────────
// Everything a run needs, serialisable so test / predict can rebuild
// the same model. vocab_size and num_labels are filled in from the
// vocabulary and label files when training starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub train_file:           String,
    pub dev_file:             Option<String>,
    pub test_file:            Option<String>,
    pub vocab_file:           String,
    pub labels_file:          String,
    pub output_dir:           String,
    pub pretrained_embedding: Option<String>,
    pub max_seq_len:          usize,
    pub train_batch_size:     usize,
    pub eval_batch_size:      usize,
    pub epochs:               usize,
    pub lr:                   f64,
    pub eval_steps:           usize,
    pub dev_fraction:         f64,
    pub seed:                 u64,
    pub num_workers:          usize,
    pub embedding_dim:        usize,
    pub hidden_size:          usize,
    pub num_layers:           usize,
    pub bidirectional:        bool,
    pub dropout:              f64,
    #[serde(default)]
    pub vocab_size:           usize,
    #[serde(default)]
    pub num_labels:           usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            train_file:           "data/cnews/raw_data/train.txt".to_string(),
            dev_file:             Some("data/cnews/raw_data/dev.txt".to_string()),
            test_file:            Some("data/cnews/raw_data/test.txt".to_string()),
            vocab_file:           "data/cnews/final_data/wiki_word/vocab.txt".to_string(),
            labels_file:          "data/cnews/final_data/wiki_word/labels.txt".to_string(),
            output_dir:           "checkpoints".to_string(),
            pretrained_embedding: None,
            max_seq_len:          256,
            train_batch_size:     64,
            eval_batch_size:      64,
            epochs:               10,
            lr:                   1e-3,
            eval_steps:           100,
            dev_fraction:         0.1,
            seed:                 123,
            num_workers:          2,
            embedding_dim:        300,
            hidden_size:          128,
            num_layers:           2,
            bidirectional:        true,
            dropout:              0.5,
            vocab_size:           0,
            num_labels:           0,
        }
    }
}

impl TrainConfig {
    /// Reject settings that would make the run meaningless
    /// or panic deep inside the pipeline.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("max_seq_len", self.max_seq_len),
            ("train_batch_size", self.train_batch_size),
            ("eval_batch_size", self.eval_batch_size),
            ("epochs", self.epochs),
            ("eval_steps", self.eval_steps),
            ("num_workers", self.num_workers),
            ("embedding_dim", self.embedding_dim),
            ("hidden_size", self.hidden_size),
            ("num_layers", self.num_layers),
        ];
        for (name, value) in positive {
            if value == 0 {
                bail!("{name} must be greater than 0");
            }
        }
        if self.lr.is_nan() || self.lr <= 0.0 {
            bail!("lr must be positive, got {}", self.lr);
        }
        if !(0.0..1.0).contains(&self.dropout) {
            bail!("dropout must be in [0, 1), got {}", self.dropout);
        }
        if !(0.0..1.0).contains(&self.dev_fraction) {
            bail!("dev_fraction must be in [0, 1), got {}", self.dev_fraction);
        }
        Ok(())
    }

    pub fn model_config(&self) -> TextRnnConfig {
        TextRnnConfig::new(
            self.vocab_size, self.embedding_dim, self.hidden_size,
            self.num_layers, self.bidirectional, self.dropout, self.num_labels,
        )
    }

    /// The vocabulary and labels on disk must still describe the
    /// model this config was saved with.
    pub fn check_matches(&self, vocab: &Vocab, labels: &LabelMap) -> Result<()> {
        if vocab.len() != self.vocab_size {
            bail!(
                "'{}' has {} words but the model was trained with {}",
                self.vocab_file, vocab.len(), self.vocab_size
            );
        }
        if labels.len() != self.num_labels {
            bail!(
                "'{}' has {} labels but the model was trained with {}",
                self.labels_file, labels.len(), self.num_labels
            );
        }
        Ok(())
    }
}

/// What a training run produced
#[derive(Debug)]
pub struct TrainOutcome {
    pub best_dev_micro_f1: f64,
    pub test:              Option<TestReport>,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
    resume: bool,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig, resume: bool) -> Self {
        Self { config, resume }
    }

    pub fn execute<B: AutodiffBackend>(&self, device: B::Device) -> Result<TrainOutcome> {
        // ── Step 1: Validate and seed ─────────────────────────────────────────
        self.config.validate()?;
        B::seed(self.config.seed);

        // ── Step 2: Vocabulary and labels ─────────────────────────────────────
        let vocab  = read_vocab(&self.config.vocab_file)?;
        let labels = read_labels(&self.config.labels_file)?;

        let mut cfg = self.config.clone();
        cfg.vocab_size = vocab.len();
        cfg.num_labels = labels.len();
        let vocab = Arc::new(vocab);

        // ── Step 3: Corpus splits ─────────────────────────────────────────────
        let encoder = TextEncoder::new(JiebaSegmenter::new(), vocab.clone(), cfg.max_seq_len);

        let train_examples = CorpusLoader::new(&cfg.train_file, &labels).load_all()?;
        let train_samples  = encoder.encode_all(&train_examples);

        let (train_samples, dev_samples) = match cfg.dev_file.as_deref().filter(|p| Path::new(p).exists()) {
            Some(dev_file) => {
                let dev_examples = CorpusLoader::new(dev_file, &labels).load_all()?;
                (train_samples, encoder.encode_all(&dev_examples))
            }
            None => {
                tracing::info!(
                    "No dev file; holding out {:.0}% of the training set",
                    cfg.dev_fraction * 100.0
                );
                split_train_dev(train_samples, cfg.dev_fraction, cfg.seed)
            }
        };
        tracing::info!("Split: {} train, {} dev", train_samples.len(), dev_samples.len());

        // ── Step 4: Stale checkpoint, config for test / predict ───────────────
        let ckpt = CheckpointManager::new(&cfg.output_dir)?;
        if !self.resume && ckpt.has_checkpoint() {
            tracing::warn!("Removing the previous best checkpoint in '{}'", cfg.output_dir);
            ckpt.clear_best()?;
        }
        ckpt.save_config(&cfg)?;

        // ── Step 5: Model and optimizer ───────────────────────────────────────
        let model_cfg = cfg.model_config();
        let model: TextRnn<B> = match &cfg.pretrained_embedding {
            Some(path) => {
                let table   = load_word2vec(path, &vocab, cfg.embedding_dim, cfg.seed)?;
                let weights = Tensor::<B, 2>::from_floats(
                    TensorData::new(table.values, [table.vocab_size, table.dim]), &device,
                );
                model_cfg.init_with_embedding(weights, &device)
            }
            None => model_cfg.init(&device),
        };
        tracing::info!(
            "Model ready: {} layer(s), hidden_size={}, bidirectional={}, {} labels",
            cfg.num_layers, cfg.hidden_size, cfg.bidirectional, cfg.num_labels
        );
        let optim = adamw_config().init::<B, TextRnn<B>>();

        let mut trainer = Trainer::new(cfg.clone(), model, optim, device, ckpt);

        // ── Step 6: Resume ────────────────────────────────────────────────────
        let status = CheckpointManager::new(&cfg.output_dir)?;
        if self.resume {
            if status.has_checkpoint() {
                let (restored, meta) = trainer.restore()?;
                tracing::info!("Resuming after epoch {} (step {})", meta.epoch, meta.global_step);
                trainer = restored;
            } else {
                tracing::warn!("--resume given but no checkpoint in '{}'; starting fresh", cfg.output_dir);
            }
        }

        // ── Step 7: Training loop (Layer 5) ───────────────────────────────────
        let metrics = MetricsLogger::new(&cfg.output_dir)?;
        let best_dev_micro_f1 = trainer.train(
            TextDataset::new(train_samples),
            TextDataset::new(dev_samples),
            &metrics,
        )?;

        // ── Step 8: Test split ────────────────────────────────────────────────
        let test = match cfg.test_file.as_deref().filter(|p| Path::new(p).exists()) {
            Some(test_file) if status.has_checkpoint() => {
                tracing::info!("======== testing ========");
                Some(score_test_split(trainer, &encoder, &labels, test_file)?)
            }
            Some(_) => {
                tracing::warn!("No checkpoint was saved (dev micro_f1 never rose above 0); skipping test");
                None
            }
            None => None,
        };

        Ok(TrainOutcome { best_dev_micro_f1, test })
    }
}
