// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Persists the best model seen on the dev set and the config
// needed to rebuild it.
//
// What one checkpoint holds:
//   1. Model parameters   (textrnn_best_model.mpk.gz)
//   2. Optimizer state    (textrnn_best_optim.mpk.gz)
//   3. Metadata           (textrnn_best.json: epoch, global step,
//                          dev loss, dev micro-F1)
//
// Alongside it, train_config.json stores the vocabulary size,
// label count and layer sizes so `test` and `predict` can
// reconstruct the exact architecture before loading weights.
//
// A new best overwrites the previous one; there is only ever one
// best checkpoint per output directory.
//
// Burn's CompactRecorder:
//   - Serialises records to MessagePack, gzip-compressed
//   - Stores floats at half precision
//   - Loading fails if the architecture doesn't match
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{Context, Result};
use burn::{
    optim::Optimizer,
    prelude::*,
    record::{CompactRecorder, Recorder},
    tensor::backend::AutodiffBackend,
};
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}};

use crate::application::train_use_case::TrainConfig;
use crate::ml::model::TextRnn;

const MODEL_FILE:  &str = "textrnn_best_model";
const OPTIM_FILE:  &str = "textrnn_best_optim";
const META_FILE:   &str = "textrnn_best.json";
const CONFIG_FILE: &str = "train_config.json";

// CompactRecorder appends its own extension
const MODEL_FILE_GZ: &str = "textrnn_best_model.mpk.gz";
const OPTIM_FILE_GZ: &str = "textrnn_best_optim.mpk.gz";

/// Scalar state stored with the best checkpoint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckpointMeta {
    /// Zero-based epoch during which the checkpoint was taken
    pub epoch:       usize,
    /// Optimizer steps taken when the checkpoint was taken
    pub global_step: usize,
    /// Summed dev loss at that point
    pub loss:        f64,
    /// Dev micro-F1 that made this the best checkpoint
    pub micro_f1:    f64,
}

pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create the manager, creating the directory if needed
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create checkpoint directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// True once a best checkpoint has been written
    pub fn has_checkpoint(&self) -> bool {
        self.dir.join(META_FILE).exists()
    }

    /// Remove the best checkpoint so a fresh run cannot mistake an
    /// earlier run's weights for its own. Metadata goes first.
    pub fn clear_best(&self) -> Result<()> {
        for name in [META_FILE, MODEL_FILE_GZ, OPTIM_FILE_GZ] {
            let path = self.dir.join(name);
            if path.exists() {
                fs::remove_file(&path)
                    .with_context(|| format!("Cannot remove stale checkpoint file '{}'", path.display()))?;
            }
        }
        Ok(())
    }

    /// Write model, optimizer state and metadata as the new best
    pub fn save_best<B, O>(
        &self,
        model: &TextRnn<B>,
        optim: &O,
        meta:  &CheckpointMeta,
    ) -> Result<()>
    where
        B: AutodiffBackend,
        O: Optimizer<TextRnn<B>, B>,
    {
        let recorder = CompactRecorder::new();

        let model_path = self.dir.join(MODEL_FILE);
        <CompactRecorder as Recorder<B>>::record(&recorder, model.clone().into_record(), model_path.clone())
            .with_context(|| format!("Failed to save model to '{}'", model_path.display()))?;

        let optim_path = self.dir.join(OPTIM_FILE);
        <CompactRecorder as Recorder<B>>::record(&recorder, optim.to_record(), optim_path.clone())
            .with_context(|| format!("Failed to save optimizer state to '{}'", optim_path.display()))?;

        // Metadata last: its presence marks a complete checkpoint
        let meta_path = self.dir.join(META_FILE);
        fs::write(&meta_path, serde_json::to_string_pretty(meta)?)
            .with_context(|| format!("Failed to write '{}'", meta_path.display()))?;

        tracing::debug!(
            "Saved checkpoint: epoch {}, step {}, micro_f1 {:.4}",
            meta.epoch, meta.global_step, meta.micro_f1
        );
        Ok(())
    }

    /// Restore model and optimizer state from the best checkpoint
    pub fn load_best<B, O>(
        &self,
        model:  TextRnn<B>,
        optim:  O,
        device: &B::Device,
    ) -> Result<(TextRnn<B>, O, CheckpointMeta)>
    where
        B: AutodiffBackend,
        O: Optimizer<TextRnn<B>, B>,
    {
        let meta  = self.load_meta()?;
        let model = self.load_model(model, device)?;

        let optim_path = self.dir.join(OPTIM_FILE);
        let record: O::Record = <CompactRecorder as Recorder<B>>::load(
            &CompactRecorder::new(), optim_path.clone(), device,
        )
        .with_context(|| format!("Cannot load optimizer state '{}'", optim_path.display()))?;
        let optim = optim.load_record(record);

        tracing::info!(
            "Restored checkpoint from epoch {} (step {}, dev micro_f1 {:.4})",
            meta.epoch, meta.global_step, meta.micro_f1
        );
        Ok((model, optim, meta))
    }

    /// Restore only the model parameters. Works on any backend,
    /// so inference can skip autodiff entirely.
    pub fn load_model<B: Backend>(
        &self,
        model:  TextRnn<B>,
        device: &B::Device,
    ) -> Result<TextRnn<B>> {
        let path = self.dir.join(MODEL_FILE);
        let record = <CompactRecorder as Recorder<B>>::load(&CompactRecorder::new(), path.clone(), device)
            .with_context(|| {
                format!("Cannot load checkpoint '{}'. Have you trained the model first?",
                    path.display())
            })?;
        Ok(model.load_record(record))
    }

    pub fn load_meta(&self) -> Result<CheckpointMeta> {
        let path = self.dir.join(META_FILE);
        let json = fs::read_to_string(&path)
            .with_context(|| {
                format!("Cannot find '{}'. Have you run 'train' first?", path.display())
            })?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Save the training configuration to JSON. Called before
    /// training starts so every checkpoint can be rebuilt.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;
        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join(CONFIG_FILE);
        let json = fs::read_to_string(&path)
            .with_context(|| {
                format!(
                    "Cannot read config from '{}'. \
                     Make sure you have run 'train' before 'test' or 'predict'.",
                    path.display()
                )
            })?;
        Ok(serde_json::from_str(&json)?)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{Autodiff, NdArray};
    use burn::data::dataloader::batcher::Batcher;
    use burn::optim::AdamWConfig;

    use crate::data::{batcher::TextBatcher, dataset::TextSample};
    use crate::ml::model::TextRnnConfig;

    type TestBackend = Autodiff<NdArray>;

    #[test]
    fn test_config_round_trip() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path()).unwrap();
        let mut cfg = TrainConfig::default();
        cfg.vocab_size = 1234;
        cfg.num_labels = 10;
        ckpt.save_config(&cfg).unwrap();

        let loaded = ckpt.load_config().unwrap();
        assert_eq!(loaded.vocab_size, 1234);
        assert_eq!(loaded.num_labels, 10);
        assert_eq!(loaded.hidden_size, cfg.hidden_size);
    }

    #[test]
    fn test_missing_checkpoint_is_reported() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path().join("nested")).unwrap();
        assert!(!ckpt.has_checkpoint());
        assert!(ckpt.load_meta().is_err());
        assert!(ckpt.load_config().is_err());
    }

    #[test]
    fn test_clear_best_removes_all_checkpoint_files() {
        let dir    = tempfile::tempdir().unwrap();
        let ckpt   = CheckpointManager::new(dir.path()).unwrap();
        let device = Default::default();

        let model: TextRnn<TestBackend> = TextRnnConfig::new(6, 4, 3, 1, false, 0.0, 2).init(&device);
        let optim = AdamWConfig::new().init::<TestBackend, TextRnn<TestBackend>>();
        let meta  = CheckpointMeta { epoch: 0, global_step: 3, loss: 1.0, micro_f1: 1.0 };
        ckpt.save_best(&model, &optim, &meta).unwrap();
        ckpt.save_config(&TrainConfig::default()).unwrap();
        assert!(dir.path().join(MODEL_FILE_GZ).exists());
        assert!(dir.path().join(OPTIM_FILE_GZ).exists());

        ckpt.clear_best().unwrap();
        assert!(!ckpt.has_checkpoint());
        assert!(!dir.path().join(MODEL_FILE_GZ).exists());
        assert!(!dir.path().join(OPTIM_FILE_GZ).exists());
        // The run config is not part of the checkpoint
        assert!(ckpt.load_config().is_ok());

        // Clearing an empty directory is fine
        ckpt.clear_best().unwrap();
    }

    #[test]
    fn test_best_checkpoint_restores_model_and_meta() {
        let dir    = tempfile::tempdir().unwrap();
        let ckpt   = CheckpointManager::new(dir.path()).unwrap();
        let device = Default::default();
        let config = TextRnnConfig::new(12, 4, 3, 1, true, 0.0, 2);

        let model: TextRnn<TestBackend> = config.init(&device);
        let optim = AdamWConfig::new().init::<TestBackend, TextRnn<TestBackend>>();
        let meta  = CheckpointMeta { epoch: 1, global_step: 200, loss: 3.5, micro_f1: 0.75 };
        ckpt.save_best(&model, &optim, &meta).unwrap();
        assert!(ckpt.has_checkpoint());

        let fresh: TextRnn<TestBackend> = config.init(&device);
        let fresh_optim = AdamWConfig::new().init::<TestBackend, TextRnn<TestBackend>>();
        let (restored, _optim, restored_meta) = ckpt.load_best(fresh, fresh_optim, &device).unwrap();
        assert_eq!(restored_meta, meta);

        let batch = TextBatcher::<TestBackend>::new(device).batch(vec![
            TextSample { word_ids: vec![3, 7, 11, 0], seq_len: 3, label: 1 },
        ]);
        let expected: Vec<f32> = model
            .forward(batch.word_ids.clone(), batch.seq_lens.clone(), batch.reverse_index.clone())
            .into_data().iter::<f32>().collect();
        let actual: Vec<f32> = restored
            .forward(batch.word_ids, batch.seq_lens, batch.reverse_index)
            .into_data().iter::<f32>().collect();

        // CompactRecorder stores half precision
        for (e, a) in expected.iter().zip(&actual) {
            assert!((e - a).abs() < 1e-2, "{e} vs {a}");
        }
    }
}
