// ============================================================
// Layer 5 — Trainer
// ============================================================
// The five-stage pipeline around TextRnn:
//
//   train → periodic dev eval → best checkpoint → test → predict
//
// Training:
//   - AdamW step per mini-batch on the autodiff backend
//   - every `eval_steps` optimizer steps, score the dev set on
//     the inner backend (model.valid(): no autodiff, no dropout)
//   - a strictly better dev micro-F1 overwrites the best
//     checkpoint (model + optimizer + epoch + dev loss)
//   - if the run ends between evaluation points, one final dev
//     evaluation runs so short runs still get a checkpoint
//
// Testing reloads the best checkpoint and scores the test set.
//
// Reference: Burn Book §5 (Custom Training Loop)
//            Loshchilov & Hutter (2019) AdamW

use anyhow::{bail, Result};
use burn::{
    data::dataloader::{DataLoader, DataLoaderBuilder},
    module::AutodiffModule,
    optim::{AdamWConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};
use std::sync::Arc;

use crate::application::train_use_case::TrainConfig;
use crate::data::{
    batcher::{TextBatch, TextBatcher},
    dataset::TextDataset,
};
use crate::infra::{
    checkpoint::{CheckpointManager, CheckpointMeta},
    metrics::{EvalRecord, MetricsLogger},
};
use crate::ml::{
    model::TextRnn,
    scoring::{score, ClassificationScores},
};

/// Decoupled weight decay applied by every AdamW optimizer we build
pub const WEIGHT_DECAY: f32 = 0.01;

/// AdamW as used for training, resuming and testing
pub fn adamw_config() -> AdamWConfig {
    AdamWConfig::new().with_weight_decay(WEIGHT_DECAY)
}

/// Summed loss, predicted ids and true ids over one evaluation set
#[derive(Debug, Clone, Default)]
pub struct EvalOutput {
    pub total_loss:  f64,
    pub predictions: Vec<usize>,
    pub targets:     Vec<usize>,
}

impl EvalOutput {
    pub fn scores(&self) -> ClassificationScores {
        score(&self.predictions, &self.targets)
    }
}

/// Where the step counter and best score stand. Fresh runs
/// start at zero; resumed runs start from checkpoint metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrainState {
    pub start_epoch:   usize,
    pub global_step:   usize,
    pub best_micro_f1: f64,
}

impl From<CheckpointMeta> for TrainState {
    fn from(meta: CheckpointMeta) -> Self {
        Self {
            start_epoch:   meta.epoch + 1,
            global_step:   meta.global_step,
            best_micro_f1: meta.micro_f1,
        }
    }
}

/// Score `model` on every batch of `loader` without gradients.
pub fn evaluate<B: Backend>(
    model:  &TextRnn<B>,
    loader: &Arc<dyn DataLoader<TextBatch<B>>>,
) -> EvalOutput {
    let mut out = EvalOutput::default();

    for batch in loader.iter() {
        let labels = batch.labels.clone();
        let (loss, logits) = model.forward_classification(batch);
        out.total_loss += loss.into_scalar().elem::<f64>();

        // argmax(1) returns shape [batch, 1] — flatten to [batch]
        let predicted = logits.argmax(1).flatten::<1>(0, 1);
        out.predictions.extend(predicted.into_data().iter::<i64>().map(|v| v as usize));
        out.targets.extend(labels.into_data().iter::<i64>().map(|v| v as usize));
    }

    out
}

pub struct Trainer<B: AutodiffBackend, O> {
    cfg:         TrainConfig,
    model:       TextRnn<B>,
    optim:       O,
    device:      B::Device,
    checkpoints: CheckpointManager,
    state:       TrainState,
}

impl<B, O> Trainer<B, O>
where
    B: AutodiffBackend,
    O: Optimizer<TextRnn<B>, B>,
{
    pub fn new(
        cfg:         TrainConfig,
        model:       TextRnn<B>,
        optim:       O,
        device:      B::Device,
        checkpoints: CheckpointManager,
    ) -> Self {
        Self { cfg, model, optim, device, checkpoints, state: TrainState::default() }
    }

    /// Swap in model and optimizer state from the best checkpoint.
    /// Training continues from the epoch after the checkpoint.
    pub fn restore(self) -> Result<(Self, CheckpointMeta)> {
        let Self { cfg, model, optim, device, checkpoints, .. } = self;
        let (model, optim, meta) = checkpoints.load_best(model, optim, &device)?;
        let trainer = Self { cfg, model, optim, device, checkpoints, state: meta.into() };
        Ok((trainer, meta))
    }

    #[cfg(test)]
    pub fn state(&self) -> TrainState {
        self.state
    }

    fn eval_loader(&self, dataset: TextDataset) -> Arc<dyn DataLoader<TextBatch<B::InnerBackend>>> {
        DataLoaderBuilder::new(TextBatcher::<B::InnerBackend>::new(self.device.clone()))
            .batch_size(self.cfg.eval_batch_size)
            .num_workers(self.cfg.num_workers)
            .build(dataset)
    }

    /// Run the epoch loop. Returns the best dev micro-F1 reached.
    pub fn train(
        &mut self,
        train_dataset: TextDataset,
        dev_dataset:   TextDataset,
        metrics:       &MetricsLogger,
    ) -> Result<f64> {
        if train_dataset.sample_count() == 0 {
            bail!("training set is empty");
        }

        let batches_per_epoch = train_dataset.batch_count(self.cfg.train_batch_size);
        let total_steps       = batches_per_epoch * self.cfg.epochs;

        let train_loader = DataLoaderBuilder::new(TextBatcher::<B>::new(self.device.clone()))
            .batch_size(self.cfg.train_batch_size)
            .shuffle(self.cfg.seed)
            .num_workers(self.cfg.num_workers)
            .build(train_dataset);
        let dev_loader = self.eval_loader(dev_dataset);

        tracing::info!(
            "Training for {} epochs ({} steps, {} per epoch), evaluating every {} steps",
            self.cfg.epochs, total_steps, batches_per_epoch, self.cfg.eval_steps
        );

        let mut last_eval_step = self.state.global_step;
        let mut epoch          = self.state.start_epoch;

        for current in self.state.start_epoch..self.cfg.epochs {
            epoch = current;

            for batch in train_loader.iter() {
                let (loss, _) = self.model.forward_classification(batch);
                let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();

                // Backward pass + AdamW update
                let grads  = GradientsParams::from_grads(loss.backward(), &self.model);
                self.model = self.optim.step(self.cfg.lr, self.model.clone(), grads);

                tracing::info!(
                    "[train] epoch: {} step: {}/{} loss: {:.6}",
                    epoch, self.state.global_step, total_steps, loss_val
                );
                self.state.global_step += 1;

                if self.state.global_step % self.cfg.eval_steps == 0 {
                    self.dev_and_checkpoint(&dev_loader, epoch, metrics)?;
                    last_eval_step = self.state.global_step;
                }
            }
        }

        if self.state.global_step != last_eval_step {
            self.dev_and_checkpoint(&dev_loader, epoch, metrics)?;
        }

        tracing::info!("Training complete! Best dev micro_f1: {:.4}", self.state.best_micro_f1);
        Ok(self.state.best_micro_f1)
    }

    /// Evaluate on dev, log, and keep the checkpoint if it is the best so far
    fn dev_and_checkpoint(
        &mut self,
        dev_loader: &Arc<dyn DataLoader<TextBatch<B::InnerBackend>>>,
        epoch:      usize,
        metrics:    &MetricsLogger,
    ) -> Result<()> {
        let output = self.dev(dev_loader);
        let record = EvalRecord {
            step:     self.state.global_step,
            epoch,
            dev_loss: output.total_loss,
            scores:   output.scores(),
        };

        tracing::info!(
            "[dev] loss: {:.6} accuracy: {:.4} micro_f1: {:.4} macro_f1: {:.4}",
            record.dev_loss, record.scores.accuracy, record.scores.micro_f1, record.scores.macro_f1
        );
        metrics.log(&record)?;

        if record.is_improvement(self.state.best_micro_f1) {
            tracing::info!("------------> saving the best model so far");
            let meta = CheckpointMeta {
                epoch,
                global_step: self.state.global_step,
                loss:        record.dev_loss,
                micro_f1:    record.scores.micro_f1,
            };
            self.checkpoints.save_best(&self.model, &self.optim, &meta)?;
            self.state.best_micro_f1 = record.scores.micro_f1;
        }
        Ok(())
    }

    /// Dev-set evaluation with the current weights
    pub fn dev(&self, dev_loader: &Arc<dyn DataLoader<TextBatch<B::InnerBackend>>>) -> EvalOutput {
        // model.valid() → TextRnn<InnerBackend>; dropout is inactive there
        evaluate(&self.model.valid(), dev_loader)
    }

    /// Reload the best checkpoint and score the test set
    pub fn test(self, test_dataset: TextDataset) -> Result<(EvalOutput, CheckpointMeta)> {
        let (trainer, meta) = self.restore()?;
        let loader = trainer.eval_loader(test_dataset);
        let output = evaluate(&trainer.model.valid(), &loader);
        Ok((output, meta))
    }
}
