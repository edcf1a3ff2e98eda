// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Appends one CSV row per dev evaluation so learning curves can
// be plotted after a run.
//
// Output file: <output_dir>/metrics.csv
//
//   step,epoch,dev_loss,accuracy,micro_f1,macro_f1
//   100,0,41.208311,0.612000,0.612000,0.583104
//   200,0,30.774120,0.731000,0.731000,0.722950
//
// dev_loss is the sum of the per-batch mean losses over the dev
// set, so it scales with the number of dev batches.

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};

use crate::ml::scoring::ClassificationScores;

const HEADER: &str = "step,epoch,dev_loss,accuracy,micro_f1,macro_f1";

/// One periodic dev evaluation
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EvalRecord {
    pub step:     usize,
    pub epoch:    usize,
    pub dev_loss: f64,
    pub scores:   ClassificationScores,
}

impl EvalRecord {
    /// Strictly better dev micro-F1 than the best so far
    pub fn is_improvement(&self, best_micro_f1: f64) -> bool {
        self.scores.micro_f1 > best_micro_f1
    }
}

pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Writes the CSV header if the file doesn't exist yet, so
    /// resumed runs append to the same log.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let csv_path = dir.join("metrics.csv");
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)
                .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
            writeln!(f, "{HEADER}")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    pub fn log(&self, r: &EvalRecord) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        writeln!(
            f,
            "{},{},{:.6},{:.6},{:.6},{:.6}",
            r.step,
            r.epoch,
            r.dev_loss,
            r.scores.accuracy,
            r.scores.micro_f1,
            r.scores.macro_f1,
        )?;
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}
