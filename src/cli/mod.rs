// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap, picks the backend for the chosen
// device and delegates to a use case in Layer 2. Printing of
// results happens here and nowhere else.
//
// Commands:
//   1. `train`   — train, keep the best dev checkpoint, then test
//   2. `test`    — score a test split with the best checkpoint
//   3. `predict` — classify a sentence or a labelled file
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use burn::backend::{ndarray::NdArrayDevice, wgpu::WgpuDevice, Autodiff};
use clap::Parser;
use commands::{Commands, DeviceKind, PredictArgs, TestArgs, TrainArgs};

use crate::application::{
    predict_use_case::{file_accuracy, PredictUseCase},
    test_use_case::{TestReport, TestUseCase},
    train_use_case::TrainUseCase,
};
use crate::ml::{CpuBackend, GpuBackend};

#[derive(Parser, Debug)]
#[command(
    name = "textrnn-cls",
    version,
    about = "Train a bidirectional LSTM on word-segmented Chinese text, then test and predict."
)]
pub struct Cli {
    /// Also append log lines to <LOG_DIR>/textrnn_cls.log
    #[arg(long, global = true)]
    pub log_dir: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)   => run_train(args),
            Commands::Test(args)    => run_test(args),
            Commands::Predict(args) => run_predict(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    tracing::info!("Starting training on '{}'", args.train_file);

    let device   = args.device;
    let resume   = args.resume;
    let use_case = TrainUseCase::new(args.into(), resume);
    let outcome  = match device {
        DeviceKind::Cpu => use_case.execute::<Autodiff<CpuBackend>>(NdArrayDevice::Cpu)?,
        DeviceKind::Gpu => use_case.execute::<Autodiff<GpuBackend>>(WgpuDevice::default())?,
    };

    println!("Training complete. Best dev micro_f1: {:.4}", outcome.best_dev_micro_f1);
    if let Some(report) = outcome.test {
        print_test_report(&report);
    }
    Ok(())
}

fn run_test(args: TestArgs) -> Result<()> {
    let use_case = TestUseCase::new(args.output_dir, args.test_file);
    let report = match args.device {
        DeviceKind::Cpu => use_case.execute::<Autodiff<CpuBackend>>(NdArrayDevice::Cpu)?,
        DeviceKind::Gpu => use_case.execute::<Autodiff<GpuBackend>>(WgpuDevice::default())?,
    };
    print_test_report(&report);
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    match args.device {
        DeviceKind::Cpu => predict_with(PredictUseCase::<CpuBackend>::new(&args.output_dir, NdArrayDevice::Cpu)?, &args),
        DeviceKind::Gpu => predict_with(PredictUseCase::<GpuBackend>::new(&args.output_dir, WgpuDevice::default())?, &args),
    }
}

fn predict_with<B: burn::prelude::Backend>(use_case: PredictUseCase<B>, args: &PredictArgs) -> Result<()> {
    if let Some(text) = &args.text {
        let prediction = use_case.predict(text)?;
        println!("{}", text);
        println!("predicted label: {} ({:.4})", prediction.label, prediction.confidence);
    }

    if let Some(path) = &args.file {
        let rows = use_case.predict_file(path)?;
        for row in &rows {
            println!("{}", row.text);
            println!("true label:      {}", row.true_label);
            println!("predicted label: {} ({:.4})", row.prediction.label, row.prediction.confidence);
        }
        println!("\n{} lines, accuracy {:.4}", rows.len(), file_accuracy(&rows));
    }
    Ok(())
}

fn print_test_report(report: &TestReport) {
    println!(
        "\n[test] checkpoint from epoch {} (step {}), loss: {:.6} accuracy: {:.4} micro_f1: {:.4} macro_f1: {:.4}\n",
        report.checkpoint.epoch,
        report.checkpoint.global_step,
        report.output.total_loss,
        report.scores.accuracy,
        report.scores.micro_f1,
        report.scores.macro_f1,
    );
    println!("{}", report.report);
}
