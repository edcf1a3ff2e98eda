// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands — `train`, `test`, `predict` —
// and all their configurable flags.
//
// clap's derive macros generate --help text, errors for missing
// arguments and the string → number conversions.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand, ValueEnum};
use crate::application::train_use_case::TrainConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train on the train split, checkpointing the best dev micro-F1
    Train(TrainArgs),

    /// Score a test split with the best checkpoint
    Test(TestArgs),

    /// Classify a sentence, or every line of a labelled file
    Predict(PredictArgs),
}

/// Where tensors live
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceKind {
    /// ndarray on the CPU
    Cpu,
    /// wgpu on the default GPU adapter
    Gpu,
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Training split: one `text<TAB>label` or `label<TAB>text` per line
    #[arg(long, default_value = "data/cnews/raw_data/train.txt")]
    pub train_file: String,

    /// Dev split; when the file is missing, part of the training set is held out
    #[arg(long, default_value = "data/cnews/raw_data/dev.txt")]
    pub dev_file: String,

    /// Test split scored after training (skipped if the file is missing)
    #[arg(long, default_value = "data/cnews/raw_data/test.txt")]
    pub test_file: String,

    /// One word per line; line 0 is padding, line 1 the unknown word
    #[arg(long, default_value = "data/cnews/final_data/wiki_word/vocab.txt")]
    pub vocab_file: String,

    /// One category name per line
    #[arg(long, default_value = "data/cnews/final_data/wiki_word/labels.txt")]
    pub labels_file: String,

    /// Directory for checkpoints, train_config.json and metrics.csv
    #[arg(long, default_value = "checkpoints")]
    pub output_dir: String,

    /// Word vectors in word2vec text format used to initialise the embedding
    #[arg(long)]
    pub pretrained_embedding: Option<String>,

    /// Continue from the best checkpoint in --output-dir
    #[arg(long)]
    pub resume: bool,

    #[arg(long, value_enum, default_value_t = DeviceKind::Gpu)]
    pub device: DeviceKind,

    /// Words kept per text; longer texts are truncated, shorter padded
    #[arg(long, default_value_t = 256)]
    pub max_seq_len: usize,

    #[arg(long, default_value_t = 64)]
    pub train_batch_size: usize,

    #[arg(long, default_value_t = 64)]
    pub eval_batch_size: usize,

    #[arg(long, default_value_t = 10)]
    pub epochs: usize,

    /// AdamW learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Evaluate on dev every N optimizer steps
    #[arg(long, default_value_t = 100)]
    pub eval_steps: usize,

    /// Share of the training set held out when there is no dev file
    #[arg(long, default_value_t = 0.1)]
    pub dev_fraction: f64,

    #[arg(long, default_value_t = 123)]
    pub seed: u64,

    /// Data loader worker threads
    #[arg(long, default_value_t = 2)]
    pub num_workers: usize,

    #[arg(long, default_value_t = 300)]
    pub embedding_dim: usize,

    /// LSTM hidden size per direction
    #[arg(long, default_value_t = 128)]
    pub hidden_size: usize,

    #[arg(long, default_value_t = 2)]
    pub num_layers: usize,

    /// Forward LSTM only
    #[arg(long)]
    pub unidirectional: bool,

    #[arg(long, default_value_t = 0.5)]
    pub dropout: f64,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            train_file:           a.train_file,
            dev_file:             Some(a.dev_file),
            test_file:            Some(a.test_file),
            vocab_file:           a.vocab_file,
            labels_file:          a.labels_file,
            output_dir:           a.output_dir,
            pretrained_embedding: a.pretrained_embedding,
            max_seq_len:          a.max_seq_len,
            train_batch_size:     a.train_batch_size,
            eval_batch_size:      a.eval_batch_size,
            epochs:               a.epochs,
            lr:                   a.lr,
            eval_steps:           a.eval_steps,
            dev_fraction:         a.dev_fraction,
            seed:                 a.seed,
            num_workers:          a.num_workers,
            embedding_dim:        a.embedding_dim,
            hidden_size:          a.hidden_size,
            num_layers:           a.num_layers,
            bidirectional:        !a.unidirectional,
            dropout:              a.dropout,
            vocab_size:           0,
            num_labels:           0,
        }
    }
}

#[derive(Args, Debug)]
pub struct TestArgs {
    /// Directory the model was trained into
    #[arg(long, default_value = "checkpoints")]
    pub output_dir: String,

    /// Test split; defaults to the one recorded at training time
    #[arg(long)]
    pub test_file: Option<String>,

    #[arg(long, value_enum, default_value_t = DeviceKind::Gpu)]
    pub device: DeviceKind,
}

#[derive(Args, Debug)]
#[command(group(clap::ArgGroup::new("input").required(true).args(["text", "file"])))]
pub struct PredictArgs {
    /// Text to classify
    #[arg(long)]
    pub text: Option<String>,

    /// Labelled file to classify line by line
    #[arg(long)]
    pub file: Option<String>,

    /// Directory the model was trained into
    #[arg(long, default_value = "checkpoints")]
    pub output_dir: String,

    #[arg(long, value_enum, default_value_t = DeviceKind::Cpu)]
    pub device: DeviceKind,
}
