// Shared fixtures for the use-case tests: a tiny sports / finance
// corpus on disk and a config that trains on it in a few steps.

use std::{fs, path::Path};

use burn::backend::{Autodiff, NdArray};

use crate::application::train_use_case::{TrainConfig, TrainOutcome, TrainUseCase};

pub type TrainBackend = Autodiff<NdArray>;

/// Writes vocab, labels and train / dev / test splits under `dir`.
///
/// The dev split holds the same text under both labels, so any
/// model scores exactly one of the two: dev micro-F1 is 0.5 at
/// the first evaluation and a checkpoint is always written.
pub fn write_corpus(dir: &Path) -> TrainConfig {
    let words = ["<PAD>", "<UNK>", "国足", "比赛", "进球", "股市", "上涨", "基金"];
    fs::write(dir.join("vocab.txt"), words.join("\n")).unwrap();
    fs::write(dir.join("labels.txt"), "体育\n财经\n").unwrap();

    let mut train = String::new();
    for _ in 0..8 {
        train.push_str("体育\t国足 比赛 进球\n");
        train.push_str("财经\t股市 上涨 基金\n");
    }
    fs::write(dir.join("train.txt"), &train).unwrap();
    fs::write(dir.join("dev.txt"), "国足 比赛 进球\t体育\n国足 比赛 进球\t财经\n").unwrap();
    fs::write(dir.join("test.txt"), "国足 进球\t0\n基金 上涨\t1\n").unwrap();

    let path = |name: &str| dir.join(name).to_string_lossy().into_owned();
    TrainConfig {
        train_file:       path("train.txt"),
        dev_file:         Some(path("dev.txt")),
        test_file:        Some(path("test.txt")),
        vocab_file:       path("vocab.txt"),
        labels_file:      path("labels.txt"),
        output_dir:       path("out"),
        max_seq_len:      6,
        train_batch_size: 4,
        eval_batch_size:  4,
        epochs:           2,
        lr:               1e-2,
        eval_steps:       3,
        dev_fraction:     0.25,
        num_workers:      1,
        embedding_dim:    8,
        hidden_size:      8,
        num_layers:       1,
        dropout:          0.0,
        ..TrainConfig::default()
    }
}

pub fn train(cfg: &TrainConfig, resume: bool) -> TrainOutcome {
    TrainUseCase::new(cfg.clone(), resume)
        .execute::<TrainBackend>(Default::default())
        .unwrap()
}
