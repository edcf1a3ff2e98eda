// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer programs against these traits so the
// concrete pieces (jieba segmentation, tab-separated corpus
// files, the Burn model) can be swapped without touching the
// workflows.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

use crate::domain::example::{LabeledText, Prediction};

// ─── Segmenter ────────────────────────────────────────────────────────────────
/// Splits a cleaned sentence into words.
///
/// Implementations:
///   - JiebaSegmenter → dictionary + HMM Chinese word segmentation
pub trait Segmenter {
    fn segment(&self, text: &str) -> Vec<String>;
}

// ─── CorpusSource ─────────────────────────────────────────────────────────────
/// Anything that yields labelled examples for one corpus split.
pub trait CorpusSource {
    fn load_all(&self) -> Result<Vec<LabeledText>>;
}

// ─── TextClassifier ───────────────────────────────────────────────────────────
/// Any component that can assign a category to a single text.
pub trait TextClassifier {
    fn classify(&self, text: &str) -> Result<Prediction>;
}
