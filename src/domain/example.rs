use serde::{Deserialize, Serialize};

/// One raw labelled example from a corpus split, before cleaning
/// and segmentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledText {
    pub text:  String,
    pub label: usize,
}

impl LabeledText {
    pub fn new(text: impl Into<String>, label: usize) -> Self {
        Self { text: text.into(), label }
    }
}

/// The classifier's answer for a single text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub label_id:   usize,
    pub label:      String,
    /// Softmax probability of the predicted class
    pub confidence: f32,
}
