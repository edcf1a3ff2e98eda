// ============================================================
// Layer 4 — Text Encoder
// ============================================================
// clean → segment → look up ids → truncate / pad
//
// Every encoded text has exactly `max_seq_len` ids. `seq_len`
// records how many of them are real words so the recurrent
// layers can read the state at the last real position. An
// empty text still reports seq_len = 1 (a single padding step)
// because the read-out needs at least one valid position.

use std::sync::Arc;

use crate::data::{dataset::TextSample, preprocessor::Preprocessor};
use crate::domain::{
    example::LabeledText,
    traits::Segmenter,
    vocab::{Vocab, PAD_ID},
};

#[derive(Debug, Clone, PartialEq)]
pub struct EncodedText {
    pub word_ids: Vec<u32>,
    pub seq_len:  usize,
}

/// Pad or truncate `ids` to `max_seq_len`, returning the true length
pub fn pad_or_truncate(mut ids: Vec<u32>, max_seq_len: usize) -> EncodedText {
    let seq_len = ids.len().min(max_seq_len).max(1);
    ids.truncate(max_seq_len);
    ids.resize(max_seq_len, PAD_ID);
    EncodedText { word_ids: ids, seq_len }
}

pub struct TextEncoder<S: Segmenter> {
    preprocessor: Preprocessor,
    segmenter:    S,
    vocab:        Arc<Vocab>,
    max_seq_len:  usize,
}

impl<S: Segmenter> TextEncoder<S> {
    pub fn new(segmenter: S, vocab: Arc<Vocab>, max_seq_len: usize) -> Self {
        assert!(max_seq_len > 0, "max_seq_len must be positive");
        Self {
            preprocessor: Preprocessor::new(),
            segmenter,
            vocab,
            max_seq_len,
        }
    }

    /// Segmented words of the cleaned text
    pub fn words(&self, text: &str) -> Vec<String> {
        self.segmenter.segment(&self.preprocessor.clean(text))
    }

    pub fn encode(&self, text: &str) -> EncodedText {
        let ids = self
            .words(text)
            .iter()
            .map(|w| self.vocab.id(w))
            .collect();
        pad_or_truncate(ids, self.max_seq_len)
    }

    /// Encode a whole corpus split into dataset samples
    pub fn encode_all(&self, examples: &[LabeledText]) -> Vec<TextSample> {
        examples
            .iter()
            .map(|ex| {
                let enc = self.encode(&ex.text);
                TextSample {
                    word_ids: enc.word_ids,
                    seq_len:  enc.seq_len,
                    label:    ex.label,
                }
            })
            .collect()
    }
}
