// ============================================================
// Layer 4 — Word Segmentation
// ============================================================
// Chinese has no spaces between words, so the word-level
// vocabulary only works after segmentation. JiebaSegmenter
// runs jieba in precise mode with HMM discovery of
// out-of-dictionary words, the same cut used to build
// vocab.txt. Whitespace tokens are dropped.

use jieba_rs::Jieba;

use crate::domain::traits::Segmenter;

pub struct JiebaSegmenter {
    jieba: Jieba,
}

impl JiebaSegmenter {
    /// Load jieba's bundled dictionary
    pub fn new() -> Self {
        Self { jieba: Jieba::new() }
    }
}

impl Default for JiebaSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Segmenter for JiebaSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        self.jieba
            .cut(text, true)
            .into_iter()
            .filter(|w| !w.trim().is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Splits on whitespace only. Used for corpora that were
/// segmented ahead of time.
pub struct WhitespaceSegmenter;

impl Segmenter for WhitespaceSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }
}
