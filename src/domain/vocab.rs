// ============================================================
// Layer 3 — Vocabulary
// ============================================================
// Maps segmented words to the integer ids the embedding layer
// understands. The id of a word is its zero-based line number
// in vocab.txt, so ids are unique and stable for a run.
//
// Two ids are reserved by convention of the vocabulary files:
//   0 → padding (never produced by a real word lookup)
//   1 → unknown word
//
// Reference: Rust Book §8 (Hash Maps)

use std::collections::HashMap;

use anyhow::{bail, Result};

/// Id used to right-pad sequences to `max_seq_len`
pub const PAD_ID: u32 = 0;

/// Id every out-of-vocabulary word maps to
pub const UNK_ID: u32 = 1;

#[derive(Debug, Clone)]
pub struct Vocab {
    word_to_id: HashMap<String, u32>,
    id_to_word: Vec<String>,
}

impl Vocab {
    /// Build a vocabulary from an iterator of lines.
    ///
    /// Lines are trimmed of trailing `\r`; blank lines still occupy
    /// an id so that ids always equal line numbers. A word seen twice
    /// keeps its first id.
    pub fn from_lines<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut word_to_id = HashMap::new();
        let mut id_to_word = Vec::new();

        for line in lines {
            let word = line.as_ref().trim_end_matches('\r').to_string();
            let id   = id_to_word.len() as u32;
            word_to_id.entry(word.clone()).or_insert(id);
            id_to_word.push(word);
        }

        if id_to_word.len() <= UNK_ID as usize {
            bail!(
                "vocabulary needs at least {} entries (padding and unknown), got {}",
                UNK_ID + 1,
                id_to_word.len()
            );
        }

        Ok(Self { word_to_id, id_to_word })
    }

    /// Look up a word, falling back to [`UNK_ID`]
    pub fn id(&self, word: &str) -> u32 {
        self.word_to_id.get(word).copied().unwrap_or(UNK_ID)
    }

    #[cfg(test)]
    pub fn word(&self, id: u32) -> Option<&str> {
        self.id_to_word.get(id as usize).map(String::as_str)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.word_to_id.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.id_to_word.len()
    }
}
