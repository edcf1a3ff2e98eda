// ============================================================
// Layer 6 — Pretrained Embedding Store
// ============================================================
// Builds the initial embedding table from pretrained word
// vectors in word2vec text format:
//
//   355996 300                 ← optional "count dim" header
//   的 0.0123 -0.2231 ...      ← word followed by `dim` floats
//
// Every vocabulary word found in the file takes its vector.
// Words that are missing start from a seeded uniform draw in
// [-0.25, 0.25]; the padding row is all zeros. The result is a
// flat row-major [vocab_size, dim] buffer ready to become a
// tensor.

use anyhow::{bail, Context, Result};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::domain::vocab::{Vocab, PAD_ID};

const INIT_RANGE: f32 = 0.25;

#[derive(Debug, Clone)]
pub struct EmbeddingTable {
    /// Row-major [vocab_size, dim]
    pub values:     Vec<f32>,
    pub vocab_size: usize,
    pub dim:        usize,
    /// Vocabulary words that received a pretrained vector
    pub found:      usize,
}

impl EmbeddingTable {
    /// Random table used as the starting point
    pub fn random(vocab_size: usize, dim: usize, seed: u64) -> Self {
        let mut rng    = StdRng::seed_from_u64(seed);
        let mut values: Vec<f32> = (0..vocab_size * dim)
            .map(|_| rng.gen_range(-INIT_RANGE..=INIT_RANGE))
            .collect();

        let pad = PAD_ID as usize;
        if pad < vocab_size {
            values[pad * dim..(pad + 1) * dim].fill(0.0);
        }

        Self { values, vocab_size, dim, found: 0 }
    }

    #[cfg(test)]
    pub fn row(&self, id: usize) -> &[f32] {
        &self.values[id * self.dim..(id + 1) * self.dim]
    }

    fn set_row(&mut self, id: usize, vector: &[f32]) {
        self.values[id * self.dim..(id + 1) * self.dim].copy_from_slice(vector);
    }
}

/// Load word vectors for `vocab` from a word2vec text file
pub fn load_word2vec(
    path:  impl AsRef<Path>,
    vocab: &Vocab,
    dim:   usize,
    seed:  u64,
) -> Result<EmbeddingTable> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Cannot open pretrained embeddings '{}'", path.display()))?;

    let mut table  = EmbeddingTable::random(vocab.len(), dim, seed);
    let mut seen   = vec![false; vocab.len()];
    let mut vector = Vec::with_capacity(dim);

    for (line_no, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("Cannot read '{}'", path.display()))?;
        let mut fields = line.split_whitespace();
        let Some(word) = fields.next() else { continue };

        // "count dim" header
        if line_no == 0 {
            let rest: Vec<&str> = fields.clone().collect();
            if rest.len() == 1 && word.parse::<usize>().is_ok() {
                let file_dim: usize = rest[0].parse().unwrap_or(0);
                if file_dim != dim {
                    bail!(
                        "'{}' holds {}-dimensional vectors but embedding_dim is {}",
                        path.display(), file_dim, dim
                    );
                }
                continue;
            }
        }

        if !vocab.contains(word) {
            continue;
        }

        vector.clear();
        for field in fields {
            let v: f32 = field.parse().with_context(|| {
                format!("{}:{}: invalid number '{}'", path.display(), line_no + 1, field)
            })?;
            vector.push(v);
        }
        if vector.len() != dim {
            bail!(
                "{}:{}: expected {} values for '{}', found {}",
                path.display(), line_no + 1, dim, word, vector.len()
            );
        }

        let id = vocab.id(word) as usize;
        if id == PAD_ID as usize || seen[id] {
            continue;
        }
        table.set_row(id, &vector);
        seen[id] = true;
        table.found += 1;
    }

    tracing::info!(
        "Pretrained embeddings: {}/{} vocabulary words found in '{}'",
        table.found,
        vocab.len(),
        path.display()
    );
    Ok(table)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn vocab() -> Vocab {
        Vocab::from_lines(["<PAD>", "<UNK>", "体育", "财经"]).unwrap()
    }

    #[test]
    fn test_random_table_is_seeded_and_pads_with_zero() {
        let a = EmbeddingTable::random(4, 3, 9);
        let b = EmbeddingTable::random(4, 3, 9);
        assert_eq!(a.values, b.values);
        assert_eq!(a.row(0), &[0.0, 0.0, 0.0]);
        assert!(a.values.iter().all(|v| v.abs() <= INIT_RANGE));
    }

    #[test]
    fn test_loads_known_words() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("vectors.txt");
        fs::write(&path, "3 2\n体育 0.5 -0.5\n游戏 1.0 1.0\n财经 0.1 0.2\n").unwrap();

        let table = load_word2vec(&path, &vocab(), 2, 1).unwrap();
        assert_eq!(table.found, 2);
        assert_eq!(table.row(2), &[0.5, -0.5]);
        assert_eq!(table.row(3), &[0.1, 0.2]);
        assert_eq!(table.row(0), &[0.0, 0.0]);
    }

    #[test]
    fn test_header_dimension_mismatch() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("vectors.txt");
        fs::write(&path, "1 300\n体育 0.5 -0.5\n").unwrap();
        assert!(load_word2vec(&path, &vocab(), 2, 1).is_err());
    }

    #[test]
    fn test_row_dimension_mismatch() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("vectors.txt");
        fs::write(&path, "体育 0.5 -0.5 0.7\n").unwrap();
        assert!(load_word2vec(&path, &vocab(), 2, 1).is_err());
    }
}
