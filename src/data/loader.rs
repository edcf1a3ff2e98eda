// ============================================================
// Layer 4 — Corpus Loader
// ============================================================
// Reads the plain-text inputs of a run:
//
//   vocab.txt   one word per line, id = line number
//   labels.txt  one category per line, id = line number
//   *.txt split one example per line, two tab-separated fields
//
// A split line may be written either way round:
//   体育<TAB>马晓旭意外受伤让国奥警惕 ...     (label first)
//   8岁男童海螺沟失联13日 ...<TAB>5          (text first)
//
// The label field is a category name or a numeric id.
// `text<TAB>label` is tried first. Lines that fit neither
// shape are skipped with a warning rather than failing the run.
//
// Reference: Rust Book §9 (Error Handling)
//            Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use std::{fs, path::{Path, PathBuf}};

use crate::domain::{
    example::LabeledText,
    labels::LabelMap,
    traits::CorpusSource,
    vocab::Vocab,
};

/// Read vocab.txt into a [`Vocab`]
pub fn read_vocab(path: impl AsRef<Path>) -> Result<Vocab> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("Cannot read vocabulary '{}'", path.display()))?;
    let vocab = Vocab::from_lines(text.trim_end_matches('\n').split('\n'))
        .with_context(|| format!("Invalid vocabulary '{}'", path.display()))?;
    tracing::info!("Loaded {} words from '{}'", vocab.len(), path.display());
    Ok(vocab)
}

/// Read labels.txt into a [`LabelMap`]
pub fn read_labels(path: impl AsRef<Path>) -> Result<LabelMap> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("Cannot read labels '{}'", path.display()))?;
    let labels = LabelMap::from_lines(text.trim().split('\n'))
        .with_context(|| format!("Invalid label file '{}'", path.display()))?;
    tracing::info!("Loaded {} labels from '{}'", labels.len(), path.display());
    Ok(labels)
}

/// Loads one corpus split (train, dev or test) from a
/// tab-separated file. Implements the CorpusSource trait.
pub struct CorpusLoader<'a> {
    path:   PathBuf,
    labels: &'a LabelMap,
}

impl<'a> CorpusLoader<'a> {
    pub fn new(path: impl Into<PathBuf>, labels: &'a LabelMap) -> Self {
        Self { path: path.into(), labels }
    }

    /// Parse a single corpus line. Returns None for lines that
    /// have no tab or whose label cannot be resolved.
    pub fn parse_line(&self, line: &str) -> Option<LabeledText> {
        let line = line.trim_end_matches('\r');

        // text<TAB>label — the label is the last field
        if let Some((text, label)) = line.rsplit_once('\t') {
            if let Some(id) = self.labels.resolve(label) {
                return Some(LabeledText::new(text, id));
            }
        }

        // label<TAB>text — the label is the first field
        if let Some((label, text)) = line.split_once('\t') {
            if let Some(id) = self.labels.resolve(label) {
                return Some(LabeledText::new(text, id));
            }
        }

        None
    }
}

impl CorpusSource for CorpusLoader<'_> {
    fn load_all(&self) -> Result<Vec<LabeledText>> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read corpus '{}'", self.path.display()))?;

        let mut examples = Vec::new();
        let mut skipped  = 0usize;

        for (line_no, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match self.parse_line(line) {
                Some(example) => examples.push(example),
                None => {
                    skipped += 1;
                    tracing::warn!(
                        "Skipping {}:{} — expected text and label separated by a tab",
                        self.path.display(),
                        line_no + 1
                    );
                }
            }
        }

        tracing::info!(
            "Loaded {} examples from '{}' ({} skipped)",
            examples.len(),
            self.path.display(),
            skipped
        );
        Ok(examples)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn labels() -> LabelMap {
        LabelMap::from_lines(["体育", "财经", "社会"]).unwrap()
    }

    #[test]
    fn test_parses_text_first_with_numeric_label() {
        let labels = labels();
        let loader = CorpusLoader::new("unused", &labels);
        let ex = loader.parse_line("8岁男童海螺沟失联13日\t2").unwrap();
        assert_eq!(ex, LabeledText::new("8岁男童海螺沟失联13日", 2));
    }

    #[test]
    fn test_parses_label_first_with_name() {
        let labels = labels();
        let loader = CorpusLoader::new("unused", &labels);
        let ex = loader.parse_line("财经\t股市今日大涨").unwrap();
        assert_eq!(ex.label, 1);
        assert_eq!(ex.text, "股市今日大涨");
    }

    #[test]
    fn test_rejects_unknown_label_and_missing_tab() {
        let labels = labels();
        let loader = CorpusLoader::new("unused", &labels);
        assert!(loader.parse_line("游戏\t新游戏发布").is_none());
        assert!(loader.parse_line("没有制表符的一行").is_none());
    }

    #[test]
    fn test_load_all_skips_bad_lines() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.txt");
        let mut f = fs::File::create(&path).unwrap();
        writeln!(f, "体育\t国奥队备战").unwrap();
        writeln!(f).unwrap();
        writeln!(f, "broken line").unwrap();
        writeln!(f, "楼市成交回暖\t1\r").unwrap();

        let labels   = labels();
        let examples = CorpusLoader::new(&path, &labels).load_all().unwrap();
        assert_eq!(examples.len(), 2);
        assert_eq!(examples[0].label, 0);
        assert_eq!(examples[1], LabeledText::new("楼市成交回暖", 1));
    }

    #[test]
    fn test_read_vocab_and_labels() {
        let dir = tempfile::tempdir().unwrap();
        let vocab_path  = dir.path().join("vocab.txt");
        let labels_path = dir.path().join("labels.txt");
        fs::write(&vocab_path, "<PAD>\n<UNK>\n比赛\n").unwrap();
        fs::write(&labels_path, "体育\n财经\n").unwrap();

        let vocab = read_vocab(&vocab_path).unwrap();
        assert_eq!(vocab.len(), 3);
        assert_eq!(vocab.id("比赛"), 2);

        let labels = read_labels(&labels_path).unwrap();
        assert_eq!(labels.names(), &["体育".to_string(), "财经".to_string()]);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let labels = labels();
        assert!(CorpusLoader::new("/nonexistent/train.txt", &labels).load_all().is_err());
        assert!(read_vocab("/nonexistent/vocab.txt").is_err());
    }
}
