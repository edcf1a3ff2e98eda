// ============================================================
// Layer 3 — Label Map
// ============================================================
// Category names ↔ class ids. The id of a label is its line
// number in labels.txt, which is also the index of the
// matching logit in the model output.

use std::collections::HashMap;

use anyhow::{bail, Result};

#[derive(Debug, Clone)]
pub struct LabelMap {
    label_to_id: HashMap<String, usize>,
    id_to_label: Vec<String>,
}

impl LabelMap {
    /// Build the label map from labels.txt lines, with the same
    /// rules as the vocabulary: the id is the line index, a blank
    /// line still takes its id (but no name resolves to it) and a
    /// label seen twice keeps its first id.
    pub fn from_lines<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut label_to_id = HashMap::new();
        let mut id_to_label = Vec::new();

        for line in lines {
            let label = line.as_ref().trim().to_string();
            if !label.is_empty() {
                label_to_id.entry(label.clone()).or_insert(id_to_label.len());
            }
            id_to_label.push(label);
        }

        if label_to_id.is_empty() {
            bail!("label file contains no labels");
        }

        Ok(Self { label_to_id, id_to_label })
    }

    pub fn id(&self, label: &str) -> Option<usize> {
        self.label_to_id.get(label).copied()
    }

    pub fn name(&self, id: usize) -> Option<&str> {
        self.id_to_label.get(id).map(String::as_str)
    }

    /// Resolve a label field that is either a label name or a
    /// numeric id within range.
    pub fn resolve(&self, field: &str) -> Option<usize> {
        let field = field.trim();
        self.id(field).or_else(|| {
            field
                .parse::<usize>()
                .ok()
                .filter(|&id| self.name(id).is_some_and(|n| !n.is_empty()))
        })
    }

    pub fn names(&self) -> &[String] {
        &self.id_to_label
    }

    pub fn len(&self) -> usize {
        self.id_to_label.len()
    }
}
