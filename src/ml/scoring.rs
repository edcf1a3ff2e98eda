// ============================================================
// Layer 5 — Classification Scoring
// ============================================================
// Accuracy, micro-F1, macro-F1 and a per-class report over
// (prediction, target) class-id pairs.
//
//   micro-F1: pool TP / FP / FN over all classes, then F1.
//             For single-label data every miss is one FP and
//             one FN, so micro-F1 equals accuracy.
//   macro-F1: F1 per class, unweighted mean over the classes
//             that occur in either targets or predictions.
//
// Precision or recall with a zero denominator counts as 0, and
// so does F1 when precision + recall is 0.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationScores {
    pub accuracy: f64,
    pub micro_f1: f64,
    pub macro_f1: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct ClassCounts {
    tp: usize,
    fp: usize,
    fn_: usize,
}

impl ClassCounts {
    fn support(&self) -> usize { self.tp + self.fn_ }

    fn precision(&self) -> f64 { ratio(self.tp, self.tp + self.fp) }

    fn recall(&self) -> f64 { ratio(self.tp, self.tp + self.fn_) }

    fn f1(&self) -> f64 { f1(self.precision(), self.recall()) }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 { 0.0 } else { 2.0 * precision * recall / (precision + recall) }
}

/// Per-class counts indexed by class id. The table is sized to
/// cover every id seen, plus `min_classes`.
fn class_counts(predictions: &[usize], targets: &[usize], min_classes: usize) -> Vec<ClassCounts> {
    let n = predictions
        .iter()
        .chain(targets)
        .map(|&c| c + 1)
        .max()
        .unwrap_or(0)
        .max(min_classes);

    let mut counts = vec![ClassCounts::default(); n];
    for (&p, &t) in predictions.iter().zip(targets) {
        if p == t {
            counts[t].tp += 1;
        } else {
            counts[p].fp += 1;
            counts[t].fn_ += 1;
        }
    }
    counts
}

/// Score predictions against targets. Both slices must be the
/// same length; extra elements of the longer one are ignored.
pub fn score(predictions: &[usize], targets: &[usize]) -> ClassificationScores {
    let total   = predictions.len().min(targets.len());
    let correct = predictions.iter().zip(targets).filter(|(p, t)| p == t).count();
    let counts  = class_counts(&predictions[..total], &targets[..total], 0);

    let tp: usize  = counts.iter().map(|c| c.tp).sum();
    let fp: usize  = counts.iter().map(|c| c.fp).sum();
    let fn_: usize = counts.iter().map(|c| c.fn_).sum();
    let micro_f1   = f1(ratio(tp, tp + fp), ratio(tp, tp + fn_));

    let present: Vec<&ClassCounts> = counts
        .iter()
        .filter(|c| c.tp + c.fp + c.fn_ > 0)
        .collect();
    let macro_f1 = if present.is_empty() {
        0.0
    } else {
        present.iter().map(|c| c.f1()).sum::<f64>() / present.len() as f64
    };

    ClassificationScores {
        accuracy: ratio(correct, total),
        micro_f1,
        macro_f1,
    }
}

/// One row of the per-class report
#[derive(Debug, Clone, PartialEq)]
pub struct ClassRow {
    pub label:     String,
    pub precision: f64,
    pub recall:    f64,
    pub f1:        f64,
    pub support:   usize,
}

/// Per-class precision / recall / F1 / support followed by
/// accuracy, macro and support-weighted averages.
#[derive(Debug, Clone)]
pub struct ClassificationReport {
    pub rows:         Vec<ClassRow>,
    pub accuracy:     f64,
    pub macro_avg:    ClassRow,
    pub weighted_avg: ClassRow,
    pub total:        usize,
}

impl ClassificationReport {
    /// Build a report with one row per entry of `label_names`
    pub fn new(predictions: &[usize], targets: &[usize], label_names: &[String]) -> Self {
        let total  = predictions.len().min(targets.len());
        let counts = class_counts(&predictions[..total], &targets[..total], label_names.len());

        let rows: Vec<ClassRow> = counts
            .iter()
            .enumerate()
            .map(|(id, c)| ClassRow {
                label:     label_names.get(id).cloned().unwrap_or_else(|| id.to_string()),
                precision: c.precision(),
                recall:    c.recall(),
                f1:        c.f1(),
                support:   c.support(),
            })
            .collect();

        let n = rows.len().max(1) as f64;
        let macro_avg = ClassRow {
            label:     "macro avg".to_string(),
            precision: rows.iter().map(|r| r.precision).sum::<f64>() / n,
            recall:    rows.iter().map(|r| r.recall).sum::<f64>() / n,
            f1:        rows.iter().map(|r| r.f1).sum::<f64>() / n,
            support:   total,
        };

        let weight = |f: fn(&ClassRow) -> f64| -> f64 {
            if total == 0 {
                0.0
            } else {
                rows.iter().map(|r| f(r) * r.support as f64).sum::<f64>() / total as f64
            }
        };
        let weighted_avg = ClassRow {
            label:     "weighted avg".to_string(),
            precision: weight(|r: &ClassRow| r.precision),
            recall:    weight(|r: &ClassRow| r.recall),
            f1:        weight(|r: &ClassRow| r.f1),
            support:   total,
        };

        let correct = predictions.iter().zip(targets).filter(|(p, t)| p == t).count();

        Self {
            rows,
            accuracy: ratio(correct, total),
            macro_avg,
            weighted_avg,
            total,
        }
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .rows
            .iter()
            .map(|r| r.label.chars().count())
            .chain(["weighted avg".len()])
            .max()
            .unwrap_or(12);

        writeln!(f, "{:>width$} {:>9} {:>9} {:>9} {:>9}", "", "precision", "recall", "f1-score", "support")?;
        writeln!(f)?;
        for r in &self.rows {
            writeln!(f, "{:>width$} {:>9.4} {:>9.4} {:>9.4} {:>9}", r.label, r.precision, r.recall, r.f1, r.support)?;
        }
        writeln!(f)?;
        writeln!(f, "{:>width$} {:>9} {:>9} {:>9.4} {:>9}", "accuracy", "", "", self.accuracy, self.total)?;
        for r in [&self.macro_avg, &self.weighted_avg] {
            writeln!(f, "{:>width$} {:>9.4} {:>9.4} {:>9.4} {:>9}", r.label, r.precision, r.recall, r.f1, r.support)?;
        }
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_perfect_predictions() {
        let s = score(&[0, 1, 2, 1], &[0, 1, 2, 1]);
        assert_eq!(s.accuracy, 1.0);
        assert_eq!(s.micro_f1, 1.0);
        assert_eq!(s.macro_f1, 1.0);
    }

    #[test]
    fn test_micro_f1_equals_accuracy() {
        let s = score(&[0, 2, 1, 0, 0, 1], &[0, 1, 2, 0, 1, 1]);
        assert!((s.accuracy - 0.5).abs() < EPS);
        assert!((s.micro_f1 - s.accuracy).abs() < EPS);
    }

    #[test]
    fn test_macro_f1_hand_computed() {
        // targets     0 0 1 1 2
        // predictions 0 1 1 1 0
        // class 0: tp=1 fp=1 fn=1 → p=.5 r=.5 f1=.5
        // class 1: tp=2 fp=1 fn=0 → p=2/3 r=1 f1=.8
        // class 2: tp=0 fp=0 fn=1 → f1=0
        let s = score(&[0, 1, 1, 1, 0], &[0, 0, 1, 1, 2]);
        assert!((s.accuracy - 0.6).abs() < EPS);
        assert!((s.macro_f1 - (0.5 + 0.8 + 0.0) / 3.0).abs() < EPS);
    }

    #[test]
    fn test_macro_ignores_absent_classes() {
        // Class 5 never appears, so only classes 0 and 1 are averaged
        let s = score(&[0, 1], &[0, 1]);
        assert_eq!(s.macro_f1, 1.0);
    }

    #[test]
    fn test_empty_input() {
        let s = score(&[], &[]);
        assert_eq!(s.accuracy, 0.0);
        assert_eq!(s.micro_f1, 0.0);
        assert_eq!(s.macro_f1, 0.0);
    }

    #[test]
    fn test_report_rows_and_averages() {
        let names: Vec<String> = ["体育", "财经", "房产", "游戏"].iter().map(|s| s.to_string()).collect();
        let r = ClassificationReport::new(&[0, 1, 1, 1, 0], &[0, 0, 1, 1, 2], &names);

        // One row per label, even for classes never seen
        assert_eq!(r.rows.len(), 4);
        assert_eq!(r.rows[1].label, "财经");
        assert!((r.rows[1].precision - 2.0 / 3.0).abs() < EPS);
        assert_eq!(r.rows[1].support, 2);
        assert_eq!(r.rows[3].support, 0);
        assert_eq!(r.total, 5);

        assert!((r.macro_avg.f1 - (0.5 + 0.8) / 4.0).abs() < EPS);
        // weighted by support 2, 2, 1, 0
        assert!((r.weighted_avg.recall - (0.5 * 2.0 + 1.0 * 2.0) / 5.0).abs() < EPS);

        let text = r.to_string();
        assert!(text.contains("财经"));
        assert!(text.contains("weighted avg"));
    }
}
