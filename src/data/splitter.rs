// ============================================================
// Layer 4 — Train/Dev Splitter
// ============================================================
// Used only when a run has no dev file: shuffle the training
// samples with a seeded RNG and hold out a fraction of them for
// periodic evaluation and best-checkpoint selection.
//
// The RNG is seeded from the run's seed so a rerun with the same
// seed evaluates on the same dev examples.
//
// Reference: rand crate documentation (SliceRandom, SeedableRng)

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Shuffle `samples` and split into (train, dev).
///
/// `dev_fraction` is clamped to [0, 1]. The dev set gets
/// `round(len * dev_fraction)` samples.
pub fn split_train_dev<T>(mut samples: Vec<T>, dev_fraction: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);
    samples.shuffle(&mut rng);

    let total    = samples.len();
    let dev_len  = ((total as f64) * dev_fraction.clamp(0.0, 1.0)).round() as usize;
    let split_at = total - dev_len.min(total);

    // After split_off: samples = [0..split_at], dev = [split_at..total]
    let dev = samples.split_off(split_at);

    tracing::debug!(
        "Dataset split: {} train, {} dev",
        samples.len(),
        dev.len(),
    );

    (samples, dev)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_split_sizes() {
        let items: Vec<usize> = (0..100).collect();
        let (train, dev)      = split_train_dev(items, 0.1, 7);
        assert_eq!(train.len(), 90);
        assert_eq!(dev.len(),   10);
    }

    #[test]
    fn test_all_items_preserved() {
        let items: Vec<usize> = (0..50).collect();
        let (train, dev)      = split_train_dev(items, 0.3, 7);
        let mut all: Vec<usize> = train.into_iter().chain(dev).collect();
        all.sort_unstable();
        assert_eq!(all, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_same_seed_same_split() {
        let (_, a) = split_train_dev((0..40).collect::<Vec<usize>>(), 0.25, 123);
        let (_, b) = split_train_dev((0..40).collect::<Vec<usize>>(), 0.25, 123);
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_dataset() {
        let (train, dev) = split_train_dev(Vec::<usize>::new(), 0.1, 1);
        assert!(train.is_empty());
        assert!(dev.is_empty());
    }
}
