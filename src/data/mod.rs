// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between the text files on disk and the tensor
// batches the model consumes.
//
//   vocab.txt / labels.txt / train.txt ...
//       │
//       ▼
//   loader            → reads vocab, labels and corpus splits
//       │
//       ▼
//   Preprocessor      → normalises whitespace and control chars
//       │
//       ▼
//   JiebaSegmenter    → splits Chinese text into words
//       │
//       ▼
//   TextEncoder       → word ids, truncated / padded, true length
//       │
//       ▼
//   TextDataset       → implements Burn's Dataset trait
//       │
//       ▼
//   TextBatcher       → stacks samples into tensor batches
//       │
//       ▼
//   DataLoader        → feeds batches to the trainer
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads vocab.txt, labels.txt and tab-separated corpus splits
pub mod loader;

/// Cleans and normalises raw text
pub mod preprocessor;

/// Chinese word segmentation
pub mod segmenter;

/// Turns cleaned, segmented text into fixed-length id sequences
pub mod encoder;

/// Implements Burn's Dataset trait for encoded samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Seeded train/dev split when no dev file is available
pub mod splitter;
