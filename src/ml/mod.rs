// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All Burn model code lives here.
//
//   model.rs      — TextRnn: embedding → stacked (bi)LSTM →
//                   length-aware read-out → linear classifier
//
//   trainer.rs    — AdamW training loop, periodic dev
//                   evaluation, best-checkpoint selection, test
//
//   inferencer.rs — single-text prediction from the best
//                   checkpoint
//
//   scoring.rs    — accuracy, micro/macro F1 and the per-class
//                   classification report
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)

/// Recurrent text classifier architecture
pub mod model;

/// Training loop with dev evaluation and checkpointing
pub mod trainer;

/// Inference engine — loads checkpoint and classifies text
pub mod inferencer;

/// Classification metrics
pub mod scoring;

/// CPU backend (ndarray)
pub type CpuBackend = burn::backend::NdArray;

/// GPU backend (wgpu)
pub type GpuBackend = burn::backend::Wgpu;
