// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns used by several layers:
//
//   checkpoint.rs      — best-model persistence (weights,
//                        optimizer state, metadata) and the
//                        TrainConfig JSON used to rebuild it
//
//   metrics.rs         — dev evaluation rows appended to a CSV
//
//   embedding_store.rs — pretrained word2vec vectors → initial
//                        embedding table
//
//   logging.rs         — tracing subscriber (stdout + log file)
//
// Reference: Rust Book §7 (Modules)
//            Burn Book §5 (Checkpointing)

/// Best-checkpoint saving and loading
pub mod checkpoint;

/// Dev metrics CSV logger
pub mod metrics;

/// Pretrained embedding loading
pub mod embedding_store;

/// Global tracing subscriber setup
pub mod logging;
