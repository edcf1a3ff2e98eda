// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// One use case per workflow the CLI exposes. This layer only
// coordinates: it reads inputs through the data layer, hands
// tensors work to the ml layer and persistence to infra, and
// returns plain results for Layer 1 to print.
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Training (train → periodic dev eval → best checkpoint → test)
pub mod train_use_case;

// Test-set scoring from the best checkpoint
pub mod test_use_case;

// Single-text and file prediction
pub mod predict_use_case;

#[cfg(test)]
pub(crate) mod test_support;
