// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types describing what the classifier works with:
// the word vocabulary, the label set, raw labelled texts and
// predictions. No Burn types and no file I/O live here, so
// everything in this layer is testable without a device.
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// Word ↔ id mapping read from vocab.txt
pub mod vocab;

// Category name ↔ id mapping read from labels.txt
pub mod labels;

// A raw labelled text and a model prediction
pub mod example;

// Core abstractions (traits) that other layers implement
pub mod traits;
