// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types and traits describing what the system works
// with: raw greyscale images and the places they come from.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O or network calls
//   - Only plain Rust structs, enums, and traits
//
// Everything above this layer (data, ml, application) speaks
// in terms of these types, so the dataset backend can change
// without touching the training code.
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// A single greyscale image and the dataset split it belongs to
pub mod image;

// Core abstractions (traits) that other layers implement
pub mod traits;
