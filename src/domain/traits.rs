// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer only ever asks for "images from the
// train split" or "images from the test split". Where they
// come from is an implementation detail of Layer 4:
//   - MnistLoader → burn's bundled MNIST dataset
//   - (tests)     → in-memory fixtures
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use crate::domain::image::{Image, Split};

// ─── ImageSource ──────────────────────────────────────────────────────────────
/// Any component that can produce the images of a dataset split.
pub trait ImageSource {
    /// Load every image of the requested split.
    fn load(&self, split: Split) -> Result<Vec<Image>>;
}
