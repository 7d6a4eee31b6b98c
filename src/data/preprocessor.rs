// ============================================================
// Layer 4 — Pixel Normaliser
// ============================================================
// Turns a raw 8-bit image into the flat float vector the
// network consumes.
//
// Two steps:
//   1. Flatten the 2-D image into one row of width*height values
//      (the autoencoder is fully connected, it has no notion of
//      rows and columns)
//   2. Scale 0..=255 down to 0.0..=1.0
//
// The scaling matters because the decoder ends in a sigmoid:
// its outputs live in (0, 1), so the targets must too, or the
// reconstruction error can never reach zero.

use crate::domain::image::Image;

/// Largest raw intensity of an 8-bit greyscale pixel
const MAX_INTENSITY: f32 = 255.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Flatten and scale one image into [0, 1].
    pub fn normalize(&self, image: &Image) -> Vec<f32> {
        image
            .pixels
            .iter()
            .map(|&p| p as f32 / MAX_INTENSITY)
            .collect()
    }

    pub fn normalize_all(&self, images: &[Image]) -> Vec<Vec<f32>> {
        images.iter().map(|img| self.normalize(img)).collect()
    }
}
