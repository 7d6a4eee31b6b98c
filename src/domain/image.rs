// ============================================================
// Layer 3 — Image Domain Type
// ============================================================
// A single greyscale image as it comes off disk: raw 8-bit
// intensities in row-major order, plus an optional class label.
//
// The autoencoder never looks at the label (it learns to
// reproduce its input), but keeping it around lets reports
// say which digit an outlier reconstruction belongs to.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw greyscale image. `pixels.len() == width * height`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Row-major intensities, 0 = black, 255 = white
    pub pixels: Vec<u8>,
    pub width:  usize,
    pub height: usize,
    /// Class label, if the source provides one
    pub label:  Option<u8>,
}

impl Image {
    /// Build an image, rejecting pixel buffers that don't match the shape.
    pub fn new(pixels: Vec<u8>, width: usize, height: usize) -> Result<Self> {
        if pixels.len() != width * height {
            bail!(
                "image buffer has {} pixels, expected {}x{} = {}",
                pixels.len(), width, height, width * height
            );
        }
        Ok(Self { pixels, width, height, label: None })
    }

    pub fn with_label(mut self, label: u8) -> Self {
        self.label = Some(label);
        self
    }

    /// Number of pixels (the flattened input dimension)
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Which half of a dataset to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Split {
    Train,
    Test,
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Split::Train => write!(f, "train"),
            Split::Test  => write!(f, "test"),
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_matching_buffer() {
        let img = Image::new(vec![0; 6], 3, 2).unwrap();
        assert_eq!(img.len(), 6);
        assert_eq!(img.label, None);
    }

    #[test]
    fn test_new_rejects_wrong_size() {
        // 5 pixels can't fill a 3x2 image
        assert!(Image::new(vec![0; 5], 3, 2).is_err());
    }

    #[test]
    fn test_with_label() {
        let img = Image::new(vec![255; 4], 2, 2).unwrap().with_label(7);
        assert_eq!(img.label, Some(7));
    }

    #[test]
    fn test_split_display() {
        assert_eq!(Split::Train.to_string(), "train");
        assert_eq!(Split::Test.to_string(),  "test");
    }
}
