// ============================================================
// Layer 4 — MNIST Loader
// ============================================================
// Reads MNIST through burn's vision dataset.
//
// How the MNIST files get here:
//   burn's MnistDataset downloads the four IDX archives on first
//   use and caches them under the user's cache directory
//   (~/.cache/burn-dataset/mnist). Later runs read the cache.
//
// What burn gives us per item:
//   MnistItem { image: [[f32; 28]; 28], label: u8 }
//   where the f32 values are raw intensities in 0..=255.
//
// We convert each item into a domain Image (u8 pixels + label)
// so that nothing above this layer depends on burn's types.
//
// Reference: burn-dataset vision module documentation

use anyhow::{anyhow, Result};
use burn::data::dataset::{
    vision::{MnistDataset, MnistItem},
    Dataset,
};

use crate::domain::image::{Image, Split};
use crate::domain::traits::ImageSource;

/// MNIST images are 28x28 greyscale
pub const MNIST_SIDE: usize = 28;

/// Loads MNIST images from burn's bundled dataset.
/// Implements the ImageSource trait from Layer 3.
#[derive(Debug, Clone, Default)]
pub struct MnistLoader {
    /// Keep only the first `limit` images of a split (quick runs)
    limit: Option<usize>,
}

impl MnistLoader {
    pub fn new(limit: Option<usize>) -> Self {
        Self { limit }
    }
}

impl ImageSource for MnistLoader {
    fn load(&self, split: Split) -> Result<Vec<Image>> {
        tracing::info!("Loading MNIST {} split", split);

        // First call downloads the archives; this can take a while
        let dataset = match split {
            Split::Train => MnistDataset::train(),
            Split::Test  => MnistDataset::test(),
        };

        let available = dataset.len();
        let take = self.limit.map_or(available, |l| l.min(available));
        if take < available {
            tracing::info!("Limiting {} split to {} of {} images", split, take, available);
        }

        let mut images = Vec::with_capacity(take);
        for index in 0..take {
            let item = dataset
                .get(index)
                .ok_or_else(|| anyhow!("MNIST {} split has no item at index {}", split, index))?;
            images.push(image_from_item(&item)?);
        }

        tracing::info!("Loaded {} {} images", images.len(), split);
        Ok(images)
    }
}

/// Convert a burn MnistItem into a domain Image.
///
/// Intensities arrive as f32 in 0..=255; they are clamped and
/// rounded back to u8 so the domain type stays lossless.
pub fn image_from_item(item: &MnistItem) -> Result<Image> {
    let pixels: Vec<u8> = item
        .image
        .iter()
        .flat_map(|row| row.iter())
        .map(|&p| p.clamp(0.0, 255.0).round() as u8)
        .collect();

    Ok(Image::new(pixels, MNIST_SIDE, MNIST_SIDE)?.with_label(item.label))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_conversion_keeps_shape_and_label() {
        let mut raw = [[0.0f32; MNIST_SIDE]; MNIST_SIDE];
        raw[0][1]   = 255.0;
        raw[27][27] = 127.6;
        let item = MnistItem { image: raw, label: 4 };

        let img = image_from_item(&item).unwrap();
        assert_eq!(img.len(), MNIST_SIDE * MNIST_SIDE);
        assert_eq!(img.label, Some(4));
        // Row-major: (row 0, col 1) is index 1
        assert_eq!(img.pixels[1], 255);
        assert_eq!(img.pixels[MNIST_SIDE * MNIST_SIDE - 1], 128);
        assert_eq!(img.pixels[0], 0);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let mut raw = [[0.0f32; MNIST_SIDE]; MNIST_SIDE];
        raw[0][0] = 300.0;
        raw[0][2] = -4.0;
        let img = image_from_item(&MnistItem { image: raw, label: 0 }).unwrap();
        assert_eq!(img.pixels[0], 255);
        assert_eq!(img.pixels[2], 0);
    }
}
