use anyhow::{bail, Result};
use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

/// One normalised, flattened image. Values are in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSample {
    pub pixels: Vec<f32>,
}

impl ImageSample {
    pub fn new(pixels: Vec<f32>) -> Self { Self { pixels } }

    /// Flattened input dimension
    pub fn dim(&self) -> usize { self.pixels.len() }
}

pub struct ImageDataset {
    samples: Vec<ImageSample>,
}

impl ImageDataset {
    pub fn new(samples: Vec<ImageSample>) -> Self { Self { samples } }

    pub fn from_pixels(rows: Vec<Vec<f32>>) -> Self {
        Self::new(rows.into_iter().map(ImageSample::new).collect())
    }

    pub fn sample_count(&self) -> usize { self.samples.len() }

    /// Every sample must have exactly `expected` values, otherwise the
    /// batcher cannot stack them into one tensor.
    pub fn check_dim(&self, expected: usize) -> Result<()> {
        if let Some((index, sample)) = self
            .samples
            .iter()
            .enumerate()
            .find(|(_, s)| s.dim() != expected)
        {
            bail!(
                "Image {} has {} pixels but the model expects {}",
                index, sample.dim(), expected
            );
        }
        Ok(())
    }
}

impl Dataset<ImageSample> for ImageDataset {
    fn get(&self, index: usize) -> Option<ImageSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
