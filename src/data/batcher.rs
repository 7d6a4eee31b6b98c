// ============================================================
// Layer 4 — Image Batcher
// ============================================================
// Implements Burn's Batcher trait to stack a Vec<ImageSample>
// into one float tensor.
//
// How batching works here:
//   Input:  Vec of N ImageSamples, each with D pixels
//   Output: ImageBatch with a tensor of shape [N, D]
//
//   All pixel rows are appended into one flat Vec in order,
//   then handed to Burn together with the target shape:
//   [s1_p1, ..., s1_pD, s2_p1, ..., sN_pD] → [N, D]
//
// Every MNIST image has the same size, so no padding is needed.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::ImageSample;

// ─── ImageBatch ───────────────────────────────────────────────────────────────
/// A batch of images ready for the model forward pass.
/// For an autoencoder the input is also the target.
#[derive(Debug, Clone)]
pub struct ImageBatch<B: Backend> {
    /// Normalised pixels — shape: [batch_size, input_dim]
    pub images: Tensor<B, 2>,
}

// ─── ImageBatcher ─────────────────────────────────────────────────────────────
/// Holds the target device so tensors are created on the
/// correct GPU/CPU.
#[derive(Clone, Debug)]
pub struct ImageBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> ImageBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<ImageSample, ImageBatch<B>> for ImageBatcher<B> {
    fn batch(&self, items: Vec<ImageSample>) -> ImageBatch<B> {
        let batch_size = items.len();
        let input_dim  = items.first().map_or(0, ImageSample::dim);

        let flat: Vec<f32> = items
            .into_iter()
            .flat_map(|s| s.pixels)
            .collect();

        let images = Tensor::<B, 2>::from_data(
            TensorData::new(flat, [batch_size, input_dim]),
            &self.device,
        );

        ImageBatch { images }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_batch_shape_and_order() {
        let device  = Default::default();
        let batcher = ImageBatcher::<TestBackend>::new(device);

        let items = vec![
            ImageSample::new(vec![0.0, 0.1, 0.2]),
            ImageSample::new(vec![1.0, 0.9, 0.8]),
        ];
        let batch = batcher.batch(items);

        assert_eq!(batch.images.dims(), [2, 3]);

        let values: Vec<f32> = batch.images.into_data().to_vec().unwrap();
        assert_eq!(values, vec![0.0, 0.1, 0.2, 1.0, 0.9, 0.8]);
    }
}
