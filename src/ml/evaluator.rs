// ============================================================
// Layer 5 — Evaluator
// ============================================================
// Loads a trained autoencoder and measures how well it
// reconstructs images it has not been trained on.
//
// The score for one image is its reconstruction error:
//   mean over pixels of (reconstruction - input)^2
// The report aggregates these over a whole dataset.

use anyhow::{anyhow, bail, Result};
use burn::{
    data::dataloader::{batcher::Batcher, DataLoaderBuilder},
    prelude::*,
};

use crate::data::{
    batcher::ImageBatcher,
    dataset::{ImageDataset, ImageSample},
};
use crate::infra::checkpoint::{CheckpointChoice, CheckpointManager};
use crate::ml::model::{Autoencoder, AutoencoderConfig};

/// Aggregated reconstruction error over a dataset.
#[derive(Debug, Clone)]
pub struct EvaluationReport {
    pub samples:    usize,
    pub mean_error: f64,
    pub min_error:  f64,
    pub max_error:  f64,
    /// Error of every sample, in dataset order
    pub per_sample: Vec<f32>,
    /// Worst reconstructions, filled in on request
    pub outliers:   Vec<Outlier>,
}

/// One badly reconstructed image.
#[derive(Debug, Clone, PartialEq)]
pub struct Outlier {
    pub index:      usize,
    pub label:      Option<u8>,
    pub error:      f32,
    /// Largest absolute difference between an input pixel and its reconstruction
    pub peak_error: f32,
}

impl EvaluationReport {
    pub fn from_errors(per_sample: Vec<f32>) -> Self {
        let samples = per_sample.len();
        if samples == 0 {
            return Self {
                samples,
                mean_error: f64::NAN,
                min_error:  f64::NAN,
                max_error:  f64::NAN,
                per_sample,
                outliers:   Vec::new(),
            };
        }

        let sum: f64 = per_sample.iter().map(|&e| e as f64).sum();
        let min = per_sample.iter().copied().fold(f32::INFINITY, f32::min);
        let max = per_sample.iter().copied().fold(f32::NEG_INFINITY, f32::max);

        Self {
            samples,
            mean_error: sum / samples as f64,
            min_error:  min as f64,
            max_error:  max as f64,
            per_sample,
            outliers:   Vec::new(),
        }
    }

    /// Indices and errors of the `n` worst reconstructions, worst first.
    pub fn worst(&self, n: usize) -> Vec<(usize, f32)> {
        let mut indexed: Vec<(usize, f32)> = self.per_sample.iter().copied().enumerate().collect();
        indexed.sort_by(|a, b| b.1.total_cmp(&a.1));
        indexed.truncate(n);
        indexed
    }
}

pub struct Evaluator<B: Backend> {
    model:     Autoencoder<B>,
    input_dim: usize,
    device:    B::Device,
}

impl<B: Backend> Evaluator<B> {
    pub fn new(model: Autoencoder<B>, input_dim: usize, device: B::Device) -> Self {
        Self { model, input_dim, device }
    }

    /// Rebuild the model from the saved config and load the chosen weights.
    pub fn from_checkpoint(
        ckpt_manager: &CheckpointManager,
        choice:       CheckpointChoice,
        device:       B::Device,
    ) -> Result<Self> {
        let cfg = ckpt_manager.load_config()?;
        let model_cfg = AutoencoderConfig::new()
            .with_input_dim(cfg.input_dim)
            .with_hidden_dim(cfg.hidden_dim)
            .with_code_dim(cfg.code_dim);
        let model: Autoencoder<B> = model_cfg.init(&device);
        let model = ckpt_manager.load_model(model, choice, &device)?;
        tracing::info!("Model loaded from checkpoint");
        Ok(Self::new(model, cfg.input_dim, device))
    }

    /// Per-sample reconstruction error over the whole dataset, in order.
    pub fn evaluate(&self, dataset: ImageDataset, batch_size: usize) -> Result<EvaluationReport> {
        if batch_size == 0 {
            bail!("batch_size must be at least 1");
        }
        dataset.check_dim(self.input_dim)?;

        // No shuffle: errors must line up with dataset indices
        let loader = DataLoaderBuilder::new(ImageBatcher::<B>::new(self.device.clone()))
            .batch_size(batch_size)
            .build(dataset);

        let mut per_sample = Vec::new();
        for batch in loader.iter() {
            let errors = self.model.reconstruction_error(batch.images);
            let errors: Vec<f32> = errors
                .into_data()
                .to_vec::<f32>()
                .map_err(|e| anyhow!("Cannot read reconstruction errors: {:?}", e))?;
            per_sample.extend(errors);
        }

        let report = EvaluationReport::from_errors(per_sample);
        tracing::info!(
            "Evaluated {} samples: mean_error={:.6}",
            report.samples, report.mean_error
        );
        Ok(report)
    }

    /// Reconstruct a single image; output has the same length as the input.
    pub fn reconstruct(&self, sample: &ImageSample) -> Result<Vec<f32>> {
        if sample.dim() != self.input_dim {
            bail!(
                "Image has {} pixels but the model expects {}",
                sample.dim(), self.input_dim
            );
        }
        let batch = ImageBatcher::<B>::new(self.device.clone()).batch(vec![sample.clone()]);
        self.model
            .forward(batch.images)
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow!("Cannot read reconstruction: {:?}", e))
    }

    /// Reconstruct `sample` again and describe how far off it is.
    pub fn outlier(
        &self,
        index:  usize,
        label:  Option<u8>,
        sample: &ImageSample,
    ) -> Result<Outlier> {
        let recon = self.reconstruct(sample)?;
        let mut sum  = 0.0f32;
        let mut peak = 0.0f32;
        for (x, r) in sample.pixels.iter().zip(&recon) {
            let diff = (r - x).abs();
            sum  += diff * diff;
            peak  = peak.max(diff);
        }
        Ok(Outlier {
            index,
            label,
            error: sum / sample.dim().max(1) as f32,
            peak_error: peak,
        })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::backend::CpuBackend;

    fn evaluator() -> Evaluator<CpuBackend> {
        let device = Default::default();
        let model = AutoencoderConfig::new()
            .with_input_dim(4)
            .with_hidden_dim(3)
            .with_code_dim(2)
            .init(&device);
        Evaluator::new(model, 4, device)
    }

    #[test]
    fn test_report_statistics() {
        let report = EvaluationReport::from_errors(vec![0.25, 0.5, 0.125, 1.0]);
        assert_eq!(report.samples, 4);
        assert!((report.mean_error - 0.46875).abs() < 1e-12);
        assert_eq!(report.min_error, 0.125);
        assert_eq!(report.max_error, 1.0);
        assert_eq!(report.worst(2), vec![(3, 1.0), (1, 0.5)]);
    }

    #[test]
    fn test_empty_report_is_nan() {
        let report = EvaluationReport::from_errors(Vec::new());
        assert_eq!(report.samples, 0);
        assert!(report.mean_error.is_nan());
        assert!(report.worst(3).is_empty());
    }

    #[test]
    fn test_evaluate_keeps_one_error_per_sample_in_order() {
        let ev = evaluator();
        let rows = vec![
            vec![0.0, 0.0, 0.0, 0.0],
            vec![1.0, 1.0, 1.0, 1.0],
            vec![0.5, 0.5, 0.5, 0.5],
        ];

        // Batch size 2 leaves a short final batch
        let report = ev.evaluate(ImageDataset::from_pixels(rows.clone()), 2).unwrap();
        assert_eq!(report.samples, 3);

        // Same numbers as scoring each image on its own
        for (i, row) in rows.into_iter().enumerate() {
            let single = ev.evaluate(ImageDataset::from_pixels(vec![row]), 1).unwrap();
            assert!((single.per_sample[0] - report.per_sample[i]).abs() < 1e-6);
        }
    }

    #[test]
    fn test_reconstruct_shape() {
        let ev  = evaluator();
        let out = ev.reconstruct(&ImageSample::new(vec![0.1, 0.2, 0.3, 0.4])).unwrap();
        assert_eq!(out.len(), 4);
        assert!(out.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_zero_batch_size_is_rejected() {
        let ev = evaluator();
        assert!(ev.evaluate(ImageDataset::new(Vec::new()), 0).is_err());
    }

    #[test]
    fn test_dimension_mismatch_is_rejected() {
        let ev = evaluator();

        let wrong = ImageDataset::from_pixels(vec![vec![0.5; 9]]);
        assert!(ev.evaluate(wrong, 2).is_err());

        // A bad row after good ones is caught too
        let mixed = ImageDataset::from_pixels(vec![vec![0.5; 4], vec![0.5; 9]]);
        assert!(ev.evaluate(mixed, 2).is_err());

        assert!(ev.reconstruct(&ImageSample::new(vec![0.5; 9])).is_err());
    }

    #[test]
    fn test_outlier_matches_evaluated_error() {
        let ev     = evaluator();
        let sample = ImageSample::new(vec![0.9, 0.1, 0.8, 0.2]);

        let report  = ev.evaluate(ImageDataset::new(vec![sample.clone()]), 1).unwrap();
        let outlier = ev.outlier(0, Some(3), &sample).unwrap();

        assert_eq!(outlier.index, 0);
        assert_eq!(outlier.label, Some(3));
        assert!((outlier.error - report.per_sample[0]).abs() < 1e-5);
        assert!(outlier.peak_error >= outlier.error.sqrt() - 1e-6);
        assert!(outlier.peak_error <= 1.0);
    }
}
