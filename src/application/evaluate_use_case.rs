// ============================================================
// Layer 2 — EvaluateUseCase
// ============================================================
// Scores a trained checkpoint on the MNIST test split:
//
//   Step 1: Load the saved training config  (Layer 6 - infra)
//   Step 2: Load MNIST test split           (Layer 4 - data)
//   Step 3: Normalise pixels                (Layer 4 - data)
//   Step 4: Rebuild model + load weights    (Layer 5 - ml)
//   Step 5: Measure reconstruction error    (Layer 5 - ml)
//   Step 6: Re-run the worst images         (Layer 5 - ml)

use anyhow::Result;
use burn::prelude::Backend;

use crate::data::{
    dataset::{ImageDataset, ImageSample},
    loader::MnistLoader,
    preprocessor::Normalizer,
};
use crate::domain::{
    image::{Image, Split},
    traits::ImageSource,
};
use crate::infra::checkpoint::{CheckpointChoice, CheckpointManager};
use crate::ml::backend::{BackendKind, CpuBackend, WgpuBackend};
use crate::ml::evaluator::{EvaluationReport, Evaluator};

#[derive(Debug, Clone)]
pub struct EvaluateConfig {
    pub checkpoint_dir: String,
    pub choice:         CheckpointChoice,
    pub batch_size:     usize,
    /// Use only the first N test images
    pub limit:          Option<usize>,
    /// Overrides the backend stored in the training config
    pub backend:        Option<BackendKind>,
    /// How many of the worst reconstructions to describe
    pub show:           usize,
}

pub struct EvaluateUseCase<S: ImageSource> {
    config: EvaluateConfig,
    source: S,
}

impl EvaluateUseCase<MnistLoader> {
    pub fn new(config: EvaluateConfig) -> Self {
        let source = MnistLoader::new(config.limit);
        Self::with_source(config, source)
    }
}

impl<S: ImageSource> EvaluateUseCase<S> {
    pub fn with_source(config: EvaluateConfig, source: S) -> Self {
        Self { config, source }
    }

    pub fn execute(&self) -> Result<EvaluationReport> {
        let ckpt_manager = CheckpointManager::new(&self.config.checkpoint_dir);
        let train_cfg    = ckpt_manager.load_config()?;
        let backend      = self.config.backend.unwrap_or(train_cfg.backend);

        let images  = self.source.load(Split::Test)?;
        let normalizer = Normalizer::new();
        let dataset = ImageDataset::from_pixels(normalizer.normalize_all(&images));

        tracing::info!("Evaluating {} test images on {}", dataset.sample_count(), backend);

        match backend {
            BackendKind::Wgpu => {
                let device = burn::backend::wgpu::WgpuDevice::default();
                let evaluator = Evaluator::<WgpuBackend>::from_checkpoint(
                    &ckpt_manager, self.config.choice, device,
                )?;
                self.score(&evaluator, &normalizer, &images, dataset)
            }
            BackendKind::Ndarray => {
                let device = burn::backend::ndarray::NdArrayDevice::default();
                let evaluator = Evaluator::<CpuBackend>::from_checkpoint(
                    &ckpt_manager, self.config.choice, device,
                )?;
                self.score(&evaluator, &normalizer, &images, dataset)
            }
        }
    }

    fn score<B: Backend>(
        &self,
        evaluator:  &Evaluator<B>,
        normalizer: &Normalizer,
        images:     &[Image],
        dataset:    ImageDataset,
    ) -> Result<EvaluationReport> {
        let mut report = evaluator.evaluate(dataset, self.config.batch_size)?;

        for (index, _) in report.worst(self.config.show) {
            let Some(image) = images.get(index) else { continue };
            let sample = ImageSample::new(normalizer.normalize(image));
            report.outliers.push(evaluator.outlier(index, image.label, &sample)?);
        }
        Ok(report)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::{tests::FixtureSource, TrainConfig, TrainUseCase};

    fn eval_config(dir: &std::path::Path, choice: CheckpointChoice) -> EvaluateConfig {
        EvaluateConfig {
            checkpoint_dir: dir.display().to_string(),
            choice,
            batch_size:     4,
            limit:          None,
            backend:        Some(BackendKind::Ndarray),
            show:           2,
        }
    }

    #[test]
    fn test_evaluate_after_training() {
        let dir = tempfile::tempdir().unwrap();
        let train_cfg = TrainConfig {
            checkpoint_dir: dir.path().display().to_string(),
            hidden_dim:     4,
            code_dim:       2,
            batch_size:     4,
            epochs:         2,
            num_workers:    1,
            backend:        BackendKind::Ndarray,
            ..TrainConfig::default()
        };
        TrainUseCase::with_source(train_cfg, FixtureSource { count: 10 })
            .execute()
            .unwrap();

        for choice in [CheckpointChoice::Latest, CheckpointChoice::Best] {
            let report = EvaluateUseCase::with_source(
                eval_config(dir.path(), choice),
                FixtureSource { count: 5 },
            )
            .execute()
            .unwrap();

            assert_eq!(report.samples, 5);
            assert!(report.mean_error.is_finite());
            assert!(report.min_error <= report.max_error);

            // Worst first, and in agreement with the batched scores
            assert_eq!(report.outliers.len(), 2);
            let worst = &report.outliers[0];
            assert!((worst.error as f64 - report.max_error).abs() < 1e-5);
            assert!(worst.label.is_some());
        }
    }

    #[test]
    fn test_evaluate_without_training_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = EvaluateUseCase::with_source(
            eval_config(dir.path(), CheckpointChoice::Latest),
            FixtureSource { count: 3 },
        )
        .execute();
        assert!(result.is_err());
    }
}
