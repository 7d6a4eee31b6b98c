// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load MNIST train split    (Layer 4 - data)
//   Step 2: Normalise pixels to [0,1] (Layer 4 - data)
//   Step 3: Split train/validation    (Layer 4 - data)
//   Step 4: Build Burn datasets       (Layer 4 - data)
//   Step 5: Save config               (Layer 6 - infra)
//   Step 6: Run training loop         (Layer 5 - ml)
//
// Reference: Burn Book §5 (Training)

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::data::{
    dataset::ImageDataset,
    loader::MnistLoader,
    preprocessor::Normalizer,
    splitter::split_train_val,
};
use crate::domain::{image::Split, traits::ImageSource};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::backend::BackendKind;
use crate::ml::trainer::{run_training, TrainingSummary};

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run.
// Saved next to the checkpoints so `evaluate` can rebuild the
// same model shape before loading weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub checkpoint_dir: String,
    /// Flattened image size; taken from the data before training
    pub input_dim:      usize,
    pub hidden_dim:     usize,
    pub code_dim:       usize,
    pub batch_size:     usize,
    pub epochs:         usize,
    pub lr:             f64,
    pub momentum:       f64,
    /// Share of the training split kept for training; the rest validates
    pub train_fraction: f64,
    pub seed:           u64,
    /// Use only the first N training images
    pub limit:          Option<usize>,
    pub num_workers:    usize,
    pub backend:        BackendKind,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            checkpoint_dir: "checkpoints".to_string(),
            input_dim:      784,
            hidden_dim:     128,
            code_dim:       64,
            batch_size:     128,
            epochs:         20,
            lr:             1e-2,
            momentum:       0.9,
            train_fraction: 0.9,
            seed:           42,
            limit:          None,
            num_workers:    2,
            backend:        BackendKind::Wgpu,
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase<S: ImageSource> {
    config: TrainConfig,
    source: S,
}

impl TrainUseCase<MnistLoader> {
    /// Train on MNIST, honouring the configured image limit
    pub fn new(config: TrainConfig) -> Self {
        let source = MnistLoader::new(config.limit);
        Self::with_source(config, source)
    }
}

impl<S: ImageSource> TrainUseCase<S> {
    pub fn with_source(config: TrainConfig, source: S) -> Self {
        Self { config, source }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainingSummary> {
        let mut cfg = self.config.clone();

        // ── Step 1: Load training images ──────────────────────────────────────
        let images = self.source.load(Split::Train)?;
        if let Some(first) = images.first() {
            if first.is_empty() {
                bail!("Training images have no pixels");
            }
            if let Some((index, odd)) = images
                .iter()
                .enumerate()
                .find(|(_, img)| img.len() != first.len())
            {
                bail!(
                    "Image {} is {}x{} but image 0 is {}x{}; all images must be the same size",
                    index, odd.width, odd.height, first.width, first.height
                );
            }
            cfg.input_dim = first.len();
        }

        // ── Step 2: Flatten + scale to [0, 1] ─────────────────────────────────
        let rows = Normalizer::new().normalize_all(&images);

        // ── Step 3: Train / validation split ──────────────────────────────────
        let (train_rows, val_rows) = split_train_val(rows, cfg.train_fraction, cfg.seed);
        tracing::info!(
            "Split: {} train, {} validation",
            train_rows.len(),
            val_rows.len()
        );

        // ── Step 4: Build Burn datasets ───────────────────────────────────────
        let train_dataset = ImageDataset::from_pixels(train_rows);
        let val_dataset   = ImageDataset::from_pixels(val_rows);

        // ── Step 5: Save config for evaluation ────────────────────────────────
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir);
        ckpt_manager.save_config(&cfg)?;

        // ── Step 6: Run training loop (Layer 5) ───────────────────────────────
        run_training(&cfg, train_dataset, val_dataset, &ckpt_manager)
    }
}
