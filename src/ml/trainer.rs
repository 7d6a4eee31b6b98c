// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Train + validation loop using Burn's DataLoader and SGD with
// momentum.
//
// Per batch:
//   forward → MSE(reconstruction, input) → backward → SGD step
//
// Per epoch:
//   running mean of batch losses, validation pass on the inner
//   (non-autodiff) backend, CSV row, checkpoint, best-epoch pointer.
//
// Key Burn insight:
//   - Training uses Autodiff<B> for gradients
//   - model.valid() returns the model on B::InnerBackend
//   - the validation batcher must use B::InnerBackend too

use std::sync::Arc;

use anyhow::{bail, Result};
use burn::{
    data::dataloader::{DataLoader, DataLoaderBuilder},
    module::AutodiffModule,
    optim::{momentum::MomentumConfig, GradientsParams, Optimizer, SgdConfig},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{
    batcher::{ImageBatch, ImageBatcher},
    dataset::ImageDataset,
};
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::metrics::{EpochMetrics, MetricsLogger, RunningMean};
use crate::ml::backend::{BackendKind, CpuTrainBackend, WgpuTrainBackend};
use crate::ml::model::{Autoencoder, AutoencoderConfig};

/// Emit a debug line every this many training batches
const LOG_INTERVAL: usize = 100;

/// What a finished run looked like, epoch by epoch.
#[derive(Debug, Clone)]
pub struct TrainingSummary {
    pub epochs:     Vec<EpochMetrics>,
    /// Epoch with the lowest selection loss (None if no epoch ran)
    pub best_epoch: Option<usize>,
    pub best_loss:  f64,
}

impl TrainingSummary {
    pub fn final_metrics(&self) -> Option<&EpochMetrics> {
        self.epochs.last()
    }
}

pub fn run_training(
    cfg:           &TrainConfig,
    train_dataset: ImageDataset,
    val_dataset:   ImageDataset,
    ckpt_manager:  &CheckpointManager,
) -> Result<TrainingSummary> {
    match cfg.backend {
        BackendKind::Wgpu => {
            let device = burn::backend::wgpu::WgpuDevice::default();
            tracing::info!("Using WGPU device: {:?}", device);
            train_loop::<WgpuTrainBackend>(cfg, train_dataset, val_dataset, ckpt_manager, device)
                .map(|(_, summary)| summary)
        }
        BackendKind::Ndarray => {
            let device = burn::backend::ndarray::NdArrayDevice::default();
            tracing::info!("Using NdArray CPU device: {:?}", device);
            train_loop::<CpuTrainBackend>(cfg, train_dataset, val_dataset, ckpt_manager, device)
                .map(|(_, summary)| summary)
        }
    }
}

pub fn train_loop<B: AutodiffBackend>(
    cfg:           &TrainConfig,
    train_dataset: ImageDataset,
    val_dataset:   ImageDataset,
    ckpt_manager:  &CheckpointManager,
    device:        B::Device,
) -> Result<(Autoencoder<B>, TrainingSummary)> {
    if train_dataset.sample_count() == 0 {
        bail!("Training set is empty, nothing to train on");
    }
    if cfg.batch_size == 0 {
        bail!("batch_size must be at least 1");
    }
    train_dataset.check_dim(cfg.input_dim)?;
    val_dataset.check_dim(cfg.input_dim)?;

    // Pointers from an earlier run would name weights this run never wrote
    ckpt_manager.clear_pointers()?;

    // ── Build model ───────────────────────────────────────────────────────────
    let model_cfg = AutoencoderConfig::new()
        .with_input_dim(cfg.input_dim)
        .with_hidden_dim(cfg.hidden_dim)
        .with_code_dim(cfg.code_dim);
    let mut model: Autoencoder<B> = model_cfg.init(&device);
    tracing::info!(
        "Model ready: {} → {} → {} → {} → {}",
        cfg.input_dim, cfg.hidden_dim, cfg.code_dim, cfg.hidden_dim, cfg.input_dim
    );

    // ── SGD with momentum ─────────────────────────────────────────────────────
    // v = μ*v + g
    // θ = θ - lr * v
    let momentum  = MomentumConfig::new()
        .with_momentum(cfg.momentum)
        .with_dampening(0.0);
    let mut optim = SgdConfig::new()
        .with_momentum(Some(momentum))
        .init();

    // ── Training data loader (AutodiffBackend) ────────────────────────────────
    let train_loader = shuffled_loader::<B>(cfg, device.clone(), train_dataset);

    // ── Validation data loader (InnerBackend — no autodiff overhead) ──────────
    let has_validation = val_dataset.sample_count() > 0;
    let val_batcher = ImageBatcher::<B::InnerBackend>::new(device.clone());
    let val_loader  = DataLoaderBuilder::new(val_batcher)
        .batch_size(cfg.batch_size)
        .num_workers(cfg.num_workers.max(1))
        .build(val_dataset);

    let metrics_logger = MetricsLogger::new(ckpt_manager.dir())?;
    tracing::info!("Logging metrics to '{}'", metrics_logger.csv_path().display());

    let mut summary = TrainingSummary {
        epochs:     Vec::with_capacity(cfg.epochs),
        best_epoch: None,
        best_loss:  f64::INFINITY,
    };
    let mut train_loss = RunningMean::new();
    let mut val_loss   = RunningMean::new();

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {
        train_loss.reset();

        for batch in train_loader.iter() {
            let (loss, _) = model.forward_loss(batch.images);
            train_loss.update(loss.clone().into_scalar().elem::<f64>());

            // Backward pass + SGD update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);

            if train_loss.count() % LOG_INTERVAL == 0 {
                tracing::debug!(
                    "Epoch {} batch {}: running loss={:.6}",
                    epoch, train_loss.count(), train_loss.mean()
                );
            }
        }

        // ── Validation phase ──────────────────────────────────────────────────
        val_loss.reset();
        if has_validation {
            let model_valid = model.valid();
            for batch in val_loader.iter() {
                let (loss, _) = model_valid.forward_loss(batch.images);
                val_loss.update(loss.into_scalar().elem::<f64>());
            }
        }

        let metrics = EpochMetrics::new(epoch, train_loss.mean(), val_loss.mean());
        println!(
            "Epoch {:>3}/{} | train_loss={:.6} | val_loss={:.6}",
            epoch, cfg.epochs, metrics.train_loss, metrics.val_loss,
        );
        metrics_logger.log(&metrics)?;

        ckpt_manager.save_model(&model, epoch)?;
        if metrics.is_improvement(summary.best_loss) {
            summary.best_loss  = metrics.selection_loss();
            summary.best_epoch = Some(epoch);
            ckpt_manager.mark_best(epoch)?;
            tracing::info!("New best model at epoch {} (loss={:.6})", epoch, summary.best_loss);
        }
        summary.epochs.push(metrics);
    }

    if summary.best_epoch.is_none() && !summary.epochs.is_empty() {
        tracing::warn!(
            "No epoch reached a finite loss; no best checkpoint was recorded"
        );
    }
    tracing::info!("Training complete!");
    Ok((model, summary))
}

/// Training loader: batches in a fresh seeded order on every `iter()`.
fn shuffled_loader<B: Backend>(
    cfg:     &TrainConfig,
    device:  B::Device,
    dataset: ImageDataset,
) -> Arc<dyn DataLoader<ImageBatch<B>>> {
    DataLoaderBuilder::new(ImageBatcher::<B>::new(device))
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(cfg.num_workers.max(1))
        .build(dataset)
}
