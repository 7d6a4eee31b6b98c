// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores autoencoder weights using Burn's
// CompactRecorder.
//
// What gets saved:
//   1. Model weights (.mpk.gz file) — one per epoch
//   2. latest_epoch.json            — last epoch written
//   3. best_epoch.json              — epoch with lowest val loss
//   4. train_config.json            — layer sizes and hyperparameters
//
// The config is needed to rebuild a model of the right shape
// before the weights can be loaded into it.
//
// File naming convention:
//   checkpoints/
//     model_epoch_1.mpk.gz
//     model_epoch_2.mpk.gz
//     ...
//     latest_epoch.json
//     best_epoch.json
//     train_config.json
//     metrics.csv            ← written by MetricsLogger
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{anyhow, Context, Result};
use std::{fs, path::{Path, PathBuf}};
use burn::{
    prelude::*,
    record::CompactRecorder,
};

use crate::application::train_use_case::TrainConfig;
use crate::ml::model::Autoencoder;

const LATEST_FILE: &str = "latest_epoch.json";
const BEST_FILE:   &str = "best_epoch.json";
const CONFIG_FILE: &str = "train_config.json";

/// Which saved epoch to restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckpointChoice {
    Latest,
    Best,
}

/// Manages saving and loading of model checkpoints.
/// All files are stored in the configured directory.
#[derive(Debug, Clone)]
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a new CheckpointManager rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create checkpoint directory '{}'", self.dir.display()))
    }

    fn model_path(&self, epoch: usize) -> PathBuf {
        // No extension — the recorder adds .mpk.gz
        self.dir.join(format!("model_epoch_{epoch}"))
    }

    /// Save model weights for a given epoch and move the latest pointer.
    pub fn save_model<B: Backend>(&self, model: &Autoencoder<B>, epoch: usize) -> Result<()> {
        self.ensure_dir()?;
        let path = self.model_path(epoch);

        model
            .clone()
            .save_file(path.clone(), &CompactRecorder::new())
            .map_err(|e| anyhow!("Failed to save checkpoint to '{}': {:?}", path.display(), e))?;

        self.write_pointer(LATEST_FILE, epoch)?;
        tracing::debug!("Saved checkpoint: epoch {}", epoch);
        Ok(())
    }

    /// Record `epoch` as the best one seen so far.
    /// The weights for that epoch must already have been saved.
    pub fn mark_best(&self, epoch: usize) -> Result<()> {
        self.write_pointer(BEST_FILE, epoch)
    }

    /// Forget the latest/best pointers of an earlier run in this directory.
    /// Weight files are left alone; they are overwritten epoch by epoch.
    pub fn clear_pointers(&self) -> Result<()> {
        for name in [LATEST_FILE, BEST_FILE] {
            let path = self.dir.join(name);
            match fs::remove_file(&path) {
                Ok(()) => tracing::debug!("Removed stale '{}'", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(e).with_context(|| format!("Cannot remove '{}'", path.display()))
                }
            }
        }
        Ok(())
    }

    /// Load weights from the chosen checkpoint into `model`.
    ///
    /// The model must have the architecture the checkpoint was
    /// saved with, or loading fails.
    pub fn load_model<B: Backend>(
        &self,
        model:  Autoencoder<B>,
        choice: CheckpointChoice,
        device: &B::Device,
    ) -> Result<Autoencoder<B>> {
        let epoch = match choice {
            CheckpointChoice::Latest => self.latest_epoch()?,
            CheckpointChoice::Best   => self.best_epoch()?,
        };
        let path = self.model_path(epoch);

        tracing::info!("Loading checkpoint from epoch {}", epoch);

        model
            .load_file(path.clone(), &CompactRecorder::new(), device)
            .map_err(|e| anyhow!(
                "Cannot load checkpoint '{}'. Have you trained the model first? ({:?})",
                path.display(), e
            ))
    }

    /// Save the training configuration to JSON.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        self.ensure_dir()?;
        let path = self.dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    /// Load the training configuration from JSON.
    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join(CONFIG_FILE);

        let json = fs::read_to_string(&path)
            .with_context(|| {
                format!(
                    "Cannot read config from '{}'. \
                     Make sure you have run 'train' before 'evaluate'.",
                    path.display()
                )
            })?;

        serde_json::from_str(&json)
            .with_context(|| format!("Malformed config in '{}'", path.display()))
    }

    pub fn latest_epoch(&self) -> Result<usize> {
        self.read_pointer(LATEST_FILE)
    }

    pub fn best_epoch(&self) -> Result<usize> {
        self.read_pointer(BEST_FILE)
    }

    fn write_pointer(&self, name: &str, epoch: usize) -> Result<()> {
        self.ensure_dir()?;
        let path = self.dir.join(name);
        fs::write(&path, serde_json::to_string(&epoch)?)
            .with_context(|| format!("Failed to write '{}'", path.display()))
    }

    fn read_pointer(&self, name: &str) -> Result<usize> {
        let path = self.dir.join(name);
        let s = fs::read_to_string(&path)
            .with_context(|| format!("Cannot find '{}'. Have you run 'train' first?", path.display()))?;
        Ok(serde_json::from_str::<usize>(&s)?)
    }
}
