// ============================================================
// Layer 6 — Metrics
// ============================================================
// Two small pieces used by the training loop:
//
//   RunningMean   — accumulates batch losses during an epoch
//                   and reports their average, the way a
//                   "mean" metric does in a notebook loop
//
//   MetricsLogger — appends one CSV row per epoch so learning
//                   curves can be plotted after the run
//
// Output file: checkpoints/metrics.csv
//
// Example CSV output:
//   epoch,train_loss,val_loss
//   1,0.068210,0.052104
//   2,0.047331,0.043872
//   ...
//
// How to read the metrics:
//   - Both losses should fall each epoch
//   - val_loss rising while train_loss keeps falling → overfitting

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};
use serde::{Deserialize, Serialize};

const CSV_HEADER: &str = "epoch,train_loss,val_loss";

// ─── RunningMean ──────────────────────────────────────────────────────────────
/// Streaming arithmetic mean.
#[derive(Debug, Clone, Default)]
pub struct RunningMean {
    sum:   f64,
    count: usize,
}

impl RunningMean {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, value: f64) {
        self.sum   += value;
        self.count += 1;
    }

    /// Mean of everything seen since the last reset; NaN if nothing was seen.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.sum / self.count as f64
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ─── EpochMetrics ─────────────────────────────────────────────────────────────
/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Average reconstruction MSE over all training batches
    pub train_loss: f64,

    /// Average reconstruction MSE on the validation set
    /// (NaN when there is no validation set)
    pub val_loss: f64,
}

impl EpochMetrics {
    pub fn new(epoch: usize, train_loss: f64, val_loss: f64) -> Self {
        Self { epoch, train_loss, val_loss }
    }

    /// The loss used for model selection: validation loss when
    /// available, training loss otherwise.
    pub fn selection_loss(&self) -> f64 {
        if self.val_loss.is_nan() { self.train_loss } else { self.val_loss }
    }

    /// Returns true if this epoch improved over the previous best loss
    pub fn is_improvement(&self, best_loss: f64) -> bool {
        self.selection_loss() < best_loss
    }
}

// ─── MetricsLogger ────────────────────────────────────────────────────────────
/// Logs epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger.
    /// Writes the CSV header if the file doesn't exist yet.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create metrics directory '{}'", dir.display()))?;

        let csv_path = dir.join("metrics.csv");

        // Header only for a new file so later runs append below earlier ones
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)
                .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
            writeln!(f, "{CSV_HEADER}")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row in the CSV.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        writeln!(f, "{},{:.6},{:.6}", m.epoch, m.train_loss, m.val_loss)?;

        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, val_loss={:.4}",
            m.epoch,
            m.train_loss,
            m.val_loss,
        );

        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_mean() {
        let mut m = RunningMean::new();
        assert!(m.mean().is_nan());

        m.update(1.0);
        m.update(2.0);
        m.update(6.0);
        assert_eq!(m.count(), 3);
        assert!((m.mean() - 3.0).abs() < 1e-12);

        m.reset();
        assert_eq!(m.count(), 0);
        assert!(m.mean().is_nan());
    }

    #[test]
    fn test_is_improvement() {
        let m = EpochMetrics::new(2, 0.05, 0.04);
        assert!(m.is_improvement(0.06));
        assert!(!m.is_improvement(0.03));
    }

    #[test]
    fn test_selection_falls_back_to_train_loss() {
        let m = EpochMetrics::new(1, 0.05, f64::NAN);
        assert_eq!(m.selection_loss(), 0.05);
        assert!(m.is_improvement(f64::INFINITY));
    }

    #[test]
    fn test_logger_writes_header_once() {
        let dir = tempfile::tempdir().unwrap();

        let logger = MetricsLogger::new(dir.path()).unwrap();
        logger.log(&EpochMetrics::new(1, 0.5, 0.25)).unwrap();

        // A second logger on the same directory appends, no new header
        let logger = MetricsLogger::new(dir.path()).unwrap();
        logger.log(&EpochMetrics::new(2, 0.125, 0.0625)).unwrap();

        let csv = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines, vec![
            CSV_HEADER,
            "1,0.500000,0.250000",
            "2,0.125000,0.062500",
        ]);
    }
}
