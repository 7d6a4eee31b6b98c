// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `train` and `evaluate`
// and all their configurable flags.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand, ValueEnum};

use crate::application::{evaluate_use_case::EvaluateConfig, train_use_case::TrainConfig};
use crate::infra::checkpoint::CheckpointChoice;
use crate::ml::backend::BackendKind;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the autoencoder on the MNIST training split
    Train(TrainArgs),

    /// Measure reconstruction error of a trained checkpoint on the MNIST test split
    Evaluate(EvaluateArgs),
}

/// Compute backend (clap-facing mirror of BackendKind)
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum BackendArg {
    /// GPU through WebGPU
    Wgpu,
    /// Pure-Rust CPU
    Ndarray,
}

impl From<BackendArg> for BackendKind {
    fn from(b: BackendArg) -> Self {
        match b {
            BackendArg::Wgpu    => BackendKind::Wgpu,
            BackendArg::Ndarray => BackendKind::Ndarray,
        }
    }
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Directory to save checkpoints, config and metrics
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Units in the hidden layer of encoder and decoder
    #[arg(long, default_value_t = 128)]
    pub hidden_dim: usize,

    /// Size of the compressed code
    #[arg(long, default_value_t = 64)]
    pub code_dim: usize,

    /// Number of images per gradient step
    #[arg(long, default_value_t = 128)]
    pub batch_size: usize,

    /// Number of full passes through the training data
    #[arg(long, default_value_t = 20)]
    pub epochs: usize,

    /// SGD learning rate
    #[arg(long, default_value_t = 1e-2)]
    pub lr: f64,

    /// SGD momentum factor
    #[arg(long, default_value_t = 0.9)]
    pub momentum: f64,

    /// Fraction of the training split used for training; the rest is validation
    #[arg(long, default_value_t = 0.9)]
    pub train_fraction: f64,

    /// Seed for the train/validation split and per-epoch shuffling
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Only use the first N training images
    #[arg(long)]
    pub limit: Option<usize>,

    /// Data-loading worker threads (prefetching)
    #[arg(long, default_value_t = 2)]
    pub num_workers: usize,

    #[arg(long, value_enum, default_value_t = BackendArg::Wgpu)]
    pub backend: BackendArg,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            checkpoint_dir: a.checkpoint_dir,
            hidden_dim:     a.hidden_dim,
            code_dim:       a.code_dim,
            batch_size:     a.batch_size,
            epochs:         a.epochs,
            lr:             a.lr,
            momentum:       a.momentum,
            train_fraction: a.train_fraction,
            seed:           a.seed,
            limit:          a.limit,
            num_workers:    a.num_workers,
            backend:        a.backend.into(),
            // Overwritten from the data once images are loaded
            ..TrainConfig::default()
        }
    }
}

/// All arguments for the `evaluate` command
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Directory where checkpoints were saved during training
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Load the epoch with the lowest validation loss instead of the last one
    #[arg(long)]
    pub best: bool,

    #[arg(long, default_value_t = 256)]
    pub batch_size: usize,

    /// Only use the first N test images
    #[arg(long)]
    pub limit: Option<usize>,

    /// Print the N worst reconstructions
    #[arg(long, default_value_t = 0)]
    pub show: usize,

    /// Override the backend recorded at training time
    #[arg(long, value_enum)]
    pub backend: Option<BackendArg>,
}

impl From<&EvaluateArgs> for EvaluateConfig {
    fn from(a: &EvaluateArgs) -> Self {
        EvaluateConfig {
            checkpoint_dir: a.checkpoint_dir.clone(),
            choice:         if a.best { CheckpointChoice::Best } else { CheckpointChoice::Latest },
            batch_size:     a.batch_size,
            limit:          a.limit,
            backend:        a.backend.map(Into::into),
            show:           a.show,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_train_defaults() {
        let cli = Cli::try_parse_from(["autoencoder", "train"]).unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        let cfg: TrainConfig = args.into();
        assert_eq!(cfg.epochs, 20);
        assert_eq!(cfg.batch_size, 128);
        assert_eq!(cfg.backend, BackendKind::Wgpu);
    }

    #[test]
    fn test_evaluate_flags() {
        let cli = Cli::try_parse_from([
            "autoencoder", "evaluate", "--best", "--backend", "ndarray", "--limit", "100",
        ]).unwrap();
        let Commands::Evaluate(args) = cli.command else { panic!("expected evaluate") };
        let cfg = EvaluateConfig::from(&args);
        assert_eq!(cfg.choice, CheckpointChoice::Best);
        assert_eq!(cfg.backend, Some(BackendKind::Ndarray));
        assert_eq!(cfg.limit, Some(100));
    }
}
