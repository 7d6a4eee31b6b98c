// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, built on clap.
// All work is delegated to Layer 2 (application).
//
// Two commands are supported:
//   1. `train`    — trains the autoencoder on MNIST
//   2. `evaluate` — scores a checkpoint on the MNIST test split
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, EvaluateArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "autoencoder",
    version,
    about = "Train a fully-connected autoencoder on MNIST, then measure reconstruction error."
)]
pub struct Cli {
    /// The subcommand to run (train or evaluate)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the matching use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)    => run_train(args),
            Commands::Evaluate(args) => run_evaluate(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training, checkpoints in: {}", args.checkpoint_dir);

    let use_case = TrainUseCase::new(args.into());
    let summary  = use_case.execute()?;

    match (summary.best_epoch, summary.final_metrics()) {
        (Some(best), Some(last)) => println!(
            "Training complete. Final train_loss={:.6}, best epoch {} (loss={:.6}).",
            last.train_loss, best, summary.best_loss
        ),
        (None, Some(last)) => println!(
            "Training ran {} epochs but never reached a finite loss (final train_loss={}). \
             No best checkpoint was recorded; try a smaller --lr.",
            last.epoch, last.train_loss
        ),
        (_, None) => println!("Training complete. No epochs were run."),
    }
    Ok(())
}

fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    use crate::application::evaluate_use_case::EvaluateUseCase;

    let report = EvaluateUseCase::new((&args).into()).execute()?;

    println!("\nTest images:          {}", report.samples);
    println!("Mean reconstruction:  {:.6}", report.mean_error);
    println!("Min / max:            {:.6} / {:.6}", report.min_error, report.max_error);

    if !report.outliers.is_empty() {
        println!("\nWorst reconstructions:");
        println!("  {:<7} {:<5} {:>10} {:>10}", "index", "digit", "error", "peak");
        for o in &report.outliers {
            let digit = o.label.map_or_else(|| "-".to_string(), |l| l.to_string());
            println!("  #{:<6} {:<5} {:>10.6} {:>10.6}", o.index, digit, o.error, o.peak_error);
        }
    }
    Ok(())
}
