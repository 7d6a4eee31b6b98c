// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All model, training and evaluation code that talks to Burn.
//
// What's in this layer:
//
//   backend.rs   — the concrete Burn backends (wgpu, ndarray)
//
//   model.rs     — the autoencoder:
//                  • Encoder: dense+ReLU, dense+sigmoid
//                  • Decoder: dense+ReLU, dense+sigmoid
//                  • MSE reconstruction loss
//
//   trainer.rs   — the training loop: forward, loss, backward,
//                  SGD-with-momentum step, validation, and
//                  checkpoint saving per epoch
//
//   evaluator.rs — loads a checkpoint and scores reconstruction
//                  error on held-out images
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)

/// Concrete Burn backends the binary runs on
pub mod backend;

/// Autoencoder model architecture
pub mod model;

/// Training loop with validation and checkpointing
pub mod trainer;

/// Reconstruction-error evaluation from a checkpoint
pub mod evaluator;
