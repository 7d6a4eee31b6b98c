// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from the MNIST archives to tensor batches.
//
// The pipeline flows in this order:
//
//   MNIST (burn vision dataset, cached on disk)
//       │
//       ▼
//   MnistLoader       → domain Images (u8 pixels + label)
//       │
//       ▼
//   Normalizer        → flat Vec<f32> in [0, 1]
//       │
//       ▼
//   split_train_val   → seeded train / validation partition
//       │
//       ▼
//   ImageDataset      → implements Burn's Dataset trait
//       │
//       ▼
//   ImageBatcher      → stacks samples into [N, D] tensors
//       │
//       ▼
//   DataLoader        → shuffles, batches and prefetches
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads MNIST through burn's vision dataset
pub mod loader;

/// Flattens and scales raw pixels
pub mod preprocessor;

/// Implements Burn's Dataset trait for image samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Shuffles and splits data into train/validation sets
pub mod splitter;
