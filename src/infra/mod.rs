// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns used by the training and evaluation
// workflows:
//
//   checkpoint.rs — Saving and loading model weights
//                   (Burn's CompactRecorder) plus the JSON
//                   training config and latest/best pointers
//
//   metrics.rs    — Running mean of batch losses and a CSV
//                   log of per-epoch losses
//
// Reference: Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Running loss mean and training metrics CSV logger
pub mod metrics;
