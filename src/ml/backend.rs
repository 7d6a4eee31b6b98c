// ============================================================
// Layer 5 — Backend Selection
// ============================================================
// Burn code is generic over the Backend trait; these are the
// two concrete backends the binary is built with.
//
//   wgpu    — GPU through WebGPU (Vulkan / Metal / DX12)
//   ndarray — pure-Rust CPU fallback, also used by the tests
//
// Training wraps either one in Autodiff to get gradients.

use serde::{Deserialize, Serialize};
use std::fmt;

pub type WgpuBackend = burn::backend::Wgpu;
pub type CpuBackend  = burn::backend::NdArray;

pub type WgpuTrainBackend = burn::backend::Autodiff<WgpuBackend>;
pub type CpuTrainBackend  = burn::backend::Autodiff<CpuBackend>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Wgpu,
    Ndarray,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Wgpu    => write!(f, "wgpu"),
            BackendKind::Ndarray => write!(f, "ndarray"),
        }
    }
}
