//! # candle-lip — Lipschitz-training losses for candle
//!
//! Loss functions for training Lipschitz-constrained networks, built on
//! `candle-core`/`candle-nn` for tensors, autodiff, and serialization:
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`labels`] | label encoding/shape/dtype normalization |
//! | [`binary`] | `kr_loss`, `neg_kr_loss`, `hinge_margin_loss`, `hkr_loss` |
//! | [`multiclass`] | one-vs-rest KR/hinge/HKR, `multi_margin_loss` |
//! | [`registry`] | the [`Loss`] enum and its stable-name registry |
//! | [`checkpoint`] | safetensors + JSON save/load with load-by-name |
//!
//! Labels may arrive as integers or floats, in `{0,1}` or `{-1,1}`
//! encoding, shaped `(batch,)` or `(batch, 1)`; every loss normalizes them
//! to a single canonical form before any arithmetic, so the same semantic
//! assignment always produces the same value.
//!
//! ```no_run
//! use candle_core::{Device, Tensor};
//! use candle_lip::Loss;
//!
//! # fn main() -> anyhow::Result<()> {
//! let dev = Device::Cpu;
//! let y_true = Tensor::new(&[1.0f32, 1.0, 0.0, 0.0], &dev)?;
//! let y_pred = Tensor::new(&[0.8f32, 0.4, -0.5, -0.3], &dev)?;
//! let loss = Loss::hkr(0.5, 1.0)?;
//! let value = loss.call(&y_true, &y_pred)?;
//! # Ok(())
//! # }
//! ```

pub mod binary;
pub mod checkpoint;
pub mod labels;
pub mod multiclass;
pub mod registry;

// ── Public re-exports ───────────────────────────────────────────────────────

pub use binary::{hinge_margin_loss, hkr_loss, kr_loss, neg_kr_loss};
pub use labels::{normalize_binary, normalize_one_hot};
pub use multiclass::{
    multi_margin_loss, multiclass_hinge_loss, multiclass_hkr_loss, multiclass_kr_loss,
};
pub use registry::{build, Loss, DEFAULT_MARGIN, LOSS_NAMES};
