//! Binary loss kernels: KR, negated KR, hinge-margin, HKR.
//!
//! Every kernel normalizes its inputs through [`crate::labels`] and returns
//! a scalar tensor in the prediction dtype. Gradients flow through the
//! predictions only; class masks and counts are treated as constants.
//!
//! # Degenerate batches
//!
//! [`kr_loss`] estimates a gap between two class-conditional means. When a
//! batch contains no sample of one class, that class's mean is undefined;
//! the policy here is that the missing class contributes 0 to the gap, so
//! the loss stays finite and deterministic on single-class batches.

use candle_core::{DType, Result, Tensor};

use crate::labels::normalize_binary;

/// Mean of `y_pred` over the entries where `mask` is 1, as a scalar tensor.
/// Returns 0 when the mask selects nothing. The count is read through an
/// F32 view so the mask may live in any prediction dtype.
fn masked_mean(y_pred: &Tensor, mask: &Tensor) -> Result<Tensor> {
    let count = mask.sum_all()?.to_dtype(DType::F32)?.to_scalar::<f32>()? as f64;
    if count == 0.0 {
        return Tensor::zeros((), y_pred.dtype(), y_pred.device());
    }
    y_pred.mul(mask)?.sum_all()?.affine(1.0 / count, 0.0)
}

/// Kantorovich-Rubinstein dual-potential gap:
/// `mean(y_pred | y=+1) − mean(y_pred | y=−1)`.
///
/// With a 1-Lipschitz scorer this estimates the Wasserstein-1 distance
/// between the two label-conditioned score distributions, so training
/// *maximises* it; use [`neg_kr_loss`] with a minimising optimiser.
pub fn kr_loss(y_true: &Tensor, y_pred: &Tensor) -> Result<Tensor> {
    let (y_true, y_pred) = normalize_binary(y_true, y_pred)?;
    let pos = y_true.gt(0.0)?.to_dtype(y_pred.dtype())?;
    let neg = y_true.lt(0.0)?.to_dtype(y_pred.dtype())?;
    masked_mean(&y_pred, &pos)? - masked_mean(&y_pred, &neg)?
}

/// `−kr_loss`, for frameworks that only minimise.
pub fn neg_kr_loss(y_true: &Tensor, y_pred: &Tensor) -> Result<Tensor> {
    kr_loss(y_true, y_pred)?.neg()
}

/// Hinge loss with a configurable margin:
/// `mean(relu(margin − y · y_pred))`.
///
/// The margin must be validated by the caller ([`crate::Loss`] does this at
/// construction); the kernel assumes it is finite and positive.
pub fn hinge_margin_loss(y_true: &Tensor, y_pred: &Tensor, margin: f64) -> Result<Tensor> {
    let (y_true, y_pred) = normalize_binary(y_true, y_pred)?;
    let agreement = y_true.mul(&y_pred)?;
    agreement.affine(-1.0, margin)?.relu()?.mean_all()
}

/// HKR loss: `alpha · hinge(margin) − (1 − alpha) · kr`.
///
/// `alpha` weights the hinge term; `alpha = 0` is the pure (negated) KR
/// objective and `alpha = 1` drops the Wasserstein estimate entirely.
pub fn hkr_loss(y_true: &Tensor, y_pred: &Tensor, alpha: f64, margin: f64) -> Result<Tensor> {
    let hinge = hinge_margin_loss(y_true, y_pred, margin)?;
    let kr = kr_loss(y_true, y_pred)?;
    hinge.affine(alpha, 0.0)? - kr.affine(1.0 - alpha, 0.0)?
}

// ── Tests ───────────────────────────────────────────────────────────────────
