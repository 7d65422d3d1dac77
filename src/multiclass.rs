//! One-vs-rest multiclass reductions of the binary kernels, plus the
//! multi-margin loss.
//!
//! For `C` classes each loss treats column `c` of the one-hot labels as a
//! `{-1,1}` binary problem against column `c` of the scores, then averages
//! the `C` per-class scalars. Classes with no positive (or no negative)
//! sample in the batch follow the binary zero-contribution policy.

use candle_core::{bail, Result, Tensor};

use crate::binary;
use crate::labels::normalize_one_hot;

/// Run a binary kernel per class column and average the results.
fn per_class_mean<F>(y_true: &Tensor, y_pred: &Tensor, kernel: F) -> Result<Tensor>
where
    F: Fn(&Tensor, &Tensor) -> Result<Tensor>,
{
    let (y_true, y_pred) = normalize_one_hot(y_true, y_pred)?;
    let classes = y_true.dim(1)?;
    if classes == 0 {
        bail!("multiclass loss needs at least one class column");
    }
    let mut total: Option<Tensor> = None;
    for c in 0..classes {
        let yc = y_true.narrow(1, c, 1)?.squeeze(1)?;
        let pc = y_pred.narrow(1, c, 1)?.squeeze(1)?;
        let l = kernel(&yc, &pc)?;
        total = Some(match total {
            None => l,
            Some(prev) => (prev + l)?,
        });
    }
    total.unwrap().affine(1.0 / classes as f64, 0.0)
}

/// Class-averaged KR gap over one-vs-rest columns.
pub fn multiclass_kr_loss(y_true: &Tensor, y_pred: &Tensor) -> Result<Tensor> {
    per_class_mean(y_true, y_pred, binary::kr_loss)
}

/// Class-averaged hinge-margin loss over one-vs-rest columns.
pub fn multiclass_hinge_loss(y_true: &Tensor, y_pred: &Tensor, margin: f64) -> Result<Tensor> {
    per_class_mean(y_true, y_pred, |y, p| binary::hinge_margin_loss(y, p, margin))
}

/// Class-averaged HKR loss over one-vs-rest columns.
pub fn multiclass_hkr_loss(
    y_true: &Tensor,
    y_pred: &Tensor,
    alpha: f64,
    margin: f64,
) -> Result<Tensor> {
    per_class_mean(y_true, y_pred, |y, p| binary::hkr_loss(y, p, alpha, margin))
}

/// Multi-margin loss: for each sample with true class `y`,
/// `Σ_{j≠y} relu(margin − s_y + s_j)`, averaged over the batch.
///
/// Penalises every rival class whose score comes within `margin` of the
/// true class score.
pub fn multi_margin_loss(y_true: &Tensor, y_pred: &Tensor, margin: f64) -> Result<Tensor> {
    let (y_true, y_pred) = normalize_one_hot(y_true, y_pred)?;
    // Back to a {0,1} mask over the true class.
    let pos_mask = y_true.gt(0.0)?.to_dtype(y_pred.dtype())?;
    // True-class score per sample, kept as (batch, 1) for broadcasting.
    let s_true = y_pred.mul(&pos_mask)?.sum_keepdim(1)?;
    // relu(margin − s_true + s_j) for every class, then mask out j = y.
    let viol = y_pred
        .broadcast_sub(&s_true)?
        .affine(1.0, margin)?
        .relu()?;
    let neg_mask = pos_mask.affine(-1.0, 1.0)?;
    viol.mul(&neg_mask)?.sum(1)?.mean_all()
}

// ── Tests ───────────────────────────────────────────────────────────────────
