//! Label normalization: encoding, dtype, and shape canonicalisation.
//!
//! Every loss in this crate accepts labels the way users actually hand them
//! over: integer or float dtype, `{0,1}` or `{-1,1}` encoding, shape
//! `(batch,)` or `(batch, 1)`. The kernels themselves only ever see one
//! canonical form: rank-1 float tensors with labels in `{-1, +1}`.
//!
//! # Encoding detection
//!
//! A label tensor containing any zero entry is treated as `{0,1}`-encoded
//! and remapped with `y ↦ 2y − 1`; otherwise it is assumed to already be
//! `{-1,1}`. This is the only rule consistent with both encodings: a valid
//! `{-1,1}` tensor never contains a zero.

use candle_core::{bail, Result, Tensor};

/// True for the floating-point dtypes the loss kernels can run in.
fn is_float(t: &Tensor) -> bool {
    t.dtype().is_float()
}

/// Flatten a `(batch,)` or `(batch, 1)` tensor to rank 1, rejecting
/// anything else. Returns the batch dimension.
fn to_rank1(t: &Tensor, what: &str) -> Result<(Tensor, usize)> {
    match t.dims() {
        [b] => Ok((t.clone(), *b)),
        [b, 1] => Ok((t.reshape((*b,))?, *b)),
        dims => bail!("{what} must have shape (batch,) or (batch, 1), got {dims:?}"),
    }
}

/// Remap `{0,1}` labels to `{-1,1}` when any zero entry is present.
fn remap_encoding(y: &Tensor) -> Result<Tensor> {
    let zeros = y.eq(0.0)?.to_dtype(candle_core::DType::F32)?;
    if zeros.sum_all()?.to_scalar::<f32>()? > 0.0 {
        y.affine(2.0, -1.0)
    } else {
        Ok(y.clone())
    }
}

/// Normalize a binary (labels, predictions) pair to canonical form.
///
/// * Labels are cast to the prediction dtype and remapped to `{-1,1}`.
/// * Both tensors come back as rank-1 `(batch,)`.
///
/// Fails if the prediction dtype is not floating point, if either tensor
/// has an unsupported rank, or if the batch dimensions differ.
pub fn normalize_binary(y_true: &Tensor, y_pred: &Tensor) -> Result<(Tensor, Tensor)> {
    if !is_float(y_pred) {
        bail!(
            "predictions must be a float tensor, got {:?}",
            y_pred.dtype()
        );
    }
    let (y_pred, pred_batch) = to_rank1(y_pred, "predictions")?;
    let (y_true, true_batch) = to_rank1(y_true, "labels")?;
    if true_batch != pred_batch {
        bail!("batch mismatch: {true_batch} labels vs {pred_batch} predictions");
    }
    let y_true = remap_encoding(&y_true.to_dtype(y_pred.dtype())?)?;
    Ok((y_true, y_pred))
}

/// Normalize a one-vs-rest (labels, predictions) pair for the multiclass
/// losses. Both tensors must be `(batch, classes)` with identical shapes;
/// labels are cast to the prediction dtype and remapped so each column is
/// a `{-1,1}` one-vs-rest assignment.
pub fn normalize_one_hot(y_true: &Tensor, y_pred: &Tensor) -> Result<(Tensor, Tensor)> {
    if !is_float(y_pred) {
        bail!(
            "predictions must be a float tensor, got {:?}",
            y_pred.dtype()
        );
    }
    let (pred_dims, true_dims) = (y_pred.dims(), y_true.dims());
    if pred_dims.len() != 2 {
        bail!("multiclass predictions must have shape (batch, classes), got {pred_dims:?}");
    }
    if true_dims != pred_dims {
        bail!("label shape {true_dims:?} does not match prediction shape {pred_dims:?}");
    }
    let y_true = remap_encoding(&y_true.to_dtype(y_pred.dtype())?)?;
    Ok((y_true, y_pred.clone()))
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::{DType, Device, Tensor};

    #[test]
    fn zero_one_labels_are_remapped() {
        let dev = Device::Cpu;
        let y = Tensor::new(&[1.0f32, 0.0, 1.0], &dev).unwrap();
        let p = Tensor::new(&[0.3f32, -0.2, 0.9], &dev).unwrap();
        let (y, _) = normalize_binary(&y, &p).unwrap();
        assert_eq!(y.to_vec1::<f32>().unwrap(), vec![1.0, -1.0, 1.0]);
    }

    #[test]
    fn signed_labels_pass_through() {
        let dev = Device::Cpu;
        let y = Tensor::new(&[1.0f32, -1.0, 1.0], &dev).unwrap();
        let p = Tensor::new(&[0.3f32, -0.2, 0.9], &dev).unwrap();
        let (y, _) = normalize_binary(&y, &p).unwrap();
        assert_eq!(y.to_vec1::<f32>().unwrap(), vec![1.0, -1.0, 1.0]);
    }

    #[test]
    fn integer_labels_are_cast() {
        let dev = Device::Cpu;
        let y = Tensor::new(&[1u32, 0, 1], &dev).unwrap();
        let p = Tensor::new(&[0.3f32, -0.2, 0.9], &dev).unwrap();
        let (y, _) = normalize_binary(&y, &p).unwrap();
        assert_eq!(y.dtype(), DType::F32);
        assert_eq!(y.to_vec1::<f32>().unwrap(), vec![1.0, -1.0, 1.0]);
    }

    #[test]
    fn column_labels_are_flattened() {
        let dev = Device::Cpu;
        let y = Tensor::new(&[[1.0f32], [0.0], [1.0]], &dev).unwrap();
        let p = Tensor::new(&[[0.3f32], [-0.2], [0.9]], &dev).unwrap();
        let (y, p) = normalize_binary(&y, &p).unwrap();
        assert_eq!(y.dims(), &[3]);
        assert_eq!(p.dims(), &[3]);
    }

    #[test]
    fn mixed_ranks_are_aligned() {
        let dev = Device::Cpu;
        let y = Tensor::new(&[1.0f32, 0.0, 1.0], &dev).unwrap();
        let p = Tensor::new(&[[0.3f32], [-0.2], [0.9]], &dev).unwrap();
        let (y, p) = normalize_binary(&y, &p).unwrap();
        assert_eq!(y.dims(), p.dims());
    }

    #[test]
    fn batch_mismatch_fails() {
        let dev = Device::Cpu;
        let y = Tensor::new(&[1.0f32, 0.0], &dev).unwrap();
        let p = Tensor::new(&[0.3f32, -0.2, 0.9], &dev).unwrap();
        assert!(normalize_binary(&y, &p).is_err());
    }

    #[test]
    fn integer_predictions_fail() {
        let dev = Device::Cpu;
        let y = Tensor::new(&[1.0f32, 0.0], &dev).unwrap();
        let p = Tensor::new(&[1u32, 0], &dev).unwrap();
        assert!(normalize_binary(&y, &p).is_err());
    }

    #[test]
    fn wide_labels_rejected_for_binary() {
        let dev = Device::Cpu;
        let y = Tensor::new(&[[1.0f32, 0.0], [0.0, 1.0]], &dev).unwrap();
        let p = Tensor::new(&[0.3f32, -0.2], &dev).unwrap();
        assert!(normalize_binary(&y, &p).is_err());
    }

    #[test]
    fn one_hot_shape_must_match() {
        let dev = Device::Cpu;
        let y = Tensor::new(&[[1.0f32, 0.0], [0.0, 1.0]], &dev).unwrap();
        let p = Tensor::new(&[[0.3f32, -0.2, 0.1], [0.5, 0.1, -0.4]], &dev).unwrap();
        assert!(normalize_one_hot(&y, &p).is_err());
    }

    #[test]
    fn one_hot_is_remapped_per_entry() {
        let dev = Device::Cpu;
        let y = Tensor::new(&[[1.0f32, 0.0], [0.0, 1.0]], &dev).unwrap();
        let p = Tensor::new(&[[0.3f32, -0.2], [0.5, 0.1]], &dev).unwrap();
        let (y, _) = normalize_one_hot(&y, &p).unwrap();
        assert_eq!(
            y.to_vec2::<f32>().unwrap(),
            vec![vec![1.0, -1.0], vec![-1.0, 1.0]]
        );
    }
}
