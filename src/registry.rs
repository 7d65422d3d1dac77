//! Loss kinds and the stable-name registry.
//!
//! A [`Loss`] is a closed enum: every supported objective is a variant
//! carrying its construction-time configuration, and dispatch happens in
//! [`Loss::call`]. Each variant has a stable string name (the serde tag)
//! so a saved model can name its loss in `config.json` and resolve it on
//! reload via [`build`].
//!
//! Configuration is validated once, at construction; the kernels never
//! re-check. Constructors reject a non-finite or non-positive margin and
//! an alpha outside `[0, 1]`.

use candle_core::{bail, Result, Tensor};
use serde::{Deserialize, Serialize};

use crate::{binary, multiclass};

/// Default hinge margin, matching the usual 1-Lipschitz training setup.
pub const DEFAULT_MARGIN: f64 = 1.0;

/// A loss objective with its fixed configuration.
///
/// Stateless apart from the configuration: calling it is a pure function
/// of `(y_true, y_pred)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Loss {
    /// Kantorovich-Rubinstein gap (to be maximised).
    Kr,
    /// Negated KR gap, for minimising optimisers.
    NegKr,
    /// Hinge loss with margin.
    HingeMargin { margin: f64 },
    /// `alpha · hinge − (1 − alpha) · kr`.
    Hkr { alpha: f64, margin: f64 },
    /// One-vs-rest KR, class-averaged.
    MulticlassKr,
    /// One-vs-rest hinge, class-averaged.
    MulticlassHinge { margin: f64 },
    /// One-vs-rest HKR, class-averaged.
    MulticlassHkr { alpha: f64, margin: f64 },
    /// Multi-margin loss over rival classes.
    MultiMargin { margin: f64 },
}

fn check_margin(margin: f64) -> Result<()> {
    if !margin.is_finite() || margin <= 0.0 {
        bail!("margin must be finite and > 0, got {margin}");
    }
    Ok(())
}

fn check_alpha(alpha: f64) -> Result<()> {
    if !alpha.is_finite() || !(0.0..=1.0).contains(&alpha) {
        bail!("alpha must be in [0, 1], got {alpha}");
    }
    Ok(())
}

impl Loss {
    pub fn kr() -> Self {
        Self::Kr
    }

    pub fn neg_kr() -> Self {
        Self::NegKr
    }

    pub fn hinge_margin(margin: f64) -> Result<Self> {
        check_margin(margin)?;
        Ok(Self::HingeMargin { margin })
    }

    pub fn hkr(alpha: f64, margin: f64) -> Result<Self> {
        check_alpha(alpha)?;
        check_margin(margin)?;
        Ok(Self::Hkr { alpha, margin })
    }

    pub fn multiclass_kr() -> Self {
        Self::MulticlassKr
    }

    pub fn multiclass_hinge(margin: f64) -> Result<Self> {
        check_margin(margin)?;
        Ok(Self::MulticlassHinge { margin })
    }

    pub fn multiclass_hkr(alpha: f64, margin: f64) -> Result<Self> {
        check_alpha(alpha)?;
        check_margin(margin)?;
        Ok(Self::MulticlassHkr { alpha, margin })
    }

    pub fn multi_margin(margin: f64) -> Result<Self> {
        check_margin(margin)?;
        Ok(Self::MultiMargin { margin })
    }

    /// The stable registry name (also the serde tag).
    pub fn name(&self) -> &'static str {
        match self {
            Self::Kr => "kr",
            Self::NegKr => "neg_kr",
            Self::HingeMargin { .. } => "hinge_margin",
            Self::Hkr { .. } => "hkr",
            Self::MulticlassKr => "multiclass_kr",
            Self::MulticlassHinge { .. } => "multiclass_hinge",
            Self::MulticlassHkr { .. } => "multiclass_hkr",
            Self::MultiMargin { .. } => "multi_margin",
        }
    }

    /// Re-run the construction-time checks. Used after deserialization,
    /// where serde bypasses the constructors.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Kr | Self::NegKr | Self::MulticlassKr => Ok(()),
            Self::HingeMargin { margin }
            | Self::MulticlassHinge { margin }
            | Self::MultiMargin { margin } => check_margin(margin),
            Self::Hkr { alpha, margin } | Self::MulticlassHkr { alpha, margin } => {
                check_alpha(alpha)?;
                check_margin(margin)
            }
        }
    }

    /// Evaluate the loss: `(y_true, y_pred) → scalar tensor`.
    pub fn call(&self, y_true: &Tensor, y_pred: &Tensor) -> Result<Tensor> {
        match *self {
            Self::Kr => binary::kr_loss(y_true, y_pred),
            Self::NegKr => binary::neg_kr_loss(y_true, y_pred),
            Self::HingeMargin { margin } => binary::hinge_margin_loss(y_true, y_pred, margin),
            Self::Hkr { alpha, margin } => binary::hkr_loss(y_true, y_pred, alpha, margin),
            Self::MulticlassKr => multiclass::multiclass_kr_loss(y_true, y_pred),
            Self::MulticlassHinge { margin } => {
                multiclass::multiclass_hinge_loss(y_true, y_pred, margin)
            }
            Self::MulticlassHkr { alpha, margin } => {
                multiclass::multiclass_hkr_loss(y_true, y_pred, alpha, margin)
            }
            Self::MultiMargin { margin } => multiclass::multi_margin_loss(y_true, y_pred, margin),
        }
    }
}

/// Every stable name the registry resolves.
pub const LOSS_NAMES: &[&str] = &[
    "kr",
    "neg_kr",
    "hinge_margin",
    "hkr",
    "multiclass_kr",
    "multiclass_hinge",
    "multiclass_hkr",
    "multi_margin",
];

/// Build a validated [`Loss`] from its stable name.
///
/// `margin` and `alpha` default to [`DEFAULT_MARGIN`] and `0.5` for the
/// variants that need them; names that take no parameters ignore both.
pub fn build(name: &str, margin: Option<f64>, alpha: Option<f64>) -> Result<Loss> {
    let margin = margin.unwrap_or(DEFAULT_MARGIN);
    let alpha = alpha.unwrap_or(0.5);
    match name {
        "kr" => Ok(Loss::kr()),
        "neg_kr" => Ok(Loss::neg_kr()),
        "hinge_margin" => Loss::hinge_margin(margin),
        "hkr" => Loss::hkr(alpha, margin),
        "multiclass_kr" => Ok(Loss::multiclass_kr()),
        "multiclass_hinge" => Loss::multiclass_hinge(margin),
        "multiclass_hkr" => Loss::multiclass_hkr(alpha, margin),
        "multi_margin" => Loss::multi_margin(margin),
        other => bail!("unknown loss name {other:?}"),
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
