//! Checkpoint save/load: weights as safetensors, loss configuration as JSON.
//!
//! A checkpoint directory holds two files:
//!
//! * `model.safetensors` — the [`VarMap`] weights.
//! * `config.json` — the [`Loss`] spec under its stable name.
//!
//! On reload the loss is resolved by name through the registry and
//! re-validated, so a model saved with any loss in this crate reproduces
//! identical loss values after a round trip.

use std::path::Path;

use candle_nn::VarMap;
use serde::{Deserialize, Serialize};

use crate::registry::Loss;

const WEIGHTS_FILE: &str = "model.safetensors";
const CONFIG_FILE: &str = "config.json";

/// On-disk checkpoint configuration. Room for future fields; unknown keys
/// are ignored on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CheckpointConfig {
    loss: Loss,
}

/// Save weights and loss configuration into `dir` (created if missing).
pub fn save(dir: &Path, varmap: &VarMap, loss: &Loss) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)?;
    varmap.save(&dir.join(WEIGHTS_FILE))?;
    let config = CheckpointConfig { loss: *loss };
    std::fs::write(
        dir.join(CONFIG_FILE),
        serde_json::to_string_pretty(&config)?,
    )?;
    tracing::info!(dir = %dir.display(), loss = loss.name(), "saved checkpoint");
    Ok(())
}

/// Read the loss back from `config.json`, re-validated.
pub fn load_loss(dir: &Path) -> anyhow::Result<Loss> {
    let json = std::fs::read_to_string(dir.join(CONFIG_FILE))?;
    let config: CheckpointConfig = serde_json::from_str(&json)?;
    config.loss.validate()?;
    tracing::info!(dir = %dir.display(), loss = config.loss.name(), "loaded loss");
    Ok(config.loss)
}

/// Load the saved weights into a rebuilt model's `varmap`.
pub fn load_weights(dir: &Path, varmap: &mut VarMap) -> anyhow::Result<()> {
    varmap.load(dir.join(WEIGHTS_FILE))?;
    Ok(())
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::{DType, Device, Tensor};
    use candle_nn::{Linear, Module, VarBuilder};

    /// Build a `Dense(10 → out)` head the way the trainer would.
    fn dense(varmap: &VarMap, out: usize, dev: &Device) -> Linear {
        let vb = VarBuilder::from_varmap(varmap, DType::F32, dev);
        candle_nn::linear(10, out, vb).unwrap()
    }

    fn round_trip(loss: Loss, out: usize, y_true: &Tensor) {
        let dev = Device::Cpu;
        let dir = tempfile::tempdir().unwrap();
        let x = Tensor::randn(0.0f32, 1.0, (y_true.dim(0).unwrap(), 10), &dev).unwrap();

        let varmap = VarMap::new();
        let model = dense(&varmap, out, &dev);
        let before = loss
            .call(y_true, &model.forward(&x).unwrap())
            .unwrap()
            .to_scalar::<f32>()
            .unwrap();
        save(dir.path(), &varmap, &loss).unwrap();

        let mut varmap2 = VarMap::new();
        let model2 = dense(&varmap2, out, &dev);
        load_weights(dir.path(), &mut varmap2).unwrap();
        let loss2 = load_loss(dir.path()).unwrap();
        assert_eq!(loss2, loss);
        let after = loss2
            .call(y_true, &model2.forward(&x).unwrap())
            .unwrap()
            .to_scalar::<f32>()
            .unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn binary_losses_round_trip() {
        let dev = Device::Cpu;
        let ones = Tensor::ones((16,), DType::F32, &dev).unwrap();
        let zeros = Tensor::zeros((16,), DType::F32, &dev).unwrap();
        let y = Tensor::cat(&[&ones, &zeros], 0).unwrap();
        round_trip(Loss::kr(), 1, &y);
        round_trip(Loss::neg_kr(), 1, &y);
        round_trip(Loss::hinge_margin(1.0).unwrap(), 1, &y);
        round_trip(Loss::hkr(0.5, 2.0).unwrap(), 1, &y);
    }

    #[test]
    fn multiclass_losses_round_trip() {
        let dev = Device::Cpu;
        // 32 samples, 4 classes, true class = sample index mod 4.
        let mut one_hot = vec![0.0f32; 32 * 4];
        for i in 0..32 {
            one_hot[i * 4 + i % 4] = 1.0;
        }
        let y = Tensor::from_vec(one_hot, (32, 4), &dev).unwrap();
        round_trip(Loss::multiclass_kr(), 4, &y);
        round_trip(Loss::multiclass_hinge(1.0).unwrap(), 4, &y);
        round_trip(Loss::multiclass_hkr(0.3, 1.0).unwrap(), 4, &y);
        round_trip(Loss::multi_margin(1.0).unwrap(), 4, &y);
    }

    #[test]
    fn tampered_config_is_rejected_on_load() {
        let dev = Device::Cpu;
        let dir = tempfile::tempdir().unwrap();
        let varmap = VarMap::new();
        let _ = dense(&varmap, 1, &dev);
        save(dir.path(), &varmap, &Loss::hinge_margin(1.0).unwrap()).unwrap();

        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{"loss":{"name":"hinge_margin","margin":-1.0}}"#,
        )
        .unwrap();
        assert!(load_loss(dir.path()).is_err());
    }
}
