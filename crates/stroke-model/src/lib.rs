//! stroke-model
//!
//! Loads the stroke classifier from a safetensors artifact and scores feature
//! vectors with candle. The artifact holds a feed-forward network:
//! `layers.{i}.weight` `[out, in]` and `layers.{i}.bias` `[out]`, ReLU
//! between layers, and an optional `scaler.mean` / `scaler.scale` pair
//! applied to the raw features first. A single output is read through a
//! sigmoid; two outputs through a softmax (class 1 is "stroke").
//!
//! `APP_USE_FAKE_MODEL=1` or `model.use_fake` switches to a deterministic
//! hash-based classifier for development and tests.
use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use candle_core::{DType, Device, Module, Tensor, D};
use candle_nn::Linear;
use tracing::info;

use stroke_core::config::ModelSettings;
use stroke_core::traits::Classifier;
use stroke_core::types::{FeatureVector, FEATURE_COUNT};

pub mod device;
pub mod input;

pub use device::select_device;
pub use input::features_to_tensor;

struct Scaler { mean: Tensor, scale: Tensor }

pub struct TensorClassifier { layers: Vec<Linear>, scaler: Option<Scaler>, n_features: usize, outputs: usize, device: Device }

impl TensorClassifier {
    pub fn load(path: &Path, device: &Device) -> Result<Self> {
        if !path.exists() {
            return Err(stroke_core::Error::NotFound(format!("model artifact {}", path.display())).into());
        }
        info!(path = %path.display(), "loading model weights");
        let tensors = candle_core::safetensors::load(path, device)
            .with_context(|| format!("Failed to read safetensors from {}", path.display()))?;
        let model = Self::from_tensors(tensors, device)?;
        info!(features = model.n_features, layers = model.layers.len(), outputs = model.outputs, "model loaded");
        Ok(model)
    }

    pub fn from_tensors(mut tensors: HashMap<String, Tensor>, device: &Device) -> Result<Self> {
        let mut layers = Vec::new();
        let mut n_features = 0usize;
        let mut prev_out: Option<usize> = None;
        for i in 0.. {
            let Some(weight) = tensors.remove(&format!("layers.{i}.weight")) else { break };
            let bias = tensors
                .remove(&format!("layers.{i}.bias"))
                .ok_or_else(|| anyhow!("layers.{i}.bias missing"))?;
            let weight = weight.to_dtype(DType::F32)?;
            let bias = bias.to_dtype(DType::F32)?;
            let (out_dim, in_dim) = weight.dims2().with_context(|| format!("layers.{i}.weight must be 2-D"))?;
            let bias_dim = bias.dims1().with_context(|| format!("layers.{i}.bias must be 1-D"))?;
            if bias_dim != out_dim {
                return Err(anyhow!("layers.{i}.bias has {bias_dim} values, weight has {out_dim} outputs"));
            }
            match prev_out {
                None => n_features = in_dim,
                Some(prev) if prev != in_dim => {
                    return Err(anyhow!("layers.{i} expects {in_dim} inputs but previous layer emits {prev}"));
                }
                Some(_) => {}
            }
            prev_out = Some(out_dim);
            layers.push(Linear::new(weight, Some(bias)));
        }
        let outputs = prev_out.ok_or_else(|| anyhow!("artifact has no layers.0.weight"))?;
        if outputs != 1 && outputs != 2 {
            return Err(anyhow!("final layer must have 1 or 2 outputs, got {outputs}"));
        }
        let scaler = match (tensors.remove("scaler.mean"), tensors.remove("scaler.scale")) {
            (Some(mean), Some(scale)) => Some(Self::build_scaler(mean, scale, n_features)?),
            (None, None) => None,
            _ => return Err(anyhow!("scaler.mean and scaler.scale must be provided together")),
        };
        Ok(Self { layers, scaler, n_features, outputs, device: device.clone() })
    }

    fn build_scaler(mean: Tensor, scale: Tensor, n_features: usize) -> Result<Scaler> {
        let mean = mean.to_dtype(DType::F32)?;
        let scale = scale.to_dtype(DType::F32)?;
        if mean.dims1()? != n_features || scale.dims1()? != n_features {
            return Err(anyhow!("scaler tensors must have {n_features} values"));
        }
        if scale.to_vec1::<f32>()?.iter().any(|s| *s == 0.0 || !s.is_finite()) {
            return Err(anyhow!("scaler.scale must be finite and non-zero"));
        }
        Ok(Scaler { mean: mean.unsqueeze(0)?, scale: scale.unsqueeze(0)? })
    }

    /// Class-1 probability for a `[batch, n_features]` input.
    pub fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let mut h = match &self.scaler {
            Some(s) => xs.broadcast_sub(&s.mean)?.broadcast_div(&s.scale)?,
            None => xs.clone(),
        };
        let last = self.layers.len() - 1;
        for (i, layer) in self.layers.iter().enumerate() {
            h = layer.forward(&h)?;
            if i < last { h = h.relu()?; }
        }
        let probs = if self.outputs == 1 {
            candle_nn::ops::sigmoid(&h)?
        } else {
            candle_nn::ops::softmax(&h, D::Minus1)?.narrow(1, 1, 1)?
        };
        Ok(probs.squeeze(1)?)
    }

    pub fn outputs(&self) -> usize { self.outputs }
}

impl Classifier for TensorClassifier {
    fn n_features(&self) -> usize { self.n_features }

    fn predict(&self, features: &FeatureVector) -> Result<f32> {
        features.check_len(self.n_features)?;
        let xs = features_to_tensor(features, &self.device)?;
        let probs = self.forward(&xs)?.to_device(&Device::Cpu)?.to_vec1::<f32>()?;
        probs.first().copied().ok_or_else(|| anyhow!("model produced no output"))
    }
}

/// Deterministic stand-in: hashes the feature bits into a score in `[0, 1)`.
pub struct FakeClassifier { n_features: usize }

impl FakeClassifier { pub fn new(n_features: usize) -> Self { Self { n_features } } }

impl Classifier for FakeClassifier {
    fn n_features(&self) -> usize { self.n_features }

    fn predict(&self, features: &FeatureVector) -> Result<f32> {
        use std::hash::Hasher;
        use twox_hash::XxHash64;
        features.check_len(self.n_features)?;
        let mut hasher = XxHash64::with_seed(0);
        for v in features.as_slice() { hasher.write_u32(v.to_bits()); }
        let h = hasher.finish();
        Ok(((h >> 40) as f32) / ((1u64 << 24) as f32))
    }
}

fn use_fake_from_env() -> bool {
    std::env::var("APP_USE_FAKE_MODEL").ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true")).unwrap_or(false)
}

/// Build the classifier described by `settings`; relative paths resolve against `base`.
pub fn get_default_classifier(settings: &ModelSettings, base: &Path) -> Result<Box<dyn Classifier>> {
    if settings.use_fake || use_fake_from_env() {
        info!("using FakeClassifier");
        return Ok(Box::new(FakeClassifier::new(FEATURE_COUNT)));
    }
    let path = resolve_model_path(settings, base)?;
    let device = select_device(settings.device);
    let model = TensorClassifier::load(&path, &device)?;
    if model.n_features() != FEATURE_COUNT {
        return Err(anyhow!(
            "model at {} expects {} features, patient records provide {}",
            path.display(),
            model.n_features(),
            FEATURE_COUNT
        ));
    }
    Ok(Box::new(model))
}

fn resolve_model_path(settings: &ModelSettings, base: &Path) -> Result<PathBuf> {
    let configured = settings.resolved_path(base);
    if configured.exists() { info!(path = %configured.display(), "using configured model"); return Ok(configured); }
    let legacy = base.join("stroke_model.safetensors");
    if legacy.exists() { info!(path = %legacy.display(), "using legacy model location"); return Ok(legacy); }
    Err(anyhow!("Could not locate model artifact (looked at {} and {})", configured.display(), legacy.display()))
}
