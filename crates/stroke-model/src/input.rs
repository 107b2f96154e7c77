use anyhow::Result;
use candle_core::{Device, Tensor};
use stroke_core::types::FeatureVector;

/// Shape a feature vector as a single-row `[1, n]` batch on `device`.
pub fn features_to_tensor(features: &FeatureVector, device: &Device) -> Result<Tensor> {
    let n = features.len();
    Ok(Tensor::from_vec(features.as_slice().to_vec(), (1, n), device)?)
}
