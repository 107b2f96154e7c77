use std::sync::Arc;

use crate::types::FeatureVector;

/// A binary classifier scoring stroke risk in `[0, 1]`.
pub trait Classifier: Send + Sync {
    /// Number of inputs the model expects.
    fn n_features(&self) -> usize;
    fn predict(&self, features: &FeatureVector) -> anyhow::Result<f32>;
}

impl<T: Classifier + ?Sized> Classifier for Arc<T> {
    fn n_features(&self) -> usize { (**self).n_features() }
    fn predict(&self, features: &FeatureVector) -> anyhow::Result<f32> { (**self).predict(features) }
}

impl<T: Classifier + ?Sized> Classifier for Box<T> {
    fn n_features(&self) -> usize { (**self).n_features() }
    fn predict(&self, features: &FeatureVector) -> anyhow::Result<f32> { (**self).predict(features) }
}
