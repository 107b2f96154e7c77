use crate::encoder::FeatureEncoder;
use crate::error::{Error, Result};
use crate::recommendation::Recommendation;
use crate::traits::Classifier;
use crate::types::{FeatureVector, PatientRecord, UnknownCategory};

/// Everything produced for one patient record.
#[derive(Debug, Clone)]
pub struct Assessment {
    pub vector: FeatureVector,
    pub score: f32,
    pub unknown: Vec<UnknownCategory>,
    pub recommendation: Recommendation,
}

/// Encoder, classifier and recommendation selector wired together.
pub struct Assessor<C> where C: Classifier {
    encoder: FeatureEncoder,
    classifier: C,
}

impl<C> Assessor<C> where C: Classifier {
    pub fn new(encoder: FeatureEncoder, classifier: C) -> Self { Self { encoder, classifier } }

    pub fn classifier(&self) -> &C { &self.classifier }

    pub fn assess(&self, record: &PatientRecord) -> Result<Assessment> {
        let encoded = self.encoder.encode(record)?;
        encoded.vector.check_len(self.classifier.n_features())?;
        let score = self.classifier.predict(&encoded.vector).map_err(Error::Inference)?;
        Ok(Assessment {
            vector: encoded.vector,
            score,
            unknown: encoded.unknown,
            recommendation: Recommendation::select(score),
        })
    }
}
