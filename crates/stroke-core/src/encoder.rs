//! Categorical lookup and feature-vector construction.
//!
//! All categorical fields share one flat label table. Labels are matched
//! exactly; anything not in the table encodes as `0` and is reported back to
//! the caller as an [`UnknownCategory`], or rejected outright in strict mode.
use std::collections::HashMap;
use std::sync::OnceLock;

use tracing::warn;

use crate::error::{Error, Result};
use crate::types::{FeatureVector, PatientRecord, UnknownCategory, FEATURE_COUNT};

/// Label-to-code pairs the model was trained with.
pub const CATEGORY_TABLE: [(&str, u8); 14] = [
    ("Male", 1),
    ("Female", 0),
    ("Yes", 1),
    ("No", 0),
    ("Urban", 1),
    ("Rural", 0),
    ("Private", 0),
    ("Self-employed", 1),
    ("Govt_job", 2),
    ("children", 3),
    ("formerly smoked", 0),
    ("never smoked", 1),
    ("smokes", 2),
    ("Unknown", 3),
];

/// Value used for labels missing from the table.
pub const UNKNOWN_CODE: u8 = 0;

#[derive(Debug)]
pub struct CategoryMap {
    codes: HashMap<&'static str, u8>,
}

impl CategoryMap {
    fn build() -> Self {
        Self { codes: CATEGORY_TABLE.into_iter().collect() }
    }

    /// The process-wide map, built on first use.
    pub fn standard() -> &'static CategoryMap {
        static MAP: OnceLock<CategoryMap> = OnceLock::new();
        MAP.get_or_init(Self::build)
    }

    pub fn code(&self, label: &str) -> Option<u8> { self.codes.get(label).copied() }

    pub fn len(&self) -> usize { self.codes.len() }

    pub fn is_empty(&self) -> bool { self.codes.is_empty() }
}

/// Result of encoding one record.
#[derive(Debug, Clone, PartialEq)]
pub struct Encoded {
    pub vector: FeatureVector,
    pub unknown: Vec<UnknownCategory>,
}

#[derive(Debug, Clone, Copy)]
pub struct FeatureEncoder {
    map: &'static CategoryMap,
    strict: bool,
}

impl Default for FeatureEncoder {
    fn default() -> Self { Self::new(false) }
}

impl FeatureEncoder {
    /// `strict` turns unknown labels into [`Error::UnknownCategory`].
    pub fn new(strict: bool) -> Self {
        Self { map: CategoryMap::standard(), strict }
    }

    pub fn is_strict(&self) -> bool { self.strict }

    pub fn encode(&self, record: &PatientRecord) -> Result<Encoded> {
        let mut unknown = Vec::new();
        let mut values = Vec::with_capacity(FEATURE_COUNT);
        values.push(self.category("gender", &record.gender, &mut unknown));
        values.push(record.age as f32);
        values.push(record.hypertension as f32);
        values.push(record.heart_disease as f32);
        values.push(self.category("ever_married", &record.ever_married, &mut unknown));
        values.push(self.category("work_type", &record.work_type, &mut unknown));
        values.push(self.category("residence_type", &record.residence_type, &mut unknown));
        values.push(record.avg_glucose_level);
        values.push(record.bmi);
        values.push(self.category("smoking_status", &record.smoking_status, &mut unknown));

        if self.strict {
            if let Some(first) = unknown.into_iter().next() {
                return Err(Error::UnknownCategory { field: first.field, label: first.label });
            }
            return Ok(Encoded { vector: FeatureVector::new(values), unknown: Vec::new() });
        }
        Ok(Encoded { vector: FeatureVector::new(values), unknown })
    }

    fn category(&self, field: &'static str, label: &str, unknown: &mut Vec<UnknownCategory>) -> f32 {
        match self.map.code(label) {
            Some(code) => f32::from(code),
            None => {
                warn!(field, "unknown category label, encoding as {}", UNKNOWN_CODE);
                unknown.push(UnknownCategory { field, label: label.to_string() });
                f32::from(UNKNOWN_CODE)
            }
        }
    }
}
