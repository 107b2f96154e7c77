//! Domain types for a single prediction request.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of model inputs.
pub const FEATURE_COUNT: usize = 10;

/// Field names in the order the model was trained on.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "gender",
    "age",
    "hypertension",
    "heart_disease",
    "ever_married",
    "work_type",
    "residence_type",
    "avg_glucose_level",
    "bmi",
    "smoking_status",
];

/// Human-readable labels for `FEATURE_NAMES`, used by reports.
pub const FEATURE_LABELS: [&str; FEATURE_COUNT] = [
    "Gender",
    "Age",
    "Hypertension",
    "Heart Disease",
    "Ever Married",
    "Work Type",
    "Residence Type",
    "Avg Glucose Level",
    "BMI",
    "Smoking Status",
];

/// The ten patient fields exactly as submitted by the HTML form.
///
/// Values are kept as strings so that the page and the PDF report can echo
/// them back verbatim. Use [`PatientForm::parse`] to obtain a typed record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatientForm {
    pub gender: String,
    pub age: String,
    pub hypertension: String,
    pub heart_disease: String,
    pub ever_married: String,
    pub work_type: String,
    pub residence_type: String,
    pub avg_glucose_level: String,
    pub bmi: String,
    pub smoking_status: String,
}

impl PatientForm {
    /// Raw values in feature order.
    pub fn values(&self) -> [&str; FEATURE_COUNT] {
        [
            &self.gender,
            &self.age,
            &self.hypertension,
            &self.heart_disease,
            &self.ever_married,
            &self.work_type,
            &self.residence_type,
            &self.avg_glucose_level,
            &self.bmi,
            &self.smoking_status,
        ]
    }

    /// `(name, value)` pairs in feature order.
    pub fn named_values(&self) -> impl Iterator<Item = (&'static str, &str)> {
        FEATURE_NAMES.into_iter().zip(self.values())
    }

    /// `(label, value)` pairs in feature order.
    pub fn labeled_values(&self) -> impl Iterator<Item = (&'static str, &str)> {
        FEATURE_LABELS.into_iter().zip(self.values())
    }

    /// Mutable access to a field by its form name.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        Some(match name {
            "gender" => &mut self.gender,
            "age" => &mut self.age,
            "hypertension" => &mut self.hypertension,
            "heart_disease" => &mut self.heart_disease,
            "ever_married" => &mut self.ever_married,
            "work_type" => &mut self.work_type,
            "residence_type" => &mut self.residence_type,
            "avg_glucose_level" => &mut self.avg_glucose_level,
            "bmi" => &mut self.bmi,
            "smoking_status" => &mut self.smoking_status,
            _ => return None,
        })
    }

    /// Parse numeric fields and build a typed record.
    ///
    /// Surrounding whitespace is ignored. Categorical fields are copied as-is;
    /// resolving them is the encoder's job.
    pub fn parse(&self) -> Result<PatientRecord> {
        Ok(PatientRecord {
            gender: self.gender.clone(),
            age: parse_integer("age", &self.age)?,
            hypertension: parse_integer("hypertension", &self.hypertension)?,
            heart_disease: parse_integer("heart_disease", &self.heart_disease)?,
            ever_married: self.ever_married.clone(),
            work_type: self.work_type.clone(),
            residence_type: self.residence_type.clone(),
            avg_glucose_level: parse_decimal("avg_glucose_level", &self.avg_glucose_level)?,
            bmi: parse_decimal("bmi", &self.bmi)?,
            smoking_status: self.smoking_status.clone(),
        })
    }
}

/// A validated patient record. Lives for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub gender: String,
    pub age: i32,
    pub hypertension: i32,
    pub heart_disease: i32,
    pub ever_married: String,
    pub work_type: String,
    pub residence_type: String,
    pub avg_glucose_level: f32,
    pub bmi: f32,
    pub smoking_status: String,
}

fn parse_integer(field: &'static str, raw: &str) -> Result<i32> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| Error::InvalidNumber { field, value: raw.to_string() })
}

fn parse_decimal(field: &'static str, raw: &str) -> Result<f32> {
    match raw.trim().parse::<f32>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(Error::InvalidNumber { field, value: raw.to_string() }),
    }
}

/// Model input: one `f32` per patient field, in `FEATURE_NAMES` order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector(Vec<f32>);

impl FeatureVector {
    pub fn new(values: Vec<f32>) -> Self { Self(values) }

    pub fn as_slice(&self) -> &[f32] { &self.0 }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Fail unless the vector has exactly `expected` elements.
    pub fn check_len(&self, expected: usize) -> Result<()> {
        if self.0.len() == expected {
            Ok(())
        } else {
            Err(Error::FeatureLength { expected, actual: self.0.len() })
        }
    }
}

impl From<Vec<f32>> for FeatureVector {
    fn from(values: Vec<f32>) -> Self { Self(values) }
}

/// A categorical value that was not found in the category map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnknownCategory {
    pub field: &'static str,
    pub label: String,
}
