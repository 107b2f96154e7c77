use std::collections::HashMap;
use std::path::Path;

use candle_core::{DType, Device, Tensor};
use tempfile::TempDir;

use stroke_core::config::ModelSettings;
use stroke_core::traits::Classifier;
use stroke_core::types::FeatureVector;
use stroke_model::{get_default_classifier, TensorClassifier};

const EXAMPLE: [f32; 10] = [1.0, 45.0, 0.0, 0.0, 1.0, 0.0, 1.0, 90.0, 22.5, 1.0];
const WEIGHTS: [f32; 10] = [0.1, 0.02, 0.5, 0.5, 0.1, 0.0, 0.0, 0.01, 0.03, 0.0];
const BIAS: f32 = -5.0;

fn logistic_tensors() -> HashMap<String, Tensor> {
    let dev = Device::Cpu;
    let mut t = HashMap::new();
    t.insert("layers.0.weight".to_string(), Tensor::new(&[WEIGHTS], &dev).unwrap());
    t.insert("layers.0.bias".to_string(), Tensor::new(&[BIAS], &dev).unwrap());
    t
}

fn write_artifact(dir: &Path, name: &str, tensors: &HashMap<String, Tensor>) -> std::path::PathBuf {
    let path = dir.join(name);
    candle_core::safetensors::save(tensors, &path).unwrap();
    path
}

fn expected_logistic(x: &[f32]) -> f32 {
    let z: f32 = x.iter().zip(WEIGHTS.iter()).map(|(a, w)| a * w).sum::<f32>() + BIAS;
    1.0 / (1.0 + (-z).exp())
}

#[test]
fn logistic_artifact_round_trips_through_disk() {
    let tmp = TempDir::new().unwrap();
    let path = write_artifact(tmp.path(), "lr.safetensors", &logistic_tensors());

    let model = TensorClassifier::load(&path, &Device::Cpu).expect("load");
    assert_eq!(model.n_features(), 10);
    assert_eq!(model.outputs(), 1);

    let score = model.predict(&FeatureVector::new(EXAMPLE.to_vec())).expect("predict");
    let expected = expected_logistic(&EXAMPLE);
    assert!((score - expected).abs() < 1e-5, "score={score} expected={expected}");
    assert!(score < 0.5);

    // Same input, same model: same answer.
    let again = model.predict(&FeatureVector::new(EXAMPLE.to_vec())).expect("predict");
    assert_eq!(score, again);
}

#[test]
fn two_output_network_reads_class_one_through_softmax() {
    let dev = Device::Cpu;
    let mut hidden = [[0f32; 10]; 2];
    hidden[0][1] = 0.1; // age * 0.1 = 4.5
    hidden[1][7] = -0.01; // negative, clipped by ReLU
    let mut t = HashMap::new();
    t.insert("layers.0.weight".to_string(), Tensor::new(&hidden, &dev).unwrap());
    t.insert("layers.0.bias".to_string(), Tensor::new(&[0f32, 0.0], &dev).unwrap());
    t.insert("layers.1.weight".to_string(), Tensor::new(&[[0f32, 0.0], [1.0, 0.0]], &dev).unwrap());
    t.insert("layers.1.bias".to_string(), Tensor::new(&[0f32, 0.0], &dev).unwrap());

    let model = TensorClassifier::from_tensors(t, &dev).expect("build");
    assert_eq!(model.outputs(), 2);
    let score = model.predict(&FeatureVector::new(EXAMPLE.to_vec())).expect("predict");
    let expected = 1.0 / (1.0 + (-4.5f32).exp());
    assert!((score - expected).abs() < 1e-5, "score={score} expected={expected}");
}

#[test]
fn scaler_is_applied_before_the_first_layer() {
    let dev = Device::Cpu;
    let mut t = logistic_tensors();
    t.insert("layers.0.bias".to_string(), Tensor::new(&[0f32], &dev).unwrap());
    t.insert("scaler.mean".to_string(), Tensor::new(&EXAMPLE, &dev).unwrap());
    t.insert("scaler.scale".to_string(), Tensor::new(&[1f32; 10], &dev).unwrap());

    let model = TensorClassifier::from_tensors(t, &dev).expect("build");
    // Standardized input is all zeros, so the logit is zero.
    let score = model.predict(&FeatureVector::new(EXAMPLE.to_vec())).expect("predict");
    assert!((score - 0.5).abs() < 1e-6, "score={score}");
}

#[test]
fn double_precision_weights_are_accepted() {
    let dev = Device::Cpu;
    let mut t = HashMap::new();
    t.insert("layers.0.weight".to_string(), Tensor::new(&[WEIGHTS], &dev).unwrap().to_dtype(DType::F64).unwrap());
    t.insert("layers.0.bias".to_string(), Tensor::new(&[BIAS as f64], &dev).unwrap());
    let model = TensorClassifier::from_tensors(t, &dev).expect("build");
    let score = model.predict(&FeatureVector::new(EXAMPLE.to_vec())).expect("predict");
    assert!((score - expected_logistic(&EXAMPLE)).abs() < 1e-5);
}

#[test]
fn wrong_feature_count_is_rejected() {
    let model = TensorClassifier::from_tensors(logistic_tensors(), &Device::Cpu).expect("build");
    let err = model.predict(&FeatureVector::new(vec![1.0; 9])).expect_err("should fail");
    assert!(err.to_string().contains("Expected 10 features, got 9"));
}

#[test]
fn malformed_artifacts_fail_to_load() {
    let dev = Device::Cpu;

    let empty: HashMap<String, Tensor> = HashMap::new();
    assert!(TensorClassifier::from_tensors(empty, &dev).is_err(), "no layers");

    let mut no_bias = logistic_tensors();
    no_bias.remove("layers.0.bias");
    assert!(TensorClassifier::from_tensors(no_bias, &dev).is_err(), "missing bias");

    let mut broken_chain = logistic_tensors();
    broken_chain.insert("layers.1.weight".to_string(), Tensor::new(&[[1f32, 0.0, 0.0]], &dev).unwrap());
    broken_chain.insert("layers.1.bias".to_string(), Tensor::new(&[0f32], &dev).unwrap());
    assert!(TensorClassifier::from_tensors(broken_chain, &dev).is_err(), "layer 1 expects 3 inputs");

    let mut three_way = HashMap::new();
    three_way.insert("layers.0.weight".to_string(), Tensor::new(&[[0f32; 10]; 3], &dev).unwrap());
    three_way.insert("layers.0.bias".to_string(), Tensor::new(&[0f32; 3], &dev).unwrap());
    assert!(TensorClassifier::from_tensors(three_way, &dev).is_err(), "three outputs");

    let mut half_scaler = logistic_tensors();
    half_scaler.insert("scaler.mean".to_string(), Tensor::new(&EXAMPLE, &dev).unwrap());
    assert!(TensorClassifier::from_tensors(half_scaler, &dev).is_err(), "scale missing");

    let mut zero_scale = logistic_tensors();
    zero_scale.insert("scaler.mean".to_string(), Tensor::new(&EXAMPLE, &dev).unwrap());
    zero_scale.insert("scaler.scale".to_string(), Tensor::new(&[0f32; 10], &dev).unwrap());
    assert!(TensorClassifier::from_tensors(zero_scale, &dev).is_err(), "zero scale");
}

#[test]
fn default_classifier_loads_configured_artifact() {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir_all(tmp.path().join("models")).unwrap();
    write_artifact(&tmp.path().join("models"), "stroke_model.safetensors", &logistic_tensors());

    let settings = ModelSettings::default();
    let classifier = get_default_classifier(&settings, tmp.path()).expect("classifier");
    assert_eq!(classifier.n_features(), 10);
    let score = classifier.predict(&FeatureVector::new(EXAMPLE.to_vec())).expect("predict");
    assert!((score - expected_logistic(&EXAMPLE)).abs() < 1e-5);
}

#[test]
fn default_classifier_fails_when_artifact_is_missing() {
    let tmp = TempDir::new().unwrap();
    let settings = ModelSettings::default();
    let err = get_default_classifier(&settings, tmp.path()).err().expect("should fail");
    assert!(err.to_string().contains("Could not locate model artifact"));
}

#[test]
fn default_classifier_rejects_models_with_other_input_sizes() {
    let tmp = TempDir::new().unwrap();
    let dev = Device::Cpu;
    let mut t = HashMap::new();
    t.insert("layers.0.weight".to_string(), Tensor::new(&[[0.5f32, 0.5]], &dev).unwrap());
    t.insert("layers.0.bias".to_string(), Tensor::new(&[0f32], &dev).unwrap());
    let path = write_artifact(tmp.path(), "narrow.safetensors", &t);

    let settings = ModelSettings { path: path.to_string_lossy().to_string(), ..ModelSettings::default() };
    let err = get_default_classifier(&settings, tmp.path()).err().expect("should fail");
    assert!(err.to_string().contains("expects 2 features"));
}

#[test]
fn fake_setting_skips_artifact_lookup() {
    let tmp = TempDir::new().unwrap();
    let settings = ModelSettings { use_fake: true, ..ModelSettings::default() };
    let classifier = get_default_classifier(&settings, tmp.path()).expect("fake");
    let a = classifier.predict(&FeatureVector::new(EXAMPLE.to_vec())).expect("predict");
    let b = classifier.predict(&FeatureVector::new(EXAMPLE.to_vec())).expect("predict");
    assert_eq!(a, b);
}
