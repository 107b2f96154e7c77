//! `APP_USE_FAKE_MODEL`. Kept in its own binary since env vars are process-wide.
use figment::Jail;

use stroke_core::config::ModelSettings;
use stroke_core::traits::Classifier;
use stroke_core::types::FeatureVector;
use stroke_model::get_default_classifier;

fn missing_model() -> ModelSettings {
    ModelSettings { path: "no/such/model.safetensors".into(), ..ModelSettings::default() }
}

#[test]
fn env_switch_selects_the_fake_classifier() {
    Jail::expect_with(|jail| {
        let settings = missing_model();
        assert!(get_default_classifier(&settings, jail.directory()).is_err());

        jail.set_env("APP_USE_FAKE_MODEL", "1");
        let classifier = get_default_classifier(&settings, jail.directory()).map_err(|e| e.to_string())?;
        assert_eq!(classifier.n_features(), 10);
        let score = classifier.predict(&FeatureVector::new(vec![0.0; 10])).map_err(|e| e.to_string())?;
        assert!((0.0..1.0).contains(&score));
        Ok(())
    });
}

#[test]
fn env_switch_accepts_true_but_not_other_values() {
    Jail::expect_with(|jail| {
        let settings = missing_model();
        jail.set_env("APP_USE_FAKE_MODEL", "TRUE");
        assert!(get_default_classifier(&settings, jail.directory()).is_ok());
        jail.set_env("APP_USE_FAKE_MODEL", "0");
        assert!(get_default_classifier(&settings, jail.directory()).is_err());
        Ok(())
    });
}
