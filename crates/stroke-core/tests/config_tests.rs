use std::fs;
use std::path::Path;

use figment::{providers::Serialized, Figment};
use tempfile::TempDir;

use stroke_core::config::{resolve_with_base, Config, DeviceKind, LogFormat, Settings};

#[test]
fn defaults_apply_without_config_files() {
    let tmp = TempDir::new().unwrap();
    let config = Config::load_from_dir(tmp.path(), "test").expect("load");
    let settings = config.settings().expect("settings");
    assert_eq!(settings.server.port, 5000);
    assert_eq!(settings.model.device, DeviceKind::Cpu);
    assert!(!settings.encoding.strict_categories);
    assert_eq!(settings.report.filename, "stroke_prediction_report.pdf");
    assert_eq!(settings.logging.format, LogFormat::Pretty);
}

#[test]
fn env_specific_file_overrides_base_file() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("config.toml"),
        "[server]\nport = 8000\nhost = \"0.0.0.0\"\n[model]\npath = \"base.safetensors\"\n",
    )
    .unwrap();
    fs::write(tmp.path().join("config.test.toml"), "[server]\nport = 8100\n[encoding]\nstrict_categories = true\n").unwrap();

    let config = Config::load_from_dir(tmp.path(), "test").expect("load");
    let settings = config.settings().expect("settings");
    assert_eq!(settings.server.port, 8100, "env file wins");
    assert_eq!(settings.server.host, "0.0.0.0", "base file still applies");
    assert_eq!(settings.model.path, "base.safetensors");
    assert!(settings.encoding.strict_categories);

    let port: u16 = config.get("server.port").expect("get");
    assert_eq!(port, 8100);
}

#[test]
fn production_rejects_fake_model() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("config.prod.toml"), "[model]\nuse_fake = true\n").unwrap();
    let err = Config::load_from_dir(tmp.path(), "prod").err().expect("should reject");
    assert!(err.to_string().contains("use_fake"));
}

#[test]
fn settings_extract_from_explicit_figment() {
    let mut settings = Settings::default();
    settings.logging.log_data = true;
    let config = Config::from_figment(Figment::from(Serialized::defaults(settings.clone())));
    assert_eq!(config.settings().expect("settings"), settings);
}

#[test]
fn relative_model_path_resolves_against_base() {
    let base = Path::new("/srv/stroke");
    assert_eq!(resolve_with_base(base, "models/m.safetensors"), base.join("models/m.safetensors"));
    assert_eq!(resolve_with_base(base, "/opt/m.safetensors"), Path::new("/opt/m.safetensors"));
}
