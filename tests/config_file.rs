//! config.toml 로드/저장 테스트.
use std::fs;

use alcohol_dilution_calculator::config::{self, Config, ConfigError, InputLayout};
use alcohol_dilution_calculator::mixing::{ContractionModel, MixtureRequest};

#[test]
fn missing_file_is_created_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let cfg = config::load_or_default_at(&path).expect("default config");
    assert_eq!(cfg, Config::default());
    assert!(path.exists());
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("k0 = 0.05"), "{text}");
}

#[test]
fn saved_settings_survive_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let mut cfg = Config::default();
    cfg.language = "ko-kr".into();
    cfg.gui.layout = InputLayout::Inline;
    cfg.gui.background_image = Some("bg.jpg".into());
    cfg.contraction.alpha = 0.0002;
    cfg.save_to(&path).unwrap();

    let loaded = config::load_or_default_at(&path).unwrap();
    assert_eq!(loaded, cfg);
}

#[test]
fn configured_coefficients_change_the_result() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[contraction]\nk0 = 0.1\n").unwrap();
    let cfg = config::load_or_default_at(&path).unwrap();
    assert_eq!(
        cfg.contraction,
        ContractionModel {
            k0: 0.1,
            ..ContractionModel::default()
        }
    );
    let res = cfg
        .contraction
        .compute(&MixtureRequest {
            water_volume_ml: 100.0,
            ethanol_volume_ml: 100.0,
            temperature_c: 25.0,
        })
        .unwrap();
    assert_eq!(res.display_ml(), "190.00");
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "language = [unclosed").unwrap();
    assert!(matches!(
        config::load_or_default_at(&path),
        Err(ConfigError::Serde(_))
    ));
}

#[test]
fn non_finite_coefficient_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[contraction]\nalpha = nan\n").unwrap();
    assert!(matches!(
        config::load_or_default_at(&path),
        Err(ConfigError::Invalid(_))
    ));
}
