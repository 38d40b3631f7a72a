use tempfile::tempdir;

use super::*;

#[test]
fn defaults_describe_a_valid_pipeline() {
    let config = MfccConfig::default();
    config.validate().unwrap();
    assert_eq!(config.fft_bin_count(), 32);
    let mfcc = config.pipeline().unwrap();
    assert_eq!(mfcc.filter_bank().len(), 26);
    assert_eq!(mfcc.dct().num_coefficients(), 12);
    assert!(mfcc.dct().lifter().is_none());
}

#[test]
fn partial_toml_keeps_remaining_defaults() {
    let config = MfccConfig::from_toml_str(
        r#"
frame_size = 256
frame_step = 128
window = "tukey"
window_alpha = 0.25
lifter = "sinusoidal"
log_compression = "floored_ln"
"#,
    )
    .unwrap();
    assert_eq!(config.frame_size, 256);
    assert_eq!(config.frame_step, 128);
    assert_eq!(config.window, WindowKind::Tukey);
    assert_eq!(config.filter_count, 26);
    assert_eq!(config.sample_rate, 8_000);
    assert!(matches!(
        config.lifter().unwrap(),
        Some(Lifter::Sinusoidal { cep_lifter }) if cep_lifter == 22.0
    ));
    assert_eq!(
        config.log_compression(),
        LogCompression::FlooredLn { floor: 1e-8 }
    );
    config.validate().unwrap();
}

#[test]
fn unknown_window_name_fails_to_parse() {
    assert!(MfccConfig::from_toml_str("window = \"blackman\"").is_err());
}

#[test]
fn validate_names_the_bad_parameter() {
    let config = MfccConfig {
        filter_count: 0,
        ..MfccConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(MfccError::InvalidParameter { name: "filter_count", .. })
    ));

    let config = MfccConfig {
        high_freq_hz: 5_000.0,
        ..MfccConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(MfccError::InvalidParameter { name: "high_freq_hz", .. })
    ));

    let config = MfccConfig {
        lifter: LifterKind::Sinusoidal,
        cepstral_lifter: 0.0,
        ..MfccConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn save_then_load_preserves_settings() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("mfcc.toml");
    let config = MfccConfig {
        frame_size: 128,
        frame_step: 64,
        filter_count: 20,
        lifter: LifterKind::Linear,
        ..MfccConfig::default()
    };
    save_to_path(&config, &path).unwrap();
    let loaded = load_from_path(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().unwrap();
    let loaded = load_from_path(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(loaded, MfccConfig::default());
}

#[test]
fn load_rejects_unusable_config() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "frame_step = 0\n").unwrap();
    assert!(matches!(
        load_from_path(&path),
        Err(ConfigError::Invalid { .. })
    ));
    std::fs::write(&path, "frame_step = [").unwrap();
    assert!(matches!(
        load_from_path(&path),
        Err(ConfigError::ParseToml { .. })
    ));
}
