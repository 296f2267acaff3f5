/*!
 * Tests for application configuration functionality
 */

use ssml_prosody::app_config::{Config, LogLevel};

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert!(config.parser.strict_root);
    assert_eq!(config.parser.max_depth, 64);
    assert!(!config.normalizer.ascii_only);
    assert!(!config.normalizer.lowercase);
    assert_eq!(config.applier.min_rate, 0.25);
    assert_eq!(config.applier.max_rate, 4.0);
    assert_eq!(config.applier.min_sample_rate, 8_000);
    assert_eq!(config.applier.max_sample_rate, 192_000);
    assert_eq!(config.applier.max_break_ms, 10_000);
    assert_eq!(config.applier.max_output_seconds, 600);
    assert!(config.applier.clip_dir.is_none());
    assert!(!config.enhancer.enabled);
    assert_eq!(config.enhancer.threshold, 0.8);
    assert_eq!(config.enhancer.ratio, 4.0);
    assert_eq!(config.enhancer.iterations, 1);
    assert_eq!(config.synthesis.default_voice, "default");
    assert_eq!(config.synthesis.default_language, "en");
    assert_eq!(config.synthesis.default_sample_rate, 22_050);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.parser.max_depth = 0;
    assert!(config.validate().is_err());
    config.parser.max_depth = 64;

    config.applier.min_rate = 0.0;
    assert!(config.validate().is_err());
    config.applier.min_rate = 0.25;

    config.applier.max_rate = 0.1;
    assert!(config.validate().is_err());
    config.applier.max_rate = 4.0;

    config.applier.min_sample_rate = 48_000;
    config.applier.max_sample_rate = 16_000;
    assert!(config.validate().is_err());
    config.applier.min_sample_rate = 8_000;
    config.applier.max_sample_rate = 192_000;

    config.applier.max_output_seconds = 0;
    assert!(config.validate().is_err());
    config.applier.max_output_seconds = 600;

    config.synthesis.default_sample_rate = 4_000;
    assert!(config.validate().is_err());
    config.synthesis.default_sample_rate = 22_050;

    config.enhancer.threshold = 1.5;
    assert!(config.validate().is_err());
    config.enhancer.threshold = 0.8;

    config.enhancer.ratio = 0.9;
    assert!(config.validate().is_err());
    config.enhancer.ratio = 4.0;

    config.synthesis.default_voice = "  ".to_string();
    assert!(config.validate().is_err());
    config.synthesis.default_voice = "default".to_string();

    assert!(config.validate().is_ok());
}

/// Test that a partial JSON file is completed with defaults
#[test]
fn test_config_deserialize_withPartialJson_shouldFillDefaults() {
    let json = r#"{ "applier": { "max_rate": 3.0 }, "enhancer": { "enabled": true }, "log_level": "debug" }"#;
    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.applier.max_rate, 3.0);
    assert_eq!(config.applier.min_rate, 0.25);
    assert!(config.enhancer.enabled);
    assert_eq!(config.enhancer.ratio, 4.0);
    assert!(config.parser.strict_root);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert!(config.validate().is_ok());
}

/// Test that a config survives a JSON round trip
#[test]
fn test_config_serialize_shouldReloadIdentically() {
    let mut config = Config::default();
    config.applier.clip_dir = Some("clips".to_string());
    config.normalizer.lowercase = true;

    let json = serde_json::to_string_pretty(&config).unwrap();
    let reloaded: Config = serde_json::from_str(&json).unwrap();

    assert_eq!(reloaded.applier.clip_dir.as_deref(), Some("clips"));
    assert!(reloaded.normalizer.lowercase);
}

#[test]
fn test_logLevel_toLevelFilter_shouldMapEachLevel() {
    assert_eq!(LogLevel::Error.to_level_filter(), log::LevelFilter::Error);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}
