/*!
 * Tests for application configuration functionality
 */

use changelog_translator::app_config::{Config, LogLevel, TranslationProvider};
use std::path::PathBuf;

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.source_dir, PathBuf::from("en/changelog"));
    assert_eq!(config.output_layout, "{code}/changelog");
    assert_eq!(config.extensions, vec!["md".to_string(), "mdx".to_string()]);
    assert_eq!(config.markers.before, common::MARKER_BEFORE);
    assert_eq!(config.markers.after, common::MARKER_AFTER);
    assert_eq!(config.chunking.max_chars, 8000);
    assert_eq!(config.chunking.unit_open_pattern, "<Update");
    assert_eq!(config.translation.common.max_attempts, 5);
    assert_eq!(config.translation.common.retry_backoff_ms, 1000);
    assert_eq!(config.translation.common.concurrent_pairs, 1);
    assert_eq!(config.log_level, LogLevel::Info);

    let codes: Vec<&str> = config.target_languages.iter().map(|l| l.code.as_str()).collect();
    assert_eq!(codes, vec!["cn", "ko"]);
}

/// Test the per-language output directory layout
#[test]
fn test_outputDirFor_withLayout_shouldSubstituteCode() {
    let mut config = Config::default();
    config.output_root = PathBuf::from("site");
    let korean = config.target_languages[1].clone();

    assert_eq!(config.output_dir_for(&korean), PathBuf::from("site/ko/changelog"));

    config.output_layout = "i18n/{code}".to_string();
    assert_eq!(config.output_dir_for(&korean), PathBuf::from("site/i18n/ko"));
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    config.translation.active_provider_config_mut().api_key = "sk-test".to_string();
    assert!(config.validate().is_ok());

    config.chunking.max_chars = 0;
    assert!(config.validate().is_err());
    config.chunking.max_chars = 8000;

    config.output_layout = "changelog".to_string();
    assert!(config.validate().is_err());
    config.output_layout = "{code}/changelog".to_string();

    let duplicate = config.target_languages[0].clone();
    config.target_languages.push(duplicate);
    assert!(config.validate().is_err());
    config.target_languages.pop();

    config.translation.active_provider_config_mut().api_key = String::new();
    assert!(config.validate().is_err());
}

/// LM Studio runs locally and needs no key
#[test]
fn test_config_validation_withLmStudio_shouldNotRequireApiKey() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::LMStudio;
    config.translation.active_provider_config_mut().api_key = String::new();

    assert!(config.validate().is_ok());
    assert_eq!(config.translation.get_endpoint(), "http://localhost:1234/v1");
}

/// Test restricting the run to some languages
#[test]
fn test_restrictLanguages_withKnownAndUnknownCodes_shouldFilterOrFail() {
    let mut config = Config::default();
    config.restrict_languages(&["ko".to_string()]).unwrap();
    assert_eq!(config.target_languages.len(), 1);
    assert_eq!(config.target_languages[0].code, "ko");

    let mut config = Config::default();
    assert!(config.restrict_languages(&["fr".to_string()]).is_err());
    assert_eq!(config.target_languages.len(), 2);
}

/// A missing file is created with defaults and read back unchanged
#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");

    let created = Config::load_or_create(&path).unwrap();
    assert!(path.exists());

    let loaded = Config::load_or_create(&path).unwrap();
    assert_eq!(loaded.markers.before, created.markers.before);
    assert_eq!(loaded.target_languages.len(), created.target_languages.len());
    assert_eq!(loaded.glossary.protected_terms, created.glossary.protected_terms);
}

/// Missing fields fall back to their defaults
#[test]
fn test_loadOrCreate_withPartialFile_shouldFillDefaults() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(
        dir.path(),
        "conf.json",
        r#"{ "source_dir": "docs/en/changelog", "chunking": { "max_chars": 1200 } }"#,
    )
    .unwrap();

    let config = Config::load_or_create(&path).unwrap();
    assert_eq!(config.source_dir, PathBuf::from("docs/en/changelog"));
    assert_eq!(config.chunking.max_chars, 1200);
    assert_eq!(config.chunking.unit_open_pattern, "<Update");
    assert_eq!(config.target_languages.len(), 2);
}

/// Unparseable files are reported, not replaced
#[test]
fn test_loadOrCreate_withInvalidJson_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(dir.path(), "conf.json", "{ not json").unwrap();

    assert!(Config::load_or_create(&path).is_err());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
}
