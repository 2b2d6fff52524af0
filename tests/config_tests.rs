/* tests/config_tests.rs */

#![cfg(feature = "config")]

use hotswap::config::{ConfigError, ConfigFormat, HotswapConfig};

#[tokio::test]
async fn test_load_json_file() -> Result<(), Box<dyn std::error::Error>> {
	let dir = tempfile::tempdir()?;
	let path = dir.path().join("hotswap.json");
	tokio::fs::write(
		&path,
		br#"{
			"force_reload": true,
			"stylesheet_roots": ["/srv/frontend"],
			"watch": { "debounce_ms": 250, "exclude": ["node_modules/**"] }
		}"#,
	)
	.await?;

	let config = HotswapConfig::load(&path).await?;
	assert!(config.force_reload);
	assert_eq!(config.stylesheet_roots, vec![std::path::PathBuf::from("/srv/frontend")]);
	assert_eq!(config.watch.debounce_ms, 250);
	assert_eq!(config.watch.exclude, vec!["node_modules/**".to_string()]);
	assert!(config.watch.coalesce);
	Ok(())
}

#[tokio::test]
async fn test_load_rejects_unknown_extension() -> Result<(), Box<dyn std::error::Error>> {
	let dir = tempfile::tempdir()?;
	let path = dir.path().join("hotswap.ini");
	tokio::fs::write(&path, b"force_reload=true").await?;

	let err = HotswapConfig::load(&path).await.unwrap_err();
	assert!(matches!(err, ConfigError::UnsupportedFormat(ext) if ext == "ini"));
	Ok(())
}

#[tokio::test]
async fn test_load_missing_file() {
	let err = HotswapConfig::load("/definitely/not/here.json").await.unwrap_err();
	assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_malformed_document() {
	let err = HotswapConfig::from_slice(b"{ not json", ConfigFormat::Json).unwrap_err();
	assert!(matches!(err, ConfigError::Parse(_)));
}

#[cfg(feature = "toml")]
#[test]
fn test_toml_document() {
	let config = HotswapConfig::from_slice(
		b"production_mode = true\ncontext_prefix = \"static://\"\n\n[watch]\nignore_hidden = false\n",
		ConfigFormat::Toml,
	)
	.unwrap();
	assert!(config.production_mode);
	assert_eq!(config.context_prefix, "static://");
	assert!(!config.watch.ignore_hidden);
}

#[cfg(feature = "yaml")]
#[test]
fn test_yaml_document() {
	let config = HotswapConfig::from_slice(
		b"translation_patterns:\n  - \"**/messages/*.properties\"\n",
		ConfigFormat::Yaml,
	)
	.unwrap();
	assert_eq!(config.translation_patterns, vec!["**/messages/*.properties".to_string()]);
	assert_eq!(ConfigFormat::from_extension("yml"), Some(ConfigFormat::Yaml));
}

#[cfg(feature = "validate")]
#[test]
fn test_validation_rejects_zero_debounce() {
	let err = HotswapConfig::from_slice(br#"{"watch": {"debounce_ms": 0}}"#, ConfigFormat::Json).unwrap_err();
	assert!(matches!(err, ConfigError::Validation(_)));

	let err = HotswapConfig::from_slice(br#"{"context_prefix": ""}"#, ConfigFormat::Json).unwrap_err();
	assert!(matches!(err, ConfigError::Validation(_)));
}
