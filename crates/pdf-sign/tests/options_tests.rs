use pdf_sign::*;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_default_config_is_valid() {
    let config = SignerConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.raster_timeout(), Duration::from_millis(5000));
    assert_eq!(config.log_filter().unwrap(), log::LevelFilter::Info);
}

#[test]
fn test_invalid_values_are_rejected() {
    let mut config = SignerConfig::default();
    config.raster_scale = 0.0;
    assert!(matches!(config.validate(), Err(SignError::Config(_))));

    let mut config = SignerConfig::default();
    config.backend_url = "  ".to_string();
    assert!(config.validate().is_err());

    let mut config = SignerConfig::default();
    config.log_level = "loud".to_string();
    assert!(config.validate().is_err());

    let mut config = SignerConfig::default();
    config.raster_timeout_ms = 0;
    assert!(config.validate().is_err());
}

#[tokio::test]
async fn test_save_then_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pdfsign.json");

    let mut config = SignerConfig::default();
    config.backend_url = "https://sign.example.org".to_string();
    config.log_level = "debug".to_string();
    config.save(&path).await.unwrap();

    let loaded = SignerConfig::load(&path).await.unwrap();
    assert_eq!(loaded, config);
}

#[tokio::test]
async fn test_partial_file_takes_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pdfsign.json");
    tokio::fs::write(&path, r#"{ "thumbnail_width": 96 }"#).await.unwrap();

    let loaded = SignerConfig::load(&path).await.unwrap();
    assert_eq!(loaded.thumbnail_width, 96);
    assert_eq!(loaded.backend_url, SignerConfig::default().backend_url);
}

#[tokio::test]
async fn test_invalid_file_is_a_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pdfsign.json");
    tokio::fs::write(&path, r#"{ "display_scale": -1 }"#).await.unwrap();
    assert!(matches!(SignerConfig::load(&path).await, Err(SignError::Config(_))));

    tokio::fs::write(&path, "{ nope").await.unwrap();
    assert!(matches!(SignerConfig::load(&path).await, Err(SignError::Config(_))));
}

#[tokio::test]
async fn test_missing_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let loaded = SignerConfig::load_or_default(dir.path().join("absent.json"))
        .await
        .unwrap();
    assert_eq!(loaded, SignerConfig::default());
}
