use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};
use crate::models::AppConfig;

const DATA_DIR: &str = ".article_facade";
const CONFIG_FILE: &str = "facade_config.json";
const CONFIG_ENV: &str = "ARTICLE_FACADE_CONFIG";

/// Get data directory path
pub fn get_data_dir() -> AppResult<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| AppError::Config("Failed to get user home directory".to_string()))?;
    let data_dir = home.join(DATA_DIR);

    // Ensure directory exists
    if !data_dir.exists() {
        fs::create_dir_all(&data_dir)?;
    }

    Ok(data_dir)
}

/// Config file location: `$ARTICLE_FACADE_CONFIG`, else the data directory
pub fn get_config_path() -> AppResult<PathBuf> {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
        _ => Ok(get_data_dir()?.join(CONFIG_FILE)),
    }
}

/// Load application config, falling back to defaults when the file is missing
pub fn load_app_config_from(path: &Path) -> AppResult<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::new());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content).map_err(|e| {
        AppError::Config(format!("Failed to parse config file {}: {}", path.display(), e))
    })?;
    config.proxy.validate()?;
    Ok(config)
}

/// Save application config
pub fn save_app_config_to(config: &AppConfig, path: &Path) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let content = serde_json::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::TransportTrustPolicy;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_app_config_from(&dir.path().join("absent.json")).unwrap();

        assert!(config.log_to_file);
        assert_eq!(config.proxy.port, 9081);
        assert!(config.proxy.transport.is_strict());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let mut config = AppConfig::new();
        config.proxy.articles_url = "https://articles.internal/api/v1/articles".to_string();
        config.proxy.transport = TransportTrustPolicy::TrustAll;
        save_app_config_to(&config, &path).unwrap();

        let loaded = load_app_config_from(&path).unwrap();
        assert_eq!(loaded.proxy.articles_url, config.proxy.articles_url);
        assert_eq!(loaded.proxy.transport, TransportTrustPolicy::TrustAll);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "{ not json").unwrap();

        let err = load_app_config_from(&path).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_zero_request_timeout_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{"proxy":{"request_timeout":0}}"#).unwrap();

        let err = load_app_config_from(&path).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("request_timeout"));
    }
}
