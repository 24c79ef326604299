//! Service configuration loader.
//!
//! Reads a TOML file into [`ServiceConfig`]. A missing file means "all
//! defaults"; a file that exists but cannot be read, parsed or validated is
//! an error, so a typo never silently switches the history backend.

use std::path::{Path, PathBuf};

use convo_types::config::ServiceConfig;
use convo_types::error::ConfigError;

/// Default location of the config file: `~/.convo/config.toml`.
///
/// Falls back to `./config.toml` when no home directory can be resolved.
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".convo"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("config.toml")
}

/// Load and validate configuration from `path`.
pub async fn load_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(ServiceConfig::default());
        }
        Err(err) => {
            return Err(ConfigError::Read(format!("{}: {err}", path.display())));
        }
    };

    let config = toml::from_str::<ServiceConfig>(&content)
        .map_err(|err| ConfigError::Parse(format!("{}: {err}", path.display())))?;
    config.validate()?;

    tracing::debug!(
        path = %path.display(),
        backend = %config.history.backend,
        max_messages = config.history.max_messages,
        "Loaded configuration"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use convo_types::config::HistoryBackend;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("config.toml")).await.unwrap();
        assert_eq!(config.history.backend, HistoryBackend::Memory);
        assert_eq!(config.history.max_messages, 10);
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        tokio::fs::write(
            &config_path,
            r#"
[history]
backend = "redis"
max_messages = 4

[history.redis]
url = "redis://cache:6379/1"
"#,
        )
        .await
        .unwrap();

        let config = load_config(&config_path).await.unwrap();
        assert_eq!(config.history.backend, HistoryBackend::Redis);
        assert_eq!(config.history.max_messages, 4);
        assert_eq!(config.history.redis.url, "redis://cache:6379/1");
        assert_eq!(config.history.redis.ttl_secs, 3600);
    }

    #[tokio::test]
    async fn load_config_invalid_toml_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        tokio::fs::write(&config_path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let err = load_config(&config_path).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[tokio::test]
    async fn load_config_rejects_invalid_values() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        tokio::fs::write(&config_path, "[history]\nmax_messages = 0\n")
            .await
            .unwrap();

        let err = load_config(&config_path).await.unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn default_config_path_ends_with_file_name() {
        let path = default_config_path();
        assert!(path.ends_with(".convo/config.toml") || path.ends_with("config.toml"));
    }
}
