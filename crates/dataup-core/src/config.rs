//! Configuration module
//!
//! Server and content storage settings, loaded from the environment
//! (and an optional `.env` file).

use std::env;
use std::path::{Path, PathBuf};

const SERVER_PORT: u16 = 8080;
const BIND_ADDRESS: &str = "0.0.0.0";
const CONTENT_STORAGE_PATH: &str = "./data";
const MAX_UPLOAD_SIZE_BYTES: usize = 1024 * 1024 * 1024;

/// Listener and environment settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub bind_address: String,
    pub cors_origins: Vec<String>,
    pub environment: String,
}

/// Content storage and URL settings
#[derive(Clone, Debug)]
pub struct ContentConfig {
    pub storage_path: PathBuf,
    /// Externally visible address used to build content URLs.
    /// When unset the address is derived from each request's `Host` header.
    pub public_base_url: Option<String>,
    pub max_upload_size_bytes: usize,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub content: ContentConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let server_port = match lookup("PORT").or_else(|| lookup("SERVER_PORT")) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| anyhow::anyhow!("Invalid PORT '{}': {}", raw, e))?,
            None => SERVER_PORT,
        };

        let bind_address = lookup("BIND_ADDRESS").unwrap_or_else(|| BIND_ADDRESS.to_string());

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let storage_path = PathBuf::from(
            lookup("CONTENT_STORAGE_PATH").unwrap_or_else(|| CONTENT_STORAGE_PATH.to_string()),
        );

        let public_base_url = lookup("PUBLIC_BASE_URL")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty());

        let max_upload_size_bytes = match lookup("MAX_UPLOAD_SIZE_BYTES") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|e| anyhow::anyhow!("Invalid MAX_UPLOAD_SIZE_BYTES '{}': {}", raw, e))?,
            None => MAX_UPLOAD_SIZE_BYTES,
        };

        let config = Config {
            base: BaseConfig {
                server_port,
                bind_address,
                cors_origins,
                environment,
            },
            content: ContentConfig {
                storage_path,
                public_base_url,
                max_upload_size_bytes,
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.server_port == 0 {
            return Err(anyhow::anyhow!("PORT must be greater than 0"));
        }

        if self.content.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!(
                "MAX_UPLOAD_SIZE_BYTES must be greater than 0"
            ));
        }

        if self.content.storage_path.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("CONTENT_STORAGE_PATH must not be empty"));
        }

        if let Some(url) = &self.content.public_base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(anyhow::anyhow!(
                    "PUBLIC_BASE_URL must start with http:// or https://"
                ));
            }
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn bind_address(&self) -> &str {
        &self.base.bind_address
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }

    pub fn storage_path(&self) -> &Path {
        &self.content.storage_path
    }

    pub fn public_base_url(&self) -> Option<&str> {
        self.content.public_base_url.as_deref()
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.content.max_upload_size_bytes
    }

    /// Base address used when neither `PUBLIC_BASE_URL` nor a request host is available.
    pub fn fallback_base_url(&self) -> String {
        format!("http://localhost:{}", self.server_port())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, anyhow::Error> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.server_port(), 8080);
        assert_eq!(config.bind_address(), "0.0.0.0");
        assert_eq!(config.storage_path(), Path::new("./data"));
        assert_eq!(config.public_base_url(), None);
        assert_eq!(config.max_upload_size_bytes(), 1024 * 1024 * 1024);
        assert_eq!(config.cors_origins(), ["*".to_string()]);
        assert!(!config.is_production());
        assert_eq!(config.fallback_base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "9000"),
            ("CONTENT_STORAGE_PATH", "/tmp/videos"),
            ("PUBLIC_BASE_URL", "https://videos.example.com/"),
            ("MAX_UPLOAD_SIZE_BYTES", "1024"),
            ("CORS_ORIGINS", "https://a.example, https://b.example"),
            ("ENVIRONMENT", "Production"),
        ])
        .unwrap();

        assert_eq!(config.server_port(), 9000);
        assert_eq!(config.storage_path(), Path::new("/tmp/videos"));
        assert_eq!(
            config.public_base_url(),
            Some("https://videos.example.com")
        );
        assert_eq!(config.max_upload_size_bytes(), 1024);
        assert_eq!(config.cors_origins().len(), 2);
        assert!(config.is_production());
    }

    #[test]
    fn test_invalid_port_rejected() {
        assert!(config_from(&[("PORT", "not-a-port")]).is_err());
        assert!(config_from(&[("PORT", "0")]).is_err());
    }

    #[test]
    fn test_public_base_url_requires_scheme() {
        let err = config_from(&[("PUBLIC_BASE_URL", "videos.example.com")]).unwrap_err();
        assert!(err.to_string().contains("PUBLIC_BASE_URL"));
    }

    #[test]
    fn test_zero_upload_limit_rejected() {
        assert!(config_from(&[("MAX_UPLOAD_SIZE_BYTES", "0")]).is_err());
    }
}
