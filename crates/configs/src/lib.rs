use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct StorageConfig {
    /// Object-store bucket holding the message collections.
    #[serde(default)]
    pub bucket: String,
}

/// Dispatch contract the API speaks. `canonical` is the full
/// get/add/update/delete set with store-assigned ids; `append-only` is the
/// legacy two-action variant without ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ApiMode {
    #[default]
    Canonical,
    AppendOnly,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ApiConfig {
    #[serde(default)]
    pub mode: ApiMode,
}

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default().unwrap_or_default();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.normalize_from_env();
        self.storage.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl StorageConfig {
    pub fn normalize_from_env(&mut self) {
        // If the TOML did not provide a bucket, fall back to the env var.
        if self.bucket.trim().is_empty() {
            if let Ok(bucket) = std::env::var("S3_BUCKET_NAME") {
                self.bucket = bucket;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.bucket.trim().is_empty() {
            return Err(anyhow!(
                "storage.bucket is empty; provide it in config.toml or the S3_BUCKET_NAME env var"
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_bucket_is_fatal() {
        let cfg = StorageConfig { bucket: "   ".into() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn api_mode_parses_kebab_case() {
        let cfg: AppConfig = toml::from_str("[api]\nmode = \"append-only\"\n").unwrap();
        assert_eq!(cfg.api.mode, ApiMode::AppendOnly);
        let cfg: AppConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.api.mode, ApiMode::Canonical);
    }

    #[test]
    fn server_defaults_applied() {
        let mut cfg = ServerConfig { host: "  ".into(), port: 9000, worker_threads: Some(0) };
        cfg.normalize().unwrap();
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.worker_threads, Some(4));
    }
}
