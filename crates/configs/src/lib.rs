use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote marketplace backend.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_signup_path")]
    pub signup_path: String,
    #[serde(default = "default_login_path")]
    pub login_path: String,
    #[serde(default = "default_company_path")]
    pub company_path: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            signup_path: default_signup_path(),
            login_path: default_login_path(),
            company_path: default_company_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_store_path")]
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { path: default_store_path() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `compact` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { format: default_log_format(), filter: None }
    }
}

fn default_base_url() -> String { "http://127.0.0.1:8000".into() }
fn default_timeout() -> u64 { 30 }
fn default_signup_path() -> String { "/api/method/movers.api.auth.signup".into() }
fn default_login_path() -> String { "/api/method/movers.api.auth.login".into() }
fn default_company_path() -> String { "/api/method/movers.api.company.get_my_company".into() }
fn default_store_path() -> String { "data/session.json".into() }
fn default_log_format() -> String { "compact".into() }

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
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Defaults plus env overrides, for runs without a config file.
    pub fn from_env() -> Result<Self> {
        let mut cfg = AppConfig::default();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        // 环境变量优先于 TOML
        self.api.normalize_from_env();
        self.api.validate()?;
        self.storage.normalize_from_env();
        self.logging.normalize();
        Ok(())
    }
}

impl ApiConfig {
    pub fn normalize_from_env(&mut self) {
        if let Ok(url) = std::env::var("API_BASE_URL") {
            if !url.trim().is_empty() {
                self.base_url = url;
            }
        }
        self.base_url = self.base_url.trim().trim_end_matches('/').to_string();
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(anyhow!("api.base_url is empty; set it in config.toml or API_BASE_URL"));
        }
        let lower = self.base_url.to_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(anyhow!("api.base_url must start with http:// or https://"));
        }
        if self.timeout_secs == 0 {
            return Err(anyhow!("api.timeout_secs must be a positive number of seconds"));
        }
        for (name, path) in [
            ("signup_path", &self.signup_path),
            ("login_path", &self.login_path),
            ("company_path", &self.company_path),
        ] {
            if path.trim().is_empty() {
                return Err(anyhow!("api.{name} must not be empty"));
            }
        }
        Ok(())
    }

    /// Join the base URL with an endpoint path.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

impl StorageConfig {
    pub fn normalize_from_env(&mut self) {
        if let Ok(path) = std::env::var("SESSION_STORE_PATH") {
            if !path.trim().is_empty() {
                self.path = path;
            }
        }
        if self.path.trim().is_empty() {
            self.path = default_store_path();
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        let fmt = self.format.trim().to_lowercase();
        self.format = if fmt == "json" { fmt } else { default_log_format() };
        if self.filter.as_deref().map(str::trim).map_or(false, str::is_empty) {
            self.filter = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let cfg: AppConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.api.timeout_secs, 30);
        assert_eq!(cfg.storage.path, "data/session.json");
        assert_eq!(cfg.logging.format, "compact");
    }

    #[test]
    fn partial_api_section_keeps_other_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://movers.example.com/"
            timeout_secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(cfg.api.timeout_secs, 5);
        assert!(cfg.api.login_path.ends_with("login"));
    }

    #[test]
    fn validate_rejects_bad_scheme_and_zero_timeout() {
        let mut api = ApiConfig { base_url: "ftp://x".into(), ..ApiConfig::default() };
        assert!(api.validate().is_err());
        api.base_url = "https://x".into();
        api.timeout_secs = 0;
        assert!(api.validate().is_err());
        api.timeout_secs = 1;
        assert!(api.validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_endpoint() {
        let api = ApiConfig { company_path: "  ".into(), ..ApiConfig::default() };
        assert!(api.validate().is_err());
    }

    #[test]
    fn url_for_joins_with_single_slash() {
        let api = ApiConfig { base_url: "https://x.io".into(), ..ApiConfig::default() };
        assert_eq!(api.url_for("/a/b"), "https://x.io/a/b");
        assert_eq!(api.url_for("a/b"), "https://x.io/a/b");
    }

    #[test]
    fn unknown_log_format_falls_back_to_compact() {
        let mut logging = LoggingConfig { format: "XML".into(), filter: Some(" ".into()) };
        logging.normalize();
        assert_eq!(logging.format, "compact");
        assert!(logging.filter.is_none());
    }
}
