use crate::core::policy::FetchPolicy;
use crate::utils::error::{Result, StoreError};
use crate::utils::validation::{
    parse_disable_cache, validate_path, validate_positive_number, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiSettings,
    pub cache: CacheSettings,
    pub fetch: FetchSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub postal_info_url: String,
    pub municipality_url: String,
    pub address_match_url: String,
    pub fuzzy_search_url: String,
    pub timeout_seconds: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            postal_info_url: "https://api.basisregisters.vlaanderen.be/v2/postinfo".to_string(),
            municipality_url: "https://api.basisregisters.vlaanderen.be/v2/gemeenten".to_string(),
            address_match_url: "https://api.basisregisters.vlaanderen.be/v2/adresmatch".to_string(),
            fuzzy_search_url: "https://geo.api.vlaanderen.be/geolocation/v4/Location".to_string(),
            timeout_seconds: 30,
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub directory: PathBuf,
    pub disabled: bool,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("/app/cache"),
            disabled: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    pub page_size: usize,
    pub page_delay_ms: u64,
    pub detail_delay_ms: u64,
    pub retry_cooldown_seconds: u64,
    pub max_retries: u32,
}

impl Default for FetchSettings {
    fn default() -> Self {
        let policy = FetchPolicy::default();
        Self {
            page_size: policy.page_size,
            page_delay_ms: policy.page_delay.as_millis() as u64,
            detail_delay_ms: policy.detail_delay.as_millis() as u64,
            retry_cooldown_seconds: policy.retry_cooldown.as_secs(),
            max_retries: policy.max_retries,
        }
    }
}

impl FetchSettings {
    pub fn policy(&self) -> FetchPolicy {
        FetchPolicy {
            page_size: self.page_size,
            page_delay: Duration::from_millis(self.page_delay_ms),
            detail_delay: Duration::from_millis(self.detail_delay_ms),
            retry_cooldown: Duration::from_secs(self.retry_cooldown_seconds),
            max_retries: self.max_retries,
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置，`${VAR}` 以環境變數取代
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| StoreError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 有指定檔案就讀檔，否則使用預設值；最後套用 DISABLE_CACHE
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Ok(value) = std::env::var("DISABLE_CACHE") {
            config.apply_disable_cache(&value)?;
        }
        Ok(config)
    }

    pub fn apply_disable_cache(&mut self, value: &str) -> Result<()> {
        self.cache.disabled = parse_disable_cache(value)?;
        Ok(())
    }
}

fn substitute_env_vars(content: &str) -> String {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    let re = PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid")
    });

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .into_owned()
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api.postal_info_url", &self.api.postal_info_url)?;
        validate_url("api.municipality_url", &self.api.municipality_url)?;
        validate_url("api.address_match_url", &self.api.address_match_url)?;
        validate_url("api.fuzzy_search_url", &self.api.fuzzy_search_url)?;
        validate_positive_number("api.timeout_seconds", self.api.timeout_seconds as usize, 1)?;
        validate_path("cache.directory", &self.cache.directory.to_string_lossy())?;
        validate_positive_number("fetch.page_size", self.fetch.page_size, 1)?;
        Ok(())
    }
}
