use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Postal code '{postal_code}' is not a 4 digit code")]
    InvalidFormat { postal_code: String },

    #[error("Postal code '{postal_code}' is not in Flanders")]
    OutOfRegion { postal_code: String },

    #[error("Upstream API returned status {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Upstream API response did not match the expected schema: {diagnostic}")]
    Schema { diagnostic: String },

    #[error("API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Reference store is not initialised yet")]
    NotReady,

    #[error("Postal name '{postal_name}' not found")]
    NotFound { postal_name: String },

    #[error("Reference data is inconsistent: {message}")]
    ConstructionInvariant { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },
}

impl StoreError {
    /// 上游暫時性錯誤才值得等待後重試 (5xx、408、429、連線問題)
    pub fn is_retryable(&self) -> bool {
        match self {
            StoreError::Upstream { status, .. } => {
                *status >= 500 || *status == 408 || *status == 429
            }
            StoreError::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            _ => false,
        }
    }

    /// 對應到呼叫端應回傳的 HTTP 狀態碼
    pub fn status(&self) -> u16 {
        match self {
            StoreError::InvalidFormat { .. } | StoreError::OutOfRegion { .. } => 400,
            StoreError::NotFound { .. } => 404,
            StoreError::NotReady => 503,
            StoreError::Upstream { status, .. } => *status,
            _ => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
