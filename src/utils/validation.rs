use crate::utils::error::{Result, StoreError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: &str, reason: impl Into<String>) -> StoreError {
    StoreError::InvalidConfigValue {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(invalid(
                field_name,
                url_str,
                format!("Unsupported URL scheme: {}", scheme),
            )),
        },
        Err(e) => Err(invalid(
            field_name,
            url_str,
            format!("Invalid URL format: {}", e),
        )),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(invalid(field_name, path, "Path cannot be empty"));
    }

    if path.contains('\0') {
        return Err(invalid(field_name, path, "Path contains null bytes"));
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(invalid(
            field_name,
            &value.to_string(),
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

/// DISABLE_CACHE 只接受 true/1 或 false/0/空字串
pub fn parse_disable_cache(value: &str) -> Result<bool> {
    match value {
        "true" | "1" => Ok(true),
        "false" | "0" | "" => Ok(false),
        other => Err(invalid(
            "DISABLE_CACHE",
            other,
            "Expected one of: true, 1, false, 0 or empty",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("api.postal_info_url", "https://example.com").is_ok());
        assert!(validate_url("api.postal_info_url", "http://example.com").is_ok());
        assert!(validate_url("api.postal_info_url", "").is_err());
        assert!(validate_url("api.postal_info_url", "invalid-url").is_err());
        assert!(validate_url("api.postal_info_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("cache.directory", "/app/cache").is_ok());
        assert!(validate_path("cache.directory", "  ").is_err());
        assert!(validate_path("cache.directory", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("fetch.page_size", 50, 1).is_ok());
        assert!(validate_positive_number("fetch.page_size", 0, 1).is_err());
    }

    #[test]
    fn test_parse_disable_cache() {
        assert!(parse_disable_cache("true").unwrap());
        assert!(parse_disable_cache("1").unwrap());
        assert!(!parse_disable_cache("false").unwrap());
        assert!(!parse_disable_cache("0").unwrap());
        assert!(!parse_disable_cache("").unwrap());

        let err = parse_disable_cache("yes").unwrap_err();
        assert!(matches!(err, StoreError::InvalidConfigValue { ref field, .. } if field == "DISABLE_CACHE"));

        // 前後空白不算合法值
        assert!(parse_disable_cache(" true ").is_err());
        assert!(parse_disable_cache("0 ").is_err());
    }
}
