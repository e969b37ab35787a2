//! Shared HTTP client setup

use crate::error::{HatchlingError, Result};

/// Header carrying the requester identity
pub const USER_ID_HEADER: &str = "X-User-ID";

/// Build the reqwest client used by every service client
pub fn build_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("hatchling/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| HatchlingError::Http(e.to_string()))
}

/// Join a base URL and a path without doubling slashes
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Parse a URL, mapping failures to a config error naming the setting
pub fn parse_url(raw: &str, setting: &str) -> Result<reqwest::Url> {
    reqwest::Url::parse(raw)
        .map_err(|e| HatchlingError::Config(format!("Invalid {} '{}': {}", setting, raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("http://h/api/", "/entry"), "http://h/api/entry");
        assert_eq!(join_url("http://h/api", "export/pdf"), "http://h/api/export/pdf");
    }

    #[test]
    fn test_parse_url_error_names_setting() {
        let err = parse_url("not a url", "api_url").unwrap_err();
        assert!(err.to_string().contains("api_url"));
    }
}
