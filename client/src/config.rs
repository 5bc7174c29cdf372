//! Client configuration loaded via OrthoConfig.

use std::time::Duration;

use ortho_config::OrthoConfig;
use pagination::{PageSize, PageSizeError};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "https://api.wallet.invalid/api/";
const DEFAULT_USER_AGENT: &str = concat!("wallet-client/", env!("CARGO_PKG_VERSION"));

/// Invalid configuration values.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// `api_base_url` is not an absolute http(s) URL.
    #[error("invalid API base URL {value:?}: {reason}")]
    InvalidBaseUrl {
        /// Configured value.
        value: String,
        /// Parser or scheme failure.
        reason: String,
    },
    /// `request_timeout_secs` is zero.
    #[error("request timeout must be at least one second")]
    ZeroTimeout,
    /// `page_size` is outside `1..=100`.
    #[error("invalid page size: {0}")]
    PageSize(#[from] PageSizeError),
}

/// Configuration values for the wallet API client.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "WALLET")]
pub struct ClientSettings {
    /// Base URL every endpoint path is joined onto.
    pub api_base_url: Option<String>,
    /// Per-request timeout in seconds.
    #[ortho_config(default = 15)]
    pub request_timeout_secs: u64,
    /// Rows requested per page.
    pub page_size: Option<u32>,
    /// User-agent header value.
    pub user_agent: Option<String>,
}

impl ClientSettings {
    /// Return the configured base URL, falling back to the default.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBaseUrl`] for unparsable or non-HTTP URLs.
    pub fn api_base_url(&self) -> Result<Url, SettingsError> {
        let raw = self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL);
        let invalid = |reason: String| SettingsError::InvalidBaseUrl {
            value: raw.to_owned(),
            reason,
        };
        let url = Url::parse(raw).map_err(|error| invalid(error.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(invalid(format!("unsupported scheme {other}"))),
        }
    }

    /// Return the configured request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::ZeroTimeout`] when set to zero.
    pub fn request_timeout(&self) -> Result<Duration, SettingsError> {
        match self.request_timeout_secs {
            0 => Err(SettingsError::ZeroTimeout),
            secs => Ok(Duration::from_secs(secs)),
        }
    }

    /// Return the configured page size, falling back to [`PageSize::DEFAULT`].
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::PageSize`] when outside the accepted range.
    pub fn page_size(&self) -> Result<PageSize, SettingsError> {
        self.page_size
            .map_or(Ok(PageSize::DEFAULT), PageSize::new)
            .map_err(SettingsError::from)
    }

    /// Return the configured user agent, falling back to the default.
    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for client configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 4] = [
        "WALLET_API_BASE_URL",
        "WALLET_REQUEST_TIMEOUT_SECS",
        "WALLET_PAGE_SIZE",
        "WALLET_USER_AGENT",
    ];

    fn load_from_empty_args() -> ClientSettings {
        ClientSettings::load_from_iter([OsString::from("wallet-feed")])
            .expect("config should load")
    }

    fn settings_with(page_size: Option<u32>, timeout: u64) -> ClientSettings {
        ClientSettings {
            api_base_url: None,
            request_timeout_secs: timeout,
            page_size,
            user_agent: None,
        }
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.api_base_url().expect("default URL").as_str(),
            DEFAULT_API_BASE_URL
        );
        assert_eq!(
            settings.request_timeout().expect("default timeout"),
            Duration::from_secs(15)
        );
        assert_eq!(settings.page_size().expect("default size"), PageSize::DEFAULT);
        assert_eq!(settings.user_agent(), DEFAULT_USER_AGENT);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("WALLET_API_BASE_URL", Some("http://localhost:8080/v2/".to_owned())),
            ("WALLET_REQUEST_TIMEOUT_SECS", Some("30".to_owned())),
            ("WALLET_PAGE_SIZE", Some("25".to_owned())),
            ("WALLET_USER_AGENT", Some("wallet-feed/test".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.api_base_url().expect("URL").as_str(),
            "http://localhost:8080/v2/"
        );
        assert_eq!(
            settings.request_timeout().expect("timeout"),
            Duration::from_secs(30)
        );
        assert_eq!(settings.page_size().expect("size").get(), 25);
        assert_eq!(settings.user_agent(), "wallet-feed/test");
    }

    #[rstest]
    #[case("not a url")]
    #[case("ftp://files.example.test/")]
    fn rejects_unusable_base_urls(#[case] raw: &str) {
        let settings = ClientSettings {
            api_base_url: Some(raw.to_owned()),
            ..settings_with(None, 15)
        };
        assert!(matches!(
            settings.api_base_url(),
            Err(SettingsError::InvalidBaseUrl { .. })
        ));
    }

    #[rstest]
    #[case(Some(0))]
    #[case(Some(101))]
    fn rejects_out_of_range_page_sizes(#[case] page_size: Option<u32>) {
        assert!(matches!(
            settings_with(page_size, 15).page_size(),
            Err(SettingsError::PageSize(_))
        ));
    }

    #[test]
    fn rejects_zero_timeout() {
        assert!(matches!(
            settings_with(None, 0).request_timeout(),
            Err(SettingsError::ZeroTimeout)
        ));
    }
}
