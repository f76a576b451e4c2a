//! Endpoint configuration.
//!
//! The backend is addressed through one base URL per environment. The
//! progress WebSocket lives on the same host, so its URL is derived from the
//! base by swapping the scheme.

const PROGRESS_PATH: &str = "/excel/ws/progress";

/// Base URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("API base URL must not be empty")]
    EmptyBaseUrl,
    #[error("unsupported scheme in API base URL: {0}")]
    UnsupportedScheme(String),
    #[error("relative API base URL {0} needs a page origin to resolve against")]
    MissingOrigin(String),
}

/// Resolved endpoints for the HTTP API and the progress channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub api_url: String,
    pub ws_url: String,
}

impl ApiConfig {
    /// Builds the configuration from a base URL such as
    /// `http://localhost:8000` or `https://example.com/api`.
    ///
    /// A relative base (`/api`) is resolved against `origin`, the page origin
    /// the frontend is served from.
    pub fn from_base(base: &str, origin: Option<&str>) -> Result<Self, ConfigError> {
        let base = base.trim().trim_end_matches('/');
        if base.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }

        let absolute = if base.starts_with('/') {
            let origin = origin
                .map(|o| o.trim_end_matches('/'))
                .filter(|o| !o.is_empty())
                .ok_or_else(|| ConfigError::MissingOrigin(base.to_string()))?;
            format!("{}{}", origin, base)
        } else {
            base.to_string()
        };

        let ws_base = if let Some(rest) = absolute.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = absolute.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else {
            let scheme = absolute.split("://").next().unwrap_or_default().to_string();
            return Err(ConfigError::UnsupportedScheme(scheme));
        };

        Ok(Self {
            ws_url: format!("{}{}", ws_base, PROGRESS_PATH),
            api_url: absolute,
        })
    }

    /// Joins an API path (starting with `/`) onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            ws_url: format!("ws://localhost:8000{}", PROGRESS_PATH),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_ws_url_from_http_base() {
        let config = ApiConfig::from_base("http://localhost:8000/", None).unwrap();
        assert_eq!(config.api_url, "http://localhost:8000");
        assert_eq!(config.ws_url, "ws://localhost:8000/excel/ws/progress");
        assert_eq!(config, ApiConfig::default());
    }

    #[test]
    fn secure_base_uses_wss() {
        let config = ApiConfig::from_base("https://habits.example.com/api", None).unwrap();
        assert_eq!(config.ws_url, "wss://habits.example.com/api/excel/ws/progress");
        assert_eq!(
            config.endpoint("/habits/"),
            "https://habits.example.com/api/habits/"
        );
    }

    #[test]
    fn relative_base_resolves_against_origin() {
        let config = ApiConfig::from_base("/api", Some("https://app.example.com")).unwrap();
        assert_eq!(config.api_url, "https://app.example.com/api");

        assert_eq!(
            ApiConfig::from_base("/api", None),
            Err(ConfigError::MissingOrigin("/api".to_string()))
        );
    }

    #[test]
    fn rejects_bad_bases() {
        assert_eq!(ApiConfig::from_base("  ", None), Err(ConfigError::EmptyBaseUrl));
        assert_eq!(
            ApiConfig::from_base("ftp://host", None),
            Err(ConfigError::UnsupportedScheme("ftp".to_string()))
        );
    }
}
