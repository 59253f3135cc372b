use crate::error::{OpenApiToolsError, Result};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_KEY_HEADER: &str = "X-API-Key";
pub const DEFAULT_LOCAL_SPEC_FILE: &str = "openapi.yaml";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_SPEC_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Which deployment of the documented API the server targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Environment {
    #[default]
    Sandbox,
    Production,
}

impl Environment {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sandbox => "sandbox",
            Self::Production => "production",
        }
    }

    #[must_use]
    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::Sandbox => "https://sandbox.api.example.com/v1",
            Self::Production => "https://api.example.com/v1",
        }
    }

    #[must_use]
    pub fn default_spec_url(self) -> &'static str {
        match self {
            Self::Sandbox => "https://sandbox.api.example.com/v1/openapi.yaml",
            Self::Production => "https://api.example.com/v1/openapi.yaml",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = OpenApiToolsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sandbox" => Ok(Self::Sandbox),
            "production" | "prod" => Ok(Self::Production),
            other => Err(OpenApiToolsError::Config(format!(
                "unknown environment '{other}' (expected 'sandbox' or 'production')"
            ))),
        }
    }
}

/// Everything the loader and the invocation gateway need to know about the target API.
#[derive(Clone)]
pub struct ApiServerConfig {
    pub environment: Environment,

    /// Remote spec location. `None` skips the fetch and goes straight to the local file.
    pub spec_url: Option<String>,

    pub local_spec_path: PathBuf,

    /// Invocation is refused while this is unset.
    pub api_key: Option<String>,

    /// Header name the API key is sent under.
    pub api_key_header: String,

    /// Refuse all invocations, whatever the method.
    pub read_only: bool,

    /// Prefix for invoked endpoint paths. Concatenated as-is.
    pub base_url: String,

    pub request_timeout: Duration,
    pub spec_fetch_timeout: Duration,
}

impl ApiServerConfig {
    /// Defaults for `environment`: its base and spec URLs, no API key, writes allowed.
    #[must_use]
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            environment,
            spec_url: Some(environment.default_spec_url().to_string()),
            local_spec_path: default_local_spec_path(),
            api_key: None,
            api_key_header: DEFAULT_API_KEY_HEADER.to_string(),
            read_only: false,
            base_url: environment.default_base_url().to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            spec_fetch_timeout: DEFAULT_SPEC_FETCH_TIMEOUT,
        }
    }

    /// Reject values that would make every invocation fail.
    ///
    /// # Errors
    ///
    /// Returns [`OpenApiToolsError::Config`] if the base URL is not an absolute http(s) URL, the
    /// spec URL does not parse, or the API key header name is empty.
    pub fn validate(&self) -> Result<()> {
        let base = Url::parse(&self.base_url).map_err(|e| {
            OpenApiToolsError::Config(format!("invalid base URL '{}': {e}", self.base_url))
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(OpenApiToolsError::Config(format!(
                "base URL must use http or https, got '{}'",
                base.scheme()
            )));
        }

        if let Some(spec_url) = &self.spec_url {
            Url::parse(spec_url).map_err(|e| {
                OpenApiToolsError::Config(format!("invalid spec URL '{spec_url}': {e}"))
            })?;
        }

        if self.api_key_header.trim().is_empty() {
            return Err(OpenApiToolsError::Config(
                "API key header name must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

// Hand-written so the API key never ends up in logs.
impl fmt::Debug for ApiServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiServerConfig")
            .field("environment", &self.environment)
            .field("spec_url", &self.spec_url)
            .field("local_spec_path", &self.local_spec_path)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_key_header", &self.api_key_header)
            .field("read_only", &self.read_only)
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .field("spec_fetch_timeout", &self.spec_fetch_timeout)
            .finish()
    }
}

/// `openapi.yaml` next to the running executable, or in the working directory if the
/// executable's location is unknown.
#[must_use]
pub fn default_local_spec_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_LOCAL_SPEC_FILE)))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOCAL_SPEC_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_parses_case_insensitively() {
        assert_eq!("Sandbox".parse::<Environment>().unwrap(), Environment::Sandbox);
        assert_eq!(
            "PRODUCTION".parse::<Environment>().unwrap(),
            Environment::Production
        );
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn environment_defaults_differ() {
        let sandbox = ApiServerConfig::for_environment(Environment::Sandbox);
        let production = ApiServerConfig::for_environment(Environment::Production);
        assert_ne!(sandbox.base_url, production.base_url);
        assert_ne!(sandbox.spec_url, production.spec_url);
        assert_eq!(sandbox.api_key_header, "X-API-Key");
        assert_eq!(sandbox.request_timeout, Duration::from_secs(30));
        assert_eq!(sandbox.spec_fetch_timeout, Duration::from_secs(10));
        assert!(!sandbox.read_only);
        assert!(!sandbox.has_api_key());
    }

    #[test]
    fn default_local_spec_path_is_named_openapi_yaml() {
        let path = default_local_spec_path();
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("openapi.yaml")
        );
    }

    #[test]
    fn validate_accepts_defaults() {
        ApiServerConfig::default().validate().unwrap();
    }

    #[test]
    fn validate_rejects_non_http_base_url() {
        let mut cfg = ApiServerConfig::default();
        cfg.base_url = "ftp://files.example.com".to_string();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("http or https"), "{err}");

        cfg.base_url = "not a url".to_string();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_key_header() {
        let mut cfg = ApiServerConfig::default();
        cfg.api_key_header = "  ".to_string();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn empty_api_key_counts_as_missing() {
        let mut cfg = ApiServerConfig::default();
        cfg.api_key = Some(String::new());
        assert!(!cfg.has_api_key());
        cfg.api_key = Some("k".to_string());
        assert!(cfg.has_api_key());
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let mut cfg = ApiServerConfig::default();
        cfg.api_key = Some("super-secret".to_string());
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
