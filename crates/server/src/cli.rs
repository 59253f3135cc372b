//! Command-line and environment configuration.
//!
//! Every flag can also be set through the environment variable named next to it; flags win.

use anyhow::Context as _;
use apidocs_openapi_tools::config::{
    ApiServerConfig, DEFAULT_API_KEY_HEADER, Environment, default_local_spec_path,
};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Serve an `OpenAPI`-described REST API to MCP clients over stdio.
#[derive(Debug, Parser)]
#[command(name = "apidocs-mcp", version, about, long_about = None)]
pub struct Cli {
    /// Target deployment: selects the default spec and base URLs.
    #[arg(long, env = "API_ENVIRONMENT", default_value = "sandbox")]
    pub environment: Environment,

    /// API key sent with every invocation. Invocation is disabled without it.
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Header name the API key is sent under.
    #[arg(long, env = "API_KEY_HEADER", default_value = DEFAULT_API_KEY_HEADER)]
    pub api_key_header: String,

    /// Refuse every invocation, whatever the HTTP method.
    #[arg(
        long,
        env = "READ_ONLY_MODE",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub read_only: bool,

    /// Base URL for invoked endpoints (defaults to the environment's).
    #[arg(long, env = "API_BASE_URL")]
    pub base_url: Option<String>,

    /// Where to fetch the spec from (defaults to the environment's). Empty disables fetching.
    #[arg(long, env = "OPENAPI_SPEC_URL")]
    pub spec_url: Option<String>,

    /// Skip the remote fetch and read the local spec file directly.
    #[arg(
        long,
        env = "DISABLE_SPEC_FETCH",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub no_spec_fetch: bool,

    /// Fallback spec file (defaults to `openapi.yaml` next to the executable).
    #[arg(long, env = "LOCAL_SPEC_PATH")]
    pub local_spec_path: Option<PathBuf>,

    /// Timeout for invoked endpoints, in seconds.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Timeout for the remote spec fetch, in seconds.
    #[arg(long, env = "SPEC_FETCH_TIMEOUT_SECS", default_value_t = 10)]
    pub spec_fetch_timeout_secs: u64,

    /// Log filter directive (`RUST_LOG` takes precedence when set).
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Cli {
    /// Build the runtime configuration: environment defaults, then explicit overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting configuration is invalid (e.g. a non-http base URL).
    pub fn api_config(&self) -> anyhow::Result<ApiServerConfig> {
        let mut config = ApiServerConfig::for_environment(self.environment);

        if let Some(base_url) = &self.base_url {
            config.base_url.clone_from(base_url);
        }
        if let Some(spec_url) = &self.spec_url {
            config.spec_url = Some(spec_url.clone()).filter(|u| !u.trim().is_empty());
        }
        if self.no_spec_fetch {
            config.spec_url = None;
        }
        config.local_spec_path = self
            .local_spec_path
            .clone()
            .unwrap_or_else(default_local_spec_path);
        config.api_key = self.api_key.clone().filter(|k| !k.is_empty());
        config.api_key_header.clone_from(&self.api_key_header);
        config.read_only = self.read_only;
        config.request_timeout = Duration::from_secs(self.request_timeout_secs);
        config.spec_fetch_timeout = Duration::from_secs(self.spec_fetch_timeout_secs);

        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

/// Install the global tracing subscriber. Logs always go to stderr; stdout carries MCP traffic.
///
/// # Errors
///
/// Returns an error if the filter directive does not parse or a subscriber is already set.
pub fn init_tracing(level: &str, format: LogFormat) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("invalid log filter '{level}'"))?;
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?,
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false)
                    .with_target(false),
            )
            .try_init()?,
    }
    Ok(())
}
