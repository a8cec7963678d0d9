//! Configuration for the upstream data/auth service.
//!
//! The upstream platform is addressed by a base URL and two credential
//! tiers: a privileged service key that must never leave the server, and a
//! public anon key that the sign-in page hands to the browser. All three are
//! read from the environment once at startup. A missing value is a hard
//! error so the process refuses to serve requests with a partial
//! configuration.

use std::env;

/// The environment variable holding the upstream service's base URL.
pub const UPSTREAM_URL_VAR: &str = "UPSTREAM_URL";
/// The public-prefixed fallback for [UPSTREAM_URL_VAR], shared with
/// browser-side tooling.
pub const PUBLIC_UPSTREAM_URL_VAR: &str = "PUBLIC_UPSTREAM_URL";
/// The environment variable holding the upstream service's Postgres
/// connection string.
pub const DATABASE_URL_VAR: &str = "UPSTREAM_DATABASE_URL";
/// The environment variable holding the privileged service credential.
pub const SERVICE_KEY_VAR: &str = "UPSTREAM_SERVICE_KEY";
/// The environment variable holding the public anon credential.
pub const ANON_KEY_VAR: &str = "UPSTREAM_ANON_KEY";

/// The process-wide upstream configuration.
///
/// Constructed once in `main` and injected into [AppState](crate::AppState),
/// never accessed as a global.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Base URL of the upstream service. The sign-in page uses it to reach
    /// the auth API from the browser.
    pub url: String,
    /// Connection string for the upstream service's Postgres endpoint.
    /// Server-side only.
    pub database_url: String,
    /// The privileged service credential. Server-side only. Access tokens
    /// issued by the upstream are verified against it.
    pub service_key: String,
    /// The public credential embedded in the sign-in page.
    pub anon_key: String,
}

/// The ways reading the upstream configuration can fail.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Neither [UPSTREAM_URL_VAR] nor [PUBLIC_UPSTREAM_URL_VAR] is set.
    #[error("the environment variable '{UPSTREAM_URL_VAR}' (or '{PUBLIC_UPSTREAM_URL_VAR}') must be set")]
    MissingUrl,

    /// [DATABASE_URL_VAR] is not set.
    #[error("the environment variable '{DATABASE_URL_VAR}' must be set")]
    MissingDatabaseUrl,

    /// [SERVICE_KEY_VAR] is not set.
    #[error("the environment variable '{SERVICE_KEY_VAR}' must be set")]
    MissingServiceKey,

    /// [ANON_KEY_VAR] is not set.
    #[error("the environment variable '{ANON_KEY_VAR}' must be set")]
    MissingAnonKey,
}

impl UpstreamConfig {
    /// Read the upstream configuration from the environment.
    ///
    /// # Errors
    /// Returns a [ConfigError] naming the first missing variable. Callers
    /// should treat this as fatal rather than deferring the failure to the
    /// first request.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(
            env::var(UPSTREAM_URL_VAR).ok(),
            env::var(PUBLIC_UPSTREAM_URL_VAR).ok(),
            env::var(DATABASE_URL_VAR).ok(),
            env::var(SERVICE_KEY_VAR).ok(),
            env::var(ANON_KEY_VAR).ok(),
        )
    }

    fn from_vars(
        url: Option<String>,
        public_url: Option<String>,
        database_url: Option<String>,
        service_key: Option<String>,
        anon_key: Option<String>,
    ) -> Result<Self, ConfigError> {
        let url = url
            .or(public_url)
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingUrl)?;

        let database_url = database_url
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingDatabaseUrl)?;

        let service_key = service_key
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingServiceKey)?;

        let anon_key = anon_key
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingAnonKey)?;

        Ok(Self {
            url,
            database_url,
            service_key,
            anon_key,
        })
    }
}
