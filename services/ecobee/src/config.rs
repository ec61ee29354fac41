use std::time::Duration;

use ecobee_auth_core::Context;

use crate::constants::*;

/// Unit the token endpoint's `expires_in` is interpreted in.
///
/// Existing ecobee deployments read the value as minutes, which yields a far
/// longer lifetime than the OAuth2 convention of seconds. Use `Seconds` to
/// follow the OAuth2 reading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExpiresInUnit {
    /// `expires_in` counts minutes.
    #[default]
    Minutes,
    /// `expires_in` counts seconds.
    Seconds,
}

impl ExpiresInUnit {
    /// Length of `n` units, `None` if it does not fit in a `TimeDelta`.
    pub fn delta(self, n: i64) -> Option<chrono::TimeDelta> {
        match self {
            ExpiresInUnit::Minutes => chrono::TimeDelta::try_minutes(n),
            ExpiresInUnit::Seconds => chrono::TimeDelta::try_seconds(n),
        }
    }
}

/// Config carries all the configuration for the token manager.
#[derive(Clone, Debug)]
pub struct Config {
    /// The application key registered in the ecobee developer portal.
    pub client_id: String,
    /// Where to persist the credential. `None` or empty disables caching.
    pub cache_path: Option<String>,
    /// Base URL of the authorization server.
    pub endpoint: String,
    /// Scopes requested when issuing a pin.
    pub scopes: Vec<String>,
    /// Upper bound for the refresh performed inside `TokenManager::token`.
    pub refresh_timeout: Duration,
    /// Unit of the `expires_in` field returned by the token endpoint.
    pub expires_in_unit: ExpiresInUnit,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            cache_path: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            scopes: DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
            refresh_timeout: DEFAULT_REFRESH_TIMEOUT,
            expires_in_unit: ExpiresInUnit::default(),
        }
    }
}

impl Config {
    /// Create a new config for the given client id.
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            ..Default::default()
        }
    }

    /// Set the cache file path.
    pub fn with_cache_path(mut self, path: impl Into<String>) -> Self {
        self.cache_path = Some(path.into());
        self
    }

    /// Set the authorization server endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the scopes requested when issuing a pin.
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the refresh timeout.
    pub fn with_refresh_timeout(mut self, timeout: Duration) -> Self {
        self.refresh_timeout = timeout;
        self
    }

    /// Set the unit of `expires_in`.
    pub fn with_expires_in_unit(mut self, unit: ExpiresInUnit) -> Self {
        self.expires_in_unit = unit;
        self
    }

    /// Load config from environment variables.
    ///
    /// Values already present in `self` are overwritten by the ones found in
    /// the environment.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(ECOBEE_API_KEY) {
            self.client_id = v;
        }
        if let Some(v) = ctx.env_var(ECOBEE_CACHE_FILE) {
            self.cache_path = Some(v);
        }
        if let Some(v) = ctx.env_var(ECOBEE_ENDPOINT) {
            self.endpoint = v;
        }
        if let Some(v) = ctx.env_var(ECOBEE_SCOPES) {
            self.scopes = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }

        self
    }

    /// Scopes joined the way the authorize endpoint expects them.
    pub(crate) fn scope_param(&self) -> String {
        self.scopes.join(",")
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.endpoint.trim_end_matches('/'))
    }
}
