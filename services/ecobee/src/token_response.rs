//! Decoding of the ecobee token endpoint body.
//!
//! The endpoint returns a relative `expires_in` and a flat `scope` string
//! instead of an absolute expiry. [`TokenResponse::into_credential`] turns the
//! raw body into a [`Credential`].

use std::collections::HashMap;

use ecobee_auth_core::time::DateTime;
use ecobee_auth_core::{Error, Result};
use serde::Deserialize;

use crate::config::ExpiresInUnit;
use crate::credential::Credential;

/// Raw body of a successful token exchange.
///
/// See <https://www.ecobee.com/home/developer/api/documentation/v1/auth/pin-api-authorization.shtml>
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: String,
    #[serde(default)]
    refresh_token: String,
    #[serde(default)]
    expires_in: i64,
    #[serde(default)]
    scope: String,
}

impl TokenResponse {
    pub(crate) fn from_slice(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body)
            .map_err(|e| Error::decode("failed to read token response").with_source(e))
    }

    /// Convert into a credential issued at `now`.
    ///
    /// One unit is subtracted from `expires_in` so the remaining lifetime is
    /// underestimated rather than overestimated.
    pub(crate) fn into_credential(self, now: DateTime, unit: ExpiresInUnit) -> Result<Credential> {
        let expiry = self
            .expires_in
            .checked_sub(1)
            .and_then(|n| unit.delta(n))
            .and_then(|delta| now.checked_add_signed(delta))
            .ok_or_else(|| {
                Error::decode(format!(
                    "expires_in {} is out of range",
                    self.expires_in
                ))
            })?;

        Ok(Credential {
            access_token: self.access_token,
            token_type: self.token_type,
            refresh_token: self.refresh_token,
            expiry,
            extra: HashMap::from([("scope".to_string(), self.scope)]),
        })
    }
}
