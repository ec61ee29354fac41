use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::time::Duration;

use ecobee_auth_core::time::{now, DateTime};
use ecobee_auth_core::utils::Redact;
use ecobee_auth_core::SigningCredential;
use serde::{Deserialize, Serialize};

/// Credential is the OAuth2 token issued by the ecobee token endpoint.
///
/// This is also the exact shape of the cache file.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Bearer token for API calls.
    pub access_token: String,
    /// Type of the token, typically `Bearer`.
    #[serde(default)]
    pub token_type: String,
    /// Token used to mint a new access token. Empty if refresh is impossible.
    #[serde(default)]
    pub refresh_token: String,
    /// The access token must not be used at or after this time.
    pub expiry: DateTime,
    /// Extra fields returned with the token; currently only `scope`.
    #[serde(default)]
    pub extra: HashMap<String, String>,
}

impl Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &Redact::from(&self.access_token))
            .field("token_type", &self.token_type)
            .field("refresh_token", &Redact::from(&self.refresh_token))
            .field("expiry", &self.expiry)
            .field("extra", &self.extra)
            .finish()
    }
}

impl Credential {
    /// The scope granted with this credential, if any.
    pub fn scope(&self) -> Option<&str> {
        self.extra.get("scope").map(String::as_str)
    }

    /// Whether the credential can be refreshed without a new pin flow.
    pub fn has_refresh_token(&self) -> bool {
        !self.refresh_token.is_empty()
    }

    /// Scheme for the `Authorization` header.
    ///
    /// Defaults to `Bearer` and normalizes the casing of well known schemes.
    pub fn auth_scheme(&self) -> &str {
        let ty = self.token_type.as_str();
        if ty.is_empty() || ty.eq_ignore_ascii_case("bearer") {
            "Bearer"
        } else if ty.eq_ignore_ascii_case("mac") {
            "MAC"
        } else if ty.eq_ignore_ascii_case("basic") {
            "Basic"
        } else {
            ty
        }
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        !self.access_token.is_empty() && now() < self.expiry
    }
}

/// PinChallenge is returned by the authorize endpoint.
///
/// Show `pin` to the user so they can enter it in the ecobee consumer portal,
/// then exchange `code` with `TokenManager::get_token`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinChallenge {
    /// Code to enter in the portal.
    #[serde(rename = "ecobeePin")]
    pub pin: String,
    /// Code to exchange for a credential once the pin has been approved.
    pub code: String,
    /// Scope the pin was issued for.
    #[serde(default)]
    pub scope: String,
    /// How long the pin stays valid, in minutes.
    #[serde(rename = "expires_in", default)]
    pub expires_in_minutes: u64,
    /// Suggested delay between exchange attempts, in seconds.
    #[serde(rename = "interval", default)]
    pub poll_interval_secs: u64,
}

impl PinChallenge {
    /// Suggested delay between exchange attempts.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// How long the pin stays valid.
    pub fn expires_in(&self) -> Duration {
        Duration::from_secs(self.expires_in_minutes.saturating_mul(60))
    }
}
