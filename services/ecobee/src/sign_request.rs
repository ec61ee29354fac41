use async_trait::async_trait;
use http::header::AUTHORIZATION;
use http::HeaderValue;
use log::debug;

use ecobee_auth_core::{Context, Error, Result, SignRequest, SigningCredential};

use crate::credential::Credential;

/// RequestSigner sets the `Authorization` header of ecobee API requests.
#[derive(Debug, Default, Clone, Copy)]
pub struct RequestSigner;

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _ctx: &Context,
        req: &mut http::request::Parts,
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        let Some(cred) = credential else {
            return Err(Error::not_authorized("no credential to sign the request with"));
        };
        if !cred.is_valid() {
            return Err(Error::not_authorized(format!(
                "credential expired at {}",
                cred.expiry
            )));
        }

        let mut value =
            HeaderValue::try_from(format!("{} {}", cred.auth_scheme(), cred.access_token))
                .map_err(|e| {
                    Error::request_invalid("access token is not a valid header value")
                        .with_source(e)
                })?;
        value.set_sensitive(true);
        req.headers.insert(AUTHORIZATION, value);

        debug!("signed request to {}", req.uri);
        Ok(())
    }
}
