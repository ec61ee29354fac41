// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::{debug, warn};
use tokio::sync::Mutex;

use ecobee_auth_core::time::format_rfc3339;
use ecobee_auth_core::{Context, Error, ErrorKind, Result, SignRequest, SigningCredential};

use crate::config::Config;
use crate::credential::{Credential, PinChallenge};
use crate::protocol;
use crate::sign_request::RequestSigner;

/// TokenManager hands out ecobee credentials obtained through the PIN flow.
///
/// A fresh manager without a cached credential fails [`TokenManager::token`]
/// with `NotAuthorized`. To authorize it, call [`TokenManager::get_pin`],
/// have the user enter the pin in the ecobee consumer portal, then exchange
/// the pin's code with [`TokenManager::get_token`] and activate the result
/// with [`TokenManager::save_token`].
///
/// Cloning is cheap; clones share the same credential and lock.
#[derive(Clone, Debug)]
pub struct TokenManager {
    ctx: Context,
    config: Arc<Config>,
    cache_path: Option<String>,
    state: Arc<Mutex<State>>,
    /// Bumped after every refresh attempt made by `token()`.
    refreshes: Arc<AtomicU64>,
}

#[derive(Debug, Default)]
struct State {
    credential: Option<Credential>,
    /// Kind and message of the last refresh attempt if it failed.
    failed_refresh: Option<(ErrorKind, String)>,
}

impl TokenManager {
    /// Create a new token manager, loading the cached credential if any.
    ///
    /// A missing or unparsable cache file leaves the manager unauthorized. A
    /// cache file that exists but cannot be read fails with `CacheIo`.
    pub async fn new(ctx: Context, config: Config) -> Result<Self> {
        if config.client_id.is_empty() {
            return Err(Error::config_invalid("client id must not be empty"));
        }

        let cache_path = match config.cache_path.as_deref() {
            None | Some("") => None,
            Some(path) => Some(ctx.expand_home_dir(path).ok_or_else(|| {
                Error::config_invalid(format!(
                    "cache path {path} needs a home directory but none was found"
                ))
            })?),
        };

        let credential = match &cache_path {
            Some(path) => load_cache(&ctx, path).await?,
            None => None,
        };

        Ok(Self {
            ctx,
            config: Arc::new(config),
            cache_path,
            state: Arc::new(Mutex::new(State {
                credential,
                failed_refresh: None,
            })),
            refreshes: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Return the current credential, refreshing it first if it has expired.
    ///
    /// Calls are serialized: while one caller refreshes, the others wait for
    /// it and then share its outcome, either the refreshed credential or the
    /// same error. Only one exchange request is sent per expiry.
    pub async fn token(&self) -> Result<Credential> {
        let seen = self.refreshes.load(Ordering::Acquire);
        let mut state = self.state.lock().await;

        let Some(current) = state.credential.as_ref() else {
            return Err(Error::not_authorized("token not yet available"));
        };
        if current.is_valid() {
            return Ok(current.clone());
        }

        // A refresh finished while we were waiting for the lock and it failed.
        if self.refreshes.load(Ordering::Acquire) != seen {
            if let Some((kind, message)) = &state.failed_refresh {
                debug!("reusing failed refresh result: {message}");
                return Err(Error::new(*kind, message.clone()).context("could not refresh token"));
            }
        }

        debug!(
            "token expired at {}, refreshing",
            format_rfc3339(current.expiry)
        );
        let timeout = self.config.refresh_timeout;
        let result = match tokio::time::timeout(timeout, self.refresh_token(current)).await {
            Ok(result) => result,
            Err(_) => Err(Error::transport(format!(
                "token refresh did not finish within {timeout:?}"
            ))),
        };
        self.refreshes.fetch_add(1, Ordering::AcqRel);

        let refreshed = match result {
            Ok(cred) => cred,
            Err(err) => {
                state.failed_refresh = Some((err.kind(), err.message().to_string()));
                return Err(err.context("could not refresh token"));
            }
        };

        // The refreshed credential is usable even if persisting it fails.
        if let Err(err) = self.write_cache(&refreshed).await {
            warn!("failed to cache refreshed token: {err}");
        }
        state.credential = Some(refreshed.clone());
        state.failed_refresh = None;

        Ok(refreshed)
    }

    /// Activate `credential` and write it to the cache file if caching is enabled.
    ///
    /// The in-memory credential is replaced even when the cache write fails.
    pub async fn save_token(&self, credential: Credential) -> Result<()> {
        let mut state = self.state.lock().await;

        let result = self.write_cache(&credential).await;
        state.credential = Some(credential);
        state.failed_refresh = None;
        result
    }

    /// Request a pin for the user to enter in the ecobee consumer portal.
    ///
    /// This doesn't touch the current credential.
    pub async fn get_pin(&self) -> Result<PinChallenge> {
        protocol::request_pin(&self.ctx, &self.config).await
    }

    /// Exchange the `code` of a [`PinChallenge`] for a credential.
    ///
    /// Fails until the pin has been approved in the portal; callers are
    /// expected to retry every [`PinChallenge::poll_interval`]. The returned
    /// credential is not used by this manager until it is passed to
    /// [`TokenManager::save_token`].
    pub async fn get_token(&self, code: &str) -> Result<Credential> {
        debug!("exchanging pin code for token");
        protocol::exchange_code(&self.ctx, &self.config, code).await
    }

    /// Refresh `credential`, returning a new one.
    ///
    /// Like [`TokenManager::get_token`], the result must be passed to
    /// [`TokenManager::save_token`] to be used by this manager.
    pub async fn refresh_token(&self, credential: &Credential) -> Result<Credential> {
        if !credential.has_refresh_token() {
            return Err(Error::no_refresh_token("token did not have a refresh token"));
        }

        debug!("refreshing token");
        protocol::exchange_code(&self.ctx, &self.config, &credential.refresh_token).await
    }

    /// Authorize an outgoing API request with the current credential.
    pub async fn sign(&self, req: &mut http::request::Parts) -> Result<()> {
        let credential = self.token().await?;
        RequestSigner
            .sign_request(&self.ctx, req, Some(&credential))
            .await
    }

    async fn write_cache(&self, credential: &Credential) -> Result<()> {
        let Some(path) = &self.cache_path else {
            return Ok(());
        };

        let content = serde_json::to_vec(credential)
            .map_err(|e| Error::unexpected("failed to encode token").with_source(e))?;
        self.ctx
            .file_write(path, &content)
            .await
            .map_err(|e| Error::cache_io(format!("failed to cache token to {path}")).with_source(e))
    }
}

async fn load_cache(ctx: &Context, path: &str) -> Result<Option<Credential>> {
    let content = match ctx.file_read(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!("cache file {path} does not exist yet");
            return Ok(None);
        }
        Err(err) => {
            return Err(Error::cache_io(format!("failed to open cache file {path}")).with_source(err))
        }
    };

    match serde_json::from_slice::<Credential>(&content) {
        Ok(credential) => {
            debug!(
                "loaded cached token expiring at {}",
                format_rfc3339(credential.expiry)
            );
            Ok(Some(credential))
        }
        Err(err) => {
            warn!("ignoring unreadable cache file {path}: {err}");
            Ok(None)
        }
    }
}
