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

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{Method, StatusCode};
use log::{debug, error};
use serde::Deserialize;

use ecobee_auth_core::time::now;
use ecobee_auth_core::{Context, Error, Result};

use crate::config::Config;
use crate::constants::{ECOBEE_PIN_GRANT, FORM_CONTENT_TYPE};
use crate::credential::{Credential, PinChallenge};
use crate::token_response::TokenResponse;

/// Error body returned by the ecobee authorization server.
#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
    #[serde(default)]
    error_description: String,
}

/// Ask the authorize endpoint for a new pin.
pub(crate) async fn request_pin(ctx: &Context, config: &Config) -> Result<PinChallenge> {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("response_type", ECOBEE_PIN_GRANT)
        .append_pair("client_id", &config.client_id)
        .append_pair("scope", &config.scope_param())
        .finish();

    let req = http::Request::builder()
        .method(Method::GET)
        .uri(format!("{}?{query}", config.url("authorize")))
        .body(Bytes::new())
        .map_err(|e| Error::request_invalid("could not create pin request").with_source(e))?;

    debug!("requesting pin for scope {}", config.scope_param());
    let body = send(ctx, req, "pin").await?;

    serde_json::from_slice(&body)
        .map_err(|e| Error::decode("failed to read pin response").with_source(e))
}

/// Exchange `code` at the token endpoint.
///
/// `code` is either the code of an approved pin or a refresh token; the
/// endpoint accepts both under the same grant type.
pub(crate) async fn exchange_code(ctx: &Context, config: &Config, code: &str) -> Result<Credential> {
    let form = form_urlencoded::Serializer::new(String::new())
        .append_pair("grant_type", ECOBEE_PIN_GRANT)
        .append_pair("client_id", &config.client_id)
        .append_pair("code", code)
        .finish();

    let req = http::Request::builder()
        .method(Method::POST)
        .uri(config.url("token"))
        .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
        .body(Bytes::from(form))
        .map_err(|e| Error::request_invalid("could not create token request").with_source(e))?;

    let body = send(ctx, req, "token").await?;

    TokenResponse::from_slice(&body)?.into_credential(now(), config.expires_in_unit)
}

async fn send(ctx: &Context, req: http::Request<Bytes>, stage: &str) -> Result<Bytes> {
    let resp = ctx
        .http_send(req)
        .await
        .map_err(|e| Error::transport(format!("error sending {stage} request")).with_source(e))?;

    let status = resp.status();
    if status != StatusCode::OK {
        error!("{stage} request got unexpected response: {status}");
        return Err(Error::unexpected_status(describe_failure(
            status,
            resp.body(),
        )));
    }

    Ok(resp.into_body())
}

fn describe_failure(status: StatusCode, body: &[u8]) -> String {
    match serde_json::from_slice::<ErrorResponse>(body) {
        Ok(e) if e.error_description.is_empty() => {
            format!("invalid server response: {status}: {}", e.error)
        }
        Ok(e) => format!(
            "invalid server response: {status}: {}: {}",
            e.error, e.error_description
        ),
        Err(_) => format!("invalid server response: {status}"),
    }
}
