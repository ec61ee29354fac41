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

use std::fmt;
use thiserror::Error;

/// The error type for ecobee-auth operations
#[derive(Error, Debug)]
#[error("{kind}: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<anyhow::Error>,
}

/// The kind of error that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// No credential has been obtained yet; a pin flow must complete first.
    NotAuthorized,

    /// The credential carries no refresh token and cannot be refreshed.
    NoRefreshToken,

    /// The request could not be constructed.
    RequestInvalid,

    /// Network, DNS or TLS failure while reaching the server.
    Transport,

    /// The server answered with a status other than `200 OK`.
    UnexpectedStatus,

    /// The response body is not the expected JSON.
    Decode,

    /// The cache file could not be read or written.
    CacheIo,

    /// The file does not exist.
    NotFound,

    /// Configuration error (missing fields, invalid values)
    ConfigInvalid,

    /// Anything else.
    Unexpected,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the error message without the kind prefix.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Wrap this error with a new message, keeping its kind.
    ///
    /// The original error becomes the source of the returned one.
    pub fn context(self, message: impl Into<String>) -> Self {
        let kind = self.kind;
        Self::new(kind, message).with_source(self)
    }
}

// Convenience constructors
impl Error {
    /// Create a not authorized error
    pub fn not_authorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotAuthorized, message)
    }

    /// Create a no refresh token error
    pub fn no_refresh_token(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NoRefreshToken, message)
    }

    /// Create a request invalid error
    pub fn request_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RequestInvalid, message)
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    /// Create an unexpected status error
    pub fn unexpected_status(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnexpectedStatus, message)
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Decode, message)
    }

    /// Create a cache io error
    pub fn cache_io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CacheIo, message)
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a config invalid error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NotAuthorized => write!(f, "not authorized"),
            ErrorKind::NoRefreshToken => write!(f, "no refresh token"),
            ErrorKind::RequestInvalid => write!(f, "invalid request"),
            ErrorKind::Transport => write!(f, "transport error"),
            ErrorKind::UnexpectedStatus => write!(f, "unexpected status"),
            ErrorKind::Decode => write!(f, "decode error"),
            ErrorKind::CacheIo => write!(f, "cache io error"),
            ErrorKind::NotFound => write!(f, "not found"),
            ErrorKind::ConfigInvalid => write!(f, "invalid configuration"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;
