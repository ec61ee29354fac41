//! Core components for ecobee PIN authorization.
//!
//! This crate provides the foundational types and traits shared by the
//! ecobee-auth crates.
//!
//! ## Overview
//!
//! - **Context**: holds implementations for file access, HTTP sending and
//!   environment lookups, so the token manager can be driven by tokio and
//!   reqwest in production and by in-memory fakes in tests.
//! - **Error**: a single error type whose [`ErrorKind`] tells callers whether
//!   a failure is worth retrying.
//! - **Traits**: [`SigningCredential`] for validity checks and [`SignRequest`]
//!   for attaching a credential to outgoing API requests.
//!
//! ## Example
//!
//! ```no_run
//! use bytes::Bytes;
//! use ecobee_auth_core::{Context, HttpSend, Result};
//!
//! #[derive(Debug)]
//! struct AlwaysOk;
//!
//! #[async_trait::async_trait]
//! impl HttpSend for AlwaysOk {
//!     async fn http_send(&self, _: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
//!         Ok(http::Response::new(Bytes::from_static(b"{}")))
//!     }
//! }
//!
//! let ctx = Context::new().with_http_send(AlwaysOk);
//! ```
//!
//! ## Utilities
//!
//! - [`time`]: Time helpers
//! - [`utils`]: General utilities including secret redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod time;
pub mod utils;

mod context;
pub use context::Context;
pub use context::Env;
pub use context::FileRead;
pub use context::FileWrite;
pub use context::HttpSend;
pub use context::NoopEnv;
pub use context::NoopFileRead;
pub use context::NoopFileWrite;
pub use context::NoopHttpSend;
pub use context::OsEnv;
pub use context::StaticEnv;

mod error;
pub use error::{Error, ErrorKind, Result};

mod api;
pub use api::{SignRequest, SigningCredential};
