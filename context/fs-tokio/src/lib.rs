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

//! Tokio-based file access for ecobee-auth.
//!
//! This crate provides `TokioFs`, which implements both `FileRead` and
//! `FileWrite` from `ecobee_auth_core` using Tokio's file system operations.
//! The token manager uses it to load and persist its credential cache.
//!
//! ## Example
//!
//! ```no_run
//! use ecobee_auth_core::{Context, OsEnv};
//! use ecobee_auth_fs_tokio::TokioFs;
//!
//! #[tokio::main]
//! async fn main() {
//!     let ctx = Context::new()
//!         .with_file_read(TokioFs)
//!         .with_file_write(TokioFs)
//!         .with_env(OsEnv);
//!
//!     match ctx.file_read("/tmp/ecobee-cache.json").await {
//!         Ok(content) => println!("Read {} bytes", content.len()),
//!         Err(e) => eprintln!("Failed to read file: {}", e),
//!     }
//! }
//! ```

use async_trait::async_trait;
use ecobee_auth_core::{Error, FileRead, FileWrite, Result};
use log::debug;
use std::io;
use tokio::io::AsyncWriteExt;

/// Tokio-based implementation of the `FileRead` and `FileWrite` traits.
///
/// A missing file is reported as `ErrorKind::NotFound`; every other I/O
/// failure as `ErrorKind::CacheIo`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFs;

#[async_trait]
impl FileRead for TokioFs {
    async fn file_read(&self, path: &str) -> Result<Vec<u8>> {
        tokio::fs::read(path).await.map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => {
                Error::not_found(format!("file {path} does not exist")).with_source(e)
            }
            _ => Error::cache_io(format!("failed to read file {path}")).with_source(e),
        })
    }
}

#[async_trait]
impl FileWrite for TokioFs {
    async fn file_write(&self, path: &str, content: &[u8]) -> Result<()> {
        let mut opts = tokio::fs::OpenOptions::new();
        opts.create(true).write(true).truncate(true);
        #[cfg(unix)]
        opts.mode(0o660);

        let mut f = opts
            .open(path)
            .await
            .map_err(|e| Error::cache_io(format!("failed to open file {path}")).with_source(e))?;
        f.write_all(content)
            .await
            .map_err(|e| Error::cache_io(format!("failed to write file {path}")).with_source(e))?;
        f.flush()
            .await
            .map_err(|e| Error::cache_io(format!("failed to flush file {path}")).with_source(e))?;

        debug!("wrote {} bytes to {path}", content.len());
        Ok(())
    }
}
