//! Authorize an application with an ecobee pin and cache the credential.
//!
//! ```shell
//! ECOBEE_API_KEY=... ECOBEE_CACHE_FILE=~/.ecobee/token.json \
//!     cargo run -p ecobee-auth --example pin_login
//! ```

use std::time::{Duration, Instant};

use ecobee_auth::{Config, TokenManager};
use ecobee_auth_core::{Context, ErrorKind, OsEnv, Result};
use ecobee_auth_fs_tokio::TokioFs;
use ecobee_auth_http_send_reqwest::ReqwestHttpSend;
use log::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::from_filename(".env").ok();
    env_logger::init();

    let ctx = Context::new()
        .with_file_read(TokioFs)
        .with_file_write(TokioFs)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let config = Config::default().from_env(&ctx);
    let manager = TokenManager::new(ctx, config).await?;

    if let Ok(cred) = manager.token().await {
        info!("already authorized, token valid until {}", cred.expiry);
        return Ok(());
    }

    let pin = manager.get_pin().await?;
    println!(
        "Enter pin {} under \"My Apps\" in the ecobee portal within {} minutes.",
        pin.pin, pin.expires_in_minutes
    );

    let deadline = Instant::now() + pin.expires_in();
    while Instant::now() < deadline {
        tokio::time::sleep(pin.poll_interval().max(Duration::from_secs(1))).await;

        match manager.get_token(&pin.code).await {
            Ok(cred) => {
                manager.save_token(cred).await?;
                println!("Authorized.");
                return Ok(());
            }
            Err(err) if err.kind() == ErrorKind::UnexpectedStatus => {
                warn!("pin not approved yet: {err}");
            }
            Err(err) => return Err(err),
        }
    }

    Err(ecobee_auth_core::Error::not_authorized(format!(
        "pin {} expired before it was approved",
        pin.pin
    )))
}
