//! Ecobee PIN authorization with a cached, self-refreshing credential.
//!
//! [`TokenManager`] implements ecobee's "PIN" variant of the OAuth2 device
//! flow, persists the resulting [`Credential`] to an optional cache file and
//! refreshes it just in time whenever [`TokenManager::token`] is called.
//!
//! ```no_run
//! use ecobee_auth::{Config, TokenManager};
//! use ecobee_auth_core::{Context, Result};
//!
//! # async fn example(ctx: Context) -> Result<()> {
//! let config = Config::new("my-app-key").with_cache_path("~/.ecobee/token.json");
//! let manager = TokenManager::new(ctx, config).await?;
//!
//! let pin = manager.get_pin().await?;
//! println!("enter {} in the ecobee portal", pin.pin);
//!
//! // Once the pin has been approved:
//! let credential = manager.get_token(&pin.code).await?;
//! manager.save_token(credential).await?;
//!
//! // From now on the credential refreshes itself.
//! let _credential = manager.token().await?;
//! # Ok(())
//! # }
//! ```

mod constants;

mod config;
pub use config::{Config, ExpiresInUnit};

mod credential;
pub use credential::{Credential, PinChallenge};

mod token_response;
mod protocol;

mod manager;
pub use manager::TokenManager;

mod sign_request;
pub use sign_request::RequestSigner;
