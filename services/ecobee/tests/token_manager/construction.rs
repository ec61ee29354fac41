use chrono::TimeDelta;
use ecobee_auth::{Config, TokenManager};
use ecobee_auth_core::time::now;
use ecobee_auth_core::{Context, ErrorKind, Result, StaticEnv};
use ecobee_auth_fs_tokio::TokioFs;
use pretty_assertions::assert_eq;
use std::collections::HashMap;

use super::*;

#[tokio::test]
async fn test_new_without_cache_path() -> Result<()> {
    let mock = MockHttpSend::ok(TOKEN_BODY);
    let manager = TokenManager::new(test_context(mock.clone()), Config::new(CLIENT_ID)).await?;

    let err = manager.token().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotAuthorized);
    assert_eq!(mock.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_empty_cache_path_disables_cache() -> Result<()> {
    // No file access is configured at all, so any cache I/O would fail.
    let ctx = Context::new().with_http_send(MockHttpSend::ok(TOKEN_BODY));
    let manager = TokenManager::new(ctx, Config::new(CLIENT_ID).with_cache_path("")).await?;

    let cred = test_credential("refresh", now() + TimeDelta::hours(1));
    manager.save_token(cred.clone()).await?;
    assert_eq!(manager.token().await?, cred);
    Ok(())
}

#[tokio::test]
async fn test_new_with_missing_cache_file() -> Result<()> {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::new(CLIENT_ID).with_cache_path(cache_path(&dir));

    let manager = TokenManager::new(test_context(MockHttpSend::ok(TOKEN_BODY)), config).await?;

    let err = manager.token().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotAuthorized);
    assert!(!dir.path().join("cache.json").exists());
    Ok(())
}

#[tokio::test]
async fn test_new_with_invalid_cache_file() -> Result<()> {
    let dir = tempfile::tempdir().unwrap();
    let path = cache_path(&dir);

    for content in [
        "",
        "{not json",
        r#"{"access_token":"abc","refresh_token":"def"}"#,
    ] {
        std::fs::write(&path, content).unwrap();

        let config = Config::new(CLIENT_ID).with_cache_path(&path);
        let manager =
            TokenManager::new(test_context(MockHttpSend::ok(TOKEN_BODY)), config).await?;

        let err = manager.token().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotAuthorized, "{content}");
    }
    Ok(())
}

#[tokio::test]
async fn test_new_with_unreadable_cache_file() {
    let dir = tempfile::tempdir().unwrap();
    // A directory exists at the path but can't be read as a file.
    let config = Config::new(CLIENT_ID).with_cache_path(dir.path().to_string_lossy());

    let err = TokenManager::new(test_context(MockHttpSend::ok(TOKEN_BODY)), config)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CacheIo);
}

#[tokio::test]
async fn test_new_rejects_empty_client_id() {
    let err = TokenManager::new(test_context(MockHttpSend::ok(TOKEN_BODY)), Config::new(""))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
}

#[tokio::test]
async fn test_new_from_env_expands_home_dir() -> Result<()> {
    init_logger();
    let home = tempfile::tempdir().unwrap();

    let ctx = Context::new()
        .with_file_read(TokioFs)
        .with_file_write(TokioFs)
        .with_http_send(MockHttpSend::ok(TOKEN_BODY))
        .with_env(StaticEnv {
            home_dir: Some(home.path().to_path_buf()),
            envs: HashMap::from_iter([
                ("ECOBEE_API_KEY".to_string(), CLIENT_ID.to_string()),
                (
                    "ECOBEE_CACHE_FILE".to_string(),
                    "~/ecobee-cache.json".to_string(),
                ),
            ]),
        });
    let config = Config::default().from_env(&ctx);

    let manager = TokenManager::new(ctx, config).await?;
    manager
        .save_token(test_credential("refresh", now() + TimeDelta::hours(1)))
        .await?;

    assert!(home.path().join("ecobee-cache.json").exists());
    Ok(())
}

#[tokio::test]
async fn test_cache_round_trip() -> Result<()> {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::new(CLIENT_ID).with_cache_path(cache_path(&dir));
    let cred = test_credential("refresh", now() + TimeDelta::hours(1));

    let manager = TokenManager::new(test_context(MockHttpSend::ok(TOKEN_BODY)), config.clone())
        .await?;
    manager.save_token(cred.clone()).await?;

    let mock = MockHttpSend::ok(TOKEN_BODY);
    let restarted = TokenManager::new(test_context(mock.clone()), config).await?;
    assert_eq!(restarted.token().await?, cred);
    assert_eq!(mock.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_save_token_updates_memory_when_cache_write_fails() -> Result<()> {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("cache.json");
    let config = Config::new(CLIENT_ID).with_cache_path(path.to_string_lossy());
    let cred = test_credential("refresh", now() + TimeDelta::hours(1));

    let manager = TokenManager::new(test_context(MockHttpSend::ok(TOKEN_BODY)), config).await?;

    let err = manager.save_token(cred.clone()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CacheIo);
    assert_eq!(manager.token().await?, cred);
    Ok(())
}
