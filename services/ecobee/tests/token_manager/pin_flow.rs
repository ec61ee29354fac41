use ecobee_auth::{Config, TokenManager};
use ecobee_auth_core::{ErrorKind, Result};
use http::{Method, StatusCode};
use pretty_assertions::assert_eq;

use super::*;

#[tokio::test]
async fn test_get_pin() -> Result<()> {
    let dir = tempfile::tempdir().unwrap();
    let mock = MockHttpSend::ok(PIN_BODY);
    let config = Config::new(CLIENT_ID).with_cache_path(cache_path(&dir));
    let manager = TokenManager::new(test_context(mock.clone()), config).await?;

    let pin = manager.get_pin().await?;

    assert_eq!(pin.pin, "bv29");
    assert_eq!(pin.code, "uWIiWsbQaG9sqGHNT0eN3JuS7DnuVqbm");
    assert_eq!(pin.poll_interval(), Duration::from_secs(30));

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::GET);
    assert_eq!(
        requests[0].uri,
        "https://api.ecobee.com/authorize?response_type=ecobeePin&client_id=app-key&scope=smartRead%2CsmartWrite"
    );
    assert_eq!(requests[0].body, "");

    // Issuing a pin leaves the manager untouched.
    let err = manager.token().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotAuthorized);
    assert!(!dir.path().join("cache.json").exists());
    Ok(())
}

#[tokio::test]
async fn test_get_pin_with_custom_scopes_and_endpoint() -> Result<()> {
    let mock = MockHttpSend::ok(PIN_BODY);
    let config = Config::new(CLIENT_ID)
        .with_endpoint("http://127.0.0.1:8080/")
        .with_scopes(["smartRead"]);
    let manager = TokenManager::new(test_context(mock.clone()), config).await?;

    manager.get_pin().await?;

    assert_eq!(
        mock.requests()[0].uri,
        "http://127.0.0.1:8080/authorize?response_type=ecobeePin&client_id=app-key&scope=smartRead"
    );
    Ok(())
}

#[tokio::test]
async fn test_get_pin_failures() -> Result<()> {
    let cases = [
        (
            MockHttpSend::with_status(StatusCode::UNAUTHORIZED, r#"{"error":"invalid_client"}"#),
            ErrorKind::UnexpectedStatus,
        ),
        (MockHttpSend::ok(r#"{"ecobeePin": 42}"#), ErrorKind::Decode),
        (MockHttpSend::unreachable(), ErrorKind::Transport),
    ];

    for (mock, expected) in cases {
        let manager = TokenManager::new(test_context(mock), Config::new(CLIENT_ID)).await?;
        let err = manager.get_pin().await.unwrap_err();
        assert_eq!(err.kind(), expected, "{err}");
    }
    Ok(())
}

#[tokio::test]
async fn test_get_pin_with_invalid_endpoint() -> Result<()> {
    let mock = MockHttpSend::ok(PIN_BODY);
    let config = Config::new(CLIENT_ID).with_endpoint("not a url");
    let manager = TokenManager::new(test_context(mock.clone()), config).await?;

    let err = manager.get_pin().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    assert_eq!(mock.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_get_token_before_approval() -> Result<()> {
    let mock = MockHttpSend::with_status(StatusCode::UNAUTHORIZED, PENDING_BODY);
    let manager = TokenManager::new(test_context(mock.clone()), Config::new(CLIENT_ID)).await?;

    let err = manager
        .get_token("uWIiWsbQaG9sqGHNT0eN3JuS7DnuVqbm")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UnexpectedStatus);
    assert!(err.message().contains("authorization_pending"), "{err}");
    assert_eq!(
        mock.requests()[0].body,
        "grant_type=ecobeePin&client_id=app-key&code=uWIiWsbQaG9sqGHNT0eN3JuS7DnuVqbm"
    );
    Ok(())
}

#[tokio::test]
async fn test_get_token_then_save() -> Result<()> {
    let dir = tempfile::tempdir().unwrap();
    let mock = MockHttpSend::ok(TOKEN_BODY);
    let config = Config::new(CLIENT_ID).with_cache_path(cache_path(&dir));
    let manager = TokenManager::new(test_context(mock.clone()), config.clone()).await?;

    let cred = manager.get_token("uWIiWsbQaG9sqGHNT0eN3JuS7DnuVqbm").await?;
    assert_eq!(cred.refresh_token, "og2Obost3ucRo1ofo0EDoslGltmFMe2g");

    // Not active until saved.
    let err = manager.token().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotAuthorized);
    assert!(!dir.path().join("cache.json").exists());

    manager.save_token(cred.clone()).await?;
    assert_eq!(manager.token().await?, cred);

    let restarted = TokenManager::new(test_context(mock.clone()), config).await?;
    assert_eq!(restarted.token().await?, cred);
    assert_eq!(mock.calls(), 1);
    Ok(())
}
