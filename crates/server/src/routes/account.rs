//! Registration, login, and logout.
//!
//! - `POST /api/register` - create an account
//! - `POST /api/login` - verify credentials, mint a session or token
//! - `POST /api/logout` - revoke the caller's session or token

use axum::Json;
use axum::extract::State;
use axum::http::header::{HeaderValue, SET_COOKIE};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use feed::FeedMode;
use tracing::info;

use crate::auth::{AuthPolicy, SESSION_COOKIE, credential_id};
use crate::dto::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest};
use crate::error::{AppError, AppResult};
use crate::state::ServerState;

fn required<'a>(field: &'a Option<String>, name: &str) -> AppResult<&'a str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("{name} is required")))
}

/// Create an account: `POST /api/register`
pub async fn register(
    State(state): State<ServerState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<Json<MessageResponse>> {
    let username = required(&request.username, "username")?;
    let password = required(&request.password, "password")?;

    state.engine.register(username, password).await?;
    Ok(Json(MessageResponse {
        message: "Registration successful",
    }))
}

/// The legacy login body may ask for a feed mode. The deployment's feed
/// never changes, but the shape is still validated: real-time without an
/// API key and URL was always a 400.
fn validate_mode_fields(request: &LoginRequest) -> AppResult<()> {
    let Some(mode) = request.mode.as_deref() else {
        return Ok(());
    };

    let mode: FeedMode = mode
        .parse()
        .map_err(|e: String| AppError::BadRequest(e))?;

    if mode == FeedMode::RealTime && (request.api_key.is_none() || request.api_url.is_none()) {
        return Err(AppError::BadRequest(
            "real-time mode requires apiKey and apiUrl".to_string(),
        ));
    }
    Ok(())
}

/// Verify credentials and establish identity: `POST /api/login`
///
/// Under the Session policy the response carries a `Set-Cookie` header;
/// under Token the minted id travels in the JSON body instead. The None
/// policy verifies the password but has nothing to mint.
pub async fn login(
    State(state): State<ServerState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Response> {
    let username = required(&request.username, "username")?;
    let password = required(&request.password, "password")?;
    validate_mode_fields(&request)?;

    let account = state.engine.verify_login(username, password)?;
    info!(user = username, policy = %state.policy, "login verified");

    let mut token = None;
    let mut cookie = None;
    match state.policy {
        AuthPolicy::None => {}
        AuthPolicy::Token => token = Some(state.sessions.start(&account.username)),
        AuthPolicy::Session => {
            let id = state.sessions.start(&account.username);
            cookie = Some(format!("{SESSION_COOKIE}={id}; HttpOnly; Path=/"));
        }
    }

    let body = LoginResponse {
        message: "Login successful",
        balance: account.balance.to_float(),
        stocks: account.holdings,
        token,
    };

    let mut response = Json(body).into_response();
    if let Some(cookie) = cookie {
        let value = HeaderValue::from_str(&cookie)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        response.headers_mut().insert(SET_COOKIE, value);
    }
    Ok(response)
}

/// Revoke the caller's session or token: `POST /api/logout`
///
/// Always 200, even with nothing to revoke; logging out twice is fine.
pub async fn logout(State(state): State<ServerState>, headers: HeaderMap) -> AppResult<Response> {
    if let Some(id) = credential_id(state.policy, &headers) {
        state.sessions.revoke(&id);
    }

    let mut response = Json(MessageResponse {
        message: "Logout successful",
    })
    .into_response();

    if state.policy == AuthPolicy::Session {
        let cookie = format!("{SESSION_COOKIE}=; HttpOnly; Path=/; Max-Age=0");
        let value = HeaderValue::from_str(&cookie)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        response.headers_mut().insert(SET_COOKIE, value);
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login_request(mode: Option<&str>, key: Option<&str>, url: Option<&str>) -> LoginRequest {
        LoginRequest {
            username: Some("alice".to_string()),
            password: Some("hunter2".to_string()),
            mode: mode.map(String::from),
            api_key: key.map(String::from),
            api_url: url.map(String::from),
        }
    }

    #[test]
    fn test_mode_fields_optional() {
        assert!(validate_mode_fields(&login_request(None, None, None)).is_ok());
        assert!(validate_mode_fields(&login_request(Some("simulation"), None, None)).is_ok());
    }

    #[test]
    fn test_real_time_mode_requires_both_extras() {
        let request = login_request(Some("real-time"), Some("demo"), Some("https://example.com"));
        assert!(validate_mode_fields(&request).is_ok());

        for (key, url) in [(None, None), (Some("demo"), None), (None, Some("u"))] {
            let request = login_request(Some("real-time"), key, url);
            assert!(matches!(
                validate_mode_fields(&request),
                Err(AppError::BadRequest(_))
            ));
        }
    }

    #[test]
    fn test_unknown_mode_rejected() {
        assert!(matches!(
            validate_mode_fields(&login_request(Some("turbo"), None, None)),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_required_rejects_blank_fields() {
        assert!(required(&None, "username").is_err());
        assert!(required(&Some("   ".to_string()), "username").is_err());
        assert_eq!(required(&Some(" alice ".to_string()), "username").unwrap(), "alice");
    }
}
