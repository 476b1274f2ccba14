//! Single entry point for all outgoing API calls, with the silent
//! session-refresh interceptor layered on top.
//!
//! Every request is described by a [`RequestSpec`] so that it can be
//! replayed after a token refresh. The retry discipline is strict: an
//! authorization failure triggers at most one refresh and one replay per
//! logical call; the replay's failure is terminal.

use std::collections::HashMap;
use std::future::Future;

use reqwest::{Client, Method, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::util::compact_text;

/// A replayable description of one API request.
///
/// The session credential rides in the cookie store, not here, so replaying
/// the same spec after a refresh picks up the renewed credential for free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl RequestSpec {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            body: Some(body),
        }
    }

    pub fn post_empty(path: impl Into<String>) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            body: None,
        }
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self {
            method: Method::PATCH,
            path: path.into(),
            body: None,
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::DELETE,
            path: path.into(),
            body: None,
        }
    }
}

/// HTTP transport against the marketplace API.
///
/// Holds the cookie store that carries the session credential on every
/// request; callers never attach tokens manually.
#[derive(Clone)]
pub struct ApiTransport {
    base_url: String,
    refresh_path: String,
    client: Client,
}

impl ApiTransport {
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        Ok(Self {
            base_url: config.api_base_url.clone(),
            refresh_path: config.refresh_path.clone(),
            client: Client::builder().cookie_store(true).build()?,
        })
    }

    /// Execute a request through the refresh interceptor.
    ///
    /// On an authorization failure the session is refreshed silently and the
    /// spec replayed exactly once. If the refresh itself fails, the original
    /// authorization error propagates so the caller can route to sign-in.
    pub async fn execute(&self, spec: &RequestSpec) -> ApiResult<Value> {
        run_with_refresh(|| self.dispatch(spec), || self.refresh()).await
    }

    /// Exchange the refresh credential for a new access credential.
    ///
    /// Bypasses the interceptor: a 401 here means the refresh credential
    /// itself is gone and there is nothing left to retry with.
    async fn refresh(&self) -> ApiResult<()> {
        let spec = RequestSpec::post_empty(self.refresh_path.clone());
        self.dispatch(&spec).await?;
        Ok(())
    }

    async fn dispatch(&self, spec: &RequestSpec) -> ApiResult<Value> {
        let url = format!("{}{}", self.base_url, spec.path);
        let mut request = self.client.request(spec.method.clone(), url);
        if let Some(body) = &spec.body {
            request = request.json(body);
        }
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        decode_response(status, &body)
    }
}

/// Retry-once-after-refresh discipline, factored out of [`ApiTransport`] so
/// the loop-prevention contract is testable without a server.
pub(crate) async fn run_with_refresh<T, D, DFut, R, RFut>(dispatch: D, refresh: R) -> ApiResult<T>
where
    D: Fn() -> DFut,
    DFut: Future<Output = ApiResult<T>>,
    R: FnOnce() -> RFut,
    RFut: Future<Output = ApiResult<()>>,
{
    match dispatch().await {
        Err(error) if error.is_authorization() => match refresh().await {
            // Replayed exactly once; a second failure is returned as-is.
            Ok(()) => dispatch().await,
            Err(_) => Err(error),
        },
        outcome => outcome,
    }
}

/// Map a response to a JSON payload or a normalized [`ApiError`].
fn decode_response(status: StatusCode, body: &str) -> ApiResult<Value> {
    if status.is_success() {
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        return serde_json::from_str(body)
            .map_err(|_| ApiError::general("Server returned a malformed response"));
    }
    Err(classify_error(status, body))
}

fn classify_error(status: StatusCode, body: &str) -> ApiError {
    match status {
        StatusCode::UNAUTHORIZED => ApiError::Authorization,
        StatusCode::UNPROCESSABLE_ENTITY => {
            if let Some(field_errors) = parse_field_errors(body) {
                ApiError::Validation { field_errors }
            } else {
                ApiError::general(parse_api_error(status, body))
            }
        }
        StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited {
            message: parse_api_error(status, body),
        },
        _ => ApiError::general(parse_api_error(status, body)),
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    error: Option<String>,
    #[serde(rename = "fieldErrors")]
    field_errors: Option<HashMap<String, Vec<String>>>,
    errors: Option<HashMap<String, Vec<String>>>,
}

fn parse_field_errors(body: &str) -> Option<HashMap<String, Vec<String>>> {
    let payload = serde_json::from_str::<ApiErrorBody>(body).ok()?;
    payload
        .field_errors
        .or(payload.errors)
        .filter(|errors| !errors.is_empty())
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.error) {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", compact_text(trimmed), status.as_u16())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn decode_success_with_empty_body_yields_null() {
        assert_eq!(decode_response(StatusCode::OK, "  ").unwrap(), Value::Null);
    }

    #[test]
    fn decode_success_parses_json_payload() {
        let value = decode_response(StatusCode::OK, r#"{"unreadCount":3}"#).unwrap();
        assert_eq!(value["unreadCount"], 3);
    }

    #[test]
    fn unauthorized_maps_to_authorization_error() {
        let error = decode_response(StatusCode::UNAUTHORIZED, "").unwrap_err();
        assert!(error.is_authorization());
    }

    #[test]
    fn unprocessable_with_field_errors_maps_to_validation() {
        let body = r#"{"fieldErrors":{"email":["Email already registered"]}}"#;
        let error = decode_response(StatusCode::UNPROCESSABLE_ENTITY, body).unwrap_err();
        let ApiError::Validation { field_errors } = error else {
            panic!("expected validation error, got {error:?}");
        };
        assert_eq!(
            field_errors.get("email"),
            Some(&vec!["Email already registered".to_string()])
        );
    }

    #[test]
    fn unprocessable_without_field_map_falls_back_to_general() {
        let body = r#"{"message":"Invalid OTP"}"#;
        let error = decode_response(StatusCode::UNPROCESSABLE_ENTITY, body).unwrap_err();
        let ApiError::General { message } = error else {
            panic!("expected general error, got {error:?}");
        };
        assert_eq!(message, "Invalid OTP (422)");
    }

    #[test]
    fn too_many_requests_maps_to_rate_limited() {
        let body = r#"{"message":"Try again later"}"#;
        let error = decode_response(StatusCode::TOO_MANY_REQUESTS, body).unwrap_err();
        assert!(matches!(error, ApiError::RateLimited { .. }));
    }

    #[test]
    fn unparseable_error_body_is_compacted() {
        let error = decode_response(StatusCode::INTERNAL_SERVER_ERROR, "boom").unwrap_err();
        let ApiError::General { message } = error else {
            panic!("expected general error, got {error:?}");
        };
        assert_eq!(message, "boom (500)");
    }

    #[tokio::test]
    async fn refresh_is_skipped_for_successful_calls() {
        let refreshes = Cell::new(0u32);
        let outcome: ApiResult<u32> = run_with_refresh(
            || async { Ok(7) },
            || async {
                refreshes.set(refreshes.get() + 1);
                Ok(())
            },
        )
        .await;
        assert_eq!(outcome.unwrap(), 7);
        assert_eq!(refreshes.get(), 0);
    }

    #[tokio::test]
    async fn refresh_is_skipped_for_non_authorization_errors() {
        let refreshes = Cell::new(0u32);
        let outcome: ApiResult<u32> = run_with_refresh(
            || async { Err(ApiError::general("boom")) },
            || async {
                refreshes.set(refreshes.get() + 1);
                Ok(())
            },
        )
        .await;
        assert!(matches!(outcome, Err(ApiError::General { .. })));
        assert_eq!(refreshes.get(), 0);
    }

    #[tokio::test]
    async fn authorization_error_triggers_one_refresh_and_replay() {
        let dispatches = Cell::new(0u32);
        let refreshes = Cell::new(0u32);
        let outcome = run_with_refresh(
            || {
                dispatches.set(dispatches.get() + 1);
                let attempt = dispatches.get();
                async move {
                    if attempt == 1 {
                        Err(ApiError::Authorization)
                    } else {
                        Ok("fresh")
                    }
                }
            },
            || {
                refreshes.set(refreshes.get() + 1);
                async { Ok(()) }
            },
        )
        .await;
        assert_eq!(outcome.unwrap(), "fresh");
        assert_eq!(dispatches.get(), 2);
        assert_eq!(refreshes.get(), 1);
    }

    #[tokio::test]
    async fn replay_failure_is_terminal_without_second_refresh() {
        let dispatches = Cell::new(0u32);
        let refreshes = Cell::new(0u32);
        let outcome: ApiResult<u32> = run_with_refresh(
            || {
                dispatches.set(dispatches.get() + 1);
                async { Err(ApiError::Authorization) }
            },
            || {
                refreshes.set(refreshes.get() + 1);
                async { Ok(()) }
            },
        )
        .await;
        assert!(outcome.unwrap_err().is_authorization());
        assert_eq!(dispatches.get(), 2);
        assert_eq!(refreshes.get(), 1);
    }

    #[tokio::test]
    async fn failed_refresh_propagates_original_error() {
        let dispatches = Cell::new(0u32);
        let outcome: ApiResult<u32> = run_with_refresh(
            || {
                dispatches.set(dispatches.get() + 1);
                async { Err(ApiError::Authorization) }
            },
            || async { Err(ApiError::Authorization) },
        )
        .await;
        assert!(outcome.unwrap_err().is_authorization());
        assert_eq!(dispatches.get(), 1);
    }
}
