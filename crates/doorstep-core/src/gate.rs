//! Deferred-action gate for auth-required operations.
//!
//! Lets any part of the UI run an action optimistically, without checking
//! auth state first. When the server answers with an authorization denial
//! the action is captured, the user is prompted to sign in inline, and the
//! action is resumed exactly once after a successful login. The capture is
//! consumed by value, so the single-use contract is enforced by the type
//! system rather than by convention.

use std::future::Future;

use crate::auth::client::AuthApi;
use crate::auth::model::{Credentials, SignInOutcome};
use crate::error::{ApiError, ApiResult};
use crate::session::SessionStore;

/// A suspended action plus the authorization error that triggered the
/// deferral. Lives only for the duration of the login prompt; it is
/// dropped whether the prompt completes or is dismissed.
pub struct DeferredAction<F> {
    action: F,
    cause: ApiError,
}

impl<F> DeferredAction<F> {
    const fn new(action: F, cause: ApiError) -> Self {
        Self { action, cause }
    }

    /// The authorization error that suspended the action.
    #[must_use]
    pub const fn cause(&self) -> &ApiError {
        &self.cause
    }

    /// Re-invoke the captured action, consuming the deferral.
    async fn resume<T, Fut>(self) -> ApiResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = ApiResult<T>>,
    {
        (self.action)().await
    }
}

/// Inline sign-in prompt shown when a gated action is denied.
///
/// `last_error` carries the previous attempt's failure message so the
/// prompt can display it; returning `None` means the user dismissed the
/// prompt.
#[allow(async_fn_in_trait)]
pub trait LoginPrompt {
    async fn request_credentials(&self, last_error: Option<&str>) -> Option<Credentials>;
}

/// Wraps gated actions with the capture/prompt/resume cycle.
pub struct ActionGate<A, P> {
    auth: A,
    prompt: P,
    session: SessionStore,
}

impl<A: AuthApi, P: LoginPrompt> ActionGate<A, P> {
    pub const fn new(auth: A, prompt: P, session: SessionStore) -> Self {
        Self {
            auth,
            prompt,
            session,
        }
    }

    /// Run an action that may require authentication.
    ///
    /// The action is invoked immediately. Non-authorization errors
    /// propagate untouched. On an authorization denial the action is
    /// suspended behind the login prompt: a successful inline sign-in
    /// resumes it exactly once and its outcome becomes the original
    /// result; dismissal rejects with [`ApiError::Cancelled`] and the
    /// action is never retried.
    pub async fn guard<T, F, Fut>(&self, action: F) -> ApiResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = ApiResult<T>>,
    {
        match action().await {
            Err(error) if error.is_authorization() => {
                let deferred = DeferredAction::new(action, error);
                self.sign_in_and_resume(deferred).await
            }
            outcome => outcome,
        }
    }

    async fn sign_in_and_resume<T, F, Fut>(&self, deferred: DeferredAction<F>) -> ApiResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = ApiResult<T>>,
    {
        tracing::debug!("action deferred pending sign-in: {}", deferred.cause());
        let mut last_error: Option<String> = None;
        loop {
            let Some(credentials) = self.prompt.request_credentials(last_error.as_deref()).await
            else {
                return Err(ApiError::Cancelled);
            };

            match self
                .auth
                .sign_in(&credentials.identifier, &credentials.password)
                .await
            {
                Ok(SignInOutcome::Authenticated { user }) => {
                    self.session.set_authenticated(user);
                    return deferred.resume().await;
                }
                Ok(SignInOutcome::Failed { message }) => last_error = Some(message),
                // A modal cannot host the onboarding flow; treat follow-up
                // steps as a failed attempt and let the user bail out.
                Ok(_) => {
                    last_error =
                        Some("This account must finish onboarding before signing in".to_string());
                }
                Err(error) => last_error = Some(error.to_string()),
            }
        }
    }
}
