//! Credential transport against the remote auth endpoints.
//!
//! Translates typed requests into HTTP calls and returns normalized
//! outcomes. The session credential is a cookie managed by the transport
//! layer; nothing here touches tokens.

use serde_json::json;

use crate::auth::model::{PendingIdentity, SignInOutcome, UserProfile};
use crate::error::{ApiError, ApiResult};
use crate::transport::{ApiTransport, RequestSpec};

/// Minimum password length checked locally to save a round trip. The
/// server's own policy remains authoritative.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Seam between the auth flows and the network.
///
/// The state machine and the deferred-action gate are generic over this
/// trait so they can be exercised against in-memory fakes.
#[allow(async_fn_in_trait)]
pub trait AuthApi {
    /// Create an account. Not safe to blindly retry (creates a resource).
    async fn sign_up(
        &self,
        full_name: &str,
        email: &str,
        phone_number: &str,
        role: &str,
    ) -> ApiResult<PendingIdentity>;

    /// `identifier` may be an email or a phone number.
    async fn sign_in(&self, identifier: &str, password: &str) -> ApiResult<SignInOutcome>;

    /// Validate an assembled 6-digit code against the server.
    async fn verify_otp(&self, email: &str, code: &str) -> ApiResult<()>;

    /// Rate-limited server-side; callers gate it behind the local cooldown.
    async fn resend_otp(&self, email: &str) -> ApiResult<()>;

    /// Choose a password, then sign in with it to establish the session.
    async fn setup_password(
        &self,
        email: &str,
        password: &str,
        confirmation: &str,
    ) -> ApiResult<UserProfile>;

    /// Fetch the profile of the currently signed-in user.
    async fn fetch_profile(&self) -> ApiResult<UserProfile>;

    /// Best-effort server-side logout; the local session is cleared
    /// regardless, so failures are logged and swallowed.
    async fn logout(&self);
}

/// HTTP implementation of [`AuthApi`] on top of the shared transport.
#[derive(Clone)]
pub struct AuthClient {
    transport: ApiTransport,
}

impl AuthClient {
    #[must_use]
    pub fn new(transport: ApiTransport) -> Self {
        Self { transport }
    }
}

impl AuthApi for AuthClient {
    async fn sign_up(
        &self,
        full_name: &str,
        email: &str,
        phone_number: &str,
        role: &str,
    ) -> ApiResult<PendingIdentity> {
        let full_name = full_name.trim();
        let email = email.trim();
        let phone_number = phone_number.trim();
        if full_name.is_empty() {
            return Err(ApiError::field("fullName", "Your name is required"));
        }
        if email.is_empty() {
            return Err(ApiError::field("email", "Email is required"));
        }
        if phone_number.is_empty() {
            return Err(ApiError::field("phoneNumber", "Phone number is required"));
        }

        let spec = RequestSpec::post(
            "/auth/signup",
            json!({
                "fullName": full_name,
                "email": email,
                "phoneNumber": phone_number,
                "role": role,
            }),
        );
        self.transport.execute(&spec).await?;
        Ok(PendingIdentity::new(email))
    }

    async fn sign_in(&self, identifier: &str, password: &str) -> ApiResult<SignInOutcome> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(ApiError::field("username", "Email or phone number is required"));
        }

        let spec = RequestSpec::post(
            "/auth/signin",
            json!({
                "username": identifier,
                "password": password,
            }),
        );
        let payload = self.transport.execute(&spec).await?;
        Ok(SignInOutcome::from_response(&payload, identifier))
    }

    async fn verify_otp(&self, email: &str, code: &str) -> ApiResult<()> {
        let spec = RequestSpec::post(
            "/auth/verify-otp",
            json!({
                "email": email,
                "otp": code,
            }),
        );
        self.transport.execute(&spec).await?;
        Ok(())
    }

    async fn resend_otp(&self, email: &str) -> ApiResult<()> {
        let spec = RequestSpec::post("/auth/resend-otp", json!({ "email": email }));
        self.transport.execute(&spec).await?;
        Ok(())
    }

    async fn setup_password(
        &self,
        email: &str,
        password: &str,
        confirmation: &str,
    ) -> ApiResult<UserProfile> {
        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(ApiError::field(
                "password",
                "Password must be at least 6 characters",
            ));
        }
        if password != confirmation {
            return Err(ApiError::field("confirmPassword", "Passwords do not match"));
        }

        let spec = RequestSpec::post(
            "/auth/setup-password",
            json!({
                "email": email,
                "password": password,
                "password_confirmation": confirmation,
            }),
        );
        self.transport.execute(&spec).await?;

        // The setup endpoint only acknowledges; the session is established
        // by signing in with the new password.
        match self.sign_in(email, password).await? {
            SignInOutcome::Authenticated { user } => Ok(user),
            SignInOutcome::Failed { message } => Err(ApiError::general(message)),
            _ => Err(ApiError::general(
                "Account still requires onboarding after password setup",
            )),
        }
    }

    async fn fetch_profile(&self) -> ApiResult<UserProfile> {
        let payload = self.transport.execute(&RequestSpec::get("/user")).await?;
        serde_json::from_value(payload)
            .map_err(|_| ApiError::general("Profile response was malformed"))
    }

    async fn logout(&self) {
        let spec = RequestSpec::post_empty("/auth/logout");
        if let Err(error) = self.transport.execute(&spec).await {
            tracing::warn!("server-side logout failed: {error}");
        }
    }
}

impl std::fmt::Debug for AuthClient {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.debug_struct("AuthClient").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ClientConfig;

    use super::*;

    fn offline_client() -> AuthClient {
        let config = ClientConfig::new("http://localhost:9").unwrap();
        AuthClient::new(ApiTransport::new(&config).unwrap())
    }

    #[tokio::test]
    async fn sign_up_rejects_blank_fields_before_any_request() {
        let client = offline_client();
        let error = client
            .sign_up("  ", "jane@x.com", "+2348000000000", "2")
            .await
            .unwrap_err();
        assert!(matches!(error, ApiError::Validation { .. }));
    }

    #[tokio::test]
    async fn sign_in_rejects_blank_identifier() {
        let client = offline_client();
        let error = client.sign_in("   ", "secret1").await.unwrap_err();
        assert!(matches!(error, ApiError::Validation { .. }));
    }

    #[tokio::test]
    async fn setup_password_prechecks_length_and_match() {
        let client = offline_client();

        let error = client
            .setup_password("jane@x.com", "short", "short")
            .await
            .unwrap_err();
        let ApiError::Validation { field_errors } = error else {
            panic!("expected validation error");
        };
        assert!(field_errors.contains_key("password"));

        let error = client
            .setup_password("jane@x.com", "secret1", "secret2")
            .await
            .unwrap_err();
        let ApiError::Validation { field_errors } = error else {
            panic!("expected validation error");
        };
        assert!(field_errors.contains_key("confirmPassword"));
    }
}
