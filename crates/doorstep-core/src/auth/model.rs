//! Auth domain types and sign-in response normalization.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Account role as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "AGENT")]
    Agent,
    #[serde(rename = "OWNER")]
    Owner,
    #[serde(rename = "USER")]
    User,
    #[serde(other)]
    #[default]
    Unknown,
}

/// Immutable profile snapshot.
///
/// Replaced wholesale on every successful auth call; the client never
/// patches it field by field. The sign-in payload omits `id`, so it is
/// optional until the next profile fetch fills it in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub role: Role,
}

impl UserProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// An email captured mid-onboarding, persisted so a multi-step flow can
/// resume after a full reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingIdentity {
    pub email: String,
}

impl PendingIdentity {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
        }
    }
}

/// Identifier (email or phone number) plus password for a sign-in attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub identifier: String,
    pub password: String,
}

/// Tagged outcome of a sign-in call.
///
/// The server's response flags are the only source of truth for which
/// screen comes next; the client never infers verification status locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInOutcome {
    /// The account exists but its email is unverified.
    RequiresEmailVerification { email: String },
    /// Email verified but no password chosen yet.
    RequiresPasswordSetup { email: String },
    /// Legacy account: the identifier resolved, now ask for the password.
    RequiresPassword { identifier: String },
    /// Fully signed in; the session cookie is already set.
    Authenticated { user: UserProfile },
    /// Rejected with a user-facing message.
    Failed { message: String },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    #[serde(default)]
    requires_email_verification: bool,
    #[serde(default)]
    requires_password_setup: bool,
    #[serde(default)]
    requires_password: bool,
    #[serde(default)]
    status: Option<Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

fn is_success_flag(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::String(text) => text.eq_ignore_ascii_case("success"),
        _ => false,
    }
}

impl SignInOutcome {
    /// Normalize a raw sign-in response.
    ///
    /// `identifier` is the value the user typed; it backs the legacy
    /// password branch (the server echoes no email there) and is the
    /// fallback when a follow-up flag arrives without one.
    #[must_use]
    pub fn from_response(payload: &Value, identifier: &str) -> Self {
        let Ok(response) = serde_json::from_value::<SignInResponse>(payload.clone()) else {
            return Self::Failed {
                message: "Sign-in response was malformed".to_string(),
            };
        };

        let flagged_email = |response: &SignInResponse| {
            response
                .email
                .clone()
                .unwrap_or_else(|| identifier.to_string())
        };

        if response.requires_email_verification {
            return Self::RequiresEmailVerification {
                email: flagged_email(&response),
            };
        }
        if response.requires_password_setup {
            return Self::RequiresPasswordSetup {
                email: flagged_email(&response),
            };
        }
        if response.requires_password {
            return Self::RequiresPassword {
                identifier: identifier.to_string(),
            };
        }
        if response.status.as_ref().is_some_and(is_success_flag) {
            if let Ok(user) = serde_json::from_value::<UserProfile>(payload.clone()) {
                return Self::Authenticated { user };
            }
            return Self::Failed {
                message: "Sign-in response was malformed".to_string(),
            };
        }

        Self::Failed {
            message: response
                .message
                .unwrap_or_else(|| "Login failed".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn verification_flag_wins_and_uses_server_email() {
        // The server is authoritative on which email needs verifying.
        let payload = json!({
            "requiresEmailVerification": true,
            "email": "canonical@x.com"
        });
        let outcome = SignInOutcome::from_response(&payload, "typed@x.com");
        assert_eq!(
            outcome,
            SignInOutcome::RequiresEmailVerification {
                email: "canonical@x.com".to_string()
            }
        );
    }

    #[test]
    fn password_setup_flag_maps_to_setup_branch() {
        let payload = json!({ "requiresPasswordSetup": true, "email": "jane@x.com" });
        let outcome = SignInOutcome::from_response(&payload, "jane@x.com");
        assert_eq!(
            outcome,
            SignInOutcome::RequiresPasswordSetup {
                email: "jane@x.com".to_string()
            }
        );
    }

    #[test]
    fn legacy_branch_keeps_the_entered_identifier() {
        let payload = json!({ "requiresPassword": true });
        let outcome = SignInOutcome::from_response(&payload, "jane@x.com");
        assert_eq!(
            outcome,
            SignInOutcome::RequiresPassword {
                identifier: "jane@x.com".to_string()
            }
        );
    }

    #[test]
    fn successful_status_parses_the_profile() {
        let payload = json!({
            "status": true,
            "firstName": "Jane",
            "lastName": "Doe",
            "email": "jane@x.com",
            "phoneNumber": "+2348000000000",
            "role": "AGENT"
        });
        let SignInOutcome::Authenticated { user } =
            SignInOutcome::from_response(&payload, "jane@x.com")
        else {
            panic!("expected authenticated outcome");
        };
        assert_eq!(user.full_name(), "Jane Doe");
        assert_eq!(user.role, Role::Agent);
        assert_eq!(user.id, None);
    }

    #[test]
    fn string_status_success_is_accepted() {
        let payload = json!({ "status": "success", "email": "jane@x.com" });
        assert!(matches!(
            SignInOutcome::from_response(&payload, "jane@x.com"),
            SignInOutcome::Authenticated { .. }
        ));
    }

    #[test]
    fn anything_else_fails_with_server_message() {
        let payload = json!({ "message": "Invalid credentials" });
        assert_eq!(
            SignInOutcome::from_response(&payload, "jane@x.com"),
            SignInOutcome::Failed {
                message: "Invalid credentials".to_string()
            }
        );
        assert_eq!(
            SignInOutcome::from_response(&json!({}), "jane@x.com"),
            SignInOutcome::Failed {
                message: "Login failed".to_string()
            }
        );
    }

    #[test]
    fn unknown_role_falls_back_without_failing() {
        let payload = json!({ "status": true, "role": "LANDLORD", "email": "x@y.z" });
        let SignInOutcome::Authenticated { user } = SignInOutcome::from_response(&payload, "x@y.z")
        else {
            panic!("expected authenticated outcome");
        };
        assert_eq!(user.role, Role::Unknown);
    }
}
