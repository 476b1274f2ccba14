//! Shared wiring for command handlers.

use std::path::PathBuf;

use doorstep_core::auth::{AuthClient, AuthFlow};
use doorstep_core::transport::ApiTransport;
use doorstep_core::{ApiError, ClientConfig, SessionStore};

use crate::error::CliError;
use crate::storage::FileStorage;

/// Everything a command needs: the flow machine plus the shared handles it
/// was built from.
pub struct AppContext {
    pub flow: AuthFlow<AuthClient, FileStorage>,
    pub transport: ApiTransport,
    pub session: SessionStore,
    pub auth: AuthClient,
    pub storage: FileStorage,
}

pub fn build_context(
    api_url: Option<&str>,
    storage_path: Option<PathBuf>,
) -> Result<AppContext, CliError> {
    let config = match api_url {
        Some(url) => ClientConfig::new(url)?,
        None => ClientConfig::from_env()?,
    };
    let transport = ApiTransport::new(&config)?;
    let auth = AuthClient::new(transport.clone());
    let session = SessionStore::new();
    let storage = match storage_path {
        Some(path) => FileStorage::at_path(path),
        None => FileStorage::open_default()?,
    };
    let flow = AuthFlow::new(auth.clone(), storage.clone(), session.clone());

    Ok(AppContext {
        flow,
        transport,
        session,
        auth,
        storage,
    })
}

/// Render an API error the way the web client does: field errors inline,
/// everything else as a single message.
pub fn render_api_error(error: &ApiError) -> String {
    match error {
        ApiError::Validation { field_errors } => {
            let mut lines = vec!["Please fix the following:".to_string()];
            let mut fields: Vec<_> = field_errors.iter().collect();
            fields.sort_by(|left, right| left.0.cmp(right.0));
            for (name, messages) in fields {
                for message in messages {
                    lines.push(format!("  {name}: {message}"));
                }
            }
            lines.join("\n")
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn validation_errors_render_per_field() {
        let mut field_errors = HashMap::new();
        field_errors.insert(
            "email".to_string(),
            vec!["Email already registered".to_string()],
        );
        let rendered = render_api_error(&ApiError::Validation { field_errors });
        assert!(rendered.contains("email: Email already registered"));
    }

    #[test]
    fn general_errors_render_their_message() {
        let rendered = render_api_error(&ApiError::general("Invalid OTP (422)"));
        assert_eq!(rendered, "Invalid OTP (422)");
    }
}
