//! Interactive sign-in prompt for gated actions.

use std::io::{self, Write};

use doorstep_core::auth::Credentials;
use doorstep_core::gate::LoginPrompt;
use doorstep_core::util::normalize_text_option;

/// Stdin-backed [`LoginPrompt`]. An empty identifier dismisses the prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

impl LoginPrompt for TerminalPrompt {
    async fn request_credentials(&self, last_error: Option<&str>) -> Option<Credentials> {
        if let Some(message) = last_error {
            eprintln!("Sign-in failed: {message}");
        }
        println!("Sign in to continue (leave blank to cancel).");

        let identifier = normalize_text_option(read_line("Email or phone: "))?;
        let password = read_line("Password: ").unwrap_or_default();
        Some(Credentials {
            identifier,
            password,
        })
    }
}

fn read_line(label: &str) -> Option<String> {
    print!("{label}");
    io::stdout().flush().ok()?;
    let mut buffer = String::new();
    io::stdin().read_line(&mut buffer).ok()?;
    Some(buffer.trim_end_matches(['\r', '\n']).to_string())
}
