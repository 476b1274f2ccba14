use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "doorstep")]
#[command(about = "Doorstep marketplace client")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API base URL (defaults to DOORSTEP_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Optional path to the local session file
    #[arg(long, global = true, value_name = "PATH")]
    pub storage_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account and start email verification
    Signup {
        /// Full name
        #[arg(long)]
        full_name: String,
        /// Email address
        #[arg(long)]
        email: String,
        /// Phone number
        #[arg(long)]
        phone: String,
        /// Role id from the server's role catalog
        #[arg(long)]
        role: String,
    },
    /// Sign in with an email or phone number
    Login {
        /// Email or phone number
        identifier: String,
        /// Password (omit for accounts mid-onboarding)
        #[arg(long)]
        password: Option<String>,
    },
    /// Verify the emailed 6-digit code
    Verify {
        /// The code; spaces and dashes are tolerated
        code: String,
    },
    /// Resend the verification code
    Resend,
    /// Choose a password to finish onboarding
    SetupPassword {
        /// New password
        #[arg(long)]
        password: String,
        /// Confirmation (defaults to the password)
        #[arg(long)]
        confirm: Option<String>,
    },
    /// Sign out and clear local state
    Logout,
    /// Show the signed-in profile
    Whoami,
    /// Show the unread message count
    Unread,
    /// Mark a message as read
    MarkRead {
        /// Message id
        message_id: String,
    },
    /// Add a property to favorites (prompts for sign-in when needed)
    Favorite {
        /// Property id
        property_id: String,
    },
    /// Remove a property from favorites
    Unfavorite {
        /// Property id
        property_id: String,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn login_parses_identifier_and_optional_password() {
        let cli = Cli::try_parse_from(["doorstep", "login", "jane@x.com"]).unwrap();
        let Commands::Login {
            identifier,
            password,
        } = cli.command
        else {
            panic!("expected login command");
        };
        assert_eq!(identifier, "jane@x.com");
        assert_eq!(password, None);

        let cli = Cli::try_parse_from([
            "doorstep",
            "--api-url",
            "https://api.doorstep.example",
            "login",
            "jane@x.com",
            "--password",
            "secret1",
        ])
        .unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("https://api.doorstep.example"));
        let Commands::Login { password, .. } = cli.command else {
            panic!("expected login command");
        };
        assert_eq!(password.as_deref(), Some("secret1"));
    }
}
