//! Auth command handlers: signup, login, verify, resend, setup-password,
//! logout, whoami.

use doorstep_core::auth::{AuthStage, OtpInput, ResendCooldown, SignInOutcome};
use doorstep_core::{ApiError, AuthStatus};

use crate::commands::common::AppContext;
use crate::error::CliError;

pub async fn run_signup(
    context: &mut AppContext,
    full_name: &str,
    email: &str,
    phone: &str,
    role: &str,
) -> Result<(), CliError> {
    let identity = context.flow.sign_up(full_name, email, phone, role).await?;
    println!(
        "Account created. A 6-digit code was sent to {}.",
        identity.email
    );
    println!("Run `doorstep verify <code>` to continue.");
    Ok(())
}

pub async fn run_login(
    context: &mut AppContext,
    identifier: &str,
    password: &str,
) -> Result<(), CliError> {
    let outcome = context.flow.sign_in(identifier, password).await?;
    report_sign_in(&outcome)
}

/// Print the next step for each sign-in branch. A rejected attempt is an
/// error so the process exits nonzero.
fn report_sign_in(outcome: &SignInOutcome) -> Result<(), CliError> {
    match outcome {
        SignInOutcome::RequiresEmailVerification { email } => {
            println!("Email {email} still needs verification.");
            println!("A code was sent; run `doorstep verify <code>`.");
            Ok(())
        }
        SignInOutcome::RequiresPasswordSetup { email } => {
            println!("Email {email} is verified but has no password yet.");
            println!("Run `doorstep setup-password --password <pw>`.");
            Ok(())
        }
        SignInOutcome::RequiresPassword { identifier } => {
            println!("Account {identifier} found.");
            println!("Run `doorstep login {identifier} --password <pw>` to sign in.");
            Ok(())
        }
        SignInOutcome::Authenticated { user } => {
            println!("Signed in as {} <{}>.", user.full_name(), user.email);
            Ok(())
        }
        SignInOutcome::Failed { message } => Err(ApiError::general(message.clone()).into()),
    }
}

pub async fn run_verify(context: &mut AppContext, raw_code: &str) -> Result<(), CliError> {
    if context
        .flow
        .resume_pending(AuthStage::PendingVerification)?
        .is_none()
    {
        println!("No verification in progress. Start with `doorstep signup` or `doorstep login`.");
        return Ok(());
    }

    let Some(code) = assemble_code(raw_code) else {
        eprintln!("Please enter the complete 6-digit code.");
        return Ok(());
    };

    context.flow.verify_otp(&code).await?;
    println!("Email verified.");
    println!("Run `doorstep setup-password --password <pw>` to finish.");
    Ok(())
}

pub async fn run_resend(context: &mut AppContext) -> Result<(), CliError> {
    if context
        .flow
        .resume_pending(AuthStage::PendingVerification)?
        .is_none()
    {
        println!("No verification in progress.");
        return Ok(());
    }

    let now = chrono::Utc::now().timestamp();
    let cooldown = resend_cooldown(context.storage.last_resend_at()?, now);
    if !cooldown.is_ready() {
        println!(
            "Please wait {} more seconds before requesting another code.",
            cooldown.remaining()
        );
        return Ok(());
    }

    context.flow.resend_otp().await?;
    context
        .storage
        .record_resend_at(chrono::Utc::now().timestamp())?;
    println!("Code resent. It may take a minute to arrive.");
    Ok(())
}

/// Local cooldown state derived from the persisted last-resend timestamp.
fn resend_cooldown(last_resend_at: Option<i64>, now: i64) -> ResendCooldown {
    match last_resend_at {
        Some(then) if then <= now => {
            let elapsed = u64::try_from(now - then).unwrap_or_default();
            ResendCooldown::from_elapsed(elapsed)
        }
        // A recorded timestamp from the future means the clock moved; wait
        // out the full interval rather than trusting it.
        Some(_) => ResendCooldown::new(),
        None => ResendCooldown::ready(),
    }
}

pub async fn run_setup_password(
    context: &mut AppContext,
    password: &str,
    confirm: Option<&str>,
) -> Result<(), CliError> {
    if context
        .flow
        .resume_pending(AuthStage::PendingPasswordSetup)?
        .is_none()
    {
        println!("No onboarding in progress. Start with `doorstep signup` or `doorstep login`.");
        return Ok(());
    }

    let confirmation = confirm.unwrap_or(password);
    let user = context.flow.setup_password(password, confirmation).await?;
    println!("Welcome aboard, {}. You are signed in.", user.full_name());
    Ok(())
}

pub async fn run_logout(context: &mut AppContext) -> Result<(), CliError> {
    context.flow.logout().await?;
    println!("Signed out.");
    Ok(())
}

pub async fn run_whoami(context: &mut AppContext) -> Result<(), CliError> {
    // Show the cached snapshot while the server check resolves.
    if let Some(cached) = context.flow.cached_profile()? {
        println!("Last known profile: {} <{}>", cached.full_name(), cached.email);
    }

    match context.flow.bootstrap_session().await? {
        AuthStatus::SignedIn => {
            let snapshot = context.session.snapshot();
            if let Some(user) = snapshot.user {
                println!(
                    "Signed in as {} <{}> ({:?})",
                    user.full_name(),
                    user.email,
                    user.role
                );
            }
        }
        AuthStatus::SignedOut => println!("Not signed in."),
        AuthStatus::Unknown => println!("Session state could not be determined."),
    }
    Ok(())
}

/// Assemble a code the way the web client's six-cell input does: paste the
/// raw text at cell 0 and accept only a complete code.
fn assemble_code(raw: &str) -> Option<String> {
    let mut input = OtpInput::new();
    input.paste(raw);
    input.code()
}
