//! Onboarding/login state machine.
//!
//! Drives the multi-step sequence `Anonymous -> PendingVerification ->
//! PendingPasswordSetup -> Authenticated` (with the legacy password branch
//! off `Anonymous`) from server response flags alone. Every transition is
//! server-confirmed; on any error the machine holds its current stage and
//! lets the user retry.

use crate::auth::client::AuthApi;
use crate::auth::model::{PendingIdentity, SignInOutcome, UserProfile};
use crate::error::{ApiError, ApiResult};
use crate::session::{AuthStatus, SessionStore};
use crate::util::mask_email;

/// Durable client storage for the two cross-reload values: the pending
/// onboarding email and the last-known profile snapshot.
///
/// Plain, non-encrypted key/value storage scoped to the client context.
/// The pending identity is single-writer: a new sign-up or sign-in
/// overwrites any previous value unconditionally.
pub trait ClientStorage {
    fn load_pending_identity(&self) -> ApiResult<Option<PendingIdentity>>;
    fn save_pending_identity(&self, identity: &PendingIdentity) -> ApiResult<()>;
    fn clear_pending_identity(&self) -> ApiResult<()>;

    fn load_user_snapshot(&self) -> ApiResult<Option<UserProfile>>;
    fn save_user_snapshot(&self, user: &UserProfile) -> ApiResult<()>;
    fn clear_user_snapshot(&self) -> ApiResult<()>;
}

/// Where the user stands in the onboarding/login sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthStage {
    #[default]
    Anonymous,
    PendingVerification,
    PendingPasswordSetup,
    LegacyPasswordEntry,
    Authenticated,
}

impl AuthStage {
    /// Stages that cannot be entered without a persisted pending identity.
    #[must_use]
    pub const fn requires_pending_identity(self) -> bool {
        matches!(
            self,
            Self::PendingVerification | Self::PendingPasswordSetup | Self::LegacyPasswordEntry
        )
    }
}

/// The auth flow orchestrator.
///
/// Owns the current stage, persists the pending identity at exactly the
/// transitions that capture one, and writes the shared session store only
/// through its named mutators.
pub struct AuthFlow<A, S> {
    api: A,
    storage: S,
    session: SessionStore,
    stage: AuthStage,
}

impl<A: AuthApi, S: ClientStorage> AuthFlow<A, S> {
    pub fn new(api: A, storage: S, session: SessionStore) -> Self {
        Self {
            api,
            storage,
            session,
            stage: AuthStage::Anonymous,
        }
    }

    #[must_use]
    pub const fn stage(&self) -> AuthStage {
        self.stage
    }

    #[must_use]
    pub const fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Resume an onboarding screen after a reload or deep link.
    ///
    /// Screens that need a pending identity read it from durable storage;
    /// when it is absent the machine drops to `Anonymous` and the caller
    /// redirects to the sign-in entry point.
    pub fn resume_pending(&mut self, target: AuthStage) -> ApiResult<Option<PendingIdentity>> {
        if !target.requires_pending_identity() {
            self.stage = AuthStage::Anonymous;
            return Ok(None);
        }
        match self.storage.load_pending_identity()? {
            Some(identity) => {
                self.stage = target;
                Ok(Some(identity))
            }
            None => {
                self.stage = AuthStage::Anonymous;
                Ok(None)
            }
        }
    }

    /// Resolve the tri-state session by asking the server who we are.
    ///
    /// The server-verified session is authoritative; the stored snapshot is
    /// only a display cache and is overwritten or cleared by the answer.
    /// Transient failures leave the status `Unknown` for the caller to
    /// retry rather than forcing a premature redirect.
    pub async fn bootstrap_session(&mut self) -> ApiResult<AuthStatus> {
        match self.api.fetch_profile().await {
            Ok(user) => {
                self.storage.save_user_snapshot(&user)?;
                self.session.set_authenticated(user);
                self.stage = AuthStage::Authenticated;
                Ok(AuthStatus::SignedIn)
            }
            Err(error) if error.is_authorization() => {
                self.storage.clear_user_snapshot()?;
                self.session.clear_session();
                self.stage = AuthStage::Anonymous;
                Ok(AuthStatus::SignedOut)
            }
            Err(error) => Err(error),
        }
    }

    /// Last persisted profile, for display while the session resolves.
    pub fn cached_profile(&self) -> ApiResult<Option<UserProfile>> {
        self.storage.load_user_snapshot()
    }

    pub async fn sign_up(
        &mut self,
        full_name: &str,
        email: &str,
        phone_number: &str,
        role: &str,
    ) -> ApiResult<PendingIdentity> {
        let identity = self.api.sign_up(full_name, email, phone_number, role).await?;
        self.storage.save_pending_identity(&identity)?;
        self.stage = AuthStage::PendingVerification;
        tracing::info!("sign-up accepted for {}", mask_email(&identity.email));
        Ok(identity)
    }

    /// Sign in and follow whichever branch the server's flags dictate.
    pub async fn sign_in(&mut self, identifier: &str, password: &str) -> ApiResult<SignInOutcome> {
        let outcome = self.api.sign_in(identifier, password).await?;
        match &outcome {
            SignInOutcome::RequiresEmailVerification { email } => {
                self.storage
                    .save_pending_identity(&PendingIdentity::new(email))?;
                self.stage = AuthStage::PendingVerification;
            }
            SignInOutcome::RequiresPasswordSetup { email } => {
                self.storage
                    .save_pending_identity(&PendingIdentity::new(email))?;
                self.stage = AuthStage::PendingPasswordSetup;
            }
            SignInOutcome::RequiresPassword { identifier } => {
                self.storage
                    .save_pending_identity(&PendingIdentity::new(identifier))?;
                self.stage = AuthStage::LegacyPasswordEntry;
            }
            SignInOutcome::Authenticated { user } => {
                self.storage.clear_pending_identity()?;
                self.storage.save_user_snapshot(user)?;
                self.session.set_authenticated(user.clone());
                self.stage = AuthStage::Authenticated;
            }
            SignInOutcome::Failed { .. } => {}
        }
        Ok(outcome)
    }

    /// Verify the assembled 6-digit code for the pending identity.
    pub async fn verify_otp(&mut self, code: &str) -> ApiResult<()> {
        let identity = self.require_pending_identity()?;
        self.api.verify_otp(&identity.email, code).await?;
        self.stage = AuthStage::PendingPasswordSetup;
        Ok(())
    }

    /// Request a fresh code. The caller owns the 60-second cooldown timer;
    /// this only talks to the server.
    pub async fn resend_otp(&self) -> ApiResult<()> {
        let identity = self.require_pending_identity()?;
        self.api.resend_otp(&identity.email).await
    }

    /// Finish onboarding by choosing a password.
    pub async fn setup_password(&mut self, password: &str, confirmation: &str) -> ApiResult<UserProfile> {
        let identity = self.require_pending_identity()?;
        let user = self
            .api
            .setup_password(&identity.email, password, confirmation)
            .await?;
        self.storage.clear_pending_identity()?;
        self.storage.save_user_snapshot(&user)?;
        self.session.set_authenticated(user.clone());
        self.stage = AuthStage::Authenticated;
        Ok(user)
    }

    /// Abandon the onboarding flow and return to sign-in.
    pub fn abandon_onboarding(&mut self) -> ApiResult<()> {
        self.storage.clear_pending_identity()?;
        self.stage = AuthStage::Anonymous;
        Ok(())
    }

    /// Clear the session everywhere. Server-side logout is best-effort.
    pub async fn logout(&mut self) -> ApiResult<()> {
        self.api.logout().await;
        self.storage.clear_pending_identity()?;
        self.storage.clear_user_snapshot()?;
        self.session.clear_session();
        self.stage = AuthStage::Anonymous;
        Ok(())
    }

    fn require_pending_identity(&self) -> ApiResult<PendingIdentity> {
        self.storage.load_pending_identity()?.ok_or_else(|| {
            ApiError::general("No onboarding in progress. Sign in or sign up first.")
        })
    }
}
