//! File-backed durable client storage.
//!
//! One JSON document under the user's config directory holds the two
//! cross-reload values: the pending onboarding email and the last-known
//! profile snapshot. Plain and unencrypted, matching what the web client
//! keeps in browser storage.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use doorstep_core::auth::{ClientStorage, PendingIdentity, UserProfile};
use doorstep_core::{ApiError, ApiResult};

use crate::error::CliError;

const STORAGE_DIR: &str = "doorstep";
const STORAGE_FILE: &str = "session.json";

#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
struct StorageDocument {
    pending_identity_email: Option<String>,
    current_user_snapshot: Option<UserProfile>,
    last_resend_at: Option<i64>,
    saved_at: Option<i64>,
}

/// JSON-file implementation of [`ClientStorage`].
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Storage at the default per-user location.
    pub fn open_default() -> Result<Self, CliError> {
        let base = dirs::config_dir().ok_or(CliError::NoStorageDir)?;
        Ok(Self::at_path(base.join(STORAGE_DIR).join(STORAGE_FILE)))
    }

    #[must_use]
    pub fn at_path(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Unix timestamp of the last successful resend, backing the local
    /// cooldown across invocations.
    pub fn last_resend_at(&self) -> ApiResult<Option<i64>> {
        Ok(self.read_document()?.last_resend_at)
    }

    pub fn record_resend_at(&self, timestamp: i64) -> ApiResult<()> {
        let mut document = self.read_document()?;
        document.last_resend_at = Some(timestamp);
        self.write_document(document)
    }

    fn read_document(&self) -> ApiResult<StorageDocument> {
        if !self.path.exists() {
            return Ok(StorageDocument::default());
        }
        let raw = fs::read_to_string(&self.path)
            .map_err(|error| ApiError::Storage(error.to_string()))?;
        serde_json::from_str(&raw).map_err(|error| ApiError::Storage(error.to_string()))
    }

    fn write_document(&self, mut document: StorageDocument) -> ApiResult<()> {
        document.saved_at = Some(chrono::Utc::now().timestamp());
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|error| ApiError::Storage(error.to_string()))?;
        }
        let raw = serde_json::to_string_pretty(&document)
            .map_err(|error| ApiError::Storage(error.to_string()))?;
        fs::write(&self.path, raw).map_err(|error| ApiError::Storage(error.to_string()))
    }
}

impl ClientStorage for FileStorage {
    fn load_pending_identity(&self) -> ApiResult<Option<PendingIdentity>> {
        Ok(self
            .read_document()?
            .pending_identity_email
            .map(PendingIdentity::new))
    }

    fn save_pending_identity(&self, identity: &PendingIdentity) -> ApiResult<()> {
        let mut document = self.read_document()?;
        document.pending_identity_email = Some(identity.email.clone());
        self.write_document(document)
    }

    fn clear_pending_identity(&self) -> ApiResult<()> {
        let mut document = self.read_document()?;
        document.pending_identity_email = None;
        self.write_document(document)
    }

    fn load_user_snapshot(&self) -> ApiResult<Option<UserProfile>> {
        Ok(self.read_document()?.current_user_snapshot)
    }

    fn save_user_snapshot(&self, user: &UserProfile) -> ApiResult<()> {
        let mut document = self.read_document()?;
        document.current_user_snapshot = Some(user.clone());
        self.write_document(document)
    }

    fn clear_user_snapshot(&self) -> ApiResult<()> {
        let mut document = self.read_document()?;
        document.current_user_snapshot = None;
        self.write_document(document)
    }
}
