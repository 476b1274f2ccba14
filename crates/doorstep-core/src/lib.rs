//! doorstep-core - Core library for Doorstep
//!
//! This crate contains the shared auth flow, session state, and API client
//! logic used by the Doorstep marketplace front ends. All business logic
//! lives behind the remote HTTP API; this crate is the client-side glue:
//! credential transport, the onboarding/login state machine, the shared
//! session store, the silent refresh interceptor, and the deferred-action
//! gate for auth-required operations.

pub mod auth;
pub mod config;
pub mod error;
pub mod favorites;
pub mod gate;
pub mod messages;
pub mod session;
pub mod transport;
pub mod util;

pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};
pub use session::{AuthStatus, SessionStore};
