//! Authentication: credential transport, onboarding/login state machine,
//! and OTP input assembly.

pub mod client;
pub mod machine;
pub mod model;
pub mod otp;

pub use client::{AuthApi, AuthClient};
pub use machine::{AuthFlow, AuthStage, ClientStorage};
pub use model::{Credentials, PendingIdentity, Role, SignInOutcome, UserProfile};
pub use otp::{OtpInput, ResendCooldown};
