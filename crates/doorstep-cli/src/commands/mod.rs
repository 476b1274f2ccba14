pub mod auth_cmd;
pub mod common;
pub mod favorites_cmd;
pub mod messages_cmd;
