//! Unread-count and mark-as-read handlers.

use doorstep_core::messages::MessagesClient;
use doorstep_core::ApiError;

use crate::commands::common::AppContext;
use crate::error::CliError;

pub async fn run_unread(context: &AppContext) -> Result<(), CliError> {
    let messages = MessagesClient::new(context.transport.clone(), context.session.clone());
    match messages.refresh_unread().await {
        Ok(count) => {
            println!("Unread messages: {count}");
            Ok(())
        }
        Err(ApiError::Authorization) => {
            println!("Please sign in first (`doorstep login <email>`).");
            Ok(())
        }
        Err(error) => Err(error.into()),
    }
}

pub async fn run_mark_read(context: &AppContext, message_id: &str) -> Result<(), CliError> {
    let messages = MessagesClient::new(context.transport.clone(), context.session.clone());
    // Seed the counter so the optimistic decrement has something to work on.
    if let Err(error) = messages.refresh_unread().await {
        tracing::debug!("could not prefetch unread count: {error}");
    }

    match messages.mark_read(message_id).await {
        Ok(()) => {
            println!(
                "Marked as read. Unread messages: {}",
                context.session.snapshot().unread_count
            );
            Ok(())
        }
        Err(ApiError::Authorization) => {
            println!("Please sign in first (`doorstep login <email>`).");
            Ok(())
        }
        Err(error) => Err(error.into()),
    }
}
