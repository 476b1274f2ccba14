//! Favorite/unfavorite handlers, gated behind the inline sign-in prompt.

use doorstep_core::favorites::FavoritesClient;
use doorstep_core::gate::ActionGate;
use doorstep_core::ApiError;

use crate::commands::common::AppContext;
use crate::error::CliError;
use crate::prompt::TerminalPrompt;

pub async fn run_favorite(context: &AppContext, property_id: &str) -> Result<(), CliError> {
    let favorites = FavoritesClient::new(context.transport.clone());
    let gate = ActionGate::new(context.auth.clone(), TerminalPrompt, context.session.clone());

    match gate.guard(|| favorites.add(property_id)).await {
        Ok(()) => {
            println!("Added property {property_id} to favorites.");
            Ok(())
        }
        Err(ApiError::Cancelled) => {
            println!("Sign-in cancelled; nothing changed.");
            Ok(())
        }
        Err(error) => Err(error.into()),
    }
}

pub async fn run_unfavorite(context: &AppContext, property_id: &str) -> Result<(), CliError> {
    let favorites = FavoritesClient::new(context.transport.clone());
    let gate = ActionGate::new(context.auth.clone(), TerminalPrompt, context.session.clone());

    match gate.guard(|| favorites.remove(property_id)).await {
        Ok(()) => {
            println!("Removed property {property_id} from favorites.");
            Ok(())
        }
        Err(ApiError::Cancelled) => {
            println!("Sign-in cancelled; nothing changed.");
            Ok(())
        }
        Err(error) => Err(error.into()),
    }
}
