//! Favorites client.
//!
//! Plain transport calls; these endpoints require authentication, so
//! callers wrap them in the deferred-action gate instead of pre-checking
//! auth state.

use serde_json::json;

use crate::error::ApiResult;
use crate::transport::{ApiTransport, RequestSpec};

#[derive(Clone)]
pub struct FavoritesClient {
    transport: ApiTransport,
}

impl FavoritesClient {
    #[must_use]
    pub const fn new(transport: ApiTransport) -> Self {
        Self { transport }
    }

    pub async fn add(&self, property_id: &str) -> ApiResult<()> {
        let spec = RequestSpec::post("/favorites", json!({ "propertyId": property_id }));
        self.transport.execute(&spec).await?;
        Ok(())
    }

    pub async fn remove(&self, property_id: &str) -> ApiResult<()> {
        let spec = RequestSpec::delete(format!("/favorites/{property_id}"));
        self.transport.execute(&spec).await?;
        Ok(())
    }
}
