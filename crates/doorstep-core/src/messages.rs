//! Unread-message count client.
//!
//! The counter is eventually-consistent display data. Explicit mutations
//! apply an optimistic local delta immediately and roll back to the
//! pre-mutation value if the server call fails.

use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::session::SessionStore;
use crate::transport::{ApiTransport, RequestSpec};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UnreadCountResponse {
    unread_count: u32,
}

#[derive(Clone)]
pub struct MessagesClient {
    transport: ApiTransport,
    session: SessionStore,
}

impl MessagesClient {
    #[must_use]
    pub const fn new(transport: ApiTransport, session: SessionStore) -> Self {
        Self { transport, session }
    }

    /// Fetch the unread count and publish it to the session store.
    pub async fn refresh_unread(&self) -> ApiResult<u32> {
        let payload = self
            .transport
            .execute(&RequestSpec::get("/messages/unread-count"))
            .await?;
        let response: UnreadCountResponse = serde_json::from_value(payload)
            .map_err(|_| ApiError::general("Unread-count response was malformed"))?;
        self.session.set_unread_count(response.unread_count);
        Ok(response.unread_count)
    }

    /// Mark one message as read with an optimistic counter decrement.
    pub async fn mark_read(&self, message_id: &str) -> ApiResult<()> {
        let before = self.session.snapshot().unread_count;
        self.session.decrement_unread();

        let spec = RequestSpec::patch(format!("/messages/{message_id}/read"));
        match self.transport.execute(&spec).await {
            Ok(_) => Ok(()),
            Err(error) => {
                // Restore rather than increment, so a poll that already
                // reconciled the counter is not double-counted.
                self.session.set_unread_count(before);
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn unread_count_payload_parses() {
        let response: UnreadCountResponse =
            serde_json::from_value(json!({ "unreadCount": 4 })).unwrap();
        assert_eq!(response.unread_count, 4);
    }
}
