//! Session gate for the authoring pipeline.
//! The context object is the whole contract: an opaque id plus an expiry,
//! checked by a pure function of the context and a clock reading.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionContext {
    pub session_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

impl SessionContext {
    /// Issues a fresh session valid for `ttl` from now.
    pub fn issue(ttl: Duration) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            expires_at: Utc::now() + ttl,
        }
    }

    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }

    pub fn is_active(&self) -> bool {
        self.is_active_at(Utc::now())
    }
}
