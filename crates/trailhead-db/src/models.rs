use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted roadmap document.
///
/// Only the raw generated text is stored; the parsed section tree is
/// rebuilt on every display. Rows are immutable after insert.
///
/// `is_premium` is the persisted name for the detailed-generation flag,
/// kept for compatibility with existing data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Roadmap {
    pub id: Uuid,
    /// Identity issued by the external authentication provider.
    pub user_id: Uuid,
    /// The topic the user asked for.
    pub topic: String,
    /// Raw generated text, exactly as returned by the endpoint.
    pub roadmap: String,
    /// Whether the detailed prompt template was used.
    pub is_premium: bool,
    pub created_at: DateTime<Utc>,
}
