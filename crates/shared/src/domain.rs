use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);
    };
}

id_newtype!(PostId);

/// A published blog entry as served by the remote API. Read-only on the
/// client; `content` carries raw HTML and must pass through a
/// sanitization step before display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub thumbnail_url: String,
    pub created_at: DateTime<Utc>,
    pub categories: Vec<String>,
    pub content: String,
}
