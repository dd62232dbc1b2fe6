use crate::domain::card::UserId;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// The author block the server attaches to every comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentAuthor {
    pub id: UserId,
    pub username: String,
    pub avatar_url: String,
}

/// A comment on a card.
///
/// `can_edit`/`can_delete` are the server's per-viewer permission flags; the
/// client shows the corresponding actions only when they are set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: super::CommentId,
    pub text: String,
    #[serde(with = "server_timestamp")]
    pub timestamp: NaiveDateTime,
    pub author: CommentAuthor,
    #[serde(default)]
    pub can_edit: bool,
    #[serde(default)]
    pub can_delete: bool,
}

/// Comment timestamps cross the wire as `dd.mm.yyyy HH:MM` strings.
pub(crate) mod server_timestamp {
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%d.%m.%Y %H:%M";

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
