use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Declares an integer identifier newtype for a server-assigned id.
macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Returns the raw integer value
            pub fn value(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = crate::error::KardoError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<i64>()
                    .map(Self)
                    .map_err(|_| crate::error::KardoError::InvalidId(s.to_string()))
            }
        }
    };
}

id_type!(
    /// Unique identifier for a board
    BoardId
);
id_type!(
    /// Unique identifier for a column within a board
    ColumnId
);
id_type!(
    /// Unique identifier for a card
    CardId
);
id_type!(
    /// Unique identifier for a comment
    CommentId
);
id_type!(
    /// Unique identifier for a tag
    TagId
);
id_type!(
    /// Unique identifier for a user (card assignee, comment author)
    UserId
);

/// A user assigned to a card. Order matters: the first-listed assignee is the
/// sort key when a column is sorted by assignee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    pub id: UserId,
    pub username: String,
    pub avatar_url: String,
}

/// A validated hex color for a tag (`#RGB` or `#RRGGBB`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TagColor(String);

impl TagColor {
    /// The color the server assigns when none is picked
    pub const DEFAULT: &'static str = "#808080";

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TagColor {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl FromStr for TagColor {
    type Err = crate::error::KardoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = match s.strip_prefix('#') {
            Some(rest) => rest,
            None => return Err(crate::error::KardoError::InvalidTagColor(s.to_string())),
        };
        let valid = matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit());
        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(crate::error::KardoError::InvalidTagColor(s.to_string()))
        }
    }
}

impl TryFrom<String> for TagColor {
    type Error = crate::error::KardoError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TagColor> for String {
    fn from(color: TagColor) -> Self {
        color.0
    }
}

impl fmt::Display for TagColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named, colored label scoped to a board; many-to-many with cards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub color: TagColor,
}

/// A card as the board view sees it.
///
/// Column membership is not stored here; it lives in [`crate::domain::Column`]
/// so that a card belongs to exactly one column at any time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub title: String,
    /// Empty string means no description (the wire sends `""`, never null)
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub assignees: Vec<Assignee>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Card {
    pub fn new(id: CardId, title: String) -> Self {
        Self {
            id,
            title,
            description: String::new(),
            assignees: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Whether the card has a non-empty description (drives the indicator)
    pub fn has_description(&self) -> bool {
        !self.description.is_empty()
    }

    /// The sort key for assignee ordering: the first-listed assignee's name
    pub fn first_assignee_name(&self) -> Option<&str> {
        self.assignees.first().map(|a| a.username.as_str())
    }

    pub fn has_assignee(&self, id: UserId) -> bool {
        self.assignees.iter().any(|a| a.id == id)
    }

    pub fn has_tag(&self, id: TagId) -> bool {
        self.tags.iter().any(|t| t.id == id)
    }
}
