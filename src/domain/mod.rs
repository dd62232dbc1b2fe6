pub mod board;
pub mod card;
pub mod comment;
pub mod filter;
pub mod sorting;

pub use board::{Board, Column};
pub use card::{Assignee, BoardId, Card, CardId, ColumnId, CommentId, Tag, TagColor, TagId, UserId};
pub use comment::{Comment, CommentAuthor};
pub use filter::FilterState;
pub use sorting::{sort_visible, SortOrder, SortStates};
