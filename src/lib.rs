//! # Kardo Client
//!
//! Client-side behavior layer for Kardo kanban boards.
//!
//! This crate provides the in-memory board view state, the card filter/sort
//! engine, the optimistic drag/move coordinator with server reconciliation,
//! and a typed client for the board server's AJAX surface. The server stays
//! authoritative for all data; this layer mirrors it for one mounted page
//! and reconciles on every mutating response.

pub mod api;
pub mod domain;
pub mod error;
pub mod view;

// Re-export commonly used types
pub use api::{http::HttpBoardApi, BoardApi, CardForm, FieldErrors, FormOutcome};
pub use domain::{
    Assignee, Board, BoardId, Card, CardId, Column, ColumnId, Comment, CommentId, FilterState,
    SortOrder, Tag, TagColor, TagId, UserId,
};
pub use error::{KardoError, Result};
pub use view::{
    BoardView, CardDetailView, CardMove, MovePhase, Navigator, OverlayAction, RenderPass, Route,
};
