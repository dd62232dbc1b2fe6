use crate::domain::{
    Board, Card, CardId, ColumnId, FilterState, SortOrder, SortStates, Tag, TagId, UserId,
};
use crate::error::Result;

pub mod detail;
pub mod drag;
pub mod navigation;
pub mod render;

pub use detail::{CardDetailView, TagFormMode, TagFormState};
pub use drag::{CardMove, CardPosition, MovePhase, MoveResolution};
pub use navigation::{Navigator, OverlayAction, Route};
pub use render::{recompute, RenderPass};

/// The view state for one mounted board page.
///
/// Owns the card registry plus the filter and sort selections, and is the
/// single place they are mutated from. Constructed when the board view
/// mounts and dropped on navigation away; nothing here survives the page.
///
/// Search and filter selections are global, so every trigger recomputes all
/// columns, not just the one that changed.
#[derive(Debug)]
pub struct BoardView {
    pub(crate) board: Board,
    pub(crate) filter: FilterState,
    pub(crate) sort: SortStates,
}

impl BoardView {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            filter: FilterState::new(),
            sort: SortStates::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn sort_order(&self, column: ColumnId) -> SortOrder {
        self.sort.order(column)
    }

    pub fn recompute(&self) -> RenderPass {
        render::recompute(&self.board, &self.filter, &self.sort)
    }

    /// Search box input
    pub fn set_search(&mut self, term: impl Into<String>) -> RenderPass {
        self.filter.set_search(term);
        self.recompute()
    }

    /// Assignee filter checkbox toggle
    pub fn toggle_assignee_filter(&mut self, id: UserId) -> RenderPass {
        self.filter.toggle_assignee(id);
        self.recompute()
    }

    /// Tag filter checkbox toggle
    pub fn toggle_tag_filter(&mut self, id: TagId) -> RenderPass {
        self.filter.toggle_tag(id);
        self.recompute()
    }

    /// Sort control click; returns the new order for the button indicator
    pub fn cycle_sort(&mut self, column: ColumnId) -> (SortOrder, RenderPass) {
        let order = self.sort.cycle(column);
        (order, self.recompute())
    }

    /// The reset button: clears the search term, every filter checkbox, and
    /// every column's sort control.
    pub fn reset_filters(&mut self) -> RenderPass {
        self.filter.clear();
        self.sort.clear();
        self.recompute()
    }

    /// Applies a saved card returned by the server to the registry
    pub fn apply_saved_card(&mut self, card: Card) -> Result<RenderPass> {
        self.board.upsert_card(card)?;
        Ok(self.recompute())
    }

    /// Removes a card after the server confirms its deletion
    pub fn remove_card(&mut self, id: CardId) -> RenderPass {
        self.board.remove_card(id);
        self.recompute()
    }

    /// Propagates an edited tag to every card showing it
    pub fn apply_tag_edited(&mut self, tag: &Tag) -> RenderPass {
        self.board.apply_tag_edited(tag);
        self.recompute()
    }

    /// Strips a deleted tag from every card showing it
    pub fn apply_tag_deleted(&mut self, tag_id: TagId) -> RenderPass {
        self.board.apply_tag_deleted(tag_id);
        self.recompute()
    }
}
