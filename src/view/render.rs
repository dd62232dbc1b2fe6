use crate::domain::{sort_visible, Board, Card, CardId, ColumnId, FilterState, SortStates};
use std::collections::{HashMap, HashSet};

/// The result of one full recompute: which cards are visible, in what order
/// the visible ones appear per column, and which columns show their
/// empty-state placeholder.
///
/// Hidden cards are absent from `order` on purpose: applying a pass
/// repositions visible cards only, so hidden cards never reorder relative to
/// each other.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderPass {
    visibility: HashMap<CardId, bool>,
    order: HashMap<ColumnId, Vec<CardId>>,
    empty_columns: HashSet<ColumnId>,
}

impl RenderPass {
    pub fn is_visible(&self, card: CardId) -> bool {
        self.visibility.get(&card).copied().unwrap_or(false)
    }

    /// The visible cards of a column, in final display order
    pub fn visible_order(&self, column: ColumnId) -> &[CardId] {
        self.order.get(&column).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether the column shows its "no cards" placeholder
    pub fn shows_placeholder(&self, column: ColumnId) -> bool {
        self.empty_columns.contains(&column)
    }

    pub fn visible_count(&self, column: ColumnId) -> usize {
        self.visible_order(column).len()
    }
}

/// Recomputes visibility and order for every column of the board.
///
/// Pure function of its inputs and safe to call repeatedly: rapid successive
/// triggers converge on the same pass instead of diverging through
/// incremental patches.
pub fn recompute(board: &Board, filter: &FilterState, sort: &SortStates) -> RenderPass {
    let mut pass = RenderPass::default();

    for column in &board.columns {
        let mut visible: Vec<&Card> = Vec::new();
        for card_id in &column.cards {
            let card = match board.card(*card_id) {
                Some(card) => card,
                None => continue,
            };
            let shown = filter.matches(card);
            pass.visibility.insert(card.id, shown);
            if shown {
                visible.push(card);
            }
        }

        sort_visible(&mut visible, sort.order(column.id));

        if visible.is_empty() {
            pass.empty_columns.insert(column.id);
        }
        pass.order
            .insert(column.id, visible.iter().map(|card| card.id).collect());
    }

    pass
}
