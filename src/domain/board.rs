use crate::domain::card::{BoardId, Card, CardId, ColumnId, Tag, TagId};
use crate::error::{KardoError, Result};
use std::collections::HashMap;

/// An ordered bucket of cards representing a workflow stage.
///
/// The `cards` vector is the display order; filtering hides cards without
/// disturbing it, and only a confirmed (or rolled-back) move rewrites it.
#[derive(Debug, Clone)]
pub struct Column {
    pub id: ColumnId,
    pub name: String,
    pub cards: Vec<CardId>,
}

impl Column {
    pub fn new(id: ColumnId, name: String) -> Self {
        Self {
            id,
            name,
            cards: Vec::new(),
        }
    }
}

/// The typed in-memory card registry for one board view.
///
/// The server stays authoritative; this mirror is updated through explicit
/// calls on every mutating response instead of being re-read from rendered
/// markup. Invariant: every registered card appears in exactly one column.
#[derive(Debug, Clone)]
pub struct Board {
    pub id: BoardId,
    pub columns: Vec<Column>,
    cards: HashMap<CardId, Card>,
}

impl Board {
    pub fn new(id: BoardId) -> Self {
        Self {
            id,
            columns: Vec::new(),
            cards: HashMap::new(),
        }
    }

    pub fn add_column(&mut self, id: ColumnId, name: impl Into<String>) {
        self.columns.push(Column::new(id, name.into()));
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.get(&id)
    }

    pub fn column(&self, id: ColumnId) -> Option<&Column> {
        self.columns.iter().find(|col| col.id == id)
    }

    fn column_mut(&mut self, id: ColumnId) -> Result<&mut Column> {
        self.columns
            .iter_mut()
            .find(|col| col.id == id)
            .ok_or_else(|| KardoError::ColumnNotFound(id.to_string()))
    }

    /// Registers a card at the end of the given column
    pub fn insert_card(&mut self, column_id: ColumnId, card: Card) -> Result<()> {
        if self.cards.contains_key(&card.id) {
            return Err(KardoError::Other(format!(
                "Card {} is already on the board",
                card.id
            )));
        }
        let column = self.column_mut(column_id)?;
        column.cards.push(card.id);
        self.cards.insert(card.id, card);
        Ok(())
    }

    /// Finds which column holds a card, and at which index
    pub fn position_of(&self, card_id: CardId) -> Option<(ColumnId, usize)> {
        for col in &self.columns {
            if let Some(idx) = col.cards.iter().position(|id| *id == card_id) {
                return Some((col.id, idx));
            }
        }
        None
    }

    /// Moves a card to `to_column` at `index` (clamped to the column length).
    ///
    /// Returns the card's previous `(column, index)` so the caller can keep a
    /// rollback snapshot.
    pub fn move_card_to(
        &mut self,
        card_id: CardId,
        to_column: ColumnId,
        index: usize,
    ) -> Result<(ColumnId, usize)> {
        let (from_column, from_index) = self
            .position_of(card_id)
            .ok_or_else(|| KardoError::CardNotFound(card_id.to_string()))?;

        // Validate the destination before touching the source column.
        self.column_mut(to_column)?;

        let source = self.column_mut(from_column)?;
        source.cards.remove(from_index);

        let dest = self.column_mut(to_column)?;
        let index = index.min(dest.cards.len());
        dest.cards.insert(index, card_id);

        Ok((from_column, from_index))
    }

    /// Removes a card from the board entirely (delete confirmation)
    pub fn remove_card(&mut self, card_id: CardId) -> Option<Card> {
        let card = self.cards.remove(&card_id)?;
        for col in &mut self.columns {
            col.cards.retain(|id| *id != card_id);
        }
        Some(card)
    }

    /// Replaces the registry entry for a card after the server returns the
    /// saved version. Column membership is untouched.
    pub fn upsert_card(&mut self, card: Card) -> Result<()> {
        if !self.cards.contains_key(&card.id) {
            return Err(KardoError::CardNotFound(card.id.to_string()));
        }
        self.cards.insert(card.id, card);
        Ok(())
    }

    /// Rewrites an edited tag's name and color on every card carrying it
    pub fn apply_tag_edited(&mut self, tag: &Tag) {
        for card in self.cards.values_mut() {
            for card_tag in card.tags.iter_mut().filter(|t| t.id == tag.id) {
                card_tag.name = tag.name.clone();
                card_tag.color = tag.color.clone();
            }
        }
    }

    /// Strips a deleted tag from every card carrying it
    pub fn apply_tag_deleted(&mut self, tag_id: TagId) {
        for card in self.cards.values_mut() {
            card.tags.retain(|t| t.id != tag_id);
        }
    }

    /// Cards of one column in display order, skipping unregistered ids
    pub fn cards_in_column(&self, column_id: ColumnId) -> Vec<&Card> {
        self.column(column_id)
            .map(|col| {
                col.cards
                    .iter()
                    .filter_map(|id| self.cards.get(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }
}
