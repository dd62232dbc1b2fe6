use crate::domain::card::{Card, TagId, UserId};
use std::collections::HashSet;

/// The active search/filter selections, derived from the filter controls.
///
/// Not persisted anywhere: a fresh view starts with everything empty, which
/// matches every card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    search: String,
    assignees: HashSet<UserId>,
    tags: HashSet<TagId>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Toggles an assignee checkbox; returns whether it is now selected
    pub fn toggle_assignee(&mut self, id: UserId) -> bool {
        if !self.assignees.remove(&id) {
            self.assignees.insert(id);
            return true;
        }
        false
    }

    /// Toggles a tag checkbox; returns whether it is now selected
    pub fn toggle_tag(&mut self, id: TagId) -> bool {
        if !self.tags.remove(&id) {
            self.tags.insert(id);
            return true;
        }
        false
    }

    pub fn selected_assignees(&self) -> &HashSet<UserId> {
        &self.assignees
    }

    pub fn selected_tags(&self) -> &HashSet<TagId> {
        &self.tags
    }

    /// Clears the search term and both selection sets
    pub fn clear(&mut self) {
        self.search.clear();
        self.assignees.clear();
        self.tags.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.assignees.is_empty() && self.tags.is_empty()
    }

    /// A card is visible iff all three predicates hold. Each predicate is
    /// disabled (matches all) while its control is empty; within a selection
    /// set, any intersection is enough.
    pub fn matches(&self, card: &Card) -> bool {
        self.search_match(card) && self.assignee_match(card) && self.tag_match(card)
    }

    fn search_match(&self, card: &Card) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let term = self.search.to_lowercase();
        card.title.to_lowercase().contains(&term)
            || card.description.to_lowercase().contains(&term)
    }

    fn assignee_match(&self, card: &Card) -> bool {
        self.assignees.is_empty() || self.assignees.iter().any(|id| card.has_assignee(*id))
    }

    fn tag_match(&self, card: &Card) -> bool {
        self.tags.is_empty() || self.tags.iter().any(|id| card.has_tag(*id))
    }
}
