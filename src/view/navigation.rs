use crate::domain::{BoardId, CardId};
use crate::error::KardoError;
use std::fmt;
use std::str::FromStr;

/// The browser-visible URLs the board view owns.
///
/// `/boards/{board}` is the plain board; `/boards/{board}/cards/{card}` is
/// the same board with the card detail overlay open. Transitions between the
/// two never reload the page; they only push history entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Board(BoardId),
    CardDetail(BoardId, CardId),
}

impl Route {
    pub fn board_id(&self) -> BoardId {
        match self {
            Route::Board(board) => *board,
            Route::CardDetail(board, _) => *board,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Board(board) => format!("/boards/{}", board),
            Route::CardDetail(board, card) => format!("/boards/{}/cards/{}", board, card),
        }
    }
}

impl FromStr for Route {
    type Err = KardoError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let invalid = || KardoError::InvalidRoute(path.to_string());
        let mut parts = path.trim_matches('/').split('/');

        if parts.next() != Some("boards") {
            return Err(invalid());
        }
        let board: BoardId = parts.next().ok_or_else(invalid)?.parse()?;

        match parts.next() {
            None => Ok(Route::Board(board)),
            Some("cards") => {
                let card: CardId = parts.next().ok_or_else(invalid)?.parse()?;
                match parts.next() {
                    None => Ok(Route::CardDetail(board, card)),
                    Some(_) => Err(invalid()),
                }
            }
            Some(_) => Err(invalid()),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// What a history navigation asks the view to do with the overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayAction {
    OpenCard(CardId),
    CloseOverlay,
    NoChange,
}

/// Tracks which route the board view currently shows and which card overlay,
/// if any, is open.
///
/// The methods return the route to push onto the history stack; the caller
/// owns the actual history API.
#[derive(Debug)]
pub struct Navigator {
    board: BoardId,
    overlay: Option<CardId>,
}

impl Navigator {
    pub fn new(board: BoardId) -> Self {
        Self {
            board,
            overlay: None,
        }
    }

    pub fn current_route(&self) -> Route {
        match self.overlay {
            Some(card) => Route::CardDetail(self.board, card),
            None => Route::Board(self.board),
        }
    }

    pub fn open_overlay(&self) -> Option<CardId> {
        self.overlay
    }

    /// Opening the card overlay; push the returned route
    pub fn open_card(&mut self, card: CardId) -> Route {
        self.overlay = Some(card);
        self.current_route()
    }

    /// Closing the overlay; push the returned route
    pub fn close_card(&mut self) -> Route {
        self.overlay = None;
        self.current_route()
    }

    /// Handles a history pop (back/forward) or the initial page load.
    ///
    /// A card-detail path opens that card's overlay; any other path closes an
    /// open overlay and is otherwise a no-op.
    pub fn handle_pop(&mut self, path: &str) -> OverlayAction {
        match path.parse::<Route>() {
            Ok(Route::CardDetail(_, card)) => {
                self.overlay = Some(card);
                OverlayAction::OpenCard(card)
            }
            _ => {
                if self.overlay.take().is_some() {
                    OverlayAction::CloseOverlay
                } else {
                    OverlayAction::NoChange
                }
            }
        }
    }
}
