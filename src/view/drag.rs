use crate::api::BoardApi;
use crate::domain::{CardId, ColumnId};
use crate::error::{KardoError, Result};
use crate::view::{BoardView, RenderPass};

/// Where a card sat before a gesture touched it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardPosition {
    pub column: ColumnId,
    pub index: usize,
}

/// The lifecycle of one drag gesture.
///
/// `Dragging` is purely visual and may be cancelled by the drag layer without
/// the coordinator ever hearing about it; the coordinator takes over at the
/// drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovePhase {
    Dragging,
    Dropped,
    Confirmed,
    Rejected,
}

/// One drop gesture, optimistically applied and awaiting confirmation.
///
/// Each gesture owns its rollback snapshot, so several gestures can be in
/// flight at once without sharing any state: a later drag cannot corrupt an
/// earlier gesture's origin.
#[derive(Debug)]
pub struct CardMove {
    card_id: CardId,
    origin: CardPosition,
    destination: ColumnId,
    phase: MovePhase,
}

/// How a confirmation round-trip settled.
///
/// `error` carries the user-visible failure when the move was rejected; the
/// board state in `render` already reflects the rollback.
#[derive(Debug)]
pub struct MoveResolution {
    pub gesture: CardMove,
    pub render: RenderPass,
    pub error: Option<KardoError>,
}

impl BoardView {
    /// Applies a drop optimistically.
    ///
    /// The card moves to `to_column` at `to_index` immediately; the sort
    /// order of both the source and destination columns resets to manual
    /// because a hand-placed card overrides any automatic order. The
    /// returned gesture carries the origin snapshot for rollback.
    pub fn drop_card(
        &mut self,
        card_id: CardId,
        to_column: ColumnId,
        to_index: usize,
    ) -> Result<(CardMove, RenderPass)> {
        let (from_column, from_index) = self.board.move_card_to(card_id, to_column, to_index)?;
        self.sort.reset(from_column);
        self.sort.reset(to_column);

        let gesture = CardMove {
            card_id,
            origin: CardPosition {
                column: from_column,
                index: from_index,
            },
            destination: to_column,
            phase: MovePhase::Dropped,
        };
        Ok((gesture, self.recompute()))
    }
}

impl CardMove {
    pub fn card_id(&self) -> CardId {
        self.card_id
    }

    pub fn origin(&self) -> CardPosition {
        self.origin
    }

    pub fn destination(&self) -> ColumnId {
        self.destination
    }

    pub fn phase(&self) -> MovePhase {
        self.phase
    }

    /// Issues the single confirmation request for this gesture.
    ///
    /// On success the optimistic state already matches and nothing changes.
    /// On any failure (server rejection, transport error, missing security
    /// token) the card goes back to its exact original column and index and
    /// the error is handed back for display. The sort-order reset from the
    /// optimistic phase stays either way.
    pub async fn confirm(mut self, api: &dyn BoardApi, view: &mut BoardView) -> MoveResolution {
        match api.move_card(self.card_id, self.destination).await {
            Ok(()) => {
                self.phase = MovePhase::Confirmed;
                MoveResolution {
                    gesture: self,
                    render: view.recompute(),
                    error: None,
                }
            }
            Err(err) => {
                self.phase = MovePhase::Rejected;
                if let Err(rollback_err) =
                    view.board
                        .move_card_to(self.card_id, self.origin.column, self.origin.index)
                {
                    // The card vanished while the request was in flight;
                    // there is nothing left to restore.
                    tracing::error!(
                        card = %self.card_id,
                        %rollback_err,
                        "could not roll back a rejected move"
                    );
                }
                MoveResolution {
                    gesture: self,
                    render: view.recompute(),
                    error: Some(err),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{MockApi, Scripted};
    use crate::domain::{Board, BoardId, Card, SortOrder};

    fn view_with_layout() -> BoardView {
        // Column A holds cards 1..=3, column B holds card 4.
        let mut board = Board::new(BoardId::new(1));
        board.add_column(ColumnId::new(1), "A");
        board.add_column(ColumnId::new(2), "B");
        for n in 1..=3 {
            board
                .insert_card(ColumnId::new(1), Card::new(CardId::new(n), format!("Card {}", n)))
                .unwrap();
        }
        board
            .insert_card(ColumnId::new(2), Card::new(CardId::new(4), "Card 4".to_string()))
            .unwrap();
        BoardView::new(board)
    }

    #[test]
    fn test_drop_applies_optimistically_and_resets_sorts() {
        let mut view = view_with_layout();
        view.cycle_sort(ColumnId::new(1));
        view.cycle_sort(ColumnId::new(2));

        let (gesture, pass) = view.drop_card(CardId::new(3), ColumnId::new(2), 0).unwrap();

        assert_eq!(gesture.phase(), MovePhase::Dropped);
        assert_eq!(
            gesture.origin(),
            CardPosition {
                column: ColumnId::new(1),
                index: 2
            }
        );
        assert_eq!(
            pass.visible_order(ColumnId::new(2)),
            &[CardId::new(3), CardId::new(4)]
        );
        assert_eq!(view.sort_order(ColumnId::new(1)), SortOrder::None);
        assert_eq!(view.sort_order(ColumnId::new(2)), SortOrder::None);
    }

    #[test]
    fn test_drop_unknown_card_fails_cleanly() {
        let mut view = view_with_layout();
        assert!(view.drop_card(CardId::new(99), ColumnId::new(2), 0).is_err());
    }

    #[tokio::test]
    async fn test_confirmed_move_stays_put() {
        let mut view = view_with_layout();
        let api = MockApi::new();

        let (gesture, _) = view.drop_card(CardId::new(3), ColumnId::new(2), 0).unwrap();
        let resolution = gesture.confirm(&api, &mut view).await;

        assert_eq!(resolution.gesture.phase(), MovePhase::Confirmed);
        assert!(resolution.error.is_none());
        assert_eq!(
            view.board().position_of(CardId::new(3)),
            Some((ColumnId::new(2), 0))
        );
        assert_eq!(api.move_calls(), vec![(CardId::new(3), ColumnId::new(2))]);
    }

    #[tokio::test]
    async fn test_rejected_move_restores_exact_origin() {
        // Drag card 3 from column A (index 2) to column B (index 0); the
        // server answers {"success": false, "error": "locked"}.
        let mut view = view_with_layout();
        let api = MockApi::new();
        api.queue_move(Scripted::Rejected("locked".to_string()));

        let (gesture, _) = view.drop_card(CardId::new(3), ColumnId::new(2), 0).unwrap();
        let resolution = gesture.confirm(&api, &mut view).await;

        assert_eq!(resolution.gesture.phase(), MovePhase::Rejected);
        assert!(matches!(
            resolution.error,
            Some(KardoError::Rejected(ref msg)) if msg == "locked"
        ));
        assert_eq!(
            view.board().position_of(CardId::new(3)),
            Some((ColumnId::new(1), 2))
        );
        assert_eq!(
            resolution.render.visible_order(ColumnId::new(2)),
            &[CardId::new(4)]
        );
        // The optimistic sort reset is not rolled back.
        assert_eq!(view.sort_order(ColumnId::new(1)), SortOrder::None);
        assert_eq!(view.sort_order(ColumnId::new(2)), SortOrder::None);
    }

    #[tokio::test]
    async fn test_rejected_move_restores_placeholder() {
        let mut view = view_with_layout();
        let api = MockApi::new();
        api.queue_move(Scripted::Transport("connection reset".to_string()));

        // Drag the only card out of column B; B shows its placeholder until
        // the failed confirmation brings the card back.
        let (gesture, _) = view.drop_card(CardId::new(4), ColumnId::new(1), 0).unwrap();
        assert!(view.recompute().shows_placeholder(ColumnId::new(2)));
        gesture.confirm(&api, &mut view).await;

        // Card 4 is back in B after the rollback, so B shows no placeholder.
        let pass = view.recompute();
        assert!(!pass.shows_placeholder(ColumnId::new(2)));
        assert_eq!(
            view.board().position_of(CardId::new(4)),
            Some((ColumnId::new(2), 0))
        );
    }

    #[tokio::test]
    async fn test_missing_token_aborts_and_rolls_back() {
        let mut view = view_with_layout();
        let api = MockApi::new();
        api.queue_move(Scripted::MissingToken);

        let (gesture, _) = view.drop_card(CardId::new(1), ColumnId::new(2), 1).unwrap();
        let resolution = gesture.confirm(&api, &mut view).await;

        assert!(matches!(resolution.error, Some(KardoError::MissingCsrfToken)));
        assert_eq!(
            view.board().position_of(CardId::new(1)),
            Some((ColumnId::new(1), 0))
        );
    }

    #[tokio::test]
    async fn test_concurrent_gestures_keep_independent_snapshots() {
        let mut view = view_with_layout();
        let api = MockApi::new();
        // First confirmation fails, second succeeds.
        api.queue_move(Scripted::Rejected("locked".to_string()));
        api.queue_move(Scripted::Ok);

        let (first, _) = view.drop_card(CardId::new(1), ColumnId::new(2), 0).unwrap();
        let (second, _) = view.drop_card(CardId::new(2), ColumnId::new(2), 0).unwrap();

        let first = first.confirm(&api, &mut view).await;
        let second = second.confirm(&api, &mut view).await;

        assert_eq!(first.gesture.phase(), MovePhase::Rejected);
        assert_eq!(second.gesture.phase(), MovePhase::Confirmed);

        // Card 1 went back to the top of column A; card 2 stayed in B.
        assert_eq!(
            view.board().position_of(CardId::new(1)),
            Some((ColumnId::new(1), 0))
        );
        assert_eq!(
            view.board().position_of(CardId::new(2)),
            Some((ColumnId::new(2), 0))
        );
    }

    #[tokio::test]
    async fn test_rollback_survives_card_deleted_mid_flight() {
        let mut view = view_with_layout();
        let api = MockApi::new();
        api.queue_move(Scripted::Rejected("locked".to_string()));

        let (gesture, _) = view.drop_card(CardId::new(1), ColumnId::new(2), 0).unwrap();
        view.remove_card(CardId::new(1));

        let resolution = gesture.confirm(&api, &mut view).await;
        assert_eq!(resolution.gesture.phase(), MovePhase::Rejected);
        assert!(view.board().position_of(CardId::new(1)).is_none());
    }
}
