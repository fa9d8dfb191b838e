//! Modal controller
//!
//! Owns the card store, the list service and the modal state. Input from the
//! main loop is turned into state machine events; the effects that come back
//! are applied here, which is the only place the store is mutated.

use std::time::Duration;

use tiny_skia::Pixmap;

use crate::app::state::{
    AnimatingCard, Effect, ModalState, REFRESH_INTERVAL, StateEvent, StateMachine, Transition,
};
use crate::domain::{CardId, CardStore, StoreError};
use crate::service::ListService;
use crate::ui::list_view::CardHit;
use crate::ui::modal::ModalLayout;

/// Reasons a tap on a card does not open the modal
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("Another card is already in flight")]
    NotIdle,

    #[error("Placeholder cards cannot be archived")]
    Placeholder,

    #[error("Selection is stale: {0}")]
    Stale(#[from] StoreError),

    #[error("Card at index {index} is no longer {expected}")]
    Moved { index: usize, expected: CardId },
}

pub struct ModalController<S: ListService> {
    service: S,
    store: CardStore,
    state: ModalState,
    last_refresh: Option<Duration>,
}

impl<S: ListService> ModalController<S> {
    /// Creates a controller with an empty store; call [`Self::refresh`] to fill it
    pub fn new(service: S) -> Self {
        Self {
            service,
            store: CardStore::new(),
            state: ModalState::Idle,
            last_refresh: None,
        }
    }

    pub fn store(&self) -> &CardStore {
        &self.store
    }

    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// True when the list is idle and the refresh interval has elapsed
    pub fn refresh_due(&self, now: Duration) -> bool {
        self.state.is_idle()
            && self
                .last_refresh
                .is_none_or(|last| now.saturating_sub(last) >= REFRESH_INTERVAL)
    }

    /// Replaces the store with the remote list
    ///
    /// Skipped while a card is in flight so its recorded index stays valid.
    /// Returns whether a refresh happened.
    pub fn refresh(&mut self, now: Duration) -> bool {
        if !self.state.is_idle() {
            tracing::debug!("Refresh skipped while a card is in flight");
            return false;
        }
        let cards = self.service.fetch_cards();
        tracing::info!(count = cards.len(), "Card list refreshed");
        self.store.replace(cards);
        self.last_refresh = Some(now);
        true
    }

    /// Takes the tapped card out of the list and starts the modal
    ///
    /// # Arguments
    /// * `hit` - The list entry that was tapped
    /// * `image` - The card as drawn in the list
    /// * `modal` - Panel geometry sized for that card
    /// * `now` - Time of the tap
    ///
    /// # Returns
    /// `Err` when the modal is busy or the tap no longer matches the store
    pub fn select_card(
        &mut self,
        hit: &CardHit,
        image: Pixmap,
        modal: ModalLayout,
        now: Duration,
    ) -> Result<(), SelectionError> {
        if !self.state.is_idle() {
            return Err(SelectionError::NotIdle);
        }
        if hit.is_placeholder() {
            return Err(SelectionError::Placeholder);
        }
        if self.store.get(hit.index).is_some_and(|card| card.id != hit.id) {
            return Err(SelectionError::Moved {
                index: hit.index,
                expected: hit.id.clone(),
            });
        }

        let card = self.store.remove_at(hit.index)?;
        let animating = AnimatingCard::new(card, hit.rect, hit.index, image, modal);
        self.dispatch(StateEvent::CardSelected(Box::new(animating)), now);
        Ok(())
    }

    pub fn press_undo(&mut self, now: Duration) {
        self.dispatch(StateEvent::UndoPressed, now);
    }

    pub fn press_dismiss(&mut self, now: Duration) {
        self.dispatch(StateEvent::DismissPressed, now);
    }

    /// Advances the clock: background refresh first, then animations and the
    /// dismiss countdown
    pub fn tick(&mut self, now: Duration) {
        if self.refresh_due(now) {
            self.refresh(now);
        }
        self.dispatch(StateEvent::Tick, now);
    }

    fn dispatch(&mut self, event: StateEvent, now: Duration) {
        let state = std::mem::take(&mut self.state);
        let Transition { state, effects } = StateMachine::process_event(state, event, now);
        self.state = state;
        for effect in effects {
            self.apply(effect);
        }
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::Archive(id) => {
                if self.service.archive_card(&id) {
                    tracing::info!(card = %id, "Card archived");
                } else {
                    tracing::warn!(card = %id, "Archive failed, card stays hidden locally");
                }
            }
            Effect::Unarchive(id) => {
                if self.service.unarchive_card(&id) {
                    tracing::info!(card = %id, "Card unarchived");
                } else {
                    tracing::warn!(card = %id, "Unarchive failed, restoring locally anyway");
                }
            }
            Effect::Restore { card, index } => {
                let id = card.id.clone();
                let landed = self.store.insert_at(index, card);
                tracing::debug!(card = %id, index, landed, "Card restored to list");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::{ANIM_DURATION, UNDO_TIMEOUT};
    use crate::domain::Card;
    use crate::domain::core::Rect;
    use crate::service::memory::{InMemoryListService, ServiceCall};

    const FRAME: Duration = Duration::from_millis(16);

    fn controller() -> ModalController<InMemoryListService> {
        let service = InMemoryListService::new(vec![
            Card::new("a", "Buy milk"),
            Card::new("b", "Call Sam"),
        ]);
        let mut controller = ModalController::new(service);
        assert!(controller.refresh(Duration::ZERO));
        controller
    }

    fn hit(index: usize, id: &str, text: &str) -> CardHit {
        CardHit {
            rect: Rect::new(14, 15 + index as i32 * 50, 451, 40),
            index,
            id: CardId::new(id),
            text: text.to_string(),
        }
    }

    fn select_b(controller: &mut ModalController<InMemoryListService>, now: Duration) {
        let image = Pixmap::new(451, 40).unwrap();
        let modal = ModalLayout::compute(480, 320, 40, 20);
        controller
            .select_card(&hit(1, "b", "Call Sam"), image, modal, now)
            .unwrap();
    }

    /// Ticks every frame from `from` until `until`, returning the last time
    fn run_frames(
        controller: &mut ModalController<InMemoryListService>,
        from: Duration,
        until: Duration,
    ) -> Duration {
        let mut now = from;
        while now < until {
            now += FRAME;
            controller.tick(now);
        }
        now
    }

    fn texts(controller: &ModalController<InMemoryListService>) -> Vec<&str> {
        controller.store().cards().iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn selection_removes_card_and_records_origin() {
        let mut controller = controller();
        select_b(&mut controller, Duration::ZERO);

        assert_eq!(texts(&controller), vec!["Buy milk"]);
        let card = controller.state().animating_card().unwrap();
        assert_eq!(card.card, Card::new("b", "Call Sam"));
        assert_eq!(card.origin_index, 1);
        assert!(matches!(controller.state(), ModalState::AnimatingIn { .. }));
    }

    #[test]
    fn undo_restores_order_and_unarchives_once() {
        let mut controller = controller();
        select_b(&mut controller, Duration::ZERO);
        let now = run_frames(&mut controller, Duration::ZERO, ANIM_DURATION);
        assert!(controller.state().is_active());

        controller.press_undo(now);
        let now = run_frames(&mut controller, now, now + ANIM_DURATION);

        assert!(controller.state().is_idle());
        assert_eq!(texts(&controller), vec!["Buy milk", "Call Sam"]);
        let service = controller.service();
        assert_eq!(service.count(&ServiceCall::Unarchive(CardId::new("b"))), 1);
        assert_eq!(service.count(&ServiceCall::Archive(CardId::new("b"))), 0);

        // Nothing further happens once idle
        run_frames(&mut controller, now, now + UNDO_TIMEOUT * 2);
        assert_eq!(texts(&controller), vec!["Buy milk", "Call Sam"]);
    }

    #[test]
    fn dismiss_archives_once_without_reinsertion() {
        let mut controller = controller();
        select_b(&mut controller, Duration::ZERO);
        let now = run_frames(&mut controller, Duration::ZERO, ANIM_DURATION);

        controller.press_dismiss(now);
        controller.press_dismiss(now + FRAME);
        run_frames(&mut controller, now, now + ANIM_DURATION * 2);

        assert!(controller.state().is_idle());
        assert_eq!(texts(&controller), vec!["Buy milk"]);
        assert_eq!(
            controller.service().count(&ServiceCall::Archive(CardId::new("b"))),
            1
        );
        assert!(controller.service().is_archived(&CardId::new("b")));
    }

    #[test]
    fn timeout_archives_exactly_once() {
        let mut controller = controller();
        select_b(&mut controller, Duration::ZERO);
        run_frames(
            &mut controller,
            Duration::ZERO,
            ANIM_DURATION + UNDO_TIMEOUT + Duration::from_secs(3),
        );

        assert!(controller.state().is_idle());
        assert_eq!(texts(&controller), vec!["Buy milk"]);
        assert_eq!(
            controller.service().count(&ServiceCall::Archive(CardId::new("b"))),
            1
        );
    }

    #[test]
    fn buttons_before_active_are_ignored() {
        let mut controller = controller();
        select_b(&mut controller, Duration::ZERO);
        controller.press_undo(FRAME);
        controller.press_dismiss(FRAME);

        assert!(matches!(controller.state(), ModalState::AnimatingIn { .. }));
        assert_eq!(controller.service().calls(), &[ServiceCall::Fetch]);
        assert_eq!(texts(&controller), vec!["Buy milk"]);
    }

    #[test]
    fn failed_unarchive_still_restores() {
        let mut controller = controller();
        select_b(&mut controller, Duration::ZERO);
        let now = run_frames(&mut controller, Duration::ZERO, ANIM_DURATION);

        controller.service.fail_mutations(true);
        controller.press_undo(now);

        assert_eq!(texts(&controller), vec!["Buy milk", "Call Sam"]);
    }

    #[test]
    fn second_selection_is_rejected() {
        let mut controller = controller();
        select_b(&mut controller, Duration::ZERO);

        let image = Pixmap::new(1, 1).unwrap();
        let modal = ModalLayout::compute(480, 320, 40, 20);
        let err = controller
            .select_card(&hit(0, "a", "Buy milk"), image, modal, FRAME)
            .unwrap_err();
        assert_eq!(err, SelectionError::NotIdle);
        assert_eq!(texts(&controller), vec!["Buy milk"]);
    }

    #[test]
    fn placeholder_cannot_be_selected() {
        let mut service = InMemoryListService::new(Vec::new());
        service.fail_fetch_with("connection refused");
        let mut controller = ModalController::new(service);
        controller.refresh(Duration::ZERO);
        assert_eq!(texts(&controller), vec!["Error: connection refused"]);

        let placeholder = CardHit {
            rect: Rect::new(14, 15, 451, 40),
            index: 0,
            id: CardId::new(""),
            text: "Error: connection refused".into(),
        };
        let image = Pixmap::new(1, 1).unwrap();
        let modal = ModalLayout::compute(480, 320, 40, 20);
        let err = controller
            .select_card(&placeholder, image, modal, FRAME)
            .unwrap_err();
        assert_eq!(err, SelectionError::Placeholder);
        assert!(controller.state().is_idle());
    }

    #[test]
    fn stale_selection_aborts() {
        let mut controller = controller();
        let modal = ModalLayout::compute(480, 320, 40, 20);

        let err = controller
            .select_card(&hit(5, "z", "Gone"), Pixmap::new(1, 1).unwrap(), modal, FRAME)
            .unwrap_err();
        assert_eq!(
            err,
            SelectionError::Stale(StoreError::OutOfRange { index: 5, len: 2 })
        );

        let err = controller
            .select_card(&hit(0, "b", "Call Sam"), Pixmap::new(1, 1).unwrap(), modal, FRAME)
            .unwrap_err();
        assert!(matches!(err, SelectionError::Moved { index: 0, .. }));
        assert_eq!(texts(&controller), vec!["Buy milk", "Call Sam"]);
        assert!(controller.state().is_idle());
    }

    #[test]
    fn refresh_runs_on_interval_only_when_idle() {
        let mut controller = controller();
        assert!(!controller.refresh_due(Duration::from_secs(60)));
        assert!(controller.refresh_due(REFRESH_INTERVAL));

        // Interval elapses while a card is in flight: no refresh
        select_b(&mut controller, REFRESH_INTERVAL - FRAME);
        assert!(!controller.refresh(REFRESH_INTERVAL));
        controller.tick(REFRESH_INTERVAL);
        assert_eq!(controller.service().count(&ServiceCall::Fetch), 1);

        // Once the card is archived and the modal closed, the overdue refresh runs
        let now = REFRESH_INTERVAL + ANIM_DURATION;
        controller.tick(now);
        controller.press_dismiss(now);
        run_frames(&mut controller, now, now + ANIM_DURATION * 2);
        assert!(controller.state().is_idle());
        assert_eq!(controller.service().count(&ServiceCall::Fetch), 2);
        assert_eq!(texts(&controller), vec!["Buy milk"]);
    }

    #[test]
    fn refresh_picks_up_remote_changes() {
        let mut controller = controller();
        controller.service.push_remote(Card::new("c", "Water plants"));

        controller.tick(REFRESH_INTERVAL);
        assert_eq!(texts(&controller), vec!["Buy milk", "Call Sam", "Water plants"]);
    }

    #[test]
    fn restore_clamps_to_shrunken_store() {
        let service = InMemoryListService::new(vec![
            Card::new("a", "Buy milk"),
            Card::new("b", "Call Sam"),
            Card::new("c", "Water plants"),
        ]);
        let mut controller = ModalController::new(service);
        controller.refresh(Duration::ZERO);

        let image = Pixmap::new(1, 1).unwrap();
        let modal = ModalLayout::compute(480, 320, 40, 20);
        controller
            .select_card(&hit(2, "c", "Water plants"), image, modal, Duration::ZERO)
            .unwrap();
        controller.store.remove_at(0).unwrap();

        controller.apply(Effect::Restore {
            card: Card::new("c", "Water plants"),
            index: 2,
        });
        assert_eq!(texts(&controller), vec!["Call Sam", "Water plants"]);
    }
}
