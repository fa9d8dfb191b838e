//! Modal state machine
//!
//! The whole interaction lives in [`ModalState`]. Transitions are computed by
//! [`StateMachine::process_event`] from the current state, an event and the
//! current time; remote calls and store mutations come back as [`Effect`]s for
//! the controller to apply. Time is a [`Duration`] since the loop started so
//! tests can drive the clock directly.

use std::time::Duration;

use tiny_skia::Pixmap;

use crate::domain::core::{Point, Rect, lerp, progress_between};
use crate::domain::{Card, CardId};
use crate::ui::modal::ModalLayout;

/// Interval between two background refreshes of the card list
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(120);
/// Length of the slide-in and slide-out animations
pub const ANIM_DURATION: Duration = Duration::from_millis(300);
/// Time the modal waits for Undo before archiving on its own
pub const UNDO_TIMEOUT: Duration = Duration::from_secs(5);

/// The card currently travelling between the list and the modal
///
/// Owns the card itself while it is out of the store, along with a pixel
/// snapshot taken from the list so the moving image matches what was tapped.
#[derive(Debug, Clone)]
pub struct AnimatingCard {
    pub card: Card,
    /// Where the card was drawn in the list when it was selected
    pub origin_rect: Rect,
    /// Position in the store before removal
    pub origin_index: usize,
    pub image: Pixmap,
    pub position: Point,
    /// Card position once the modal is fully shown
    pub target: Point,
    /// Current y of the modal's top edge
    pub modal_top: f32,
    pub modal: ModalLayout,
}

impl AnimatingCard {
    /// Creates a card in flight, still at its list position
    ///
    /// # Arguments
    /// * `card` - The card already removed from the store
    /// * `origin_rect` - Where the card was drawn in the list
    /// * `origin_index` - Store index to restore the card to on Undo
    /// * `image` - Snapshot of the card as drawn in the list
    /// * `modal` - Panel geometry sized for this card
    pub fn new(
        card: Card,
        origin_rect: Rect,
        origin_index: usize,
        image: Pixmap,
        modal: ModalLayout,
    ) -> Self {
        let target = modal.card_position(origin_rect.x as f32, modal.resting_y());
        Self {
            card,
            origin_rect,
            origin_index,
            image,
            position: origin_rect.origin(),
            target,
            modal_top: modal.hidden_y(),
            modal,
        }
    }

    pub fn id(&self) -> &CardId {
        &self.card.id
    }

    /// Slide-in step: modal and card move together on the same progress
    fn slide_in(&mut self, progress: f32) {
        self.modal_top = lerp(self.modal.hidden_y(), self.modal.resting_y(), progress);
        self.position = self.origin_rect.origin().lerp(self.target, progress);
    }

    /// Slide-out step: the card rides along with the modal
    fn slide_out(&mut self, progress: f32) {
        self.modal_top = lerp(self.modal.resting_y(), self.modal.hidden_y(), progress);
        self.position = Point::new(self.target.x, self.modal_top + self.modal.card_offset as f32);
    }
}

/// How an interaction ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Undo was pressed; the card is back in the list
    Restored,
    /// Dismissed or timed out; the card was archived
    Archived,
}

#[derive(Debug, Clone, Default)]
pub enum ModalState {
    /// List shown, nothing in flight
    #[default]
    Idle,
    AnimatingIn {
        card: Box<AnimatingCard>,
        started: Duration,
    },
    /// Modal at rest, waiting for Undo, Dismiss or the timeout
    Active {
        card: Box<AnimatingCard>,
        dismiss_started: Duration,
    },
    AnimatingOut {
        card: Box<AnimatingCard>,
        started: Duration,
        outcome: Outcome,
        /// Timer value when the modal started closing
        dismiss_progress: f32,
    },
}

impl ModalState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }

    pub fn animating_card(&self) -> Option<&AnimatingCard> {
        match self {
            Self::Idle => None,
            Self::AnimatingIn { card, .. }
            | Self::Active { card, .. }
            | Self::AnimatingOut { card, .. } => Some(card.as_ref()),
        }
    }

    /// Id of the card owned by the modal, hidden from the list
    pub fn in_flight(&self) -> Option<&CardId> {
        self.animating_card().map(AnimatingCard::id)
    }

    /// Fraction of the dismiss countdown elapsed at `now`
    pub fn dismiss_progress(&self, now: Duration) -> f32 {
        match self {
            Self::Idle | Self::AnimatingIn { .. } => 0.0,
            Self::Active {
                dismiss_started, ..
            } => progress_between(*dismiss_started, now, UNDO_TIMEOUT),
            Self::AnimatingOut {
                dismiss_progress, ..
            } => *dismiss_progress,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AnimatingIn { .. } => "animating_in",
            Self::Active { .. } => "active",
            Self::AnimatingOut { .. } => "animating_out",
        }
    }
}

/// Inputs to the state machine
#[derive(Debug, Clone)]
pub enum StateEvent {
    /// A card was tapped in the list and already removed from the store
    CardSelected(Box<AnimatingCard>),
    UndoPressed,
    DismissPressed,
    /// One frame elapsed
    Tick,
}

/// Side effects requested by a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Archive(CardId),
    Unarchive(CardId),
    /// Put the card back into the store at `index`
    Restore { card: Card, index: usize },
}

#[derive(Debug, Clone)]
pub struct Transition {
    pub state: ModalState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn to(state: ModalState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    fn with(state: ModalState, effects: Vec<Effect>) -> Self {
        Self { state, effects }
    }
}

/// State machine for the confirmation modal
pub struct StateMachine;

impl StateMachine {
    /// Processes one event at time `now`
    ///
    /// Events that make no sense in the current state are ignored and the
    /// state is returned unchanged.
    ///
    /// # Arguments
    /// * `state` - Current modal state, consumed
    /// * `event` - Event to process
    /// * `now` - Time since startup, used for animations and the countdown
    ///
    /// # Returns
    /// The next state and the effects the caller must apply, in order
    pub fn process_event(state: ModalState, event: StateEvent, now: Duration) -> Transition {
        let from = state.name();
        let transition = match (state, event) {
            (ModalState::Idle, StateEvent::CardSelected(card)) => {
                tracing::info!(card = %card.id(), index = card.origin_index, "Card selected");
                Transition::to(ModalState::AnimatingIn { card, started: now })
            }

            (ModalState::AnimatingIn { mut card, started }, StateEvent::Tick) => {
                let progress = progress_between(started, now, ANIM_DURATION);
                card.slide_in(progress);
                if progress >= 1.0 {
                    Transition::to(ModalState::Active {
                        card,
                        dismiss_started: now,
                    })
                } else {
                    Transition::to(ModalState::AnimatingIn { card, started })
                }
            }

            (
                ModalState::Active {
                    card,
                    dismiss_started,
                },
                StateEvent::UndoPressed,
            ) => {
                let effects = vec![
                    Effect::Unarchive(card.id().clone()),
                    Effect::Restore {
                        card: card.card.clone(),
                        index: card.origin_index,
                    },
                ];
                let dismiss_progress = progress_between(dismiss_started, now, UNDO_TIMEOUT);
                Transition::with(
                    Self::closing(card, now, Outcome::Restored, dismiss_progress),
                    effects,
                )
            }

            (
                ModalState::Active {
                    card,
                    dismiss_started,
                },
                StateEvent::DismissPressed,
            ) => {
                let dismiss_progress = progress_between(dismiss_started, now, UNDO_TIMEOUT);
                Self::archive(card, now, dismiss_progress)
            }

            (
                ModalState::Active {
                    card,
                    dismiss_started,
                },
                StateEvent::Tick,
            ) => {
                if progress_between(dismiss_started, now, UNDO_TIMEOUT) >= 1.0 {
                    tracing::info!(card = %card.id(), "Undo window expired");
                    Self::archive(card, now, 1.0)
                } else {
                    Transition::to(ModalState::Active {
                        card,
                        dismiss_started,
                    })
                }
            }

            (
                ModalState::AnimatingOut {
                    mut card,
                    started,
                    outcome,
                    dismiss_progress,
                },
                StateEvent::Tick,
            ) => {
                let progress = progress_between(started, now, ANIM_DURATION);
                card.slide_out(progress);
                if progress >= 1.0 {
                    tracing::debug!(card = %card.id(), ?outcome, "Modal closed");
                    Transition::to(ModalState::Idle)
                } else {
                    Transition::to(ModalState::AnimatingOut {
                        card,
                        started,
                        outcome,
                        dismiss_progress,
                    })
                }
            }

            // Invalid transitions - ignore event
            (state, event) => {
                if !matches!(event, StateEvent::Tick) {
                    tracing::trace!(state = state.name(), ?event, "Ignored event");
                }
                Transition::to(state)
            }
        };

        let to = transition.state.name();
        if from != to {
            tracing::debug!(from, to, "Modal state changed");
        }
        transition
    }

    fn archive(card: Box<AnimatingCard>, now: Duration, dismiss_progress: f32) -> Transition {
        let effects = vec![Effect::Archive(card.id().clone())];
        Transition::with(
            Self::closing(card, now, Outcome::Archived, dismiss_progress),
            effects,
        )
    }

    fn closing(
        card: Box<AnimatingCard>,
        now: Duration,
        outcome: Outcome,
        dismiss_progress: f32,
    ) -> ModalState {
        ModalState::AnimatingOut {
            card,
            started: now,
            outcome,
            dismiss_progress,
        }
    }
}
