//! Main loop
//!
//! One thread, fixed tick. Each tick polls the surface for input, applies
//! it, advances the controller clock, redraws the whole frame and presents
//! it once. Remote calls made by the controller block the tick they run in.

use std::thread;
use std::time::{Duration, Instant};

use tiny_skia::Pixmap;

use crate::app::context::AppContext;
use crate::app::controller::ModalController;
use crate::app::state::ModalState;
use crate::domain::CardBlock;
use crate::error::AppError;
use crate::platform::{DisplaySurface, SurfaceEvent};
use crate::service::ListService;
use crate::ui::list_view::{CardHit, hit_test, render_list};
use crate::ui::modal::{ModalFrame, ModalHits, ModalLayout, render_modal};
use crate::ui::renderer::{RenderError, new_pixmap, render_card_snapshot};

/// Whether the loop keeps going after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App<S: ListService> {
    ctx: AppContext,
    controller: ModalController<S>,
    frame: Pixmap,
    /// Cards as drawn in the last frame
    list_hits: Vec<CardHit>,
    /// Buttons as drawn in the last frame, while the modal is visible
    modal_hits: Option<ModalHits>,
}

impl<S: ListService> App<S> {
    /// Creates the app and loads the list for the first time
    pub fn new(ctx: AppContext, service: S) -> Result<Self, RenderError> {
        let frame = new_pixmap(ctx.screen.w.max(1) as u32, ctx.screen.h.max(1) as u32)?;
        let mut controller = ModalController::new(service);
        controller.refresh(Duration::ZERO);
        Ok(Self {
            ctx,
            controller,
            frame,
            list_hits: Vec::new(),
            modal_hits: None,
        })
    }

    pub fn controller(&self) -> &ModalController<S> {
        &self.controller
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.frame
    }

    pub fn list_hits(&self) -> &[CardHit] {
        &self.list_hits
    }

    pub fn modal_hits(&self) -> Option<ModalHits> {
        self.modal_hits
    }

    /// Runs one tick at `now`: input first, then timers, then drawing
    pub fn frame(&mut self, now: Duration, events: &[SurfaceEvent]) -> Result<Flow, RenderError> {
        for event in events {
            match *event {
                SurfaceEvent::Escape | SurfaceEvent::Quit => {
                    tracing::info!(?event, "Shutting down");
                    return Ok(Flow::Quit);
                }
                SurfaceEvent::PointerDown { x, y } => self.pointer_down(x, y, now)?,
            }
        }

        self.controller.tick(now);
        self.render(now);
        Ok(Flow::Continue)
    }

    fn pointer_down(&mut self, x: i32, y: i32, now: Duration) -> Result<(), RenderError> {
        let state = self.controller.state();
        let (idle, active) = (state.is_idle(), state.is_active());
        if idle {
            let Some(hit) = hit_test(&self.list_hits, x, y).cloned() else {
                return Ok(());
            };
            if hit.is_placeholder() {
                return Ok(());
            }
            self.select(hit, now)?;
        } else if active {
            let Some(buttons) = self.modal_hits else {
                return Ok(());
            };
            if buttons.undo.contains_point(x, y) {
                self.controller.press_undo(now);
            } else if buttons.dismiss.contains_point(x, y) {
                self.controller.press_dismiss(now);
            }
        }
        Ok(())
    }

    fn select(&mut self, hit: CardHit, now: Duration) -> Result<(), RenderError> {
        let font = self.ctx.font.as_ref();
        let block = CardBlock::layout(&hit.text, hit.rect.w, font);
        let image = render_card_snapshot(font, &self.ctx.theme, &block, hit.rect.w)?;
        let modal = ModalLayout::compute(
            self.ctx.screen.w,
            self.ctx.screen.h,
            block.height,
            self.ctx.line_height(),
        );

        if let Err(err) = self.controller.select_card(&hit, image, modal, now) {
            tracing::debug!(error = %err, card = %hit.id, "Selection ignored");
        }
        Ok(())
    }

    fn render(&mut self, now: Duration) {
        let Self {
            ctx,
            controller,
            frame,
            list_hits,
            modal_hits,
        } = self;
        let state: &ModalState = controller.state();
        let font = ctx.font.as_ref();

        frame.fill(ctx.theme.background);
        *list_hits = render_list(frame, font, &ctx.theme, controller.store(), state.in_flight());
        *modal_hits = state.animating_card().map(|card| {
            let modal_frame = ModalFrame {
                top: card.modal_top,
                card_image: &card.image,
                card_position: card.position,
                dismiss_progress: state.dismiss_progress(now),
            };
            render_modal(frame, font, &ctx.theme, &card.modal, &modal_frame)
        });
    }
}

/// Drives `app` against `surface` at `tick_rate` frames per second until quit
pub fn run<S, D>(app: &mut App<S>, surface: &mut D, tick_rate: u32) -> Result<(), AppError>
where
    S: ListService,
    D: DisplaySurface,
{
    let period = Duration::from_secs_f64(1.0 / f64::from(tick_rate.max(1)));
    let started = Instant::now();
    tracing::info!(tick_rate, "Main loop started");

    loop {
        let tick_started = Instant::now();
        let events = surface.poll_events()?;
        if app.frame(started.elapsed(), &events)? == Flow::Quit {
            break;
        }
        surface.present(app.pixmap())?;

        if let Some(rest) = period.checked_sub(tick_started.elapsed()) {
            thread::sleep(rest);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::{ANIM_DURATION, UNDO_TIMEOUT};
    use crate::domain::{Card, CardId};
    use crate::platform::HeadlessSurface;
    use crate::service::memory::{InMemoryListService, ServiceCall};
    use crate::ui::text::testing::BarPainter;

    const FRAME: Duration = Duration::from_millis(16);

    fn app() -> App<InMemoryListService> {
        let service = InMemoryListService::new(vec![
            Card::new("a", "Buy milk"),
            Card::new("b", "Call Sam"),
        ]);
        let ctx = AppContext::new(480, 320, Box::new(BarPainter::default()));
        App::new(ctx, service).unwrap()
    }

    fn tap(rect: crate::domain::core::Rect) -> SurfaceEvent {
        SurfaceEvent::PointerDown {
            x: rect.x + rect.w / 2,
            y: rect.y + rect.h / 2,
        }
    }

    /// Renders idle frames from `from` until `until`
    fn advance(app: &mut App<InMemoryListService>, from: Duration, until: Duration) -> Duration {
        let mut now = from;
        while now < until {
            now += FRAME;
            assert_eq!(app.frame(now, &[]).unwrap(), Flow::Continue);
        }
        now
    }

    fn ids(app: &App<InMemoryListService>) -> Vec<&str> {
        app.list_hits().iter().map(|h| h.id.as_str()).collect()
    }

    #[test]
    fn first_frame_draws_the_list() {
        let mut app = app();
        app.frame(Duration::ZERO, &[]).unwrap();
        assert_eq!(ids(&app), vec!["a", "b"]);
        assert!(app.modal_hits().is_none());
    }

    #[test]
    fn tap_then_undo_restores_the_list() {
        let mut app = app();
        app.frame(Duration::ZERO, &[]).unwrap();
        let target = app.list_hits()[1].rect;

        app.frame(FRAME, &[tap(target)]).unwrap();
        assert_eq!(ids(&app), vec!["a"]);
        assert!(app.modal_hits().is_some());

        let now = advance(&mut app, FRAME, FRAME + ANIM_DURATION);
        assert!(app.controller().state().is_active());

        let undo = app.modal_hits().unwrap().undo;
        let now = now + FRAME;
        app.frame(now, &[tap(undo)]).unwrap();
        // Back in the store but hidden while the modal slides away
        assert!(app.controller().store().contains(&CardId::new("b")));
        assert_eq!(ids(&app), vec!["a"]);

        advance(&mut app, now, now + ANIM_DURATION);
        assert!(app.controller().state().is_idle());
        assert_eq!(ids(&app), vec!["a", "b"]);
        assert!(app.modal_hits().is_none());
        assert_eq!(
            app.controller()
                .service()
                .count(&ServiceCall::Unarchive(CardId::new("b"))),
            1
        );
    }

    #[test]
    fn tap_then_dismiss_archives() {
        let mut app = app();
        app.frame(Duration::ZERO, &[]).unwrap();
        let target = app.list_hits()[0].rect;
        app.frame(FRAME, &[tap(target)]).unwrap();
        let now = advance(&mut app, FRAME, FRAME + ANIM_DURATION);

        let dismiss = app.modal_hits().unwrap().dismiss;
        app.frame(now + FRAME, &[tap(dismiss), tap(dismiss)]).unwrap();
        advance(&mut app, now + FRAME, now + FRAME + ANIM_DURATION);

        assert_eq!(ids(&app), vec!["b"]);
        assert_eq!(
            app.controller()
                .service()
                .count(&ServiceCall::Archive(CardId::new("a"))),
            1
        );
    }

    #[test]
    fn untouched_modal_times_out() {
        let mut app = app();
        app.frame(Duration::ZERO, &[]).unwrap();
        let target = app.list_hits()[1].rect;
        app.frame(FRAME, &[tap(target)]).unwrap();
        advance(
            &mut app,
            FRAME,
            FRAME + ANIM_DURATION * 2 + UNDO_TIMEOUT + FRAME * 4,
        );

        assert!(app.controller().state().is_idle());
        assert_eq!(ids(&app), vec!["a"]);
        assert_eq!(
            app.controller()
                .service()
                .count(&ServiceCall::Archive(CardId::new("b"))),
            1
        );
    }

    #[test]
    fn taps_outside_targets_do_nothing() {
        let mut app = app();
        app.frame(Duration::ZERO, &[]).unwrap();
        app.frame(FRAME, &[SurfaceEvent::PointerDown { x: 2, y: 300 }])
            .unwrap();
        assert!(app.controller().state().is_idle());

        // A list tap while the modal is open is ignored
        let first = app.list_hits()[0].rect;
        let second = app.list_hits()[1].rect;
        app.frame(FRAME * 2, &[tap(second)]).unwrap();
        app.frame(FRAME * 3, &[tap(first)]).unwrap();
        let card = app.controller().state().animating_card().unwrap();
        assert_eq!(card.card.id, CardId::new("b"));
        assert_eq!(app.controller().store().len(), 1);
    }

    #[test]
    fn placeholder_card_is_not_tappable() {
        let mut service = InMemoryListService::new(Vec::new());
        service.fail_fetch_with("timed out");
        let ctx = AppContext::new(320, 480, Box::new(BarPainter::default()));
        let mut app = App::new(ctx, service).unwrap();

        app.frame(Duration::ZERO, &[]).unwrap();
        let placeholder = app.list_hits()[0].clone();
        assert_eq!(placeholder.text, "Error: timed out");

        app.frame(FRAME, &[tap(placeholder.rect)]).unwrap();
        assert!(app.controller().state().is_idle());
        assert_eq!(app.controller().store().len(), 1);
    }

    #[test]
    fn escape_and_quit_stop_the_loop() {
        let mut app = app();
        assert_eq!(app.frame(FRAME, &[SurfaceEvent::Escape]).unwrap(), Flow::Quit);
        assert_eq!(app.frame(FRAME, &[SurfaceEvent::Quit]).unwrap(), Flow::Quit);
    }

    #[test]
    fn run_presents_every_frame_until_quit() {
        let mut app = app();
        let mut surface = HeadlessSurface::new(480, 320);
        surface.idle_frames(3);

        run(&mut app, &mut surface, 240).unwrap();
        assert_eq!(surface.presented(), 3);

        let frame = surface.last_frame().unwrap();
        let card = app.list_hits()[0].rect;
        let px = frame
            .pixel((card.x + card.w / 2) as u32, (card.y + 2) as u32)
            .unwrap();
        assert_eq!((px.red(), px.green(), px.blue()), (40, 40, 40));
        let corner = frame.pixel(0, 0).unwrap();
        assert_eq!((corner.red(), corner.alpha()), (0, 255));
    }

    #[test]
    fn run_rejects_mismatched_surface() {
        let mut app = app();
        let mut surface = HeadlessSurface::new(320, 480);
        surface.idle_frames(1);
        assert!(matches!(
            run(&mut app, &mut surface, 60),
            Err(AppError::Surface(_))
        ));
    }
}
