// The shared gesture capabilities both modes are built from:
// cursor smoothing and the two click debouncers.

use log::debug;

use crate::analyzer::ClickTriggers;
use crate::debounce::{ButtonEvent, ButtonPhase, ClickDebouncer, MouseButton};
use crate::smoother::{CursorSmoother, ScreenMapping};
use crate::types::{Hand, Point, landmarks::INDEX_TIP};

pub struct GestureEngine {
    left: ClickDebouncer,
    right: ClickDebouncer,
    smoother: CursorSmoother,
    seen_hand: bool,
}

impl GestureEngine {
    pub fn new(mapping: ScreenMapping, smoothing_alpha: f32, stability_frames: u32) -> Self {
        Self {
            left: ClickDebouncer::new(stability_frames),
            right: ClickDebouncer::new(stability_frames),
            smoother: CursorSmoother::new(mapping, smoothing_alpha),
            seen_hand: false,
        }
    }

    /// Advance the cursor from the index fingertip. Without a hand the smoother is
    /// left alone and None comes back; `cursor()` still holds the last position.
    pub fn track_cursor(&mut self, hand: Option<&Hand>) -> Option<Point> {
        let hand = hand?;
        self.seen_hand = true;
        Some(self.smoother.update(hand.get(INDEX_TIP)))
    }

    /// Debounce this frame's click triggers. A missing hand counts as no trigger.
    pub fn update_clicks(&mut self, hand: Option<&Hand>) -> Vec<(MouseButton, ButtonEvent)> {
        let triggers = hand.map(ClickTriggers::from_hand).unwrap_or_default();
        let mut events = Vec::new();
        if let Some(e) = self.left.update(triggers.left) {
            events.push((MouseButton::Left, e));
        }
        if let Some(e) = self.right.update(triggers.right) {
            events.push((MouseButton::Right, e));
        }
        for (button, event) in &events {
            debug!("{button:?} {event:?}");
        }
        events
    }

    /// Current smoothed cursor (screen centre until the first hand).
    pub fn cursor(&self) -> Point {
        self.smoother.position()
    }

    /// (left, right) debounce state, for the HUD.
    pub fn button_phases(&self) -> (ButtonPhase, ButtonPhase) {
        (self.left.phase(), self.right.phase())
    }

    pub fn screen(&self) -> (u32, u32) {
        self.smoother.mapping().screen
    }

    pub fn has_seen_hand(&self) -> bool {
        self.seen_hand
    }
}
