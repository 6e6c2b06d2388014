// The two control strategies built on GestureEngine, picked once at startup.

use clap::ValueEnum;
use log::info;

use crate::analyzer::index_extended;
use crate::canvas::DrawSurface;
use crate::debounce::{ButtonEvent, ButtonPhase};
use crate::engine::GestureEngine;
use crate::pointer::PointerSink;
use crate::stroke::StrokeTracker;
use crate::types::{Hand, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Move the cursor and click with index/middle finger
    Mouse,
    /// Move the cursor and paint strokes while the index finger is up
    Draw,
}

/// Side-effect targets for one frame.
pub struct Outputs<'a> {
    pub pointer: &'a mut dyn PointerSink,
    pub surface: &'a mut dyn DrawSurface,
}

pub trait ControlMode {
    fn name(&self) -> &'static str;

    /// Update state from this frame's hand (None = nothing detected).
    fn step(&mut self, engine: &mut GestureEngine, hand: Option<&Hand>, out: &mut Outputs<'_>);

    /// Short state line for the HUD.
    fn status(&self, engine: &GestureEngine) -> String;

    /// The clear key. Modes without a drawing do nothing.
    fn clear(&mut self, _surface: &mut dyn DrawSurface) {}
}

pub fn build(mode: Mode, brush_color: u32, brush_width: u32) -> Box<dyn ControlMode> {
    match mode {
        Mode::Mouse => Box::new(MouseMode),
        Mode::Draw => Box::new(DrawMode::new(brush_color, brush_width)),
    }
}

/// Proportional screen -> surface conversion (surface is usually the preview).
pub fn screen_to_surface(p: Point, screen: (u32, u32), surface: (usize, usize)) -> Point {
    let sx = surface.0 as f32 / screen.0.max(1) as f32;
    let sy = surface.1 as f32 / screen.1.max(1) as f32;
    Point::new((p.x as f32 * sx).round() as i32, (p.y as f32 * sy).round() as i32)
}

fn phase_text(phase: ButtonPhase) -> String {
    match phase {
        ButtonPhase::Idle => "-".into(),
        ButtonPhase::Arming(n) => n.to_string(),
        ButtonPhase::Pressed => "DOWN".into(),
    }
}

pub struct MouseMode;

impl ControlMode for MouseMode {
    fn name(&self) -> &'static str {
        "MOUSE"
    }

    fn step(&mut self, engine: &mut GestureEngine, hand: Option<&Hand>, out: &mut Outputs<'_>) {
        if let Some(p) = engine.track_cursor(hand) {
            out.pointer.move_cursor(p);
        }
        for (button, event) in engine.update_clicks(hand) {
            if event == ButtonEvent::Pressed {
                out.pointer.click(button);
            }
        }
    }

    fn status(&self, engine: &GestureEngine) -> String {
        let (left, right) = engine.button_phases();
        format!("L:{} R:{}", phase_text(left), phase_text(right))
    }
}

pub struct DrawMode {
    tracker: StrokeTracker,
    color: u32,
    width: u32,
}

impl DrawMode {
    pub fn new(color: u32, width: u32) -> Self {
        Self { tracker: StrokeTracker::new(), color, width }
    }
}

impl ControlMode for DrawMode {
    fn name(&self) -> &'static str {
        "DRAW"
    }

    fn step(&mut self, engine: &mut GestureEngine, hand: Option<&Hand>, out: &mut Outputs<'_>) {
        if let Some(p) = engine.track_cursor(hand) {
            out.pointer.move_cursor(p);
        }

        // Only a hand seen this frame can hold the pen down.
        let held = hand.is_some_and(index_extended);
        let here = screen_to_surface(engine.cursor(), engine.screen(), out.surface.size());
        if let Some(seg) = self.tracker.update(held, here) {
            out.surface.draw_line(seg.from, seg.to, self.color, self.width);
        }
    }

    fn status(&self, _engine: &GestureEngine) -> String {
        if self.tracker.pen_down() { "PEN DOWN".into() } else { "PEN UP".into() }
    }

    fn clear(&mut self, surface: &mut dyn DrawSurface) {
        info!("Canvas cleared");
        surface.clear();
    }
}


#[cfg(test)]
mod tests {
    use super::recorders::{RecordingPointer, RecordingSurface};
    use super::*;
    use crate::debounce::MouseButton;
    use crate::smoother::ScreenMapping;
    use crate::types::fixtures::{fist, pose, with_index_tip_at};

    fn engine() -> GestureEngine {
        let mapping = ScreenMapping { camera: (320, 240), screen: (640, 480), sensitivity: 1.0 };
        GestureEngine::new(mapping, 1.0, 3)
    }

    fn run(mode: &mut dyn ControlMode, engine: &mut GestureEngine, frames: &[Option<crate::types::Hand>])
        -> (RecordingPointer, RecordingSurface) {
        let mut pointer = RecordingPointer::default();
        let mut surface = RecordingSurface::new(320, 240);
        for hand in frames {
            let mut out = Outputs { pointer: &mut pointer, surface: &mut surface };
            mode.step(engine, hand.as_ref(), &mut out);
        }
        (pointer, surface)
    }

    #[test]
    fn mouse_mode_moves_and_clicks_once() {
        let index_up = pose([false, true, false, false, false]);
        let frames = vec![Some(index_up); 5];
        let (pointer, surface) = run(&mut MouseMode, &mut engine(), &frames);
        assert_eq!(pointer.moves.len(), 5);
        assert_eq!(pointer.clicks, vec![MouseButton::Left]);
        assert!(surface.lines.is_empty());
    }

    #[test]
    fn mouse_mode_sends_nothing_without_a_hand() {
        let index_up = pose([false, true, false, false, false]);
        let mut frames = vec![Some(index_up); 2];
        frames.extend(std::iter::repeat_n(None, 10));
        let mut e = engine();
        let (pointer, _) = run(&mut MouseMode, &mut e, &frames);
        assert_eq!(pointer.moves.len(), 2);
        assert!(pointer.clicks.is_empty());
        assert_eq!(e.cursor(), pointer.moves[1]);
    }

    #[test]
    fn mouse_mode_both_fingers_click_nothing() {
        let both = pose([false, true, true, false, false]);
        let (pointer, _) = run(&mut MouseMode, &mut engine(), &vec![Some(both); 6]);
        assert!(pointer.clicks.is_empty());
    }

    #[test]
    fn draw_mode_emits_one_segment_per_held_frame_after_the_first() {
        let up = pose([false, true, false, false, false]);
        let frames: Vec<_> = (0..4)
            .map(|i| Some(with_index_tip_at(&up, 0.3 + 0.1 * i as f32, 0.5)))
            .collect();
        let mut mode = DrawMode::new(0x00FF_0000, 4);
        let (pointer, surface) = run(&mut mode, &mut engine(), &frames);
        assert_eq!(pointer.moves.len(), 4);
        assert_eq!(surface.lines.len(), 3);
        // Screen 640x480 -> surface 320x240 halves every coordinate.
        assert_eq!(surface.lines[0].0, Point::new(96, 120));
    }

    #[test]
    fn draw_mode_lifts_the_pen_when_the_gesture_drops() {
        let up = pose([false, true, false, false, false]);
        let frames = vec![
            Some(with_index_tip_at(&up, 0.3, 0.5)),
            Some(with_index_tip_at(&up, 0.4, 0.5)),
            Some(with_index_tip_at(&fist(), 0.5, 0.5)),
            None,
            Some(with_index_tip_at(&up, 0.6, 0.5)),
            Some(with_index_tip_at(&up, 0.7, 0.5)),
        ];
        let mut mode = DrawMode::new(0x00FF_0000, 4);
        let (pointer, surface) = run(&mut mode, &mut engine(), &frames);
        // The handless frame neither moves the cursor nor keeps the pen down.
        assert_eq!(pointer.moves.len(), 5);
        assert_eq!(surface.lines.len(), 2);
        let (from, _) = surface.lines[1];
        assert_eq!(from, Point::new(192, 120));
    }

    #[test]
    fn status_reports_debounce_and_pen() {
        let mut e = engine();
        let index_up = pose([false, true, false, false, false]);
        let mut mouse = MouseMode;
        let (_, _) = run(&mut mouse, &mut e, &[Some(index_up.clone()), Some(index_up.clone())]);
        assert_eq!(mouse.status(&e), "L:2 R:-");
        run(&mut mouse, &mut e, &[Some(index_up.clone())]);
        assert_eq!(mouse.status(&e), "L:DOWN R:-");

        let mut draw = DrawMode::new(0, 1);
        assert_eq!(draw.status(&e), "PEN UP");
        run(&mut draw, &mut e, &[Some(index_up)]);
        assert_eq!(draw.status(&e), "PEN DOWN");
    }

    #[test]
    fn only_draw_mode_clears() {
        let mut surface = RecordingSurface::new(10, 10);
        MouseMode.clear(&mut surface);
        assert_eq!(surface.clears, 0);
        DrawMode::new(0, 1).clear(&mut surface);
        assert_eq!(surface.clears, 1);
    }

    #[test]
    fn surface_conversion_is_proportional() {
        assert_eq!(screen_to_surface(Point::new(1920, 1080), (1920, 1080), (320, 240)), Point::new(320, 240));
        assert_eq!(screen_to_surface(Point::new(960, 540), (1920, 1080), (320, 240)), Point::new(160, 120));
    }
}
