// Pen state for Draw mode: a segment per frame while the gesture is held,
// and a pen lift as soon as it is released.

use crate::types::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

#[derive(Debug, Clone, Default)]
pub struct StrokeTracker {
    previous: Option<Point>,
}

impl StrokeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one frame. The first held frame of a stroke only sets the pen down.
    pub fn update(&mut self, held: bool, current: Point) -> Option<Segment> {
        if !held {
            self.previous = None;
            return None;
        }
        let segment = self.previous.map(|from| Segment { from, to: current });
        self.previous = Some(current);
        segment
    }

    pub fn pen_down(&self) -> bool {
        self.previous.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(frames: &[(bool, i32)]) -> Vec<Segment> {
        let mut t = StrokeTracker::new();
        frames.iter().filter_map(|&(held, x)| t.update(held, Point::new(x, 0))).collect()
    }

    #[test]
    fn held_run_emits_length_minus_one_segments() {
        let segs = run(&[(true, 0), (true, 1), (true, 2), (true, 3)]);
        assert_eq!(segs.len(), 3);
        assert_eq!(segs[0], Segment { from: Point::new(0, 0), to: Point::new(1, 0) });
        assert_eq!(segs[2], Segment { from: Point::new(2, 0), to: Point::new(3, 0) });
    }

    #[test]
    fn single_held_frame_draws_nothing() {
        assert!(run(&[(true, 5)]).is_empty());
        assert!(run(&[(false, 5), (false, 6)]).is_empty());
    }

    #[test]
    fn release_starts_a_fresh_stroke() {
        let segs = run(&[(true, 0), (true, 1), (false, 2), (true, 10), (true, 11)]);
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[1], Segment { from: Point::new(10, 0), to: Point::new(11, 0) });
        assert!(segs.iter().all(|s| !(s.from.x == 1 && s.to.x == 10)));
    }

    #[test]
    fn pen_lifts_on_release() {
        let mut t = StrokeTracker::new();
        t.update(true, Point::new(1, 1));
        assert!(t.pen_down());
        t.update(false, Point::new(1, 1));
        assert!(!t.pen_down());
    }
}
