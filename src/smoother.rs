// Fingertip -> screen cursor: fixed proportional mapping about the screen centre,
// then an exponential moving average per axis.

use crate::types::{Landmark, Point};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenMapping {
    pub camera: (u32, u32),
    pub screen: (u32, u32),
    pub sensitivity: f32,
}

impl ScreenMapping {
    /// Raw screen target for a normalized landmark, clamped to the screen.
    pub fn target(&self, lm: Landmark) -> (f32, f32) {
        (
            axis_target(lm.x, self.camera.0, self.screen.0, self.sensitivity),
            axis_target(lm.y, self.camera.1, self.screen.1, self.sensitivity),
        )
    }
}

fn axis_target(norm: f32, cam: u32, screen: u32, sensitivity: f32) -> f32 {
    let cam = cam.max(1) as f32;
    let screen = screen.max(1) as f32;
    let offset = norm * cam - cam / 2.0;            // camera pixels from centre
    let target = screen / 2.0 + offset * (screen / cam) * sensitivity;
    target.clamp(0.0, screen - 1.0)
}

#[derive(Debug, Clone)]
pub struct CursorSmoother {
    mapping: ScreenMapping,
    alpha: f32,
    smoothed: (f32, f32),
}

impl CursorSmoother {
    /// Starts at the screen centre. `alpha` is clamped into (0, 1].
    pub fn new(mapping: ScreenMapping, alpha: f32) -> Self {
        let center = (mapping.screen.0 as f32 / 2.0, mapping.screen.1 as f32 / 2.0);
        Self { mapping, alpha: alpha.clamp(f32::EPSILON, 1.0), smoothed: center }
    }

    /// Advance one frame towards the landmark's target; returns the new cursor.
    pub fn update(&mut self, lm: Landmark) -> Point {
        let (tx, ty) = self.mapping.target(lm);
        let a = self.alpha;
        self.smoothed.0 = a * tx + (1.0 - a) * self.smoothed.0;
        self.smoothed.1 = a * ty + (1.0 - a) * self.smoothed.1;
        self.position()
    }

    pub fn position(&self) -> Point {
        Point::new(self.smoothed.0.round() as i32, self.smoothed.1.round() as i32)
    }

    #[cfg(test)]
    pub fn smoothed(&self) -> (f32, f32) {
        self.smoothed
    }

    pub fn mapping(&self) -> &ScreenMapping {
        &self.mapping
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(sensitivity: f32) -> ScreenMapping {
        ScreenMapping { camera: (320, 240), screen: (1920, 1080), sensitivity }
    }

    fn at(x: f32, y: f32) -> Landmark {
        Landmark::new(x, y, 0.0)
    }

    #[test]
    fn centre_of_camera_maps_to_centre_of_screen() {
        assert_eq!(mapping(0.5).target(at(0.5, 0.5)), (960.0, 540.0));
    }

    #[test]
    fn offsets_scale_by_screen_ratio_and_sensitivity() {
        // 0.75 * 320 = 240 -> +80 camera px -> *6 -> *0.5 = +240 screen px.
        let (x, y) = mapping(0.5).target(at(0.75, 0.25));
        assert!((x - 1200.0).abs() < 1e-3);
        // 0.25 * 240 = 60 -> -60 -> *4.5 -> *0.5 = -135.
        assert!((y - 405.0).abs() < 1e-3);
    }

    #[test]
    fn targets_are_clamped_to_the_screen() {
        let (x, y) = mapping(3.0).target(at(1.0, 0.0));
        assert_eq!(x, 1919.0);
        assert_eq!(y, 0.0);
    }

    #[test]
    fn alpha_one_has_no_lag() {
        let mut s = CursorSmoother::new(mapping(1.0), 1.0);
        for lm in [at(0.1, 0.9), at(0.7, 0.3), at(0.5, 0.5)] {
            let (tx, ty) = s.mapping().target(lm);
            s.update(lm);
            assert_eq!(s.smoothed(), (tx, ty));
        }
    }

    #[test]
    fn small_alpha_converges_without_arriving() {
        let mut s = CursorSmoother::new(mapping(1.0), 0.05);
        let lm = at(0.9, 0.5);
        let (tx, _) = s.mapping().target(lm);
        let mut last_gap = (tx - s.smoothed().0).abs();
        for _ in 0..40 {
            s.update(lm);
            let gap = (tx - s.smoothed().0).abs();
            assert!(gap < last_gap);
            assert!(gap > 0.0);
            last_gap = gap;
        }
    }

    #[test]
    fn output_stays_between_previous_and_target() {
        let mut s = CursorSmoother::new(mapping(0.8), 0.2);
        let path = [at(0.2, 0.8), at(0.9, 0.1), at(0.4, 0.6), at(0.6, 0.4), at(0.0, 1.0)];
        for lm in path {
            let prev = s.smoothed();
            let (tx, ty) = s.mapping().target(lm);
            s.update(lm);
            let (sx, sy) = s.smoothed();
            assert!(sx >= prev.0.min(tx) - 1e-3 && sx <= prev.0.max(tx) + 1e-3);
            assert!(sy >= prev.1.min(ty) - 1e-3 && sy <= prev.1.max(ty) + 1e-3);
        }
    }

    #[test]
    fn starts_at_screen_centre() {
        let s = CursorSmoother::new(mapping(0.5), 0.2);
        assert_eq!(s.position(), Point::new(960, 540));
    }
}
