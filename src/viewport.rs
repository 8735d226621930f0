use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

pub const MIN_ZOOM: f32 = 0.5;
pub const MAX_ZOOM: f32 = 2.0;
pub const ZOOM_STEP: f32 = 0.1;

/// Pan and zoom transform applied uniformly to everything drawn on the canvas.
///
/// `x` and `y` are the pan offset in screen pixels relative to the canvas origin, `zoom` is the
/// scale factor. Logical coordinates map to screen coordinates as `logical * zoom + pan`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.,
            y: 0.,
            zoom: 1.,
        }
    }
}

impl Viewport {
    pub fn pan(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn pan_by(&mut self, screen_delta: Vec2) {
        self.x += screen_delta.x;
        self.y += screen_delta.y;
    }

    pub fn zoom_in(&mut self) {
        self.zoom_by(ZOOM_STEP, MIN_ZOOM, MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_by(-ZOOM_STEP, MIN_ZOOM, MAX_ZOOM);
    }

    /// Adds `step` to the zoom factor and clamps the result to `[min, max]`.
    ///
    /// Swapped bounds are reordered and a NaN bound is ignored, so host supplied settings can
    /// never panic here.
    pub fn zoom_by(&mut self, step: f32, min: f32, max: f32) {
        if !step.is_finite() {
            return;
        }

        let lo = if min.is_nan() { f32::NEG_INFINITY } else { min };
        let hi = if max.is_nan() { f32::INFINITY } else { max };
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        let zoom = (self.zoom + step).max(lo).min(hi);
        if zoom.is_finite() && zoom > 0. {
            self.zoom = zoom;
        }
    }

    /// Like [`Viewport::zoom_by`] but keeps the logical point under the screen position `anchor`
    /// in place.
    pub fn zoom_by_at(&mut self, step: f32, min: f32, max: f32, anchor: Pos2) {
        let logical = self.screen_to_canvas_pos(anchor);
        self.zoom_by(step, min, max);
        let pan = anchor.to_vec2() - logical.to_vec2() * self.zoom;
        self.x = pan.x;
        self.y = pan.y;
    }

    /// Back to `{x: 0, y: 0, zoom: 1}`.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn canvas_to_screen_pos(&self, pos: Pos2) -> Pos2 {
        (pos.to_vec2() * self.zoom + self.pan()).to_pos2()
    }

    pub fn canvas_to_screen_size(&self, size: Vec2) -> Vec2 {
        size * self.zoom
    }

    pub fn screen_to_canvas_pos(&self, pos: Pos2) -> Pos2 {
        ((pos.to_vec2() - self.pan()) / self.zoom).to_pos2()
    }

    /// Converts a distance travelled on screen into logical node-space distance.
    pub fn screen_to_canvas_delta(&self, delta: Vec2) -> Vec2 {
        delta / self.zoom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zoom_in_clamps_at_max() {
        let mut vp = Viewport::default();
        for _ in 0..50 {
            vp.zoom_in();
        }
        assert_eq!(vp.zoom, MAX_ZOOM);
        vp.zoom_in();
        assert_eq!(vp.zoom, MAX_ZOOM);
    }

    #[test]
    fn test_zoom_out_clamps_at_min() {
        let mut vp = Viewport::default();
        for _ in 0..50 {
            vp.zoom_out();
        }
        assert_eq!(vp.zoom, MIN_ZOOM);
        vp.zoom_out();
        assert_eq!(vp.zoom, MIN_ZOOM);
    }

    #[test]
    fn test_zoom_step() {
        let mut vp = Viewport::default();
        vp.zoom_in();
        assert!((vp.zoom - 1.1).abs() < 1e-6);
        vp.zoom_out();
        vp.zoom_out();
        assert!((vp.zoom - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_with_bad_bounds_does_not_panic() {
        let mut vp = Viewport::default();
        vp.zoom_by(0.5, 3., 2.);
        assert_eq!(vp.zoom, 2.);

        vp.zoom_by(-5., 3., 2.);
        assert_eq!(vp.zoom, 2.);

        vp.zoom_by(-0.5, f32::NAN, 2.);
        assert_eq!(vp.zoom, 1.5);

        vp.zoom_by(0.1, f32::NAN, f32::NAN);
        assert!((vp.zoom - 1.6).abs() < 1e-6);

        vp.zoom_by(f32::NAN, MIN_ZOOM, MAX_ZOOM);
        assert!((vp.zoom - 1.6).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_at_keeps_anchor_fixed() {
        let mut vp = Viewport {
            x: 10.,
            y: 20.,
            zoom: 1.,
        };
        let anchor = Pos2::new(110., 70.);
        let logical = vp.screen_to_canvas_pos(anchor);

        vp.zoom_by_at(1., MIN_ZOOM, MAX_ZOOM, anchor);

        assert_eq!(vp.zoom, 2.);
        assert_eq!(vp.canvas_to_screen_pos(logical), anchor);
    }

    #[test]
    fn test_reset() {
        let mut vp = Viewport {
            x: -40.,
            y: 12.5,
            zoom: 1.7,
        };
        vp.reset();
        assert_eq!(
            vp,
            Viewport {
                x: 0.,
                y: 0.,
                zoom: 1.
            }
        );
    }

    #[test]
    fn test_screen_canvas_roundtrip() {
        let vp = Viewport {
            x: 30.,
            y: -10.,
            zoom: 2.,
        };
        let logical = Pos2::new(15., 40.);
        let screen = vp.canvas_to_screen_pos(logical);
        assert_eq!(screen, Pos2::new(60., 70.));
        assert_eq!(vp.screen_to_canvas_pos(screen), logical);
    }

    proptest! {
        #[test]
        fn prop_logical_delta_is_screen_delta_over_zoom(
            zoom in MIN_ZOOM..=MAX_ZOOM,
            dx in -1000f32..1000.,
            dy in -1000f32..1000.,
        ) {
            let vp = Viewport { zoom, ..Viewport::default() };
            let d = vp.screen_to_canvas_delta(Vec2::new(dx, dy));
            prop_assert_eq!(d, Vec2::new(dx / zoom, dy / zoom));
        }

        #[test]
        fn prop_zoom_always_within_bounds(
            steps in proptest::collection::vec(any::<bool>(), 0..64),
        ) {
            let mut vp = Viewport::default();
            for zoom_in in steps {
                if zoom_in { vp.zoom_in() } else { vp.zoom_out() }
                prop_assert!((MIN_ZOOM..=MAX_ZOOM).contains(&vp.zoom));
            }
        }

        #[test]
        fn prop_reset_from_any_state(
            x in -1e4f32..1e4,
            y in -1e4f32..1e4,
            zoom in MIN_ZOOM..=MAX_ZOOM,
        ) {
            let mut vp = Viewport { x, y, zoom };
            vp.reset();
            prop_assert_eq!(vp, Viewport::default());
        }
    }
}
