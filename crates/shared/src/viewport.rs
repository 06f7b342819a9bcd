//! Pan/zoom transform between screen space and map space.
//!
//! `offset` is the screen position of the map origin; `scale` is screen
//! pixels per map pixel. Marker positions never pass through here on their
//! way to storage: screen coordinates are always derived.

use crate::models::{MapImage, MapPoint, ScreenDelta, ScreenPoint};

pub const SCALE_MIN: f64 = 0.5;
pub const SCALE_MAX: f64 = 3.0;

/// Scale change applied per wheel notch.
pub const WHEEL_ZOOM_STEP: f64 = 0.1;

/// Changes smaller than this are treated as no-ops.
const SCALE_EPSILON: f64 = 1e-9;

/// Intrinsic dimensions of the background image, in map pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapSize {
    pub width: f64,
    pub height: f64,
}

impl MapSize {
    pub const DEFAULT: MapSize = MapSize {
        width: 2048.0,
        height: 2048.0,
    };
}

impl Default for MapSize {
    fn default() -> Self {
        MapSize::DEFAULT
    }
}

impl From<&MapImage> for MapSize {
    fn from(image: &MapImage) -> Self {
        MapSize {
            width: image.width,
            height: image.height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    scale: f64,
    offset: ScreenPoint,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            scale: 1.0,
            offset: ScreenPoint::default(),
        }
    }
}

impl Viewport {
    pub fn new(scale: f64, offset: ScreenPoint) -> Self {
        let scale = if scale.is_finite() { scale } else { 1.0 };
        Viewport {
            scale: scale.clamp(SCALE_MIN, SCALE_MAX),
            offset,
        }
    }

    /// Unit scale with the map's bounding box centered in the container.
    pub fn centered(map: MapSize, container_w: f64, container_h: f64) -> Self {
        Viewport {
            scale: 1.0,
            offset: ScreenPoint::new(
                (container_w - map.width) / 2.0,
                (container_h - map.height) / 2.0,
            ),
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset(&self) -> ScreenPoint {
        self.offset
    }

    /// Zoom level as a rounded percentage, for display.
    pub fn zoom_percent(&self) -> u32 {
        (self.scale * 100.0).round() as u32
    }

    pub fn screen_to_map(&self, p: ScreenPoint) -> MapPoint {
        MapPoint::new(
            (p.x - self.offset.x) / self.scale,
            (p.y - self.offset.y) / self.scale,
        )
    }

    pub fn map_to_screen(&self, m: MapPoint) -> ScreenPoint {
        ScreenPoint::new(
            m.x * self.scale + self.offset.x,
            m.y * self.scale + self.offset.y,
        )
    }

    /// Change the scale by `delta_scale`, keeping the map point under
    /// `anchor` fixed on screen. Returns whether anything changed.
    pub fn zoom_at(&mut self, anchor: ScreenPoint, delta_scale: f64) -> bool {
        if !delta_scale.is_finite() {
            return false;
        }
        let new_scale = (self.scale + delta_scale).clamp(SCALE_MIN, SCALE_MAX);
        if (new_scale - self.scale).abs() < SCALE_EPSILON {
            return false;
        }
        let ratio = new_scale / self.scale;
        self.offset = ScreenPoint::new(
            anchor.x - (anchor.x - self.offset.x) * ratio,
            anchor.y - (anchor.y - self.offset.y) * ratio,
        );
        self.scale = new_scale;
        true
    }

    /// Shift the view. No bounds: the map may be dragged out of sight.
    pub fn pan_by(&mut self, delta: ScreenDelta) {
        self.offset.x += delta.dx;
        self.offset.y += delta.dy;
    }

    pub(crate) fn set_offset(&mut self, offset: ScreenPoint) {
        self.offset = offset;
    }
}

/// Scale change for one wheel event. `delta_y` follows the DOM convention:
/// negative scrolls up and zooms in.
pub fn wheel_zoom_delta(delta_y: f64) -> f64 {
    if delta_y < 0.0 {
        WHEEL_ZOOM_STEP
    } else if delta_y > 0.0 {
        -WHEEL_ZOOM_STEP
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_map_close(a: MapPoint, b: MapPoint) {
        assert!(
            (a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6,
            "{:?} != {:?}",
            a,
            b
        );
    }

    #[test]
    fn test_screen_to_map_undoes_offset_and_scale() {
        let vp = Viewport::new(2.0, ScreenPoint::new(10.0, 20.0));
        assert_map_close(
            vp.screen_to_map(ScreenPoint::new(210.0, 220.0)),
            MapPoint::new(100.0, 100.0),
        );
    }

    #[test]
    fn test_round_trip_identity() {
        let viewports = [
            Viewport::default(),
            Viewport::new(0.5, ScreenPoint::new(-300.0, 45.5)),
            Viewport::new(2.75, ScreenPoint::new(1234.0, -987.25)),
        ];
        let points = [
            MapPoint::new(0.0, 0.0),
            MapPoint::new(100.0, 100.0),
            MapPoint::new(2047.9, 13.37),
        ];
        for vp in viewports {
            for m in points {
                assert_map_close(vp.screen_to_map(vp.map_to_screen(m)), m);
            }
        }
    }

    #[test]
    fn test_zoom_keeps_anchor_fixed() {
        let anchors = [
            ScreenPoint::new(0.0, 0.0),
            ScreenPoint::new(400.0, 300.0),
            ScreenPoint::new(-50.0, 900.0),
        ];
        for anchor in anchors {
            for delta in [0.1, -0.1, 0.7, -2.0, 5.0] {
                let mut vp = Viewport::new(1.3, ScreenPoint::new(-120.0, 64.0));
                let before = vp.screen_to_map(anchor);
                vp.zoom_at(anchor, delta);
                assert_map_close(vp.screen_to_map(anchor), before);
            }
        }
    }

    #[test]
    fn test_zoom_at_origin_anchor_matches_formula() {
        let mut vp = Viewport::new(1.0, ScreenPoint::new(100.0, 50.0));
        assert!(vp.zoom_at(ScreenPoint::new(200.0, 150.0), 1.0));
        assert!((vp.scale() - 2.0).abs() < 1e-9);
        // offset' = p - (p - offset) * 2
        assert!((vp.offset().x - 0.0).abs() < 1e-9);
        assert!((vp.offset().y - (-50.0)).abs() < 1e-9);
    }

    #[test]
    fn test_scale_clamped_under_cumulative_input() {
        let mut vp = Viewport::default();
        for _ in 0..100 {
            vp.zoom_at(ScreenPoint::new(10.0, 10.0), WHEEL_ZOOM_STEP);
        }
        assert!((vp.scale() - SCALE_MAX).abs() < 1e-9);
        for _ in 0..100 {
            vp.zoom_at(ScreenPoint::new(10.0, 10.0), -WHEEL_ZOOM_STEP);
        }
        assert!((vp.scale() - SCALE_MIN).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_in_at_max_is_noop() {
        let mut vp = Viewport::new(SCALE_MAX, ScreenPoint::new(33.0, 44.0));
        let before = vp;
        assert!(!vp.zoom_at(ScreenPoint::new(500.0, 500.0), WHEEL_ZOOM_STEP));
        assert_eq!(vp, before);
    }

    #[test]
    fn test_new_clamps_scale() {
        assert_eq!(Viewport::new(10.0, ScreenPoint::default()).scale(), SCALE_MAX);
        assert_eq!(Viewport::new(0.01, ScreenPoint::default()).scale(), SCALE_MIN);
        assert_eq!(Viewport::new(f64::NAN, ScreenPoint::default()).scale(), 1.0);
    }

    #[test]
    fn test_pan_by_is_unbounded_and_keeps_scale() {
        let mut vp = Viewport::new(1.5, ScreenPoint::default());
        vp.pan_by(ScreenDelta::new(-5000.0, 7000.0));
        assert_eq!(vp.offset(), ScreenPoint::new(-5000.0, 7000.0));
        assert_eq!(vp.scale(), 1.5);
    }

    #[test]
    fn test_centered_puts_map_center_at_container_center() {
        let vp = Viewport::centered(MapSize::DEFAULT, 1200.0, 800.0);
        let center = vp.map_to_screen(MapPoint::new(1024.0, 1024.0));
        assert!((center.x - 600.0).abs() < 1e-9);
        assert!((center.y - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_wheel_zoom_delta_sign() {
        assert_eq!(wheel_zoom_delta(-120.0), WHEEL_ZOOM_STEP);
        assert_eq!(wheel_zoom_delta(3.0), -WHEEL_ZOOM_STEP);
        assert_eq!(wheel_zoom_delta(0.0), 0.0);
    }

    #[test]
    fn test_zoom_percent() {
        assert_eq!(Viewport::default().zoom_percent(), 100);
        assert_eq!(Viewport::new(1.25, ScreenPoint::default()).zoom_percent(), 125);
    }
}
