use crate::models::{Marker, ScreenPoint};
use crate::viewport::Viewport;

/// Hit radius around a marker, in map pixels.
pub const HIT_RADIUS: f64 = 20.0;

/// Find the marker under a screen point.
///
/// Returns the first marker in iteration order within [`HIT_RADIUS`]. There
/// is no proximity sort, so when markers overlap the winner depends on store
/// order.
pub fn find_marker_at<'a, I>(screen: ScreenPoint, markers: I, viewport: &Viewport) -> Option<&'a Marker>
where
    I: IntoIterator<Item = &'a Marker>,
{
    let click = viewport.screen_to_map(screen);
    markers
        .into_iter()
        .find(|m| m.position.distance(click) < HIT_RADIUS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MapPoint, MarkerId, MarkerType};

    fn marker(id: &str, x: f64, y: f64) -> Marker {
        Marker {
            id: MarkerId::from(id),
            name: format!("marker {}", id),
            marker_type: MarkerType::Person,
            is_friendly: true,
            position: MapPoint::new(x, y),
            created_by: None,
            created_at: None,
        }
    }

    #[test]
    fn test_hit_within_radius() {
        let markers = vec![marker("a", 100.0, 100.0)];
        let vp = Viewport::default();
        let hit = find_marker_at(ScreenPoint::new(105.0, 100.0), &markers, &vp);
        assert_eq!(hit.map(|m| m.id.as_str()), Some("a"));
    }

    #[test]
    fn test_miss_outside_radius() {
        let markers = vec![marker("a", 100.0, 100.0)];
        let vp = Viewport::default();
        assert!(find_marker_at(ScreenPoint::new(130.0, 100.0), &markers, &vp).is_none());
    }

    #[test]
    fn test_radius_is_measured_in_map_space() {
        let markers = vec![marker("a", 100.0, 100.0)];
        // At scale 3 a 45px screen offset is 15 map pixels: still a hit.
        let vp = Viewport::new(3.0, ScreenPoint::new(0.0, 0.0));
        assert!(find_marker_at(ScreenPoint::new(345.0, 300.0), &markers, &vp).is_some());
        // At scale 0.5 a 15px screen offset is 30 map pixels: a miss.
        let vp = Viewport::new(0.5, ScreenPoint::new(0.0, 0.0));
        assert!(find_marker_at(ScreenPoint::new(65.0, 50.0), &markers, &vp).is_none());
    }

    #[test]
    fn test_hit_accounts_for_offset() {
        let markers = vec![marker("a", 100.0, 100.0)];
        let vp = Viewport::new(2.0, ScreenPoint::new(10.0, 10.0));
        // screen (220, 210) -> map (105, 100)
        assert!(find_marker_at(ScreenPoint::new(220.0, 210.0), &markers, &vp).is_some());
    }

    #[test]
    fn test_overlap_picks_first_in_order() {
        let markers = vec![marker("far", 110.0, 100.0), marker("near", 101.0, 100.0)];
        let vp = Viewport::default();
        let hit = find_marker_at(ScreenPoint::new(100.0, 100.0), &markers, &vp);
        assert_eq!(hit.map(|m| m.id.as_str()), Some("far"));
    }

    #[test]
    fn test_empty_store_never_hits() {
        let markers: Vec<Marker> = Vec::new();
        assert!(find_marker_at(ScreenPoint::default(), &markers, &Viewport::default()).is_none());
    }
}
