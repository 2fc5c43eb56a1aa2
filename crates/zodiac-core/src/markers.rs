//! Screen-space labels anchored to world positions

use glam::DVec3;

use crate::projection::{project_to_screen, CameraState, Viewport};

/// Handle to a registered marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(usize);

impl MarkerId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Where a label sits on screen this frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPlacement {
    pub x: f64,
    pub y: f64,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub label: String,
    pub anchor: DVec3,
    pub placement: ScreenPlacement,
}

/// Every label of the session. Markers are never removed.
#[derive(Debug, Clone, Default)]
pub struct MarkerOverlay {
    markers: Vec<Marker>,
}

impl MarkerOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a label at a world position. It stays hidden until the next
    /// `update_all`.
    pub fn add_marker(&mut self, anchor: DVec3, label: impl Into<String>) -> MarkerId {
        let id = MarkerId(self.markers.len());
        self.markers.push(Marker {
            label: label.into(),
            anchor,
            placement: ScreenPlacement::default(),
        });
        id
    }

    /// Re-project every marker for the current camera
    pub fn update_all(&mut self, camera: &CameraState, viewport: &Viewport) {
        for marker in &mut self.markers {
            let point = project_to_screen(marker.anchor, camera, viewport);
            marker.placement = ScreenPlacement {
                x: point.x,
                y: point.y,
                visible: point.is_visible(),
            };
        }
    }

    pub fn get(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.get(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (MarkerId, &Marker)> {
        self.markers
            .iter()
            .enumerate()
            .map(|(i, marker)| (MarkerId(i), marker))
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn looking_down_neg_z() -> CameraState {
        CameraState {
            position: DVec3::ZERO,
            orientation: DVec3::ZERO,
            aspect: 2.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_add_marker_returns_sequential_handles() {
        let mut overlay = MarkerOverlay::new();
        let a = overlay.add_marker(DVec3::X, "Ari");
        let b = overlay.add_marker(DVec3::Y, "Taurus");

        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(overlay.len(), 2);
        assert_eq!(overlay.get(b).unwrap().label, "Taurus");
        assert!(!overlay.get(a).unwrap().placement.visible);
    }

    #[test]
    fn test_update_all_hides_markers_behind_camera() {
        let mut overlay = MarkerOverlay::new();
        let front = overlay.add_marker(DVec3::new(0.0, 0.0, -100.0), "front");
        let behind = overlay.add_marker(DVec3::new(0.0, 0.0, 100.0), "behind");

        let viewport = Viewport::new(1000.0, 500.0);
        overlay.update_all(&looking_down_neg_z(), &viewport);

        let front = overlay.get(front).unwrap().placement;
        assert!(front.visible);
        assert_eq!((front.x, front.y), (500.0, 250.0));
        assert!(!overlay.get(behind).unwrap().placement.visible);
    }

    #[test]
    fn test_update_all_follows_camera() {
        let mut overlay = MarkerOverlay::new();
        let id = overlay.add_marker(DVec3::new(0.0, 0.0, -100.0), "Leo");
        let viewport = Viewport::new(1000.0, 500.0);

        let mut camera = looking_down_neg_z();
        overlay.update_all(&camera, &viewport);
        assert!(overlay.get(id).unwrap().placement.visible);

        // Turn around: yaw by half a turn
        camera.orientation.y = std::f64::consts::PI;
        overlay.update_all(&camera, &viewport);
        assert!(!overlay.get(id).unwrap().placement.visible);
    }
}
