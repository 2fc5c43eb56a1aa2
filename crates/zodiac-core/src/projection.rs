//! World to screen projection
//!
//! Mirrors the camera the renderer draws with: right-handed, looking down -Z,
//! orientation stored as an XYZ Euler triple and an OpenGL-style clip space
//! where NDC depth beyond 1.0 means the point is behind the camera or past
//! the far plane. Positions are f64 so the sky sphere radius and far plane
//! do not lose precision.

use glam::{DMat4, DQuat, DVec3, EulerRot};
use serde::{Deserialize, Serialize};

use crate::zodiac::ZodiacSign;

/// Viewport size in logical pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Width over height, falling back to 1.0 for a collapsed viewport
    pub fn aspect(&self) -> f64 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1920.0, 1080.0)
    }
}

/// Perspective camera state shared by the renderer and the marker overlay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub position: DVec3,
    /// Orientation as XYZ Euler angles in radians
    pub orientation: DVec3,
    /// Vertical field of view in degrees
    pub fov_y_degrees: f64,
    pub near: f64,
    pub far: f64,
    pub aspect: f64,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            position: DVec3::new(-0.5, 0.0, 0.0),
            orientation: ZodiacSign::Aries.camera_orientation(),
            fov_y_degrees: 55.0,
            near: 1.0,
            far: 100_000_000_000.0,
            aspect: Viewport::default().aspect(),
        }
    }
}

impl CameraState {
    /// Orientation as a quaternion (X applied first, then Y, then Z)
    pub fn rotation(&self) -> DQuat {
        DQuat::from_euler(
            EulerRot::XYZ,
            self.orientation.x,
            self.orientation.y,
            self.orientation.z,
        )
    }

    /// Unit vector the camera is looking along
    pub fn forward(&self) -> DVec3 {
        self.rotation() * DVec3::NEG_Z
    }

    /// World to camera transform
    pub fn view_matrix(&self) -> DMat4 {
        DMat4::from_rotation_translation(self.rotation(), self.position).inverse()
    }

    pub fn projection_matrix(&self) -> DMat4 {
        DMat4::perspective_rh_gl(
            self.fov_y_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        )
    }

    /// Combined world to clip transform
    pub fn view_projection(&self) -> DMat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Recompute the aspect ratio after a resize
    pub fn fit_viewport(&mut self, viewport: &Viewport) {
        self.aspect = viewport.aspect();
    }

    /// Roll is the Z component of the Euler triple
    pub fn roll(&self) -> f64 {
        self.orientation.z
    }
}

/// A projected point: pixel coordinates from the top-left corner plus NDC depth
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl ScreenPoint {
    /// Depth beyond 1.0 means behind the camera or outside the depth range
    pub fn is_visible(&self) -> bool {
        self.z.is_finite() && self.z <= 1.0
    }
}

/// Project a world position onto the viewport.
///
/// Pixel coordinates are rounded half up, Y grows downward.
pub fn project_to_screen(world: DVec3, camera: &CameraState, viewport: &Viewport) -> ScreenPoint {
    let ndc = camera.view_projection().project_point3(world);

    ScreenPoint {
        x: round_half_up((ndc.x + 1.0) * viewport.width / 2.0),
        y: round_half_up((1.0 - ndc.y) * viewport.height / 2.0),
        z: ndc.z,
    }
}

fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera_at(position: DVec3, orientation: DVec3) -> CameraState {
        CameraState {
            position,
            orientation,
            aspect: 16.0 / 9.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_point_on_view_axis_projects_to_center() {
        let viewport = Viewport::new(1280.0, 720.0);
        let cameras = [
            camera_at(DVec3::ZERO, DVec3::ZERO),
            camera_at(DVec3::new(-0.5, 0.0, 0.0), ZodiacSign::Aries.camera_orientation()),
            camera_at(DVec3::new(10.0, -4.0, 2.5), ZodiacSign::Libra.camera_orientation()),
        ];

        for camera in &cameras {
            let target = camera.position + camera.forward() * 500.0;
            let p = project_to_screen(target, camera, &viewport);
            assert_eq!((p.x, p.y), viewport.center());
            assert!(p.is_visible());
        }
    }

    #[test]
    fn test_depth_sign_flip_in_front_and_behind() {
        let viewport = Viewport::default();
        let orientations = [
            DVec3::ZERO,
            DVec3::new(0.3, -1.2, 2.0),
            ZodiacSign::Scorpio.camera_orientation(),
            ZodiacSign::Pisces.camera_orientation(),
        ];
        let positions = [DVec3::ZERO, DVec3::new(-0.5, 0.0, 0.0), DVec3::new(3.0, 7.0, -2.0)];

        for orientation in orientations {
            for position in positions {
                let camera = camera_at(position, orientation);
                let offset = camera.forward() * 25.0;

                let front = project_to_screen(position + offset, &camera, &viewport);
                let behind = project_to_screen(position - offset, &camera, &viewport);

                assert!(front.z <= 1.0, "front depth {} > 1", front.z);
                assert!(behind.z > 1.0, "behind depth {} <= 1", behind.z);
                assert!(!behind.is_visible());
            }
        }
    }

    #[test]
    fn test_screen_y_grows_downward() {
        let viewport = Viewport::new(800.0, 600.0);
        let camera = camera_at(DVec3::ZERO, DVec3::ZERO);

        // Identity orientation looks down -Z with +Y up
        let above = project_to_screen(DVec3::new(0.0, 10.0, -100.0), &camera, &viewport);
        let right = project_to_screen(DVec3::new(10.0, 0.0, -100.0), &camera, &viewport);

        assert!(above.y < 300.0);
        assert_eq!(above.x, 400.0);
        assert!(right.x > 400.0);
        assert_eq!(right.y, 300.0);
    }

    #[test]
    fn test_pixel_rounding_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(7.49), 7.0);
    }

    #[test]
    fn test_viewport_aspect() {
        let mut camera = CameraState::default();
        camera.fit_viewport(&Viewport::new(1000.0, 500.0));
        assert_eq!(camera.aspect, 2.0);

        assert_eq!(Viewport::new(640.0, 0.0).aspect(), 1.0);
    }
}
