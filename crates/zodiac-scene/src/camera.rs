//! Scene camera driven by the shared camera state

use bevy::prelude::*;
use zodiac_core::CameraState;

use crate::types::Sky;

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Plugin for the scene camera
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera);
    }
}

/// World transform for a camera state
pub fn camera_transform(state: &CameraState) -> Transform {
    Transform {
        translation: Vec3::from_array(state.position.as_vec3().to_array()),
        rotation: Quat::from_array(state.rotation().as_quat().to_array()),
        scale: Vec3::ONE,
    }
}

/// Perspective projection for a camera state. Bevy keeps the aspect ratio in
/// step with the window itself.
pub fn camera_projection(state: &CameraState) -> PerspectiveProjection {
    PerspectiveProjection {
        fov: state.fov_y_degrees.to_radians() as f32,
        near: state.near as f32,
        far: state.far as f32,
        ..default()
    }
}

fn spawn_camera(mut commands: Commands, sky: Res<Sky>) {
    let state = &sky.0.camera;

    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(camera_projection(state)),
        camera_transform(state),
        MainCamera,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use zodiac_core::ZodiacSign;

    #[test]
    fn test_camera_transform_looks_along_forward() {
        let state = CameraState {
            orientation: ZodiacSign::Gemini.camera_orientation(),
            ..Default::default()
        };
        let transform = camera_transform(&state);
        let expected = state.forward().as_vec3();

        let forward = transform.forward();
        assert!((forward.x - expected.x).abs() < 1e-5);
        assert!((forward.y - expected.y).abs() < 1e-5);
        assert!((forward.z - expected.z).abs() < 1e-5);
        assert_eq!(transform.translation, Vec3::new(-0.5, 0.0, 0.0));
    }

    #[test]
    fn test_camera_projection_uses_radians() {
        let projection = camera_projection(&CameraState::default());
        assert!((projection.fov - 55.0_f32.to_radians()).abs() < 1e-6);
        assert_eq!(projection.near, 1.0);
    }
}
