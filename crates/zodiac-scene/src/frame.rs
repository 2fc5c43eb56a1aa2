//! Drives the shared frame loop from Bevy's schedule

use bevy::prelude::*;
use bevy::window::{CursorMoved, PrimaryWindow};
use std::time::Duration;
use zodiac_core::{Clock, FrameLoop, FrameRenderer, SkyContext, Viewport};

use crate::camera::{camera_projection, camera_transform, MainCamera};
use crate::types::Sky;

/// Plugin for the per-frame update
pub struct FramePlugin;

impl Plugin for FramePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FrameLoopState>().add_systems(
            Update,
            (track_viewport, track_pointer, advance_frame)
                .chain()
                .in_set(FrameSet),
        );
    }
}

/// Systems that advance the sky by one frame. Anything reading marker
/// placements or the camera should run after this set.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct FrameSet;

#[derive(Resource, Default)]
pub struct FrameLoopState(pub FrameLoop);

/// Bevy's virtual time as a frame loop clock
pub struct BevyClock<'a>(pub &'a Time);

impl Clock for BevyClock<'_> {
    fn elapsed(&self) -> Duration {
        self.0.elapsed()
    }
}

/// Copies the resolved camera onto the Bevy camera entity
struct CameraSync<'a> {
    transform: Mut<'a, Transform>,
    projection: Mut<'a, Projection>,
}

impl FrameRenderer for CameraSync<'_> {
    fn render(&mut self, sky: &SkyContext) {
        *self.transform = camera_transform(&sky.camera);
        if let Projection::Perspective(perspective) = &mut *self.projection {
            let target = camera_projection(&sky.camera);
            perspective.fov = target.fov;
            perspective.near = target.near;
            perspective.far = target.far;
        }
    }
}

fn track_viewport(windows: Query<&Window, With<PrimaryWindow>>, mut sky: ResMut<Sky>) {
    let Ok(window) = windows.single() else {
        return;
    };

    let viewport = Viewport::new(window.width() as f64, window.height() as f64);
    if viewport != sky.0.viewport {
        sky.0.resize(viewport);
    }
}

fn track_pointer(mut cursor: MessageReader<CursorMoved>, mut sky: ResMut<Sky>) {
    let Some(moved) = cursor.read().last() else {
        return;
    };

    let viewport = sky.0.viewport;
    sky.0
        .pointer
        .update(moved.position.x as f64, moved.position.y as f64, &viewport);
}

fn advance_frame(
    time: Res<Time>,
    mut sky: ResMut<Sky>,
    mut state: ResMut<FrameLoopState>,
    mut cameras: Query<(&mut Transform, &mut Projection), With<MainCamera>>,
) {
    let Ok((transform, projection)) = cameras.single_mut() else {
        return;
    };

    let mut renderer = CameraSync {
        transform,
        projection,
    };
    state.0.tick(&mut sky.0, &BevyClock(&time), &mut renderer);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bevy_clock_reports_elapsed() {
        let mut time = Time::<()>::default();
        time.advance_by(Duration::from_millis(1500));

        assert_eq!(BevyClock(&time).elapsed(), Duration::from_millis(1500));
    }
}
