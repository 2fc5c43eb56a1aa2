//! Zodiac Scene - Bevy rendering of the zodiac sky
//!
//! This crate turns the engine-independent state in `zodiac-core` into a
//! rendered scene: the camera, the star cloud, constellation lines, the sky
//! sphere and the constellation label overlay. Feed bodies are handed in
//! through [`feeds::PendingFeeds`] by whichever frontend fetched them.

pub mod camera;
pub mod constellations;
pub mod feeds;
pub mod frame;
pub mod markers;
pub mod sky_sphere;
pub mod starfield;
pub mod types;

use bevy::prelude::*;

/// Plugin that sets up the whole sky scene
pub struct ZodiacScenePlugin;

impl Plugin for ZodiacScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Sky>()
            .init_resource::<SceneSettings>()
            .add_systems(PreStartup, types::spawn_sky_group)
            .add_plugins(camera::CameraPlugin)
            .add_plugins(sky_sphere::SkySpherePlugin)
            .add_plugins(feeds::FeedsPlugin)
            .add_plugins(markers::MarkerLabelPlugin)
            .add_plugins(frame::FramePlugin);
    }
}

// Re-export commonly used types
pub use feeds::PendingFeeds;
pub use types::*;
