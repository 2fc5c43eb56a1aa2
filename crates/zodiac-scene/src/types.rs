//! Shared resources for the sky scene

use bevy::prelude::*;
use zodiac_core::config::SceneConfig;
use zodiac_core::{SkyContext, ViewerConfig};

/// Frame state shared by every system: camera, markers, choreography and
/// the loaded primitives
#[derive(Debug, Clone, Resource, Default)]
pub struct Sky(pub SkyContext);

impl Sky {
    pub fn from_config(config: &ViewerConfig) -> Self {
        Self(SkyContext::new(config))
    }
}

/// Rendering settings for stars, lines and the sky sphere
#[derive(Debug, Clone, Resource, Default)]
pub struct SceneSettings(pub SceneConfig);

/// Parent entity grouping everything drawn in the sky
#[derive(Debug, Clone, Copy, Resource)]
pub struct SkyGroup(pub Entity);

/// Marker component for the sky group entity
#[derive(Component)]
pub struct SkyGroupRoot;

pub(crate) fn spawn_sky_group(mut commands: Commands) {
    let group = commands
        .spawn((
            Transform::default(),
            Visibility::default(),
            SkyGroupRoot,
            Name::new("SkyGroup"),
        ))
        .id();
    commands.insert_resource(SkyGroup(group));
}
