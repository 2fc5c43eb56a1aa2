//! Background sphere around the whole sky, seen from inside
//!
//! Wrapped with a panorama when one is configured, otherwise a flat deep
//! blue that keeps the additive stars readable.

use bevy::prelude::*;
use bevy::render::render_resource::Face;

use crate::types::{SceneSettings, SkyGroup};

/// Base color of the sphere when no panorama is configured
pub const UNTEXTURED_SKY_COLOR: Color = Color::srgb(0.01, 0.01, 0.03);

/// Marker component for the sky sphere
#[derive(Component)]
pub struct SkySphere;

/// Plugin for the sky sphere
pub struct SkySpherePlugin;

impl Plugin for SkySpherePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_sky_sphere);
    }
}

/// Unlit material drawing only the inside of the sphere
pub fn sky_material(texture: Option<Handle<Image>>) -> StandardMaterial {
    let base_color = if texture.is_some() {
        Color::WHITE
    } else {
        UNTEXTURED_SKY_COLOR
    };

    StandardMaterial {
        base_color,
        base_color_texture: texture,
        unlit: true,
        cull_mode: Some(Face::Front),
        ..default()
    }
}

fn spawn_sky_sphere(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
    settings: Res<SceneSettings>,
    group: Res<SkyGroup>,
) {
    let texture = settings.0.sky_texture.clone().map(|path| {
        tracing::info!("Loading sky texture from {}", path);
        asset_server.load(path)
    });
    if texture.is_none() {
        tracing::debug!("No sky texture configured, using a plain sky sphere");
    }

    let material = materials.add(sky_material(texture));
    let mesh = meshes.add(Sphere::new(settings.0.sky_radius).mesh().uv(32, 16));

    commands.spawn((
        Mesh3d(mesh),
        MeshMaterial3d(material),
        Transform::default(),
        SkySphere,
        Name::new("Universe"),
        ChildOf(group.0),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untextured_sky_is_dark_and_inward_facing() {
        let material = sky_material(None);
        assert_eq!(material.base_color, UNTEXTURED_SKY_COLOR);
        assert!(material.base_color_texture.is_none());
        assert_eq!(material.cull_mode, Some(Face::Front));
        assert!(material.unlit);
    }

    #[test]
    fn test_textured_sky_keeps_panorama_colors() {
        let material = sky_material(Some(Handle::default()));
        assert_eq!(material.base_color, Color::WHITE);
        assert!(material.base_color_texture.is_some());
        assert_eq!(material.cull_mode, Some(Face::Front));
    }
}
