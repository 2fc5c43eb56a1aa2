//! Constellation line strips

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::PrimitiveTopology;
use zodiac_core::catalog::CONSTELLATION_LINE_COLOR;
use zodiac_core::{ConstellationFigure, LinePath};

/// Marker component for constellation line entities
#[derive(Component)]
pub struct ConstellationLine {
    /// Label of the figure this stroke belongs to
    pub label: String,
}

/// Line strip through every point of one stroke
pub fn line_mesh(path: &LinePath) -> Mesh {
    Mesh::new(PrimitiveTopology::LineStrip, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, path.points.clone())
}

/// The one material every constellation line shares
pub fn line_material() -> StandardMaterial {
    let [r, g, b] = CONSTELLATION_LINE_COLOR;
    StandardMaterial {
        base_color: Color::srgb(r, g, b),
        unlit: true,
        ..default()
    }
}

/// Spawn one line entity per stroke. `first_line` numbers the entities
/// across calls; returns how many were spawned.
pub fn spawn_constellation_lines(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    material: &Handle<StandardMaterial>,
    figures: &[ConstellationFigure],
    group: Entity,
    first_line: usize,
) -> usize {
    let mut count = 0;

    for figure in figures {
        for path in &figure.paths {
            commands.spawn((
                Mesh3d(meshes.add(line_mesh(path))),
                MeshMaterial3d(material.clone()),
                Transform::default(),
                ConstellationLine {
                    label: figure.label.clone(),
                },
                Name::new(format!("Connector{}", first_line + count)),
                ChildOf(group),
            ));
            count += 1;
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_mesh_keeps_every_point() {
        let path = LinePath {
            points: vec![[0.0, 0.0, 0.0], [40.0, 0.0, 0.0], [40.0, 40.0, 0.0]],
        };
        let mesh = line_mesh(&path);

        assert_eq!(mesh.primitive_topology(), PrimitiveTopology::LineStrip);
        assert_eq!(mesh.count_vertices(), 3);
    }

    #[test]
    fn test_line_material_is_cyan() {
        let material = line_material();
        assert_eq!(material.base_color, Color::srgb(0.0, 1.0, 1.0));
        assert!(material.unlit);
    }
}
