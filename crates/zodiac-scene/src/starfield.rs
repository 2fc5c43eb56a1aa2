//! Star point cloud
//!
//! WebGPU draws point primitives one pixel wide, so each star becomes a
//! small octahedron with the star's color on every vertex. The whole cloud
//! is one mesh blended additively.

use bevy::asset::RenderAssetUsages;
use bevy::mesh::Indices;
use bevy::prelude::*;
use bevy::render::render_resource::PrimitiveTopology;
use zodiac_core::config::SceneConfig;
use zodiac_core::StarField;

/// Marker component for the star cloud entity
#[derive(Component)]
pub struct StarCloud;

const CORNERS: [[f32; 3]; 6] = [
    [1.0, 0.0, 0.0],
    [-1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, -1.0, 0.0],
    [0.0, 0.0, 1.0],
    [0.0, 0.0, -1.0],
];

const FACES: [[u32; 3]; 8] = [
    [0, 2, 4],
    [2, 1, 4],
    [1, 3, 4],
    [3, 0, 4],
    [2, 0, 5],
    [1, 2, 5],
    [3, 1, 5],
    [0, 3, 5],
];

/// Build one mesh holding every star, `size` world units across
pub fn star_mesh(field: &StarField, size: f32) -> Mesh {
    let radius = size / 2.0;
    let vertex_count = field.len() * CORNERS.len();

    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(vertex_count);
    let mut normals: Vec<[f32; 3]> = Vec::with_capacity(vertex_count);
    let mut colors: Vec<[f32; 4]> = Vec::with_capacity(vertex_count);
    let mut indices: Vec<u32> = Vec::with_capacity(field.len() * FACES.len() * 3);

    for (i, (position, color)) in field.positions.iter().zip(&field.colors).enumerate() {
        let center = Vec3::from_array(*position);
        let base = (i * CORNERS.len()) as u32;

        for corner in CORNERS {
            let offset = Vec3::from_array(corner);
            positions.push((center + offset * radius).to_array());
            normals.push(corner);
            colors.push([color[0], color[1], color[2], 1.0]);
        }
        for face in FACES {
            indices.extend(face.map(|v| base + v));
        }
    }

    Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
        .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, colors)
        .with_inserted_indices(Indices::U32(indices))
}

/// Unlit, additively blended material tinted by vertex color
pub fn star_material() -> StandardMaterial {
    StandardMaterial {
        base_color: Color::WHITE,
        unlit: true,
        alpha_mode: AlphaMode::Add,
        cull_mode: None,
        ..default()
    }
}

/// Spawn the star cloud under the sky group
pub fn spawn_star_cloud(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    field: &StarField,
    settings: &SceneConfig,
    group: Entity,
) -> Entity {
    let mesh = meshes.add(star_mesh(field, settings.star_size));
    let material = materials.add(star_material());

    tracing::info!("Spawning star cloud with {} stars", field.len());

    commands
        .spawn((
            Mesh3d(mesh),
            MeshMaterial3d(material),
            Transform::default(),
            StarCloud,
            Name::new("Stars"),
            ChildOf(group),
        ))
        .id()
}
