//! Constellation name labels drawn over the 3D view
//!
//! Each marker in the shared overlay gets one absolutely positioned text
//! node. Placements are computed by the frame loop; this module only copies
//! them onto the UI.

use bevy::prelude::*;
use std::collections::HashMap;
use zodiac_core::MarkerId;

use crate::frame::FrameSet;
use crate::types::Sky;

/// Label text size in logical pixels
pub const LABEL_FONT_SIZE: f32 = 14.0;

/// Plugin for the label overlay
pub struct MarkerLabelPlugin;

impl Plugin for MarkerLabelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MarkerLabels>()
            .add_systems(Startup, spawn_overlay_root)
            .add_systems(
                Update,
                (spawn_marker_labels, sync_marker_labels)
                    .chain()
                    .after(FrameSet),
            );
    }
}

/// Full-screen container for all labels
#[derive(Component)]
pub struct MarkerOverlayRoot;

/// Text node tracking one marker
#[derive(Component)]
pub struct MarkerLabel {
    pub id: MarkerId,
}

/// Label entity per marker
#[derive(Resource, Default)]
pub struct MarkerLabels {
    entities: HashMap<MarkerId, Entity>,
}

impl MarkerLabels {
    pub fn get(&self, id: MarkerId) -> Option<Entity> {
        self.entities.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

fn spawn_overlay_root(mut commands: Commands) {
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        },
        MarkerOverlayRoot,
        Name::new("MarkerOverlay"),
    ));
}

fn spawn_marker_labels(
    mut commands: Commands,
    sky: Res<Sky>,
    mut labels: ResMut<MarkerLabels>,
    root: Query<Entity, With<MarkerOverlayRoot>>,
) {
    if labels.len() == sky.0.markers.len() {
        return;
    }
    let Ok(root) = root.single() else {
        return;
    };

    for (id, marker) in sky.0.markers.iter() {
        if labels.entities.contains_key(&id) {
            continue;
        }

        let entity = commands
            .spawn((
                Node {
                    position_type: PositionType::Absolute,
                    ..default()
                },
                Text::new(marker.label.clone()),
                TextFont {
                    font_size: LABEL_FONT_SIZE,
                    ..default()
                },
                TextColor(Color::WHITE),
                Visibility::Hidden,
                MarkerLabel { id },
                ChildOf(root),
            ))
            .id();
        labels.entities.insert(id, entity);
    }

    tracing::debug!("Tracking {} marker labels", labels.len());
}

fn sync_marker_labels(
    sky: Res<Sky>,
    mut labels: Query<(&MarkerLabel, &mut Node, &mut Visibility)>,
) {
    for (label, mut node, mut visibility) in &mut labels {
        let Some(marker) = sky.0.markers.get(label.id) else {
            continue;
        };
        let placement = marker.placement;

        node.left = Val::Px(placement.x as f32);
        node.top = Val::Px(placement.y as f32);
        *visibility = if placement.visible {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zodiac_core::SkyContext;

    fn sky_with_markers() -> (Sky, MarkerId, MarkerId) {
        let mut sky = SkyContext::default();
        let forward = sky.camera.forward();
        let front = sky.markers.add_marker(sky.camera.position + forward * 100.0, "Aries");
        let behind = sky.markers.add_marker(sky.camera.position - forward * 100.0, "Libra");
        sky.markers.update_all(&sky.camera, &sky.viewport);
        (Sky(sky), front, behind)
    }

    fn label_app(sky: Sky) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(sky)
            .add_plugins(MarkerLabelPlugin);
        app.update();
        app
    }

    #[test]
    fn test_labels_follow_marker_placements() {
        let (sky, front, behind) = sky_with_markers();
        let app = label_app(sky);

        let labels = app.world().resource::<MarkerLabels>();
        assert_eq!(labels.len(), 2);
        let front = labels.get(front).unwrap();
        let behind = labels.get(behind).unwrap();

        let world = app.world();
        let node = world.get::<Node>(front).unwrap();
        assert_eq!(node.left, Val::Px(960.0));
        assert_eq!(node.top, Val::Px(540.0));
        assert_eq!(world.get::<Visibility>(front), Some(&Visibility::Inherited));
        assert_eq!(world.get::<Text>(front).map(|t| t.0.as_str()), Some("Aries"));

        assert_eq!(world.get::<Visibility>(behind), Some(&Visibility::Hidden));
    }

    #[test]
    fn test_label_hides_when_camera_turns_away() {
        let (sky, front, _) = sky_with_markers();
        let mut app = label_app(sky);

        {
            let mut sky = app.world_mut().resource_mut::<Sky>();
            let SkyContext {
                camera,
                viewport,
                markers,
                ..
            } = &mut sky.0;
            camera.orientation.y += std::f64::consts::PI;
            markers.update_all(camera, viewport);
        }
        app.update();

        let entity = app.world().resource::<MarkerLabels>().get(front).unwrap();
        assert_eq!(app.world().get::<Visibility>(entity), Some(&Visibility::Hidden));
        assert_eq!(app.world().resource::<MarkerLabels>().len(), 2);
    }
}
