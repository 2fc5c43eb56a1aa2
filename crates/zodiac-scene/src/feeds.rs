//! Hand-off point for fetched feed bodies
//!
//! Frontends fetch the star and constellation feeds asynchronously and drop
//! the raw JSON into these slots. A system drains them every frame, so the
//! feeds can arrive in any order, before or after the first frame.

use bevy::prelude::*;
use std::sync::{Arc, Mutex};
use zodiac_core::catalog::{parse_constellation_feed, parse_star_feed};

use crate::constellations::{line_material, spawn_constellation_lines};
use crate::starfield::{spawn_star_cloud, StarCloud};
use crate::types::{SceneSettings, Sky, SkyGroup};

/// Plugin for feed processing
pub struct FeedsPlugin;

impl Plugin for FeedsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PendingFeeds>()
            .init_resource::<ConstellationLines>()
            .add_systems(Update, (process_star_feed, process_constellation_feed));
    }
}

/// Raw feed bodies waiting to be turned into scene content
#[derive(Resource, Default, Clone)]
pub struct PendingFeeds {
    pub stars: Arc<Mutex<Option<String>>>,
    pub constellations: Arc<Mutex<Option<String>>>,
}

/// Shared line material and running line count
#[derive(Resource, Default)]
pub struct ConstellationLines {
    material: Option<Handle<StandardMaterial>>,
    count: usize,
}

fn take_pending(slot: &Arc<Mutex<Option<String>>>) -> Option<String> {
    slot.try_lock().ok().and_then(|mut body| body.take())
}

fn process_star_feed(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    pending: Res<PendingFeeds>,
    settings: Res<SceneSettings>,
    group: Res<SkyGroup>,
    mut sky: ResMut<Sky>,
    existing: Query<Entity, With<StarCloud>>,
) {
    let Some(body) = take_pending(&pending.stars) else {
        return;
    };

    let records = match parse_star_feed(&body) {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!(error = %e, "Discarding star feed");
            return;
        }
    };

    for entity in &existing {
        commands.entity(entity).despawn();
    }

    let field = sky.0.load_stars(&records);
    spawn_star_cloud(
        &mut commands,
        &mut meshes,
        &mut materials,
        field,
        &settings.0,
        group.0,
    );
}

fn process_constellation_feed(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    pending: Res<PendingFeeds>,
    group: Res<SkyGroup>,
    mut sky: ResMut<Sky>,
    mut lines: ResMut<ConstellationLines>,
) {
    let Some(body) = take_pending(&pending.constellations) else {
        return;
    };

    let records = match parse_constellation_feed(&body) {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!(error = %e, "Discarding constellation feed");
            return;
        }
    };

    let material = lines
        .material
        .get_or_insert_with(|| materials.add(line_material()))
        .clone();

    let figures = sky.0.load_constellations(&records);
    let spawned = spawn_constellation_lines(
        &mut commands,
        &mut meshes,
        &material,
        figures,
        group.0,
        lines.count,
    );
    lines.count += spawned;

    tracing::info!("Spawned {} constellation lines", spawned);
}
