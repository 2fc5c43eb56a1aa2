//! Per-frame loop and the state it drives
//!
//! `SkyContext` owns everything a frame touches: camera, viewport, markers,
//! scroll choreography and the loaded primitives. `FrameLoop::tick` runs
//! once per display refresh with time from an injectable `Clock`, so the
//! loop can be stepped deterministically in tests.

use glam::{DVec2, DVec3};
use std::cell::Cell;
use std::time::Duration;
use tracing::{debug, info};

use crate::catalog::{
    build_constellations, ConstellationFigure, ConstellationRecord, StarField, StarRecord,
};
use crate::choreography::{CameraDirector, Choreographer, NavIndicators, ScrollScrub};
use crate::config::ViewerConfig;
use crate::markers::MarkerOverlay;
use crate::projection::{CameraState, Viewport};

/// Source of time since the loop started
pub trait Clock {
    fn elapsed(&self) -> Duration;
}

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    elapsed: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.elapsed.set(self.elapsed.get() + by);
    }

    pub fn set(&self, elapsed: Duration) {
        self.elapsed.set(elapsed);
    }
}

impl Clock for ManualClock {
    fn elapsed(&self) -> Duration {
        self.elapsed.get()
    }
}

/// Receives the finished frame state
pub trait FrameRenderer {
    fn render(&mut self, sky: &SkyContext);
}

/// Last pointer position in normalized device coordinates. Tracked for
/// future interaction; nothing reads it yet.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub ndc: DVec2,
}

impl PointerState {
    pub fn update(&mut self, x: f64, y: f64, viewport: &Viewport) {
        if viewport.width <= 0.0 || viewport.height <= 0.0 {
            return;
        }
        self.ndc = DVec2::new(
            x / viewport.width * 2.0 - 1.0,
            -(y / viewport.height) * 2.0 + 1.0,
        );
    }
}

/// Everything the frame loop reads and writes
#[derive(Debug, Clone)]
pub struct SkyContext {
    pub camera: CameraState,
    pub viewport: Viewport,
    pub markers: MarkerOverlay,
    pub director: CameraDirector,
    pub nav: NavIndicators,
    pub pointer: PointerState,
    pub stars: Option<StarField>,
    pub constellations: Vec<ConstellationFigure>,
    world_scale: f32,
}

impl Default for SkyContext {
    fn default() -> Self {
        Self::new(&ViewerConfig::default())
    }
}

impl SkyContext {
    pub fn new(config: &ViewerConfig) -> Self {
        let choreographer = Choreographer::zodiac();
        let viewport = Viewport::default();
        let [x, y, z] = config.camera.position;

        let camera = CameraState {
            position: DVec3::new(x, y, z),
            orientation: choreographer.orientation_at(0.0),
            fov_y_degrees: config.camera.fov_degrees,
            near: config.camera.near,
            far: config.camera.far,
            aspect: viewport.aspect(),
        };

        Self {
            camera,
            viewport,
            markers: MarkerOverlay::new(),
            nav: NavIndicators::new(choreographer.section_count()),
            director: CameraDirector::new(
                choreographer,
                ScrollScrub::new(config.scroll.scrub_lag_secs),
                config.camera.idle_roll_rate,
            ),
            pointer: PointerState::default(),
            stars: None,
            constellations: Vec::new(),
            world_scale: config.scene.world_scale,
        }
    }

    pub fn world_scale(&self) -> f32 {
        self.world_scale
    }

    /// Viewport resize: keeps the camera aspect in step
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport != self.viewport {
            debug!(width = viewport.width, height = viewport.height, "Viewport resized");
            self.viewport = viewport;
            self.camera.fit_viewport(&viewport);
        }
    }

    /// New scroll progress from the page. Returns the navigation entry to
    /// highlight when it changed.
    pub fn set_scroll_progress(&mut self, progress: f64) -> Option<usize> {
        self.director.scrub.set_target(progress);
        let index = self.director.choreographer.active_section(progress);
        self.nav.activate(index).then_some(index)
    }

    /// Replace the star point cloud
    pub fn load_stars(&mut self, records: &[StarRecord]) -> &StarField {
        let field = StarField::from_records(records, self.world_scale);
        info!(count = field.len(), "Stars loaded");
        self.stars.insert(field)
    }

    /// Add constellation figures and one marker for each figure with an
    /// anchor. Returns the figures added by this call.
    pub fn load_constellations(&mut self, records: &[ConstellationRecord]) -> &[ConstellationFigure] {
        let start = self.constellations.len();
        let figures = build_constellations(records, self.world_scale);

        for figure in &figures {
            if let Some(anchor) = figure.anchor {
                self.markers.add_marker(anchor.as_dvec3(), figure.label.clone());
            }
        }

        self.constellations.extend(figures);
        info!(
            count = self.constellations.len() - start,
            markers = self.markers.len(),
            "Constellations loaded"
        );
        &self.constellations[start..]
    }
}

/// The render loop: one `tick` per display refresh until the page goes away
#[derive(Debug, Clone, Default)]
pub struct FrameLoop {
    last_elapsed: Option<f64>,
    frames: u64,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn tick<C, R>(&mut self, sky: &mut SkyContext, clock: &C, renderer: &mut R)
    where
        C: Clock + ?Sized,
        R: FrameRenderer + ?Sized,
    {
        let elapsed = clock.elapsed().as_secs_f64();
        let dt = self
            .last_elapsed
            .map(|last| (elapsed - last).max(0.0))
            .unwrap_or(0.0);
        self.last_elapsed = Some(elapsed);

        sky.camera.orientation = sky.director.resolve(dt);
        sky.markers.update_all(&sky.camera, &sky.viewport);
        renderer.render(sky);

        self.frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{parse_constellation_feed, parse_star_feed};
    use crate::zodiac::ZodiacSign;

    #[derive(Default)]
    struct RecordingRenderer {
        rolls: Vec<f64>,
        visible_markers: Vec<usize>,
    }

    impl FrameRenderer for RecordingRenderer {
        fn render(&mut self, sky: &SkyContext) {
            self.rolls.push(sky.camera.roll());
            self.visible_markers.push(
                sky.markers
                    .iter()
                    .filter(|(_, m)| m.placement.visible)
                    .count(),
            );
        }
    }

    #[test]
    fn test_tick_renders_empty_scene_before_data() {
        let mut sky = SkyContext::default();
        let mut frame_loop = FrameLoop::new();
        let clock = ManualClock::new();
        let mut renderer = RecordingRenderer::default();

        frame_loop.tick(&mut sky, &clock, &mut renderer);
        assert_eq!(frame_loop.frames(), 1);
        assert_eq!(renderer.visible_markers, vec![0]);
        assert!(sky.stars.is_none());
    }

    #[test]
    fn test_idle_roll_with_injected_clock() {
        let mut sky = SkyContext::default();
        let mut frame_loop = FrameLoop::new();
        let clock = ManualClock::new();
        let mut renderer = RecordingRenderer::default();
        let base = ZodiacSign::Aries.camera_orientation().z;

        for _ in 0..10 {
            frame_loop.tick(&mut sky, &clock, &mut renderer);
            clock.advance(Duration::from_millis(500));
        }

        for (i, roll) in renderer.rolls.iter().enumerate() {
            let expected = base + 0.05 * (i as f64 * 0.5);
            assert!((roll - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_markers_follow_loaded_constellations() {
        let mut sky = SkyContext::default();
        sky.camera.position = DVec3::ZERO;
        let records = parse_constellation_feed(
            r#"[
                {"abbr": "Ori", "name": "Orion", "stars": [[{"x": 0, "y": 0, "z": -10}, {"x": 1, "y": 0, "z": -10}]]},
                {"abbr": "Emp", "stars": [[]]}
            ]"#,
        )
        .unwrap();

        let added = sky.load_constellations(&records);
        assert_eq!(added.len(), 2);
        assert_eq!(sky.markers.len(), 1);
        assert_eq!(sky.constellations.len(), 2);

        let stars = parse_star_feed(r#"[{"pos": [0, 0, 1], "color": [255, 255, 255], "luminosity": 1}]"#)
            .unwrap();
        assert_eq!(sky.load_stars(&stars).len(), 1);
    }

    #[test]
    fn test_scroll_progress_hands_orientation_to_choreographer() {
        let mut sky = SkyContext::new(&ViewerConfig {
            scroll: crate::config::ScrollConfig {
                scrub_lag_secs: 0.0,
                ..Default::default()
            },
            ..Default::default()
        });
        let mut frame_loop = FrameLoop::new();
        let clock = ManualClock::new();
        let mut renderer = RecordingRenderer::default();

        assert_eq!(sky.set_scroll_progress(1.0), Some(11));
        assert_eq!(sky.set_scroll_progress(1.0), None);

        clock.set(Duration::from_secs(30));
        frame_loop.tick(&mut sky, &clock, &mut renderer);
        let error = (sky.camera.orientation - ZodiacSign::Pisces.camera_orientation()).abs();
        assert!(error.max_element() < 1e-9);
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut sky = SkyContext::default();
        sky.resize(Viewport::new(800.0, 800.0));
        assert_eq!(sky.camera.aspect, 1.0);
    }

    #[test]
    fn test_pointer_ndc() {
        let mut pointer = PointerState::default();
        let viewport = Viewport::new(200.0, 100.0);
        pointer.update(200.0, 0.0, &viewport);
        assert_eq!(pointer.ndc, DVec2::new(1.0, 1.0));
        pointer.update(100.0, 50.0, &viewport);
        assert_eq!(pointer.ndc, DVec2::ZERO);
    }
}
