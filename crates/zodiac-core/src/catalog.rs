//! Star and constellation feeds
//!
//! Both feeds are JSON arrays fetched independently. Records are parsed as-is
//! and then expanded into render-ready primitives in world units: a single
//! point cloud for the stars and one line path per constellation stroke.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Uniform factor applied to feed coordinates to get world units
pub const DEFAULT_WORLD_SCALE: f32 = 40.0;

/// Shared color of every constellation line (cyan)
pub const CONSTELLATION_LINE_COLOR: [f32; 3] = [0.0, 1.0, 1.0];

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Failed to fetch {feed} feed: {message}")]
    Fetch { feed: &'static str, message: String },
    #[error("HTTP {status} from {feed} feed")]
    Status { feed: &'static str, status: u16 },
    #[error("Failed to parse {feed} feed: {source}")]
    Parse {
        feed: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// One entry of the star feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarRecord {
    /// Position in feed units
    pub pos: [f64; 3],
    /// RGB with 0-255 channels
    pub color: [f32; 3],
    pub luminosity: f64,
}

/// A point of a constellation stroke
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeedPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl FeedPoint {
    fn scaled(&self, scale: f32) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32) * scale
    }
}

/// One entry of the constellation feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstellationRecord {
    pub abbr: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Strokes, each an ordered run of points
    #[serde(default)]
    pub stars: Vec<Vec<FeedPoint>>,
}

impl ConstellationRecord {
    /// Full name when the feed has one, otherwise the abbreviation
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.abbr)
    }
}

/// Parse the star feed body
pub fn parse_star_feed(json: &str) -> Result<Vec<StarRecord>, FeedError> {
    serde_json::from_str(json).map_err(|source| FeedError::Parse { feed: "star", source })
}

/// Parse the constellation feed body
pub fn parse_constellation_feed(json: &str) -> Result<Vec<ConstellationRecord>, FeedError> {
    serde_json::from_str(json).map_err(|source| FeedError::Parse {
        feed: "constellation",
        source,
    })
}

/// All stars as one point cloud with per-vertex color
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StarField {
    pub positions: Vec<[f32; 3]>,
    /// Unit-interval RGB, one per position
    pub colors: Vec<[f32; 3]>,
    /// `luminosity^0.25`, one per position. Not used by the renderer yet.
    pub luminance: Vec<f32>,
}

impl StarField {
    pub fn from_records(records: &[StarRecord], scale: f32) -> Self {
        let mut field = Self {
            positions: Vec::with_capacity(records.len()),
            colors: Vec::with_capacity(records.len()),
            luminance: Vec::with_capacity(records.len()),
        };

        for star in records {
            let [x, y, z] = star.pos;
            field
                .positions
                .push((Vec3::new(x as f32, y as f32, z as f32) * scale).to_array());
            field
                .colors
                .push(star.color.map(|channel| (channel / 255.0).clamp(0.0, 1.0)));
            field
                .luminance
                .push(star.luminosity.max(0.0).powf(0.25) as f32);
        }

        debug!(count = field.len(), "Built star field");
        field
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// One drawable constellation stroke in world units
#[derive(Debug, Clone, PartialEq)]
pub struct LinePath {
    pub points: Vec<[f32; 3]>,
}

/// A constellation ready for rendering and labelling
#[derive(Debug, Clone, PartialEq)]
pub struct ConstellationFigure {
    pub label: String,
    pub abbr: String,
    /// First point of the first stroke; `None` when the record has no points
    pub anchor: Option<Vec3>,
    pub paths: Vec<LinePath>,
}

impl ConstellationFigure {
    /// Build the figure for one record. Strokes with fewer than two points
    /// cannot be drawn as lines and are left out.
    pub fn from_record(record: &ConstellationRecord, scale: f32) -> Self {
        let anchor = record
            .stars
            .first()
            .and_then(|stroke| stroke.first())
            .map(|point| point.scaled(scale));

        let paths: Vec<LinePath> = record
            .stars
            .iter()
            .filter(|stroke| stroke.len() >= 2)
            .map(|stroke| LinePath {
                points: stroke.iter().map(|p| p.scaled(scale).to_array()).collect(),
            })
            .collect();

        let skipped = record.stars.len() - paths.len();
        if skipped > 0 {
            debug!(abbr = %record.abbr, skipped, "Skipped degenerate constellation strokes");
        }

        Self {
            label: record.label().to_string(),
            abbr: record.abbr.clone(),
            anchor,
            paths,
        }
    }
}

/// Build every constellation figure in feed order
pub fn build_constellations(records: &[ConstellationRecord], scale: f32) -> Vec<ConstellationFigure> {
    let figures: Vec<ConstellationFigure> = records
        .iter()
        .map(|record| ConstellationFigure::from_record(record, scale))
        .collect();

    debug!(
        count = figures.len(),
        lines = figures.iter().map(|f| f.paths.len()).sum::<usize>(),
        "Built constellations"
    );
    figures
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_field_has_one_entry_per_record() {
        let json = r#"[
            {"pos": [1.0, 2.0, 3.0], "color": [255, 128, 0], "luminosity": 16.0},
            {"pos": [-0.5, 0.0, 0.25], "color": [0, 0, 255], "luminosity": 1.0},
            {"pos": [0.0, 0.0, 0.0], "color": [10, 20, 30], "luminosity": 0.0001}
        ]"#;

        let records = parse_star_feed(json).unwrap();
        let field = StarField::from_records(&records, DEFAULT_WORLD_SCALE);

        assert_eq!(field.len(), 3);
        assert_eq!(field.positions.len(), 3);
        assert_eq!(field.colors.len(), 3);
        assert_eq!(field.luminance.len(), 3);
        for color in &field.colors {
            assert!(color.iter().all(|c| (0.0..=1.0).contains(c)));
        }

        assert_eq!(field.positions[0], [40.0, 80.0, 120.0]);
        assert_eq!(field.colors[0], [1.0, 128.0 / 255.0, 0.0]);
        assert!((field.luminance[0] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_out_of_range_color_is_clamped() {
        let record = StarRecord {
            pos: [0.0, 0.0, 0.0],
            color: [300.0, -5.0, 255.0],
            luminosity: 1.0,
        };
        let field = StarField::from_records(&[record], 1.0);
        assert_eq!(field.colors[0], [1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_empty_star_feed() {
        let records = parse_star_feed("[]").unwrap();
        assert!(StarField::from_records(&records, DEFAULT_WORLD_SCALE).is_empty());
    }

    #[test]
    fn test_label_falls_back_to_abbreviation() {
        let json = r#"[{"abbr": "UMa", "stars": [[{"x": 0, "y": 0, "z": 0}, {"x": 1, "y": 0, "z": 0}]]}]"#;
        let records = parse_constellation_feed(json).unwrap();
        let figures = build_constellations(&records, DEFAULT_WORLD_SCALE);

        assert_eq!(figures.len(), 1);
        let uma = &figures[0];
        assert_eq!(uma.label, "UMa");
        assert_eq!(uma.paths.len(), 1);
        assert_eq!(uma.paths[0].points, vec![[0.0, 0.0, 0.0], [40.0, 0.0, 0.0]]);
        assert_eq!(uma.anchor, Some(Vec3::ZERO));
    }

    #[test]
    fn test_label_prefers_full_name() {
        let json = r#"[{"abbr": "Leo", "name": "Leo the Lion", "stars": [[{"x": 0.5, "y": 1, "z": -1}]]}]"#;
        let records = parse_constellation_feed(json).unwrap();
        let figure = ConstellationFigure::from_record(&records[0], 2.0);

        assert_eq!(figure.label, "Leo the Lion");
        assert_eq!(figure.abbr, "Leo");
        assert_eq!(figure.anchor, Some(Vec3::new(1.0, 2.0, -2.0)));
        // Single-point stroke is not drawable
        assert!(figure.paths.is_empty());
    }

    #[test]
    fn test_empty_strokes_have_no_anchor() {
        let record = ConstellationRecord {
            abbr: "Cru".to_string(),
            name: None,
            stars: vec![vec![]],
        };
        let figure = ConstellationFigure::from_record(&record, DEFAULT_WORLD_SCALE);
        assert_eq!(figure.anchor, None);
        assert!(figure.paths.is_empty());
    }

    #[test]
    fn test_parse_error_names_the_feed() {
        let err = parse_constellation_feed("{not json").unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse constellation feed"));
    }
}
