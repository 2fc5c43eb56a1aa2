//! Viewer configuration
//!
//! Loaded from TOML with every field defaulted, then selectively overridden
//! by page query parameters.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::catalog::DEFAULT_WORLD_SCALE;
use crate::choreography::{DEFAULT_IDLE_ROLL_RATE, DEFAULT_SCROLL_TO_SECS, DEFAULT_SCRUB_LAG_SECS};
use crate::horoscope::Day;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default)]
    pub feeds: FeedsConfig,
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub horoscope: HoroscopeConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedsConfig {
    #[serde(default = "default_stars_url")]
    pub stars_url: String,
    #[serde(default = "default_constellations_url")]
    pub constellations_url: String,
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            stars_url: default_stars_url(),
            constellations_url: default_constellations_url(),
        }
    }
}

fn default_stars_url() -> String {
    "https://princellea.github.io/stars.json".to_string()
}

fn default_constellations_url() -> String {
    "https://princellea.github.io/constellations.json".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Factor from feed units to world units
    #[serde(default = "default_world_scale")]
    pub world_scale: f32,
    /// Star sprite size in world units
    #[serde(default = "default_star_size")]
    pub star_size: f32,
    #[serde(default = "default_sky_radius")]
    pub sky_radius: f32,
    /// Panorama image wrapped on the inside of the sky sphere
    #[serde(default)]
    pub sky_texture: Option<String>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            world_scale: default_world_scale(),
            star_size: default_star_size(),
            sky_radius: default_sky_radius(),
            sky_texture: None,
        }
    }
}

fn default_world_scale() -> f32 {
    DEFAULT_WORLD_SCALE
}

fn default_star_size() -> f32 {
    20.0
}

fn default_sky_radius() -> f32 {
    9_000_000.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_fov")]
    pub fov_degrees: f64,
    #[serde(default = "default_near")]
    pub near: f64,
    #[serde(default = "default_far")]
    pub far: f64,
    #[serde(default = "default_position")]
    pub position: [f64; 3],
    /// Idle roll in radians per second
    #[serde(default = "default_idle_roll_rate")]
    pub idle_roll_rate: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: default_fov(),
            near: default_near(),
            far: default_far(),
            position: default_position(),
            idle_roll_rate: default_idle_roll_rate(),
        }
    }
}

fn default_fov() -> f64 {
    55.0
}

fn default_near() -> f64 {
    1.0
}

fn default_far() -> f64 {
    100_000_000_000.0
}

fn default_position() -> [f64; 3] {
    [-0.5, 0.0, 0.0]
}

fn default_idle_roll_rate() -> f64 {
    DEFAULT_IDLE_ROLL_RATE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Seconds the camera tween trails the scroll position
    #[serde(default = "default_scrub_lag")]
    pub scrub_lag_secs: f64,
    /// Duration of navigation-triggered smooth scrolling
    #[serde(default = "default_scroll_to")]
    pub scroll_to_secs: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            scrub_lag_secs: default_scrub_lag(),
            scroll_to_secs: default_scroll_to(),
        }
    }
}

fn default_scrub_lag() -> f64 {
    DEFAULT_SCRUB_LAG_SECS
}

fn default_scroll_to() -> f64 {
    DEFAULT_SCROLL_TO_SECS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoroscopeConfig {
    #[serde(default = "default_horoscope_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_api_host")]
    pub api_host: String,
    /// Left empty in the shipped config; requests are skipped without it
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub day: Day,
}

impl Default for HoroscopeConfig {
    fn default() -> Self {
        Self {
            endpoint: default_horoscope_endpoint(),
            api_host: default_api_host(),
            api_key: String::new(),
            day: Day::default(),
        }
    }
}

impl HoroscopeConfig {
    pub fn has_credentials(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.api_host.trim().is_empty()
    }
}

fn default_horoscope_endpoint() -> String {
    "https://sameer-kumar-aztro-v1.p.rapidapi.com/".to_string()
}

fn default_api_host() -> String {
    "sameer-kumar-aztro-v1.p.rapidapi.com".to_string()
}

impl ViewerConfig {
    /// Parse a TOML document; missing sections and fields take defaults
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: ViewerConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Apply page query overrides. `lookup` returns the decoded value of a
    /// query parameter when present.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("stars") {
            info!(url = %url, "Star feed overridden from page URL");
            self.feeds.stars_url = url;
        }
        if let Some(url) = lookup("constellations") {
            info!(url = %url, "Constellation feed overridden from page URL");
            self.feeds.constellations_url = url;
        }
        if let Some(value) = lookup("day") {
            match Day::parse(&value) {
                Some(day) => self.horoscope.day = day,
                None => warn!(value = %value, "Ignoring unknown horoscope day"),
            }
        }
        if let Some(key) = lookup("rapidapi_key") {
            self.horoscope.api_key = key;
        }
    }
}
