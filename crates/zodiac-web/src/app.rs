//! Bevy application setup

use bevy::prelude::*;
use zodiac_core::ViewerConfig;
use zodiac_scene::{SceneSettings, Sky, ZodiacScenePlugin};

use crate::horoscope::HoroscopePlugin;
use crate::network::NetworkPlugin;
use crate::scroll::ScrollPlugin;

/// Configuration baked into the module
const EMBEDDED_CONFIG: &str = include_str!("../zodiac.toml");

/// Viewer configuration after query overrides
#[derive(Debug, Clone, Resource)]
pub struct AppConfig(pub ViewerConfig);

impl AppConfig {
    /// Embedded configuration with the page's query parameters applied
    pub fn from_browser() -> Self {
        let mut config = Self::embedded();

        #[cfg(target_arch = "wasm32")]
        if let Some(search) = web_sys::window().and_then(|w| w.location().search().ok()) {
            config.0.apply_overrides(|key| parse_query_param(&search, key));
        }

        config
    }

    fn embedded() -> Self {
        match ViewerConfig::from_toml(EMBEDDED_CONFIG) {
            Ok(config) => Self(config),
            Err(e) => {
                tracing::warn!("Embedded config rejected, using defaults: {}", e);
                Self(ViewerConfig::default())
            }
        }
    }
}

/// Decoded value of one query parameter
pub fn parse_query_param(search: &str, param: &str) -> Option<String> {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::UrlSearchParams::new_with_str(search)
            .ok()
            .and_then(|params| params.get(param))
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let search = search.trim_start_matches('?');
        search.split('&').find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            (key == param).then(|| value.replace("%3A", ":").replace("%2F", "/"))
        })
    }
}

pub fn run() {
    let config = AppConfig::from_browser();

    App::new()
        .insert_resource(ClearColor(Color::BLACK))
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Zodiac".to_string(),
                        canvas: Some("#sky-canvas".to_string()),
                        fit_canvas_to_parent: true,
                        // The page scrolls underneath the canvas
                        prevent_default_event_handling: false,
                        ..default()
                    }),
                    ..default()
                })
                .set(AssetPlugin {
                    // Panorama hosts don't serve .meta files
                    meta_check: bevy::asset::AssetMetaCheck::Never,
                    ..default()
                }),
        )
        .insert_resource(Sky::from_config(&config.0))
        .insert_resource(SceneSettings(config.0.scene.clone()))
        .insert_resource(config)
        .add_plugins(ZodiacScenePlugin)
        .add_plugins(NetworkPlugin)
        .add_plugins(ScrollPlugin)
        .add_plugins(HoroscopePlugin)
        .run();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_config_parses() {
        let config = ViewerConfig::from_toml(EMBEDDED_CONFIG).unwrap();
        assert_eq!(config.scene.world_scale, 40.0);
        assert_eq!(config.camera.fov_degrees, 55.0);
        assert!(!config.horoscope.has_credentials());
    }

    #[test]
    fn test_parse_query_param() {
        let search = "?stars=https%3A%2F%2Fexample.com%2Fstars.json&day=tomorrow";
        assert_eq!(
            parse_query_param(search, "stars").as_deref(),
            Some("https://example.com/stars.json")
        );
        assert_eq!(parse_query_param(search, "day").as_deref(), Some("tomorrow"));
        assert_eq!(parse_query_param(search, "rapidapi_key"), None);
    }
}
