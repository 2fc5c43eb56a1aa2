//! Feed fetching

use bevy::prelude::*;
use zodiac_scene::PendingFeeds;

use crate::app::AppConfig;

pub struct NetworkPlugin;

impl Plugin for NetworkPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, fetch_feeds);
    }
}

/// Start both feed requests. They complete independently; the scene picks
/// each body up whenever it lands.
fn fetch_feeds(config: Res<AppConfig>, pending: Res<PendingFeeds>) {
    let feeds = &config.0.feeds;

    #[cfg(target_arch = "wasm32")]
    {
        fetch_feed("star", feeds.stars_url.clone(), pending.stars.clone());
        fetch_feed(
            "constellation",
            feeds.constellations_url.clone(),
            pending.constellations.clone(),
        );
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = &pending;
        tracing::warn!(
            "Feed fetching is only available in the browser (stars: {}, constellations: {})",
            feeds.stars_url,
            feeds.constellations_url
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn fetch_feed(
    feed: &'static str,
    url: String,
    slot: std::sync::Arc<std::sync::Mutex<Option<String>>>,
) {
    use wasm_bindgen_futures::spawn_local;
    use zodiac_core::FeedError;

    spawn_local(async move {
        tracing::info!("Fetching {} feed from: {}", feed, url);

        let body = match gloo_net::http::Request::get(&url).send().await {
            Ok(response) if response.ok() => response.text().await.map_err(|e| FeedError::Fetch {
                feed,
                message: e.to_string(),
            }),
            Ok(response) => Err(FeedError::Status {
                feed,
                status: response.status(),
            }),
            Err(e) => Err(FeedError::Fetch {
                feed,
                message: e.to_string(),
            }),
        };

        match body {
            Ok(text) => {
                if let Ok(mut pending) = slot.lock() {
                    *pending = Some(text);
                }
            }
            Err(e) => tracing::error!("{}", e),
        }
    });
}
