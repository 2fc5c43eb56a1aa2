//! Page scroll bindings
//!
//! The `.zodiac-content` region drives the camera: its scroll progress feeds
//! the choreography every frame, the matching `.indicator-nav li` entry gets
//! the `active` class, and clicking an entry eases the page to that sign's
//! section.

use bevy::prelude::*;
use std::sync::{Arc, Mutex};
use zodiac_core::{ScrollTween, ZodiacSign};
use zodiac_scene::frame::FrameSet;
use zodiac_scene::Sky;

use crate::app::AppConfig;

pub const CONTENT_SELECTOR: &str = ".zodiac-content";
pub const NAV_ITEM_SELECTOR: &str = ".indicator-nav li";
pub const ACTIVE_CLASS: &str = "active";

pub struct ScrollPlugin;

impl Plugin for ScrollPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ScrollState>()
            .add_systems(Startup, bind_navigation)
            .add_systems(
                Update,
                (start_scroll_to, advance_scroll_to, track_scroll_progress)
                    .chain()
                    .before(FrameSet),
            );
    }
}

/// Navigation clicks and the scroll animation they start
#[derive(Resource, Default)]
pub struct ScrollState {
    /// Sign id of the last clicked navigation entry
    pub clicked: Arc<Mutex<Option<String>>>,
    pub tween: Option<ScrollTween>,
}

/// Progress of a scroll region through the viewport, in `[0, 1]`.
///
/// `top` is the region's top edge relative to the viewport. Progress is 0
/// while that edge is at or below the viewport top and reaches 1 when the
/// region's bottom edge passes it, so with one section per sign section `k`
/// sits at `k / count`.
pub fn scroll_progress(top: f64, height: f64) -> f64 {
    if height <= 0.0 || !height.is_finite() {
        return 0.0;
    }
    (-top / height).clamp(0.0, 1.0)
}

/// Section to scroll to for a navigation label
pub fn target_sign(label: &str) -> Option<ZodiacSign> {
    let sign = ZodiacSign::from_id(label);
    if sign.is_none() {
        tracing::warn!("Navigation entry {:?} names no sign", label);
    }
    sign
}

#[cfg(target_arch = "wasm32")]
fn bind_navigation(state: Res<ScrollState>) {
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let Ok(items) = document.query_selector_all(NAV_ITEM_SELECTOR) else {
        return;
    };

    for i in 0..items.length() {
        let Some(item) = items.get(i).and_then(|node| node.dyn_into::<web_sys::Element>().ok()) else {
            continue;
        };
        let Some(label) = item.get_attribute("data-label") else {
            continue;
        };

        let clicked = state.clicked.clone();
        let onclick = Closure::wrap(Box::new(move |_: web_sys::Event| {
            if let Ok(mut slot) = clicked.lock() {
                *slot = Some(label.clone());
            }
        }) as Box<dyn FnMut(web_sys::Event)>);
        if let Err(e) = item.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref()) {
            tracing::error!("Failed to bind navigation entry: {:?}", e);
        }
        onclick.forget();
    }

    tracing::info!("Bound {} navigation entries", items.length());
}

#[cfg(not(target_arch = "wasm32"))]
fn bind_navigation(_state: Res<ScrollState>) {
    tracing::warn!("Page navigation is only available in the browser");
}

fn start_scroll_to(config: Res<AppConfig>, mut state: ResMut<ScrollState>) {
    let label = match state.clicked.try_lock() {
        Ok(mut slot) => slot.take(),
        Err(_) => None,
    };
    let Some(sign) = label.as_deref().and_then(target_sign) else {
        return;
    };

    #[cfg(target_arch = "wasm32")]
    if let Some((from, to)) = section_offsets(sign) {
        tracing::debug!("Scrolling to {} ({} -> {})", sign, from, to);
        state.tween = Some(ScrollTween::new(from, to, config.0.scroll.scroll_to_secs));
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = (&config, &mut state);
        tracing::debug!("Ignoring scroll to {} outside the browser", sign);
    }
}

/// Current scroll offset and the document offset of a sign's section
#[cfg(target_arch = "wasm32")]
fn section_offsets(sign: ZodiacSign) -> Option<(f64, f64)> {
    let window = web_sys::window()?;
    let section = window.document()?.get_element_by_id(sign.id())?;
    let from = window.scroll_y().ok()?;
    Some((from, from + section.get_bounding_client_rect().top()))
}

fn advance_scroll_to(time: Res<Time>, mut state: ResMut<ScrollState>) {
    let Some(tween) = state.tween.as_mut() else {
        return;
    };

    let offset = tween.advance(time.delta_secs_f64());
    let finished = tween.is_finished();

    #[cfg(target_arch = "wasm32")]
    if let Some(window) = web_sys::window() {
        window.scroll_to_with_x_and_y(0.0, offset);
    }
    #[cfg(not(target_arch = "wasm32"))]
    let _ = offset;

    if finished {
        state.tween = None;
    }
}

#[cfg(target_arch = "wasm32")]
fn track_scroll_progress(mut sky: ResMut<Sky>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };
    let Ok(Some(content)) = document.query_selector(CONTENT_SELECTOR) else {
        return;
    };

    let rect = content.get_bounding_client_rect();
    let progress = scroll_progress(rect.top(), rect.height());

    if let Some(active) = sky.0.set_scroll_progress(progress) {
        highlight_nav(&document, active);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn track_scroll_progress(_sky: ResMut<Sky>) {}

/// Mark exactly one navigation entry active
#[cfg(target_arch = "wasm32")]
fn highlight_nav(document: &web_sys::Document, active: usize) {
    use wasm_bindgen::JsCast;

    let Ok(items) = document.query_selector_all(NAV_ITEM_SELECTOR) else {
        return;
    };
    for i in 0..items.length() {
        if let Some(item) = items.get(i).and_then(|node| node.dyn_into::<web_sys::Element>().ok()) {
            let _ = item
                .class_list()
                .toggle_with_force(ACTIVE_CLASS, i as usize == active);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zodiac_core::Choreographer;

    #[test]
    fn test_scroll_progress_bounds() {
        assert_eq!(scroll_progress(100.0, 12000.0), 0.0);
        assert_eq!(scroll_progress(0.0, 12000.0), 0.0);
        assert_eq!(scroll_progress(-12000.0, 12000.0), 1.0);
        assert_eq!(scroll_progress(-20000.0, 12000.0), 1.0);
        assert_eq!(scroll_progress(-10.0, 0.0), 0.0);
    }

    #[test]
    fn test_each_section_highlights_its_own_entry() {
        let choreographer = Choreographer::zodiac();
        let viewport_height = 1000.0;
        let height = viewport_height * ZodiacSign::COUNT as f64;

        for sign in ZodiacSign::ALL {
            let k = sign.index();
            // Section top at the viewport top, and partway through the section
            for offset in [0.0, 0.4 * viewport_height] {
                let top = -(k as f64 * viewport_height + offset);
                let active = choreographer.active_section(scroll_progress(top, height));
                assert_eq!(active, k, "{sign} at offset {offset}");
            }
        }
    }

    #[test]
    fn test_target_sign_from_label() {
        assert_eq!(target_sign("scorpio"), Some(ZodiacSign::Scorpio));
        assert_eq!(target_sign("#Leo"), Some(ZodiacSign::Leo));
        assert_eq!(target_sign("ophiuchus"), None);
    }
}
