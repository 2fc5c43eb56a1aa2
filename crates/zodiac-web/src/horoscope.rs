//! Horoscope panel: one request per sign, results mounted into the page

use bevy::prelude::*;
use std::sync::{Arc, Mutex};
use zodiac_core::{HoroscopeBlock, HoroscopeError, HoroscopePanel, HoroscopeReading, ZodiacSign};

use crate::app::AppConfig;

pub struct HoroscopePlugin;

impl Plugin for HoroscopePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PendingHoroscopes>()
            .init_resource::<Horoscopes>()
            .add_systems(Startup, request_horoscopes)
            .add_systems(Update, mount_horoscopes);
    }
}

type Outcome = (ZodiacSign, Result<HoroscopeReading, HoroscopeError>);

/// Finished requests waiting to be mounted
#[derive(Resource, Default, Clone)]
pub struct PendingHoroscopes(pub Arc<Mutex<Vec<Outcome>>>);

/// Everything mounted so far
#[derive(Resource, Default)]
pub struct Horoscopes(pub HoroscopePanel);

/// Move finished requests into the panel, returning the blocks that were
/// appended in arrival order
fn drain_into(pending: &PendingHoroscopes, panel: &mut HoroscopePanel) -> Vec<(ZodiacSign, HoroscopeBlock)> {
    let outcomes: Vec<Outcome> = match pending.0.try_lock() {
        Ok(mut queue) => queue.drain(..).collect(),
        Err(_) => return Vec::new(),
    };

    outcomes
        .into_iter()
        .filter_map(|(sign, outcome)| {
            panel.apply(sign, outcome).map(|block| (sign, block.clone()))
        })
        .collect()
}

fn request_horoscopes(config: Res<AppConfig>, pending: Res<PendingHoroscopes>) {
    let settings = &config.0.horoscope;
    if !settings.has_credentials() {
        tracing::warn!("{}; horoscopes will not be shown", HoroscopeError::MissingCredentials);
        return;
    }

    #[cfg(target_arch = "wasm32")]
    for sign in ZodiacSign::ALL {
        let url = zodiac_core::horoscope::request_url(&settings.endpoint, sign, settings.day);
        fetch_horoscope(
            sign,
            url,
            settings.api_key.clone(),
            settings.api_host.clone(),
            pending.0.clone(),
        );
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = &pending;
        tracing::warn!("Horoscope requests are only available in the browser");
    }
}

#[cfg(target_arch = "wasm32")]
fn fetch_horoscope(
    sign: ZodiacSign,
    url: String,
    api_key: String,
    api_host: String,
    queue: Arc<Mutex<Vec<Outcome>>>,
) {
    use wasm_bindgen_futures::spawn_local;
    use zodiac_core::horoscope::{API_HOST_HEADER, API_KEY_HEADER};

    spawn_local(async move {
        let request = gloo_net::http::Request::post(&url)
            .header(API_KEY_HEADER, &api_key)
            .header(API_HOST_HEADER, &api_host);

        let outcome = match request.send().await {
            Ok(response) if response.ok() => match response.text().await {
                Ok(text) => HoroscopeReading::parse(sign, &text),
                Err(e) => Err(HoroscopeError::Request {
                    sign,
                    message: e.to_string(),
                }),
            },
            Ok(response) => Err(HoroscopeError::Status {
                sign,
                status: response.status(),
            }),
            Err(e) => Err(HoroscopeError::Request {
                sign,
                message: e.to_string(),
            }),
        };

        if let Ok(mut queue) = queue.lock() {
            queue.push((sign, outcome));
        }
    });
}

fn mount_horoscopes(pending: Res<PendingHoroscopes>, mut horoscopes: ResMut<Horoscopes>) {
    for (sign, block) in drain_into(&pending, &mut horoscopes.0) {
        #[cfg(target_arch = "wasm32")]
        if let Err(e) = mount_block(sign, &block) {
            tracing::error!("Failed to mount horoscope for {}: {:?}", sign, e);
        }

        #[cfg(not(target_arch = "wasm32"))]
        tracing::debug!("Horoscope for {} ready: {}", sign, block.heading);
    }
}

/// Append one block to the sign's section
#[cfg(target_arch = "wasm32")]
fn mount_block(sign: ZodiacSign, block: &HoroscopeBlock) -> Result<(), wasm_bindgen::JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("no document")?;
    let Some(region) = document.get_element_by_id(sign.id()) else {
        tracing::warn!("No #{} region on the page", sign.id());
        return Ok(());
    };

    let container = document.create_element("div")?;
    container.set_class_name("horoscope");

    let heading = document.create_element("h1")?;
    heading.set_text_content(Some(&block.heading));
    container.append_child(&heading)?;

    let date_range = document.create_element("h2")?;
    date_range.set_text_content(Some(&block.date_range));
    container.append_child(&date_range)?;

    let description = document.create_element("p")?;
    description.set_text_content(Some(&block.description));
    container.append_child(&description)?;

    let details = document.create_element("ul")?;
    for (label, value) in &block.details {
        details.append_child(&detail_item(&document, label, value)?)?;
    }
    container.append_child(&details)?;

    region.append_child(&container)?;
    Ok(())
}

/// Text of the bold label and of the value that follows it
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn detail_parts(label: &str, value: &str) -> (String, String) {
    (format!("{}:", label), format!(" {}", value))
}

/// `<li><b>Label:</b> value</li>`
#[cfg(target_arch = "wasm32")]
fn detail_item(
    document: &web_sys::Document,
    label: &str,
    value: &str,
) -> Result<web_sys::Element, wasm_bindgen::JsValue> {
    let (label, value) = detail_parts(label, value);
    let item = document.create_element("li")?;
    let name = document.create_element("b")?;
    name.set_text_content(Some(&label));
    item.append_child(&name)?;
    item.append_child(&document.create_text_node(&value))?;
    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_mounts_successes_only() {
        let pending = PendingHoroscopes::default();
        {
            let mut queue = pending.0.lock().unwrap();
            queue.push((
                ZodiacSign::Leo,
                HoroscopeReading::parse(ZodiacSign::Leo, r#"{"mood":"Bold","lucky_number":7}"#),
            ));
            queue.push((
                ZodiacSign::Virgo,
                Err(HoroscopeError::Status {
                    sign: ZodiacSign::Virgo,
                    status: 403,
                }),
            ));
        }

        let mut panel = HoroscopePanel::new();
        let mounted = drain_into(&pending, &mut panel);

        assert_eq!(mounted.len(), 1);
        assert_eq!(mounted[0].0, ZodiacSign::Leo);
        assert_eq!(mounted[0].1.heading, "LEO");
        assert!(panel.blocks(ZodiacSign::Virgo).is_empty());
        assert!(pending.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_detail_parts_split_label_from_value() {
        let block = HoroscopeBlock::new(
            ZodiacSign::Leo,
            &HoroscopeReading::parse(ZodiacSign::Leo, r#"{"mood":"Bold","lucky_number":7}"#).unwrap(),
        );
        let rows: Vec<(String, String)> = block
            .details
            .iter()
            .map(|(label, value)| detail_parts(label, value))
            .collect();

        assert_eq!(rows[1], ("Mood:".to_string(), " Bold".to_string()));
        assert_eq!(rows[3], ("Lucky Number:".to_string(), " 7".to_string()));
    }

    #[test]
    fn test_drain_empty_queue() {
        let pending = PendingHoroscopes::default();
        let mut panel = HoroscopePanel::new();
        assert!(drain_into(&pending, &mut panel).is_empty());
    }
}
