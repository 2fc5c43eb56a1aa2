//! Zodiac Web - WebGPU-powered zodiac starfield
//!
//! This crate provides the browser entry point: it builds the Bevy app around
//! `zodiac-scene`, fetches the feeds and horoscopes, and binds the page's
//! scroll region and navigation to the camera.

mod app;
mod horoscope;
mod network;
mod scroll;

use wasm_bindgen::prelude::*;

/// Entry point for WASM module
#[wasm_bindgen(start)]
pub fn main() {
    // Set panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging; wgpu is chatty below INFO
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(tracing::Level::INFO)
            .build(),
    );

    // Run the Bevy app
    app::run();
}
