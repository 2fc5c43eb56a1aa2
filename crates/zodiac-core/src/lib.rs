//! Zodiac Core - Engine-independent logic for the zodiac sky viewer
//!
//! This crate provides the pieces of the visualization that do not depend on
//! a renderer:
//! - Star and constellation feed parsing into render-ready primitives
//! - World to screen projection for label markers
//! - Scroll-driven camera choreography through the zodiac constellations
//! - The per-frame loop with an injectable clock
//! - Horoscope data model and panel state
//! - Viewer configuration

pub mod catalog;
pub mod choreography;
pub mod config;
pub mod frame_loop;
pub mod horoscope;
pub mod markers;
pub mod projection;
pub mod zodiac;

pub use catalog::{
    ConstellationFigure, ConstellationRecord, FeedError, LinePath, StarField, StarRecord,
};
pub use choreography::{
    CameraDirector, Choreographer, Keyframe, NavIndicators, ScrollScrub, ScrollTween,
};
pub use config::{ConfigError, ViewerConfig};
pub use frame_loop::{Clock, FrameLoop, FrameRenderer, ManualClock, PointerState, SkyContext};
pub use horoscope::{Day, HoroscopeBlock, HoroscopeError, HoroscopePanel, HoroscopeReading};
pub use markers::{Marker, MarkerId, MarkerOverlay};
pub use projection::{project_to_screen, CameraState, ScreenPoint, Viewport};
pub use zodiac::ZodiacSign;
