//! Daily horoscope text for each sign
//!
//! One independent request per sign; each successful reply appends a block to
//! that sign's region. Failures are logged and leave the region untouched.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::{info, warn};

use crate::zodiac::ZodiacSign;

pub const API_KEY_HEADER: &str = "X-RapidAPI-Key";
pub const API_HOST_HEADER: &str = "X-RapidAPI-Host";

#[derive(Error, Debug)]
pub enum HoroscopeError {
    #[error("Horoscope API credentials are not configured")]
    MissingCredentials,
    #[error("Horoscope request for {sign} failed: {message}")]
    Request { sign: ZodiacSign, message: String },
    #[error("HTTP {status} from horoscope API for {sign}")]
    Status { sign: ZodiacSign, status: u16 },
    #[error("Invalid horoscope response for {sign}: {source}")]
    Parse {
        sign: ZodiacSign,
        #[source]
        source: serde_json::Error,
    },
}

/// Which day's reading to ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Yesterday,
    #[default]
    Today,
    Tomorrow,
}

impl Day {
    pub fn as_str(self) -> &'static str {
        match self {
            Day::Yesterday => "yesterday",
            Day::Today => "today",
            Day::Tomorrow => "tomorrow",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "yesterday" => Some(Day::Yesterday),
            "today" => Some(Day::Today),
            "tomorrow" => Some(Day::Tomorrow),
            _ => None,
        }
    }
}

/// Request URL for one sign and day
pub fn request_url(endpoint: &str, sign: ZodiacSign, day: Day) -> String {
    let separator = if endpoint.contains('?') { '&' } else { '?' };
    format!("{}{}sign={}&day={}", endpoint, separator, sign.id(), day.as_str())
}

/// A field the API sends either as text or as a number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DisplayValue {
    Text(String),
    Number(serde_json::Number),
}

impl Default for DisplayValue {
    fn default() -> Self {
        DisplayValue::Text(String::new())
    }
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayValue::Text(text) => write!(f, "{}", text),
            DisplayValue::Number(number) => write!(f, "{}", number),
        }
    }
}

/// API response body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HoroscopeReading {
    #[serde(default)]
    pub date_range: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub compatibility: String,
    #[serde(default)]
    pub mood: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub lucky_number: DisplayValue,
    #[serde(default)]
    pub lucky_time: String,
}

impl HoroscopeReading {
    pub fn parse(sign: ZodiacSign, json: &str) -> Result<Self, HoroscopeError> {
        serde_json::from_str(json).map_err(|source| HoroscopeError::Parse { sign, source })
    }
}

/// Formatted text for one reading, ready to mount
#[derive(Debug, Clone, PartialEq)]
pub struct HoroscopeBlock {
    /// Upper-cased sign name
    pub heading: String,
    pub date_range: String,
    pub description: String,
    /// Label / value pairs in display order
    pub details: Vec<(&'static str, String)>,
}

impl HoroscopeBlock {
    pub fn new(sign: ZodiacSign, reading: &HoroscopeReading) -> Self {
        Self {
            heading: sign.id().to_uppercase(),
            date_range: reading.date_range.clone(),
            description: reading.description.clone(),
            details: vec![
                ("Compatibility", reading.compatibility.clone()),
                ("Mood", reading.mood.clone()),
                ("Color", reading.color.clone()),
                ("Lucky Number", reading.lucky_number.to_string()),
                ("Lucky Time", reading.lucky_time.clone()),
            ],
        }
    }
}

/// Per-sign display regions
#[derive(Debug, Clone, Default)]
pub struct HoroscopePanel {
    regions: BTreeMap<ZodiacSign, Vec<HoroscopeBlock>>,
}

impl HoroscopePanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one request. Returns the appended block on
    /// success; a failure is logged and changes nothing.
    pub fn apply(
        &mut self,
        sign: ZodiacSign,
        outcome: Result<HoroscopeReading, HoroscopeError>,
    ) -> Option<&HoroscopeBlock> {
        match outcome {
            Ok(reading) => {
                info!(sign = %sign, "Horoscope loaded");
                let region = self.regions.entry(sign).or_default();
                region.push(HoroscopeBlock::new(sign, &reading));
                region.last()
            }
            Err(e) => {
                warn!(sign = %sign, error = %e, "Horoscope unavailable");
                None
            }
        }
    }

    pub fn blocks(&self, sign: ZodiacSign) -> &[HoroscopeBlock] {
        self.regions.get(&sign).map(Vec::as_slice).unwrap_or(&[])
    }
}
