//! The twelve zodiac signs, in content order

use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A zodiac sign; doubles as the content section and navigation entry for it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    pub const ALL: [ZodiacSign; 12] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Position in content order
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Lowercase identifier used for DOM ids and API queries
    pub fn id(self) -> &'static str {
        match self {
            ZodiacSign::Aries => "aries",
            ZodiacSign::Taurus => "taurus",
            ZodiacSign::Gemini => "gemini",
            ZodiacSign::Cancer => "cancer",
            ZodiacSign::Leo => "leo",
            ZodiacSign::Virgo => "virgo",
            ZodiacSign::Libra => "libra",
            ZodiacSign::Scorpio => "scorpio",
            ZodiacSign::Sagittarius => "sagittarius",
            ZodiacSign::Capricorn => "capricorn",
            ZodiacSign::Aquarius => "aquarius",
            ZodiacSign::Pisces => "pisces",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        let id = id.trim().trim_start_matches('#');
        Self::ALL
            .iter()
            .copied()
            .find(|sign| sign.id().eq_ignore_ascii_case(id))
    }

    /// Camera orientation (XYZ Euler, radians) that frames this constellation
    pub fn camera_orientation(self) -> DVec3 {
        let [x, y, z] = match self {
            ZodiacSign::Aries => [0.6246883485667359, 0.7680763125762045, -2.7002597811776683],
            ZodiacSign::Taurus => [0.2646973601345418, 1.3503583496660425, -2.2820396403826795],
            ZodiacSign::Gemini => [-2.379347439984521, 1.248157748650426, -0.4445972885108448],
            ZodiacSign::Cancer => [-2.536937365926273, 0.8150542856828509, -0.15064891910358827],
            ZodiacSign::Leo => [-2.647632791885636, 0.4185790671769536, 0.016313303703272296],
            ZodiacSign::Virgo => [-2.725469651065501, -0.4171326740310278, 0.48498436346179713],
            ZodiacSign::Libra => [-2.7778626045686763, -0.9975277894510113, -0.09306499145028138],
            ZodiacSign::Scorpio => [-2.3173280943661183, -1.343752483994535, 0.4178216558874426],
            ZodiacSign::Sagittarius => [0.1928567109565242, -1.353259605494904, 2.950169165852059],
            ZodiacSign::Capricorn => [0.5527504310154994, -0.42439497338129567, -1.9398356802158965],
            ZodiacSign::Aquarius => [0.5527504310154994, -0.42439497338129567, -2.2398356802158965],
            ZodiacSign::Pisces => [0.5537394454387581, 3.99147474297553116, -3.924938962938633],
        };
        DVec3::new(x, y, z)
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}
