//! Scroll-driven camera choreography
//!
//! The page scrolls through one content section per zodiac sign. Scroll
//! progress in `[0, 1]` drives the camera through one keyframe per sign and
//! selects the active navigation entry. A slow idle roll runs while the page
//! sits at the top.

use glam::DVec3;
use std::f64::consts::{PI, TAU};

use crate::zodiac::ZodiacSign;

/// Idle roll rate in radians per second
pub const DEFAULT_IDLE_ROLL_RATE: f64 = 0.05;
/// Seconds the tween playhead takes to catch up with the scroll position
pub const DEFAULT_SCRUB_LAG_SECS: f64 = 1.0;
/// Duration of the smooth scroll triggered from the navigation
pub const DEFAULT_SCROLL_TO_SECS: f64 = 3.0;

/// Target orientation for one section
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub sign: ZodiacSign,
    /// XYZ Euler angles in radians
    pub orientation: DVec3,
}

/// Ordered keyframes, evenly spread over scroll progress
#[derive(Debug, Clone, PartialEq)]
pub struct Choreographer {
    keyframes: Vec<Keyframe>,
}

impl Default for Choreographer {
    fn default() -> Self {
        Self::zodiac()
    }
}

impl Choreographer {
    /// Empty keyframe lists are replaced by a single identity keyframe
    pub fn new(keyframes: Vec<Keyframe>) -> Self {
        if keyframes.is_empty() {
            return Self {
                keyframes: vec![Keyframe {
                    sign: ZodiacSign::Aries,
                    orientation: DVec3::ZERO,
                }],
            };
        }
        Self { keyframes }
    }

    /// One keyframe per sign in content order, starting at the initial view
    pub fn zodiac() -> Self {
        Self::new(
            ZodiacSign::ALL
                .iter()
                .map(|&sign| Keyframe {
                    sign,
                    orientation: sign.camera_orientation(),
                })
                .collect(),
        )
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    pub fn section_count(&self) -> usize {
        self.keyframes.len()
    }

    /// Linear interpolation through the keyframes: 0 is the first, 1 the last
    pub fn orientation_at(&self, progress: f64) -> DVec3 {
        let progress = clamp_progress(progress);
        let segments = self.keyframes.len() - 1;
        if segments == 0 {
            return self.keyframes[0].orientation;
        }

        let position = progress * segments as f64;
        let index = (position.floor() as usize).min(segments - 1);
        let t = position - index as f64;

        self.keyframes[index]
            .orientation
            .lerp(self.keyframes[index + 1].orientation, t)
    }

    /// Section whose navigation entry should be highlighted
    pub fn active_section(&self, progress: f64) -> usize {
        let count = self.section_count();
        let snap = 1.0 / count as f64;
        let index = (clamp_progress(progress) / snap).round() as usize;
        index.min(count - 1)
    }
}

fn clamp_progress(progress: f64) -> f64 {
    if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    }
}

/// Navigation entries with at most one active at a time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavIndicators {
    count: usize,
    active: Option<usize>,
}

impl NavIndicators {
    pub fn new(count: usize) -> Self {
        Self { count, active: None }
    }

    /// Clear every entry, then mark `index` active. Returns whether the
    /// active entry changed.
    pub fn activate(&mut self, index: usize) -> bool {
        if index >= self.count {
            return false;
        }
        let changed = self.active != Some(index);
        self.active = Some(index);
        changed
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.active == Some(index)
    }

    pub fn active_count(&self) -> usize {
        (0..self.count).filter(|&i| self.is_active(i)).count()
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Tween playhead that trails the scroll position
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollScrub {
    target: f64,
    playhead: f64,
    lag_secs: f64,
}

impl Default for ScrollScrub {
    fn default() -> Self {
        Self::new(DEFAULT_SCRUB_LAG_SECS)
    }
}

impl ScrollScrub {
    const SETTLE_EPSILON: f64 = 1e-4;

    pub fn new(lag_secs: f64) -> Self {
        Self {
            target: 0.0,
            playhead: 0.0,
            lag_secs: lag_secs.max(0.0),
        }
    }

    pub fn set_target(&mut self, progress: f64) {
        self.target = clamp_progress(progress);
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn playhead(&self) -> f64 {
        self.playhead
    }

    /// Move the playhead toward the scroll position. It covers about 95% of
    /// the distance within one lag period and snaps once close enough.
    pub fn advance(&mut self, dt_secs: f64) -> f64 {
        if self.lag_secs == 0.0 {
            self.playhead = self.target;
            return self.playhead;
        }

        let rate = 3.0 / self.lag_secs;
        let blend = 1.0 - (-rate * dt_secs.max(0.0)).exp();
        self.playhead += (self.target - self.playhead) * blend;

        if (self.target - self.playhead).abs() < Self::SETTLE_EPSILON {
            self.playhead = self.target;
        }
        self.playhead
    }

    /// True while the page sits at the very top
    pub fn is_at_rest(&self) -> bool {
        self.playhead <= 0.0
    }
}

/// Eased document scroll from one offset to another
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollTween {
    from: f64,
    to: f64,
    duration_secs: f64,
    elapsed_secs: f64,
}

impl ScrollTween {
    pub fn new(from: f64, to: f64, duration_secs: f64) -> Self {
        Self {
            from,
            to,
            duration_secs: duration_secs.max(0.0),
            elapsed_secs: 0.0,
        }
    }

    /// Advance by `dt_secs` and return the scroll offset to apply
    pub fn advance(&mut self, dt_secs: f64) -> f64 {
        self.elapsed_secs = (self.elapsed_secs + dt_secs.max(0.0)).min(self.duration_secs);
        self.offset()
    }

    pub fn offset(&self) -> f64 {
        if self.duration_secs == 0.0 {
            return self.to;
        }
        let t = self.elapsed_secs / self.duration_secs;
        self.from + (self.to - self.from) * ease_out_quad(t)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_secs >= self.duration_secs
    }

    pub fn destination(&self) -> f64 {
        self.to
    }
}

fn ease_out_quad(t: f64) -> f64 {
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Decides which writer owns the camera orientation each frame.
///
/// While the scrub playhead is at rest at the top of the page the idle roll
/// spins the first keyframe. Once scrolling starts the idle phase freezes and
/// its weight falls linearly to zero across the first keyframe segment, so
/// the choreographer owns all three axes from the second keyframe on and the
/// hand-off never jumps.
#[derive(Debug, Clone)]
pub struct CameraDirector {
    pub choreographer: Choreographer,
    pub scrub: ScrollScrub,
    pub idle_roll_rate: f64,
    idle_phase: f64,
}

impl Default for CameraDirector {
    fn default() -> Self {
        Self::new(
            Choreographer::zodiac(),
            ScrollScrub::default(),
            DEFAULT_IDLE_ROLL_RATE,
        )
    }
}

impl CameraDirector {
    pub fn new(choreographer: Choreographer, scrub: ScrollScrub, idle_roll_rate: f64) -> Self {
        Self {
            choreographer,
            scrub,
            idle_roll_rate,
            idle_phase: 0.0,
        }
    }

    /// Accumulated idle roll in `[-PI, PI)`
    pub fn idle_roll(&self) -> f64 {
        self.idle_phase
    }

    /// Share of the idle roll still applied at `playhead`
    pub fn idle_weight(&self, playhead: f64) -> f64 {
        let segments = self.choreographer.section_count() - 1;
        if segments == 0 {
            return if playhead <= 0.0 { 1.0 } else { 0.0 };
        }
        (1.0 - playhead * segments as f64).clamp(0.0, 1.0)
    }

    /// Orientation for this frame
    pub fn resolve(&mut self, dt_secs: f64) -> DVec3 {
        let playhead = self.scrub.advance(dt_secs);

        // Wrapping is only invisible at full weight
        if self.scrub.is_at_rest() {
            self.idle_phase = wrap_angle(self.idle_phase + self.idle_roll_rate * dt_secs.max(0.0));
        }

        let mut orientation = self.choreographer.orientation_at(playhead);
        orientation.z += self.idle_phase * self.idle_weight(playhead);
        orientation
    }
}

fn wrap_angle(angle: f64) -> f64 {
    (angle + PI).rem_euclid(TAU) - PI
}
