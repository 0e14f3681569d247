//! Decorative confetti bursts.
//!
//! Bursts are fire-and-forget hints for an [`EffectSink`](crate::surface::EffectSink);
//! nothing in the refresh cycle depends on how (or whether) they are drawn.

use std::time::Duration;

use rand::Rng;
use serde::Serialize;

use crate::display::Color;

/// Warm palette used around today's birthdays.
pub const PARTY_PALETTE: [Color; 5] = [
    Color::from_hex(0xff6b6b),
    Color::from_hex(0x4ecdc4),
    Color::from_hex(0x45b7d1),
    Color::from_hex(0x96ceb4),
    Color::from_hex(0xffeaa7),
];

/// Cooler palette for the month view.
pub const MONTH_PALETTE: [Color; 5] = [
    Color::from_hex(0x00b4d8),
    Color::from_hex(0x4ecdc4),
    Color::from_hex(0x45b7d1),
    Color::from_hex(0x96ceb4),
    Color::from_hex(0xa8e6cf),
];

/// Palette for the background drizzle.
pub const DRIZZLE_PALETTE: [Color; 8] = [
    Color::from_hex(0xff6b6b),
    Color::from_hex(0x4ecdc4),
    Color::from_hex(0x45b7d1),
    Color::from_hex(0x96ceb4),
    Color::from_hex(0xffeaa7),
    Color::from_hex(0xff8c00),
    Color::from_hex(0x9932cc),
    Color::from_hex(0x32cd32),
];

/// How long the side streams keep firing after a today celebration starts.
pub const CELEBRATION_STREAM: Duration = Duration::from_secs(5);

/// Interval between background drizzle bursts.
pub const DRIZZLE_INTERVAL: Duration = Duration::from_millis(500);

/// Launch point as a fraction of the surface, `(0, 0)` being top left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Origin {
    pub x: f32,
    pub y: f32,
}

/// Particle motion overrides. `None` on a burst means the sink's defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Physics {
    /// Frames each particle lives for.
    pub ticks: u32,
    pub gravity: f32,
    /// Fraction of speed kept per frame.
    pub decay: f32,
    pub start_velocity: f32,
}

/// Short-lived, floaty particles for the background drizzle.
pub const DRIZZLE_PHYSICS: Physics = Physics {
    ticks: 50,
    gravity: 0.3,
    decay: 0.94,
    start_velocity: 15.0,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Burst {
    pub particles: u32,
    /// Launch direction in degrees, 90 is straight up.
    pub angle: f32,
    /// Cone width in degrees.
    pub spread: f32,
    pub origin: Origin,
    /// Empty means the sink's own colours.
    pub palette: Vec<Color>,
    /// Keep re-emitting for this long, if set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sustain_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub physics: Option<Physics>,
}

impl Burst {
    fn new(particles: u32, spread: f32, x: f32, y: f32) -> Self {
        Burst {
            particles,
            angle: 90.0,
            spread,
            origin: Origin { x, y },
            palette: Vec::new(),
            sustain_ms: None,
            physics: None,
        }
    }

    fn angled(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    fn palette(mut self, palette: &[Color]) -> Self {
        self.palette = palette.to_vec();
        self
    }

    fn sustained(mut self, duration: Duration) -> Self {
        self.sustain_ms = Some(duration.as_millis() as u64);
        self
    }

    fn physics(mut self, physics: Physics) -> Self {
        self.physics = Some(physics);
        self
    }
}

/// Big central burst plus two side streams for today's birthdays.
pub fn celebration() -> Vec<Burst> {
    vec![
        Burst::new(250, 110.0, 0.5, 0.6),
        Burst::new(3, 55.0, 0.0, 0.8)
            .angled(60.0)
            .palette(&PARTY_PALETTE)
            .sustained(CELEBRATION_STREAM),
        Burst::new(3, 55.0, 1.0, 0.8)
            .angled(120.0)
            .palette(&PARTY_PALETTE)
            .sustained(CELEBRATION_STREAM),
    ]
}

/// Single gentler burst for a non-empty month view.
pub fn monthly() -> Burst {
    Burst::new(250, 100.0, 0.5, 0.7).palette(&MONTH_PALETTE)
}

/// Background drizzle burst dropped from just above the top edge at a
/// random point across the width.
pub fn drizzle() -> Burst {
    drizzle_at(rand::thread_rng().gen_range(0.0..1.0))
}

/// Background drizzle burst dropped at `x`.
pub fn drizzle_at(x: f32) -> Burst {
    Burst::new(150, 360.0, x, -0.1)
        .palette(&DRIZZLE_PALETTE)
        .physics(DRIZZLE_PHYSICS)
}
