//! Zabayan - a two-player breakout/pong duel
//!
//! Core modules:
//! - `sim`: Simulation (physics, collisions, bricks, power-ups, match flow)
//! - `tuning`: Data-driven game balance
//!
//! Rendering and input capture live outside this crate. A front-end feeds
//! [`sim::TickInput`] into [`sim::Match::tick`] once per frame and reads the
//! state back through [`sim::Match::state`] or [`sim::HudThrottle`].

pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

use rand::Rng;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (both halves)
    pub const GAME_WIDTH: f32 = 1200.0;
    pub const GAME_HEIGHT: f32 = 800.0;
    pub const HALF_WIDTH: f32 = GAME_WIDTH / 2.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 20.0;
    /// Distance from the bottom edge to the paddle top
    pub const PADDLE_OFFSET_Y: f32 = 50.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    /// Gap between a resting ball and the paddle top
    pub const BALL_REST_GAP: f32 = 2.0;
    /// Gap used when a replacement ball is spawned
    pub const BALL_RESPAWN_GAP: f32 = 5.0;

    /// Brick field layout (per player)
    pub const BRICK_ROWS: usize = 12;
    pub const BRICK_COLS: usize = 12;
    pub const BRICK_HEIGHT: f32 = 12.0;
    pub const BRICK_GAP: f32 = 10.0;
    pub const BRICK_OFFSET_TOP: f32 = 80.0;

    /// Brick classification thresholds (cumulative)
    pub const ATTACK_BRICK_CHANCE: f32 = 0.20;
    pub const BONUS_BRICK_CHANCE: f32 = 0.15;
    pub const HARD_BRICK_CHANCE: f32 = 0.10;
    pub const HARD_BRICK_HEALTH: u8 = 2;

    /// Falling power-up capsule size
    pub const POWERUP_SIZE: f32 = 30.0;

    /// Hard cap on live particles
    pub const MAX_PARTICLES: usize = 1024;
    /// Particle life lost per tick
    pub const PARTICLE_DECAY: f32 = 0.02;
}

/// Uniform sample in `[min, max)`; returns `min` for an empty range.
#[inline]
pub fn random_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    rng.random::<f32>() * (max - min) + min
}

/// Horizontal extent of one player's half of the playfield
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HalfCourt {
    pub min: f32,
    pub max: f32,
}

impl HalfCourt {
    pub const LEFT: HalfCourt = HalfCourt {
        min: 0.0,
        max: consts::HALF_WIDTH,
    };
    pub const RIGHT: HalfCourt = HalfCourt {
        min: consts::HALF_WIDTH,
        max: consts::GAME_WIDTH,
    };

    #[inline]
    pub fn width(&self) -> f32 {
        self.max - self.min
    }

    #[inline]
    pub fn center(&self) -> f32 {
        self.min + self.width() / 2.0
    }

    /// Clamp the left edge of a span of `width` so the span stays inside
    pub fn clamp_span(&self, x: f32, width: f32) -> f32 {
        let mut x = x;
        if x < self.min {
            x = self.min;
        }
        if x + width > self.max {
            x = self.max - width;
        }
        x
    }
}
