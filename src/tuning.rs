//! Data-driven game balance
//!
//! Every gameplay number that is not pure geometry lives here so a match can
//! be rebalanced from a JSON file without recompiling.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("tuning parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Gameplay balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Paddle ===
    /// Maximum paddle travel per tick
    pub paddle_speed: f32,
    /// CPU paddle speed as a fraction of `paddle_speed`
    pub cpu_speed_factor: f32,
    /// Width added by one WIDEN pickup
    pub widen_amount: f32,
    /// Seconds until a WIDEN pickup reverts
    pub widen_duration_secs: f64,

    // === Ball ===
    /// Upward launch speed
    pub ball_base_speed: f32,
    /// Speed above which paddle hits no longer accelerate the ball
    pub max_ball_speed: f32,
    /// Horizontal launch speed is drawn from `[-spread, spread)`
    pub launch_spread: f32,
    /// Per-tick chance that the CPU launches a resting ball
    pub cpu_launch_chance: f32,
    /// Horizontal speed at the paddle edge
    pub english: f32,
    /// Below this horizontal speed a paddle bounce gets kicked sideways
    pub min_horizontal_speed: f32,
    /// Base horizontal speed of that kick (plus up to 1.0 of jitter)
    pub horizontal_kick: f32,
    /// Total width of the symmetric horizontal jitter after a paddle hit
    pub paddle_jitter: f32,
    /// Speed multiplier per paddle hit while under `max_ball_speed`
    pub paddle_speedup: f32,

    // === Health ===
    pub max_hp: u32,
    /// HP lost when a ball falls past the floor
    pub damage_on_drop: u32,
    /// HP removed from the opponent by an ATTACK pickup
    pub damage_per_hit: u32,
    /// HP restored by a HEAL pickup
    pub heal_amount: u32,

    // === Bricks & power-ups ===
    pub brick_value: u64,
    /// AOE radius of an explosive ball
    pub explosion_radius: f32,
    /// Drop chance for bricks that do not always drop
    pub powerup_drop_chance: f32,
    /// Chance a spawned power-up is forced to ATTACK
    pub attack_override_chance: f32,
    /// Downward speed of falling power-ups
    pub powerup_fall_speed: f32,

    // === Presentation ===
    /// Per-tick chance that the oldest status label fades
    pub effect_fade_chance: f32,
    /// Live particle budget (0 disables particles)
    pub max_particles: usize,
    /// Minimum seconds between HUD publications
    pub hud_interval_secs: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            paddle_speed: 8.0,
            cpu_speed_factor: 0.95,
            widen_amount: 40.0,
            widen_duration_secs: 8.0,

            ball_base_speed: 5.0,
            max_ball_speed: 9.0,
            launch_spread: 4.0,
            cpu_launch_chance: 0.02,
            english: 5.0,
            min_horizontal_speed: 2.0,
            horizontal_kick: 2.5,
            paddle_jitter: 0.5,
            paddle_speedup: 1.05,

            max_hp: 100,
            damage_on_drop: 15,
            damage_per_hit: 15,
            heal_amount: 15,

            brick_value: 100,
            explosion_radius: 100.0,
            powerup_drop_chance: 0.1,
            attack_override_chance: 0.2,
            powerup_fall_speed: 3.0,

            effect_fade_chance: 0.05,
            max_particles: crate::consts::MAX_PARTICLES,
            hud_interval_secs: 0.1,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document; missing keys use defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Write tuning as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TuningError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Tuning saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("paddle_speed", self.paddle_speed),
            ("cpu_speed_factor", self.cpu_speed_factor),
            ("ball_base_speed", self.ball_base_speed),
            ("max_ball_speed", self.max_ball_speed),
            ("paddle_speedup", self.paddle_speedup),
            ("powerup_fall_speed", self.powerup_fall_speed),
            ("explosion_radius", self.explosion_radius),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(TuningError::Invalid(format!("{name} must be > 0, got {value}")));
            }
        }

        let chances = [
            ("cpu_launch_chance", self.cpu_launch_chance),
            ("powerup_drop_chance", self.powerup_drop_chance),
            ("attack_override_chance", self.attack_override_chance),
            ("effect_fade_chance", self.effect_fade_chance),
        ];
        for (name, value) in chances {
            if !(0.0..=1.0).contains(&value) {
                return Err(TuningError::Invalid(format!("{name} must be in [0, 1], got {value}")));
            }
        }

        if self.max_hp == 0 {
            return Err(TuningError::Invalid("max_hp must be > 0".into()));
        }
        if !(self.launch_spread.is_finite() && self.launch_spread >= 0.0) {
            return Err(TuningError::Invalid(format!(
                "launch_spread must be >= 0, got {}",
                self.launch_spread
            )));
        }
        if self.widen_amount < 0.0 || self.widen_duration_secs < 0.0 || self.hud_interval_secs < 0.0 {
            return Err(TuningError::Invalid("widen and HUD timings must not be negative".into()));
        }
        Ok(())
    }
}
