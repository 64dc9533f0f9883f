//! Simulation module
//!
//! All gameplay logic lives here:
//! - One conceptual time step per tick (unit Euler motion)
//! - Randomness only through an injected `Rng` (seeded `Pcg32` per match)
//! - No rendering or platform dependencies

pub mod collision;
pub mod field;
pub mod game;
pub mod particles;
pub mod powerup;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{Axis, Overlap, Rect, ball_hits_paddle, ball_rect_overlap, paddle_hit_offset};
pub use field::generate_field;
pub use game::{GameOverListener, Match};
pub use snapshot::{FrameSnapshot, HudState, HudThrottle, PlayerView, Tinted};
pub use state::{
    Avatar, Ball, BallKind, BallState, Brick, BrickKind, MatchPhase, MatchState, Paddle, Particle,
    PlayerState, PowerUp, PowerUpKind, Side, StatusEffect,
};
pub use tick::{Control, TickContext, TickInput, tick_player};
