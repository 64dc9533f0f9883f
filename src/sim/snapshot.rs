//! Read-only presentation views
//!
//! The renderer draws from [`FrameSnapshot`] every frame; the HUD only
//! needs [`HudState`], republished at a throttled rate by [`HudThrottle`].

use serde::Serialize;

use super::collision::Rect;
use super::state::{Avatar, Ball, Brick, MatchPhase, MatchState, Particle, PlayerState, PowerUp, Side};

/// Health/score summary for the heads-up display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HudState {
    pub player_hp: u32,
    pub cpu_hp: u32,
    pub player_score: u64,
    pub cpu_score: u64,
    pub max_hp: u32,
}

impl HudState {
    pub fn from_state(state: &MatchState, max_hp: u32) -> Self {
        Self {
            player_hp: state.player.hp,
            cpu_hp: state.cpu.hp,
            player_score: state.player.score,
            cpu_score: state.cpu.score,
            max_hp,
        }
    }

    /// HP bar fill for a side, 0.0 to 1.0
    pub fn hp_fraction(&self, side: Side) -> f32 {
        let hp = match side {
            Side::Player => self.player_hp,
            Side::Cpu => self.cpu_hp,
        };
        if self.max_hp == 0 {
            return 0.0;
        }
        hp as f32 / self.max_hp as f32
    }
}

/// Publishes HUD updates at most once per interval of match clock
#[derive(Debug, Clone)]
pub struct HudThrottle {
    interval: f64,
    last_published: Option<f64>,
    final_published: bool,
}

impl HudThrottle {
    pub fn new(interval_secs: f64) -> Self {
        Self {
            interval: interval_secs,
            last_published: None,
            final_published: false,
        }
    }

    /// A fresh HUD state if one is due; the terminal state is always published once
    pub fn poll(&mut self, state: &MatchState, max_hp: u32) -> Option<HudState> {
        if !state.is_running() {
            if self.final_published {
                return None;
            }
            self.final_published = true;
            self.last_published = Some(state.clock);
            return Some(HudState::from_state(state, max_hp));
        }

        let due = self
            .last_published
            .is_none_or(|last| state.clock - last > self.interval);
        if !due {
            return None;
        }
        self.last_published = Some(state.clock);
        Some(HudState::from_state(state, max_hp))
    }
}

/// An entity together with the colour it is drawn in
#[derive(Debug, Serialize)]
pub struct Tinted<'a, T> {
    #[serde(flatten)]
    pub entity: &'a T,
    /// 0xRRGGBB
    pub color: u32,
}

/// What a renderer needs from one player
#[derive(Debug, Serialize)]
pub struct PlayerView<'a> {
    pub side: Side,
    pub avatar: Avatar,
    pub avatar_name: &'static str,
    pub avatar_color: u32,
    pub hp: u32,
    pub score: u64,
    pub paddle: Rect,
    pub balls: Vec<Tinted<'a, Ball>>,
    pub bricks: Vec<Tinted<'a, Brick>>,
    pub powerups: Vec<&'a PowerUp>,
    /// Status labels, oldest first
    pub effects: Vec<String>,
}

impl<'a> PlayerView<'a> {
    pub fn capture(player: &'a PlayerState) -> Self {
        Self {
            side: player.side,
            avatar: player.avatar,
            avatar_name: player.avatar.name(),
            avatar_color: player.avatar.color(),
            hp: player.hp,
            score: player.score,
            paddle: player.paddle.rect(),
            balls: player
                .balls
                .iter()
                .filter(|b| b.active)
                .map(|b| Tinted { entity: b, color: b.color() })
                .collect(),
            bricks: player
                .bricks
                .iter()
                .filter(|b| b.active)
                .map(|b| Tinted { entity: b, color: b.color() })
                .collect(),
            powerups: player.powerups.iter().filter(|p| p.active).collect(),
            effects: player.effects.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// Everything drawn in one frame
#[derive(Debug, Serialize)]
pub struct FrameSnapshot<'a> {
    pub phase: MatchPhase,
    pub time_ticks: u64,
    pub player: PlayerView<'a>,
    pub cpu: PlayerView<'a>,
    pub particles: &'a [Particle],
}

impl<'a> FrameSnapshot<'a> {
    pub fn capture(state: &'a MatchState) -> Self {
        Self {
            phase: state.phase,
            time_ticks: state.time_ticks,
            player: PlayerView::capture(&state.player),
            cpu: PlayerView::capture(&state.cpu),
            particles: &state.particles,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
