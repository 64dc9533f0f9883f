//! Match controller
//!
//! Owns both players, runs their ticks in a fixed order and reports the
//! single terminal outcome. `Running` moves to `Finished` or `Abandoned`
//! exactly once; after that every tick is a no-op.

use std::fmt;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::field::generate_field;
use super::particles;
use super::state::{Avatar, MatchPhase, MatchState, PlayerState, Side};
use super::tick::{Control, TickContext, TickInput, launch_resting, tick_player};
use crate::{HalfCourt, Tuning};

/// Receives the winner when a match ends
pub trait GameOverListener {
    fn game_over(&mut self, winner: Side);
}

impl<F: FnMut(Side)> GameOverListener for F {
    fn game_over(&mut self, winner: Side) {
        self(winner)
    }
}

/// A running (or finished) match between the human and the CPU
pub struct Match {
    state: MatchState,
    tuning: Tuning,
    seed: u64,
    rng: Pcg32,
    /// Last pointer sample; last value wins
    pointer_x: Option<f32>,
    listener: Option<Box<dyn GameOverListener>>,
}

impl Match {
    /// Start a match with default tuning; the CPU gets the other avatar
    pub fn new(avatar: Avatar, seed: u64) -> Self {
        Self::with_tuning(avatar, seed, Tuning::default())
    }

    pub fn with_tuning(avatar: Avatar, seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);

        let player_bricks = generate_field(HalfCourt::LEFT.min, tuning.brick_value, &mut rng);
        let cpu_bricks = generate_field(HalfCourt::RIGHT.min, tuning.brick_value, &mut rng);

        let state = MatchState {
            player: PlayerState::new(Side::Player, avatar, player_bricks, tuning.max_hp),
            cpu: PlayerState::new(Side::Cpu, avatar.other(), cpu_bricks, tuning.max_hp),
            particles: Vec::new(),
            phase: MatchPhase::Running,
            clock: 0.0,
            time_ticks: 0,
        };

        log::info!(
            "Match started: {} vs {} (seed {})",
            avatar.name(),
            avatar.other().name(),
            seed
        );

        Self {
            state,
            tuning,
            seed,
            rng,
            pointer_x: None,
            listener: None,
        }
    }

    /// Register the game-over notification (replaces any previous one)
    pub fn on_game_over(&mut self, listener: impl GameOverListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Read-only view for rendering
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn winner(&self) -> Option<Side> {
        self.state.winner()
    }

    /// Advance the match by one frame of `dt` seconds
    ///
    /// Returns the winner on the tick the match ends, `None` otherwise.
    pub fn tick(&mut self, input: &TickInput, dt: f32) -> Option<Side> {
        if !self.state.is_running() {
            return None;
        }

        if input.pointer_x.is_some() {
            self.pointer_x = input.pointer_x;
        }
        self.state.time_ticks += 1;
        self.state.clock += f64::from(dt.max(0.0));

        let player_control = if input.idle_mode {
            Control::Ai
        } else {
            if input.launch {
                launch_resting(&mut self.state.player, &mut self.rng, &self.tuning);
            }
            Control::Pointer(self.pointer_x)
        };

        let state = &mut self.state;
        let mut ctx = TickContext {
            tuning: &self.tuning,
            rng: &mut self.rng,
            particles: &mut state.particles,
            now: state.clock,
        };

        let outcome = tick_player(&mut state.player, &mut state.cpu, player_control, &mut ctx)
            .or_else(|| tick_player(&mut state.cpu, &mut state.player, Control::Ai, &mut ctx));

        particles::advance(&mut state.particles);

        if let Some(winner) = outcome {
            self.finish(winner);
        }
        outcome
    }

    /// Tear the match down without declaring a winner
    ///
    /// Pending paddle reverts are dropped and no notification fires.
    pub fn abandon(&mut self) {
        if !self.state.is_running() {
            return;
        }
        self.state.phase = MatchPhase::Abandoned;
        self.state.player.widen_reverts.clear();
        self.state.cpu.widen_reverts.clear();
        log::info!("Match abandoned after {} ticks", self.state.time_ticks);
    }

    fn finish(&mut self, winner: Side) {
        self.state.phase = MatchPhase::Finished(winner);
        log::info!(
            "Match over after {} ticks: {} wins (hp {}-{}, score {}-{})",
            self.state.time_ticks,
            winner,
            self.state.player.hp,
            self.state.cpu.hp,
            self.state.player.score,
            self.state.cpu.score
        );
        if let Some(listener) = self.listener.as_mut() {
            listener.game_over(winner);
        }
    }
}

impl fmt::Debug for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Match")
            .field("seed", &self.seed)
            .field("phase", &self.state.phase)
            .field("time_ticks", &self.state.time_ticks)
            .field("pointer_x", &self.pointer_x)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}
