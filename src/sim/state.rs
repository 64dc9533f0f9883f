//! Game state and core simulation types
//!
//! Everything a renderer needs to draw a frame lives here; the simulation
//! mutates it only from inside [`super::Match::tick`].

use std::collections::VecDeque;
use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::HalfCourt;
use crate::consts::*;

/// Which side of the playfield a player owns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Human, left half
    Player,
    /// AI, right half
    Cpu,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Cpu,
            Side::Cpu => Side::Player,
        }
    }

    pub fn court(self) -> HalfCourt {
        match self {
            Side::Player => HalfCourt::LEFT,
            Side::Cpu => HalfCourt::RIGHT,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Player => "PLAYER",
            Side::Cpu => "CPU",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual identity chosen on the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Avatar {
    #[default]
    Birdy,
    Blackman,
}

impl Avatar {
    /// The avatar handed to the opponent
    pub fn other(self) -> Avatar {
        match self {
            Avatar::Birdy => Avatar::Blackman,
            Avatar::Blackman => Avatar::Birdy,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Avatar::Birdy => "Birdy",
            Avatar::Blackman => "Blackman",
        }
    }

    /// Paddle/HUD colour (0xRRGGBB)
    pub fn color(self) -> u32 {
        match self {
            Avatar::Birdy => 0xfbbf24,
            Avatar::Blackman => 0x1f2937,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "birdy" => Some(Avatar::Birdy),
            "blackman" => Some(Avatar::Blackman),
            _ => None,
        }
    }
}

/// The player's paddle (position is the top-left corner)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Paddle {
    /// Paddle centred in `court`, resting above the floor
    pub fn new(court: HalfCourt) -> Self {
        Self {
            pos: Vec2::new(
                court.center() - PADDLE_WIDTH / 2.0,
                GAME_HEIGHT - PADDLE_OFFSET_Y,
            ),
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
        }
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.width / 2.0
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::new(self.width, self.height))
    }

    /// Where a resting ball of `radius` sits, `gap` units above the paddle
    pub fn rest_point(&self, radius: f32, gap: f32) -> Vec2 {
        Vec2::new(self.center_x(), self.pos.y - radius - gap)
    }

    /// Keep the paddle fully inside `court`
    pub fn clamp_to(&mut self, court: HalfCourt) {
        self.pos.x = court.clamp_span(self.pos.x, self.width);
    }
}

/// Ball ("bayan") variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BallKind {
    #[default]
    Normal,
    /// Destroys every brick near the one it strikes
    Explosive,
    /// Passes through bricks without bouncing
    Piercing,
}

impl BallKind {
    pub fn color(self) -> u32 {
        match self {
            BallKind::Normal => 0xffffff,
            BallKind::Explosive => 0xef4444,
            BallKind::Piercing => 0xfcd34d,
        }
    }
}

/// Ball state - parked on the paddle or free-moving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallState {
    /// Zero velocity, riding the paddle until launched
    Resting,
    Moving,
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub active: bool,
    pub kind: BallKind,
    pub state: BallState,
}

impl Ball {
    /// A normal ball resting at `pos`
    pub fn resting(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius: BALL_RADIUS,
            active: true,
            kind: BallKind::Normal,
            state: BallState::Resting,
        }
    }

    #[inline]
    pub fn is_resting(&self) -> bool {
        self.state == BallState::Resting
    }

    /// Leave the paddle with velocity `vel`
    pub fn launch(&mut self, vel: Vec2) {
        if self.is_resting() {
            self.vel = vel;
            self.state = BallState::Moving;
        }
    }

    pub fn color(&self) -> u32 {
        self.kind.color()
    }
}

/// Brick types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BrickKind {
    #[default]
    Normal,
    /// Takes two hits
    Hard,
    /// Always drops a power-up
    Bonus,
    /// Always drops a power-up
    Attack,
}

impl BrickKind {
    pub fn initial_health(self) -> u8 {
        match self {
            BrickKind::Hard => HARD_BRICK_HEALTH,
            _ => 1,
        }
    }

    pub fn color(self) -> u32 {
        match self {
            BrickKind::Normal => 0x3b82f6,
            BrickKind::Hard => 0xa855f7,
            BrickKind::Bonus => 0x22c55e,
            BrickKind::Attack => 0xef4444,
        }
    }

    /// Whether destroying this brick always spawns a power-up
    pub fn always_drops(self) -> bool {
        matches!(self, BrickKind::Bonus | BrickKind::Attack)
    }
}

/// A brick entity. Destroyed bricks stay in storage with `active == false`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub active: bool,
    pub kind: BrickKind,
    pub health: u8,
    pub value: u64,
}

impl Brick {
    pub fn new(pos: Vec2, width: f32, height: f32, kind: BrickKind, value: u64) -> Self {
        Self {
            pos,
            width,
            height,
            active: true,
            kind,
            health: kind.initial_health(),
            value,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::new(self.width, self.height))
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn color(&self) -> u32 {
        self.kind.color()
    }

    /// Knock off one point of health
    pub fn hit(&mut self) {
        self.health = self.health.saturating_sub(1);
    }

    /// Force health to zero and retire the brick
    pub fn shatter(&mut self) {
        self.health = 0;
        self.active = false;
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Heal,
    MultiBall,
    Explosive,
    Piercing,
    Attack,
    Widen,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 6] = [
        PowerUpKind::Heal,
        PowerUpKind::MultiBall,
        PowerUpKind::Explosive,
        PowerUpKind::Attack,
        PowerUpKind::Piercing,
        PowerUpKind::Widen,
    ];
}

/// A falling power-up capsule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub active: bool,
    pub kind: PowerUpKind,
    pub vel: Vec2,
}

impl PowerUp {
    pub fn new(pos: Vec2, kind: PowerUpKind, fall_speed: f32) -> Self {
        Self {
            pos,
            width: POWERUP_SIZE,
            height: POWERUP_SIZE,
            active: true,
            kind,
            vel: Vec2::new(0.0, fall_speed),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::new(self.width, self.height))
    }
}

/// A particle for visual effects (no gameplay effect)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 1.0 at spawn, removed at 0.0
    pub life: f32,
    pub color: u32,
    pub size: f32,
}

/// Short-lived status text shown above a paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusEffect {
    Healed,
    Hurt,
    MultiBall,
    Explosive,
    Piercing,
    Widened,
    /// Ball lost; carries the HP lost
    Dropped(u32),
}

impl fmt::Display for StatusEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusEffect::Healed => f.write_str("+HP"),
            StatusEffect::Hurt => f.write_str("OUCH!"),
            StatusEffect::MultiBall => f.write_str("MULTI!"),
            StatusEffect::Explosive => f.write_str("BOOM!"),
            StatusEffect::Piercing => f.write_str("PIERCE!"),
            StatusEffect::Widened => f.write_str("BIG!"),
            StatusEffect::Dropped(hp) => write!(f, "-{hp} HP"),
        }
    }
}

/// Everything one side owns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub side: Side,
    pub hp: u32,
    pub score: u64,
    pub avatar: Avatar,
    pub paddle: Paddle,
    pub balls: Vec<Ball>,
    pub bricks: Vec<Brick>,
    pub powerups: Vec<PowerUp>,
    /// Oldest first
    pub effects: VecDeque<StatusEffect>,
    /// Clock times (seconds) at which a WIDEN pickup reverts
    pub widen_reverts: VecDeque<f64>,
}

impl PlayerState {
    /// Fresh player at full health with one ball resting on the paddle
    pub fn new(side: Side, avatar: Avatar, bricks: Vec<Brick>, max_hp: u32) -> Self {
        let paddle = Paddle::new(side.court());
        let ball = Ball::resting(paddle.rest_point(BALL_RADIUS, BALL_REST_GAP));
        Self {
            side,
            hp: max_hp,
            score: 0,
            avatar,
            paddle,
            balls: vec![ball],
            bricks,
            powerups: Vec::new(),
            effects: VecDeque::new(),
            widen_reverts: VecDeque::new(),
        }
    }

    #[inline]
    pub fn court(&self) -> HalfCourt {
        self.side.court()
    }

    pub fn active_bricks(&self) -> usize {
        self.bricks.iter().filter(|b| b.active).count()
    }

    pub fn active_balls(&self) -> usize {
        self.balls.iter().filter(|b| b.active).count()
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Lose HP, never below zero
    pub fn take_damage(&mut self, amount: u32) {
        self.hp = self.hp.saturating_sub(amount);
    }

    /// Gain HP, never above `max_hp`
    pub fn heal(&mut self, amount: u32, max_hp: u32) {
        self.hp = self.hp.saturating_add(amount).min(max_hp);
    }

    pub fn push_effect(&mut self, effect: StatusEffect) {
        self.effects.push_back(effect);
    }

    /// Park a new normal ball above the paddle
    pub fn spawn_resting_ball(&mut self, gap: f32) {
        let pos = self.paddle.rest_point(BALL_RADIUS, gap);
        self.balls.push(Ball::resting(pos));
    }
}

/// Lifecycle of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    Running,
    /// Ended with a winner; terminal
    Finished(Side),
    /// Torn down before a winner emerged; terminal, never notified
    Abandoned,
}

/// Complete simulation state for one match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchState {
    /// Human side (left)
    pub player: PlayerState,
    /// AI side (right)
    pub cpu: PlayerState,
    /// Visual particles shared by both sides
    pub particles: Vec<Particle>,
    pub phase: MatchPhase,
    /// Wall-clock seconds since the match began
    pub clock: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl MatchState {
    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == MatchPhase::Running
    }

    pub fn winner(&self) -> Option<Side> {
        match self.phase {
            MatchPhase::Finished(side) => Some(side),
            _ => None,
        }
    }

    pub fn side(&self, side: Side) -> &PlayerState {
        match side {
            Side::Player => &self.player,
            Side::Cpu => &self.cpu,
        }
    }
}
