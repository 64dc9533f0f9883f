//! Per-player simulation tick
//!
//! Advances one side's paddle, balls, bricks, power-ups and status labels by
//! one frame. Motion is a unit Euler step per tick; the only wall-clock
//! quantity is the WIDEN revert deadline carried in [`TickContext::now`].

use glam::Vec2;
use rand::Rng;

use super::collision::{Rect, ball_hits_paddle, ball_rect_overlap, paddle_hit_offset, reflect};
use super::particles::{self, BRICK_BURST, DROP_BURST, DROP_COLOR, EXPLOSION_BURST};
use super::powerup::{expire_widen, spawn_powerup, update_powerups};
use super::state::{Ball, BallKind, Particle, PlayerState, Side, StatusEffect};
use crate::consts::*;
use crate::{Tuning, random_range};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest pointer x in playfield coordinates (None: no new sample)
    pub pointer_x: Option<f32>,
    /// Launch resting balls (click/tap)
    pub launch: bool,
    /// Idle/demo mode - AI plays the human side too
    pub idle_mode: bool,
}

/// How a paddle is driven this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Control {
    /// Paddle centre snaps to this x; `None` leaves the paddle where it is
    Pointer(Option<f32>),
    /// Capped pursuit of the first live ball, auto-launch
    Ai,
}

/// Shared resources a player tick needs besides the two players
pub struct TickContext<'a, R: Rng + ?Sized> {
    pub tuning: &'a Tuning,
    pub rng: &'a mut R,
    pub particles: &'a mut Vec<Particle>,
    /// Match clock in seconds
    pub now: f64,
}

impl<R: Rng + ?Sized> TickContext<'_, R> {
    /// Emit a cosmetic burst
    pub fn burst(&mut self, pos: Vec2, color: u32, count: usize) {
        particles::emit(self.particles, self.tuning.max_particles, self.rng, pos, color, count);
    }
}

/// Velocity for a ball leaving the paddle
pub fn launch_velocity<R: Rng + ?Sized>(rng: &mut R, tuning: &Tuning) -> Vec2 {
    Vec2::new(
        random_range(rng, -tuning.launch_spread, tuning.launch_spread),
        -tuning.ball_base_speed,
    )
}

/// Launch every live resting ball of `player`
pub fn launch_resting<R: Rng + ?Sized>(player: &mut PlayerState, rng: &mut R, tuning: &Tuning) {
    for ball in player.balls.iter_mut().filter(|b| b.active && b.is_resting()) {
        ball.launch(launch_velocity(rng, tuning));
    }
}

/// Advance one player by one tick
///
/// Returns the winning side as soon as a terminal condition is detected.
/// Checks run in a fixed order: ball-lost defeat, then field-cleared win,
/// then knock-out by power-up.
pub fn tick_player<R: Rng + ?Sized>(
    player: &mut PlayerState,
    opponent: &mut PlayerState,
    control: Control,
    ctx: &mut TickContext<'_, R>,
) -> Option<Side> {
    expire_widen(player, ctx.now);
    move_paddle(player, control, ctx.tuning);

    let outcome = update_balls(player, control, ctx)
        .or_else(|| (player.active_bricks() == 0).then_some(player.side));

    player.balls.retain(|b| b.active);
    if outcome.is_some() {
        return outcome;
    }
    if player.balls.is_empty() {
        player.spawn_resting_ball(BALL_RESPAWN_GAP);
    }

    if let Some(winner) = update_powerups(player, opponent, ctx) {
        return Some(winner);
    }

    fade_effects(player, ctx);
    None
}

/// Pointer tracking or AI pursuit, then clamp into the half-court
fn move_paddle(player: &mut PlayerState, control: Control, tuning: &Tuning) {
    let court = player.court();
    let half = player.paddle.width / 2.0;

    match control {
        Control::Pointer(Some(x)) => player.paddle.pos.x = x - half,
        Control::Pointer(None) => {}
        Control::Ai => {
            let target = player
                .balls
                .iter()
                .find(|b| b.active)
                .map_or(court.center(), |b| b.pos.x)
                - half;
            let max_step = tuning.paddle_speed * tuning.cpu_speed_factor;
            let diff = target - player.paddle.pos.x;
            player.paddle.pos.x += diff.clamp(-max_step, max_step);
        }
    }

    player.paddle.clamp_to(court);
}

fn update_balls<R: Rng + ?Sized>(
    player: &mut PlayerState,
    control: Control,
    ctx: &mut TickContext<'_, R>,
) -> Option<Side> {
    let court = player.court();
    let tuning = ctx.tuning;

    for bi in 0..player.balls.len() {
        let ball = &mut player.balls[bi];
        if !ball.active {
            continue;
        }

        if ball.is_resting() {
            ball.pos = player.paddle.rest_point(ball.radius, BALL_REST_GAP);
            if matches!(control, Control::Ai) && ctx.rng.random::<f32>() < tuning.cpu_launch_chance {
                ball.launch(launch_velocity(ctx.rng, tuning));
            }
            continue;
        }

        ball.pos += ball.vel;

        // Side and top walls
        if ball.pos.x - ball.radius < court.min {
            ball.pos.x = court.min + ball.radius;
            ball.vel.x = -ball.vel.x;
        }
        if ball.pos.x + ball.radius > court.max {
            ball.pos.x = court.max - ball.radius;
            ball.vel.x = -ball.vel.x;
        }
        if ball.pos.y - ball.radius < 0.0 {
            ball.pos.y = ball.radius;
            ball.vel.y = -ball.vel.y;
        }

        if ball.pos.y > GAME_HEIGHT {
            ball.active = false;
            let lost_at = Vec2::new(ball.pos.x, GAME_HEIGHT - 10.0);

            player.take_damage(tuning.damage_on_drop);
            player.push_effect(StatusEffect::Dropped(tuning.damage_on_drop));
            ctx.burst(lost_at, DROP_COLOR, DROP_BURST);
            log::debug!("{} lost a ball, hp={}", player.side, player.hp);

            if !player.is_alive() {
                return Some(player.side.opponent());
            }
            continue;
        }

        let paddle = player.paddle.rect();
        if ball_hits_paddle(ball.pos, ball.radius, &paddle) {
            paddle_bounce(ball, &paddle, ctx.rng, tuning);
        }

        hit_bricks(player, bi, ctx);
    }

    None
}

/// Send the ball back up with english from the hit position
fn paddle_bounce<R: Rng + ?Sized>(ball: &mut Ball, paddle: &Rect, rng: &mut R, tuning: &Tuning) {
    ball.vel.y = -ball.vel.y.abs();
    ball.vel.x = paddle_hit_offset(ball.pos.x, paddle) * tuning.english;

    // Near-vertical bounces get kicked sideways so the ball can't stall
    if ball.vel.x.abs() < tuning.min_horizontal_speed {
        let dir = if ball.vel.x >= 0.0 { 1.0 } else { -1.0 };
        ball.vel.x = dir * (tuning.horizontal_kick + rng.random::<f32>());
    }

    ball.vel.x += (rng.random::<f32>() - 0.5) * tuning.paddle_jitter;

    if ball.vel.length() < tuning.max_ball_speed {
        ball.vel *= tuning.paddle_speedup;
    }
}

/// Resolve ball `bi` against every live brick in the player's field
fn hit_bricks<R: Rng + ?Sized>(player: &mut PlayerState, bi: usize, ctx: &mut TickContext<'_, R>) {
    for i in 0..player.bricks.len() {
        if !player.bricks[i].active {
            continue;
        }

        let ball = &mut player.balls[bi];
        let Some(overlap) = ball_rect_overlap(ball.pos, ball.radius, &player.bricks[i].rect()) else {
            continue;
        };

        if ball.kind != BallKind::Piercing {
            ball.vel = reflect(ball.vel, overlap.reflect_axis());
        }

        if ball.kind == BallKind::Explosive {
            explode(player, i, ctx);
        } else {
            player.bricks[i].hit();
        }

        let brick = &mut player.bricks[i];
        if brick.health == 0 {
            brick.active = false;
            player.score += brick.value;
            let (pos, center, color, kind) = (brick.pos, brick.center(), brick.color(), brick.kind);
            log::trace!("{} destroyed {:?} brick at {}", player.side, kind, pos);

            ctx.burst(center, color, BRICK_BURST);
            if kind.always_drops() || ctx.rng.random::<f32>() < ctx.tuning.powerup_drop_chance {
                spawn_powerup(player, pos, ctx);
            }
        }
    }
}

/// Shatter every live brick near brick `struck`, including itself
fn explode<R: Rng + ?Sized>(player: &mut PlayerState, struck: usize, ctx: &mut TickContext<'_, R>) {
    let origin = player.bricks[struck].pos;
    let radius = ctx.tuning.explosion_radius;
    for (i, brick) in player.bricks.iter_mut().enumerate().filter(|(_, b)| b.active) {
        if i == struck || brick.pos.distance(origin) < radius {
            brick.shatter();
            ctx.burst(brick.center(), brick.color(), EXPLOSION_BURST);
        }
    }
}

/// Occasionally drop the oldest status label
fn fade_effects<R: Rng + ?Sized>(player: &mut PlayerState, ctx: &mut TickContext<'_, R>) {
    if ctx.rng.random::<f32>() < ctx.tuning.effect_fade_chance {
        player.effects.pop_front();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Avatar, BallState, Brick, BrickKind};
    use rand::{RngCore, SeedableRng};
    use rand_pcg::Pcg32;

    /// Always rolls zero, so every probability check passes
    struct ZeroRng;

    impl RngCore for ZeroRng {
        fn next_u32(&mut self) -> u32 {
            0
        }
        fn next_u64(&mut self) -> u64 {
            0
        }
        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(0);
        }
    }

    fn brick(x: f32, y: f32, kind: BrickKind) -> Brick {
        Brick::new(Vec2::new(x, y), 40.0, 12.0, kind, 100)
    }

    fn setup(bricks: Vec<Brick>) -> (PlayerState, PlayerState) {
        (
            PlayerState::new(Side::Player, Avatar::Birdy, bricks, 100),
            PlayerState::new(
                Side::Cpu,
                Avatar::Blackman,
                vec![brick(700.0, 100.0, BrickKind::Normal)],
                100,
            ),
        )
    }

    fn moving_ball(pos: Vec2, vel: Vec2, kind: BallKind) -> Ball {
        let mut ball = Ball::resting(pos);
        ball.kind = kind;
        ball.launch(vel);
        ball
    }

    fn run<R: Rng>(
        p1: &mut PlayerState,
        p2: &mut PlayerState,
        control: Control,
        rng: &mut R,
    ) -> (Option<Side>, Vec<Particle>) {
        run_with(&Tuning::default(), p1, p2, control, rng)
    }

    fn run_with<R: Rng>(
        tuning: &Tuning,
        p1: &mut PlayerState,
        p2: &mut PlayerState,
        control: Control,
        rng: &mut R,
    ) -> (Option<Side>, Vec<Particle>) {
        let mut particles = Vec::new();
        let mut ctx = TickContext {
            tuning,
            rng,
            particles: &mut particles,
            now: 0.0,
        };
        let outcome = tick_player(p1, p2, control, &mut ctx);
        (outcome, particles)
    }

    #[test]
    fn test_pointer_tracks_center_and_clamps() {
        let (mut p1, mut p2) = setup(vec![brick(100.0, 100.0, BrickKind::Normal)]);
        let mut rng = Pcg32::seed_from_u64(1);

        run(&mut p1, &mut p2, Control::Pointer(Some(200.0)), &mut rng);
        assert_eq!(p1.paddle.pos.x, 150.0);
        // Resting ball follows the paddle
        assert_eq!(p1.balls[0].pos.x, 200.0);

        run(&mut p1, &mut p2, Control::Pointer(Some(5000.0)), &mut rng);
        assert_eq!(p1.paddle.pos.x, HALF_WIDTH - PADDLE_WIDTH);

        run(&mut p1, &mut p2, Control::Pointer(Some(-300.0)), &mut rng);
        assert_eq!(p1.paddle.pos.x, 0.0);
    }

    #[test]
    fn test_ai_pursuit_is_capped() {
        let (mut p1, _) = setup(vec![brick(100.0, 100.0, BrickKind::Normal)]);
        // Ball far to the right of the CPU paddle
        let mut cpu = PlayerState::new(
            Side::Cpu,
            Avatar::Blackman,
            vec![brick(700.0, 100.0, BrickKind::Normal)],
            100,
        );
        cpu.balls = vec![moving_ball(Vec2::new(1100.0, 400.0), Vec2::new(0.0, -1.0), BallKind::Normal)];
        let start = cpu.paddle.pos.x;
        let mut rng = Pcg32::seed_from_u64(1);
        run(&mut cpu, &mut p1, Control::Ai, &mut rng);
        assert!((cpu.paddle.pos.x - start - 8.0 * 0.95).abs() < 1e-4);
    }

    #[test]
    fn test_ai_auto_launch() {
        let (mut p1, mut p2) = setup(vec![brick(100.0, 100.0, BrickKind::Normal)]);
        run(&mut p1, &mut p2, Control::Ai, &mut ZeroRng);
        assert_eq!(p1.balls[0].state, BallState::Moving);
        assert_eq!(p1.balls[0].vel, Vec2::new(-4.0, -5.0));
    }

    #[test]
    fn test_human_ball_waits_for_launch() {
        let (mut p1, mut p2) = setup(vec![brick(100.0, 100.0, BrickKind::Normal)]);
        for _ in 0..50 {
            run(&mut p1, &mut p2, Control::Pointer(None), &mut ZeroRng);
        }
        assert!(p1.balls[0].is_resting());

        launch_resting(&mut p1, &mut ZeroRng, &Tuning::default());
        assert_eq!(p1.balls[0].vel, Vec2::new(-4.0, -5.0));
    }

    #[test]
    fn test_walls_reflect_and_clamp() {
        let (mut p1, mut p2) = setup(vec![brick(100.0, 100.0, BrickKind::Normal)]);
        p1.balls = vec![moving_ball(Vec2::new(595.0, 400.0), Vec2::new(4.0, -3.0), BallKind::Normal)];
        let mut rng = Pcg32::seed_from_u64(2);
        run(&mut p1, &mut p2, Control::Pointer(None), &mut rng);
        assert_eq!(p1.balls[0].pos.x, HALF_WIDTH - BALL_RADIUS);
        assert_eq!(p1.balls[0].vel.x, -4.0);

        p1.balls = vec![moving_ball(Vec2::new(300.0, 10.0), Vec2::new(0.5, -5.0), BallKind::Normal)];
        run(&mut p1, &mut p2, Control::Pointer(None), &mut rng);
        assert_eq!(p1.balls[0].pos.y, BALL_RADIUS);
        assert_eq!(p1.balls[0].vel.y, 5.0);
    }

    #[test]
    fn test_paddle_bounce_goes_up_with_english() {
        let (mut p1, mut p2) = setup(vec![brick(100.0, 100.0, BrickKind::Normal)]);
        let paddle_x = p1.paddle.pos.x;
        // Strike near the right edge of the paddle
        p1.balls = vec![moving_ball(
            Vec2::new(paddle_x + 90.0, 738.0),
            Vec2::new(0.0, 4.0),
            BallKind::Normal,
        )];
        let mut rng = Pcg32::seed_from_u64(3);
        run(&mut p1, &mut p2, Control::Pointer(None), &mut rng);
        let vel = p1.balls[0].vel;
        assert!(vel.y < 0.0);
        // 0.8 * 5 = 4, +-0.25 jitter, then x1.05
        assert!(vel.x > 3.9 && vel.x < 4.5, "vx={}", vel.x);
        assert!((vel.y + 4.2).abs() < 1e-4);
    }

    #[test]
    fn test_center_bounce_kicked_sideways() {
        let (mut p1, mut p2) = setup(vec![brick(100.0, 100.0, BrickKind::Normal)]);
        let center = p1.paddle.center_x();
        p1.balls = vec![moving_ball(Vec2::new(center, 738.0), Vec2::new(0.0, 4.0), BallKind::Normal)];
        let mut rng = Pcg32::seed_from_u64(4);
        run(&mut p1, &mut p2, Control::Pointer(None), &mut rng);
        // At least (2.5 - 0.25) * 1.05
        assert!(p1.balls[0].vel.x.abs() >= 2.25 * 1.05 - 1e-4);
    }

    #[test]
    fn test_no_speedup_at_cap() {
        let (mut p1, mut p2) = setup(vec![brick(100.0, 100.0, BrickKind::Normal)]);
        let paddle_x = p1.paddle.pos.x;
        p1.balls = vec![moving_ball(
            Vec2::new(paddle_x + 90.0, 735.0),
            Vec2::new(0.0, 9.0),
            BallKind::Normal,
        )];
        let mut rng = Pcg32::seed_from_u64(3);
        run(&mut p1, &mut p2, Control::Pointer(None), &mut rng);
        assert_eq!(p1.balls[0].vel.y, -9.0);
    }

    #[test]
    fn test_brick_clear_wins_same_tick() {
        let (mut p1, mut p2) = setup(vec![brick(100.0, 100.0, BrickKind::Normal)]);
        p1.balls = vec![moving_ball(Vec2::new(120.0, 120.0), Vec2::new(0.0, -5.0), BallKind::Normal)];
        let mut rng = Pcg32::seed_from_u64(5);
        let (outcome, particles) = run(&mut p1, &mut p2, Control::Pointer(None), &mut rng);
        assert_eq!(outcome, Some(Side::Player));
        assert_eq!(p1.active_bricks(), 0);
        assert_eq!(p1.score, 100);
        assert_eq!(p1.balls[0].vel.y, 5.0);
        assert_eq!(particles.len(), BRICK_BURST);
    }

    #[test]
    fn test_drop_defeat() {
        let (mut p1, mut p2) = setup(vec![brick(100.0, 100.0, BrickKind::Normal)]);
        p1.hp = 15;
        p1.balls = vec![moving_ball(Vec2::new(100.0, 795.0), Vec2::new(0.0, 6.0), BallKind::Normal)];
        let mut rng = Pcg32::seed_from_u64(6);
        let (outcome, _) = run(&mut p1, &mut p2, Control::Pointer(None), &mut rng);
        assert_eq!(outcome, Some(Side::Cpu));
        assert_eq!(p1.hp, 0);
        // No respawn after a fatal drop
        assert_eq!(p1.active_balls(), 0);
        assert!(p1.balls.is_empty());
    }

    #[test]
    fn test_drop_respawns_resting_ball() {
        let (mut p1, mut p2) = setup(vec![brick(100.0, 100.0, BrickKind::Normal)]);
        p1.balls = vec![moving_ball(Vec2::new(100.0, 795.0), Vec2::new(0.0, 6.0), BallKind::Explosive)];
        let mut rng = Pcg32::seed_from_u64(7);
        let (outcome, particles) = run(&mut p1, &mut p2, Control::Pointer(None), &mut rng);
        assert_eq!(outcome, None);
        assert_eq!(p1.hp, 85);
        assert_eq!(p1.balls.len(), 1);
        assert_eq!(p1.active_balls(), 1);
        assert!(p1.balls[0].is_resting());
        assert_eq!(p1.balls[0].kind, BallKind::Normal);
        // The label may already have faded this tick
        assert!(p1.effects.iter().all(|e| *e == StatusEffect::Dropped(15)));
        assert!(particles.len() >= DROP_BURST);
    }

    #[test]
    fn test_explosive_clears_radius() {
        let (mut p1, mut p2) = setup(vec![
            brick(100.0, 100.0, BrickKind::Normal),
            brick(150.0, 100.0, BrickKind::Hard),
            brick(100.0, 160.0, BrickKind::Normal),
            brick(400.0, 100.0, BrickKind::Normal),
        ]);
        p1.balls = vec![moving_ball(Vec2::new(120.0, 120.0), Vec2::new(0.0, -5.0), BallKind::Explosive)];
        let mut rng = Pcg32::seed_from_u64(8);
        let (outcome, _) = run(&mut p1, &mut p2, Control::Pointer(None), &mut rng);
        assert_eq!(outcome, None);
        assert!(!p1.bricks[0].active);
        assert!(!p1.bricks[1].active);
        assert_eq!(p1.bricks[1].health, 0);
        assert!(!p1.bricks[2].active);
        assert!(p1.bricks[3].active);
        assert_eq!(p1.active_bricks(), 1);
    }

    #[test]
    fn test_explosive_always_destroys_struck_brick() {
        let tuning = Tuning {
            explosion_radius: f32::MIN_POSITIVE,
            ..Default::default()
        };
        let (mut p1, mut p2) = setup(vec![
            brick(100.0, 100.0, BrickKind::Hard),
            brick(150.0, 100.0, BrickKind::Normal),
        ]);
        p1.balls = vec![moving_ball(Vec2::new(120.0, 120.0), Vec2::new(0.0, -5.0), BallKind::Explosive)];
        let mut rng = Pcg32::seed_from_u64(11);
        let (outcome, _) = run_with(&tuning, &mut p1, &mut p2, Control::Pointer(None), &mut rng);
        assert_eq!(outcome, None);
        assert!(!p1.bricks[0].active);
        assert_eq!(p1.bricks[0].health, 0);
        assert_eq!(p1.score, 100);
        // Out of range
        assert!(p1.bricks[1].active);
    }

    #[test]
    fn test_piercing_keeps_velocity() {
        let (mut p1, mut p2) = setup(vec![
            brick(100.0, 100.0, BrickKind::Hard),
            brick(400.0, 100.0, BrickKind::Normal),
        ]);
        p1.balls = vec![moving_ball(Vec2::new(120.0, 120.0), Vec2::new(1.0, -5.0), BallKind::Piercing)];
        let mut rng = Pcg32::seed_from_u64(9);
        run(&mut p1, &mut p2, Control::Pointer(None), &mut rng);
        assert_eq!(p1.balls[0].vel, Vec2::new(1.0, -5.0));
        assert_eq!(p1.bricks[0].health, 1);
        assert!(p1.bricks[0].active);
    }

    #[test]
    fn test_bonus_brick_always_drops() {
        let (mut p1, mut p2) = setup(vec![
            brick(100.0, 100.0, BrickKind::Bonus),
            brick(400.0, 100.0, BrickKind::Normal),
        ]);
        p1.balls = vec![moving_ball(Vec2::new(120.0, 120.0), Vec2::new(0.0, -5.0), BallKind::Normal)];
        let mut rng = Pcg32::seed_from_u64(10);
        run(&mut p1, &mut p2, Control::Pointer(None), &mut rng);
        assert_eq!(p1.powerups.len(), 1);
        // Spawned at the brick corner, then fell one step
        assert_eq!(p1.powerups[0].pos, Vec2::new(100.0, 103.0));
    }
}
