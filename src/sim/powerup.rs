//! Power-up spawning, falling, pickup and effects

use glam::Vec2;
use rand::Rng;

use super::particles::{PICKUP_BURST, PICKUP_COLOR};
use super::state::{Ball, BallKind, BallState, PlayerState, PowerUp, PowerUpKind, Side, StatusEffect};
use super::tick::TickContext;
use crate::consts::{GAME_HEIGHT, PADDLE_WIDTH};

/// Drop a random power-up for `player` at `pos`
///
/// Kinds are uniform, then overridden to ATTACK with
/// `attack_override_chance`, so ATTACK shows up more often than the rest.
pub fn spawn_powerup<R: Rng + ?Sized>(player: &mut PlayerState, pos: Vec2, ctx: &mut TickContext<'_, R>) {
    let roll = ctx.rng.random::<f32>();
    let mut kind = PowerUpKind::ALL[ctx.rng.random_range(0..PowerUpKind::ALL.len())];
    if roll < ctx.tuning.attack_override_chance {
        kind = PowerUpKind::Attack;
    }
    log::trace!("{} power-up spawned: {:?}", player.side, kind);
    player
        .powerups
        .push(PowerUp::new(pos, kind, ctx.tuning.powerup_fall_speed));
}

/// Apply a collected power-up; returns the winner if the opponent is knocked out
pub fn apply_powerup<R: Rng + ?Sized>(
    owner: &mut PlayerState,
    opponent: &mut PlayerState,
    kind: PowerUpKind,
    ctx: &mut TickContext<'_, R>,
) -> Option<Side> {
    let tuning = ctx.tuning;
    ctx.burst(
        Vec2::new(owner.paddle.center_x(), owner.paddle.pos.y),
        PICKUP_COLOR,
        PICKUP_BURST,
    );
    log::debug!("{} collected {:?}", owner.side, kind);

    match kind {
        PowerUpKind::Heal => {
            owner.heal(tuning.heal_amount, tuning.max_hp);
            owner.push_effect(StatusEffect::Healed);
        }
        PowerUpKind::Attack => {
            opponent.take_damage(tuning.damage_per_hit);
            opponent.push_effect(StatusEffect::Hurt);
        }
        PowerUpKind::MultiBall => {
            if let Some(first) = owner.balls.first() {
                let mut clone = Ball::resting(first.pos);
                if first.state == BallState::Moving {
                    clone.launch(Vec2::new(-first.vel.x, first.vel.y));
                }
                owner.balls.push(clone);
                owner.push_effect(StatusEffect::MultiBall);
            }
        }
        PowerUpKind::Explosive => {
            for ball in &mut owner.balls {
                ball.kind = BallKind::Explosive;
            }
            owner.push_effect(StatusEffect::Explosive);
        }
        PowerUpKind::Piercing => {
            for ball in &mut owner.balls {
                ball.kind = BallKind::Piercing;
            }
            owner.push_effect(StatusEffect::Piercing);
        }
        PowerUpKind::Widen => {
            owner.paddle.width = (owner.paddle.width + tuning.widen_amount).min(PADDLE_WIDTH * 2.0);
            owner.paddle.clamp_to(owner.court());
            owner.push_effect(StatusEffect::Widened);
            owner
                .widen_reverts
                .push_back(ctx.now + tuning.widen_duration_secs);
        }
    }

    if !opponent.is_alive() {
        Some(owner.side)
    } else {
        None
    }
}

/// Restore base paddle width once any scheduled revert is due
///
/// Reverts are idempotent: a due revert always sets the base width, even
/// if an earlier one already did.
pub fn expire_widen(player: &mut PlayerState, now: f64) {
    let mut due = false;
    while player.widen_reverts.front().is_some_and(|&at| at <= now) {
        player.widen_reverts.pop_front();
        due = true;
    }
    if due {
        player.paddle.width = PADDLE_WIDTH;
        log::debug!("{} paddle width reverted", player.side);
    }
}

/// Move falling power-ups, resolve pickups and prune spent capsules
pub fn update_powerups<R: Rng + ?Sized>(
    owner: &mut PlayerState,
    opponent: &mut PlayerState,
    ctx: &mut TickContext<'_, R>,
) -> Option<Side> {
    let mut outcome = None;

    for i in 0..owner.powerups.len() {
        let paddle = owner.paddle.rect();
        let powerup = &mut owner.powerups[i];
        if !powerup.active {
            continue;
        }
        powerup.pos += powerup.vel;

        if powerup.rect().touches(&paddle) {
            powerup.active = false;
            let kind = powerup.kind;
            outcome = apply_powerup(owner, opponent, kind, ctx);
            if outcome.is_some() {
                break;
            }
        } else if powerup.pos.y > GAME_HEIGHT {
            powerup.active = false;
        }
    }

    owner.powerups.retain(|p| p.active);
    outcome
}
