//! Cosmetic particle bursts
//!
//! Particles never influence gameplay. They are capped so an explosive
//! chain cannot grow the buffer without bound.

use glam::Vec2;
use rand::Rng;

use super::state::Particle;
use crate::consts::PARTICLE_DECAY;
use crate::random_range;

/// Pickup burst colour
pub const PICKUP_COLOR: u32 = 0xffd700;
/// Ball-lost burst colour
pub const DROP_COLOR: u32 = 0xef4444;

pub const BRICK_BURST: usize = 5;
pub const EXPLOSION_BURST: usize = 3;
pub const DROP_BURST: usize = 15;
pub const PICKUP_BURST: usize = 10;

/// Spray `count` particles from `pos`, respecting `budget`
pub fn emit<R: Rng + ?Sized>(
    particles: &mut Vec<Particle>,
    budget: usize,
    rng: &mut R,
    pos: Vec2,
    color: u32,
    count: usize,
) {
    let room = budget.saturating_sub(particles.len());
    for _ in 0..count.min(room) {
        particles.push(Particle {
            pos,
            vel: Vec2::new(random_range(rng, -3.0, 3.0), random_range(rng, -3.0, 3.0)),
            life: 1.0,
            color,
            size: random_range(rng, 2.0, 5.0),
        });
    }
}

/// Move every particle one tick, fade it, and drop the dead ones
pub fn advance(particles: &mut Vec<Particle>) {
    for p in particles.iter_mut() {
        p.pos += p.vel;
        p.life -= PARTICLE_DECAY;
    }
    particles.retain(|p| p.life > 0.0);
}
