//! Brick field generation
//!
//! Each player gets a fixed ROWS x COLS grid tiling their half of the
//! playfield. Layout is deterministic; brick kinds are drawn per brick.

use glam::Vec2;
use rand::Rng;

use super::state::{Brick, BrickKind};
use crate::consts::*;

/// Width of one brick so that BRICK_COLS bricks and their gaps fill a half
pub fn brick_width() -> f32 {
    (HALF_WIDTH - (BRICK_COLS as f32 + 1.0) * BRICK_GAP) / BRICK_COLS as f32
}

/// Classify a brick from a uniform roll in `[0, 1)`
pub fn brick_kind_for_roll(roll: f32) -> BrickKind {
    if roll < ATTACK_BRICK_CHANCE {
        BrickKind::Attack
    } else if roll < ATTACK_BRICK_CHANCE + BONUS_BRICK_CHANCE {
        BrickKind::Bonus
    } else if roll < ATTACK_BRICK_CHANCE + BONUS_BRICK_CHANCE + HARD_BRICK_CHANCE {
        BrickKind::Hard
    } else {
        BrickKind::Normal
    }
}

/// Build a full brick field for the half starting at `offset_x`
pub fn generate_field<R: Rng + ?Sized>(offset_x: f32, value: u64, rng: &mut R) -> Vec<Brick> {
    let width = brick_width();
    let mut bricks = Vec::with_capacity(BRICK_ROWS * BRICK_COLS);

    for row in 0..BRICK_ROWS {
        for col in 0..BRICK_COLS {
            let kind = brick_kind_for_roll(rng.random::<f32>());
            let pos = Vec2::new(
                offset_x + BRICK_GAP + col as f32 * (width + BRICK_GAP),
                BRICK_OFFSET_TOP + row as f32 * (BRICK_HEIGHT + BRICK_GAP),
            );
            bricks.push(Brick::new(pos, width, BRICK_HEIGHT, kind, value));
        }
    }

    log::info!(
        "Generated field at x={}: {} bricks ({} attack, {} bonus, {} hard)",
        offset_x,
        bricks.len(),
        bricks.iter().filter(|b| b.kind == BrickKind::Attack).count(),
        bricks.iter().filter(|b| b.kind == BrickKind::Bonus).count(),
        bricks.iter().filter(|b| b.kind == BrickKind::Hard).count(),
    );

    bricks
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_field_geometry() {
        let mut rng = Pcg32::seed_from_u64(1);
        let bricks = generate_field(HALF_WIDTH, 100, &mut rng);
        assert_eq!(bricks.len(), BRICK_ROWS * BRICK_COLS);

        let first = &bricks[0];
        assert_eq!(first.pos, Vec2::new(HALF_WIDTH + BRICK_GAP, BRICK_OFFSET_TOP));

        // Every brick stays inside the half
        for b in &bricks {
            assert!(b.active);
            assert_eq!(b.value, 100);
            assert!(b.pos.x >= HALF_WIDTH);
            assert!(b.pos.x + b.width <= GAME_WIDTH + 0.001);
            assert_eq!(b.health, b.kind.initial_health());
        }

        let last = bricks.last().unwrap();
        assert!((last.pos.x + last.width + BRICK_GAP - GAME_WIDTH).abs() < 0.01);
    }

    #[test]
    fn test_kind_thresholds() {
        assert_eq!(brick_kind_for_roll(0.0), BrickKind::Attack);
        assert_eq!(brick_kind_for_roll(0.19), BrickKind::Attack);
        assert_eq!(brick_kind_for_roll(0.20), BrickKind::Bonus);
        assert_eq!(brick_kind_for_roll(0.34), BrickKind::Bonus);
        assert_eq!(brick_kind_for_roll(0.36), BrickKind::Hard);
        assert_eq!(brick_kind_for_roll(0.44), BrickKind::Hard);
        assert_eq!(brick_kind_for_roll(0.46), BrickKind::Normal);
        assert_eq!(brick_kind_for_roll(0.99), BrickKind::Normal);
    }

    #[test]
    fn test_kind_distribution_roughly_matches() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut attack = 0;
        let mut hard = 0;
        let total = 100;
        for _ in 0..total {
            for b in generate_field(0.0, 100, &mut rng) {
                match b.kind {
                    BrickKind::Attack => attack += 1,
                    BrickKind::Hard => hard += 1,
                    _ => {}
                }
            }
        }
        let n = (total * BRICK_ROWS * BRICK_COLS) as f32;
        assert!((attack as f32 / n - 0.20).abs() < 0.02);
        assert!((hard as f32 / n - 0.10).abs() < 0.02);
    }

    #[test]
    fn test_sides_draw_independently() {
        let mut rng = Pcg32::seed_from_u64(3);
        let left = generate_field(0.0, 100, &mut rng);
        let right = generate_field(HALF_WIDTH, 100, &mut rng);
        let same = left
            .iter()
            .zip(&right)
            .all(|(a, b)| a.kind == b.kind);
        assert!(!same);
    }
}
