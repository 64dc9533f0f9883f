//! Collision detection and response for axis-aligned geometry
//!
//! Balls are treated as their bounding square: every test here compares
//! the ball's leading edges against a rectangle.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (top-left corner plus size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Inclusive overlap (touching edges count)
    pub fn touches(&self, other: &Rect) -> bool {
        self.bottom() >= other.top()
            && self.top() <= other.bottom()
            && self.right() >= other.left()
            && self.left() <= other.right()
    }
}

/// Which axis a ball should bounce along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Result of a ball/brick overlap check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlap {
    /// Horizontal penetration depth
    pub x: f32,
    /// Vertical penetration depth
    pub y: f32,
}

impl Overlap {
    /// Bounce along the shallower penetration; ties go to Y
    pub fn reflect_axis(&self) -> Axis {
        if self.x < self.y { Axis::X } else { Axis::Y }
    }
}

/// Strict overlap between a ball's bounding square and a rectangle
pub fn ball_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> Option<Overlap> {
    let hit = center.x + radius > rect.left()
        && center.x - radius < rect.right()
        && center.y + radius > rect.top()
        && center.y - radius < rect.bottom();
    if !hit {
        return None;
    }
    Some(Overlap {
        x: (center.x + radius - rect.left()).min(rect.right() - (center.x - radius)),
        y: (center.y + radius - rect.top()).min(rect.bottom() - (center.y - radius)),
    })
}

/// Paddle contact: the ball's vertical extent touches the paddle and its
/// centre lies over the paddle span
pub fn ball_hits_paddle(center: Vec2, radius: f32, paddle: &Rect) -> bool {
    center.y + radius >= paddle.top()
        && center.y - radius <= paddle.bottom()
        && center.x >= paddle.left()
        && center.x <= paddle.right()
}

/// Where along the paddle the ball struck, from -1 (left edge) to 1 (right edge)
pub fn paddle_hit_offset(ball_x: f32, paddle: &Rect) -> f32 {
    let half = paddle.size.x / 2.0;
    if half <= f32::EPSILON {
        return 0.0;
    }
    ((ball_x - paddle.center().x) / half).clamp(-1.0, 1.0)
}

/// Flip one velocity component
#[inline]
pub fn reflect(vel: Vec2, axis: Axis) -> Vec2 {
    match axis {
        Axis::X => Vec2::new(-vel.x, vel.y),
        Axis::Y => Vec2::new(vel.x, -vel.y),
    }
}
