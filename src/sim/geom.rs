//! Axis-aligned geometry and collision predicates
//!
//! Pure functions, no state. Overlap tests use strict inequalities on every
//! side, so shapes that merely touch do not count as overlapping.

use glam::Vec2;

/// An axis-aligned rectangle (top-left origin, like a canvas).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
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
        self.pos + self.size * 0.5
    }
}

/// A circle positioned by its center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(x: f32, y: f32, radius: f32) -> Self {
        Self {
            center: Vec2::new(x, y),
            radius,
        }
    }
}

/// Separating-axis test for two axis-aligned rectangles.
#[inline]
pub fn rect_overlap(a: &Rect, b: &Rect) -> bool {
    a.left() < b.right() && a.right() > b.left() && a.top() < b.bottom() && a.bottom() > b.top()
}

/// Circle/rectangle overlap via nearest-point clamping.
#[inline]
pub fn circle_rect_overlap(c: &Circle, r: &Rect) -> bool {
    let nearest = c.center.clamp(r.pos, r.pos + r.size);
    (c.center - nearest).length_squared() < c.radius * c.radius
}
