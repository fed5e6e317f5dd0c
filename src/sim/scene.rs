//! Render-model types
//!
//! A [`Scene`] is a read-only snapshot of entity state sufficient to draw
//! one frame: positions, sizes, colors, and text labels. The render adapter
//! consumes it without any knowledge of the live entity representation.

use glam::Vec2;

use super::geom::{Circle, Rect};

/// An sRGB color triple. Named constants follow the arcade's neon palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const BACKDROP: Color = Color(10, 10, 10);
    pub const GRID_LINE: Color = Color(26, 26, 26);
    pub const CYAN: Color = Color(0, 245, 255);
    pub const LIGHT_CYAN: Color = Color(0, 212, 255);
    pub const MAGENTA: Color = Color(255, 0, 255);
    pub const GREEN: Color = Color(0, 255, 0);
    pub const RED: Color = Color(255, 0, 0);
    pub const ORANGE: Color = Color(255, 136, 0);
    pub const YELLOW: Color = Color(255, 255, 0);
    pub const BLUE: Color = Color(0, 136, 255);
    pub const DEEP_BLUE: Color = Color(0, 0, 255);
    pub const WHITE: Color = Color(255, 255, 255);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneRect {
    pub rect: Rect,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneCircle {
    pub circle: Circle,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneLabel {
    pub pos: Vec2,
    pub text: String,
    pub color: Color,
}

/// One frame's worth of drawing instructions in playfield coordinates.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    pub rects: Vec<SceneRect>,
    pub circles: Vec<SceneCircle>,
    pub labels: Vec<SceneLabel>,
}

impl Scene {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn push_rect(&mut self, rect: Rect, color: Color) {
        self.rects.push(SceneRect { rect, color });
    }

    pub fn push_circle(&mut self, circle: Circle, color: Color) {
        self.circles.push(SceneCircle { circle, color });
    }

    pub fn push_label(&mut self, pos: Vec2, text: impl Into<String>, color: Color) {
        self.labels.push(SceneLabel {
            pos,
            text: text.into(),
            color,
        });
    }
}
