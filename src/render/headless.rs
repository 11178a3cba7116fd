//! Recording canvas for headless runs and tests
//!
//! Every draw call is stored as a [`DrawCommand`] in issue order, so a frame
//! can be inspected without a window.

use glam::DVec2;

use super::{Canvas, Rect, Rgba, SpriteImage, TextStyle};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear {
        width: f64,
        height: f64,
    },
    Sprite {
        image: SpriteImage,
        src: Rect,
        dst: Rect,
    },
    Circle {
        center: DVec2,
        radius: f64,
        fill: Rgba,
    },
    Line {
        from: DVec2,
        to: DVec2,
    },
    Text {
        text: String,
        pos: DVec2,
        style: TextStyle,
    },
    FillRect {
        rect: Rect,
        fill: Rgba,
    },
}

/// Canvas that keeps a log of draw calls instead of rasterizing
#[derive(Debug, Default, Clone)]
pub struct HeadlessCanvas {
    pub commands: Vec<DrawCommand>,
}

impl HeadlessCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything recorded so far
    pub fn reset(&mut self) {
        self.commands.clear();
    }

    /// Text strings drawn, in order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Sprites drawn from `image`, in order
    pub fn sprites_of(&self, image: SpriteImage) -> Vec<Rect> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Sprite { image: img, dst, .. } if *img == image => Some(*dst),
                _ => None,
            })
            .collect()
    }

    pub fn sprite_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|cmd| matches!(cmd, DrawCommand::Sprite { .. }))
            .count()
    }

    /// Number of times the surface was wiped
    pub fn clear_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|cmd| matches!(cmd, DrawCommand::Clear { .. }))
            .count()
    }
}

impl Canvas for HeadlessCanvas {
    fn clear(&mut self, width: f64, height: f64) {
        self.commands.push(DrawCommand::Clear { width, height });
    }

    fn draw_sprite(&mut self, image: SpriteImage, src: Rect, dst: Rect) {
        self.commands.push(DrawCommand::Sprite { image, src, dst });
    }

    fn draw_circle(&mut self, center: DVec2, radius: f64, fill: Rgba) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            fill,
        });
    }

    fn draw_line(&mut self, from: DVec2, to: DVec2) {
        self.commands.push(DrawCommand::Line { from, to });
    }

    fn draw_text(&mut self, text: &str, pos: DVec2, style: TextStyle) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            pos,
            style,
        });
    }

    fn fill_rect(&mut self, rect: Rect, fill: Rgba) {
        self.commands.push(DrawCommand::FillRect { rect, fill });
    }
}
