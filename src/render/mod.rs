//! Rendering through an opaque 2D canvas
//!
//! The simulation never owns a drawing surface. It computes sprite
//! rectangles and overlay geometry and hands them to whatever implements
//! [`Canvas`]: a browser 2D context, or the recording [`HeadlessCanvas`].

pub mod headless;
pub mod sprites;

pub use headless::{DrawCommand, HeadlessCanvas};
pub use sprites::Sprite;

use glam::DVec2;

use crate::sim::entity::ParticleSpecies;
use crate::sim::state::GameState;
use crate::sim::tick::EntityKey;

/// Axis-aligned rectangle in world/sheet pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }
}

/// Straight RGBA color, components in 0-1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba(pub [f32; 4]);

impl Rgba {
    pub const WHITE: Rgba = Rgba([1.0, 1.0, 1.0, 1.0]);
    pub const BLACK: Rgba = Rgba([0.0, 0.0, 0.0, 1.0]);
    pub const YELLOW: Rgba = Rgba([1.0, 1.0, 0.0, 1.0]);
    pub const BLUE: Rgba = Rgba([0.0, 0.0, 1.0, 1.0]);

    pub const fn with_alpha(self, alpha: f32) -> Self {
        let [r, g, b, _] = self.0;
        Rgba([r, g, b, alpha])
    }

    /// CSS `rgba()` string for canvas APIs
    pub fn to_css(self) -> String {
        let [r, g, b, a] = self.0;
        format!(
            "rgba({}, {}, {}, {})",
            (r * 255.0).round() as u8,
            (g * 255.0).round() as u8,
            (b * 255.0).round() as u8,
            a
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels
    pub size: f64,
    pub align: TextAlign,
}

impl TextStyle {
    pub const STATUS: TextStyle = TextStyle {
        size: 40.0,
        align: TextAlign::Left,
    };
    pub const DEBUG_LABEL: TextStyle = TextStyle {
        size: 20.0,
        align: TextAlign::Center,
    };
    pub const HEADLINE: TextStyle = TextStyle {
        size: 130.0,
        align: TextAlign::Center,
    };
    pub const DETAIL: TextStyle = TextStyle {
        size: 40.0,
        align: TextAlign::Center,
    };
}

/// Sprite sheets the host has to provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteImage {
    Bull,
    Obstacles,
    Egg,
    Larva,
    Toadskin,
    Barkskin,
}

impl SpriteImage {
    pub const ALL: [SpriteImage; 6] = [
        SpriteImage::Bull,
        SpriteImage::Obstacles,
        SpriteImage::Egg,
        SpriteImage::Larva,
        SpriteImage::Toadskin,
        SpriteImage::Barkskin,
    ];

    /// Asset name the host looks the image up by
    pub fn asset_id(self) -> &'static str {
        match self {
            SpriteImage::Bull => "bull",
            SpriteImage::Obstacles => "obstacles",
            SpriteImage::Egg => "egg",
            SpriteImage::Larva => "larva",
            SpriteImage::Toadskin => "toadskin",
            SpriteImage::Barkskin => "barkskin",
        }
    }
}

/// Drawing capability the simulation renders through
pub trait Canvas {
    /// Wipe the whole surface
    fn clear(&mut self, width: f64, height: f64);
    /// Copy `src` from a sprite sheet into `dst`
    fn draw_sprite(&mut self, image: SpriteImage, src: Rect, dst: Rect);
    /// Filled, outlined circle
    fn draw_circle(&mut self, center: DVec2, radius: f64, fill: Rgba);
    fn draw_line(&mut self, from: DVec2, to: DVec2);
    fn draw_text(&mut self, text: &str, pos: DVec2, style: TextStyle);
    fn fill_rect(&mut self, rect: Rect, fill: Rgba);
}

/// Fill used for debug collision circles
const DEBUG_FILL: Rgba = Rgba::WHITE.with_alpha(0.2);

/// Draw one entity (sprite plus debug overlay)
pub fn draw_entity(canvas: &mut impl Canvas, state: &GameState, key: EntityKey) {
    match key {
        EntityKey::Player => {
            let player = &state.player;
            sprites::player_sprite(player).draw(canvas);
            if state.debug {
                canvas.draw_circle(player.pos, player.radius, DEBUG_FILL);
                canvas.draw_line(player.pos, state.pointer.target);
            }
        }
        EntityKey::Obstacle(index) => {
            if let Some(obstacle) = state.obstacles.get(index) {
                sprites::obstacle_sprite(obstacle).draw(canvas);
                if state.debug {
                    canvas.draw_circle(obstacle.pos, obstacle.radius, DEBUG_FILL);
                }
            }
        }
        EntityKey::Enemy(index) => {
            if let Some(enemy) = state.enemies.get(index) {
                sprites::enemy_sprite(enemy).draw(canvas);
                if state.debug {
                    canvas.draw_circle(enemy.pos, enemy.radius, DEBUG_FILL);
                }
            }
        }
        EntityKey::Egg(id) => {
            if let Some(egg) = state.eggs.iter().find(|egg| egg.id == id) {
                sprites::egg_sprite(egg).draw(canvas);
                if state.debug {
                    canvas.draw_circle(egg.pos, egg.radius, DEBUG_FILL);
                    let label = DVec2::new(egg.pos.x, egg.pos.y - egg.radius * 2.5);
                    canvas.draw_text(&egg.seconds_left().to_string(), label, TextStyle::DEBUG_LABEL);
                }
            }
        }
        EntityKey::Hatchling(id) => {
            if let Some(larva) = state.hatchlings.iter().find(|larva| larva.id == id) {
                sprites::hatchling_sprite(larva).draw(canvas);
                if state.debug {
                    canvas.draw_circle(larva.pos, larva.radius, DEBUG_FILL);
                }
            }
        }
        EntityKey::Particle(id) => {
            if let Some(particle) = state.particles.iter().find(|p| p.id == id) {
                let color = match particle.species {
                    ParticleSpecies::Rescue => Rgba::YELLOW,
                    ParticleSpecies::Capture => Rgba::BLUE,
                };
                canvas.draw_circle(particle.pos, particle.radius, color);
            }
        }
    }
}

/// Score line (and loss count in debug mode)
pub fn draw_status(canvas: &mut impl Canvas, state: &GameState) {
    canvas.draw_text(
        &format!("Score: {}", state.score()),
        DVec2::new(25.0, 50.0),
        TextStyle::STATUS,
    );
    if state.debug {
        canvas.draw_text(
            &format!("Lost: {}", state.lost_hatchlings()),
            DVec2::new(25.0, 100.0),
            TextStyle::STATUS,
        );
    }
}

/// Dimmed overlay with the match verdict
pub fn draw_game_over(canvas: &mut impl Canvas, state: &GameState) {
    let Some(outcome) = state.match_state.outcome() else {
        return;
    };
    let bounds = &state.bounds;
    let center = bounds.center();

    canvas.fill_rect(
        Rect::new(0.0, 0.0, bounds.width, bounds.height),
        Rgba::BLACK.with_alpha(0.5),
    );
    canvas.draw_text(
        &outcome.headline,
        DVec2::new(center.x, center.y - 20.0),
        TextStyle::HEADLINE,
    );
    canvas.draw_text(
        &outcome.detail,
        DVec2::new(center.x, center.y + 30.0),
        TextStyle::DETAIL,
    );
    canvas.draw_text(
        &format!(
            "Final score {}. Press 'R' to butt heads again!",
            state.score()
        ),
        DVec2::new(center.x, center.y + 80.0),
        TextStyle::DETAIL,
    );
}
