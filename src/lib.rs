//! Egg Herder - A 2D herding arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, scheduling, match state)
//! - `render`: Canvas capability the simulation draws through
//! - `settings`: Data-driven game tuning

pub mod render;
pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};

use glam::DVec2;

/// Game configuration constants
pub mod consts {
    /// World dimensions
    pub const WORLD_WIDTH: f64 = 1280.0;
    pub const WORLD_HEIGHT: f64 = 720.0;
    /// Everything above this line is "safety" for hatchlings
    pub const TOP_MARGIN: f64 = 260.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f64 = 30.0;
    pub const PLAYER_SPEED: f64 = 5.0;

    /// Obstacle defaults
    pub const OBSTACLE_RADIUS: f64 = 30.0;
    /// Extra clearance between placed obstacles
    pub const OBSTACLE_SPACING: f64 = 100.0;
    /// On-screen sprite size (250px sheet cell at half scale)
    pub const OBSTACLE_DRAW_SIZE: f64 = 125.0;

    /// Egg defaults
    pub const EGG_RADIUS: f64 = 40.0;
    /// Keep-out band for egg spawns along the left, right and bottom edges
    pub const EGG_SPAWN_MARGIN: f64 = 80.0;

    /// Hatchling defaults
    pub const HATCHLING_RADIUS: f64 = 30.0;

    /// Enemy defaults
    pub const ENEMY_RADIUS: f64 = 30.0;
    pub const ENEMY_MIN_SPEED: f64 = 0.5;
    pub const ENEMY_MAX_SPEED: f64 = 3.5;

    /// Particles emitted per rescue/capture
    pub const PARTICLES_PER_BURST: usize = 4;

    /// Loss count at or below which the match outcome is favorable
    pub const FAVORABLE_LOSS_LIMIT: u32 = 5;
}

/// Unit vector from `delta`, or `None` when `length` is zero
#[inline]
pub fn unit_vector(delta: DVec2, length: f64) -> Option<DVec2> {
    if length > 0.0 { Some(delta / length) } else { None }
}

/// World-space bounds shared by every entity update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
    pub top_margin: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            width: consts::WORLD_WIDTH,
            height: consts::WORLD_HEIGHT,
            top_margin: consts::TOP_MARGIN,
        }
    }
}

impl Bounds {
    /// Center of the world
    #[inline]
    pub fn center(&self) -> DVec2 {
        DVec2::new(self.width * 0.5, self.height * 0.5)
    }

    /// Clamp a circle's center so the circle stays inside the playable area
    /// (below the top margin)
    pub fn clamp_circle(&self, pos: DVec2, radius: f64) -> DVec2 {
        DVec2::new(
            pos.x.clamp(radius, self.width - radius),
            pos.y.clamp(self.top_margin + radius, self.height - radius),
        )
    }
}
