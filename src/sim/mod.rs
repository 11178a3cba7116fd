//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Seeded RNG only
//! - Stable iteration order (collection order, then depth)
//! - Drawing only through the `Canvas` capability

pub mod collision;
pub mod entity;
pub mod input;
pub mod lifecycle;
pub mod match_state;
pub mod placement;
pub mod state;
pub mod tick;

pub use collision::{Circle, Collidable, CollisionResult, check_collision, push_out};
pub use entity::{
    Egg, Enemy, EnemySpecies, Hatchling, HatchlingFate, Obstacle, Particle, ParticleSpecies,
    Player,
};
pub use input::{HostRequest, InputEvent, handle_input};
pub use match_state::{GamePhase, MatchState, Outcome};
pub use placement::{Placement, place_obstacles};
pub use state::{GameEvent, GameState, MatchSummary, Pointer};
pub use tick::{EntityKey, FrameResult, depth_order, frame, tick};
