//! World state
//!
//! The world owns every entity collection plus the match counters, the
//! pointer target, and the scheduler's accumulators. Entities are plain data
//! and borrow from here only for the length of one update.

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::collision::{Circle, Collidable};
use super::entity::{Egg, Enemy, Hatchling, Obstacle, Particle, Player};
use super::match_state::{GamePhase, MatchState};
use super::placement::place_obstacles;
use crate::{Bounds, Settings};

/// Something that happened during a frame, reported to the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A new egg appeared
    EggLaid { pos: DVec2 },
    /// An egg turned into a hatchling
    Hatched { pos: DVec2 },
    /// A hatchling reached safety (`counted` is false after game over)
    Rescued { pos: DVec2, counted: bool },
    /// A hatchling was caught (`counted` is false after game over)
    Captured { pos: DVec2, counted: bool },
    /// The winning score was reached
    MatchWon { score: u32, lost_hatchlings: u32 },
}

/// Where the player is being steered
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub target: DVec2,
    /// Pointer held down; moves only retarget while held
    pub pressed: bool,
}

impl Pointer {
    pub fn centered(bounds: &Bounds) -> Self {
        Self {
            target: bounds.center(),
            pressed: false,
        }
    }
}

/// Compact end-of-run report
#[derive(Debug, Clone, Serialize)]
pub struct MatchSummary {
    pub seed: u64,
    pub phase: GamePhase,
    pub score: u32,
    pub lost_hatchlings: u32,
    pub obstacles_placed: usize,
    pub passes: u64,
    pub elapsed_ms: f64,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub settings: Settings,
    pub bounds: Bounds,
    /// Debug overlay visible
    pub debug: bool,
    pub pointer: Pointer,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub eggs: Vec<Egg>,
    pub hatchlings: Vec<Hatchling>,
    pub enemies: Vec<Enemy>,
    pub particles: Vec<Particle>,
    pub match_state: MatchState,
    /// Milliseconds since the last update/draw pass
    pub frame_timer: f64,
    /// Milliseconds since the last egg spawn
    pub egg_timer: f64,
    /// Host timestamp of the previous frame
    pub last_timestamp: Option<f64>,
    /// Update/draw passes run this match
    pub passes: u64,
    /// Simulated milliseconds this match
    pub elapsed_ms: f64,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new match with the given settings and seed
    pub fn new(settings: Settings, seed: u64) -> Self {
        let bounds = Bounds::default();
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            debug: settings.debug,
            pointer: Pointer::centered(&bounds),
            player: Player::new(&bounds),
            obstacles: Vec::new(),
            eggs: Vec::new(),
            hatchlings: Vec::new(),
            enemies: Vec::new(),
            particles: Vec::new(),
            match_state: MatchState::new(settings.winning_score),
            frame_timer: 0.0,
            egg_timer: 0.0,
            last_timestamp: None,
            passes: 0,
            elapsed_ms: 0.0,
            settings,
            bounds,
            next_id: 1,
        };
        state.populate();
        log::info!("Match started with seed {}", seed);
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Enemy batch plus a fresh obstacle layout
    fn populate(&mut self) {
        for _ in 0..self.settings.enemy_count {
            super::lifecycle::spawn_enemy(self);
        }
        let placement = place_obstacles(
            &mut self.rng,
            &self.bounds,
            self.settings.number_of_obstacles,
            self.settings.placement_attempts,
        );
        self.obstacles = placement.obstacles;
    }

    /// Start a new match on the same RNG stream
    pub fn restart(&mut self) {
        self.player.reset(&self.bounds);
        self.pointer = Pointer::centered(&self.bounds);
        self.obstacles.clear();
        self.eggs.clear();
        self.hatchlings.clear();
        self.enemies.clear();
        self.particles.clear();
        self.match_state.reset();
        self.frame_timer = 0.0;
        self.egg_timer = 0.0;
        // The host resumes its frame loop after a restart; don't count the pause
        self.last_timestamp = None;
        self.passes = 0;
        self.elapsed_ms = 0.0;
        self.populate();
        log::info!("Match restarted");
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.match_state.is_over()
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.match_state.score
    }

    #[inline]
    pub fn lost_hatchlings(&self) -> u32 {
        self.match_state.lost_hatchlings
    }

    pub fn obstacle_circles(&self) -> Vec<Circle> {
        self.obstacles.iter().map(Collidable::circle).collect()
    }

    pub fn enemy_circles(&self) -> Vec<Circle> {
        self.enemies.iter().map(Collidable::circle).collect()
    }

    pub fn summary(&self) -> MatchSummary {
        MatchSummary {
            seed: self.seed,
            phase: self.match_state.phase,
            score: self.score(),
            lost_hatchlings: self.lost_hatchlings(),
            obstacles_placed: self.obstacles.len(),
            passes: self.passes,
            elapsed_ms: self.elapsed_ms,
        }
    }
}
