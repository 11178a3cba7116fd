//! Entity model
//!
//! Every entity is a collision circle plus its own behavior. Entities never
//! hold a reference back to the world: each `update` borrows exactly the
//! pieces of world state it reads (bounds, partner circles, the RNG) for the
//! duration of the call, and reports transitions through its return value.

use glam::DVec2;
use rand::Rng;

use super::collision::{Circle, Collidable, check_collision, push_out};
use crate::Bounds;
use crate::consts::*;

/// Heading thresholds (radians) for the player's eight facing rows
const FACING_THRESHOLDS: [(f64, u8); 7] = [
    (-1.96, 7),
    (-1.17, 0),
    (-0.39, 1),
    (0.39, 2),
    (1.17, 3),
    (1.96, 4),
    (2.74, 5),
];

/// Facing row used when the heading points (roughly) left
const FACING_WEST: u8 = 6;

/// Last animation frame on each sheet
pub const PLAYER_MAX_FRAME: u32 = 58;
pub const HATCHLING_MAX_FRAME: u32 = 38;
pub const ENEMY_MAX_FRAME: u32 = 38;

#[inline]
fn next_frame(frame: u32, max: u32) -> u32 {
    if frame < max { frame + 1 } else { 0 }
}

/// Sprite row for a heading angle from `atan2(dy, dx)`
pub fn facing_for_angle(angle: f64) -> u8 {
    if !(-2.74..=2.74).contains(&angle) {
        return FACING_WEST;
    }
    FACING_THRESHOLDS
        .iter()
        .find(|(limit, _)| angle < *limit)
        .map(|&(_, row)| row)
        .unwrap_or(FACING_WEST)
}

/// The player-controlled bull
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: DVec2,
    pub radius: f64,
    /// Unit heading of the last step (zero when standing still)
    pub vel: DVec2,
    /// Max step length per update
    pub speed_modifier: f64,
    /// Sprite row derived from the heading
    pub facing: u8,
    /// Animation frame
    pub frame: u32,
}

impl Player {
    pub fn new(bounds: &Bounds) -> Self {
        Self {
            pos: bounds.center(),
            radius: PLAYER_RADIUS,
            vel: DVec2::ZERO,
            speed_modifier: PLAYER_SPEED,
            facing: 5,
            frame: 0,
        }
    }

    /// Back to the starting spot
    pub fn reset(&mut self, bounds: &Bounds) {
        *self = Self::new(bounds);
    }

    /// Step toward `target`, shove out of obstacles, then stay inside bounds
    pub fn update(&mut self, target: DVec2, bounds: &Bounds, obstacles: &[Circle]) {
        let delta = target - self.pos;
        self.facing = facing_for_angle(delta.y.atan2(delta.x));

        let distance = delta.x.hypot(delta.y);
        self.vel = if distance > self.speed_modifier {
            delta / distance
        } else {
            DVec2::ZERO
        };
        self.pos += self.vel * self.speed_modifier;

        push_out(&mut self.pos, self.radius, obstacles);
        self.pos = bounds.clamp_circle(self.pos, self.radius);

        self.frame = next_frame(self.frame, PLAYER_MAX_FRAME);
    }
}

impl Collidable for Player {
    fn position(&self) -> DVec2 {
        self.pos
    }

    fn collision_radius(&self) -> f64 {
        self.radius
    }
}

/// A static rock
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub pos: DVec2,
    pub radius: f64,
    /// Sprite sheet cell (4 columns x 3 rows)
    pub frame_x: u8,
    pub frame_y: u8,
}

impl Obstacle {
    /// Obstacle at a uniformly random spot anywhere in the world
    pub fn random(rng: &mut impl Rng, bounds: &Bounds) -> Self {
        let x = rng.random::<f64>() * bounds.width;
        let y = rng.random::<f64>() * bounds.height;
        Self {
            pos: DVec2::new(x, y),
            radius: OBSTACLE_RADIUS,
            frame_x: rng.random_range(0..4),
            frame_y: rng.random_range(0..3),
        }
    }
}

impl Collidable for Obstacle {
    fn position(&self) -> DVec2 {
        self.pos
    }

    fn collision_radius(&self) -> f64 {
        self.radius
    }
}

/// An egg waiting to hatch
#[derive(Debug, Clone)]
pub struct Egg {
    pub id: u32,
    pub pos: DVec2,
    pub radius: f64,
    /// Milliseconds spent on the field
    pub hatch_timer: f64,
    pub hatch_interval: f64,
    pub marked_for_deletion: bool,
}

impl Egg {
    /// Egg at a random spot in the lower field
    pub fn spawn(id: u32, rng: &mut impl Rng, bounds: &Bounds, hatch_interval: f64) -> Self {
        let x = EGG_SPAWN_MARGIN + rng.random::<f64>() * (bounds.width - EGG_SPAWN_MARGIN * 2.0);
        let y = bounds.top_margin
            + rng.random::<f64>() * (bounds.height - bounds.top_margin - EGG_SPAWN_MARGIN);
        Self::at(id, DVec2::new(x, y), hatch_interval)
    }

    pub fn at(id: u32, pos: DVec2, hatch_interval: f64) -> Self {
        Self {
            id,
            pos,
            radius: EGG_RADIUS,
            hatch_timer: 0.0,
            hatch_interval,
            marked_for_deletion: false,
        }
    }

    /// Get shoved around, then age by `dt` milliseconds
    ///
    /// Returns the hatch position once the timer runs out or the egg has been
    /// pushed into safety above the top margin.
    pub fn update(&mut self, dt: f64, bounds: &Bounds, partners: &[Circle]) -> Option<DVec2> {
        push_out(&mut self.pos, self.radius, partners);

        self.hatch_timer += dt;
        if self.hatch_timer >= self.hatch_interval || self.pos.y < bounds.top_margin {
            self.marked_for_deletion = true;
            return Some(self.pos);
        }
        None
    }

    /// Whole seconds left before hatching (debug readout)
    pub fn seconds_left(&self) -> u32 {
        ((self.hatch_interval - self.hatch_timer).max(0.0) * 0.001).round() as u32
    }
}

impl Collidable for Egg {
    fn position(&self) -> DVec2 {
        self.pos
    }

    fn collision_radius(&self) -> f64 {
        self.radius
    }
}

/// How a hatchling left the field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HatchlingFate {
    /// Crossed the top margin
    Rescued(DVec2),
    /// Caught by an enemy
    Captured(DVec2),
}

/// A freshly hatched larva crawling toward safety
#[derive(Debug, Clone)]
pub struct Hatchling {
    pub id: u32,
    pub pos: DVec2,
    pub radius: f64,
    /// Upward drift per update
    pub speed_y: f64,
    /// Sprite row (two color variants)
    pub frame_y: u8,
    pub frame: u32,
    pub marked_for_deletion: bool,
}

impl Hatchling {
    pub fn new(id: u32, pos: DVec2, rng: &mut impl Rng) -> Self {
        Self {
            id,
            pos,
            radius: HATCHLING_RADIUS,
            speed_y: 1.0 + rng.random::<f64>(),
            frame_y: rng.random_range(0..2),
            frame: 0,
            marked_for_deletion: false,
        }
    }

    /// Crawl up, get shoved by `partners`, and check `enemies` for capture
    pub fn update(
        &mut self,
        bounds: &Bounds,
        partners: &[Circle],
        enemies: &[Circle],
    ) -> Option<HatchlingFate> {
        self.pos.y -= self.speed_y;
        self.frame = next_frame(self.frame, HATCHLING_MAX_FRAME);

        if self.pos.y < bounds.top_margin {
            self.marked_for_deletion = true;
            return Some(HatchlingFate::Rescued(self.pos));
        }

        push_out(&mut self.pos, self.radius, partners);

        let me = self.circle();
        if enemies.iter().any(|enemy| check_collision(&me, enemy).hit) {
            self.marked_for_deletion = true;
            return Some(HatchlingFate::Captured(self.pos));
        }
        None
    }
}

impl Collidable for Hatchling {
    fn position(&self) -> DVec2 {
        self.pos
    }

    fn collision_radius(&self) -> f64 {
        self.radius
    }
}

/// Enemy sprite variants (behavior is identical)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemySpecies {
    Toadskin,
    Barkskin,
}

impl EnemySpecies {
    /// Sprite cell size on the sheet
    pub fn sprite_size(self) -> DVec2 {
        match self {
            EnemySpecies::Toadskin => DVec2::new(154.0, 238.0),
            EnemySpecies::Barkskin => DVec2::new(183.0, 280.0),
        }
    }

    /// How far below the collision center the sprite's bottom edge sits
    pub fn foot_offset(self) -> f64 {
        match self {
            EnemySpecies::Toadskin => 40.0,
            EnemySpecies::Barkskin => 60.0,
        }
    }
}

/// A roaming enemy that sweeps right to left
#[derive(Debug, Clone)]
pub struct Enemy {
    pub species: EnemySpecies,
    pub pos: DVec2,
    pub radius: f64,
    /// Leftward step per update
    pub speed_x: f64,
    /// Sprite row, re-rolled on every recycle
    pub frame_y: u8,
    pub frame: u32,
}

impl Enemy {
    pub fn spawn(species: EnemySpecies, rng: &mut impl Rng, bounds: &Bounds) -> Self {
        let mut enemy = Self {
            species,
            pos: DVec2::ZERO,
            radius: ENEMY_RADIUS,
            speed_x: rng.random_range(ENEMY_MIN_SPEED..ENEMY_MAX_SPEED),
            frame_y: 0,
            frame: 0,
        };
        enemy.respawn(rng, bounds);
        enemy
    }

    /// Enemy with either species, picked evenly
    pub fn spawn_any(rng: &mut impl Rng, bounds: &Bounds) -> Self {
        let species = if rng.random_bool(0.5) {
            EnemySpecies::Toadskin
        } else {
            EnemySpecies::Barkskin
        };
        Self::spawn(species, rng, bounds)
    }

    /// Move to a random point past the right edge
    fn respawn(&mut self, rng: &mut impl Rng, bounds: &Bounds) {
        let sprite_width = self.species.sprite_size().x;
        self.pos = DVec2::new(
            bounds.width + sprite_width + rng.random::<f64>() * bounds.width * 0.5,
            bounds.top_margin + rng.random::<f64>() * (bounds.height - bounds.top_margin),
        );
        self.frame_y = rng.random_range(0..4);
    }

    /// Whether the whole sprite has left the screen on the left
    pub fn is_past_left_edge(&self) -> bool {
        self.pos.x + self.species.sprite_size().x * 0.5 < 0.0
    }

    /// Walk left, recycle when off screen, and get shoved by `partners`
    pub fn update(&mut self, bounds: &Bounds, partners: &[Circle], rng: &mut impl Rng) {
        self.pos.x -= self.speed_x;
        if self.is_past_left_edge() {
            self.respawn(rng, bounds);
        }
        push_out(&mut self.pos, self.radius, partners);
        self.frame = next_frame(self.frame, ENEMY_MAX_FRAME);
    }
}

impl Collidable for Enemy {
    fn position(&self) -> DVec2 {
        self.pos
    }

    fn collision_radius(&self) -> f64 {
        self.radius
    }
}

/// Particle variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleSpecies {
    /// Glowing firefly rising out of a rescue
    Rescue,
    /// Spark scattering from a capture
    Capture,
}

/// Smallest radius a capture spark shrinks to before it dies
const SPARK_MIN_RADIUS: f64 = 0.2;

/// A short-lived visual effect
#[derive(Debug, Clone)]
pub struct Particle {
    pub id: u32,
    pub species: ParticleSpecies,
    pub pos: DVec2,
    pub radius: f64,
    pub speed_x: f64,
    pub speed_y: f64,
    pub angle: f64,
    /// Angular velocity of the wobble
    pub va: f64,
    pub marked_for_deletion: bool,
}

impl Particle {
    pub fn new(id: u32, species: ParticleSpecies, pos: DVec2, rng: &mut impl Rng) -> Self {
        Self {
            id,
            species,
            pos,
            radius: (rng.random::<f64>() * 10.0 + 5.0).floor(),
            speed_x: rng.random::<f64>() * 6.0 - 3.0,
            speed_y: rng.random::<f64>() * 2.0 + 0.5,
            angle: 0.0,
            va: rng.random::<f64>() * 0.1 + 0.01,
            marked_for_deletion: false,
        }
    }

    /// Drift one step; returns true once the particle has expired
    pub fn update(&mut self) -> bool {
        match self.species {
            ParticleSpecies::Rescue => {
                self.angle += self.va;
                self.pos.x += self.angle.cos() * self.speed_x;
                self.pos.y -= self.speed_y;
                if self.pos.y < -self.radius {
                    self.marked_for_deletion = true;
                }
            }
            ParticleSpecies::Capture => {
                self.angle += self.va * 0.5;
                self.pos.x -= self.angle.cos() * self.speed_x;
                self.pos.y -= self.angle.sin() * self.speed_y;
                if self.radius > 0.1 {
                    self.radius -= 0.05;
                }
                if self.radius < SPARK_MIN_RADIUS {
                    self.marked_for_deletion = true;
                }
            }
        }
        self.marked_for_deletion
    }
}

impl Collidable for Particle {
    fn position(&self) -> DVec2 {
        self.pos
    }

    fn collision_radius(&self) -> f64 {
        self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_facing_rows() {
        assert_eq!(facing_for_angle(0.0), 2);
        assert_eq!(facing_for_angle(std::f64::consts::FRAC_PI_2), 4);
        assert_eq!(facing_for_angle(-std::f64::consts::FRAC_PI_2), 0);
        assert_eq!(facing_for_angle(std::f64::consts::PI), 6);
        assert_eq!(facing_for_angle(-std::f64::consts::PI), 6);
        assert_eq!(facing_for_angle(-2.0), 7);
        assert_eq!(facing_for_angle(2.5), 5);
    }

    #[test]
    fn test_player_steps_at_speed_modifier() {
        let bounds = Bounds::default();
        let mut player = Player::new(&bounds);
        let start = player.pos;
        player.update(start + DVec2::new(100.0, 0.0), &bounds, &[]);
        assert!((player.pos.x - (start.x + PLAYER_SPEED)).abs() < 1e-9);
        assert_eq!(player.vel, DVec2::new(1.0, 0.0));
        assert_eq!(player.facing, 2);
    }

    #[test]
    fn test_player_stands_still_near_target() {
        let bounds = Bounds::default();
        let mut player = Player::new(&bounds);
        let start = player.pos;
        player.update(start + DVec2::new(3.0, 0.0), &bounds, &[]);
        assert_eq!(player.pos, start);
        assert_eq!(player.vel, DVec2::ZERO);
    }

    #[test]
    fn test_player_is_pushed_out_of_obstacle() {
        let bounds = Bounds::default();
        let mut player = Player::new(&bounds);
        let rock = Circle::new(player.pos + DVec2::new(50.0, 0.0), OBSTACLE_RADIUS);
        player.update(rock.pos, &bounds, &[rock]);
        assert!((player.pos.distance(rock.pos) - 61.0).abs() < 1e-9);
    }

    #[test]
    fn test_egg_hatches_on_timer() {
        let bounds = Bounds::default();
        let mut egg = Egg::at(1, DVec2::new(400.0, 500.0), 5000.0);
        assert_eq!(egg.update(4999.0, &bounds, &[]), None);
        assert_eq!(egg.update(1.0, &bounds, &[]), Some(DVec2::new(400.0, 500.0)));
        assert!(egg.marked_for_deletion);
    }

    #[test]
    fn test_egg_hatches_early_when_pushed_into_safety() {
        let bounds = Bounds::default();
        let mut egg = Egg::at(1, DVec2::new(400.0, 280.0), 5000.0);
        // Something just below shoves the egg up past the margin
        let pusher = Circle::new(DVec2::new(400.0, 300.0), PLAYER_RADIUS);
        let hatched = egg.update(10.0, &bounds, &[pusher]).unwrap();
        assert!(hatched.y < bounds.top_margin);
        assert!(egg.marked_for_deletion);
    }

    #[test]
    fn test_hatchling_rescued_above_margin() {
        let bounds = Bounds::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut larva = Hatchling::new(1, DVec2::new(300.0, bounds.top_margin - 1.0), &mut rng);
        let fate = larva.update(&bounds, &[], &[]);
        assert!(matches!(fate, Some(HatchlingFate::Rescued(_))));
        assert!(larva.marked_for_deletion);
    }

    #[test]
    fn test_hatchling_captured_by_enemy() {
        let bounds = Bounds::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut larva = Hatchling::new(1, DVec2::new(300.0, 500.0), &mut rng);
        let enemy = Circle::new(DVec2::new(310.0, 495.0), ENEMY_RADIUS);
        let fate = larva.update(&bounds, &[], &[enemy]);
        assert!(matches!(fate, Some(HatchlingFate::Captured(_))));
        assert!(larva.marked_for_deletion);
    }

    #[test]
    fn test_enemy_speed_in_range() {
        let bounds = Bounds::default();
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..100 {
            let enemy = Enemy::spawn_any(&mut rng, &bounds);
            assert!((ENEMY_MIN_SPEED..ENEMY_MAX_SPEED).contains(&enemy.speed_x));
            assert!(enemy.pos.x > bounds.width);
            assert!(enemy.pos.y >= bounds.top_margin && enemy.pos.y <= bounds.height);
        }
    }

    #[test]
    fn test_enemy_recycles_past_left_edge() {
        let bounds = Bounds::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut enemy = Enemy::spawn(EnemySpecies::Toadskin, &mut rng, &bounds);
        let speed = enemy.speed_x;
        enemy.pos.x = -77.0 + speed * 0.5;
        enemy.update(&bounds, &[], &mut rng);
        assert!(enemy.pos.x > bounds.width);
        assert_eq!(enemy.speed_x, speed);
    }

    #[test]
    fn test_spark_shrinks_then_expires() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut spark = Particle::new(1, ParticleSpecies::Capture, DVec2::new(100.0, 100.0), &mut rng);
        let mut steps = 0;
        while !spark.update() {
            assert!(spark.radius > 0.0);
            steps += 1;
            assert!(steps < 1000, "spark never expired");
        }
        assert!(spark.radius > 0.0);
    }

    #[test]
    fn test_firefly_rises_off_screen() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut fly = Particle::new(1, ParticleSpecies::Rescue, DVec2::new(100.0, 50.0), &mut rng);
        let start_y = fly.pos.y;
        fly.update();
        assert!(fly.pos.y < start_y);
        while !fly.update() {}
        assert!(fly.pos.y < -fly.radius);
    }

    proptest! {
        #[test]
        fn prop_player_stays_in_bounds(
            targets in prop::collection::vec((-500.0..1800.0f64, -500.0..1200.0f64), 1..60),
            rock in (0.0..1280.0f64, 260.0..720.0f64),
        ) {
            let bounds = Bounds::default();
            let mut player = Player::new(&bounds);
            let rocks = [Circle::new(DVec2::new(rock.0, rock.1), OBSTACLE_RADIUS)];
            for (x, y) in targets {
                // Several steps per target so the player actually reaches edges
                for _ in 0..20 {
                    player.update(DVec2::new(x, y), &bounds, &rocks);
                    let r = player.radius;
                    prop_assert!(player.pos.x >= r && player.pos.x <= bounds.width - r);
                    prop_assert!(player.pos.y >= bounds.top_margin + r);
                    prop_assert!(player.pos.y <= bounds.height - r);
                }
            }
        }
    }
}
