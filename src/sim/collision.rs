//! Circle collision detection and positional correction
//!
//! Every entity collides as a circle. Overlaps are resolved by moving the
//! mover just outside the anchor along the line joining the centers; velocity
//! is never touched.

use glam::DVec2;

use crate::unit_vector;

/// Anything with a collision circle
pub trait Collidable {
    fn position(&self) -> DVec2;
    fn collision_radius(&self) -> f64;

    /// Snapshot of the collision circle
    fn circle(&self) -> Circle {
        Circle::new(self.position(), self.collision_radius())
    }
}

/// A bare collision circle, used as a borrowed-free view of a partner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub pos: DVec2,
    pub radius: f64,
}

impl Circle {
    pub fn new(pos: DVec2, radius: f64) -> Self {
        Self { pos, radius }
    }
}

impl Collidable for Circle {
    fn position(&self) -> DVec2 {
        self.pos
    }

    fn collision_radius(&self) -> f64 {
        self.radius
    }
}

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Whether the circles overlap
    pub hit: bool,
    /// Distance between centers
    pub distance: f64,
    /// Sum of both radii
    pub sum_of_radii: f64,
    /// `a - b`
    pub delta: DVec2,
}

/// Check whether two circles overlap
pub fn check_collision(a: &impl Collidable, b: &impl Collidable) -> CollisionResult {
    let delta = a.position() - b.position();
    let distance = delta.x.hypot(delta.y);
    let sum_of_radii = a.collision_radius() + b.collision_radius();
    CollisionResult {
        hit: distance < sum_of_radii,
        distance,
        sum_of_radii,
        delta,
    }
}

/// Position that puts a mover just outside `anchor`
///
/// `result` must come from `check_collision(mover, anchor)`. Returns `None`
/// when there is nothing to resolve, including coincident centers.
pub fn resolve_position(anchor: DVec2, result: &CollisionResult) -> Option<DVec2> {
    if !result.hit {
        return None;
    }
    let unit = unit_vector(result.delta, result.distance)?;
    Some(anchor + (result.sum_of_radii + 1.0) * unit)
}

/// Push a mover out of each partner in turn
///
/// Partners are handled one after another and never jointly solved: when the
/// mover overlaps several, the last one wins. Returns the number of
/// collisions resolved.
pub fn push_out(pos: &mut DVec2, radius: f64, partners: &[Circle]) -> usize {
    let mut resolved = 0;
    for partner in partners {
        let result = check_collision(&Circle::new(*pos, radius), partner);
        if let Some(new_pos) = resolve_position(partner.pos, &result) {
            *pos = new_pos;
            resolved += 1;
        }
    }
    resolved
}
