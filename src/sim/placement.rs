//! Obstacle placement by rejection sampling
//!
//! Candidates are drawn uniformly over the whole world and kept only if they
//! clear every obstacle already placed and sit fully inside the field.
//! Running out of attempts is not an error: the match simply starts with
//! fewer obstacles.

use rand::Rng;

use super::entity::Obstacle;
use crate::Bounds;
use crate::consts::{OBSTACLE_DRAW_SIZE, OBSTACLE_SPACING};

/// Outcome of a placement run
#[derive(Debug, Clone)]
pub struct Placement {
    pub obstacles: Vec<Obstacle>,
    /// Candidates drawn, accepted or not
    pub attempts: usize,
}

impl Placement {
    /// True when every requested obstacle was placed
    pub fn is_complete(&self, requested: usize) -> bool {
        self.obstacles.len() == requested
    }
}

/// Whether `candidate` lies fully inside the placeable band of the field
pub fn within_field(candidate: &Obstacle, bounds: &Bounds) -> bool {
    let margin = candidate.radius * 2.0;
    let (x, y) = (candidate.pos.x, candidate.pos.y);
    x > 0.0
        && x < bounds.width - OBSTACLE_DRAW_SIZE
        && y > bounds.top_margin + margin
        && y < bounds.height - OBSTACLE_DRAW_SIZE - margin
}

/// Whether `candidate` is too close to any placed obstacle
pub fn crowds_any(candidate: &Obstacle, placed: &[Obstacle]) -> bool {
    placed.iter().any(|obstacle| {
        let min_distance = obstacle.radius + candidate.radius + OBSTACLE_SPACING;
        obstacle.pos.distance(candidate.pos) < min_distance
    })
}

/// Place up to `count` obstacles, drawing at most `max_attempts` candidates
pub fn place_obstacles(
    rng: &mut impl Rng,
    bounds: &Bounds,
    count: usize,
    max_attempts: usize,
) -> Placement {
    let mut obstacles = Vec::with_capacity(count);
    let mut attempts = 0;

    while obstacles.len() < count && attempts < max_attempts {
        let candidate = Obstacle::random(rng, bounds);
        // Overlap is judged per candidate; an earlier rejection never carries over
        let overlapping = crowds_any(&candidate, &obstacles);
        if !overlapping && within_field(&candidate, bounds) {
            obstacles.push(candidate);
        }
        attempts += 1;
    }

    if obstacles.len() < count {
        log::warn!(
            "Placed {}/{} obstacles after {} attempts",
            obstacles.len(),
            count,
            attempts
        );
    } else {
        log::info!("Placed {} obstacles in {} attempts", count, attempts);
    }

    Placement {
        obstacles,
        attempts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn assert_layout_valid(placement: &Placement, bounds: &Bounds) {
        for (i, a) in placement.obstacles.iter().enumerate() {
            assert!(within_field(a, bounds), "obstacle {i} out of field: {:?}", a.pos);
            for b in &placement.obstacles[i + 1..] {
                let min = a.radius + b.radius + OBSTACLE_SPACING;
                assert!(a.pos.distance(b.pos) >= min);
            }
        }
    }

    #[test]
    fn test_fixed_seed_layout_is_reproducible() {
        let bounds = Bounds::default();
        let first = place_obstacles(&mut Pcg32::seed_from_u64(2024), &bounds, 10, 500);
        let second = place_obstacles(&mut Pcg32::seed_from_u64(2024), &bounds, 10, 500);

        assert_eq!(first.obstacles, second.obstacles);
        assert_eq!(first.attempts, second.attempts);
        assert!(first.obstacles.len() <= 10);
        assert!(first.is_complete(10) || first.attempts == 500);
        assert_layout_valid(&first, &bounds);
    }

    #[test]
    fn test_zero_attempts_places_nothing() {
        let bounds = Bounds::default();
        let placement = place_obstacles(&mut Pcg32::seed_from_u64(1), &bounds, 10, 0);
        assert!(placement.obstacles.is_empty());
        assert_eq!(placement.attempts, 0);
    }

    #[test]
    fn test_crowding_check() {
        let bounds = Bounds::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut a = Obstacle::random(&mut rng, &bounds);
        a.pos = glam::DVec2::new(300.0, 400.0);
        let mut b = a.clone();
        b.pos.x += 159.0;
        assert!(crowds_any(&b, std::slice::from_ref(&a)));
        b.pos.x += 1.0;
        assert!(!crowds_any(&b, std::slice::from_ref(&a)));
    }

    proptest! {
        #[test]
        fn prop_layout_respects_spacing_and_field(seed in any::<u64>()) {
            let bounds = Bounds::default();
            let placement = place_obstacles(&mut Pcg32::seed_from_u64(seed), &bounds, 10, 500);
            assert_layout_valid(&placement, &bounds);
            // Only exhausting attempts may leave the set short
            prop_assert!(placement.is_complete(10) || placement.attempts == 500);
        }

        #[test]
        fn prop_rejections_do_not_stall_placement(seed in any::<u64>()) {
            // Three placed obstacles can never cover the whole band, so a
            // fourth always fits; a rejection that stuck would stall here
            let bounds = Bounds::default();
            let placement = place_obstacles(&mut Pcg32::seed_from_u64(seed), &bounds, 4, 500);
            prop_assert_eq!(placement.obstacles.len(), 4);
        }
    }
}
