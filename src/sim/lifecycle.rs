//! Entity lifecycle: spawning, transitions, and purging
//!
//! Anything that marks an entity for deletion is followed right away by
//! `purge`, so no later step in the same pass sees a dead entity.

use glam::DVec2;

use super::entity::{Egg, Enemy, Hatchling, HatchlingFate, Particle, ParticleSpecies};
use super::state::{GameEvent, GameState};
use crate::consts::PARTICLES_PER_BURST;

/// Drop every entity marked for deletion
pub fn purge(state: &mut GameState) {
    state.eggs.retain(|egg| !egg.marked_for_deletion);
    state.hatchlings.retain(|larva| !larva.marked_for_deletion);
    state.particles.retain(|particle| !particle.marked_for_deletion);
}

/// Lay a new egg at a random spot
pub fn spawn_egg(state: &mut GameState) -> DVec2 {
    let id = state.next_entity_id();
    let egg = Egg::spawn(
        id,
        &mut state.rng,
        &state.bounds,
        state.settings.hatch_interval_ms,
    );
    let pos = egg.pos;
    state.eggs.push(egg);
    pos
}

/// Add one enemy of a random species to the pool
pub fn spawn_enemy(state: &mut GameState) {
    let enemy = Enemy::spawn_any(&mut state.rng, &state.bounds);
    state.enemies.push(enemy);
}

/// Replace a hatched egg with a hatchling at the same spot
pub fn hatch(state: &mut GameState, pos: DVec2) -> GameEvent {
    let id = state.next_entity_id();
    let larva = Hatchling::new(id, pos, &mut state.rng);
    state.hatchlings.push(larva);
    purge(state);
    log::debug!("Egg hatched at ({:.0}, {:.0})", pos.x, pos.y);
    GameEvent::Hatched { pos }
}

/// Emit a burst of particles at `pos`
pub fn burst(state: &mut GameState, pos: DVec2, species: ParticleSpecies) {
    for _ in 0..PARTICLES_PER_BURST {
        let id = state.next_entity_id();
        let particle = Particle::new(id, species, pos, &mut state.rng);
        state.particles.push(particle);
    }
}

/// Apply a hatchling's terminal transition to the world and the counters
pub fn settle(state: &mut GameState, fate: HatchlingFate) -> GameEvent {
    purge(state);
    match fate {
        HatchlingFate::Rescued(pos) => {
            let counted = state.match_state.record_rescue();
            burst(state, pos, ParticleSpecies::Rescue);
            log::debug!("Hatchling rescued (score {})", state.score());
            GameEvent::Rescued { pos, counted }
        }
        HatchlingFate::Captured(pos) => {
            let counted = state.match_state.record_capture();
            burst(state, pos, ParticleSpecies::Capture);
            log::debug!("Hatchling captured (lost {})", state.lost_hatchlings());
            GameEvent::Captured { pos, counted }
        }
    }
}
