//! Frame scheduler
//!
//! The host calls [`frame`] once per animation frame with its timestamp.
//! Two accumulators run off the elapsed time: one lays eggs, the other fires
//! the update/draw pass at the configured rate. Within a pass every entity is
//! drawn and then updated, lowest `y` first.

use super::collision::Collidable;
use super::lifecycle;
use super::state::{GameEvent, GameState};
use crate::render::{self, Canvas};

/// Handle to one drawable entity for the duration of a pass
///
/// Eggs, hatchlings and particles can be purged mid-pass, so they are keyed
/// by ID rather than index; keys whose entity is gone are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKey {
    Player,
    Obstacle(usize),
    Enemy(usize),
    Egg(u32),
    Hatchling(u32),
    Particle(u32),
}

/// What happened during one host frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameResult {
    /// An update/draw pass ran
    pub rendered: bool,
    pub events: Vec<GameEvent>,
    /// Host should request another frame
    pub keep_running: bool,
}

/// Advance by a host timestamp in milliseconds
///
/// The first call after creation or restart counts as zero elapsed time.
pub fn frame(state: &mut GameState, timestamp: f64, canvas: &mut impl Canvas) -> FrameResult {
    let delta = match state.last_timestamp {
        Some(last) => (timestamp - last).max(0.0),
        None => 0.0,
    };
    state.last_timestamp = Some(timestamp);
    tick(state, delta, canvas)
}

/// Advance by `delta_ms` of wall time
pub fn tick(state: &mut GameState, delta_ms: f64, canvas: &mut impl Canvas) -> FrameResult {
    let mut result = FrameResult::default();
    state.elapsed_ms += delta_ms;

    // Egg spawning
    let mut fresh_egg = None;
    state.egg_timer += delta_ms;
    if state.egg_timer >= state.settings.egg_interval_ms
        && state.eggs.len() < state.settings.max_eggs
        && !state.is_over()
    {
        let pos = lifecycle::spawn_egg(state);
        fresh_egg = state.eggs.last().map(|egg| egg.id);
        result.events.push(GameEvent::EggLaid { pos });
        state.egg_timer = 0.0;
    }

    // Update/draw pass
    state.frame_timer += delta_ms;
    if state.frame_timer >= state.settings.frame_interval_ms() {
        let elapsed = state.frame_timer;
        state.frame_timer = 0.0;
        state.passes += 1;
        run_pass(state, elapsed, fresh_egg, canvas, &mut result.events);
        result.rendered = true;

        if state.match_state.check_win() {
            result.events.push(GameEvent::MatchWon {
                score: state.score(),
                lost_hatchlings: state.lost_hatchlings(),
            });
        }
        render::draw_status(canvas, state);
        if state.is_over() {
            render::draw_game_over(canvas, state);
        }
    }

    result.keep_running = !state.is_over();
    result
}

/// Drawables in paint order: collection order, then stable by `y`
pub fn depth_order(state: &GameState) -> Vec<EntityKey> {
    let mut keyed: Vec<(f64, EntityKey)> = Vec::with_capacity(
        state.eggs.len()
            + state.obstacles.len()
            + 1
            + state.enemies.len()
            + state.hatchlings.len()
            + state.particles.len(),
    );
    keyed.extend(state.eggs.iter().map(|e| (e.pos.y, EntityKey::Egg(e.id))));
    keyed.extend(
        state
            .obstacles
            .iter()
            .enumerate()
            .map(|(i, o)| (o.pos.y, EntityKey::Obstacle(i))),
    );
    keyed.push((state.player.pos.y, EntityKey::Player));
    keyed.extend(
        state
            .enemies
            .iter()
            .enumerate()
            .map(|(i, e)| (e.pos.y, EntityKey::Enemy(i))),
    );
    keyed.extend(
        state
            .hatchlings
            .iter()
            .map(|h| (h.pos.y, EntityKey::Hatchling(h.id))),
    );
    keyed.extend(
        state
            .particles
            .iter()
            .map(|p| (p.pos.y, EntityKey::Particle(p.id))),
    );

    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    keyed.into_iter().map(|(_, key)| key).collect()
}

fn run_pass(
    state: &mut GameState,
    elapsed: f64,
    fresh_egg: Option<u32>,
    canvas: &mut impl Canvas,
    events: &mut Vec<GameEvent>,
) {
    canvas.clear(state.bounds.width, state.bounds.height);
    for key in depth_order(state) {
        render::draw_entity(canvas, state, key);
        // An egg laid this frame starts aging on the next pass
        if fresh_egg.is_some_and(|id| key == EntityKey::Egg(id)) {
            continue;
        }
        update_entity(state, key, elapsed, events);
    }
}

fn update_entity(state: &mut GameState, key: EntityKey, elapsed: f64, events: &mut Vec<GameEvent>) {
    match key {
        EntityKey::Player => {
            let obstacles = state.obstacle_circles();
            state
                .player
                .update(state.pointer.target, &state.bounds, &obstacles);
        }
        // Obstacles never move
        EntityKey::Obstacle(_) => {}
        EntityKey::Enemy(index) => {
            if index >= state.enemies.len() {
                return;
            }
            let mut partners = vec![state.player.circle()];
            partners.extend(state.obstacles.iter().map(Collidable::circle));
            state.enemies[index].update(&state.bounds, &partners, &mut state.rng);
        }
        EntityKey::Egg(id) => {
            let Some(index) = state.eggs.iter().position(|egg| egg.id == id) else {
                return;
            };
            let mut partners = vec![state.player.circle()];
            partners.extend(state.obstacles.iter().map(Collidable::circle));
            partners.extend(state.enemies.iter().map(Collidable::circle));
            partners.extend(state.hatchlings.iter().map(Collidable::circle));
            if let Some(pos) = state.eggs[index].update(elapsed, &state.bounds, &partners) {
                events.push(lifecycle::hatch(state, pos));
            }
        }
        EntityKey::Hatchling(id) => {
            let Some(index) = state.hatchlings.iter().position(|larva| larva.id == id) else {
                return;
            };
            let mut partners = vec![state.player.circle()];
            partners.extend(state.obstacles.iter().map(Collidable::circle));
            partners.extend(state.eggs.iter().map(Collidable::circle));
            let enemies = state.enemy_circles();
            if let Some(fate) = state.hatchlings[index].update(&state.bounds, &partners, &enemies) {
                events.push(lifecycle::settle(state, fate));
            }
        }
        EntityKey::Particle(id) => {
            let Some(index) = state.particles.iter().position(|p| p.id == id) else {
                return;
            };
            if state.particles[index].update() {
                lifecycle::purge(state);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Settings;
    use crate::render::{DrawCommand, HeadlessCanvas, SpriteImage};
    use crate::sim::entity::{Egg, Enemy, EnemySpecies, Hatchling, ParticleSpecies};
    use glam::DVec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Just the player: no rocks, no enemies
    fn bare_world(settings: Settings) -> GameState {
        GameState::new(
            Settings {
                number_of_obstacles: 0,
                enemy_count: 0,
                ..settings
            },
            21,
        )
    }

    fn hatchling_at(state: &mut GameState, pos: DVec2) {
        let id = state.next_entity_id();
        let mut rng = Pcg32::seed_from_u64(u64::from(id));
        state.hatchlings.push(Hatchling::new(id, pos, &mut rng));
    }

    #[test]
    fn test_single_egg_lays_then_hatches() {
        let mut state = bare_world(Settings {
            max_eggs: 1,
            ..Default::default()
        });
        let mut canvas = HeadlessCanvas::new();

        for _ in 0..24 {
            tick(&mut state, 20.0, &mut canvas);
        }
        assert!(state.eggs.is_empty());

        let result = tick(&mut state, 20.0, &mut canvas);
        assert_eq!(state.eggs.len(), 1);
        assert!(matches!(result.events[0], GameEvent::EggLaid { .. }));
        assert_eq!(state.eggs[0].hatch_timer, 0.0);
        // Well away from the player so nothing shoves it to safety
        state.eggs[0].pos = DVec2::new(100.0, 600.0);

        // 20ms short of hatch_interval after laying: still an egg
        for _ in 0..249 {
            let result = tick(&mut state, 20.0, &mut canvas);
            assert!(result.events.is_empty());
        }
        assert_eq!(state.eggs.len(), 1);
        assert_eq!(state.eggs[0].hatch_timer, 4980.0);
        assert!(state.hatchlings.is_empty());

        let result = tick(&mut state, 20.0, &mut canvas);
        assert_eq!(
            result.events,
            vec![GameEvent::Hatched {
                pos: DVec2::new(100.0, 600.0)
            }]
        );
        assert!(state.eggs.is_empty());
        assert_eq!(state.hatchlings.len(), 1);
    }

    #[test]
    fn test_egg_does_not_age_in_the_frame_it_is_laid() {
        let mut state = bare_world(Settings {
            max_eggs: 1,
            ..Default::default()
        });
        let mut canvas = HeadlessCanvas::new();

        // One frame longer than the whole hatch interval
        let result = tick(&mut state, 6000.0, &mut canvas);
        assert!(result.rendered);
        assert_eq!(result.events.len(), 1);
        assert!(matches!(result.events[0], GameEvent::EggLaid { .. }));
        assert_eq!(state.eggs.len(), 1);
        assert_eq!(state.eggs[0].hatch_timer, 0.0);
        assert!(state.hatchlings.is_empty());
        // Still drawn on the frame it appears
        assert_eq!(canvas.sprites_of(SpriteImage::Egg).len(), 1);
    }

    #[test]
    fn test_hatchling_at_margin_is_rescued() {
        let mut state = bare_world(Settings::default());
        let margin = state.bounds.top_margin;
        hatchling_at(&mut state, DVec2::new(200.0, margin - 1.0));
        let mut canvas = HeadlessCanvas::new();

        let result = tick(&mut state, 15.0, &mut canvas);

        assert!(result.rendered);
        assert!(state.hatchlings.is_empty());
        assert_eq!(state.score(), 1);
        assert_eq!(state.particles.len(), 4);
        assert!(
            state
                .particles
                .iter()
                .all(|p| p.species == ParticleSpecies::Rescue)
        );
        assert!(
            result
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::Rescued { counted: true, .. }))
        );
    }

    #[test]
    fn test_counters_frozen_after_win() {
        let mut state = bare_world(Settings {
            winning_score: 1,
            ..Default::default()
        });
        let margin = state.bounds.top_margin;
        let mut canvas = HeadlessCanvas::new();

        hatchling_at(&mut state, DVec2::new(200.0, margin - 1.0));
        let result = tick(&mut state, 15.0, &mut canvas);
        assert!(state.is_over());
        assert!(!result.keep_running);
        assert!(result.events.contains(&GameEvent::MatchWon {
            score: 1,
            lost_hatchlings: 0,
        }));
        assert!(canvas.texts().contains(&"Bullseye!!!"));

        hatchling_at(&mut state, DVec2::new(600.0, margin - 1.0));
        let result = tick(&mut state, 15.0, &mut canvas);
        assert_eq!(state.score(), 1);
        assert!(
            result
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::Rescued { counted: false, .. }))
        );
        assert!(
            !result
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::MatchWon { .. }))
        );
    }

    #[test]
    fn test_no_eggs_after_game_over() {
        let mut state = bare_world(Settings {
            winning_score: 1,
            ..Default::default()
        });
        state.match_state.record_rescue();
        state.match_state.check_win();
        let mut canvas = HeadlessCanvas::new();
        for _ in 0..100 {
            tick(&mut state, 20.0, &mut canvas);
        }
        assert!(state.eggs.is_empty());
    }

    #[test]
    fn test_pass_is_throttled() {
        let mut state = bare_world(Settings::default());
        let mut canvas = HeadlessCanvas::new();

        let result = tick(&mut state, 10.0, &mut canvas);
        assert!(!result.rendered);
        assert!(canvas.commands.is_empty());
        assert_eq!(state.passes, 0);

        let result = tick(&mut state, 10.0, &mut canvas);
        assert!(result.rendered);
        assert_eq!(canvas.clear_count(), 1);
        assert_eq!(state.passes, 1);
        assert_eq!(state.frame_timer, 0.0);
        assert!(canvas.texts().contains(&"Score: 0"));
    }

    #[test]
    fn test_first_frame_has_no_delta() {
        let mut state = bare_world(Settings::default());
        let mut canvas = HeadlessCanvas::new();
        let result = frame(&mut state, 123_456.0, &mut canvas);
        assert!(!result.rendered);
        assert!(result.keep_running);
        assert_eq!(state.elapsed_ms, 0.0);

        // Clock going backwards counts as no time
        frame(&mut state, 100.0, &mut canvas);
        assert_eq!(state.elapsed_ms, 0.0);

        let result = frame(&mut state, 120.0, &mut canvas);
        assert!(result.rendered);
        assert_eq!(state.elapsed_ms, 20.0);
    }

    #[test]
    fn test_depth_order_is_stable_by_y() {
        let mut state = bare_world(Settings::default());
        let y = state.player.pos.y;
        state.eggs.push(Egg::at(100, DVec2::new(100.0, y), 5000.0));
        state.eggs.push(Egg::at(101, DVec2::new(100.0, 600.0), 5000.0));
        hatchling_at(&mut state, DVec2::new(100.0, 300.0));
        let larva = state.hatchlings[0].id;

        let order = depth_order(&state);
        assert_eq!(
            order,
            vec![
                EntityKey::Hatchling(larva),
                EntityKey::Egg(100),
                EntityKey::Player,
                EntityKey::Egg(101),
            ]
        );
    }

    #[test]
    fn test_depth_ties_keep_collection_order() {
        let mut state = bare_world(Settings::default());
        for id in [7, 3, 5] {
            state.eggs.push(Egg::at(id, DVec2::new(100.0 * f64::from(id), 500.0), 5000.0));
        }
        let order = depth_order(&state);
        assert_eq!(
            order,
            vec![
                EntityKey::Player,
                EntityKey::Egg(7),
                EntityKey::Egg(3),
                EntityKey::Egg(5),
            ]
        );
    }

    #[test]
    fn test_captures_settle_once_and_new_hatchlings_wait() {
        let mut state = bare_world(Settings::default());
        let mut canvas = HeadlessCanvas::new();
        let mut rng = Pcg32::seed_from_u64(17);
        for x in [300.0, 1000.0] {
            hatchling_at(&mut state, DVec2::new(x, 500.0));
            let mut enemy = Enemy::spawn(EnemySpecies::Toadskin, &mut rng, &state.bounds);
            enemy.pos = DVec2::new(x, 500.0);
            state.enemies.push(enemy);
        }
        // About to hatch, clear of everything else
        let mut egg = Egg::at(900, DVec2::new(650.0, 650.0), 5000.0);
        egg.hatch_timer = 4999.0;
        state.eggs.push(egg);

        let result = tick(&mut state, 15.0, &mut canvas);

        let captures = result
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::Captured { counted: true, .. }))
            .count();
        assert_eq!(captures, 2);
        assert_eq!(state.lost_hatchlings(), 2);
        assert_eq!(state.particles.len(), 8);

        // Only the freshly hatched one is left, and it has not moved yet
        assert_eq!(state.hatchlings.len(), 1);
        assert_eq!(state.hatchlings[0].pos, DVec2::new(650.0, 650.0));
        assert_eq!(state.hatchlings[0].frame, 0);
        assert!(state.eggs.is_empty());

        // Every pre-existing drawable got one sprite; particles are circles
        assert_eq!(canvas.sprite_count(), 1 + 2 + 2 + 1);
    }

    #[test]
    fn test_entities_draw_before_update() {
        let mut state = bare_world(Settings::default());
        let start = state.player.pos;
        state.pointer.target = start + DVec2::new(300.0, 0.0);
        let mut canvas = HeadlessCanvas::new();

        tick(&mut state, 15.0, &mut canvas);

        let drawn = canvas.sprites_of(SpriteImage::Bull);
        assert_eq!(drawn.len(), 1);
        assert!((drawn[0].x - (start.x - 76.5)).abs() < 1e-9);
        assert!(state.player.pos.x > start.x);
        assert!(matches!(canvas.commands[0], DrawCommand::Clear { .. }));
    }

    #[test]
    fn test_restart_after_game_over_resumes() {
        let mut state = GameState::new(
            Settings {
                winning_score: 1,
                ..Default::default()
            },
            4,
        );
        state.match_state.record_rescue();
        let mut canvas = HeadlessCanvas::new();
        let result = tick(&mut state, 15.0, &mut canvas);
        assert!(!result.keep_running);

        state.restart();
        let result = tick(&mut state, 15.0, &mut canvas);
        assert!(result.keep_running);
        assert_eq!(state.score(), 0);
    }
}
