//! Sprite sheet geometry for each entity
//!
//! Sprites are anchored so the collision circle sits at the creature's feet;
//! each sheet carries its own upward offset.

use super::{Canvas, Rect, SpriteImage};
use crate::consts::OBSTACLE_DRAW_SIZE;
use crate::sim::entity::{Egg, Enemy, Hatchling, Obstacle, Player};

/// Player sheet: 255px cells, drawn at 60%
pub const PLAYER_CELL: f64 = 255.0;
pub const PLAYER_SCALE: f64 = 0.6;
const PLAYER_LIFT: f64 = 50.0;

pub const OBSTACLE_CELL: f64 = 250.0;
const OBSTACLE_LIFT: f64 = 40.0;

pub const EGG_WIDTH: f64 = 110.0;
pub const EGG_HEIGHT: f64 = 135.0;
const EGG_LIFT: f64 = 30.0;

pub const HATCHLING_CELL: f64 = 150.0;
const HATCHLING_LIFT: f64 = 50.0;

/// A sheet cell and where it lands on screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub image: SpriteImage,
    pub src: Rect,
    pub dst: Rect,
}

impl Sprite {
    pub fn draw(&self, canvas: &mut impl Canvas) {
        canvas.draw_sprite(self.image, self.src, self.dst);
    }
}

pub fn player_sprite(player: &Player) -> Sprite {
    let size = PLAYER_CELL * PLAYER_SCALE;
    Sprite {
        image: SpriteImage::Bull,
        src: Rect::new(
            player.frame as f64 * PLAYER_CELL,
            player.facing as f64 * PLAYER_CELL,
            PLAYER_CELL,
            PLAYER_CELL,
        ),
        dst: Rect::new(
            player.pos.x - size * 0.5,
            player.pos.y - size * 0.5 - PLAYER_LIFT,
            size,
            size,
        ),
    }
}

pub fn obstacle_sprite(obstacle: &Obstacle) -> Sprite {
    let size = OBSTACLE_DRAW_SIZE;
    Sprite {
        image: SpriteImage::Obstacles,
        src: Rect::new(
            obstacle.frame_x as f64 * OBSTACLE_CELL,
            obstacle.frame_y as f64 * OBSTACLE_CELL,
            OBSTACLE_CELL,
            OBSTACLE_CELL,
        ),
        dst: Rect::new(
            obstacle.pos.x - size * 0.5,
            obstacle.pos.y - size * 0.5 - OBSTACLE_LIFT,
            size,
            size,
        ),
    }
}

pub fn egg_sprite(egg: &Egg) -> Sprite {
    Sprite {
        image: SpriteImage::Egg,
        src: Rect::new(0.0, 0.0, EGG_WIDTH, EGG_HEIGHT),
        dst: Rect::new(
            egg.pos.x - EGG_WIDTH * 0.5,
            egg.pos.y - EGG_HEIGHT * 0.5 - EGG_LIFT,
            EGG_WIDTH,
            EGG_HEIGHT,
        ),
    }
}

pub fn hatchling_sprite(larva: &Hatchling) -> Sprite {
    Sprite {
        image: SpriteImage::Larva,
        src: Rect::new(
            larva.frame as f64 * HATCHLING_CELL,
            larva.frame_y as f64 * HATCHLING_CELL,
            HATCHLING_CELL,
            HATCHLING_CELL,
        ),
        dst: Rect::new(
            larva.pos.x - HATCHLING_CELL * 0.5,
            larva.pos.y - HATCHLING_CELL * 0.5 - HATCHLING_LIFT,
            HATCHLING_CELL,
            HATCHLING_CELL,
        ),
    }
}

pub fn enemy_sprite(enemy: &Enemy) -> Sprite {
    use crate::sim::entity::EnemySpecies;

    let size = enemy.species.sprite_size();
    let image = match enemy.species {
        EnemySpecies::Toadskin => SpriteImage::Toadskin,
        EnemySpecies::Barkskin => SpriteImage::Barkskin,
    };
    Sprite {
        image,
        src: Rect::new(
            enemy.frame as f64 * size.x,
            enemy.frame_y as f64 * size.y,
            size.x,
            size.y,
        ),
        dst: Rect::new(
            enemy.pos.x - size.x * 0.5,
            enemy.pos.y - size.y + enemy.species.foot_offset(),
            size.x,
            size.y,
        ),
    }
}
