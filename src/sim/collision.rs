//! Collision detection between the runner, obstacles, pickups and bullets
//!
//! Everything is an axis-aligned rectangle; the only shape rule is the
//! obstacle hitbox (see `Obstacle::hitbox`).

use super::rect::Rect;
use super::state::{Bullet, GunPickup, Obstacle};

/// Would `player` be knocked out by `obstacle` this frame?
///
/// Destroyed obstacles and ones already past the left edge never hit.
pub fn player_hits_obstacle(player: &Rect, obstacle: &Obstacle) -> bool {
    obstacle.active && obstacle.rect.right() > 0.0 && player.overlaps(&obstacle.hitbox())
}

/// Can `player` collect `pickup` this frame?
pub fn player_touches_pickup(player: &Rect, pickup: &GunPickup) -> bool {
    pickup.active && player.overlaps(&pickup.rect)
}

/// Index of the active obstacle `rect` reaches first, moving rightward.
///
/// Obstacles are tested over the ground they covered this step, so a fast
/// rect cannot slip between two end-of-step positions.
pub fn first_obstacle_hit(rect: &Rect, obstacles: &[Obstacle]) -> Option<usize> {
    obstacles
        .iter()
        .enumerate()
        .filter(|(_, o)| o.active)
        .map(|(i, o)| (i, o.swept_hitbox()))
        .filter(|(_, hitbox)| rect.overlaps(hitbox))
        .min_by(|a, b| a.1.left().total_cmp(&b.1.left()))
        .map(|(i, _)| i)
}

/// Resolve every active bullet against the obstacle pool.
///
/// Each bullet is tested along its whole last step and stops at the first
/// obstacle in its path; bullet and obstacle are both deactivated. Returns
/// the number of obstacles destroyed.
pub fn resolve_bullet_hits(bullets: &mut [Bullet], obstacles: &mut [Obstacle]) -> u32 {
    let mut hits = 0;
    for bullet in bullets.iter_mut().filter(|b| b.active) {
        if let Some(index) = first_obstacle_hit(&bullet.swept(), obstacles) {
            bullet.active = false;
            obstacles[index].active = false;
            hits += 1;
            log::debug!(
                "Bullet destroyed {} obstacle at x={:.0}",
                obstacles[index].kind.as_str(),
                obstacles[index].rect.left()
            );
        }
    }
    hits
}
