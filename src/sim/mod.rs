//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied frame time only
//! - Seeded RNG only
//! - Fixed update order within a frame
//! - No rendering or platform dependencies

pub mod collision;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{first_obstacle_hit, player_hits_obstacle, player_touches_pickup, resolve_bullet_hits};
pub use rect::Rect;
pub use state::{
    Arena, Bullet, GameState, GunPickup, Motion, Obstacle, ObstacleKind, PickupRespawn, Player,
    Session, Strip,
};
pub use tick::{TickInput, recycle_obstacle, tick};
