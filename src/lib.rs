//! Rush Hour - a side-scrolling endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, recycling, collisions, session state)
//! - `renderer`: macroquad drawing with flat-colour fallback for missing art
//! - `platform`: Keyboard polling and frame pacing
//! - `settings`: JSON configuration

pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;
pub use sim::PickupRespawn;

/// Game configuration constants
pub mod consts {
    /// Default viewport
    pub const VIEWPORT_WIDTH: f32 = 1400.0;
    pub const VIEWPORT_HEIGHT: f32 = 800.0;
    /// Frame limiter target
    pub const TARGET_FPS: u32 = 120;
    /// Longest step the simulation will take (stalls, window drags)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Terrain band below the ground line
    pub const TERRAIN_HEIGHT: f32 = 225.0;
    /// Roof band; hanging obstacles hang from its bottom edge
    pub const ROOF_HEIGHT: f32 = 200.0;
    /// Background and obstacle scroll speed (pixels/s)
    pub const SCROLL_SPEED: f32 = 600.0;

    /// Player
    pub const PLAYER_START_X: f32 = 100.0;
    pub const PLAYER_WIDTH: f32 = 100.0;
    pub const PLAYER_HEIGHT: f32 = 100.0;
    pub const PLAYER_SLIDE_HEIGHT: f32 = 50.0;
    /// Downward acceleration (pixels/s²)
    pub const GRAVITY: f32 = 2500.0;
    pub const JUMP_IMPULSE: f32 = -1000.0;
    /// Upward kick when the player is hit
    pub const DEATH_BOUNCE: f32 = -1000.0;

    /// Obstacles
    pub const OBSTACLE_COUNT: usize = 5;
    pub const OBSTACLE_FIRST_X: f32 = 1100.0;
    pub const OBSTACLE_MIN_GAP: f32 = 400.0;
    pub const OBSTACLE_MAX_GAP: f32 = 700.0;

    /// Bullets
    pub const BULLET_WIDTH: f32 = 24.0;
    pub const BULLET_HEIGHT: f32 = 8.0;
    pub const BULLET_SPEED: f32 = 1200.0;
    /// Distance past the right edge before a bullet is dropped
    pub const BULLET_MARGIN: f32 = 50.0;
    /// Seconds between shots
    pub const FIRE_INTERVAL: f32 = 0.3;
    pub const BULLET_BONUS: f32 = 100.0;

    /// Gun pickup
    pub const PICKUP_COUNT: usize = 1;
    pub const PICKUP_SIZE: f32 = 50.0;
    /// Gap between the ground line and the pickup's bottom edge
    pub const PICKUP_HOVER: f32 = 150.0;
    pub const PICKUP_MIN_GAP: f32 = 1500.0;
    pub const PICKUP_MAX_GAP: f32 = 3000.0;

    /// Score gained per second of survival
    pub const SCORE_RATE: f32 = 100.0;
}
