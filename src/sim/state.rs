//! Game state and core simulation types
//!
//! Every entity is allocated once and recycled in place: obstacles and
//! pickups live in fixed pools, "destroying" one clears its `active` flag.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::tick::TickInput;
use crate::consts::*;

/// Fixed layout of the play field, derived from the viewport size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    /// Top of the terrain; grounded things stand on this line
    pub ground_y: f32,
    /// Bottom of the roof; hanging obstacles hang from this line
    pub ceiling_y: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ground_y: height - TERRAIN_HEIGHT,
            ceiling_y: ROOF_HEIGHT,
        }
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT)
    }
}

/// Session flags and score for one run
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Cleared by the quit intent; the loop exits afterwards
    pub running: bool,
    /// Set by the player's first jump
    pub started: bool,
    /// One-way until `GameState::reset`
    pub over: bool,
    pub score: f32,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            running: true,
            started: false,
            over: false,
            score: 0.0,
        }
    }
}

impl Session {
    /// True while the world scrolls and the score counts
    #[inline]
    pub fn is_live(&self) -> bool {
        self.started && !self.over
    }

    /// Credit a bonus; ignored once the run is over
    pub fn add_bonus(&mut self, points: f32) {
        if !self.over {
            self.score += points;
        }
    }

    /// Score as shown on the HUD
    pub fn display_score(&self) -> u32 {
        self.score as u32
    }
}

/// Vertical motion of the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// Standing (or sliding) on the ground line
    Grounded,
    /// In a jump
    Airborne,
    /// Knocked out; ignores the ground and drops off screen
    Falling,
}

/// The runner
#[derive(Debug, Clone)]
pub struct Player {
    pub rect: Rect,
    /// Mid-bottom spawn point
    pub start: Vec2,
    /// Vertical velocity (pixels/s, negative is up)
    pub velocity: f32,
    pub motion: Motion,
    pub sliding: bool,
    /// Set by the orchestrator on a fatal hit, consumed by `apply_physics`
    pub collided: bool,
    pub has_gun: bool,
    /// Seconds until the next shot is allowed
    pub fire_cooldown: f32,
}

impl Player {
    pub fn new(start: Vec2) -> Self {
        Self {
            rect: Rect::from_midbottom(start, Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT)),
            start,
            velocity: 0.0,
            motion: Motion::Grounded,
            sliding: false,
            collided: false,
            has_gun: false,
            fire_cooldown: 0.0,
        }
    }

    #[inline]
    pub fn on_ground(&self) -> bool {
        self.motion == Motion::Grounded
    }

    #[inline]
    pub fn is_falling(&self) -> bool {
        self.motion == Motion::Falling
    }

    pub fn can_fire(&self) -> bool {
        self.has_gun && self.fire_cooldown <= 0.0
    }

    /// Apply one frame of intent. Returns a bullet when a shot is fired.
    pub fn handle_input(
        &mut self,
        input: &TickInput,
        session: &mut Session,
        ground_y: f32,
    ) -> Option<Bullet> {
        if session.over {
            return None;
        }

        if input.jump && self.on_ground() && !self.sliding {
            self.velocity = JUMP_IMPULSE;
            self.motion = Motion::Airborne;
            session.started = true;
        }

        if input.slide {
            if !self.sliding && self.on_ground() {
                self.sliding = true;
                self.rect.size.y = PLAYER_SLIDE_HEIGHT;
                self.rect.set_bottom(ground_y);
            }
        } else if self.sliding {
            self.sliding = false;
            self.rect.size.y = PLAYER_HEIGHT;
            self.rect.set_bottom(ground_y);
        }

        if input.fire && self.can_fire() {
            self.fire_cooldown = FIRE_INTERVAL;
            return Some(Bullet::fired_from(&self.rect));
        }

        None
    }

    /// Integrate gravity, land, and play the knock-out bounce
    pub fn apply_physics(&mut self, dt: f32, ground_y: f32, viewport_height: f32) {
        // Constant acceleration over the step, exact for any dt
        self.rect.pos.y += self.velocity * dt + 0.5 * GRAVITY * dt * dt;
        self.velocity += GRAVITY * dt;

        if !self.is_falling() && self.rect.bottom() >= ground_y {
            self.rect.set_bottom(ground_y);
            self.velocity = 0.0;
            self.motion = Motion::Grounded;
        }

        if self.collided {
            self.velocity = DEATH_BOUNCE;
            self.collided = false;
            if self.sliding {
                self.sliding = false;
                self.rect.set_height_keep_bottom(PLAYER_HEIGHT);
            }
            self.motion = Motion::Falling;
        }

        // Off the bottom of the screen: stop accelerating
        if self.rect.top() > viewport_height {
            self.velocity = 0.0;
        }

        self.fire_cooldown = (self.fire_cooldown - dt).max(0.0);
    }

    /// Back to the spawn point with nothing collected
    pub fn reset(&mut self) {
        *self = Self::new(self.start);
    }
}

/// Obstacle variants. Size, anchoring and hitbox shape all follow from the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObstacleKind {
    Tall,
    /// Only the top half is solid; slide under it
    Arch,
    /// Hangs from the roof
    Hanging,
    Wide,
    Small,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 5] = [
        ObstacleKind::Tall,
        ObstacleKind::Arch,
        ObstacleKind::Hanging,
        ObstacleKind::Wide,
        ObstacleKind::Small,
    ];

    /// Position in `ALL`
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Uniform draw over all kinds
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    pub fn size(self) -> Vec2 {
        match self {
            ObstacleKind::Tall | ObstacleKind::Arch | ObstacleKind::Hanging => {
                Vec2::new(70.0, 120.0)
            }
            ObstacleKind::Wide => Vec2::new(120.0, 70.0),
            ObstacleKind::Small => Vec2::new(80.0, 80.0),
        }
    }

    pub fn hanging(self) -> bool {
        matches!(self, ObstacleKind::Hanging)
    }

    pub fn reduced_hitbox(self) -> bool {
        matches!(self, ObstacleKind::Arch)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ObstacleKind::Tall => "tall",
            ObstacleKind::Arch => "arch",
            ObstacleKind::Hanging => "hanging",
            ObstacleKind::Wide => "wide",
            ObstacleKind::Small => "small",
        }
    }
}

/// A scrolling obstacle slot
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub rect: Rect,
    /// False once shot; the slot is recycled on the next obstacle pass
    pub active: bool,
    pub speed: f32,
    /// Distance scrolled on the last `advance`
    pub step: f32,
}

impl Obstacle {
    pub fn new(kind: ObstacleKind, left: f32, arena: &Arena) -> Self {
        let mut obstacle = Self {
            kind,
            rect: Rect::default(),
            active: true,
            speed: SCROLL_SPEED,
            step: 0.0,
        };
        obstacle.place(kind, left, arena);
        obstacle
    }

    #[inline]
    pub fn hanging(&self) -> bool {
        self.kind.hanging()
    }

    #[inline]
    pub fn reduced_hitbox(&self) -> bool {
        self.kind.reduced_hitbox()
    }

    /// Re-dress the slot as `kind` with its left edge at `left`
    pub fn place(&mut self, kind: ObstacleKind, left: f32, arena: &Arena) {
        self.kind = kind;
        self.rect.size = kind.size();
        self.rect.pos.x = left;
        if kind.hanging() {
            self.rect.pos.y = arena.ceiling_y;
        } else {
            self.rect.set_bottom(arena.ground_y);
        }
        self.active = true;
        self.step = 0.0;
    }

    /// Scroll left; frozen before the first jump and after game over
    pub fn advance(&mut self, dt: f32, session: &Session) {
        self.step = if self.active && session.is_live() {
            self.speed * dt
        } else {
            0.0
        };
        self.rect.pos.x -= self.step;
    }

    /// Fully past the left edge
    #[inline]
    pub fn is_off_screen(&self) -> bool {
        self.rect.right() < 0.0
    }

    /// Collision rectangle
    pub fn hitbox(&self) -> Rect {
        if self.reduced_hitbox() {
            self.rect.top_half()
        } else {
            self.rect
        }
    }

    /// Hitbox stretched back over the ground covered by the last step
    pub fn swept_hitbox(&self) -> Rect {
        let mut hitbox = self.hitbox();
        hitbox.size.x += self.step;
        hitbox
    }
}

/// A player projectile
#[derive(Debug, Clone)]
pub struct Bullet {
    pub rect: Rect,
    pub active: bool,
    pub speed: f32,
    /// Distance flown on the last `advance`
    pub trail: f32,
}

impl Bullet {
    /// Spawn at the shooter's leading edge, vertically centered
    pub fn fired_from(shooter: &Rect) -> Self {
        Self {
            rect: Rect::new(
                shooter.right(),
                shooter.center().y - BULLET_HEIGHT / 2.0,
                BULLET_WIDTH,
                BULLET_HEIGHT,
            ),
            active: true,
            speed: BULLET_SPEED,
            trail: 0.0,
        }
    }

    /// Fly right; drop out past the right margin
    pub fn advance(&mut self, dt: f32, arena: &Arena) {
        if !self.active {
            self.trail = 0.0;
            return;
        }
        self.trail = self.speed * dt;
        self.rect.pos.x += self.trail;
        if self.rect.left() > arena.width + BULLET_MARGIN {
            self.active = false;
        }
    }

    /// Everything the bullet passed through on its last step
    pub fn swept(&self) -> Rect {
        let mut swept = self.rect;
        swept.pos.x -= self.trail;
        swept.size.x += self.trail;
        swept
    }
}

/// What happens to a gun pickup after the player grabs it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupRespawn {
    /// Gone until the next reset
    #[default]
    OneShot,
    /// Reappears further down the track
    Recycle,
}

/// Floating gun power-up
#[derive(Debug, Clone)]
pub struct GunPickup {
    pub rect: Rect,
    pub active: bool,
    pub speed: f32,
}

impl GunPickup {
    pub fn new(left: f32, arena: &Arena) -> Self {
        let mut pickup = Self {
            rect: Rect::new(0.0, 0.0, PICKUP_SIZE, PICKUP_SIZE),
            active: true,
            speed: SCROLL_SPEED,
        };
        pickup.place(left, arena);
        pickup
    }

    pub fn place(&mut self, left: f32, arena: &Arena) {
        self.rect.pos.x = left;
        self.rect.set_bottom(arena.ground_y - PICKUP_HOVER);
        self.active = true;
    }

    pub fn advance(&mut self, dt: f32, session: &Session) {
        if self.active && session.is_live() {
            self.rect.pos.x -= self.speed * dt;
        }
    }

    #[inline]
    pub fn is_off_screen(&self) -> bool {
        self.rect.right() < 0.0
    }
}

/// A looping background band (terrain or roof)
///
/// Two tiles wide, one tile per viewport width. Once the leading tile has
/// scrolled completely off the left edge the strip jumps forward one tile,
/// so the viewport is always covered and the seam never shows.
#[derive(Debug, Clone)]
pub struct Strip {
    pub rect: Rect,
    pub tile_width: f32,
    pub speed: f32,
    origin_x: f32,
}

impl Strip {
    pub const TILES: usize = 2;

    pub fn new(top: f32, height: f32, arena: &Arena) -> Self {
        let tile_width = arena.width;
        Self {
            rect: Rect::new(0.0, top, tile_width * Self::TILES as f32, height),
            tile_width,
            speed: SCROLL_SPEED,
            origin_x: 0.0,
        }
    }

    /// Ground band from the ground line to the bottom of the viewport
    pub fn terrain(arena: &Arena) -> Self {
        Self::new(arena.ground_y, arena.height - arena.ground_y, arena)
    }

    /// Ceiling band from the top of the viewport to the roof line
    pub fn roof(arena: &Arena) -> Self {
        Self::new(0.0, arena.ceiling_y, arena)
    }

    pub fn advance(&mut self, dt: f32) {
        self.rect.pos.x -= self.speed * dt;
        while self.rect.left() + self.tile_width < 0.0 {
            self.rect.pos.x += self.tile_width;
        }
    }

    /// Left edges of each tile, for drawing
    pub fn tile_lefts(&self) -> impl Iterator<Item = f32> + '_ {
        (0..Self::TILES).map(move |i| self.rect.left() + i as f32 * self.tile_width)
    }

    pub fn reset(&mut self) {
        self.rect.pos.x = self.origin_x;
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub rng: Pcg32,
    pub arena: Arena,
    pub session: Session,
    pub player: Player,
    /// Fixed pool, never grows
    pub obstacles: Vec<Obstacle>,
    /// Fixed pool, never grows
    pub pickups: Vec<GunPickup>,
    /// Live bullets; compacted every frame
    pub bullets: Vec<Bullet>,
    pub terrain: Strip,
    pub roof: Strip,
    pub pickup_respawn: PickupRespawn,
    /// Simulation frame counter
    pub frame: u64,
}

impl GameState {
    /// Create a new game state with the given seed and default layout
    pub fn new(seed: u64) -> Self {
        Self::with_options(seed, Arena::default(), PickupRespawn::default())
    }

    pub fn with_options(seed: u64, arena: Arena, pickup_respawn: PickupRespawn) -> Self {
        let mut state = Self {
            rng: Pcg32::seed_from_u64(seed),
            arena,
            session: Session::default(),
            player: Player::new(Vec2::new(PLAYER_START_X, arena.ground_y)),
            obstacles: Vec::with_capacity(OBSTACLE_COUNT),
            pickups: Vec::with_capacity(PICKUP_COUNT),
            bullets: Vec::with_capacity(32),
            terrain: Strip::terrain(&arena),
            roof: Strip::roof(&arena),
            pickup_respawn,
            frame: 0,
        };

        state.lay_out_obstacles();
        state.lay_out_pickups();

        state
    }

    /// Spread the obstacle pool out ahead of the player with random gaps
    fn lay_out_obstacles(&mut self) {
        let mut x = OBSTACLE_FIRST_X;
        self.obstacles.clear();
        for _ in 0..OBSTACLE_COUNT {
            let kind = ObstacleKind::random(&mut self.rng);
            self.obstacles.push(Obstacle::new(kind, x, &self.arena));
            x += self.rng.random_range(OBSTACLE_MIN_GAP..=OBSTACLE_MAX_GAP);
        }
    }

    fn lay_out_pickups(&mut self) {
        self.pickups.clear();
        for _ in 0..PICKUP_COUNT {
            let left = self.pickup_spawn_x();
            self.pickups.push(GunPickup::new(left, &self.arena));
        }
    }

    /// Rightmost obstacle edge, ignoring slot `skip`
    pub fn max_obstacle_right(&self, skip: Option<usize>) -> f32 {
        self.obstacles
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != skip)
            .map(|(_, o)| o.rect.right())
            .fold(f32::NEG_INFINITY, f32::max)
    }

    /// Where a recycled pickup reappears
    pub fn pickup_spawn_x(&mut self) -> f32 {
        let base = self.arena.width.max(self.max_obstacle_right(None));
        base + self.rng.random_range(PICKUP_MIN_GAP..=PICKUP_MAX_GAP)
    }

    /// Start a fresh session. The RNG keeps running so the new layout differs.
    pub fn reset(&mut self) {
        let running = self.session.running;
        self.session = Session {
            running,
            ..Session::default()
        };
        self.player.reset();
        self.bullets.clear();
        self.terrain.reset();
        self.roof.reset();
        self.lay_out_obstacles();
        self.lay_out_pickups();
    }
}
