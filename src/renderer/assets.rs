//! Sprite loading with flat-colour fallback
//!
//! A missing or unreadable image never stops the game: the entity is drawn
//! as a solid rectangle of the same footprint instead.

use std::path::{Path, PathBuf};

use macroquad::color::{self, Color};
use macroquad::math::vec2;
use macroquad::texture::{DrawTextureParams, FilterMode, Texture2D, draw_texture_ex, load_texture};
use macroquad::shapes::draw_rectangle;

use crate::sim::{ObstacleKind, Rect};

/// Something that can always be drawn into a rectangle
#[derive(Debug, Clone)]
pub enum Sprite {
    /// Image, scaled to the destination rectangle at draw time
    Texture(Texture2D),
    /// Flat colour stand-in for an image that failed to load
    Placeholder(Color),
}

impl Sprite {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Sprite::Placeholder(_))
    }

    /// Draw stretched over `rect`
    pub fn draw(&self, rect: &Rect) {
        self.draw_at(rect.left(), rect.top(), rect.width(), rect.height());
    }

    pub fn draw_at(&self, x: f32, y: f32, w: f32, h: f32) {
        match self {
            Sprite::Texture(texture) => draw_texture_ex(
                texture,
                x,
                y,
                color::WHITE,
                DrawTextureParams {
                    dest_size: Some(vec2(w, h)),
                    ..Default::default()
                },
            ),
            Sprite::Placeholder(fill) => draw_rectangle(x, y, w, h, *fill),
        }
    }
}

/// Load an image, or hand back a `fallback`-coloured placeholder
pub async fn load_sprite_or_placeholder(path: &Path, fallback: Color) -> Sprite {
    match load_texture(&path.to_string_lossy()).await {
        Ok(texture) => {
            texture.set_filter(FilterMode::Linear);
            log::debug!("Loaded {}", path.display());
            Sprite::Texture(texture)
        }
        Err(e) => {
            log::warn!("Using placeholder for {}: {:?}", path.display(), e);
            Sprite::Placeholder(fallback)
        }
    }
}

/// Image file for an obstacle kind
pub fn obstacle_file(kind: ObstacleKind) -> String {
    format!("obstacle_{}.png", kind.as_str())
}

/// Placeholder colour for an obstacle kind
pub fn obstacle_color(kind: ObstacleKind) -> Color {
    match kind {
        ObstacleKind::Tall => color::RED,
        ObstacleKind::Arch => color::ORANGE,
        ObstacleKind::Hanging => color::PURPLE,
        ObstacleKind::Wide => color::MAROON,
        ObstacleKind::Small => color::PINK,
    }
}

/// Every sprite the renderer needs
#[derive(Debug, Clone)]
pub struct Sprites {
    pub player: Sprite,
    pub terrain: Sprite,
    pub roof: Sprite,
    /// Indexed by `ObstacleKind::index`
    pub obstacles: [Sprite; ObstacleKind::ALL.len()],
    pub gun: Sprite,
    pub bullet: Sprite,
}

impl Sprites {
    /// Load everything from `dir`. Never fails; see `load_sprite_or_placeholder`.
    pub async fn load(dir: &Path) -> Self {
        let path = |name: &str| -> PathBuf { dir.join(name) };

        let mut obstacles = ObstacleKind::ALL.map(|kind| Sprite::Placeholder(obstacle_color(kind)));
        for kind in ObstacleKind::ALL {
            obstacles[kind.index()] =
                load_sprite_or_placeholder(&path(&obstacle_file(kind)), obstacle_color(kind)).await;
        }

        let sprites = Self {
            player: load_sprite_or_placeholder(&path("player.png"), color::BLUE).await,
            terrain: load_sprite_or_placeholder(&path("terrain.png"), color::BROWN).await,
            roof: load_sprite_or_placeholder(&path("roof.png"), color::DARKGRAY).await,
            obstacles,
            gun: load_sprite_or_placeholder(&path("gun.png"), color::GOLD).await,
            bullet: load_sprite_or_placeholder(&path("bullet.png"), color::BLACK).await,
        };

        let missing = sprites.placeholder_count();
        if missing > 0 {
            log::info!("{} sprite(s) drawn as flat rectangles", missing);
        }
        sprites
    }

    pub fn obstacle(&self, kind: ObstacleKind) -> &Sprite {
        &self.obstacles[kind.index()]
    }

    pub fn placeholder_count(&self) -> usize {
        [&self.player, &self.terrain, &self.roof, &self.gun, &self.bullet]
            .into_iter()
            .chain(&self.obstacles)
            .filter(|s| s.is_placeholder())
            .count()
    }
}
