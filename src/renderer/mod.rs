//! Frame rendering on top of macroquad
//!
//! Reads `GameState`, never mutates it.

pub mod assets;

pub use assets::{Sprite, Sprites, load_sprite_or_placeholder};

use macroquad::color::{self, Color};
use macroquad::shapes::draw_rectangle_lines;
use macroquad::text::{draw_text, measure_text};
use macroquad::window::clear_background;

use crate::sim::{GameState, Rect, Strip};

const HUD_FONT_SIZE: f32 = 60.0;
const HINT_FONT_SIZE: f32 = 36.0;
const HITBOX_COLOR: Color = color::GREEN;

/// HUD score line, zero padded like an arcade cabinet
pub fn score_text(score: u32) -> String {
    format!("Score  : {:05}", score)
}

/// Extra per-frame HUD values that live outside the simulation
#[derive(Debug, Clone, Copy, Default)]
pub struct Hud {
    pub fps: Option<u32>,
}

/// Draws the world, the HUD and the debug overlay
pub struct Renderer {
    sprites: Sprites,
    show_hitboxes: bool,
}

impl Renderer {
    pub fn new(sprites: Sprites, show_hitboxes: bool) -> Self {
        Self {
            sprites,
            show_hitboxes,
        }
    }

    /// Render the current frame
    pub fn draw(&self, state: &GameState, hud: &Hud) {
        clear_background(color::WHITE);

        self.draw_strip(&self.sprites.roof, &state.roof);
        self.draw_strip(&self.sprites.terrain, &state.terrain);

        self.sprites.player.draw(&state.player.rect);

        for obstacle in state.obstacles.iter().filter(|o| o.active && o.rect.right() > 0.0) {
            self.sprites.obstacle(obstacle.kind).draw(&obstacle.rect);
        }
        for pickup in state.pickups.iter().filter(|p| p.active) {
            self.sprites.gun.draw(&pickup.rect);
        }
        for bullet in state.bullets.iter().filter(|b| b.active) {
            self.sprites.bullet.draw(&bullet.rect);
        }

        if self.show_hitboxes {
            self.draw_hitboxes(state);
        }

        self.draw_hud(state, hud);
    }

    fn draw_strip(&self, sprite: &Sprite, strip: &Strip) {
        for left in strip.tile_lefts() {
            sprite.draw_at(left, strip.rect.top(), strip.tile_width, strip.rect.height());
        }
    }

    fn draw_hitboxes(&self, state: &GameState) {
        let outline = |r: Rect| {
            draw_rectangle_lines(r.left(), r.top(), r.width(), r.height(), 2.0, HITBOX_COLOR);
        };
        outline(state.player.rect);
        for obstacle in state.obstacles.iter().filter(|o| o.active) {
            outline(obstacle.hitbox());
        }
        for pickup in state.pickups.iter().filter(|p| p.active) {
            outline(pickup.rect);
        }
    }

    fn draw_hud(&self, state: &GameState, hud: &Hud) {
        let width = state.arena.width;
        let height = state.arena.height;

        let score = score_text(state.session.display_score());
        let score_x = width - 350.0;
        draw_text(&score, score_x, 50.0 + HUD_FONT_SIZE / 2.0, HUD_FONT_SIZE, color::BLACK);

        if state.player.has_gun {
            let label = if state.player.can_fire() { "GUN READY" } else { "GUN" };
            draw_text(label, score_x, 50.0 + HUD_FONT_SIZE * 1.2, HINT_FONT_SIZE, color::BLACK);
        }

        if let Some(fps) = hud.fps {
            draw_text(&format!("FPS {}", fps), 10.0, height - 10.0, 24.0, color::WHITE);
        }

        if state.session.over {
            self.draw_centered("GAME OVER", height / 2.0 - 40.0, HUD_FONT_SIZE, width);
            self.draw_centered("Press ESC to restart", height / 2.0 + 10.0, HINT_FONT_SIZE, width);
        } else if !state.session.started {
            self.draw_centered("Press SPACE to run", height / 2.0, HINT_FONT_SIZE, width);
        }
    }

    fn draw_centered(&self, text: &str, y: f32, font_size: f32, width: f32) {
        let dims = measure_text(text, None, font_size as u16, 1.0);
        draw_text(text, width / 2.0 - dims.width / 2.0, y, font_size, color::BLACK);
    }
}
