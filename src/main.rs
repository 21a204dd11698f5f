//! Rush Hour entry point
//!
//! Loads settings, opens the window and runs the game loop.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use macroquad::input::prevent_quit;
use macroquad::prelude::Conf;
use macroquad::window::next_frame;

use rush_hour::Settings;
use rush_hour::platform::{self, FpsCounter, FrameClock};
use rush_hour::renderer::{Hud, Renderer, Sprites};
use rush_hour::sim::{GameState, tick};

const WINDOW_TITLE: &str = "PSCP Rush Hour";

/// Window settings are known before the window opens, so the loop is started
/// through `Window::from_config` rather than the attribute macro.
fn window_conf(settings: &Settings) -> Conf {
    Conf {
        window_title: WINDOW_TITLE.to_string(),
        window_width: settings.window_width as i32,
        window_height: settings.window_height as i32,
        window_resizable: false,
        icon: None,
        ..Default::default()
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

async fn run(settings: Settings) {
    // Window close becomes a quit intent instead of an abrupt exit
    prevent_quit();

    let seed = settings.seed.unwrap_or_else(time_seed);
    log::info!("Game initialized with seed: {}", seed);
    let mut state = GameState::with_options(seed, settings.arena(), settings.pickup_respawn);

    let sprites = Sprites::load(&settings.asset_dir).await;
    let renderer = Renderer::new(sprites, settings.show_hitboxes);

    let mut clock = FrameClock::new();
    let mut fps = FpsCounter::default();
    let launched = Instant::now();

    log::info!("Rush Hour running!");
    loop {
        let dt = clock.wait_for_next_frame(settings.target_fps);
        let input = platform::poll_input();
        tick(&mut state, &input, dt);
        if !state.session.running {
            break;
        }

        fps.record(launched.elapsed().as_secs_f64());
        let hud = Hud {
            fps: settings.show_fps.then(|| fps.fps()),
        };
        renderer.draw(&state, &hud);

        next_frame().await;
    }

    log::info!(
        "Quit after {} frames, last score {}",
        state.frame,
        state.session.display_score()
    );
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Rush Hour starting...");

    let settings = Settings::load();
    macroquad::Window::from_config(window_conf(&settings), run(settings));
}
