//! Platform abstraction layer
//!
//! Handles the parts of the frame that touch the outside world:
//! - Keyboard state -> `TickInput`
//! - Frame pacing
//! - FPS measurement

use std::time::{Duration, Instant};

use macroquad::input::{KeyCode, is_key_down, is_quit_requested};

use crate::consts::MAX_FRAME_DT;
use crate::sim::TickInput;

/// Keys for each intent; any key in a list triggers it
pub mod keys {
    use macroquad::input::KeyCode;

    pub const JUMP: &[KeyCode] = &[KeyCode::Space, KeyCode::W, KeyCode::Up];
    pub const SLIDE: &[KeyCode] = &[KeyCode::S, KeyCode::Down];
    pub const FIRE: &[KeyCode] = &[KeyCode::F, KeyCode::J, KeyCode::Enter];
    pub const RESET: &[KeyCode] = &[KeyCode::Escape, KeyCode::R];
    pub const QUIT: &[KeyCode] = &[KeyCode::Q];
}

/// Build a frame's intent from a key-state lookup
pub fn input_from(is_down: impl Fn(KeyCode) -> bool, quit_requested: bool) -> TickInput {
    let any = |keys: &[KeyCode]| keys.iter().any(|&k| is_down(k));
    TickInput {
        jump: any(keys::JUMP),
        slide: any(keys::SLIDE),
        fire: any(keys::FIRE),
        reset: any(keys::RESET),
        quit: quit_requested || any(keys::QUIT),
    }
}

/// Sample the keyboard once for this frame
pub fn poll_input() -> TickInput {
    input_from(is_key_down, is_quit_requested())
}

/// Frame limiter: sleeps off whatever is left of the frame budget
#[derive(Debug)]
pub struct FrameClock {
    last: Instant,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    /// Block until at least `1 / target_fps` has passed since the previous
    /// call, then return the elapsed seconds (capped at `MAX_FRAME_DT`).
    pub fn wait_for_next_frame(&mut self, target_fps: u32) -> f32 {
        if let Some(rest) = remaining_budget(self.last.elapsed(), target_fps) {
            std::thread::sleep(rest);
        }

        let now = Instant::now();
        let elapsed = now.duration_since(self.last);
        self.last = now;
        capped_dt(elapsed)
    }
}

/// Time one frame may take at `target_fps` (zero is treated as 1)
pub fn frame_budget(target_fps: u32) -> Duration {
    Duration::from_secs_f64(1.0 / f64::from(target_fps.max(1)))
}

/// Sleep still owed after `spent` of the frame has gone by
pub fn remaining_budget(spent: Duration, target_fps: u32) -> Option<Duration> {
    frame_budget(target_fps)
        .checked_sub(spent)
        .filter(|rest| !rest.is_zero())
}

/// Simulation step for a frame that took `elapsed`
pub fn capped_dt(elapsed: Duration) -> f32 {
    elapsed.as_secs_f32().min(MAX_FRAME_DT)
}

/// Rolling frames-per-second over the last 60 frames
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frame_times: [f64; 60],
    frame_index: usize,
    fps: u32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self {
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }
    }
}

impl FpsCounter {
    /// Record a frame presented at `time` seconds
    pub fn record(&mut self, time: f64) {
        self.frame_times[self.frame_index] = time;
        self.frame_index = (self.frame_index + 1) % self.frame_times.len();

        // Oldest sample is the one we will overwrite next
        let oldest_time = self.frame_times[self.frame_index];
        if oldest_time > 0.0 {
            let elapsed = time - oldest_time;
            if elapsed > 0.0 {
                self.fps = ((self.frame_times.len() - 1) as f64 / elapsed).round() as u32;
            }
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}
