//! Per-frame simulation step
//!
//! Order matters: the player moves before anything is tested against its
//! rectangle, and bullets are tested after obstacles have moved.

use rand::Rng;

use super::collision::{player_hits_obstacle, player_touches_pickup, resolve_bullet_hits};
use super::state::{GameState, ObstacleKind, PickupRespawn};
use crate::consts::*;

/// Intent sampled once per frame (held keys, not edges)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub jump: bool,
    /// Held to stay low
    pub slide: bool,
    pub fire: bool,
    /// Only honoured after game over
    pub reset: bool,
    pub quit: bool,
}

/// Advance the game state by one frame of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.quit {
        state.session.running = false;
        return;
    }

    state.frame += 1;

    if state.session.is_live() {
        state.session.score += dt * SCORE_RATE;
    }

    if state.session.over && input.reset {
        log::info!("Reset after game over (score {})", state.session.display_score());
        state.reset();
    }

    // Player
    let ground_y = state.arena.ground_y;
    if let Some(bullet) = state.player.handle_input(input, &mut state.session, ground_y) {
        state.bullets.push(bullet);
    }
    state.player.apply_physics(dt, ground_y, state.arena.height);

    // Background
    if state.session.is_live() {
        state.terrain.advance(dt);
        state.roof.advance(dt);
    }

    update_obstacles(state, dt);
    update_pickups(state, dt);
    update_bullets(state, dt);

    state.bullets.retain(|b| b.active);
}

/// Scroll, recycle, and test every obstacle slot against the player
fn update_obstacles(state: &mut GameState, dt: f32) {
    for index in 0..state.obstacles.len() {
        state.obstacles[index].advance(dt, &state.session);

        let obstacle = &state.obstacles[index];
        let destroyed = !obstacle.active && state.session.is_live();
        if obstacle.is_off_screen() || destroyed {
            recycle_obstacle(state, index);
        }

        if !state.session.over && player_hits_obstacle(&state.player.rect, &state.obstacles[index])
        {
            state.session.over = true;
            state.player.collided = true;
            log::info!(
                "Game over: hit {} obstacle, score {}",
                state.obstacles[index].kind.as_str(),
                state.session.display_score()
            );
        }
    }
}

/// Respawn obstacle `index` past the rightmost obstacle with a new kind
pub fn recycle_obstacle(state: &mut GameState, index: usize) {
    let kind = ObstacleKind::random(&mut state.rng);
    let base = state.arena.width.max(state.max_obstacle_right(Some(index)));
    let left = base + state.rng.random_range(OBSTACLE_MIN_GAP..=OBSTACLE_MAX_GAP);
    let arena = state.arena;
    state.obstacles[index].place(kind, left, &arena);
    log::debug!("Recycled obstacle {} as {} at x={:.0}", index, kind.as_str(), left);
}

/// Scroll and recycle pickups; hand the gun over on contact
fn update_pickups(state: &mut GameState, dt: f32) {
    for index in 0..state.pickups.len() {
        state.pickups[index].advance(dt, &state.session);

        let pickup = &state.pickups[index];
        let respawn = !pickup.active
            && state.pickup_respawn == PickupRespawn::Recycle
            && state.session.is_live();
        if (pickup.active && pickup.is_off_screen()) || respawn {
            let left = state.pickup_spawn_x();
            let arena = state.arena;
            state.pickups[index].place(left, &arena);
        }

        if !state.session.over && player_touches_pickup(&state.player.rect, &state.pickups[index]) {
            state.pickups[index].active = false;
            state.player.has_gun = true;
            log::debug!("Gun collected");
        }
    }
}

/// Fly bullets and trade them for obstacles. Frozen after game over.
fn update_bullets(state: &mut GameState, dt: f32) {
    if state.session.over {
        return;
    }

    let arena = state.arena;
    for bullet in &mut state.bullets {
        bullet.advance(dt, &arena);
    }

    let hits = resolve_bullet_hits(&mut state.bullets, &mut state.obstacles);
    state.session.add_bonus(hits as f32 * BULLET_BONUS);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rect::Rect;
    use crate::sim::state::{Bullet, GunPickup, Motion};
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn jump() -> TickInput {
        TickInput {
            jump: true,
            ..Default::default()
        }
    }

    /// A started run with the obstacle pool moved far out of the way
    fn started_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.session.started = true;
        let arena = state.arena;
        for (i, obstacle) in state.obstacles.iter_mut().enumerate() {
            obstacle.place(ObstacleKind::Small, 10_000.0 + i as f32 * 1000.0, &arena);
        }
        for pickup in &mut state.pickups {
            pickup.place(50_000.0, &arena);
        }
        state
    }

    /// Park the player where nothing can reach it
    fn sideline(state: &mut GameState) {
        state.player.rect.pos = glam::Vec2::new(-100_000.0, -100_000.0);
        state.player.motion = Motion::Falling;
    }

    #[test]
    fn test_nothing_moves_before_first_jump() {
        let mut state = GameState::new(1);
        let before: Vec<f32> = state.obstacles.iter().map(|o| o.rect.left()).collect();
        for _ in 0..60 {
            tick(&mut state, &TickInput::default(), DT);
        }
        let after: Vec<f32> = state.obstacles.iter().map(|o| o.rect.left()).collect();
        assert_eq!(before, after);
        assert_eq!(state.session.score, 0.0);
        assert!(!state.session.started);
    }

    #[test]
    fn test_jump_starts_run_and_score() {
        let mut state = GameState::new(1);
        tick(&mut state, &jump(), DT);
        assert!(state.session.started);
        // Score accrues from the frame after the first jump
        assert_eq!(state.session.score, 0.0);
        tick(&mut state, &TickInput::default(), DT);
        assert!((state.session.score - DT * SCORE_RATE).abs() < 1e-4);
    }

    #[test]
    fn test_quit_stops_running() {
        let mut state = GameState::new(1);
        let quit = TickInput {
            quit: true,
            ..Default::default()
        };
        tick(&mut state, &quit, DT);
        assert!(!state.session.running);
    }

    #[test]
    fn test_obstacle_recycles_past_left_edge() {
        let mut state = started_state(3);
        let arena = state.arena;
        state.obstacles[0].place(ObstacleKind::Small, 50.0, &arena);
        sideline(&mut state);

        // 600 px/s at 60 Hz: the 130 px right edge needs at least 13 frames
        let mut frames = 0;
        loop {
            let others_max = state.max_obstacle_right(Some(0));
            let before = state.obstacles[0].rect.left();
            tick(&mut state, &TickInput::default(), DT);
            frames += 1;
            let o = &state.obstacles[0];
            if o.rect.left() > before {
                assert!(frames >= 13);
                assert!(o.rect.left() > arena.width.max(others_max));
                assert!(o.active);
                if o.hanging() {
                    assert_eq!(o.rect.top(), arena.ceiling_y);
                } else {
                    assert_eq!(o.rect.bottom(), arena.ground_y);
                }
                break;
            }
            assert!(frames < 30, "obstacle never recycled");
        }
    }

    #[test]
    fn test_collision_ends_game() {
        let mut state = started_state(5);
        let arena = state.arena;
        state.obstacles[0].place(ObstacleKind::Tall, state.player.rect.right() + 5.0, &arena);

        let mut frames = 0;
        while !state.session.over {
            tick(&mut state, &TickInput::default(), DT);
            frames += 1;
            assert!(frames < 10, "no collision");
        }
        assert!(state.player.collided);

        let frozen_score = state.session.score;
        let frozen_x = state.obstacles[0].rect.left();
        tick(&mut state, &TickInput::default(), DT);
        assert!(state.player.is_falling());
        for _ in 0..120 {
            tick(&mut state, &jump(), DT);
        }
        assert!(state.session.over);
        assert_eq!(state.session.score, frozen_score);
        assert_eq!(state.obstacles[0].rect.left(), frozen_x);
    }

    #[test]
    fn test_slide_under_arch() {
        let mut state = started_state(5);
        let arena = state.arena;
        state.obstacles[0].place(ObstacleKind::Arch, state.player.rect.right() + 5.0, &arena);
        let slide = TickInput {
            slide: true,
            ..Default::default()
        };
        // 200 px of travel: past the player, not yet off screen
        for _ in 0..20 {
            tick(&mut state, &slide, DT);
        }
        assert!(!state.session.over);
        let arch = &state.obstacles[0];
        assert_eq!(arch.kind, ObstacleKind::Arch);
        assert!(arch.rect.right() < state.player.rect.left());
    }

    #[test]
    fn test_reset_only_after_game_over() {
        let mut state = started_state(9);
        let reset = TickInput {
            reset: true,
            ..Default::default()
        };
        tick(&mut state, &reset, DT);
        assert!(state.session.started);

        state.session.over = true;
        state.player.has_gun = true;
        state.bullets.push(Bullet::fired_from(&state.player.rect));
        tick(&mut state, &reset, DT);
        assert!(!state.session.over);
        assert!(!state.session.started);
        assert_eq!(state.session.score, 0.0);
        assert!(!state.player.has_gun);
        assert!(state.bullets.is_empty());
        assert!(state.obstacles.iter().all(|o| o.active));
        assert_eq!(state.obstacles[0].rect.left(), OBSTACLE_FIRST_X);
        assert!(state.pickups.iter().all(|p| p.active));
    }

    #[test]
    fn test_fired_bullet_scores_bonus_same_frame() {
        let mut state = GameState::new(13);
        let arena = state.arena;
        state.player.has_gun = true;
        // Just ahead of the player, clear of its rectangle
        state.obstacles[0].place(ObstacleKind::Small, state.player.rect.right() + 1.0, &arena);
        for (i, obstacle) in state.obstacles.iter_mut().enumerate().skip(1) {
            obstacle.place(ObstacleKind::Small, 10_000.0 + i as f32 * 1000.0, &arena);
        }
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &fire, DT);

        assert!(!state.obstacles[0].active);
        assert!(state.bullets.is_empty());
        assert_eq!(state.session.score, BULLET_BONUS);
        assert!(!state.session.over);
    }

    #[test]
    fn test_bullet_cannot_skip_obstacle_on_long_frame() {
        let mut state = started_state(31);
        let arena = state.arena;
        sideline(&mut state);
        state.obstacles[0].place(ObstacleKind::Tall, 700.0, &arena);
        // Right edge at 694, level with the obstacle's middle
        state.bullets.push(Bullet::fired_from(&Rect::new(570.0, 475.0, 100.0, 100.0)));
        let score_before = state.session.score;

        tick(&mut state, &TickInput::default(), MAX_FRAME_DT);

        assert!(!state.obstacles[0].active);
        assert!(state.bullets.is_empty());
        let expected = score_before + MAX_FRAME_DT * SCORE_RATE + BULLET_BONUS;
        assert!((state.session.score - expected).abs() < 1e-3);
    }

    #[test]
    fn test_destroyed_obstacle_returns_ahead() {
        let mut state = started_state(17);
        let arena = state.arena;
        state.obstacles[0].place(ObstacleKind::Tall, 700.0, &arena);
        state.obstacles[0].active = false;
        let others_max = state.max_obstacle_right(Some(0));

        tick(&mut state, &TickInput::default(), DT);
        let o = &state.obstacles[0];
        assert!(o.active);
        assert!(o.rect.left() > arena.width.max(others_max));
    }

    #[test]
    fn test_pickup_grants_gun_one_shot() {
        let mut state = started_state(19);
        let arena = state.arena;
        state.pickups[0] = GunPickup::new(state.player.rect.left(), &arena);
        // Mid-jump at pickup height
        state.player.rect.pos.y = state.pickups[0].rect.top();
        state.player.motion = Motion::Airborne;

        tick(&mut state, &TickInput::default(), DT);
        assert!(state.player.has_gun);
        assert!(!state.pickups[0].active);

        let x = state.pickups[0].rect.left();
        for _ in 0..120 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert!(!state.pickups[0].active);
        assert_eq!(state.pickups[0].rect.left(), x);
    }

    #[test]
    fn test_pickup_recycle_mode_respawns() {
        let mut state = started_state(23);
        state.pickup_respawn = PickupRespawn::Recycle;
        state.pickups[0].active = false;
        tick(&mut state, &TickInput::default(), DT);
        let pickup = &state.pickups[0];
        assert!(pickup.active);
        assert!(pickup.rect.left() > state.arena.width.max(state.max_obstacle_right(None)));
    }

    #[test]
    fn test_uncollected_pickup_recycles() {
        let mut state = started_state(29);
        let arena = state.arena;
        state.pickups[0].place(-PICKUP_SIZE - 1.0, &arena);
        tick(&mut state, &TickInput::default(), DT);
        assert!(state.pickups[0].active);
        assert!(state.pickups[0].rect.left() >= arena.width + PICKUP_MIN_GAP);
    }

    #[test]
    fn test_background_frozen_until_started() {
        let mut state = GameState::new(37);
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.terrain.rect.left(), 0.0);
        tick(&mut state, &jump(), DT);
        tick(&mut state, &TickInput::default(), DT);
        assert!(state.terrain.rect.left() < 0.0);
        assert_eq!(state.terrain.rect.left(), state.roof.rect.left());
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new(99);
        let mut b = GameState::new(99);
        let inputs = [jump(), TickInput::default(), TickInput::default()];
        for _ in 0..200 {
            for input in &inputs {
                tick(&mut a, input, DT);
                tick(&mut b, input, DT);
            }
        }
        assert_eq!(a.session, b.session);
        for (x, y) in a.obstacles.iter().zip(&b.obstacles) {
            assert_eq!(x.rect, y.rect);
            assert_eq!(x.kind, y.kind);
        }
    }

    fn arb_input() -> impl Strategy<Value = TickInput> {
        (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
            |(jump, slide, fire, reset)| TickInput {
                jump,
                slide,
                fire,
                reset,
                quit: false,
            },
        )
    }

    proptest! {
        #[test]
        fn prop_slide_height_invariant(
            seed in any::<u64>(),
            inputs in prop::collection::vec(arb_input(), 1..300),
        ) {
            let mut state = GameState::new(seed);
            state.player.has_gun = true;
            for input in &inputs {
                tick(&mut state, input, DT);
                let player = &state.player;
                let h = player.rect.height();
                prop_assert!(h == PLAYER_HEIGHT || h == PLAYER_SLIDE_HEIGHT);
                if player.on_ground() {
                    prop_assert_eq!(player.rect.bottom(), state.arena.ground_y);
                }
                if player.sliding {
                    prop_assert!(player.on_ground());
                }
            }
        }

        #[test]
        fn prop_score_monotonic_and_over_is_one_way(
            seed in any::<u64>(),
            inputs in prop::collection::vec(arb_input(), 1..300),
        ) {
            let mut state = GameState::new(seed);
            state.player.has_gun = true;
            let mut last = state.session.clone();
            for input in &inputs {
                tick(&mut state, input, DT);
                let now = state.session.clone();
                if !(last.over && input.reset) {
                    prop_assert!(now.score >= last.score);
                    if last.over {
                        prop_assert!(now.over);
                        prop_assert_eq!(now.score, last.score);
                    }
                }
                last = now;
            }
        }

        #[test]
        fn prop_recycled_obstacles_spawn_ahead(seed in any::<u64>()) {
            let mut state = GameState::new(seed);
            state.session.started = true;
            sideline(&mut state);
            let arena = state.arena;
            for _ in 0..600 {
                let before: Vec<f32> = state.obstacles.iter().map(|o| o.rect.left()).collect();
                tick(&mut state, &TickInput::default(), DT);
                for (o, left_before) in state.obstacles.iter().zip(&before) {
                    if o.rect.left() > *left_before {
                        prop_assert!(o.rect.left() > arena.width);
                        if o.hanging() {
                            prop_assert_eq!(o.rect.top(), arena.ceiling_y);
                        } else {
                            prop_assert_eq!(o.rect.bottom(), arena.ground_y);
                        }
                    }
                }
                // Slots never overlap each other
                let mut spans: Vec<(f32, f32)> =
                    state.obstacles.iter().map(|o| (o.rect.left(), o.rect.right())).collect();
                spans.sort_by(|a, b| a.0.total_cmp(&b.0));
                for pair in spans.windows(2) {
                    prop_assert!(pair[0].1 < pair[1].0);
                }
            }
        }

        #[test]
        fn prop_bullets_leave_only_by_margin_or_hit(
            seed in any::<u64>(),
            frames in 1usize..240,
        ) {
            let mut state = GameState::new(seed);
            state.session.started = true;
            state.player.has_gun = true;
            let arena = state.arena;
            let fire = TickInput { fire: true, ..Default::default() };
            for _ in 0..frames {
                let fired = usize::from(state.player.can_fire() && !state.session.over);
                let exits = state
                    .bullets
                    .iter()
                    .filter(|b| b.rect.left() + b.speed * DT > arena.width + BULLET_MARGIN)
                    .count();
                let count_before = state.bullets.len();
                let accrual = if state.session.is_live() { DT * SCORE_RATE } else { 0.0 };
                let score_before = state.session.score;

                tick(&mut state, &fire, DT);

                prop_assert!(state.bullets.iter().all(|b| b.active));
                // Bullets freeze on the frame the run ends
                if state.session.over {
                    break;
                }
                let removed = count_before + fired - state.bullets.len();
                let hits = removed - exits;
                let expected = score_before + accrual + hits as f32 * BULLET_BONUS;
                prop_assert!((state.session.score - expected).abs() < 1e-2);
            }
        }
    }
}
