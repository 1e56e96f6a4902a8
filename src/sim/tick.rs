//! Per-frame simulation tick
//!
//! Advances a running session by one frame of elapsed time.

use rand::Rng;

use super::autopilot;
use super::state::{BAD_VARIANTS, EndCause, GameEvent, GamePhase, GameState, ObjectKind};

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Move left held
    pub left: bool,
    /// Move right held
    pub right: bool,
    /// Demo mode - the autopilot steers instead of the held keys
    pub autopilot: bool,
}

impl TickInput {
    /// -1, 0 or 1; opposing keys cancel
    pub fn direction(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Advance the session by `dt` seconds
///
/// Does nothing unless the session is running. Negative or non-finite `dt`
/// is treated as zero.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.phase != GamePhase::Running {
        return;
    }

    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    state.clock_ms += f64::from(dt) * 1000.0;

    // Move player
    let steering = if input.autopilot {
        autopilot::steer(state)
    } else {
        input.clone()
    };
    let direction = steering.direction();
    if direction != 0.0 {
        let dx = direction * state.tuning.player_speed * dt;
        let bounds = state.tuning.player_bounds();
        state.player.shift(dx, bounds);
    }

    // Spawn on an interval that shrinks with score
    if state.clock_ms - state.last_spawn_ms > state.spawn_interval_ms() {
        spawn_object(state);
        state.last_spawn_ms = state.clock_ms;
    }

    update_objects(state, dt);
}

/// Create one object above the screen at a random column
pub fn spawn_object(state: &mut GameState) -> u32 {
    let size = state.tuning.object_size;
    let width = state.tuning.screen_width;

    let kind = if state.rng.random::<f32>() < state.tuning.good_chance {
        ObjectKind::Good
    } else {
        ObjectKind::Bad
    };
    let x = state.rng.random::<f32>() * (width - size * 2.0) + size;
    let variant = match kind {
        ObjectKind::Bad => state.rng.random_range(0..BAD_VARIANTS),
        ObjectKind::Good => 0,
    };

    let id = state.push_variant(kind, x, variant);
    log::debug!("Spawned {:?} #{} at x={:.0}", kind, id, x);
    state.events.push(GameEvent::Spawned { id, kind });
    id
}

/// Fall, collide and score, newest object first
///
/// Stops at the first terminal outcome; objects not yet visited keep their
/// positions for the game over screen.
fn update_objects(state: &mut GameState, dt: f32) {
    let gravity = state.tuning.gravity;
    let size = state.tuning.object_size;
    let boundary = state.tuning.bottom_boundary();
    let player_box = state.player.bounds(&state.tuning);

    let mut i = state.objects.len();
    while i > 0 {
        i -= 1;

        let obj = &mut state.objects[i];
        obj.integrate(gravity, dt);
        let hit = obj.bounds(size).overlaps(&player_box);
        let passed = obj.y > boundary;
        let (id, kind) = (obj.id, obj.kind);

        match (kind, hit, passed) {
            (ObjectKind::Bad, true, _) => {
                end_run(state, EndCause::HitBad);
                return;
            }
            (ObjectKind::Good, true, _) => {
                let reward = state.tuning.good_reward;
                state.score += reward;
                state.objects.remove(i);
                state.events.push(GameEvent::Collected { id, reward });
            }
            (ObjectKind::Good, false, true) => {
                end_run(state, EndCause::MissedGood);
                return;
            }
            (ObjectKind::Bad, false, true) => {
                let reward = state.tuning.dodge_reward;
                state.score += reward;
                state.objects.remove(i);
                state.events.push(GameEvent::Dodged { id, reward });
            }
            _ => {}
        }
    }
}

fn end_run(state: &mut GameState, cause: EndCause) {
    state.phase = GamePhase::Ended;
    log::info!(
        "Game over ({:?}): score {} after {}",
        cause,
        state.score,
        crate::format_elapsed(state.clock_ms)
    );
    state.events.push(GameEvent::GameOver {
        cause,
        score: state.score,
        elapsed_ms: state.clock_ms,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::FallingObject;

    fn running(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.start();
        state
    }

    fn place(state: &mut GameState, kind: ObjectKind, x: f32, y: f32) -> u32 {
        let id = state.push_object(kind, x);
        let obj = state.objects.last_mut().unwrap();
        obj.y = y;
        id
    }

    #[test]
    fn test_idle_and_ended_do_not_advance() {
        let mut state = GameState::new(1);
        let input = TickInput {
            right: true,
            ..Default::default()
        };
        tick(&mut state, &input, 1.0);
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.player.x, 300.0);
        assert_eq!(state.clock_ms, 0.0);

        state.start();
        state.phase = GamePhase::Ended;
        tick(&mut state, &input, 1.0);
        assert_eq!(state.player.x, 300.0);
    }

    #[test]
    fn test_move_right_example() {
        let mut state = running(1);
        let input = TickInput {
            right: true,
            ..Default::default()
        };
        tick(&mut state, &input, 0.1);
        assert!((state.player.x - 450.0).abs() < 0.001);
    }

    #[test]
    fn test_movement_clamps_to_screen() {
        let mut state = running(1);
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        tick(&mut state, &right, 0.5);
        assert_eq!(state.player.x, 570.0);

        state.objects.clear();
        let left = TickInput {
            left: true,
            ..Default::default()
        };
        tick(&mut state, &left, 0.6);
        assert_eq!(state.player.x, 30.0);
    }

    #[test]
    fn test_opposing_keys_cancel() {
        let mut state = running(1);
        let both = TickInput {
            left: true,
            right: true,
            ..Default::default()
        };
        tick(&mut state, &both, 0.1);
        assert_eq!(state.player.x, 300.0);
    }

    #[test]
    fn test_spawns_after_interval() {
        let mut state = running(7);
        let input = TickInput::default();
        for _ in 0..3 {
            tick(&mut state, &input, 0.25);
        }
        assert!(state.objects.is_empty(), "750ms is not past 800ms");

        tick(&mut state, &input, 0.25);
        assert_eq!(state.objects.len(), 1);
        assert_eq!(state.last_spawn_ms, 1000.0);
        // Spawned then fell for one tick: v = 150, y = -80 + 37.5
        let obj = &state.objects[0];
        assert_eq!(obj.velocity, 150.0);
        assert_eq!(obj.y, -42.5);
        assert!(obj.x >= 80.0 && obj.x <= 520.0);
        assert!(matches!(
            state.events.as_slice(),
            [GameEvent::Spawned { .. }]
        ));
    }

    #[test]
    fn test_spawn_interval_tracks_score() {
        let mut state = running(1);
        assert_eq!(state.spawn_interval_ms(), 800.0);
        state.score = 60;
        assert_eq!(state.spawn_interval_ms(), 200.0);
    }

    #[test]
    fn test_bad_overlap_ends_run() {
        let mut state = running(1);
        place(&mut state, ObjectKind::Bad, 300.0, 1100.0);
        tick(&mut state, &TickInput::default(), 0.0);

        assert_eq!(state.phase, GamePhase::Ended);
        assert_eq!(state.score, 0);
        assert!(matches!(
            state.events.last(),
            Some(GameEvent::GameOver {
                cause: EndCause::HitBad,
                score: 0,
                ..
            })
        ));
    }

    #[test]
    fn test_good_overlap_scores_and_removes() {
        let mut state = running(1);
        let id = place(&mut state, ObjectKind::Good, 310.0, 1100.0);
        tick(&mut state, &TickInput::default(), 0.0);

        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 10);
        assert!(state.objects.is_empty());
        assert_eq!(
            state.events,
            vec![GameEvent::Collected { id, reward: 10 }]
        );
    }

    #[test]
    fn test_missed_good_ends_run() {
        let mut state = running(1);
        place(&mut state, ObjectKind::Good, 100.0, 1281.0);
        tick(&mut state, &TickInput::default(), 0.0);

        assert_eq!(state.phase, GamePhase::Ended);
        assert!(matches!(
            state.events.last(),
            Some(GameEvent::GameOver {
                cause: EndCause::MissedGood,
                ..
            })
        ));
    }

    #[test]
    fn test_dodged_bad_scores_and_removes() {
        let mut state = running(1);
        place(&mut state, ObjectKind::Bad, 100.0, 1281.0);
        tick(&mut state, &TickInput::default(), 0.0);

        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 5);
        assert!(state.objects.is_empty());
    }

    #[test]
    fn test_object_on_boundary_is_kept() {
        let mut state = running(1);
        place(&mut state, ObjectKind::Good, 100.0, 1280.0);
        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.objects.len(), 1);
    }

    #[test]
    fn test_terminal_outcome_skips_older_objects() {
        let mut state = running(1);
        place(&mut state, ObjectKind::Good, 100.0, 1270.0);
        place(&mut state, ObjectKind::Good, 500.0, 400.0);
        place(&mut state, ObjectKind::Bad, 300.0, 1100.0);
        tick(&mut state, &TickInput::default(), 0.1);

        assert_eq!(state.phase, GamePhase::Ended);
        // Older objects stay untouched for the game over screen
        assert_eq!(state.objects.len(), 3);
        let untouched: Vec<&FallingObject> = state.objects.iter().take(2).collect();
        assert_eq!(untouched[0].y, 1270.0);
        assert_eq!(untouched[1].y, 400.0);
        assert_eq!(untouched[0].velocity, 0.0);
    }

    #[test]
    fn test_multiple_outcomes_same_tick() {
        let mut state = running(1);
        place(&mut state, ObjectKind::Bad, 100.0, 1300.0);
        place(&mut state, ObjectKind::Good, 300.0, 1100.0);
        tick(&mut state, &TickInput::default(), 0.0);

        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 15);
        assert!(state.objects.is_empty());
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut state = running(1);
        state.score = 40;
        place(&mut state, ObjectKind::Bad, 300.0, 1100.0);
        place(&mut state, ObjectKind::Good, 200.0, 300.0);
        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.phase, GamePhase::Ended);

        state.start();
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0);
        assert!(state.objects.is_empty());
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_negative_dt_is_ignored() {
        let mut state = running(1);
        place(&mut state, ObjectKind::Good, 100.0, 500.0);
        tick(
            &mut state,
            &TickInput {
                left: true,
                ..Default::default()
            },
            -1.0,
        );
        assert_eq!(state.player.x, 300.0);
        assert_eq!(state.clock_ms, 0.0);
        assert_eq!(state.objects[0].y, 500.0);

        tick(&mut state, &TickInput::default(), f32::NAN);
        assert_eq!(state.clock_ms, 0.0);
    }

    #[test]
    fn test_determinism() {
        // Two sessions with the same seed spawn identical objects
        let mut state1 = running(99999);
        let mut state2 = running(99999);
        let input = TickInput::default();

        for _ in 0..20 {
            tick(&mut state1, &input, 0.25);
            tick(&mut state2, &input, 0.25);
            state1.objects.retain(|o| o.y < 1000.0);
            state2.objects.retain(|o| o.y < 1000.0);
        }

        assert_eq!(state1.objects, state2.objects);
        assert_eq!(state1.events, state2.events);
    }

    #[test]
    fn test_good_chance_extremes() {
        let mut state = running(3);
        state.tuning.good_chance = 1.0;
        for _ in 0..20 {
            spawn_object(&mut state);
        }
        assert!(state.objects.iter().all(|o| o.kind == ObjectKind::Good));

        state.objects.clear();
        state.tuning.good_chance = 0.0;
        for _ in 0..20 {
            spawn_object(&mut state);
        }
        assert!(state.objects.iter().all(|o| o.kind == ObjectKind::Bad));
    }

    #[test]
    fn test_bad_spawns_pick_seeded_variants() {
        let mut state = running(11);
        state.tuning.good_chance = 0.0;
        for _ in 0..200 {
            spawn_object(&mut state);
        }
        assert!(state.objects.iter().all(|o| o.variant < BAD_VARIANTS));
        for variant in 0..BAD_VARIANTS {
            assert!(
                state.objects.iter().any(|o| o.variant == variant),
                "variant {} never drawn",
                variant
            );
        }

        let mut good = running(11);
        good.tuning.good_chance = 1.0;
        for _ in 0..20 {
            spawn_object(&mut good);
        }
        assert!(good.objects.iter().all(|o| o.variant == 0));
    }
}
