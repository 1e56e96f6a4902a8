//! Property tests for the simulation rules

use fall_dodge::Tuning;
use fall_dodge::sim::{EndCause, GameEvent, GamePhase, GameState, ObjectKind, TickInput, tick};
use proptest::prelude::*;

fn running(seed: u64) -> GameState {
    let mut state = GameState::new(seed);
    state.start();
    state
}

fn input() -> impl Strategy<Value = TickInput> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(left, right, autopilot)| TickInput {
        left,
        right,
        autopilot,
    })
}

proptest! {
    #[test]
    fn player_stays_on_screen(
        seed in any::<u64>(),
        frames in prop::collection::vec((0.0f32..10.0, input()), 1..200),
    ) {
        let mut state = running(seed);
        let (min, max) = state.tuning.player_bounds();
        for (dt, input) in frames {
            tick(&mut state, &input, dt);
            prop_assert!(state.player.x >= min && state.player.x <= max);
        }
    }

    #[test]
    fn spawn_interval_shrinks_to_floor(a in 0u32..10_000, b in 0u32..10_000) {
        let tuning = Tuning::default();
        let (low, high) = (a.min(b), a.max(b));
        prop_assert!(tuning.spawn_interval_ms(low) >= tuning.spawn_interval_ms(high));
        prop_assert!(tuning.spawn_interval_ms(high) >= tuning.spawn_floor_ms);
    }

    #[test]
    fn touching_bad_always_ends(
        seed in any::<u64>(),
        player_x in 30.0f32..570.0,
        dx in -60.0f32..60.0,
        dy in -60.0f32..60.0,
        dt in 0.0f32..0.05,
    ) {
        let mut state = running(seed);
        state.player.x = player_x;
        let y = state.tuning.player_y() + dy;
        state.push_object(ObjectKind::Bad, player_x + dx);
        state.objects[0].y = y;

        tick(&mut state, &TickInput::default(), dt);
        prop_assert_eq!(state.phase, GamePhase::Ended);
        let over = state.events.iter().any(|e| matches!(
            e,
            GameEvent::GameOver { cause: EndCause::HitBad, .. }
        ));
        prop_assert!(over);
    }

    #[test]
    fn touching_good_scores_and_continues(
        seed in any::<u64>(),
        player_x in 30.0f32..570.0,
        dx in -60.0f32..60.0,
        dy in -60.0f32..60.0,
        dt in 0.0f32..0.05,
        score in 0u32..1000,
    ) {
        let mut state = running(seed);
        state.score = score;
        state.player.x = player_x;
        let y = state.tuning.player_y() + dy;
        state.push_object(ObjectKind::Good, player_x + dx);
        state.objects[0].y = y;

        tick(&mut state, &TickInput::default(), dt);
        prop_assert_eq!(state.phase, GamePhase::Running);
        prop_assert_eq!(state.score, score + state.tuning.good_reward);
        prop_assert!(state.objects.is_empty());
    }

    #[test]
    fn missed_good_ends(seed in any::<u64>(), past in 0.5f32..500.0) {
        let mut state = running(seed);
        let boundary = state.tuning.bottom_boundary();
        state.push_object(ObjectKind::Good, 60.0);
        state.objects[0].y = boundary + past;

        tick(&mut state, &TickInput::default(), 0.0);
        prop_assert_eq!(state.phase, GamePhase::Ended);
        let over = state.events.iter().any(|e| matches!(
            e,
            GameEvent::GameOver { cause: EndCause::MissedGood, .. }
        ));
        prop_assert!(over);
    }

    #[test]
    fn restart_resets(seed in any::<u64>(), frames in 1usize..600) {
        let mut state = running(seed);
        let autopilot = TickInput { autopilot: true, ..TickInput::default() };
        for _ in 0..frames {
            tick(&mut state, &autopilot, 1.0 / 30.0);
        }

        state.start();
        prop_assert_eq!(state.phase, GamePhase::Running);
        prop_assert_eq!(state.score, 0);
        prop_assert!(state.objects.is_empty());
        prop_assert_eq!(state.clock_ms, 0.0);
        prop_assert_eq!(state.player.x, state.tuning.screen_width / 2.0);
    }
}
