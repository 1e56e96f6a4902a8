//! Demo-mode steering
//!
//! Greedy: get out from under the nearest threatening bad object, otherwise
//! chase the lowest good object.

use std::cmp::Ordering;

use super::state::{FallingObject, GameState, ObjectKind};
use super::tick::TickInput;

/// How far above the player row a bad object counts as a threat
const THREAT_LOOKAHEAD: f32 = 320.0;
/// Extra horizontal clearance kept from bad objects
const DODGE_MARGIN: f32 = 20.0;

fn lowest<'a>(objects: impl Iterator<Item = &'a FallingObject>) -> Option<&'a FallingObject> {
    objects.max_by(|a, b| a.y.partial_cmp(&b.y).unwrap_or(Ordering::Equal))
}

/// Pick this tick's movement keys for the current state
pub fn steer(state: &GameState) -> TickInput {
    let tuning = &state.tuning;
    let px = state.player.x;
    let player_y = tuning.player_y();
    // Horizontal center distance below which the boxes overlap
    let reach = (tuning.player_size + tuning.object_size) / 2.0;
    let (min_x, max_x) = tuning.player_bounds();

    let threat = lowest(state.objects.iter().filter(|o| {
        o.kind == ObjectKind::Bad
            && o.y < player_y + reach
            && o.y > player_y - THREAT_LOOKAHEAD
            && (o.x - px).abs() < reach + DODGE_MARGIN
    }));

    if let Some(bad) = threat {
        let mut go_left = bad.x >= px;
        // Pinned against a wall: squeeze past the other side instead
        if go_left && px - min_x < reach {
            go_left = false;
        } else if !go_left && max_x - px < reach {
            go_left = true;
        }
        return TickInput {
            left: go_left,
            right: !go_left,
            autopilot: true,
        };
    }

    // Dead zone of half a sprite keeps a frame's step from overshooting
    let dead_zone = tuning.player_size / 2.0;
    if let Some(good) = lowest(state.objects.iter().filter(|o| o.kind == ObjectKind::Good)) {
        let dx = good.x - px;
        if dx.abs() > dead_zone {
            return TickInput {
                left: dx < 0.0,
                right: dx > 0.0,
                autopilot: true,
            };
        }
    }

    TickInput {
        autopilot: true,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running() -> GameState {
        let mut state = GameState::new(11);
        state.start();
        state
    }

    fn place(state: &mut GameState, kind: ObjectKind, x: f32, y: f32) {
        state.push_object(kind, x);
        state.objects.last_mut().unwrap().y = y;
    }

    #[test]
    fn test_chases_lowest_good() {
        let mut state = running();
        place(&mut state, ObjectKind::Good, 500.0, 200.0);
        place(&mut state, ObjectKind::Good, 100.0, 700.0);
        let input = steer(&state);
        assert!(input.left && !input.right);
    }

    #[test]
    fn test_holds_still_when_aligned() {
        let mut state = running();
        place(&mut state, ObjectKind::Good, 310.0, 700.0);
        assert_eq!(steer(&state).direction(), 0.0);
    }

    #[test]
    fn test_dodges_bad_above() {
        let mut state = running();
        place(&mut state, ObjectKind::Good, 340.0, 400.0);
        place(&mut state, ObjectKind::Bad, 320.0, 1000.0);
        let input = steer(&state);
        assert!(input.left, "bad object is right of center, dodge left");
    }

    #[test]
    fn test_dodge_away_from_wall() {
        let mut state = running();
        state.player.x = 40.0;
        place(&mut state, ObjectKind::Bad, 60.0, 1000.0);
        let input = steer(&state);
        assert!(input.right);
    }

    #[test]
    fn test_ignores_distant_bad() {
        let mut state = running();
        place(&mut state, ObjectKind::Bad, 300.0, 200.0);
        assert_eq!(steer(&state).direction(), 0.0);
    }
}
