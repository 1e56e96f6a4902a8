//! Session record and input handling
//!
//! `Session` is the one owned record shared by the frame driver and every
//! input handler: the game state, the held keys and the autopilot switch.

use std::collections::HashSet;

use glam::Vec2;

use crate::consts::MAX_FRAME_DT;
use crate::sim::{Aabb, GameEvent, GamePhase, GameState, TickInput, tick};
use crate::tuning::Tuning;

/// Keys that move the player left
pub const LEFT_KEYS: [&str; 3] = ["ArrowLeft", "a", "A"];
/// Keys that move the player right
pub const RIGHT_KEYS: [&str; 3] = ["ArrowRight", "d", "D"];
/// Keys that start or restart a run
pub const START_KEYS: [&str; 2] = [" ", "Enter"];

/// Size shared by the start and restart buttons
pub const BUTTON_SIZE: Vec2 = Vec2::new(200.0, 60.0);

/// A clickable rectangle in playfield coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Button {
    pub center: Vec2,
    pub size: Vec2,
    pub label: &'static str,
}

impl Button {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.center, self.size)
    }

    /// Strict interior hit test
    pub fn contains(&self, point: Vec2) -> bool {
        self.bounds().contains(point)
    }
}

/// START button on the title screen
pub fn start_button(tuning: &Tuning) -> Button {
    Button {
        center: Vec2::new(tuning.screen_width / 2.0, tuning.screen_height / 2.0 + 120.0),
        size: BUTTON_SIZE,
        label: "START",
    }
}

/// RESTART button on the game over screen
pub fn restart_button(tuning: &Tuning) -> Button {
    Button {
        center: Vec2::new(tuning.screen_width / 2.0, tuning.screen_height / 2.0 + 50.0),
        size: BUTTON_SIZE,
        label: "RESTART",
    }
}

/// Uniform scale and top-left offset of the playfield inside a canvas
///
/// Matches the fit the renderer draws with: the playfield keeps its aspect
/// ratio and is centered, leaving bars on the long axis.
fn playfield_fit(canvas_size: Vec2, tuning: &Tuning) -> (f32, Vec2) {
    let playfield = Vec2::new(tuning.screen_width, tuning.screen_height);
    if canvas_size.x <= 0.0 || canvas_size.y <= 0.0 {
        return (1.0, Vec2::ZERO);
    }
    let scale = (canvas_size.x / playfield.x).min(canvas_size.y / playfield.y);
    (scale, (canvas_size - playfield * scale) / 2.0)
}

/// Canvas pixels per playfield unit
pub fn playfield_scale(canvas_size: Vec2, tuning: &Tuning) -> f32 {
    playfield_fit(canvas_size, tuning).0
}

/// Map a point in canvas client coordinates into playfield coordinates
///
/// `canvas_origin`/`canvas_size` are the canvas's on-screen rectangle.
pub fn to_playfield(client: Vec2, canvas_origin: Vec2, canvas_size: Vec2, tuning: &Tuning) -> Vec2 {
    let (scale, offset) = playfield_fit(canvas_size, tuning);
    (client - canvas_origin - offset) / scale
}

/// Map a playfield point to pixels from the canvas's top-left corner
pub fn to_canvas(point: Vec2, canvas_size: Vec2, tuning: &Tuning) -> Vec2 {
    let (scale, offset) = playfield_fit(canvas_size, tuning);
    point * scale + offset
}

/// Side of the player a touch is holding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchSteer {
    Left,
    Right,
}

/// Currently pressed keys plus any active steering touch
#[derive(Debug, Clone, Default)]
pub struct HeldKeys {
    pressed: HashSet<String>,
    touch: Option<TouchSteer>,
}

impl HeldKeys {
    pub fn press(&mut self, key: &str) {
        self.pressed.insert(key.to_string());
    }

    pub fn release(&mut self, key: &str) {
        self.pressed.remove(key);
    }

    fn is_pressed(&self, key: &str) -> bool {
        self.pressed.contains(key)
    }

    pub fn left(&self) -> bool {
        LEFT_KEYS.iter().any(|k| self.is_pressed(k)) || self.touch == Some(TouchSteer::Left)
    }

    pub fn right(&self) -> bool {
        RIGHT_KEYS.iter().any(|k| self.is_pressed(k)) || self.touch == Some(TouchSteer::Right)
    }
}

/// Something an input handler did that the frame driver may want to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    /// Left the title screen
    Started,
    /// Started over from the game over screen
    Restarted,
    /// Demo mode switched on or off
    AutopilotToggled(bool),
}

/// The owned game session
#[derive(Debug, Clone)]
pub struct Session {
    pub state: GameState,
    pub keys: HeldKeys,
    /// Demo mode: the autopilot steers
    pub autopilot: bool,
    /// A run ended and its score has not been handled yet
    finish_pending: bool,
}

impl Session {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            state: GameState::with_tuning(seed, tuning),
            keys: HeldKeys::default(),
            autopilot: false,
            finish_pending: false,
        }
    }

    /// The button currently on screen, if any
    pub fn visible_button(&self) -> Option<Button> {
        match self.state.phase {
            GamePhase::Idle => Some(start_button(&self.state.tuning)),
            GamePhase::Ended => Some(restart_button(&self.state.tuning)),
            GamePhase::Running => None,
        }
    }

    /// Begin a run from the title or game over screen
    ///
    /// Refused while the last run's score is still pending.
    pub fn start(&mut self) -> Option<UiAction> {
        if self.finish_pending {
            log::debug!("Start ignored: previous run not finished");
            return None;
        }
        let action = match self.state.phase {
            GamePhase::Idle => UiAction::Started,
            GamePhase::Ended => UiAction::Restarted,
            GamePhase::Running => return None,
        };
        self.keys.touch = None;
        self.state.start();
        Some(action)
    }

    /// Whether a finished run still awaits name entry and submission
    pub fn finish_pending(&self) -> bool {
        self.finish_pending
    }

    /// The finished run has been submitted or abandoned; allow restarts
    pub fn finish_recorded(&mut self) {
        self.finish_pending = false;
    }

    pub fn key_down(&mut self, key: &str) -> Option<UiAction> {
        self.keys.press(key);
        if START_KEYS.contains(&key) {
            return self.start();
        }
        if key == "i" || key == "I" {
            self.autopilot = !self.autopilot;
            log::info!("Autopilot: {}", self.autopilot);
            return Some(UiAction::AutopilotToggled(self.autopilot));
        }
        None
    }

    pub fn key_up(&mut self, key: &str) {
        self.keys.release(key);
    }

    /// Click at a playfield point
    pub fn pointer_down(&mut self, point: Vec2) -> Option<UiAction> {
        match self.visible_button() {
            Some(button) if button.contains(point) => self.start(),
            _ => None,
        }
    }

    /// Whether a pointer at `point` hovers a visible button
    pub fn pointer_move(&self, point: Vec2) -> bool {
        self.visible_button()
            .is_some_and(|button| button.contains(point))
    }

    /// Touch began: press a button, or steer toward the touched side
    pub fn touch_start(&mut self, point: Vec2) -> Option<UiAction> {
        if self.state.is_running() {
            self.keys.touch = Some(if point.x < self.state.player.x {
                TouchSteer::Left
            } else {
                TouchSteer::Right
            });
            return None;
        }
        self.pointer_down(point)
    }

    pub fn touch_end(&mut self) {
        self.keys.touch = None;
    }

    /// Input for the next tick from the held keys
    pub fn tick_input(&self) -> TickInput {
        TickInput {
            left: self.keys.left(),
            right: self.keys.right(),
            autopilot: self.autopilot,
        }
    }

    /// Run one frame of `dt` seconds and return what happened
    pub fn advance(&mut self, dt: f32) -> Vec<GameEvent> {
        let input = self.tick_input();
        tick(&mut self.state, &input, dt.min(MAX_FRAME_DT));
        let events = self.state.drain_events();
        if events
            .iter()
            .any(|e| matches!(e, GameEvent::GameOver { .. }))
        {
            self.finish_pending = true;
        }
        events
    }
}
