//! Fall Dodge - catch the green, dodge the red
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, falling, collisions, scoring)
//! - `ui`: Session record and input handlers (keys, pointer, touch, buttons)
//! - `renderer`: Scene of drawables plus the WebGPU pipeline that draws it
//! - `leaderboard`: Remote score submission and rankings
//! - `notifier`: Transient user-visible messages
//! - `name`: Player name validation and prompting
//! - `platform`: Browser/native storage abstraction
//! - `tuning`: Data-driven game balance

pub mod leaderboard;
pub mod name;
pub mod notifier;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use leaderboard::{Leaderboard, LeaderboardEntry, LeaderboardError, Rankings};
pub use name::{NameError, validate_player_name};
pub use notifier::Notifier;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (1:2 portrait)
    pub const SCREEN_WIDTH: f32 = 600.0;
    pub const SCREEN_HEIGHT: f32 = 1200.0;

    /// Player sprite (square)
    pub const PLAYER_SIZE: f32 = 60.0;
    /// Distance from the bottom edge to the player's center
    pub const PLAYER_BOTTOM_OFFSET: f32 = 80.0;
    /// Horizontal speed, pixels per second
    pub const PLAYER_SPEED: f32 = 1500.0;

    /// Falling object sprite (square bounding box)
    pub const OBJECT_SIZE: f32 = 80.0;
    /// Pixels per second squared
    pub const GRAVITY: f32 = 600.0;
    /// Objects start at rest
    pub const INITIAL_VELOCITY: f32 = 0.0;

    /// Spawn interval at score 0 (ms)
    pub const BASE_SPAWN_INTERVAL_MS: f64 = 800.0;
    /// Spawn interval never drops below this (ms)
    pub const MIN_SPAWN_INTERVAL_MS: f64 = 200.0;
    /// Interval reduction per point of score (ms)
    pub const SPAWN_INTERVAL_PER_POINT_MS: f64 = 10.0;
    /// Probability a spawned object is good
    pub const GOOD_CHANCE: f32 = 0.7;

    /// Points for catching a good object
    pub const GOOD_REWARD: u32 = 10;
    /// Points for letting a bad object fall past
    pub const DODGE_REWARD: u32 = 5;

    /// Longest frame the driver feeds into a single tick (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
}

/// Format a session clock reading as the leaderboard time label ("12.34s")
pub fn format_elapsed(elapsed_ms: f64) -> String {
    format!("{:.2}s", elapsed_ms.max(0.0) / 1000.0)
}
