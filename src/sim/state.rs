//! Game state and core simulation types

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::Aabb;
use crate::tuning::Tuning;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Start screen with instructions, waiting for the start action
    Idle,
    /// Active gameplay
    Running,
    /// Run ended; game over screen with restart button
    Ended,
}

/// What a falling object does to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// Must be caught
    Good,
    /// Must be avoided
    Bad,
}

/// Number of looks a bad object can spawn with
pub const BAD_VARIANTS: u8 = 4;

/// A falling object
#[derive(Debug, Clone, PartialEq)]
pub struct FallingObject {
    pub id: u32,
    pub kind: ObjectKind,
    /// Horizontal center (fixed for the object's lifetime)
    pub x: f32,
    /// Vertical center, increasing downward
    pub y: f32,
    /// Vertical velocity (pixels/second, positive is down)
    pub velocity: f32,
    /// Sprite variant; bad objects pick one of [`BAD_VARIANTS`] at spawn
    pub variant: u8,
}

impl FallingObject {
    /// Advance one step of gravity: velocity first, then position
    pub fn integrate(&mut self, gravity: f32, dt: f32) {
        self.velocity += gravity * dt;
        self.y += self.velocity * dt;
    }

    pub fn bounds(&self, size: f32) -> Aabb {
        Aabb::from_center(Vec2::new(self.x, self.y), Vec2::splat(size))
    }
}

/// The player's sprite, sliding along a fixed row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    pub x: f32,
}

impl Player {
    /// Move by `dx` and clamp into `[min, max]`
    pub fn shift(&mut self, dx: f32, (min, max): (f32, f32)) {
        self.x = (self.x + dx).clamp(min, max);
    }

    pub fn bounds(&self, tuning: &Tuning) -> Aabb {
        Aabb::from_center(
            Vec2::new(self.x, tuning.player_y()),
            Vec2::splat(tuning.player_size),
        )
    }
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndCause {
    /// A bad object touched the player
    HitBad,
    /// A good object fell past the bottom
    MissedGood,
}

/// Things that happened during a tick, for the frame driver to react to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Spawned { id: u32, kind: ObjectKind },
    /// Good object caught
    Collected { id: u32, reward: u32 },
    /// Bad object fell past the bottom
    Dodged { id: u32, reward: u32 },
    GameOver {
        cause: EndCause,
        score: u32,
        elapsed_ms: f64,
    },
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    pub score: u32,
    pub player: Player,
    /// Active objects in spawn order (oldest first)
    pub objects: Vec<FallingObject>,
    /// Session clock: simulated milliseconds since the last start
    pub clock_ms: f64,
    /// Session clock reading at the most recent spawn
    pub last_spawn_ms: f64,
    /// Balance parameters for this session
    pub tuning: Tuning,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    /// Seed the RNG was created from
    pub seed: u64,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create an idle session with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create an idle session with the given balance parameters
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self {
            phase: GamePhase::Idle,
            score: 0,
            player: Player {
                x: tuning.screen_width / 2.0,
            },
            objects: Vec::new(),
            clock_ms: 0.0,
            last_spawn_ms: 0.0,
            tuning,
            events: Vec::new(),
            seed,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Start (or restart) a run: fresh score, empty field, centered player
    ///
    /// The RNG stream carries on so consecutive runs differ.
    pub fn start(&mut self) {
        self.phase = GamePhase::Running;
        self.score = 0;
        self.objects.clear();
        self.player.x = self.tuning.screen_width / 2.0;
        self.clock_ms = 0.0;
        self.last_spawn_ms = 0.0;
        self.events.clear();
        log::info!("Run started");
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Place an object at rest above the top edge
    pub fn push_object(&mut self, kind: ObjectKind, x: f32) -> u32 {
        self.push_variant(kind, x, 0)
    }

    /// Like [`push_object`](Self::push_object) with an explicit sprite variant
    pub fn push_variant(&mut self, kind: ObjectKind, x: f32, variant: u8) -> u32 {
        let id = self.next_entity_id();
        self.objects.push(FallingObject {
            id,
            kind,
            x,
            y: -self.tuning.object_size,
            velocity: crate::consts::INITIAL_VELOCITY,
            variant,
        });
        id
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Spawn interval at the current score
    pub fn spawn_interval_ms(&self) -> f64 {
        self.tuning.spawn_interval_ms(self.score)
    }
}
