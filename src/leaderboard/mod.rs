//! Remote leaderboard client
//!
//! Scores go to a key-value HTTP API:
//! - `POST {endpoint}/{key}/scores` with a JSON [`ScoreSubmission`]
//! - `GET {endpoint}/{key}/rankings?limit=N` returning `[LeaderboardEntry]`
//!
//! Submissions are fire-and-forget and never retried. While the game reports
//! itself running, nothing is sent.

pub mod rankings;
pub mod transport;

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

pub use rankings::{DEFAULT_RANKING_LIMIT, Rankings};
pub use transport::{Completion, ScoreTransport};

use crate::name::validate_player_name;
use crate::notifier::Notifier;

/// One row of the leaderboard as the server stores it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u32,
    /// Elapsed session time label, e.g. "12.34s"
    pub time: String,
}

/// Request body for a new score
pub type ScoreSubmission = LeaderboardEntry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaderboardError {
    /// Request never completed (offline, DNS, CORS...)
    Network(String),
    /// Server answered with a non-success status
    Status(u16),
    /// Response body was not what we expected
    Decode(String),
}

impl fmt::Display for LeaderboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeaderboardError::Network(msg) => write!(f, "leaderboard unreachable: {}", msg),
            LeaderboardError::Status(code) => write!(f, "leaderboard returned HTTP {}", code),
            LeaderboardError::Decode(msg) => write!(f, "unreadable leaderboard response: {}", msg),
        }
    }
}

impl std::error::Error for LeaderboardError {}

/// Where the leaderboard lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub base_url: String,
    pub api_key: String,
}

impl Endpoint {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn root(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), self.api_key)
    }

    pub fn scores_url(&self) -> String {
        format!("{}/scores", self.root())
    }

    pub fn rankings_url(&self, limit: usize) -> String {
        format!("{}/rankings?limit={}", self.root(), limit)
    }
}

/// Leaderboard client gated on the game's running state
pub struct Leaderboard<T: ScoreTransport> {
    transport: T,
    is_running: Box<dyn Fn() -> bool>,
    notifier: Rc<dyn Notifier>,
}

impl<T: ScoreTransport> Leaderboard<T> {
    pub fn new(
        transport: T,
        is_running: impl Fn() -> bool + 'static,
        notifier: Rc<dyn Notifier>,
    ) -> Self {
        Self {
            transport,
            is_running: Box::new(is_running),
            notifier,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a finished run's score
    ///
    /// Returns whether a request was dispatched. Nothing is sent while a game
    /// is running or when the name is invalid. Transport failures are logged
    /// and shown to the player; they are not retried.
    pub fn save_score(&self, name: &str, score: u32, elapsed_label: &str) -> bool {
        if (self.is_running)() {
            log::warn!("Score submission ignored: game still running");
            return false;
        }
        if let Err(e) = validate_player_name(name) {
            log::warn!("Score submission ignored: {}", e);
            return false;
        }

        let submission = ScoreSubmission {
            name: name.to_string(),
            score,
            time: elapsed_label.to_string(),
        };
        log::info!(
            "Submitting score {} for {} ({})",
            submission.score,
            submission.name,
            submission.time
        );

        let notifier = Rc::clone(&self.notifier);
        self.transport.submit(
            submission,
            Box::new(move |result| match result {
                Ok(()) => log::info!("Score saved"),
                Err(e) => {
                    log::error!("Score submission failed: {}", e);
                    notifier.show(&format!("Could not save score: {}", e));
                }
            }),
        );
        true
    }

    /// Query the top `limit` entries
    pub fn fetch_rankings(&self, limit: usize, on_done: Completion<Rankings>) {
        self.transport.fetch_rankings(limit, on_done);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::RecordingNotifier;
    use std::cell::{Cell, RefCell};

    /// Completes synchronously with canned outcomes
    #[derive(Default)]
    struct FakeTransport {
        submitted: RefCell<Vec<ScoreSubmission>>,
        fail_with: Option<LeaderboardError>,
        rankings: Vec<LeaderboardEntry>,
    }

    impl ScoreTransport for FakeTransport {
        fn submit(&self, submission: ScoreSubmission, done: Completion<()>) {
            self.submitted.borrow_mut().push(submission);
            match &self.fail_with {
                Some(e) => done(Err(e.clone())),
                None => done(Ok(())),
            }
        }

        fn fetch_rankings(&self, limit: usize, done: Completion<Rankings>) {
            let entries = self.rankings.iter().take(limit).cloned();
            done(Ok(Rankings::from_entries(entries)));
        }
    }

    fn client(
        transport: FakeTransport,
        running: Rc<Cell<bool>>,
    ) -> (Leaderboard<FakeTransport>, Rc<RecordingNotifier>) {
        let notifier = Rc::new(RecordingNotifier::default());
        let board = Leaderboard::new(
            transport,
            move || running.get(),
            notifier.clone() as Rc<dyn Notifier>,
        );
        (board, notifier)
    }

    #[test]
    fn test_submits_after_game_ends() {
        let running = Rc::new(Cell::new(false));
        let (board, notifier) = client(FakeTransport::default(), running);

        assert!(board.save_score("kim", 120, "15.20s"));
        let submitted = board.transport().submitted.borrow();
        assert_eq!(
            submitted.as_slice(),
            [ScoreSubmission {
                name: "kim".into(),
                score: 120,
                time: "15.20s".into()
            }]
        );
        assert!(notifier.messages.borrow().is_empty());
    }

    #[test]
    fn test_gated_while_running() {
        let running = Rc::new(Cell::new(true));
        let (board, _) = client(FakeTransport::default(), running.clone());

        assert!(!board.save_score("kim", 10, "1.00s"));
        assert!(board.transport().submitted.borrow().is_empty());

        running.set(false);
        assert!(board.save_score("kim", 10, "1.00s"));
        assert_eq!(board.transport().submitted.borrow().len(), 1);
    }

    #[test]
    fn test_rejects_invalid_name() {
        let (board, _) = client(FakeTransport::default(), Rc::new(Cell::new(false)));
        assert!(!board.save_score("Not Valid", 10, "1.00s"));
        assert!(board.transport().submitted.borrow().is_empty());
    }

    #[test]
    fn test_failure_is_reported() {
        let transport = FakeTransport {
            fail_with: Some(LeaderboardError::Status(503)),
            ..Default::default()
        };
        let (board, notifier) = client(transport, Rc::new(Cell::new(false)));

        assert!(board.save_score("kim", 10, "1.00s"));
        let messages = notifier.messages.borrow();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("503"));
    }

    #[test]
    fn test_fetch_rankings_passes_through() {
        let transport = FakeTransport {
            rankings: vec![
                LeaderboardEntry {
                    name: "a".into(),
                    score: 5,
                    time: "1.00s".into(),
                },
                LeaderboardEntry {
                    name: "b".into(),
                    score: 9,
                    time: "2.00s".into(),
                },
            ],
            ..Default::default()
        };
        let (board, _) = client(transport, Rc::new(Cell::new(false)));

        let seen = Rc::new(RefCell::new(None));
        let sink = seen.clone();
        board.fetch_rankings(
            10,
            Box::new(move |result| *sink.borrow_mut() = Some(result)),
        );
        let rankings = seen.borrow_mut().take().unwrap().unwrap();
        assert_eq!(rankings.top_score(), Some(9));
    }

    #[test]
    fn test_endpoint_urls() {
        let endpoint = Endpoint::new("https://kv.example.test/api/", "gang");
        assert_eq!(endpoint.scores_url(), "https://kv.example.test/api/gang/scores");
        assert_eq!(
            endpoint.rankings_url(5),
            "https://kv.example.test/api/gang/rankings?limit=5"
        );
    }

    #[test]
    fn test_submission_wire_format() {
        let body = serde_json::to_value(ScoreSubmission {
            name: "kim".into(),
            score: 30,
            time: "4.50s".into(),
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "name": "kim", "score": 30, "time": "4.50s" })
        );
    }
}
