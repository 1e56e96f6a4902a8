//! Ranking list returned by the leaderboard
//!
//! Sorted descending by score; ties keep arrival order.

use serde::{Deserialize, Serialize};

use super::LeaderboardEntry;

/// Default number of entries requested from the server
pub const DEFAULT_RANKING_LIMIT: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rankings {
    entries: Vec<LeaderboardEntry>,
}

impl Rankings {
    /// Create empty rankings
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build from entries in any order
    pub fn from_entries(entries: impl IntoIterator<Item = LeaderboardEntry>) -> Self {
        let mut rankings = Self::new();
        for entry in entries {
            rankings.insert(entry);
        }
        rankings
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    /// Insert an entry, returning the rank it landed at (1-indexed)
    pub fn insert(&mut self, entry: LeaderboardEntry) -> usize {
        // Find insertion point (sorted descending by score)
        let pos = self.entries.iter().position(|e| entry.score > e.score);
        match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        }
    }

    /// Best rank held by `name` (1-indexed)
    pub fn rank_of(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name).map(|i| i + 1)
    }

    /// Rank a new score would take if inserted now (1-indexed)
    pub fn potential_rank(&self, score: u32) -> usize {
        self.entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len())
            + 1
    }

    /// The first `n` entries
    pub fn top(&self, n: usize) -> &[LeaderboardEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Parse a server response (a JSON array of entries)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let entries: Vec<LeaderboardEntry> = serde_json::from_str(json)?;
        Ok(Self::from_entries(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, score: u32) -> LeaderboardEntry {
        LeaderboardEntry {
            name: name.to_string(),
            score,
            time: "1.00s".to_string(),
        }
    }

    #[test]
    fn test_sorted_descending() {
        let rankings = Rankings::from_entries([entry("a", 10), entry("b", 50), entry("c", 30)]);
        let names: Vec<&str> = rankings.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["b", "c", "a"]);
        assert_eq!(rankings.top_score(), Some(50));
    }

    #[test]
    fn test_ties_keep_arrival_order() {
        let mut rankings = Rankings::new();
        assert_eq!(rankings.insert(entry("first", 20)), 1);
        assert_eq!(rankings.insert(entry("second", 20)), 2);
        assert_eq!(rankings.rank_of("second"), Some(2));
    }

    #[test]
    fn test_rank_of_best_entry() {
        let rankings = Rankings::from_entries([entry("kim", 5), entry("lee", 40), entry("kim", 90)]);
        assert_eq!(rankings.rank_of("kim"), Some(1));
        assert_eq!(rankings.rank_of("lee"), Some(2));
        assert_eq!(rankings.rank_of("park"), None);
    }

    #[test]
    fn test_potential_rank() {
        let rankings = Rankings::from_entries([entry("a", 100), entry("b", 50)]);
        assert_eq!(rankings.potential_rank(200), 1);
        assert_eq!(rankings.potential_rank(75), 2);
        assert_eq!(rankings.potential_rank(50), 3);
        assert_eq!(Rankings::new().potential_rank(0), 1);
    }

    #[test]
    fn test_top_is_bounded() {
        let rankings = Rankings::from_entries([entry("a", 1), entry("b", 2)]);
        assert_eq!(rankings.top(5).len(), 2);
        assert_eq!(rankings.top(1)[0].name, "b");
    }

    #[test]
    fn test_from_json_sorts() {
        let json = r#"[
            {"name": "low", "score": 5, "time": "3.10s"},
            {"name": "high", "score": 80, "time": "40.02s"}
        ]"#;
        let rankings = Rankings::from_json(json).unwrap();
        assert_eq!(rankings.len(), 2);
        assert_eq!(rankings.entries()[0].name, "high");
        assert_eq!(rankings.entries()[0].time, "40.02s");
    }
}
