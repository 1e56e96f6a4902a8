//! Player name for the leaderboard
//!
//! Names are 1-10 characters of lowercase ASCII letters, digits, `_` or `-`.

use std::fmt;

use crate::notifier::Notifier;

/// Longest accepted name, in characters
pub const MAX_NAME_LEN: usize = 10;

/// Text shown in the name dialog
pub const NAME_PROMPT: &str =
    "Enter your name (lowercase letters, digits, _ and - only, up to 10 characters)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    Empty,
    TooLong { len: usize },
    InvalidCharacter(char),
}

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameError::Empty => write!(f, "Name must not be empty."),
            NameError::TooLong { len } => write!(
                f,
                "Name is too long ({} characters). Up to {} are allowed.",
                len, MAX_NAME_LEN
            ),
            NameError::InvalidCharacter(c) => {
                write!(f, "Name contains a character that is not allowed: '{}'", c)
            }
        }
    }
}

impl std::error::Error for NameError {}

fn is_name_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-'
}

/// Check a candidate name; length is tested before the character set
pub fn validate_player_name(name: &str) -> Result<&str, NameError> {
    let len = name.chars().count();
    if len == 0 {
        return Err(NameError::Empty);
    }
    if len > MAX_NAME_LEN {
        return Err(NameError::TooLong { len });
    }
    match name.chars().find(|c| !is_name_char(*c)) {
        Some(c) => Err(NameError::InvalidCharacter(c)),
        None => Ok(name),
    }
}

/// Obtain a valid name, asking until one is given or the player cancels
///
/// A cached name is returned without asking. `ask` returns `None` when the
/// dialog was cancelled; an empty answer also counts as cancelling.
/// Rejections are reported through `notifier` before asking again.
pub fn prompt_player_name<F>(
    cached: Option<&str>,
    mut ask: F,
    notifier: &dyn Notifier,
) -> Option<String>
where
    F: FnMut() -> Option<String>,
{
    if let Some(name) = cached.filter(|n| validate_player_name(n).is_ok()) {
        return Some(name.to_string());
    }

    loop {
        let answer = ask()?;
        match validate_player_name(&answer) {
            Ok(name) => return Some(name.to_string()),
            Err(NameError::Empty) => return None,
            Err(e) => {
                log::debug!("Rejected player name {:?}: {}", answer, e);
                notifier.show(&e.to_string());
            }
        }
    }
}
