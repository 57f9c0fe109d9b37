use std::collections::VecDeque;
use std::convert::Infallible;

use thiserror::Error;

use crate::MoveInput;
use crate::board::Color;
use crate::game::Command;

/// Error when parsing an input script.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid script entry: '{0}'")]
pub struct ScriptError(String);

/// A scriptable player input that replays queued lines.
///
/// Lines are handed out in order regardless of which side asks, the way a
/// hotseat terminal works. New script can be appended at any time.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    pending: VecDeque<String>,
}

impl ScriptedInput {
    /// Create with nothing queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and queue `script`.
    pub fn from_script(script: &str) -> Result<Self, ScriptError> {
        let mut input = Self::new();
        input.push_script(script)?;
        Ok(input)
    }

    /// Parse and queue additional script.
    ///
    /// Format:
    /// - Periods end an entry; each entry is one line of input
    /// - Whitespace inside an entry is kept (`"e2 e4."` is the move e2e4)
    /// - Empty entries are skipped
    ///
    /// Examples:
    /// - `"e2e4. e7e5."` - two moves
    /// - `"hint g1. g1f3."` - ask for a hint, then move
    /// - `"q."` - quit
    ///
    /// Nothing is queued if any entry is malformed.
    pub fn push_script(&mut self, script: &str) -> Result<(), ScriptError> {
        let lines = parse_script(script)?;
        self.pending.extend(lines);
        Ok(())
    }

    /// Number of lines not yet read.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl MoveInput for ScriptedInput {
    type Error = Infallible;

    fn next_line(&mut self, _side: Color) -> Result<Option<String>, Self::Error> {
        Ok(self.pending.pop_front())
    }
}

/// Split a script into input lines.
fn parse_script(script: &str) -> Result<Vec<String>, ScriptError> {
    script
        .split('.')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match Command::parse(entry) {
            Ok(_) => Ok(entry.to_owned()),
            Err(_) => Err(ScriptError(entry.to_owned())),
        })
        .collect()
}
