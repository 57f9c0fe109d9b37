//! Game results reported by the players themselves.
//!
//! Neither peer is trusted on its own: a result only counts once both
//! players have reported the same winner and loser.

use std::collections::HashMap;

use crate::relay::RelayOutcome;

/// One player's claim about how a game ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameReport {
    pub winner: String,
    pub loser: String,
    /// Who sent the report; must be the winner or the loser.
    pub reporter: String,
}

impl GameReport {
    /// Report from `us` about a game against `them`.
    pub fn new(us: &str, them: &str, won: bool) -> Self {
        let (winner, loser) = if won { (us, them) } else { (them, us) };
        Self {
            winner: winner.to_owned(),
            loser: loser.to_owned(),
            reporter: us.to_owned(),
        }
    }

    /// Report for a finished relayed game. `None` when nobody won.
    pub fn from_outcome(us: &str, them: &str, outcome: &RelayOutcome) -> Option<Self> {
        outcome.local_won().map(|won| Self::new(us, them, won))
    }

    fn agrees_with(&self, other: &GameReport) -> bool {
        self.reporter != other.reporter && self.winner == other.winner && self.loser == other.loser
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportError {
    #[error("{0} cannot play against themselves")]
    SelfMatch(String),
    #[error("{0} did not play in the reported game")]
    NotAParticipant(String),
}

/// Result of submitting a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// Waiting for the opponent's matching report.
    Pending,
    /// Both players agree; the scoreboard was updated.
    Confirmed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    pub wins: u32,
    pub losses: u32,
}

/// Pending reports and the scoreboard they feed.
#[derive(Debug, Default)]
pub struct ResultLedger {
    /// Unmatched reports keyed by reporter.
    pending: HashMap<String, GameReport>,
    scores: HashMap<String, Score>,
}

impl ResultLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Submit a report.
    ///
    /// A later report from the same reporter replaces their pending one.
    pub fn submit(&mut self, report: GameReport) -> Result<Verification, ReportError> {
        if report.winner == report.loser {
            return Err(ReportError::SelfMatch(report.winner));
        }
        if report.reporter != report.winner && report.reporter != report.loser {
            return Err(ReportError::NotAParticipant(report.reporter));
        }

        let matching = self
            .pending
            .iter()
            .find(|(_, pending)| pending.agrees_with(&report))
            .map(|(reporter, _)| reporter.clone());

        let Some(other) = matching else {
            log::debug!(
                "{} reported {} beat {}, awaiting confirmation",
                report.reporter,
                report.winner,
                report.loser
            );
            self.pending.insert(report.reporter.clone(), report);
            return Ok(Verification::Pending);
        };

        self.pending.remove(&other);
        self.pending.remove(&report.reporter);
        self.scores.entry(report.winner.clone()).or_default().wins += 1;
        self.scores.entry(report.loser.clone()).or_default().losses += 1;
        log::info!("confirmed {} beat {}", report.winner, report.loser);
        Ok(Verification::Confirmed)
    }

    /// Drop an unconfirmed report, e.g. when the opponent never answers.
    pub fn withdraw(&mut self, reporter: &str) -> Option<GameReport> {
        self.pending.remove(reporter)
    }

    /// Score of a player with at least one confirmed game.
    pub fn score(&self, player: &str) -> Option<Score> {
        self.scores.get(player).copied()
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}
