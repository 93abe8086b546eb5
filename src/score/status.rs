use serde::{Deserialize, Serialize};
use std::fmt;

use super::hole::{HoleOutcome, HoleWinner, hole_outcomes};
use crate::model::{HOLES_PER_ROUND, Match, RoundFormat, Side};

/// Live state of a match, recomputed from its hole outcomes on every call.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MatchStatus {
    pub leader: Option<Side>,
    pub margin: u8,
    pub thru: u8,
    pub dormie: bool,
    pub closed: bool,
    pub closing_hole: Option<u8>,
    pub holes_won_a: u8,
    pub holes_won_b: u8,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum MatchState {
    NotStarted,
    InProgress,
    Dormie,
    Closed,
    /// The match points at a round that does not exist, so its format and
    /// therefore its status cannot be known.
    Unknown,
}

impl fmt::Display for MatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MatchState::NotStarted => "not started",
            MatchState::InProgress => "in progress",
            MatchState::Dormie => "dormie",
            MatchState::Closed => "final",
            MatchState::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

/// Folds hole outcomes (index 0 is hole 1) into a match status.
///
/// Only the contiguous run of resolved holes starting at hole 1 counts; the
/// first undecided hole ends it even when later holes are filled in. The match
/// closes at the first prefix length where the margin exceeds the holes left,
/// or after 18 resolved holes. The scan keeps going past that point so `thru`
/// and `margin` describe the whole resolved prefix.
#[must_use]
pub fn compute_status(outcomes: &[HoleOutcome]) -> MatchStatus {
    let mut won_a: u8 = 0;
    let mut won_b: u8 = 0;
    let mut thru: u8 = 0;
    let mut closing_hole = None;

    for outcome in outcomes.iter().take(usize::from(HOLES_PER_ROUND)) {
        match outcome.winner {
            HoleWinner::A => won_a += 1,
            HoleWinner::B => won_b += 1,
            HoleWinner::Halved => {}
            HoleWinner::Undecided => break,
        }
        thru += 1;

        let margin = won_a.abs_diff(won_b);
        if closing_hole.is_none() && (margin > HOLES_PER_ROUND - thru || thru == HOLES_PER_ROUND) {
            closing_hole = Some(thru);
        }
    }

    let margin = won_a.abs_diff(won_b);
    let closed = closing_hole.is_some();
    let leader = match won_a.cmp(&won_b) {
        std::cmp::Ordering::Greater => Some(Side::A),
        std::cmp::Ordering::Less => Some(Side::B),
        std::cmp::Ordering::Equal => None,
    };

    MatchStatus {
        leader,
        margin,
        thru,
        dormie: !closed && margin > 0 && margin == HOLES_PER_ROUND - thru,
        closed,
        closing_hole,
        holes_won_a: won_a,
        holes_won_b: won_b,
    }
}

/// Resolves every hole of the match's current snapshot and folds the result.
#[must_use]
pub fn match_status(format: RoundFormat, m: &Match) -> MatchStatus {
    compute_status(&hole_outcomes(format, m))
}

impl MatchStatus {
    #[must_use]
    pub fn state(&self) -> MatchState {
        if self.closed {
            MatchState::Closed
        } else if self.dormie {
            MatchState::Dormie
        } else if self.thru > 0 {
            MatchState::InProgress
        } else {
            MatchState::NotStarted
        }
    }

    #[must_use]
    pub fn holes_remaining(&self) -> u8 {
        HOLES_PER_ROUND - self.thru
    }

    /// Match-play score: "AS", "3 up", or "4&3" once the match is over early.
    #[must_use]
    pub fn result_label(&self) -> String {
        match self.leader {
            None => "AS".to_string(),
            Some(_) if self.closed && self.holes_remaining() > 0 => {
                format!("{}&{}", self.margin, self.holes_remaining())
            }
            Some(_) => format!("{} up", self.margin),
        }
    }

    /// One-line summary for a match list, e.g. "Aces 2 (11)", "AS (4)",
    /// "Aces 4&3 (F)" or "—" before the first hole.
    #[must_use]
    pub fn summary_label(&self, team_a: &str, team_b: &str) -> String {
        if self.thru == 0 {
            return "—".to_string();
        }
        let score = match self.leader {
            None => "AS".to_string(),
            Some(side) => {
                let name = match side {
                    Side::A => team_a,
                    Side::B => team_b,
                };
                if self.closed {
                    format!("{name} {}", self.result_label())
                } else {
                    format!("{name} {}", self.margin)
                }
            }
        };
        if self.closed {
            format!("{score} (F)")
        } else {
            format!("{score} ({})", self.thru)
        }
    }
}
