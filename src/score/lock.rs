use super::status::{MatchStatus, match_status};
use crate::model::{HOLES_PER_ROUND, Match, Round};

/// Whether `hole` may be edited given an already computed status.
///
/// The round lock wins over everything. A closed match keeps the holes up to
/// its closing hole open for corrections; holes after it stay shut.
#[must_use]
pub fn hole_editable_with_status(round: &Round, status: &MatchStatus, hole: u8) -> bool {
    if !(1..=HOLES_PER_ROUND).contains(&hole) || round.locked {
        return false;
    }
    match (status.closed, status.closing_hole) {
        (true, Some(closing_hole)) => hole <= closing_hole,
        _ => true,
    }
}

/// Recomputes the match status from the snapshot and applies the lock rules.
#[must_use]
pub fn is_hole_editable(round: &Round, m: &Match, hole: u8) -> bool {
    hole_editable_with_status(round, &match_status(round.format, m), hole)
}

#[must_use]
pub fn editable_holes_with_status(round: &Round, status: &MatchStatus) -> Vec<u8> {
    (1..=HOLES_PER_ROUND)
        .filter(|hole| hole_editable_with_status(round, status, *hole))
        .collect()
}

#[must_use]
pub fn editable_holes(round: &Round, m: &Match) -> Vec<u8> {
    editable_holes_with_status(round, &match_status(round.format, m))
}
