use std::collections::{BTreeMap, HashMap};

use super::status::{MatchStatus, match_status};
use crate::model::{Match, PlayerRecord, Round, Side, StandingsSnapshot, TeamPoints};

/// Points each side would take if the match ended right now. A match with no
/// leader is shared.
#[must_use]
pub fn points_if_decided_now(points_value: f64, leader: Option<Side>) -> TeamPoints {
    let mut points = TeamPoints::default();
    match leader {
        Some(side) => points.add(side, points_value),
        None => {
            points.a = points_value / 2.0;
            points.b = points_value / 2.0;
        }
    }
    points
}

/// Splits points into finalized (closed matches) and projected (started but
/// open matches). Matches that have not started contribute nothing.
#[must_use]
pub fn aggregate<I>(entries: I) -> StandingsSnapshot
where
    I: IntoIterator<Item = (f64, MatchStatus)>,
{
    let mut snapshot = StandingsSnapshot::default();
    for (points_value, status) in entries {
        let points = points_if_decided_now(points_value, status.leader);
        let bucket = if status.closed {
            &mut snapshot.finalized
        } else if status.thru > 0 {
            &mut snapshot.projected
        } else {
            continue;
        };
        bucket.a += points.a;
        bucket.b += points.b;
    }
    snapshot
}

/// Pairs each match with the round it belongs to. A match whose round is
/// missing, or whose round is not part of `tournament_id` when one is given,
/// is left out.
pub fn matches_in_scope<'a>(
    rounds: &'a [Round],
    matches: &'a [Match],
    tournament_id: Option<&'a str>,
) -> impl Iterator<Item = (&'a Round, &'a Match)> + 'a {
    let by_id: HashMap<&str, &Round> = rounds.iter().map(|r| (r.id.as_str(), r)).collect();
    matches.iter().filter_map(move |m| {
        let round = by_id.get(m.round_id.as_str()).copied()?;
        match tournament_id {
            Some(tid) if round.tournament_id.as_deref() != Some(tid) => None,
            _ => Some((round, m)),
        }
    })
}

/// Recomputes every in-scope match and aggregates the result.
#[must_use]
pub fn aggregate_matches(
    rounds: &[Round],
    matches: &[Match],
    tournament_id: Option<&str>,
) -> StandingsSnapshot {
    aggregate(
        matches_in_scope(rounds, matches, tournament_id)
            .map(|(round, m)| (m.points_value, match_status(round.format, m))),
    )
}

/// Win/loss/halve records per player over the closed matches in scope.
#[must_use]
pub fn player_records(
    rounds: &[Round],
    matches: &[Match],
    tournament_id: Option<&str>,
) -> BTreeMap<String, PlayerRecord> {
    let mut records: BTreeMap<String, PlayerRecord> = BTreeMap::new();
    for (round, m) in matches_in_scope(rounds, matches, tournament_id) {
        let status = match_status(round.format, m);
        if !status.closed {
            continue;
        }
        for side in [Side::A, Side::B] {
            for player in m.roster(side) {
                let record = records.entry(player.player_id.clone()).or_default();
                match status.leader {
                    None => record.halves += 1,
                    Some(winner) if winner == side => record.wins += 1,
                    Some(_) => record.losses += 1,
                }
            }
        }
    }
    records
}
