use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::Serialize;

use super::hole::{HoleOutcome, hole_outcomes};
use super::lock::{editable_holes_with_status, hole_editable_with_status};
use super::standings::{aggregate_matches, player_records};
use super::status::{MatchState, MatchStatus, compute_status};
use crate::error::CoreError;
use crate::model::{
    HoleInput, Match, Round, RoundFormat, Side, StandingsSnapshot, Team, Tournament,
    check_hole_number, format_last_updated, sort_rounds,
};
use crate::storage::Storage;

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MatchReport {
    pub match_id: String,
    pub round_id: String,
    pub format: Option<RoundFormat>,
    pub state: MatchState,
    pub status: Option<MatchStatus>,
    pub result: Option<String>,
    pub holes: Vec<HoleOutcome>,
    pub editable_holes: Vec<u8>,
    pub points_value: f64,
    pub updated_at: Option<DateTime<Utc>>,
    pub last_updated: String,
}

/// Derives everything a scorer needs for one match. Without a round the
/// format is unknown, so the report carries `MatchState::Unknown` and no
/// status instead of failing.
#[must_use]
pub fn build_match_report(round: Option<&Round>, m: &Match, now: DateTime<Utc>) -> MatchReport {
    let last_updated = format_last_updated(m.updated_at, now);
    let Some(round) = round else {
        return MatchReport {
            match_id: m.id.clone(),
            round_id: m.round_id.clone(),
            format: None,
            state: MatchState::Unknown,
            status: None,
            result: None,
            holes: Vec::new(),
            editable_holes: Vec::new(),
            points_value: m.points_value,
            updated_at: m.updated_at,
            last_updated,
        };
    };

    let holes = hole_outcomes(round.format, m);
    let status = compute_status(&holes);
    let editable_holes = editable_holes_with_status(round, &status);
    MatchReport {
        match_id: m.id.clone(),
        round_id: m.round_id.clone(),
        format: Some(round.format),
        state: status.state(),
        status: Some(status),
        result: status.closed.then(|| status.result_label()),
        holes: holes.to_vec(),
        editable_holes,
        points_value: m.points_value,
        updated_at: m.updated_at,
        last_updated,
    }
}

/// # Errors
/// Returns `CoreError::NotFound` when the match does not exist, or a storage
/// error.
pub async fn load_match_report(
    storage: &dyn Storage,
    match_id: &str,
) -> Result<MatchReport, CoreError> {
    let m = storage
        .get_match(match_id)
        .await?
        .ok_or_else(|| CoreError::NotFound(format!("match {match_id}")))?;
    let round = storage.get_round(&m.round_id).await?;
    Ok(build_match_report(round.as_ref(), &m, Utc::now()))
}

/// Validates and stores one hole edit, then recomputes the match.
///
/// A rejected edit leaves the stored hole untouched.
///
/// # Errors
/// `InvalidInput` for a bad hole number or an input that does not fit the
/// round format, `MissingReference` when the match's round is gone, `Locked`
/// when the lock rules refuse the hole, `NotFound` for an unknown match.
pub async fn apply_hole_edit(
    storage: &dyn Storage,
    match_id: &str,
    hole: u8,
    input: HoleInput,
) -> Result<MatchReport, CoreError> {
    check_hole_number(hole)?;
    let m = storage
        .get_match(match_id)
        .await?
        .ok_or_else(|| CoreError::NotFound(format!("match {match_id}")))?;
    let round = storage.get_round(&m.round_id).await?.ok_or_else(|| {
        CoreError::MissingReference(format!("round {} of match {match_id}", m.round_id))
    })?;
    input.validate(round.format)?;

    let before = compute_status(&hole_outcomes(round.format, &m));
    if !hole_editable_with_status(&round, &before, hole) {
        tracing::warn!(%match_id, hole, round_locked = round.locked, "rejected edit on locked hole");
        return Err(CoreError::Locked {
            match_id: match_id.to_string(),
            hole,
        });
    }

    let updated = storage.apply_hole_edit(match_id, hole, input).await?;
    let report = build_match_report(Some(&round), &updated, Utc::now());
    if let Some(after) = report.status {
        if before.closed && !after.closed {
            tracing::info!(%match_id, hole, "match reopened by correction");
        } else if !before.closed && after.closed {
            tracing::info!(%match_id, result = %after.result_label(), "match closed");
        }
        tracing::debug!(%match_id, hole, thru = after.thru, margin = after.margin, "hole edit applied");
    }
    Ok(report)
}

/// # Errors
/// Returns `CoreError::NotFound` when the round does not exist.
pub async fn set_round_lock(
    storage: &dyn Storage,
    round_id: &str,
    locked: bool,
) -> Result<Round, CoreError> {
    storage.set_round_locked(round_id, locked).await?;
    tracing::info!(%round_id, locked, "round lock changed");
    storage
        .get_round(round_id)
        .await?
        .ok_or_else(|| CoreError::NotFound(format!("round {round_id}")))
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub match_id: String,
    pub state: MatchState,
    pub status: MatchStatus,
    pub label: String,
    pub points_value: f64,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RoundReport {
    pub round: Round,
    pub matches: Vec<MatchSummary>,
    pub standings: StandingsSnapshot,
}

fn team_names(tournament: Option<&Tournament>) -> (String, String) {
    match tournament {
        Some(t) => (t.team_a.name.clone(), t.team_b.name.clone()),
        None => ("Team A".to_string(), "Team B".to_string()),
    }
}

fn round_report(round: Round, matches: &[Match], tournament: Option<&Tournament>) -> RoundReport {
    let (name_a, name_b) = team_names(tournament);
    let summaries = matches
        .iter()
        .map(|m| {
            let status = compute_status(&hole_outcomes(round.format, m));
            MatchSummary {
                match_id: m.id.clone(),
                state: status.state(),
                status,
                label: status.summary_label(&name_a, &name_b),
                points_value: m.points_value,
            }
        })
        .collect();
    let standings = aggregate_matches(std::slice::from_ref(&round), matches, None);
    RoundReport {
        round,
        matches: summaries,
        standings,
    }
}

/// # Errors
/// Returns `CoreError::NotFound` when the round does not exist.
pub async fn load_round_report(
    storage: &dyn Storage,
    round_id: &str,
) -> Result<RoundReport, CoreError> {
    let round = storage
        .get_round(round_id)
        .await?
        .ok_or_else(|| CoreError::NotFound(format!("round {round_id}")))?;
    let tournament = match round.tournament_id.as_deref() {
        Some(tid) => storage.get_tournament(tid).await?,
        None => None,
    };
    let matches = storage.matches_for_round(round_id).await?;
    Ok(round_report(round, &matches, tournament.as_ref()))
}

async fn resolve_tournament(
    storage: &dyn Storage,
    tournament_id: Option<&str>,
) -> Result<Tournament, CoreError> {
    let tournament = match tournament_id {
        Some(tid) => storage.get_tournament(tid).await?,
        None => storage.active_tournament().await?,
    };
    tournament.ok_or_else(|| match tournament_id {
        Some(tid) => CoreError::NotFound(format!("tournament {tid}")),
        None => CoreError::NotFound("no active tournament".to_string()),
    })
}

async fn load_tournament_matches(
    storage: &dyn Storage,
    tournament_id: &str,
) -> Result<(Vec<Round>, Vec<Vec<Match>>), CoreError> {
    let mut rounds = storage.rounds_for_tournament(tournament_id).await?;
    sort_rounds(&mut rounds);
    let matches = try_join_all(rounds.iter().map(|r| storage.matches_for_round(&r.id))).await?;
    Ok((rounds, matches))
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TournamentStandings {
    pub tournament: Tournament,
    pub standings: StandingsSnapshot,
    pub rounds: Vec<RoundReport>,
}

/// Standings for `tournament_id`, or for the active tournament when `None`.
///
/// # Errors
/// Returns `CoreError::NotFound` when no such tournament exists.
pub async fn load_standings(
    storage: &dyn Storage,
    tournament_id: Option<&str>,
) -> Result<TournamentStandings, CoreError> {
    let tournament = resolve_tournament(storage, tournament_id).await?;
    let (rounds, matches_by_round) = load_tournament_matches(storage, &tournament.id).await?;

    let all_matches: Vec<Match> = matches_by_round.iter().flatten().cloned().collect();
    let standings = aggregate_matches(&rounds, &all_matches, Some(&tournament.id));
    let rounds = rounds
        .into_iter()
        .zip(matches_by_round.iter())
        .map(|(round, matches)| round_report(round, matches, Some(&tournament)))
        .collect();

    Ok(TournamentStandings {
        tournament,
        standings,
        rounds,
    })
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RosterPlayer {
    pub player_id: String,
    pub name: String,
    pub handicap: Option<f32>,
    pub record: String,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RosterTier {
    pub tier: String,
    pub players: Vec<RosterPlayer>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TeamRoster {
    pub side: Side,
    pub name: String,
    pub color: Option<String>,
    pub tiers: Vec<RosterTier>,
}

/// Tier rosters of both teams with each player's record in this tournament.
///
/// # Errors
/// Returns `CoreError::NotFound` when no such tournament exists.
pub async fn load_teams(
    storage: &dyn Storage,
    tournament_id: Option<&str>,
) -> Result<Vec<TeamRoster>, CoreError> {
    let tournament = resolve_tournament(storage, tournament_id).await?;
    let (rounds, matches_by_round) = load_tournament_matches(storage, &tournament.id).await?;
    let all_matches: Vec<Match> = matches_by_round.into_iter().flatten().collect();
    let records = player_records(&rounds, &all_matches, Some(&tournament.id));

    let player_ids: Vec<String> = tournament
        .team_a
        .player_ids()
        .chain(tournament.team_b.player_ids())
        .cloned()
        .collect();
    let players = storage.get_players(&player_ids).await?;

    let roster = |side: Side, team: &Team| TeamRoster {
        side,
        name: team.name.clone(),
        color: team.color.clone(),
        tiers: team
            .roster_by_tier
            .iter()
            .filter(|(_, ids)| !ids.is_empty())
            .map(|(tier, ids)| RosterTier {
                tier: tier.clone(),
                players: ids
                    .iter()
                    .map(|id| {
                        let player = players.iter().find(|p| &p.id == id);
                        RosterPlayer {
                            player_id: id.clone(),
                            name: player.map_or("Unknown", |p| p.name()).to_string(),
                            handicap: player.and_then(|p| p.handicap),
                            record: records.get(id).copied().unwrap_or_default().to_string(),
                        }
                    })
                    .collect(),
            })
            .collect(),
    };

    Ok(vec![
        roster(Side::A, &tournament.team_a),
        roster(Side::B, &tournament.team_b),
    ])
}
