use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::error::CoreError;
use crate::model::{Match, Player, Round, Tournament, check_hole_number};
use crate::storage::Storage;

/// Fixture format:
/// { "tournaments": [{ "id", "name", "active", "teamA": {...}, "teamB": {...} }]
/// , "players": [{ "id", "displayName" }]
/// , "rounds": [{ "id", "tournamentId", "day", "format", "locked" }]
/// , "matches": [{ "id", "roundId", "pointsValue", "teamAPlayers": [{ "playerId", "strokesReceived": [..18] }], "teamBPlayers": [..], "holes": { "1": { "kind": "singles", ... } } }]
/// }
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SeedData {
    #[serde(default)]
    pub tournaments: Vec<Tournament>,
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub rounds: Vec<Round>,
    #[serde(default)]
    pub matches: Vec<Match>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub tournaments: usize,
    pub players: usize,
    pub rounds: usize,
    pub matches: usize,
}

/// # Errors
/// Returns `CoreError::Parse` when the json does not have the fixture shape.
pub fn parse_seed(json: &Value) -> Result<SeedData, CoreError> {
    Ok(SeedData::deserialize(json)?)
}

/// Checks points values, hole numbers and that every stored hole fits its
/// round's format.
/// A match whose round is not in the fixture is accepted as is.
fn validate_seed(seed: &SeedData) -> Result<(), CoreError> {
    let rounds: HashMap<&str, &Round> = seed.rounds.iter().map(|r| (r.id.as_str(), r)).collect();
    for m in &seed.matches {
        if !m.points_value.is_finite() || m.points_value < 0.0 {
            return Err(CoreError::InvalidInput(format!(
                "match {}: points value {} must be a non-negative number",
                m.id, m.points_value
            )));
        }
        if let Some(round) = rounds.get(m.round_id.as_str()) {
            let expected = round.format.players_per_side();
            if m.team_a_players.len() != expected || m.team_b_players.len() != expected {
                tracing::warn!(
                    match_id = %m.id,
                    format = %round.format,
                    team_a = m.team_a_players.len(),
                    team_b = m.team_b_players.len(),
                    "roster size does not match round format"
                );
            }
        }
        for (hole, input) in &m.holes {
            check_hole_number(*hole)
                .map_err(|e| CoreError::InvalidInput(format!("match {}: {e}", m.id)))?;
            if let Some(round) = rounds.get(m.round_id.as_str()) {
                input
                    .validate(round.format)
                    .map_err(|e| CoreError::InvalidInput(format!("match {} hole {hole}: {e}", m.id)))?;
            }
        }
    }
    Ok(())
}

/// Writes the fixture into `storage`, replacing records with the same ids.
///
/// # Errors
/// Returns an error if validation or any storage write fails.
pub async fn seed_storage(storage: &dyn Storage, seed: &SeedData) -> Result<SeedSummary, CoreError> {
    validate_seed(seed)?;

    for tournament in &seed.tournaments {
        storage.put_tournament(tournament).await?;
    }
    for player in &seed.players {
        storage.put_player(player).await?;
    }
    for round in &seed.rounds {
        storage.put_round(round).await?;
    }
    for m in &seed.matches {
        storage.put_match(m).await?;
    }

    let summary = SeedSummary {
        tournaments: seed.tournaments.len(),
        players: seed.players.len(),
        rounds: seed.rounds.len(),
        matches: seed.matches.len(),
    };
    tracing::info!(?summary, "seeded storage");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_unknown_top_level_keys() {
        let err = parse_seed(&json!({ "bettors": [] })).unwrap_err();
        assert!(matches!(err, CoreError::Parse(_)));
    }

    #[test]
    fn rejects_hole_shape_that_does_not_fit_the_round() {
        let seed = parse_seed(&json!({
            "rounds": [{ "id": "r1", "tournamentId": "t1", "format": "singles" }],
            "matches": [{
                "id": "m1",
                "roundId": "r1",
                "holes": { "1": { "kind": "scramble", "teamAGross": 4, "teamBGross": 5 } }
            }]
        }))
        .unwrap();
        assert!(matches!(validate_seed(&seed), Err(CoreError::InvalidInput(_))));
    }

    #[test]
    fn rejects_negative_points_value() {
        let seed = parse_seed(&json!({
            "matches": [{ "id": "m1", "roundId": "r1", "pointsValue": -1.0 }]
        }))
        .unwrap();
        assert!(matches!(validate_seed(&seed), Err(CoreError::InvalidInput(_))));
    }

    #[test]
    fn rejects_non_finite_points_value() {
        let mut seed = parse_seed(&json!({
            "matches": [{ "id": "m1", "roundId": "r1" }]
        }))
        .unwrap();
        seed.matches[0].points_value = f64::NAN;
        assert!(matches!(validate_seed(&seed), Err(CoreError::InvalidInput(_))));
        seed.matches[0].points_value = 0.0;
        assert!(validate_seed(&seed).is_ok());
    }

    #[test]
    fn legacy_format_names_are_accepted() {
        let seed = parse_seed(&json!({
            "rounds": [{ "id": "r1", "format": "twoManBestBall" }]
        }))
        .unwrap();
        assert_eq!(seed.rounds[0].format, crate::model::RoundFormat::BestBall);
    }
}
