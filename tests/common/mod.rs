#![allow(dead_code)]

use rowdy_matchplay::model::{
    HoleInput, Match, MatchPlayer, Player, Round, RoundFormat, Team, TierRoster, Tournament,
};
use rowdy_matchplay::score::HoleWinner;
use rowdy_matchplay::seed::{SeedData, seed_storage};
use rowdy_matchplay::storage::Storage;

pub const TOURNAMENT_ID: &str = "t1";

pub fn scratch(id: &str) -> MatchPlayer {
    MatchPlayer {
        player_id: id.to_string(),
        strokes_received: vec![0; 18],
    }
}

fn team(id: &str, name: &str, tiers: &[(&str, &[&str])]) -> Team {
    let roster_by_tier: TierRoster = tiers
        .iter()
        .map(|(tier, ids)| {
            (
                (*tier).to_string(),
                ids.iter().map(|id| (*id).to_string()).collect(),
            )
        })
        .collect();
    Team {
        id: id.to_string(),
        name: name.to_string(),
        color: Some("#123456".to_string()),
        roster_by_tier,
    }
}

pub fn tournament() -> Tournament {
    Tournament {
        id: TOURNAMENT_ID.to_string(),
        name: "Rowdy Cup".to_string(),
        active: true,
        team_a: team("ta", "Aces", &[("A", &["a1"]), ("B", &["a2"])]),
        team_b: team("tb", "Bogeys", &[("A", &["b1"]), ("B", &["b2"])]),
    }
}

pub fn players() -> Vec<Player> {
    ["a1", "a2", "b1", "b2"]
        .iter()
        .map(|id| Player {
            id: (*id).to_string(),
            display_name: Some(format!("Player {id}")),
            username: None,
            handicap: Some(10.0),
        })
        .collect()
}

pub fn round(id: &str, format: RoundFormat, day: u32) -> Round {
    Round {
        id: id.to_string(),
        tournament_id: Some(TOURNAMENT_ID.to_string()),
        day: Some(day),
        format,
        locked: false,
    }
}

pub fn singles_match(id: &str, round_id: &str) -> Match {
    let mut m = Match::new(id, round_id);
    m.team_a_players = vec![scratch("a1")];
    m.team_b_players = vec![scratch("b1")];
    m
}

pub fn pairs_match(id: &str, round_id: &str) -> Match {
    let mut m = Match::new(id, round_id);
    m.team_a_players = vec![scratch("a1"), scratch("a2")];
    m.team_b_players = vec![scratch("b1"), scratch("b2")];
    m
}

pub fn singles(a: u8, b: u8) -> HoleInput {
    HoleInput::Singles {
        team_a_player_gross: Some(a),
        team_b_player_gross: Some(b),
    }
}

pub fn scramble(a: u8, b: u8) -> HoleInput {
    HoleInput::Scramble {
        team_a_gross: Some(a),
        team_b_gross: Some(b),
    }
}

/// Singles gross scores that produce `winner` between two scratch players.
pub fn singles_for(winner: HoleWinner) -> Option<HoleInput> {
    match winner {
        HoleWinner::A => Some(singles(3, 4)),
        HoleWinner::B => Some(singles(5, 4)),
        HoleWinner::Halved => Some(singles(4, 4)),
        HoleWinner::Undecided => None,
    }
}

/// Singles match whose hole `n` (1-based) ends as `winners[n - 1]`.
pub fn singles_with(id: &str, round_id: &str, winners: &[HoleWinner]) -> Match {
    let mut m = singles_match(id, round_id);
    for (idx, winner) in winners.iter().enumerate() {
        if let Some(input) = singles_for(*winner) {
            m.holes.insert(u8::try_from(idx + 1).unwrap(), input);
        }
    }
    m
}

pub fn repeat(winner: HoleWinner, n: usize) -> Vec<HoleWinner> {
    vec![winner; n]
}

/// Tournament t1 with a singles round r1 (match m1) and a scramble round r2
/// (match m2), all holes empty.
pub fn base_seed() -> SeedData {
    SeedData {
        tournaments: vec![tournament()],
        players: players(),
        rounds: vec![
            round("r1", RoundFormat::Singles, 1),
            round("r2", RoundFormat::Scramble, 2),
        ],
        matches: vec![singles_match("m1", "r1"), pairs_match("m2", "r2")],
    }
}

pub async fn seed(storage: &dyn Storage, data: &SeedData) {
    seed_storage(storage, data).await.expect("seed fixture");
}
