use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use super::hole_input::HoleInput;

pub const HOLES_PER_ROUND: u8 = 18;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    #[serde(rename = "teamA")]
    A,
    #[serde(rename = "teamB")]
    B,
}

impl Side {
    #[must_use]
    pub fn opponent(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Side::A => "A",
            Side::B => "B",
        };
        write!(f, "{s}")
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum RoundFormat {
    #[serde(alias = "twoManBestBall")]
    BestBall,
    #[serde(alias = "twoManShamble")]
    Shamble,
    #[serde(alias = "twoManScramble")]
    Scramble,
    Singles,
}

impl RoundFormat {
    /// Players each side fields in this format.
    #[must_use]
    pub fn players_per_side(self) -> usize {
        match self {
            RoundFormat::Singles => 1,
            RoundFormat::BestBall | RoundFormat::Shamble | RoundFormat::Scramble => 2,
        }
    }
}

impl fmt::Display for RoundFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RoundFormat::BestBall => "bestBall",
            RoundFormat::Shamble => "shamble",
            RoundFormat::Scramble => "scramble",
            RoundFormat::Singles => "singles",
        };
        write!(f, "{s}")
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub display_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub handicap: Option<f32>,
}

impl Player {
    #[must_use]
    pub fn name(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.username.as_deref())
            .unwrap_or("Unknown")
    }
}

/// Ranked sub-groups of a team's players, keyed by tier label ("A", "B", ...).
pub type TierRoster = BTreeMap<String, Vec<String>>;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub roster_by_tier: TierRoster,
}

impl Team {
    pub fn player_ids(&self) -> impl Iterator<Item = &String> {
        self.roster_by_tier.values().flatten()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub active: bool,
    pub team_a: Team,
    pub team_b: Team,
}

impl Tournament {
    #[must_use]
    pub fn team(&self, side: Side) -> &Team {
        match side {
            Side::A => &self.team_a,
            Side::B => &self.team_b,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub id: String,
    #[serde(default)]
    pub tournament_id: Option<String>,
    #[serde(default)]
    pub day: Option<u32>,
    pub format: RoundFormat,
    #[serde(default)]
    pub locked: bool,
}

/// Rounds in display order: by day, then by id.
pub fn sort_rounds(rounds: &mut [Round]) {
    rounds.sort_by(|a, b| {
        a.day
            .unwrap_or(0)
            .cmp(&b.day.unwrap_or(0))
            .then_with(|| a.id.cmp(&b.id))
    });
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MatchPlayer {
    pub player_id: String,
    #[serde(default)]
    pub strokes_received: Vec<u8>,
}

impl MatchPlayer {
    /// Strokes given on `hole` (1-based). `None` when the allowance array does
    /// not reach that hole.
    #[must_use]
    pub fn strokes_on(&self, hole: u8) -> Option<u8> {
        let idx = usize::from(hole).checked_sub(1)?;
        self.strokes_received.get(idx).copied()
    }
}

fn default_points_value() -> f64 {
    1.0
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: String,
    pub round_id: String,
    #[serde(default)]
    pub team_a_players: Vec<MatchPlayer>,
    #[serde(default)]
    pub team_b_players: Vec<MatchPlayer>,
    #[serde(default = "default_points_value")]
    pub points_value: f64,
    #[serde(default)]
    pub holes: HashMap<u8, HoleInput>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Match {
    #[must_use]
    pub fn new(id: impl Into<String>, round_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            round_id: round_id.into(),
            team_a_players: Vec::new(),
            team_b_players: Vec::new(),
            points_value: default_points_value(),
            holes: HashMap::new(),
            updated_at: None,
        }
    }

    #[must_use]
    pub fn roster(&self, side: Side) -> &[MatchPlayer] {
        match side {
            Side::A => &self.team_a_players,
            Side::B => &self.team_b_players,
        }
    }

    #[must_use]
    pub fn hole(&self, hole: u8) -> Option<&HoleInput> {
        self.holes.get(&hole)
    }
}

/// Points a team holds across the matches in scope.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct TeamPoints {
    pub a: f64,
    pub b: f64,
}

impl TeamPoints {
    pub fn add(&mut self, side: Side, points: f64) {
        match side {
            Side::A => self.a += points,
            Side::B => self.b += points,
        }
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.a + self.b
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StandingsSnapshot {
    pub finalized: TeamPoints,
    pub projected: TeamPoints,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerRecord {
    pub wins: u32,
    pub losses: u32,
    pub halves: u32,
}

impl fmt::Display for PlayerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.wins, self.losses, self.halves)
    }
}
