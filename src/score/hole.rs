use serde::{Deserialize, Serialize};

use crate::model::{HOLES_PER_ROUND, HoleInput, Match, MatchPlayer, RoundFormat, Side};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoleWinner {
    #[serde(rename = "teamA")]
    A,
    #[serde(rename = "teamB")]
    B,
    #[serde(rename = "halved")]
    Halved,
    #[serde(rename = "undecided")]
    Undecided,
}

impl From<Side> for HoleWinner {
    fn from(side: Side) -> Self {
        match side {
            Side::A => HoleWinner::A,
            Side::B => HoleWinner::B,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HoleOutcome {
    pub hole: u8,
    pub net_a: Option<i16>,
    pub net_b: Option<i16>,
    pub winner: HoleWinner,
}

impl HoleOutcome {
    #[must_use]
    pub fn undecided(hole: u8) -> Self {
        Self {
            hole,
            net_a: None,
            net_b: None,
            winner: HoleWinner::Undecided,
        }
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.winner != HoleWinner::Undecided
    }

    fn compare(hole: u8, net_a: Option<i16>, net_b: Option<i16>) -> Self {
        let winner = match (net_a, net_b) {
            (Some(a), Some(b)) if a < b => HoleWinner::A,
            (Some(a), Some(b)) if a > b => HoleWinner::B,
            (Some(_), Some(_)) => HoleWinner::Halved,
            _ => HoleWinner::Undecided,
        };
        Self {
            hole,
            net_a,
            net_b,
            winner,
        }
    }
}

fn net_for(player: Option<&MatchPlayer>, gross: Option<u8>, hole: u8) -> Option<i16> {
    let gross = gross?;
    let strokes = player?.strokes_on(hole)?;
    Some(i16::from(gross) - i16::from(strokes))
}

/// Best net among the players who recorded a gross. `Err` when a recorded
/// gross has no roster entry or no allowance for `hole`.
fn best_net(
    roster: &[MatchPlayer],
    grosses: &[Option<u8>; 2],
    hole: u8,
) -> Result<Option<i16>, ()> {
    let mut best: Option<i16> = None;
    for (idx, gross) in grosses.iter().enumerate() {
        if gross.is_none() {
            continue;
        }
        let net = net_for(roster.get(idx), *gross, hole).ok_or(())?;
        best = Some(best.map_or(net, |b| b.min(net)));
    }
    Ok(best)
}

/// Resolves one hole of a match.
///
/// Never fails: a missing gross, an input whose shape does not belong to
/// `format`, or an allowance array that does not cover `hole` all leave the
/// hole undecided.
#[must_use]
pub fn resolve_hole(
    format: RoundFormat,
    input: Option<&HoleInput>,
    roster_a: &[MatchPlayer],
    roster_b: &[MatchPlayer],
    hole: u8,
) -> HoleOutcome {
    if !(1..=HOLES_PER_ROUND).contains(&hole) {
        return HoleOutcome::undecided(hole);
    }
    let Some(input) = input.filter(|i| i.fits(format)) else {
        return HoleOutcome::undecided(hole);
    };

    match input {
        HoleInput::Scramble {
            team_a_gross,
            team_b_gross,
        } => HoleOutcome::compare(
            hole,
            team_a_gross.map(i16::from),
            team_b_gross.map(i16::from),
        ),
        HoleInput::Singles {
            team_a_player_gross,
            team_b_player_gross,
        } => HoleOutcome::compare(
            hole,
            net_for(roster_a.first(), *team_a_player_gross, hole),
            net_for(roster_b.first(), *team_b_player_gross, hole),
        ),
        HoleInput::BestBall {
            team_a_players_gross,
            team_b_players_gross,
        } => match (
            best_net(roster_a, team_a_players_gross, hole),
            best_net(roster_b, team_b_players_gross, hole),
        ) {
            (Ok(net_a), Ok(net_b)) => HoleOutcome::compare(hole, net_a, net_b),
            _ => HoleOutcome::undecided(hole),
        },
    }
}

/// Outcomes for holes 1..=18 of the match's current snapshot.
#[must_use]
pub fn hole_outcomes(format: RoundFormat, m: &Match) -> [HoleOutcome; 18] {
    std::array::from_fn(|idx| {
        let hole = u8::try_from(idx + 1).unwrap_or(u8::MAX);
        resolve_hole(
            format,
            m.hole(hole),
            &m.team_a_players,
            &m.team_b_players,
            hole,
        )
    })
}
