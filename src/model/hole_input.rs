use serde::{Deserialize, Serialize};

use super::types::{HOLES_PER_ROUND, RoundFormat};
use crate::error::CoreError;

/// Raw strokes entered for one hole. The variant has to agree with the round
/// format; best-ball and shamble rounds share the two-ball shape.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum HoleInput {
    Scramble {
        #[serde(default)]
        team_a_gross: Option<u8>,
        #[serde(default)]
        team_b_gross: Option<u8>,
    },
    Singles {
        #[serde(default)]
        team_a_player_gross: Option<u8>,
        #[serde(default)]
        team_b_player_gross: Option<u8>,
    },
    BestBall {
        #[serde(default)]
        team_a_players_gross: [Option<u8>; 2],
        #[serde(default)]
        team_b_players_gross: [Option<u8>; 2],
    },
}

impl HoleInput {
    #[must_use]
    pub fn empty_for(format: RoundFormat) -> Self {
        match format {
            RoundFormat::Scramble => HoleInput::Scramble {
                team_a_gross: None,
                team_b_gross: None,
            },
            RoundFormat::Singles => HoleInput::Singles {
                team_a_player_gross: None,
                team_b_player_gross: None,
            },
            RoundFormat::BestBall | RoundFormat::Shamble => HoleInput::BestBall {
                team_a_players_gross: [None, None],
                team_b_players_gross: [None, None],
            },
        }
    }

    #[must_use]
    pub fn fits(&self, format: RoundFormat) -> bool {
        matches!(
            (self, format),
            (HoleInput::Scramble { .. }, RoundFormat::Scramble)
                | (HoleInput::Singles { .. }, RoundFormat::Singles)
                | (
                    HoleInput::BestBall { .. },
                    RoundFormat::BestBall | RoundFormat::Shamble
                )
        )
    }

    fn grosses(&self) -> Vec<Option<u8>> {
        match self {
            HoleInput::Scramble {
                team_a_gross,
                team_b_gross,
            } => vec![*team_a_gross, *team_b_gross],
            HoleInput::Singles {
                team_a_player_gross,
                team_b_player_gross,
            } => vec![*team_a_player_gross, *team_b_player_gross],
            HoleInput::BestBall {
                team_a_players_gross,
                team_b_players_gross,
            } => team_a_players_gross
                .iter()
                .chain(team_b_players_gross.iter())
                .copied()
                .collect(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grosses().iter().all(Option::is_none)
    }

    /// Checks an edit before it reaches the store.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidInput` when the shape does not match the
    /// round format or a recorded gross is zero.
    pub fn validate(&self, format: RoundFormat) -> Result<(), CoreError> {
        if !self.fits(format) {
            return Err(CoreError::InvalidInput(format!(
                "hole input shape does not match round format {format}"
            )));
        }
        if self.grosses().iter().flatten().any(|g| *g == 0) {
            return Err(CoreError::InvalidInput(
                "gross score must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// # Errors
/// Returns `CoreError::InvalidInput` for a hole outside 1..=18.
pub fn check_hole_number(hole: u8) -> Result<(), CoreError> {
    if (1..=HOLES_PER_ROUND).contains(&hole) {
        Ok(())
    } else {
        Err(CoreError::InvalidInput(format!(
            "hole number {hole} is outside 1..={HOLES_PER_ROUND}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_json_round_trips_with_camel_case_fields() {
        let json = r#"{"kind":"singles","teamAPlayerGross":4,"teamBPlayerGross":null}"#;
        let input: HoleInput = serde_json::from_str(json).unwrap();
        assert_eq!(
            input,
            HoleInput::Singles {
                team_a_player_gross: Some(4),
                team_b_player_gross: None
            }
        );
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let json = r#"{"kind":"foursomes","teamAGross":4}"#;
        assert!(serde_json::from_str::<HoleInput>(json).is_err());
    }

    #[test]
    fn shamble_accepts_two_ball_shape() {
        let input = HoleInput::empty_for(RoundFormat::Shamble);
        assert!(input.validate(RoundFormat::Shamble).is_ok());
        assert!(input.validate(RoundFormat::BestBall).is_ok());
        assert!(input.validate(RoundFormat::Singles).is_err());
    }

    #[test]
    fn zero_gross_is_rejected() {
        let input = HoleInput::Scramble {
            team_a_gross: Some(0),
            team_b_gross: Some(4),
        };
        assert!(matches!(
            input.validate(RoundFormat::Scramble),
            Err(CoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn hole_numbers_outside_round_are_rejected() {
        assert!(check_hole_number(0).is_err());
        assert!(check_hole_number(1).is_ok());
        assert!(check_hole_number(18).is_ok());
        assert!(check_hole_number(19).is_err());
    }
}
