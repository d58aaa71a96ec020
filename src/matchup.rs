use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    round::InvalidEdit,
    side::{self, Player, Side, SideId},
    slot::Slot,
    status::Status,
};

/// An opaque match id. Ids from the tournament data source are kept as they
/// come; new ones are 32 random hex digits.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct MatchId(pub String);

impl MatchId {
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("{:032x}", rand::random::<u128>()))
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MatchId {
    type Err = anyhow::Error;

    fn from_str(string: &str) -> anyhow::Result<Self> {
        if string.is_empty() || string.contains(char::is_whitespace) {
            return Err(anyhow::Error::msg(format!(
                "Error trying to convert '{string}' to a MatchId!"
            )));
        }

        Ok(Self(string.to_string()))
    }
}

pub const DEFAULT_NUMBER_OF_LEGS: u8 = 5;
pub const DEFAULT_STARTING_SCORE: u16 = 501;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchOptions {
    pub number_of_legs: u8,
    pub starting_score: u16,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            number_of_legs: DEFAULT_NUMBER_OF_LEGS,
            starting_score: DEFAULT_STARTING_SCORE,
        }
    }
}

impl fmt::Display for MatchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "best of {}, starting at {}",
            self.number_of_legs, self.starting_score
        )
    }
}

/// A pairing within a round. A match without `side_b` is a bye.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: MatchId,
    pub side_a: SideId,
    #[serde(default)]
    pub side_b: Option<SideId>,
    #[serde(default)]
    pub score_a: Option<u16>,
    #[serde(default)]
    pub score_b: Option<u16>,
    #[serde(default)]
    pub sayg_id: Option<String>,
}

impl Match {
    #[must_use]
    pub fn new(side_a: SideId, side_b: SideId) -> Self {
        Self {
            id: MatchId::generate(),
            side_a,
            side_b: Some(side_b),
            score_a: None,
            score_b: None,
            sayg_id: None,
        }
    }

    #[must_use]
    pub fn bye(side_a: SideId) -> Self {
        Self {
            id: MatchId::generate(),
            side_a,
            side_b: None,
            score_a: None,
            score_b: None,
            sayg_id: None,
        }
    }

    #[must_use]
    pub fn is_bye(&self) -> bool {
        self.side_b.is_none()
    }

    #[must_use]
    pub fn status(&self) -> Status {
        let Some(side_b) = &self.side_b else {
            return Status::Decided(self.side_a.clone());
        };

        match (self.score_a, self.score_b) {
            (Some(a), Some(b)) if a > b => Status::Decided(self.side_a.clone()),
            (Some(a), Some(b)) if a < b => Status::Decided(side_b.clone()),
            (Some(_), Some(_)) => Status::Undecided,
            _ => Status::Unscored,
        }
    }

    #[must_use]
    pub fn loser(&self) -> Option<&SideId> {
        let side_b = self.side_b.as_ref()?;

        match (self.score_a, self.score_b) {
            (Some(a), Some(b)) if a > b => Some(side_b),
            (Some(a), Some(b)) if a < b => Some(&self.side_a),
            _ => None,
        }
    }

    #[must_use]
    pub fn side(&self, slot: Slot) -> Option<&SideId> {
        match slot {
            Slot::A => Some(&self.side_a),
            Slot::B => self.side_b.as_ref(),
        }
    }

    pub fn sides(&self) -> impl Iterator<Item = &SideId> {
        std::iter::once(&self.side_a).chain(self.side_b.as_ref())
    }

    #[must_use]
    pub fn involves(&self, side: &SideId) -> bool {
        self.sides().any(|id| id == side)
    }

    /// # Errors
    ///
    /// If the match is a bye, byes have nothing to score.
    pub fn set_score(&mut self, score_a: u16, score_b: u16) -> Result<(), InvalidEdit> {
        if self.is_bye() {
            return Err(InvalidEdit::ByeHasNoScore);
        }

        self.score_a = Some(score_a);
        self.score_b = Some(score_b);
        Ok(())
    }

    /// The two players a live scoring session can attribute throws to. Only
    /// singles matches have them: byes, pairs and teams do not.
    #[must_use]
    pub fn sayg_players<'a>(&self, sides: &'a [Side]) -> Option<[&'a Player; 2]> {
        let side_b = self.side_b.as_ref()?;
        let player_a = side::find(sides, &self.side_a)?.single_player()?;
        let player_b = side::find(sides, side_b)?.single_player()?;

        Some([player_a, player_b])
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(side_b) = &self.side_b else {
            return write!(f, "{} bye", self.side_a);
        };

        match (self.score_a, self.score_b) {
            (Some(a), Some(b)) => write!(f, "{} {a} - {b} {side_b}", self.side_a),
            _ => write!(f, "{} v {side_b}", self.side_a),
        }
    }
}
