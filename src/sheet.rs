use std::fmt;

use crate::{
    bracket::Bracket,
    matchup::Match,
    round::Round,
    round_name::RoundName,
    side::{self, Side, SideId},
    status::Status,
};

const EMPTY_SLOT: &str = "________";

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SheetSlot {
    Side(String),
    /// A side still to be decided by the named match.
    Pending(String),
    Empty,
}

impl fmt::Display for SheetSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Side(name) => write!(f, "{name}"),
            Self::Pending(matchup) => write!(f, "Winner of {matchup}"),
            Self::Empty => write!(f, "{EMPTY_SLOT}"),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SheetMatch {
    pub side_a: SheetSlot,
    /// `None` for a bye.
    pub side_b: Option<SheetSlot>,
    pub score_a: Option<u16>,
    pub score_b: Option<u16>,
}

impl SheetMatch {
    fn pair(side_a: SheetSlot, side_b: Option<SheetSlot>) -> Self {
        Self {
            side_a,
            side_b,
            score_a: None,
            score_b: None,
        }
    }

    #[must_use]
    pub fn is_bye(&self) -> bool {
        self.side_b.is_none()
    }
}

impl fmt::Display for SheetMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(side_b) = &self.side_b else {
            return write!(f, "{} (bye)", self.side_a);
        };

        match (self.score_a, self.score_b) {
            (Some(a), Some(b)) => write!(f, "{} {a} - {b} {side_b}", self.side_a),
            _ => write!(f, "{} v {side_b}", self.side_a),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SheetRound {
    pub name: RoundName,
    pub matches: Vec<SheetMatch>,
}

/// The printable bracket: every round from the first to the final, with the
/// rounds not yet played projected from the ones that were.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Sheet {
    pub rounds: Vec<SheetRound>,
    pub winner: Option<String>,
}

fn name_of(sides: &[Side], id: &SideId) -> String {
    side::find(sides, id).map_or_else(|| id.to_string(), |side| side.name.clone())
}

fn describe(sides: &[Side], matchup: &Match) -> String {
    match &matchup.side_b {
        Some(side_b) => format!(
            "{} v {}",
            name_of(sides, &matchup.side_a),
            name_of(sides, side_b)
        ),
        None => name_of(sides, &matchup.side_a),
    }
}

fn played(sides: &[Side], round: &Round) -> Vec<SheetMatch> {
    round
        .matches()
        .map(|matchup| SheetMatch {
            side_a: SheetSlot::Side(name_of(sides, &matchup.side_a)),
            side_b: matchup
                .side_b
                .as_ref()
                .map(|side_b| SheetSlot::Side(name_of(sides, side_b))),
            score_a: matchup.score_a,
            score_b: matchup.score_b,
        })
        .collect()
}

/// What the round after `round` will be drawn from, as far as it is known.
fn entrants_after(sides: &[Side], round: &Round, pool: &[Side]) -> Vec<SheetSlot> {
    let assigned = round.assigned_sides();
    let mut entrants: Vec<SheetSlot> = pool
        .iter()
        .filter(|side| !assigned.contains(&side.id))
        .map(|side| SheetSlot::Side(side.name.clone()))
        .collect();

    for matchup in round.matches() {
        entrants.push(match matchup.status() {
            Status::Decided(winner) => SheetSlot::Side(name_of(sides, &winner)),
            Status::Unscored | Status::Undecided => SheetSlot::Pending(describe(sides, matchup)),
        });
    }

    entrants
}

fn pair(entrants: Vec<SheetSlot>) -> Vec<SheetMatch> {
    let mut matches = Vec::with_capacity(entrants.len().div_ceil(2));
    let mut entrants = entrants.into_iter();

    while let Some(side_a) = entrants.next() {
        matches.push(SheetMatch::pair(side_a, entrants.next()));
    }

    matches
}

impl Sheet {
    #[must_use]
    pub fn new(bracket: &Bracket) -> Self {
        let mut rounds = Vec::new();
        let mut entrants: Vec<SheetSlot> = bracket
            .sides
            .iter()
            .map(|side| SheetSlot::Side(side.name.clone()))
            .collect();

        for (index, round) in bracket.rounds.iter().enumerate() {
            let depth = index + 1;
            let pool = bracket.pool(depth);

            if round.is_empty() {
                entrants = pool
                    .iter()
                    .map(|side| SheetSlot::Side(side.name.clone()))
                    .collect();
                break;
            }

            rounds.push(SheetRound {
                name: bracket.round_name(depth),
                matches: played(&bracket.sides, round),
            });
            entrants = entrants_after(&bracket.sides, round, &pool);
        }

        // Only the first projected round knows who it is waiting for.
        while entrants.len() > 1 {
            let depth = rounds.len() + 1;
            let matches = pair(entrants);
            entrants = vec![SheetSlot::Empty; matches.len()];

            rounds.push(SheetRound {
                name: bracket.round_name(depth),
                matches,
            });
        }

        Self {
            rounds,
            winner: bracket.winner().map(|side| side.name),
        }
    }
}

impl fmt::Display for Sheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for round in &self.rounds {
            writeln!(f, "{}", round.name)?;
            for matchup in &round.matches {
                writeln!(f, "    {matchup}")?;
            }
        }

        if let Some(winner) = &self.winner {
            writeln!(f, "Winner: {winner}")?;
        }

        Ok(())
    }
}
