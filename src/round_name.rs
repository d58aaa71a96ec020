use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum RoundName {
    Round(usize),
    QuarterFinal,
    SemiFinal,
    Final,
}

impl fmt::Display for RoundName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Round(depth) => write!(f, "Round {depth}"),
            Self::QuarterFinal => write!(f, "Quarter-Final"),
            Self::SemiFinal => write!(f, "Semi-Final"),
            Self::Final => write!(f, "Final"),
        }
    }
}

impl FromStr for RoundName {
    type Err = anyhow::Error;

    fn from_str(string: &str) -> anyhow::Result<Self> {
        match string {
            "Final" => Ok(Self::Final),
            "Semi-Final" => Ok(Self::SemiFinal),
            "Quarter-Final" => Ok(Self::QuarterFinal),
            _ => {
                if let Some(depth) = string.strip_prefix("Round ")
                    && let Ok(depth) = depth.parse::<usize>()
                    && depth > 0
                {
                    return Ok(Self::Round(depth));
                }

                Err(anyhow::Error::msg(format!(
                    "Error trying to convert '{string}' to a RoundName!"
                )))
            }
        }
    }
}

/// The number of single elimination rounds needed to get `sides` down to one
/// winner: `ceil(log2(sides))`.
#[must_use]
pub fn rounds_required(sides: usize) -> usize {
    let mut rounds = 0;
    let mut remaining = sides;

    // An odd pool sends one side through on a bye.
    while remaining > 1 {
        remaining = remaining.div_ceil(2);
        rounds += 1;
    }

    rounds
}

/// Names a round by counting backwards from the final. `depth` is 1-based
/// from the first round played.
///
/// Depths past the last required round, and tournaments too small to need
/// any round at all, are named "Final".
#[must_use]
pub fn round_name(total_sides: usize, depth: usize) -> RoundName {
    let rounds = rounds_required(total_sides);

    match rounds.saturating_sub(depth) {
        0 => RoundName::Final,
        1 => RoundName::SemiFinal,
        2 => RoundName::QuarterFinal,
        _ => RoundName::Round(depth),
    }
}
