use std::{fs, path::Path};

use anyhow::Context;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    bracket::Bracket,
    matchup::{DEFAULT_NUMBER_OF_LEGS, DEFAULT_STARTING_SCORE, Match, MatchOptions},
    round::{MatchEntry, Round},
    side::Side,
};

/// A tournament as the server stores it: rounds chained through `nextRound`
/// and each round's options in a list beside its matches.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentDocument {
    #[serde(default)]
    pub sides: Vec<Side>,
    #[serde(default)]
    pub round: Option<RoundDocument>,
    #[serde(default = "default_best_of")]
    pub best_of: u8,
    #[serde(default = "default_starting_score")]
    pub starting_score: u16,
}

fn default_best_of() -> u8 {
    DEFAULT_NUMBER_OF_LEGS
}

fn default_starting_score() -> u16 {
    DEFAULT_STARTING_SCORE
}

impl Default for TournamentDocument {
    fn default() -> Self {
        Self {
            sides: Vec::new(),
            round: None,
            best_of: DEFAULT_NUMBER_OF_LEGS,
            starting_score: DEFAULT_STARTING_SCORE,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundDocument {
    #[serde(default)]
    pub matches: Vec<Match>,
    #[serde(default)]
    pub match_options: Vec<MatchOptions>,
    #[serde(default)]
    pub next_round: Option<Box<RoundDocument>>,
}

impl TournamentDocument {
    /// Reads a RON document, or JSON when the file ends in `.json`.
    ///
    /// # Errors
    ///
    /// If the file can't be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let string = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        let document = if is_json(path) {
            serde_json::from_str(&string)?
        } else {
            ron::from_str(&string)?
        };

        info!("loaded {}", path.display());
        Ok(document)
    }

    /// # Errors
    ///
    /// If the document can't be serialized or written.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let string = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?
        };

        fs::write(path, string).with_context(|| format!("failed to write {}", path.display()))?;
        info!("saved {}", path.display());

        Ok(())
    }

    #[must_use]
    pub fn defaults(&self) -> MatchOptions {
        MatchOptions {
            number_of_legs: self.best_of,
            starting_score: self.starting_score,
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|extension| extension == "json")
}

fn flatten(document: &RoundDocument, defaults: MatchOptions) -> Round {
    if document.match_options.len() > document.matches.len() {
        warn!(
            "dropping {} match options without a match",
            document.match_options.len() - document.matches.len()
        );
    }

    let entries = document
        .matches
        .iter()
        .enumerate()
        .map(|(index, matchup)| MatchEntry {
            matchup: matchup.clone(),
            options: document.match_options.get(index).copied().unwrap_or(defaults),
        })
        .collect();

    Round { entries }
}

impl From<&TournamentDocument> for Bracket {
    fn from(document: &TournamentDocument) -> Self {
        let defaults = document.defaults();
        let mut rounds = Vec::new();
        let mut next = document.round.as_ref();

        while let Some(round) = next {
            rounds.push(flatten(round, defaults));
            next = round.next_round.as_deref();
        }

        Self {
            sides: document.sides.clone(),
            rounds,
            defaults,
        }
    }
}

impl From<&Bracket> for TournamentDocument {
    fn from(bracket: &Bracket) -> Self {
        let mut chain: Option<Box<RoundDocument>> = None;

        for round in bracket.rounds.iter().rev() {
            chain = Some(Box::new(RoundDocument {
                matches: round.matches().cloned().collect(),
                match_options: round.entries.iter().map(|entry| entry.options).collect(),
                next_round: chain,
            }));
        }

        Self {
            sides: bracket.sides.clone(),
            round: chain.map(|round| *round),
            best_of: bracket.defaults.number_of_legs,
            starting_score: bracket.defaults.starting_score,
        }
    }
}
