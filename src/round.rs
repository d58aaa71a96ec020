use std::fmt;

use log::{debug, trace, warn};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    matchup::{Match, MatchOptions},
    side::{self, Side, SideId},
    status::Status,
};

/// A match and the options it is played under.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct MatchEntry {
    pub matchup: Match,
    pub options: MatchOptions,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Round {
    pub entries: Vec<MatchEntry>,
}

impl Round {
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn matches(&self) -> impl Iterator<Item = &Match> {
        self.entries.iter().map(|entry| &entry.matchup)
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&MatchEntry> {
        self.entries.get(index)
    }

    /// Every side committed to a match in this round.
    #[must_use]
    pub fn assigned_sides(&self) -> FxHashSet<&SideId> {
        self.matches().flat_map(Match::sides).collect()
    }

    #[must_use]
    pub fn is_assigned(&self, side: &SideId) -> bool {
        self.matches().any(|matchup| matchup.involves(side))
    }

    /// A round is complete once it has matches and every one of them has a
    /// winner. Byes always have one.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.is_empty() && self.matches().all(|matchup| matchup.status().is_decided())
    }

    /// # Errors
    ///
    /// If a side is missing, both slots hold the same side, or a side already
    /// plays another match in this round.
    pub fn add_match(
        &mut self,
        side_a: Option<SideId>,
        side_b: Option<SideId>,
        options: MatchOptions,
    ) -> Result<usize, InvalidEdit> {
        let (Some(side_a), Some(side_b)) = (side_a, side_b) else {
            return Err(InvalidEdit::SidesNotSelected);
        };

        if side_a == side_b {
            return Err(InvalidEdit::SameSide(side_a));
        }

        for side in [&side_a, &side_b] {
            if self.is_assigned(side) {
                return Err(InvalidEdit::SideAlreadyAssigned(side.clone()));
            }
        }

        let matchup = Match::new(side_a, side_b);
        debug!("add match {matchup} ({})", matchup.id);

        self.entries.push(MatchEntry { matchup, options });
        Ok(self.entries.len() - 1)
    }

    /// Adds a bye for `side`, used when seeding an odd pool.
    ///
    /// # Errors
    ///
    /// If the side already plays in this round.
    pub fn add_bye(&mut self, side: SideId, options: MatchOptions) -> Result<usize, InvalidEdit> {
        if self.is_assigned(&side) {
            return Err(InvalidEdit::SideAlreadyAssigned(side));
        }

        let matchup = Match::bye(side);
        debug!("add bye {matchup}");

        self.entries.push(MatchEntry { matchup, options });
        Ok(self.entries.len() - 1)
    }

    /// Removes the match at `index` along with its options.
    ///
    /// # Errors
    ///
    /// If there is no match at `index`.
    pub fn remove_match(&mut self, index: usize) -> Result<MatchEntry, InvalidEdit> {
        if index >= self.entries.len() {
            return Err(InvalidEdit::NoSuchMatch(index));
        }

        let entry = self.entries.remove(index);
        debug!("remove match {} ({})", entry.matchup, entry.matchup.id);

        Ok(entry)
    }

    /// # Errors
    ///
    /// If there is no match at `index` or it is a bye.
    pub fn set_score(
        &mut self,
        index: usize,
        score_a: u16,
        score_b: u16,
    ) -> Result<&Match, InvalidEdit> {
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(InvalidEdit::NoSuchMatch(index))?;

        entry.matchup.set_score(score_a, score_b)?;
        debug!("score {}: {}", entry.matchup.id, entry.matchup.status());

        Ok(&entry.matchup)
    }

    /// Drops the matches `side` plays in, returning how many went.
    pub fn discard_side(&mut self, side: &SideId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| !entry.matchup.involves(side));

        before - self.entries.len()
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, entry) in self.entries.iter().enumerate() {
            writeln!(f, "{index}: {} ({})", entry.matchup, entry.options)?;
        }

        Ok(())
    }
}

/// Pairs `sides` two at a time in the order given. An odd count leaves the
/// last side on a bye.
#[must_use]
pub fn pair_sides_for_round(sides: &[Side]) -> Vec<Match> {
    sides
        .chunks(2)
        .map(|pair| match pair {
            [side_a, side_b] => Match::new(side_a.id.clone(), side_b.id.clone()),
            [side_a] => Match::bye(side_a.id.clone()),
            _ => unreachable!("chunks(2) yields one or two sides"),
        })
        .collect()
}

/// The pool the round after `round` draws from: first the sides of `pool`
/// that have no match in `round`, in pool order, then the winner of every
/// decided match, in match order.
#[must_use]
pub fn sides_for_next_round(round: &Round, pool: &[Side]) -> Vec<Side> {
    let assigned = round.assigned_sides();
    let mut next: Vec<Side> = pool
        .iter()
        .filter(|side| !assigned.contains(&side.id))
        .cloned()
        .collect();

    for matchup in round.matches() {
        if let Status::Decided(winner) = matchup.status() {
            match side::find(pool, &winner) {
                Some(side) => next.push(side.clone()),
                None => warn!("the winner {winner} of {} is not in the pool", matchup.id),
            }
        }
    }

    trace!("{} of {} sides go through", next.len(), pool.len());
    next
}

#[must_use]
pub fn can_start_next_round(round: &Round, pool: &[Side]) -> bool {
    round.is_complete() && sides_for_next_round(round, pool).len() >= 2
}

/// The sides of `pool` still selectable for a new match: not committed to a
/// match in `round` and not already staged in another slot.
#[must_use]
pub fn except_selected<'a>(
    pool: &'a [Side],
    round: &Round,
    staged: &[&SideId],
) -> Vec<&'a Side> {
    let assigned = round.assigned_sides();

    pool.iter()
        .filter(|side| !assigned.contains(&side.id) && !staged.contains(&&side.id))
        .collect()
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum InvalidEdit {
    #[error("Select the sides first")]
    SidesNotSelected,
    #[error("edit: {0} cannot play against itself")]
    SameSide(SideId),
    #[error("edit: {0} is already playing in this round")]
    SideAlreadyAssigned(SideId),
    #[error("edit: {0} is not available for this round")]
    SideNotInPool(SideId),
    #[error("edit: {0} sides only allow {1} matches")]
    RoundFull(usize, usize),
    #[error("edit: a bye has no score")]
    ByeHasNoScore,
    #[error("edit: there is no match {0}")]
    NoSuchMatch(usize),
    #[error("edit: there is no round {0}")]
    NoSuchRound(usize),
    #[error("edit: round {0} is locked, a later round has already been drawn from it")]
    RoundLocked(usize),
    #[error("edit: the next round needs a complete round with at least two sides going through")]
    NextRoundUnavailable,
    #[error("edit: there is no side {0}")]
    UnknownSide(SideId),
    #[error("edit: the side {0} already exists")]
    DuplicateSide(SideId),
    #[error("edit: no match in round {0} fits the patch")]
    PatchMismatch(usize),
    #[error("edit: there is no new match being staged")]
    NotStaging,
    #[error("edit: there is no deletion waiting for confirmation")]
    NotConfirming,
}
