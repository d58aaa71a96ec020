use std::fmt;

use log::{debug, info};

use crate::{
    matchup::{Match, MatchOptions},
    patch::TournamentPatch,
    round::{self, InvalidEdit, MatchEntry, Round},
    round_name::{self, RoundName},
    side::{Player, Side, SideId},
};

/// A knockout tournament: the roster, the rounds played so far indexed by
/// depth (`rounds[0]` is depth 1), and the options new matches start with.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Bracket {
    pub sides: Vec<Side>,
    pub rounds: Vec<Round>,
    pub defaults: MatchOptions,
}

impl Bracket {
    #[must_use]
    pub fn new(sides: Vec<Side>, defaults: MatchOptions) -> Self {
        Self {
            sides,
            rounds: Vec::new(),
            defaults,
        }
    }

    #[must_use]
    pub fn rounds_required(&self) -> usize {
        round_name::rounds_required(self.sides.len())
    }

    #[must_use]
    pub fn round_name(&self, depth: usize) -> RoundName {
        round_name::round_name(self.sides.len(), depth)
    }

    /// # Errors
    ///
    /// If there is no round at `depth`.
    pub fn round(&self, depth: usize) -> Result<&Round, InvalidEdit> {
        depth
            .checked_sub(1)
            .and_then(|index| self.rounds.get(index))
            .ok_or(InvalidEdit::NoSuchRound(depth))
    }

    /// A round stays open to edits until a deeper round has matches drawn
    /// from its results.
    fn editable_round(&mut self, depth: usize) -> Result<&mut Round, InvalidEdit> {
        self.round(depth)?;
        if self.rounds.iter().skip(depth).any(|round| !round.is_empty()) {
            return Err(InvalidEdit::RoundLocked(depth));
        }

        self.round_mut(depth)
    }

    fn round_mut(&mut self, depth: usize) -> Result<&mut Round, InvalidEdit> {
        depth
            .checked_sub(1)
            .and_then(|index| self.rounds.get_mut(index))
            .ok_or(InvalidEdit::NoSuchRound(depth))
    }

    /// The sides the round at `depth` draws from. Depth 1 draws from the whole
    /// roster, every later depth from what the round before it sends through.
    #[must_use]
    pub fn pool(&self, depth: usize) -> Vec<Side> {
        let mut pool = self.sides.clone();

        for round in self.rounds.iter().take(depth.saturating_sub(1)) {
            pool = round::sides_for_next_round(round, &pool);
        }

        pool
    }

    /// # Errors
    ///
    /// If a side with the same id is already on the roster.
    pub fn add_side(&mut self, side: Side) -> Result<(), InvalidEdit> {
        if self.sides.iter().any(|other| other.id == side.id) {
            return Err(InvalidEdit::DuplicateSide(side.id));
        }

        info!("add side {} ({})", side.name, side.id);
        self.sides.push(side);
        Ok(())
    }

    /// Takes a side off the roster. Matches it plays in the current round go
    /// with it, even decided ones, so its opponent is left without a match
    /// and goes through to the next round unassigned. Earlier rounds are left
    /// as they were played.
    ///
    /// # Errors
    ///
    /// If the side is not on the roster.
    pub fn remove_side(&mut self, id: &SideId) -> Result<Side, InvalidEdit> {
        let index = self
            .sides
            .iter()
            .position(|side| &side.id == id)
            .ok_or_else(|| InvalidEdit::UnknownSide(id.clone()))?;

        if let Some(round) = self.rounds.last_mut() {
            let discarded = round.discard_side(id);
            if discarded > 0 {
                debug!("discarded {discarded} match(es) of {id}");
            }
        }

        let side = self.sides.remove(index);
        info!("remove side {} ({})", side.name, side.id);

        Ok(side)
    }

    /// # Errors
    ///
    /// If the round is locked, either side is missing or unavailable at this
    /// depth, or the round already holds as many matches as its pool allows.
    pub fn add_match(
        &mut self,
        depth: usize,
        side_a: Option<SideId>,
        side_b: Option<SideId>,
    ) -> Result<usize, InvalidEdit> {
        self.editable_round(depth)?;
        let (Some(side_a), Some(side_b)) = (side_a, side_b) else {
            return Err(InvalidEdit::SidesNotSelected);
        };

        let pool = self.pool(depth);
        for side in [&side_a, &side_b] {
            if !pool.iter().any(|other| &other.id == side) {
                return Err(InvalidEdit::SideNotInPool(side.clone()));
            }
        }

        let limit = pool.len().div_ceil(2);
        let defaults = self.defaults;
        let round = self.round_mut(depth)?;
        if round.len() >= limit {
            return Err(InvalidEdit::RoundFull(pool.len(), limit));
        }

        round.add_match(Some(side_a), Some(side_b), defaults)
    }

    /// Only call this once the user has confirmed the deletion.
    ///
    /// # Errors
    ///
    /// If there is no such round or match, or the round is locked.
    pub fn remove_match(&mut self, depth: usize, index: usize) -> Result<MatchEntry, InvalidEdit> {
        self.editable_round(depth)?.remove_match(index)
    }

    /// Records a score and returns the patch that carries it to the server.
    ///
    /// # Errors
    ///
    /// If there is no such round or match, the round is locked, or the match
    /// is a bye.
    pub fn record_score(
        &mut self,
        depth: usize,
        index: usize,
        score_a: u16,
        score_b: u16,
    ) -> Result<TournamentPatch, InvalidEdit> {
        let matchup = self
            .editable_round(depth)?
            .set_score(index, score_a, score_b)?;

        Ok(TournamentPatch::for_match(depth, matchup))
    }

    /// Whether a new round may be opened: with no rounds yet the roster needs
    /// two sides, otherwise the deepest round has to be complete and send at
    /// least two sides through.
    #[must_use]
    pub fn can_start_next_round(&self) -> bool {
        match self.rounds.last() {
            None => self.sides.len() >= 2,
            Some(round) => round::can_start_next_round(round, &self.pool(self.rounds.len())),
        }
    }

    /// Opens an empty round after the deepest one and returns its depth.
    ///
    /// # Errors
    ///
    /// If the next round can't be started yet.
    pub fn start_next_round(&mut self) -> Result<usize, InvalidEdit> {
        if !self.can_start_next_round() {
            return Err(InvalidEdit::NextRoundUnavailable);
        }

        self.rounds.push(Round::default());
        let depth = self.rounds.len();
        info!("start {} (round {depth})", self.round_name(depth));

        Ok(depth)
    }

    /// Pairs every side of the pool that has no match yet at `depth`, in pool
    /// order, and returns how many matches were added.
    ///
    /// # Errors
    ///
    /// If there is no round at `depth` or it is locked.
    pub fn seed_round(&mut self, depth: usize) -> Result<usize, InvalidEdit> {
        let pool = self.pool(depth);
        let defaults = self.defaults;
        let round = self.editable_round(depth)?;

        let unassigned: Vec<Side> = pool
            .into_iter()
            .filter(|side| !round.is_assigned(&side.id))
            .collect();

        let matches = round::pair_sides_for_round(&unassigned);
        let added = matches.len();
        for matchup in matches {
            match matchup.side_b {
                Some(side_b) => round.add_match(Some(matchup.side_a), Some(side_b), defaults)?,
                None => round.add_bye(matchup.side_a, defaults)?,
            };
        }

        debug!("seeded {added} match(es) at depth {depth}");
        Ok(added)
    }

    /// The sides that can still be picked for a new match at `depth`.
    ///
    /// # Errors
    ///
    /// If there is no round at `depth`.
    pub fn selectable_sides(
        &self,
        depth: usize,
        staged: &[&SideId],
    ) -> Result<Vec<Side>, InvalidEdit> {
        let round = self.round(depth)?;
        let pool = self.pool(depth);

        Ok(round::except_selected(&pool, round, staged)
            .into_iter()
            .cloned()
            .collect())
    }

    /// # Errors
    ///
    /// If there is no such round or match.
    pub fn sayg_players(
        &self,
        depth: usize,
        index: usize,
    ) -> Result<Option<[&Player; 2]>, InvalidEdit> {
        let entry = self
            .round(depth)?
            .get(index)
            .ok_or(InvalidEdit::NoSuchMatch(index))?;

        Ok(entry.matchup.sayg_players(&self.sides))
    }

    /// The outright winner: the one side left once the deepest round is
    /// complete.
    #[must_use]
    pub fn winner(&self) -> Option<Side> {
        let round = self.rounds.last()?;
        if !round.is_complete() {
            return None;
        }

        let mut next = round::sides_for_next_round(round, &self.pool(self.rounds.len()));
        if next.len() == 1 { next.pop() } else { None }
    }

    #[must_use]
    pub fn find_match(&self, depth: usize, index: usize) -> Option<&Match> {
        self.round(depth).ok()?.get(index).map(|entry| &entry.matchup)
    }
}

impl fmt::Display for Bracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, round) in self.rounds.iter().enumerate() {
            let depth = index + 1;
            writeln!(f, "{} (round {depth})", self.round_name(depth))?;
            write!(f, "{round}")?;
        }

        if let Some(winner) = self.winner() {
            writeln!(f, "winner: {winner}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bracket(count: usize) -> Bracket {
        let sides = (1..=count)
            .map(|i| {
                Side::new(&format!("s{i}"), &format!("Side {i}"))
                    .with_player(&format!("p{i}"), &format!("Player {i}"))
            })
            .collect();

        Bracket::new(sides, MatchOptions::default())
    }

    fn id(string: &str) -> Option<SideId> {
        Some(SideId::from(string))
    }

    #[test]
    fn first_round_needs_two_sides() {
        let mut single = bracket(1);
        assert!(!single.can_start_next_round());
        assert_eq!(single.start_next_round(), Err(InvalidEdit::NextRoundUnavailable));
        assert_eq!(single.round_name(1), RoundName::Final);

        let mut pair = bracket(2);
        assert_eq!(pair.start_next_round(), Ok(1));
    }

    #[test]
    fn add_match_checks_the_pool() -> anyhow::Result<()> {
        let mut bracket = bracket(4);
        bracket.start_next_round()?;

        assert_eq!(
            bracket.add_match(1, id("s1"), id("s9")),
            Err(InvalidEdit::SideNotInPool(SideId::from("s9")))
        );
        assert_eq!(
            bracket.add_match(1, id("s1"), None),
            Err(InvalidEdit::SidesNotSelected)
        );
        assert_eq!(
            bracket.add_match(2, id("s1"), id("s2")),
            Err(InvalidEdit::NoSuchRound(2))
        );

        bracket.add_match(1, id("s1"), id("s2"))?;
        bracket.add_match(1, id("s3"), id("s4"))?;
        assert_eq!(bracket.round(1)?.len(), 2);

        Ok(())
    }

    #[test]
    fn round_never_exceeds_half_its_pool() -> anyhow::Result<()> {
        let mut bracket = bracket(4);
        bracket.start_next_round()?;
        bracket.seed_round(1)?;
        bracket.record_score(1, 0, 3, 0)?;
        bracket.record_score(1, 1, 3, 0)?;
        bracket.start_next_round()?;
        bracket.add_match(2, id("s1"), id("s3"))?;

        assert_eq!(bracket.pool(2).len(), 2);
        assert_eq!(
            bracket.add_match(2, id("s3"), id("s1")),
            Err(InvalidEdit::RoundFull(2, 1))
        );

        Ok(())
    }

    #[test]
    fn twelve_sides_play_through() -> anyhow::Result<()> {
        let mut bracket = bracket(12);
        let mut names = Vec::new();

        while bracket.can_start_next_round() {
            let depth = bracket.start_next_round()?;
            let pool = bracket.pool(depth);
            bracket.seed_round(depth)?;
            names.push(bracket.round_name(depth).to_string());

            let round = bracket.round(depth)?.clone();
            let mut winners = Vec::new();
            for (index, entry) in round.entries.iter().enumerate() {
                if entry.matchup.is_bye() {
                    winners.push(entry.matchup.side_a.clone());
                } else {
                    bracket.record_score(depth, index, 3, 1)?;
                    winners.push(entry.matchup.side_a.clone());
                }
            }

            let next: Vec<_> = bracket.pool(depth + 1).into_iter().map(|side| side.id).collect();
            assert_eq!(next, winners);
            assert!(pool.len() > next.len());
        }

        assert_eq!(names, ["Round 1", "Quarter-Final", "Semi-Final", "Final"]);
        assert_eq!(bracket.winner().map(|side| side.id), id("s1"));

        Ok(())
    }

    #[test]
    fn six_sides_undecided_offers_no_next_round() -> anyhow::Result<()> {
        let mut bracket = bracket(6);
        bracket.start_next_round()?;
        bracket.seed_round(1)?;
        for index in 0..3 {
            bracket.record_score(1, index, 0, 0)?;
        }

        assert_eq!(bracket.round_name(1), RoundName::QuarterFinal);
        assert!(!bracket.can_start_next_round());
        assert!(bracket.pool(2).is_empty());
        assert!(bracket.winner().is_none());

        Ok(())
    }

    #[test]
    fn remove_side_only_touches_the_current_round() -> anyhow::Result<()> {
        let mut bracket = bracket(4);
        bracket.start_next_round()?;
        bracket.seed_round(1)?;
        bracket.record_score(1, 0, 3, 0)?;
        bracket.record_score(1, 1, 3, 0)?;
        bracket.start_next_round()?;
        bracket.seed_round(2)?;

        bracket.remove_side(&SideId::from("s3"))?;

        assert_eq!(bracket.round(1)?.len(), 2);
        assert!(bracket.round(2)?.is_empty());
        assert_eq!(
            bracket.remove_side(&SideId::from("s3")),
            Err(InvalidEdit::UnknownSide(SideId::from("s3")))
        );

        Ok(())
    }

    #[test]
    fn removing_a_decided_side_sends_its_opponent_through() -> anyhow::Result<()> {
        let mut bracket = bracket(4);
        bracket.start_next_round()?;
        bracket.seed_round(1)?;
        bracket.record_score(1, 0, 3, 0)?;
        bracket.record_score(1, 1, 3, 1)?;

        bracket.remove_side(&SideId::from("s1"))?;

        let round = bracket.round(1)?;
        assert_eq!(round.len(), 1);
        assert!(!round.is_assigned(&SideId::from("s2")));
        assert!(round.is_complete());

        let pool: Vec<_> = bracket.pool(2).into_iter().map(|side| side.id.0).collect();
        assert_eq!(pool, ["s2", "s3"]);
        assert!(bracket.can_start_next_round());

        Ok(())
    }

    #[test]
    fn earlier_rounds_lock_once_the_next_round_is_drawn() -> anyhow::Result<()> {
        let mut bracket = bracket(4);
        bracket.start_next_round()?;
        bracket.seed_round(1)?;
        bracket.record_score(1, 0, 3, 0)?;
        bracket.record_score(1, 1, 3, 0)?;

        // An empty next round doesn't lock anything yet.
        bracket.start_next_round()?;
        bracket.record_score(1, 1, 3, 1)?;

        bracket.seed_round(2)?;
        bracket.record_score(2, 0, 3, 0)?;
        assert_eq!(bracket.winner().map(|side| side.id), id("s1"));

        assert_eq!(
            bracket.record_score(1, 0, 0, 3),
            Err(InvalidEdit::RoundLocked(1))
        );
        assert_eq!(bracket.remove_match(1, 0), Err(InvalidEdit::RoundLocked(1)));
        assert_eq!(
            bracket.add_match(1, id("s1"), id("s2")),
            Err(InvalidEdit::RoundLocked(1))
        );
        assert_eq!(bracket.seed_round(1), Err(InvalidEdit::RoundLocked(1)));

        let pool: Vec<_> = bracket.pool(2).into_iter().map(|side| side.id.0).collect();
        assert_eq!(pool, ["s1", "s3"]);
        assert_eq!(bracket.winner().map(|side| side.id), id("s1"));

        // The deepest round can still be corrected.
        bracket.record_score(2, 0, 1, 3)?;
        assert_eq!(bracket.winner().map(|side| side.id), id("s3"));

        Ok(())
    }

    #[test]
    fn duplicate_sides_are_rejected() {
        let mut bracket = bracket(2);

        assert_eq!(
            bracket.add_side(Side::new("s1", "Again")),
            Err(InvalidEdit::DuplicateSide(SideId::from("s1")))
        );
        assert!(bracket.add_side(Side::new("s3", "Side 3")).is_ok());
        assert_eq!(bracket.sides.len(), 3);
    }

    #[test]
    fn bye_has_no_sayg_players() -> anyhow::Result<()> {
        let mut bracket = bracket(5);
        bracket.start_next_round()?;
        bracket.seed_round(1)?;

        assert!(bracket.sayg_players(1, 0)?.is_some());
        assert!(bracket.find_match(1, 2).is_some_and(Match::is_bye));
        assert!(bracket.sayg_players(1, 2)?.is_none());
        assert_eq!(
            bracket.record_score(1, 2, 3, 0),
            Err(InvalidEdit::ByeHasNoScore)
        );

        Ok(())
    }
}
