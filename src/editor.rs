use std::fmt;

use log::debug;

use crate::{
    bracket::Bracket,
    confirm::Confirm,
    round::{InvalidEdit, MatchEntry},
    side::{Side, SideId},
    slot::Slot,
};

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum EditorState {
    #[default]
    Idle,
    StagingNewMatch {
        side_a: Option<SideId>,
        side_b: Option<SideId>,
    },
    ConfirmingDelete(usize),
}

impl fmt::Display for EditorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::StagingNewMatch { side_a, side_b } => {
                let side_a = side_a.as_ref().map_or("_".to_string(), ToString::to_string);
                let side_b = side_b.as_ref().map_or("_".to_string(), ToString::to_string);
                write!(f, "staging {side_a} v {side_b}")
            }
            Self::ConfirmingDelete(index) => write!(f, "delete match {index}? (y/n)"),
        }
    }
}

/// Edits one round of a bracket. New matches are staged slot by slot before
/// they are committed and deletions wait for a y/n answer.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RoundEditor {
    pub depth: usize,
    pub state: EditorState,
}

impl RoundEditor {
    #[must_use]
    pub fn new(depth: usize) -> Self {
        Self {
            depth,
            state: EditorState::Idle,
        }
    }

    pub fn begin_new_match(&mut self) {
        self.state = EditorState::StagingNewMatch {
            side_a: None,
            side_b: None,
        };
    }

    pub fn cancel(&mut self) {
        self.state = EditorState::Idle;
    }

    fn staged(&self, slot: Slot) -> Option<&SideId> {
        match (&self.state, slot) {
            (EditorState::StagingNewMatch { side_a, .. }, Slot::A) => side_a.as_ref(),
            (EditorState::StagingNewMatch { side_b, .. }, Slot::B) => side_b.as_ref(),
            _ => None,
        }
    }

    /// The sides that may go into `slot`: the pool minus sides already
    /// playing in the round and the side staged in the other slot.
    ///
    /// # Errors
    ///
    /// If the round doesn't exist.
    pub fn options(&self, bracket: &Bracket, slot: Slot) -> Result<Vec<Side>, InvalidEdit> {
        let staged: Vec<&SideId> = self.staged(slot.opposite()).into_iter().collect();
        bracket.selectable_sides(self.depth, &staged)
    }

    /// Puts `side` into `slot` of the staged match, or clears the slot.
    ///
    /// # Errors
    ///
    /// If no match is being staged or the side isn't selectable for the slot.
    pub fn stage(
        &mut self,
        bracket: &Bracket,
        slot: Slot,
        side: Option<SideId>,
    ) -> Result<(), InvalidEdit> {
        if !matches!(self.state, EditorState::StagingNewMatch { .. }) {
            return Err(InvalidEdit::NotStaging);
        }

        if let Some(side) = &side
            && !self.options(bracket, slot)?.iter().any(|option| &option.id == side)
        {
            if self.staged(slot.opposite()) == Some(side) {
                return Err(InvalidEdit::SameSide(side.clone()));
            }
            if bracket.round(self.depth)?.is_assigned(side) {
                return Err(InvalidEdit::SideAlreadyAssigned(side.clone()));
            }
            return Err(InvalidEdit::SideNotInPool(side.clone()));
        }

        if let EditorState::StagingNewMatch { side_a, side_b } = &mut self.state {
            match slot {
                Slot::A => *side_a = side,
                Slot::B => *side_b = side,
            }
        }

        debug!("round {} slot {slot}: {}", self.depth, self.state);
        Ok(())
    }

    /// Adds the staged match to the round. The editor stays staging when the
    /// bracket rejects it.
    ///
    /// # Errors
    ///
    /// If nothing is being staged or the bracket refuses the match.
    pub fn commit(&mut self, bracket: &mut Bracket) -> Result<usize, InvalidEdit> {
        let EditorState::StagingNewMatch { side_a, side_b } = &self.state else {
            return Err(InvalidEdit::NotStaging);
        };

        let index = bracket.add_match(self.depth, side_a.clone(), side_b.clone())?;
        self.state = EditorState::Idle;

        Ok(index)
    }

    /// # Errors
    ///
    /// If there is no match at `index`.
    pub fn request_delete(&mut self, bracket: &Bracket, index: usize) -> Result<(), InvalidEdit> {
        if bracket.round(self.depth)?.get(index).is_none() {
            return Err(InvalidEdit::NoSuchMatch(index));
        }

        self.state = EditorState::ConfirmingDelete(index);
        Ok(())
    }

    /// Answers the pending deletion. A yes removes the match, a no keeps it;
    /// either way the editor goes back to idle.
    ///
    /// # Errors
    ///
    /// If no deletion is pending.
    pub fn confirm(
        &mut self,
        bracket: &mut Bracket,
        answer: Confirm,
    ) -> Result<Option<MatchEntry>, InvalidEdit> {
        let EditorState::ConfirmingDelete(index) = self.state else {
            return Err(InvalidEdit::NotConfirming);
        };

        self.state = EditorState::Idle;
        debug!("round {}: delete match {index}? {answer}", self.depth);
        match answer {
            Confirm::Yes => bracket.remove_match(self.depth, index).map(Some),
            Confirm::No => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matchup::MatchOptions;

    fn bracket() -> Result<Bracket, InvalidEdit> {
        let sides = (1..=4)
            .map(|i| Side::new(&format!("s{i}"), &format!("Side {i}")))
            .collect();
        let mut bracket = Bracket::new(sides, MatchOptions::default());
        bracket.start_next_round()?;

        Ok(bracket)
    }

    fn id(string: &str) -> Option<SideId> {
        Some(SideId::from(string))
    }

    fn option_ids(options: &[Side]) -> Vec<&str> {
        options.iter().map(|side| side.id.0.as_str()).collect()
    }

    #[test]
    fn staging_and_committing_a_match() -> anyhow::Result<()> {
        let mut bracket = bracket()?;
        let mut editor = RoundEditor::new(1);

        assert_eq!(editor.stage(&bracket, Slot::A, id("s1")), Err(InvalidEdit::NotStaging));

        editor.begin_new_match();
        editor.stage(&bracket, Slot::A, id("s1"))?;
        assert_eq!(
            option_ids(&editor.options(&bracket, Slot::B)?),
            ["s2", "s3", "s4"]
        );

        assert_eq!(
            editor.stage(&bracket, Slot::B, id("s1")),
            Err(InvalidEdit::SameSide(SideId::from("s1")))
        );

        editor.stage(&bracket, Slot::B, id("s3"))?;
        assert_eq!(editor.commit(&mut bracket)?, 0);
        assert_eq!(editor.state, EditorState::Idle);

        editor.begin_new_match();
        assert_eq!(option_ids(&editor.options(&bracket, Slot::A)?), ["s2", "s4"]);
        assert_eq!(
            editor.stage(&bracket, Slot::A, id("s3")),
            Err(InvalidEdit::SideAlreadyAssigned(SideId::from("s3")))
        );

        Ok(())
    }

    #[test]
    fn committing_half_a_match_keeps_staging() -> anyhow::Result<()> {
        let mut bracket = bracket()?;
        let mut editor = RoundEditor::new(1);

        editor.begin_new_match();
        editor.stage(&bracket, Slot::A, id("s2"))?;

        let error = editor.commit(&mut bracket);
        assert_eq!(error, Err(InvalidEdit::SidesNotSelected));
        assert_eq!(
            editor.state,
            EditorState::StagingNewMatch {
                side_a: id("s2"),
                side_b: None,
            }
        );
        assert!(bracket.round(1)?.is_empty());

        Ok(())
    }

    #[test]
    fn deleting_needs_confirmation() -> anyhow::Result<()> {
        let mut bracket = bracket()?;
        bracket.seed_round(1)?;
        let mut editor = RoundEditor::new(1);

        assert_eq!(
            editor.confirm(&mut bracket, Confirm::Yes),
            Err(InvalidEdit::NotConfirming)
        );
        assert_eq!(
            editor.request_delete(&bracket, 5),
            Err(InvalidEdit::NoSuchMatch(5))
        );

        editor.request_delete(&bracket, 1)?;
        assert_eq!(editor.confirm(&mut bracket, Confirm::No)?, None);
        assert_eq!(bracket.round(1)?.len(), 2);

        editor.request_delete(&bracket, 1)?;
        let removed = editor.confirm(&mut bracket, Confirm::Yes)?;
        assert_eq!(removed.map(|entry| entry.matchup.side_a), id("s3"));
        assert_eq!(bracket.round(1)?.len(), 1);
        assert_eq!(editor.state, EditorState::Idle);

        Ok(())
    }
}
