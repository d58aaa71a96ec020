use std::fmt;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::{
    matchup::Match,
    side::{Player, Side},
    slot::Slot,
};

pub const ONE_EIGHTY: u16 = 180;
pub const DEFAULT_HI_CHECK_THRESHOLD: u16 = 100;

/// One leg of a score-as-you-go session: the score each side counts down
/// from and every visit's score, per side.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Leg {
    pub starting_score: u16,
    #[serde(default)]
    pub home: Vec<u16>,
    #[serde(default)]
    pub away: Vec<u16>,
}

impl Leg {
    #[must_use]
    pub fn throws(&self, slot: Slot) -> &[u16] {
        match slot {
            Slot::A => &self.home,
            Slot::B => &self.away,
        }
    }

    /// The visit that checked out for `slot`, if any. Visits that would leave
    /// the side below zero or on one are busts and score nothing.
    #[must_use]
    pub fn checkout(&self, slot: Slot) -> Option<u16> {
        let mut remaining = self.starting_score;

        for &score in self.throws(slot) {
            if score == remaining {
                return Some(score);
            }

            if score < remaining && remaining - score != 1 {
                remaining -= score;
            }
        }

        None
    }

    /// Visits of 180 for `slot`, busts excluded.
    #[must_use]
    pub fn one_eighties(&self, slot: Slot) -> usize {
        let mut remaining = self.starting_score;
        let mut count = 0;

        for &score in self.throws(slot) {
            if score > remaining || remaining - score == 1 {
                continue;
            }

            if score == ONE_EIGHTY {
                count += 1;
            }
            remaining -= score;
        }

        count
    }
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    #[serde(default)]
    pub legs: Vec<Leg>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum NotableEvent {
    OneEighty(Player),
    HiCheck(Player, u16),
}

impl fmt::Display for NotableEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OneEighty(player) => write!(f, "180 {player}"),
            Self::HiCheck(player, score) => write!(f, "hi_check {player} {score}"),
        }
    }
}

/// The 180s and high checkouts of a session, credited to the players of
/// `matchup`. Matches without exactly one player per side have nobody to
/// credit and report nothing.
#[must_use]
pub fn notable_events(
    matchup: &Match,
    sides: &[Side],
    session: &Session,
    hi_check_threshold: u16,
) -> Vec<NotableEvent> {
    let Some(players) = matchup.sayg_players(sides) else {
        trace!("{} has no sayg players", matchup.id);
        return Vec::new();
    };

    let mut events = Vec::new();
    for leg in &session.legs {
        for (slot, player) in [Slot::A, Slot::B].into_iter().zip(players) {
            for _ in 0..leg.one_eighties(slot) {
                events.push(NotableEvent::OneEighty(player.clone()));
            }

            if let Some(score) = leg.checkout(slot)
                && score >= hi_check_threshold
            {
                events.push(NotableEvent::HiCheck(player.clone(), score));
            }
        }
    }

    events
}
