// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::side::SideId;

/// Where a match stands. Every caller goes through this one model: a match
/// with equal scores (including `0-0`) has been scored but has no winner.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum Status {
    #[default]
    Unscored,
    Undecided,
    Decided(SideId),
}

impl Status {
    #[must_use]
    pub fn is_decided(&self) -> bool {
        matches!(self, Self::Decided(_))
    }

    #[must_use]
    pub fn winner(&self) -> Option<&SideId> {
        match self {
            Self::Decided(side) => Some(side),
            Self::Unscored | Self::Undecided => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unscored => write!(f, "unscored"),
            Self::Undecided => write!(f, "undecided"),
            Self::Decided(side) => write!(f, "decided {side}"),
        }
    }
}
