// This file is part of darts-knockout.
//
// darts-knockout is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// darts-knockout is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct SideId(pub String);

impl fmt::Display for SideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SideId {
    type Err = anyhow::Error;

    fn from_str(string: &str) -> anyhow::Result<Self> {
        if string.is_empty() || string.contains(char::is_whitespace) {
            return Err(anyhow::Error::msg(format!(
                "Error trying to convert '{string}' to a SideId!"
            )));
        }

        Ok(Self(string.to_string()))
    }
}

impl From<&str> for SideId {
    fn from(string: &str) -> Self {
        Self(string.to_string())
    }
}

#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub name: String,
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A participant occupying one bracket slot: a single player, a pair or a
/// whole team.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Side {
    pub id: SideId,
    pub name: String,
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub no_show: bool,
}

impl Side {
    #[must_use]
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: SideId::from(id),
            name: name.to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_player(mut self, id: &str, name: &str) -> Self {
        self.players.push(Player {
            id: id.to_string(),
            name: name.to_string(),
        });
        self
    }

    /// The one player of a singles side. Pairs, teams and empty rosters have
    /// none.
    #[must_use]
    pub fn single_player(&self) -> Option<&Player> {
        match self.players.as_slice() {
            [player] => Some(player),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.no_show {
            write!(f, "{} (no show)", self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

#[must_use]
pub fn find<'a>(sides: &'a [Side], id: &SideId) -> Option<&'a Side> {
    sides.iter().find(|side| &side.id == id)
}
