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

use std::{borrow::Cow, fmt, fs, path::Path, process::exit, str::FromStr};

use anyhow::Context;
use log::{debug, info};

use crate::{
    bracket::Bracket,
    config::Config,
    document::TournamentDocument,
    editor::RoundEditor,
    message::{COMMANDS, Message},
    patch::TournamentPatch,
    round::InvalidEdit,
    sayg::{self, Session},
    sheet::Sheet,
    side::{Side, SideId},
    slot::Slot,
};

/// A bracket being run over the text protocol, one command per line.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Tournament {
    pub bracket: Bracket,
    pub editor: RoundEditor,
    pub config: Config,
}

impl Tournament {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            bracket: Bracket::new(Vec::new(), config.match_options()),
            editor: RoundEditor::default(),
            config,
        }
    }

    /// # Errors
    ///
    /// If the document can't be read.
    pub fn load(&mut self, path: &Path) -> anyhow::Result<()> {
        let document = TournamentDocument::load(path)?;
        self.bracket = Bracket::from(&document);
        self.editor = RoundEditor::default();

        Ok(())
    }

    /// Runs one line of input, ignoring anything after a `#`.
    ///
    /// # Errors
    ///
    /// If the command is invalid or the bracket refuses it.
    pub fn read_line(&mut self, buffer: &str) -> anyhow::Result<Option<String>> {
        let mut buffer = Cow::from(buffer);
        if let Some(comment_offset) = buffer.find('#') {
            buffer.to_mut().replace_range(comment_offset.., "");
        }

        self.update(Message::from_str(buffer.as_ref())?)
    }

    fn add_match(
        &mut self,
        depth: usize,
        side_a: SideId,
        side_b: SideId,
    ) -> Result<usize, InvalidEdit> {
        self.editor = RoundEditor::new(depth);
        self.editor.begin_new_match();

        let staged = self
            .editor
            .stage(&self.bracket, Slot::A, Some(side_a))
            .and_then(|()| self.editor.stage(&self.bracket, Slot::B, Some(side_b)))
            .and_then(|()| self.editor.commit(&mut self.bracket));

        if staged.is_err() {
            self.editor.cancel();
        }

        staged
    }

    fn sayg(&self, depth: usize, index: usize, path: &Path) -> anyhow::Result<String> {
        let matchup = self
            .bracket
            .find_match(depth, index)
            .ok_or(InvalidEdit::NoSuchMatch(index))?;

        let string = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let session: Session = serde_json::from_str(&string)?;

        let events = sayg::notable_events(
            matchup,
            &self.bracket.sides,
            &session,
            self.config.hi_check_threshold,
        );
        debug!("{} notable event(s) in {}", events.len(), session.id);

        Ok(events
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" | "))
    }

    /// # Errors
    ///
    /// If the command is illegal or invalid.
    #[allow(clippy::too_many_lines)]
    pub fn update(&mut self, message: Message) -> anyhow::Result<Option<String>> {
        match message {
            Message::AddMatch(depth, side_a, side_b) => {
                let index = self.add_match(depth, side_a, side_b)?;
                let matchup = self
                    .bracket
                    .find_match(depth, index)
                    .map(ToString::to_string)
                    .unwrap_or_default();

                Ok(Some(format!("{index} {matchup}")))
            }
            Message::Confirm(answer) => match self.editor.confirm(&mut self.bracket, answer)? {
                Some(entry) => Ok(Some(format!("removed {}", entry.matchup))),
                None => Ok(Some("kept".to_string())),
            },
            Message::Empty => Ok(None),
            Message::KnownCommand(command) => {
                if COMMANDS.contains(&command.as_str()) {
                    Ok(Some("true".to_string()))
                } else {
                    Ok(Some("false".to_string()))
                }
            }
            Message::ListCommands => {
                let mut commands = "\n".to_string();
                commands.push_str(&COMMANDS.join("\n"));
                Ok(Some(commands))
            }
            Message::Load(path) => {
                self.load(&path)?;
                Ok(Some(String::new()))
            }
            Message::Name => {
                let name = env!("CARGO_PKG_NAME");
                Ok(Some(name.to_string()))
            }
            Message::NextRound => {
                let depth = self.bracket.start_next_round()?;
                Ok(Some(format!("{depth} {}", self.bracket.round_name(depth))))
            }
            Message::Patch(json) => {
                let patch: TournamentPatch = serde_json::from_str(&json)?;
                patch.apply(&mut self.bracket)?;
                Ok(Some(String::new()))
            }
            Message::Pool(depth) => {
                self.bracket.round(depth)?;
                let pool: Vec<String> = self
                    .bracket
                    .pool(depth)
                    .iter()
                    .map(|side| side.id.to_string())
                    .collect();

                Ok(Some(pool.join(" ")))
            }
            Message::Quit => exit(0),
            Message::RemoveMatch(depth, index) => {
                self.editor = RoundEditor::new(depth);
                self.editor.request_delete(&self.bracket, index)?;
                Ok(Some(self.editor.state.to_string()))
            }
            Message::RemoveSide(id) => {
                let side = self.bracket.remove_side(&id)?;
                Ok(Some(format!("removed {side}")))
            }
            Message::Rounds => Ok(Some(format!("\n{}", self.bracket))),
            Message::Save(path) => {
                TournamentDocument::from(&self.bracket).save(&path)?;
                Ok(Some(String::new()))
            }
            Message::Sayg(depth, index, path) => self.sayg(depth, index, &path).map(Some),
            Message::Score(depth, index, score_a, score_b) => {
                let patch = self.bracket.record_score(depth, index, score_a, score_b)?;
                if let Some(matchup) = self.bracket.find_match(depth, index) {
                    info!("{}: {matchup}", self.bracket.round_name(depth));
                }

                Ok(Some(patch.to_json()?))
            }
            Message::Seed(depth) => {
                let added = self.bracket.seed_round(depth)?;
                Ok(Some(added.to_string()))
            }
            Message::Sheet => Ok(Some(format!("\n{}", Sheet::new(&self.bracket)))),
            Message::Side(id, name) => {
                self.bracket.add_side(Side::new(&id.0, &name))?;
                Ok(Some(String::new()))
            }
            Message::Version => {
                let version = env!("CARGO_PKG_VERSION");
                Ok(Some(version.to_string()))
            }
            Message::Winner => Ok(Some(
                self.bracket
                    .winner()
                    .map_or_else(|| "none".to_string(), |side| side.id.to_string()),
            )),
        }
    }
}

impl fmt::Display for Tournament {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Sheet::new(&self.bracket))
    }
}
