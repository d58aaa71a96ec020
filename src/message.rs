use std::{path::PathBuf, str::FromStr};

use crate::{confirm::Confirm, side::SideId};

pub const COMMANDS: [&str; 21] = [
    "add_match",
    "confirm",
    "known_command",
    "list_commands",
    "load",
    "name",
    "next_round",
    "patch",
    "pool",
    "quit",
    "remove_match",
    "remove_side",
    "rounds",
    "save",
    "sayg",
    "score",
    "seed",
    "sheet",
    "side",
    "version",
    "winner",
];

/// One line of the bracket text protocol.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Message {
    AddMatch(usize, SideId, SideId),
    Confirm(Confirm),
    Empty,
    KnownCommand(String),
    ListCommands,
    Load(PathBuf),
    Name,
    NextRound,
    Patch(String),
    Pool(usize),
    Quit,
    RemoveMatch(usize, usize),
    RemoveSide(SideId),
    Rounds,
    Save(PathBuf),
    Sayg(usize, usize, PathBuf),
    Score(usize, usize, u16, u16),
    Seed(usize),
    Sheet,
    Side(SideId, String),
    Version,
    Winner,
}

fn arg<'a>(args: &[&'a str], index: usize, usage: &str) -> anyhow::Result<&'a str> {
    args.get(index)
        .copied()
        .ok_or_else(|| anyhow::Error::msg(format!("expected: {usage}")))
}

impl FromStr for Message {
    type Err = anyhow::Error;

    fn from_str(message: &str) -> anyhow::Result<Self> {
        let args: Vec<&str> = message.split_ascii_whitespace().collect();
        let Some(command) = args.first() else {
            return Ok(Self::Empty);
        };

        match *command {
            "add_match" => {
                let usage = "add_match DEPTH SIDE_A SIDE_B";
                Ok(Self::AddMatch(
                    arg(&args, 1, usage)?.parse()?,
                    arg(&args, 2, usage)?.parse()?,
                    arg(&args, 3, usage)?.parse()?,
                ))
            }
            "confirm" => Ok(Self::Confirm(arg(&args, 1, "confirm y|n")?.parse()?)),
            "known_command" => Ok(Self::KnownCommand(
                arg(&args, 1, "known_command COMMAND")?.to_string(),
            )),
            "list_commands" => Ok(Self::ListCommands),
            "load" => Ok(Self::Load(arg(&args, 1, "load PATH")?.into())),
            "name" => Ok(Self::Name),
            "next_round" => Ok(Self::NextRound),
            "patch" => {
                let json = message
                    .trim_start()
                    .strip_prefix("patch")
                    .unwrap_or_default()
                    .trim();
                if json.is_empty() {
                    return Err(anyhow::Error::msg("expected: patch JSON"));
                }
                Ok(Self::Patch(json.to_string()))
            }
            "pool" => Ok(Self::Pool(arg(&args, 1, "pool DEPTH")?.parse()?)),
            "quit" => Ok(Self::Quit),
            "remove_match" => {
                let usage = "remove_match DEPTH INDEX";
                Ok(Self::RemoveMatch(
                    arg(&args, 1, usage)?.parse()?,
                    arg(&args, 2, usage)?.parse()?,
                ))
            }
            "remove_side" => Ok(Self::RemoveSide(arg(&args, 1, "remove_side ID")?.parse()?)),
            "rounds" => Ok(Self::Rounds),
            "save" => Ok(Self::Save(arg(&args, 1, "save PATH")?.into())),
            "sayg" => {
                let usage = "sayg DEPTH INDEX PATH";
                Ok(Self::Sayg(
                    arg(&args, 1, usage)?.parse()?,
                    arg(&args, 2, usage)?.parse()?,
                    arg(&args, 3, usage)?.into(),
                ))
            }
            "score" => {
                let usage = "score DEPTH INDEX SCORE_A SCORE_B";
                Ok(Self::Score(
                    arg(&args, 1, usage)?.parse()?,
                    arg(&args, 2, usage)?.parse()?,
                    arg(&args, 3, usage)?.parse()?,
                    arg(&args, 4, usage)?.parse()?,
                ))
            }
            "seed" => Ok(Self::Seed(arg(&args, 1, "seed DEPTH")?.parse()?)),
            "sheet" => Ok(Self::Sheet),
            "side" => {
                let usage = "side ID NAME";
                let id = arg(&args, 1, usage)?.parse()?;
                let name = args[2..].join(" ");
                if name.is_empty() {
                    return Err(anyhow::Error::msg(format!("expected: {usage}")));
                }
                Ok(Self::Side(id, name))
            }
            "version" => Ok(Self::Version),
            "winner" => Ok(Self::Winner),
            text => Err(anyhow::Error::msg(format!("unrecognized command: {text}"))),
        }
    }
}
