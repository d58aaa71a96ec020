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

use std::{
    io::{self, Write},
    path::PathBuf,
    process::{Command, ExitStatus},
};

use clap::{CommandFactory, Parser};
use log::info;

use darts_knockout::{COPYRIGHT, LONG_VERSION, config::Config, tournament::Tournament, utils};

/// Darts Knockout Bracket
///
/// Runs a knockout bracket one command per line on stdin, answering
/// '= RESULT' or '? ERROR'.
#[derive(Parser, Debug)]
#[command(long_version = LONG_VERSION, about)]
struct Args {
    /// Load a tournament document (RON, or JSON with a .json extension)
    #[arg(long, value_name = "PATH")]
    tournament: Option<PathBuf>,

    /// Read the defaults from this config file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Redraw the bracket sheet after every command
    #[arg(long)]
    display_sheet: bool,

    /// Whether the application is being run by systemd
    #[arg(long)]
    systemd: bool,

    /// Build the manpage
    #[arg(long)]
    man: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    utils::init_logger(args.systemd);

    if args.man {
        let mut buffer: Vec<u8> = Vec::default();
        let cmd = Args::command().name("darts-bracket").long_version(None);
        let man = clap_mangen::Man::new(cmd).date("2026-10-19");

        man.render(&mut buffer)?;
        write!(buffer, "{COPYRIGHT}")?;

        std::fs::write("darts-bracket.1", buffer)?;
        return Ok(());
    }

    let config = Config::load(args.config.as_deref())?;
    let mut tournament = Tournament::new(config);

    if let Some(path) = &args.tournament {
        tournament.load(path)?;
        info!(
            "{} side(s), {} round(s)",
            tournament.bracket.sides.len(),
            tournament.bracket.rounds.len()
        );
    }

    play(&mut tournament, args.display_sheet)
}

fn clear_screen() -> anyhow::Result<ExitStatus> {
    #[cfg(not(any(target_family = "unix", target_family = "windows")))]
    return Ok(ExitStatus::default());

    #[cfg(target_family = "unix")]
    let exit_status = Command::new("clear").status()?;

    #[cfg(target_family = "windows")]
    let exit_status = Command::new("cls").status()?;

    Ok(exit_status)
}

fn play(tournament: &mut Tournament, display_sheet: bool) -> anyhow::Result<()> {
    let mut buffer = String::new();
    let stdin = io::stdin();

    if display_sheet {
        clear_screen()?;
        println!("{tournament}");
        println!("Enter 'list_commands' for a list of commands.");
    }

    loop {
        match stdin.read_line(&mut buffer) {
            Ok(0) => return Ok(()),
            Ok(_) => {}
            Err(error) => {
                println!("? {error}\n");
                return Ok(());
            }
        }

        let result = tournament.read_line(&buffer);

        if display_sheet {
            clear_screen()?;
            println!("{tournament}");
        }

        match result {
            Err(error) => println!("? {error}\n"),
            Ok(message) => {
                if let Some(message) = message {
                    println!("= {message}");
                }
            }
        }

        buffer.clear();
    }
}
