//! A knockout bracket engine for darts leagues.
//!
//! Sides are drawn into rounds of matches. The winners of each complete round,
//! together with any side left without a match, make up the pool for the next
//! round, until one side is left. Rounds are named from how many are still to
//! come, so the last three are always the quarter-final, semi-final and final.
//!
//! ## Feature Flags
//!
//! * bench - enable the criterion benchmarks
//!
//! ## Text Protocol
//!
//! The `darts-bracket` binary drives a [`tournament::Tournament`] one command
//! per line. See [`message::Message`] for the commands.

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

#![deny(clippy::panic)]

pub mod bracket;
pub mod config;
pub mod confirm;
pub mod document;
pub mod editor;
pub mod matchup;
pub mod message;
pub mod patch;
pub mod round;
pub mod round_name;
pub mod sayg;
pub mod sheet;
pub mod side;
pub mod slot;
pub mod status;
pub mod tournament;
pub mod utils;

pub const HOME: &str = "darts-knockout";

pub const COPYRIGHT: &str = r".SH COPYRIGHT
Copyright (C) 2025-2026 The darts-knockout developers

This program is free software: you can redistribute it and/or modify
it under the terms of the GNU Affero General Public License as published by
the Free Software Foundation, either version 3 of the License, or
(at your option) any later version.

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU Affero General Public License for more details.

You should have received a copy of the GNU Affero General Public License
along with this program.  If not, see <https://www.gnu.org/licenses/>.
";

pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "
Copyright (c) 2025 The darts-knockout developers
Licensed under the AGPLv3"
);
