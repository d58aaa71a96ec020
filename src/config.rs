use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    HOME,
    matchup::{DEFAULT_NUMBER_OF_LEGS, DEFAULT_STARTING_SCORE, MatchOptions},
    sayg::DEFAULT_HI_CHECK_THRESHOLD,
};

pub const CONFIG_FILE: &str = "config.ron";

/// Defaults for a new bracket, read from `$CONFIG/darts-knockout/config.ron`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct Config {
    pub best_of: u8,
    pub starting_score: u16,
    pub hi_check_threshold: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            best_of: DEFAULT_NUMBER_OF_LEGS,
            starting_score: DEFAULT_STARTING_SCORE,
            hi_check_threshold: DEFAULT_HI_CHECK_THRESHOLD,
        }
    }
}

impl Config {
    #[must_use]
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(HOME).join(CONFIG_FILE))
    }

    /// Reads the config at `path`, or at [`Config::path`] when `path` is
    /// `None`. A missing default file gives the default config.
    ///
    /// # Errors
    ///
    /// If an explicit file can't be read or any file can't be parsed.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::path() {
                Some(path) if path.exists() => path,
                _ => {
                    debug!("no config file, using the defaults");
                    return Ok(Self::default());
                }
            },
        };

        let string = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config = Self::parse(&string)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        info!("config {}: {config:?}", path.display());
        Ok(config)
    }

    /// # Errors
    ///
    /// If the string isn't a RON config.
    pub fn parse(string: &str) -> anyhow::Result<Self> {
        Ok(ron::from_str(string)?)
    }

    #[must_use]
    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            number_of_legs: self.best_of,
            starting_score: self.starting_score,
        }
    }
}
