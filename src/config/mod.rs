// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Application configuration.
//!
//! This module manages the application configuration file. The `tracks`
//! table maps section names to track locators and is the only place music is
//! configured; `music_base` is prefixed to every locator exactly as written.

use std::{collections::BTreeMap, path::PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::music::TrackRegistry;

const CONFIG_NAME: &str = "valentune";

const DEFAULT_UNLOCK_AT: &str = "2026-02-14T00:00:00+05:30";

const DEFAULT_TRACKS: [(&str, &str); 6] = [
    ("welcome", "tum-hi-ho.mp3"),
    ("lockscreen", "tum-hi-ho.mp3"),
    ("unlock", "happy-birthday.mp3"),
    ("hero", "daylight.mp3"),
    ("anniversary", "pehli-nazar.mp3"),
    ("footer", "ghar.mp3"),
];

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub version: u32,
    pub music_base: String,
    pub log_file: Option<PathBuf>,
    /// Run without audio output.
    pub silent: bool,
    /// When the lock screen opens, as an RFC 3339 timestamp.
    pub unlock_at: String,
    pub tracks: BTreeMap<String, String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            music_base: "music/".to_string(),
            log_file: None,
            silent: false,
            unlock_at: DEFAULT_UNLOCK_AT.to_string(),
            tracks: DEFAULT_TRACKS
                .iter()
                .map(|(section, track)| (section.to_string(), track.to_string()))
                .collect(),
        }
    }
}

impl AppConfig {
    /// Builds and validates the section to track registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the table names an unknown section, has an empty
    /// locator, or leaves any section without a track.
    pub(crate) fn track_registry(&self) -> Result<TrackRegistry> {
        let registry = TrackRegistry::from_table(&self.music_base, &self.tracks)
            .context("Invalid track table in configuration")?;
        registry
            .validate()
            .context("Incomplete track table in configuration")?;
        Ok(registry)
    }

    /// Parses the lock screen's unlock time.
    pub(crate) fn unlock_target(&self) -> Result<DateTime<Utc>> {
        let unlock_at = DateTime::parse_from_rfc3339(&self.unlock_at)
            .with_context(|| format!("Invalid unlock_at '{}' in configuration", self.unlock_at))?;
        Ok(unlock_at.with_timezone(&Utc))
    }

    /// Where log output goes, the configured file or `valentune.log` next to
    /// the configuration file.
    pub(crate) fn log_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.log_file {
            return Ok(path.clone());
        }

        let config_path = confy::get_configuration_file_path(CONFIG_NAME, None)
            .context("Failed to locate configuration directory")?;
        Ok(config_path.with_file_name("valentune.log"))
    }
}

pub fn load_config() -> AppConfig {
    confy::load(CONFIG_NAME, None).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::Section;

    #[test]
    fn default_table_matches_the_card() {
        let registry = AppConfig::default().track_registry().unwrap();

        assert_eq!(registry.track(Section::Welcome), Some("music/tum-hi-ho.mp3"));
        assert_eq!(
            registry.track(Section::Welcome),
            registry.track(Section::Lockscreen)
        );
        assert_eq!(registry.track(Section::Footer), Some("music/ghar.mp3"));
    }

    #[test]
    fn incomplete_table_is_rejected() {
        let mut config = AppConfig::default();
        config.tracks.remove("hero");

        let err = config.track_registry().unwrap_err();
        assert!(format!("{:#}", err).contains("hero"));
    }

    #[test]
    fn default_unlock_time_is_midnight_in_india() {
        let target = AppConfig::default().unlock_target().unwrap();
        assert_eq!(target.to_rfc3339(), "2026-02-13T18:30:00+00:00");
    }

    #[test]
    fn malformed_unlock_time_is_rejected() {
        let config = AppConfig {
            unlock_at: "14 February".to_string(),
            ..AppConfig::default()
        };
        assert!(config.unlock_target().is_err());
    }

    #[test]
    fn configured_log_file_wins() {
        let config = AppConfig {
            log_file: Some(PathBuf::from("/tmp/valentune-test.log")),
            ..AppConfig::default()
        };
        assert_eq!(
            config.log_path().unwrap(),
            PathBuf::from("/tmp/valentune-test.log")
        );
    }
}
