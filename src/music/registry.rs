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

//! Section to track mapping.
//!
//! The registry is built once at startup from the configuration table and is
//! never mutated afterwards. Track locators are kept exactly as written, they
//! are compared by string identity when deciding whether a swap is needed.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::music::section::{Section, SectionError};

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum RegistryError {
    #[error(transparent)]
    Section(#[from] SectionError),

    #[error("empty track locator for section '{0}'")]
    EmptyTrack(Section),

    #[error("no track configured for: {}", join_sections(.0))]
    Missing(Vec<Section>),
}

fn join_sections(sections: &[Section]) -> String {
    sections
        .iter()
        .copied()
        .map(Section::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct TrackRegistry {
    tracks: BTreeMap<Section, String>,
}

impl TrackRegistry {
    #[cfg(test)]
    pub(crate) fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Section, S)>,
        S: Into<String>,
    {
        Self {
            tracks: entries
                .into_iter()
                .map(|(section, track)| (section, track.into()))
                .collect(),
        }
    }

    /// Builds a registry from a configuration table of section names to track
    /// locators.
    ///
    /// Each locator is prefixed with `base` verbatim, so `"music/"` and
    /// `"tum-hi-ho.mp3"` give `"music/tum-hi-ho.mp3"`.
    ///
    /// # Errors
    ///
    /// Returns an error if a key is not a known section name or a locator is
    /// empty. Completeness is checked separately by [`Self::validate`].
    pub(crate) fn from_table(
        base: &str,
        table: &BTreeMap<String, String>,
    ) -> Result<Self, RegistryError> {
        let mut tracks = BTreeMap::new();

        for (name, locator) in table {
            let section: Section = name.parse()?;
            if locator.trim().is_empty() {
                return Err(RegistryError::EmptyTrack(section));
            }
            tracks.insert(section, format!("{}{}", base, locator));
        }

        Ok(Self { tracks })
    }

    pub(crate) fn track(&self, section: Section) -> Option<&str> {
        self.tracks.get(&section).map(String::as_str)
    }

    pub(crate) fn missing_sections(&self) -> Vec<Section> {
        Section::ALL
            .into_iter()
            .filter(|section| !self.tracks.contains_key(section))
            .collect()
    }

    /// Checks that every section the host can report has a track.
    pub(crate) fn validate(&self) -> Result<(), RegistryError> {
        let missing = self.missing_sections();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(RegistryError::Missing(missing))
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (Section, &str)> {
        self.tracks
            .iter()
            .map(|(section, track)| (*section, track.as_str()))
    }
}
