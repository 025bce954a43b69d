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

//! Content sections that drive music selection.
//!
//! A [`Section`] is the symbolic tag for whichever region of the card the user
//! is currently looking at. It is only a lookup key into the
//! [`TrackRegistry`](crate::music::TrackRegistry).

use std::{fmt, str::FromStr};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum SectionError {
    #[error("unknown section '{0}'")]
    Unknown(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum Section {
    #[default]
    Welcome,
    Lockscreen,
    Unlock,
    Hero,
    Anniversary,
    Footer,
}

impl Section {
    /// Every section the host can report, in page order.
    pub(crate) const ALL: [Section; 6] = [
        Section::Welcome,
        Section::Lockscreen,
        Section::Unlock,
        Section::Hero,
        Section::Anniversary,
        Section::Footer,
    ];

    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Section::Welcome => "welcome",
            Section::Lockscreen => "lockscreen",
            Section::Unlock => "unlock",
            Section::Hero => "hero",
            Section::Anniversary => "anniversary",
            Section::Footer => "footer",
        }
    }

    /// Display text for the "now playing" badge while this section is current.
    pub(crate) const fn now_playing_label(self) -> &'static str {
        match self {
            Section::Welcome | Section::Lockscreen => "Tum Hi Ho",
            Section::Unlock => "Happy Valentine's Week!",
            Section::Hero => "Daylight",
            Section::Anniversary => "Pehli Nazar Mein",
            Section::Footer => "Ghar",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = SectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| SectionError::Unknown(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse_back_to_the_same_section() {
        for section in Section::ALL {
            assert_eq!(section.as_str().parse::<Section>(), Ok(section));
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert_eq!(
            "gallery".parse::<Section>(),
            Err(SectionError::Unknown("gallery".to_string()))
        );
        // Identifiers are exact, no case folding.
        assert!("Welcome".parse::<Section>().is_err());
    }

    #[test]
    fn default_section_is_welcome() {
        assert_eq!(Section::default(), Section::Welcome);
    }

    #[test]
    fn sections_sharing_a_song_share_a_label() {
        assert_eq!(
            Section::Welcome.now_playing_label(),
            Section::Lockscreen.now_playing_label()
        );
        assert_eq!(Section::Footer.to_string(), "footer");
    }
}
