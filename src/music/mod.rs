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

//! Section-synchronised background music.
//!
//! * [`section`]: the content regions the host reports.
//! * [`registry`]: the fixed section to track table.
//! * [`resource`]: the playable audio resource abstraction.
//! * [`controller`]: the state machine tying them together.

pub(crate) mod controller;
pub(crate) mod registry;
pub(crate) mod resource;
pub(crate) mod section;

pub(crate) use controller::AudioSectionController;
pub(crate) use registry::TrackRegistry;
pub(crate) use resource::{AudioResource, NoopResource};
#[cfg_attr(not(feature = "mpv"), allow(unused_imports))]
pub(crate) use resource::{PendingPlay, PlaybackError};
pub(crate) use section::Section;
