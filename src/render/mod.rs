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

//! User interface rendering logic.
//!
//! This module handles the translation of the [`App`] state into visual
//! widgets using the `ratatui` framework.
//!
//! # Rendering Pipeline
//!
//! The primary entry point is the [`draw`] function, which is called after
//! every processed event.

mod icons;
mod player;
mod stage;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    App,
    render::{player::draw_player, stage::draw_stage},
};

const KEY_HELP: &str =
    "enter start  u unlock  j/k scroll  space play/pause  p play  s pause  m mute  q quit";

/// Renders the user interface to the terminal frame.
///
/// The screen is split into the current stage, the music player bar and a
/// single status line.
pub(crate) fn draw(f: &mut Frame, app: &App) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(4),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_stage(f, outer[0], app);
    draw_player(f, outer[1], app);

    let status = match &app.status {
        Some(message) => Line::from(Span::styled(
            message.as_str(),
            Style::default().fg(app.theme.accent_colour),
        )),
        None => Line::from(Span::styled(
            KEY_HELP,
            Style::default().fg(app.theme.dim_colour),
        )),
    };
    f.render_widget(Paragraph::new(status), outer[2]);
}
