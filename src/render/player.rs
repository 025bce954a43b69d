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

//! Render the music player bar.
//!
//! Shows the playback intent, the mute state and the "now playing" label for
//! the current section.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::{
    App,
    music::controller::DEFAULT_VOLUME,
    render::icons::{ICON_MUTED, ICON_NOTE, ICON_PAUSE, ICON_PLAY, ICON_VOLUME},
};

/// Renders the player bar: intent and label on the left, mute on the right.
pub(crate) fn draw_player(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;

    let block = Block::default()
        .borders(Borders::TOP | Borders::BOTTOM)
        .border_style(Style::default().fg(theme.border_colour))
        .padding(Padding::horizontal(1));

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(12)])
        .split(inner_area);

    let music = &app.music;
    let bold = Style::default().add_modifier(Modifier::BOLD);

    // The icon is the action a toggle would take, as on the card's button.
    let icon = if music.is_playing() { ICON_PAUSE } else { ICON_PLAY };

    let mut spans = vec![Span::styled(
        format!(" {} ", icon),
        bold.fg(theme.text_colour),
    )];

    if music.is_playing() {
        spans.push(Span::styled(
            format!("{} {}", ICON_NOTE, music.now_playing()),
            bold.fg(theme.accent_colour),
        ));
    } else {
        spans.push(Span::styled("Play Music", Style::default().fg(theme.dim_colour)));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), chunks[0]);

    let volume = if music.is_muted() {
        Span::styled(format!("{} muted", ICON_MUTED), bold.fg(theme.accent_colour))
    } else {
        Span::styled(format!("{} {:.0}%", ICON_VOLUME, DEFAULT_VOLUME * 100.0), Style::default().fg(theme.text_colour))
    };

    f.render_widget(
        Paragraph::new(Line::from(volume)).alignment(Alignment::Right),
        chunks[1],
    );
}
