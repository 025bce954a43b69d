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

//! Render the current stage of the card.
//!
//! The stage panel lists the card's sections in page order, marking the one
//! the music controller currently treats as in view.

use chrono::Utc;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::{
    App,
    actions::stage::{Countdown, Stage},
    render::icons::HEART,
};

fn stage_hint(app: &App) -> String {
    match app.stage {
        Stage::Welcome => "Press enter to begin".to_string(),
        Stage::LockScreen { open: false } => {
            format!("Unlocks in {}", Countdown::until(app.unlock_at, Utc::now()))
        }
        Stage::LockScreen { open: true } => "It's time, press u to unlock".to_string(),
        Stage::Unlocking => "Unlocking...".to_string(),
        Stage::MainSite { .. } => "Scroll with j and k".to_string(),
    }
}

pub(crate) fn draw_stage(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_colour))
        .title(Line::from(format!(" {} {} ", HEART, app.stage.title())).alignment(Alignment::Center))
        .padding(Padding::uniform(1));

    let current = app.music.current_section();

    let mut lines = vec![
        Line::from(Span::styled(
            stage_hint(app),
            Style::default().fg(theme.dim_colour),
        )),
        Line::default(),
    ];

    lines.extend(app.music.registry().iter().map(|(section, track)| {
        if section == current {
            Line::from(vec![
                Span::styled(
                    format!("> {:<12}", section.as_str()),
                    Style::default()
                        .fg(theme.accent_colour)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(track, Style::default().fg(theme.text_colour)),
            ])
        } else {
            Line::from(vec![
                Span::styled(
                    format!("  {:<12}", section.as_str()),
                    Style::default().fg(theme.dim_colour),
                ),
                Span::styled(track, Style::default().fg(theme.dim_colour)),
            ])
        }
    }));

    f.render_widget(Paragraph::new(lines).block(block), area);
}
