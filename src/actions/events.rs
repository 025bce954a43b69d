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

//! Application event distribution and orchestration.
//!
//! This module defines the central event-handling logic for the application,
//! bridging user input, timers and the audio worker to the music controller
//! and the UI rendering pipeline.
//!
//! # Architecture
//!
//! 1. **Capture**: Events are received via the [`AppEvent`] enum through a
//!    single channel.
//! 2. **Process**: [`handle_event`] updates the [`App`] state. Every call into
//!    the music controller happens here, on the main thread, so no two
//!    reconciliations ever overlap.
//! 3. **Render**: After each event is processed, the UI is re-drawn using the
//!    `ratatui` terminal.

use std::io::Stdout;

use anyhow::Result;
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, prelude::CrosstermBackend};

use crate::{
    App,
    actions::stage::{self, Stage},
    music::NoopResource,
    render::draw,
};

#[derive(Debug)]
pub(crate) enum AppEvent {
    Key(KeyEvent),

    ShowStage(Stage),
    AutoPlay,

    Tick,

    ExitApplication,

    // Only the mpv worker reports these.
    #[cfg_attr(not(feature = "mpv"), allow(dead_code))]
    Error(String),
    #[cfg_attr(not(feature = "mpv"), allow(dead_code))]
    AudioFailed(String),
}

/// Runs the main application loop, handling events and rendering the UI in the
/// terminal.
///
/// This function loops until a 'quit' event is received or the event channel
/// is closed.
pub(crate) fn process_events(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> Result<()> {
    terminal.draw(|f| draw(f, app))?;

    while let Ok(event) = app.event_rx.recv() {
        if !handle_event(app, event)? {
            break;
        }

        terminal.draw(|f| draw(f, app))?;
    }

    Ok(())
}

/// Applies a single event to the application state.
///
/// Returns `false` when the application should exit.
pub(crate) fn handle_event(app: &mut App, event: AppEvent) -> Result<bool> {
    match event {
        AppEvent::ExitApplication => return Ok(false),
        AppEvent::Key(key) => process_key_event(app, key)?,
        AppEvent::ShowStage(next) => stage::enter_stage(app, next)?,
        AppEvent::AutoPlay => stage::auto_play(app),
        AppEvent::Tick => {
            if let Some(err) = app.music.poll_pending().pop() {
                app.status = Some(format!("Music didn't start ({}), press space to retry", err));
            }
            stage::tick(app, Utc::now())?;
        }
        AppEvent::Error(message) => {
            log::warn!("{}", message);
            app.status = Some(message);
        }
        AppEvent::AudioFailed(message) => {
            // Carry on in silence rather than taking the card down.
            log::error!("{}, continuing without audio", message);
            app.status = Some("Audio unavailable".to_string());
            app.music.register_resource(Box::new(NoopResource::default()));
        }
    }

    Ok(true)
}

/// Maps keyboard input to stage navigation and playback commands.
///
/// # Errors
///
/// Returns an error if an event cannot be sent or the music controller
/// rejects a section.
fn process_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    if key.kind != KeyEventKind::Press {
        return Ok(());
    }

    app.status = None;

    match key.code {
        KeyCode::Char('q') => app.event_tx.send(AppEvent::ExitApplication)?,

        KeyCode::Enter => stage::start(app)?,
        KeyCode::Char('u') => stage::unlock(app, Utc::now())?,

        KeyCode::Char('j') | KeyCode::Down => stage::scroll(app, 1)?,
        KeyCode::Char('k') | KeyCode::Up => stage::scroll(app, -1)?,

        KeyCode::Char(' ') => app.music.toggle_play(),
        KeyCode::Char('p') => app.music.play(),
        KeyCode::Char('s') => app.music.pause(),
        KeyCode::Char('m') => app.music.toggle_mute(),

        _ => {}
    }

    Ok(())
}
