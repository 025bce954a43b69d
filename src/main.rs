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

//! # Valentine's Week card.
//!
//! A terminal rendition of an interactive greeting card whose background
//! music follows the section in view.
//!
//! It uses an event-driven architecture where:
//!
//! * The **Main Thread** manages the terminal lifecycle, UI rendering and
//!   every call into the music controller.
//! * A **Background Worker** owns the MPV audio handle.
//! * **Input, Tick and Timer Threads** feed events into a single channel.
//!
//! ## Architecture
//!
//! The application follows a strict setup-run-teardown pattern to ensure the
//! terminal state is preserved even in the event of a crash. Communication
//! between threads is handled via `std::sync::mpsc` channels.

mod actions;
mod config;
mod music;
#[cfg(feature = "mpv")]
mod player;
mod render;
mod theme;
mod util;

use std::{
    fs::{self, OpenOptions},
    io,
    sync::mpsc::{self, Receiver, Sender},
    thread,
    time::Duration,
};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use crossterm::{
    event,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::{
    actions::{
        events::{AppEvent, process_events},
        stage::{self, Stage},
    },
    config::AppConfig,
    music::{AudioResource, AudioSectionController, NoopResource},
    theme::Theme,
};

const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// Application state.
struct App {
    pub config: AppConfig,

    pub theme: Theme,
    pub stage: Stage,
    /// When the lock screen opens.
    pub unlock_at: DateTime<Utc>,

    pub event_tx: Sender<AppEvent>,
    pub event_rx: Receiver<AppEvent>,

    /// The one music controller for the whole session.
    pub music: AudioSectionController<Box<dyn AudioResource>>,

    pub status: Option<String>,
}

impl App {
    /// Create a new instance of application state.
    ///
    /// The music controller starts without an audio resource; see
    /// [`audio_resource`].
    pub fn new(config: AppConfig) -> Result<Self> {
        let registry = config.track_registry()?;
        let unlock_at = config.unlock_target()?;
        let (event_tx, event_rx) = mpsc::channel();

        Ok(Self {
            config,
            theme: Theme::default(),
            stage: Stage::Welcome,
            unlock_at,
            event_tx,
            event_rx,
            music: AudioSectionController::new(registry),
            status: None,
        })
    }
}

/// The entry point of the application.
///
/// Sets up logging, initializes the application state, binds the audio
/// resource, manages the terminal lifecycle, and returns an error if any part
/// of the execution fails.
fn main() -> Result<()> {
    let config = config::load_config();

    init_logging(&config)?;

    let mut app = App::new(config).context("Failed to initialise application")?;

    let resource = audio_resource(&app.config, &app.event_tx);
    app.music.register_resource(resource);
    stage::enter_stage(&mut app, Stage::Welcome)?;

    let mut terminal = setup_terminal(&app)?;
    let res = run(&mut terminal, &mut app);
    restore_terminal(&mut terminal);

    res.context("Application error occurred")
}

/// Sends log output to a file so it does not corrupt the terminal UI.
///
/// The level is taken from `RUST_LOG`, defaulting to `info`.
fn init_logging(config: &AppConfig) -> Result<()> {
    let path = config.log_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("Failed to initialise logging")?;

    log::info!("logging to {}", path.display());
    Ok(())
}

#[cfg(feature = "mpv")]
fn audio_resource(config: &AppConfig, event_tx: &Sender<AppEvent>) -> Box<dyn AudioResource> {
    if config.silent {
        return silent_resource();
    }
    Box::new(player::MpvResource::new(event_tx.clone()))
}

#[cfg(not(feature = "mpv"))]
fn audio_resource(_: &AppConfig, _: &Sender<AppEvent>) -> Box<dyn AudioResource> {
    silent_resource()
}

fn silent_resource() -> Box<dyn AudioResource> {
    log::info!("running without audio output");
    Box::new(NoopResource::default())
}

/// Prepares the terminal for the TUI application.
///
/// This function performs the following side effects:
/// * Sets the terminal background color based on the provided theme.
/// * Enables raw mode to capture all keyboard input.
/// * Switches the terminal to the alternate screen buffer.
///
/// # Errors
///
/// Returns an error if raw mode cannot be enabled or if the alternate screen
/// cannot be entered.
fn setup_terminal(app: &App) -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    if let Some(hex) = Theme::to_hex(app.theme.background_colour) {
        util::term::set_terminal_bg(&hex);
    }

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    Ok(terminal)
}

/// Restores the terminal to its original state.
///
/// Best-effort: this is called during cleanup and never fails.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) {
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    util::term::reset_terminal_bg();
    terminal.show_cursor().ok();
}

/// Starts the input and tick threads and enters the main event loop.
///
/// Ticks give the music controller a regular chance to collect the outcome
/// of play requests.
fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let tx_keys = app.event_tx.clone();
    thread::spawn(move || {
        loop {
            if let Ok(event::Event::Key(key)) = event::read() {
                if tx_keys.send(AppEvent::Key(key)).is_err() {
                    break;
                }
            }
        }
    });

    let tx_tick = app.event_tx.clone();
    thread::spawn(move || {
        while tx_tick.send(AppEvent::Tick).is_ok() {
            thread::sleep(TICK_INTERVAL);
        }
    });

    process_events(terminal, app)
}
