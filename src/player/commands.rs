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

//! MPV-backed audio playback engine and event processing.
//!
//! This module leverages `libmpv` for audio decoding and playback. A
//! background worker thread owns the MPV handle and bridges the
//! command-based interface of [`MpvResource`](crate::player::MpvResource)
//! and the MPV property observation system.
//!
//! # Architecture
//!
//! 1. **Command Channel**: Receives [`AudioPlayerCommand`]s from the resource
//!    handle. Play commands carry their own reply channel.
//! 2. **Event Channel**: Reports failures as [`AppEvent`]s to the main loop.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc::{Receiver, Sender, TryRecvError},
    },
    thread,
};

use anyhow::{Context, Result};
use mpv::Format;

use crate::{
    actions::events::AppEvent,
    music::{PlaybackError, resource::PlayResult},
};

pub(crate) enum AudioPlayerCommand {
    Load(String),
    Play(Sender<PlayResult>),
    Pause,
    SetMuted(bool),
    SetVolume(f64),
}

impl std::fmt::Debug for AudioPlayerCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioPlayerCommand::Load(track) => write!(f, "Load({})", track),
            AudioPlayerCommand::Play(_) => f.write_str("Play"),
            AudioPlayerCommand::Pause => f.write_str("Pause"),
            AudioPlayerCommand::SetMuted(muted) => write!(f, "SetMuted({})", muted),
            AudioPlayerCommand::SetVolume(volume) => write!(f, "SetVolume({})", volume),
        }
    }
}

/// Spawns the audio worker thread to process playback commands.
///
/// If the internal worker returns an error, it is caught here and reported as
/// an [`AppEvent::AudioFailed`] so the host can fall back to silence.
///
/// # Arguments
///
/// * `command_rx` - The receiving end of the player command channel.
/// * `paused` - Shared flag mirroring the MPV `pause` property.
/// * `event_tx` - The channel used to report playback failures.
pub(crate) fn spawn_player_worker(
    command_rx: Receiver<AudioPlayerCommand>,
    paused: Arc<AtomicBool>,
    event_tx: Sender<AppEvent>,
) {
    let error_tx = event_tx.clone();

    thread::spawn(move || {
        if let Err(e) = audio_player_worker(command_rx, paused, event_tx) {
            log::error!("MPV worker failure: {:?}", e);
            let _ = error_tx.send(AppEvent::AudioFailed(format!("MPV worker failure: {}", e)));
        }
    });
}

/// The primary execution loop for the audio backend.
///
/// Initializes a local `libmpv` context, then alternates between draining
/// commands and polling MPV events until the resource handle is dropped.
///
/// # Errors
///
/// Returns an error if the MPV context fails to initialize or an MPV property
/// cannot be set.
fn audio_player_worker(
    command_rx: Receiver<AudioPlayerCommand>,
    paused: Arc<AtomicBool>,
    event_tx: Sender<AppEvent>,
) -> Result<()> {
    let mut handler = (|| {
        let mut builder = mpv::MpvHandlerBuilder::new().context("Failed to create MPV builder")?;
        builder
            .set_option("vo", "null")
            .context("Failed to set no video output")?;
        builder
            .set_option("loop-file", "inf")
            .context("Failed to enable looping")?;
        builder.build().context("Failed to build MPV handler")
    })()?;

    handler
        .observe_property::<bool>("pause", 0)
        .context("Failed to observe pause")?;

    let mut loaded = false;

    while process_commands(&mut handler, &command_rx, &paused, &mut loaded, &event_tx)? {
        process_mpv_events(&mut handler, &paused, &event_tx)?;
    }

    log::debug!("audio worker stopped");
    Ok(())
}

/// Drains and executes all pending commands.
///
/// Returns `false` once the resource handle has been dropped.
fn process_commands(
    handler: &mut mpv::MpvHandler,
    command_rx: &Receiver<AudioPlayerCommand>,
    paused: &AtomicBool,
    loaded: &mut bool,
    event_tx: &Sender<AppEvent>,
) -> Result<bool> {
    loop {
        let command = match command_rx.try_recv() {
            Ok(command) => command,
            Err(TryRecvError::Empty) => return Ok(true),
            Err(TryRecvError::Disconnected) => return Ok(false),
        };

        match command {
            AudioPlayerCommand::Load(track) => {
                handler
                    .set_property("pause", true)
                    .context("Failed to pause before load")?;
                paused.store(true, Ordering::Relaxed);

                match handler.command(&["loadfile", &track, "replace"]) {
                    Ok(()) => *loaded = true,
                    Err(e) => {
                        *loaded = false;
                        log::error!("failed to load {}: {:?}", track, e);
                        event_tx
                            .send(AppEvent::Error(format!("Failed to load {}", track)))
                            .context("Failed to send error event")?;
                    }
                }
            }
            AudioPlayerCommand::Play(reply_tx) => {
                let result = if *loaded {
                    handler
                        .set_property("pause", false)
                        .map_err(|e| PlaybackError::Backend(format!("{:?}", e)))
                } else {
                    Err(PlaybackError::Rejected("no track loaded".to_string()))
                };

                paused.store(result.is_err(), Ordering::Relaxed);
                let _ = reply_tx.send(result);
            }
            AudioPlayerCommand::Pause => {
                handler
                    .set_property("pause", true)
                    .context("Failed to pause")?;
                paused.store(true, Ordering::Relaxed);
            }
            AudioPlayerCommand::SetMuted(muted) => {
                handler
                    .set_property("mute", muted)
                    .context("Failed to set mute")?;
            }
            AudioPlayerCommand::SetVolume(volume) => {
                handler
                    .set_property("volume", volume)
                    .context("Failed to set volume")?;
            }
        }
    }
}

/// Polls for MPV events and keeps the shared pause flag current.
///
/// This function waits for up to 50ms for an event from the MPV context.
fn process_mpv_events(
    handler: &mut mpv::MpvHandler,
    paused: &AtomicBool,
    event_tx: &Sender<AppEvent>,
) -> Result<()> {
    if let Some(mpv_event) = handler.wait_event(0.05) {
        match mpv_event {
            mpv::Event::PropertyChange {
                name: "pause",
                change: Format::Flag(pause),
                ..
            } => {
                paused.store(pause, Ordering::Relaxed);
            }
            mpv::Event::EndFile(Err(e)) => {
                log::error!("playback ended with error: {:?}", e);
                event_tx
                    .send(AppEvent::Error("Track could not be played".to_string()))
                    .context("Failed to send error event")?;
            }
            _ => {}
        }
    }

    Ok(())
}
