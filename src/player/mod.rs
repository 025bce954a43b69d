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

//! MPV-backed audio resource.
//!
//! This module provides [`MpvResource`], the [`AudioResource`] bound to the
//! music controller in normal operation. It manages a background worker thread
//! that interfaces with the underlying audio library (MPV), ensuring that
//! audio operations do not block the main application thread.

mod commands;

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
    mpsc::{self, Sender},
};

use crate::{
    actions::events::AppEvent,
    music::{AudioResource, PendingPlay},
    player::commands::AudioPlayerCommand,
};

/// A handle to the audio playback worker.
///
/// This struct acts as a command proxy; it does not perform audio processing
/// itself but instead sends instructions to a background worker thread.
/// Dropping it stops the worker.
pub(crate) struct MpvResource {
    /// Channel for sending commands to the background worker thread.
    command_tx: Sender<AudioPlayerCommand>,

    /// Mirrors the MPV `pause` property, written by the worker.
    paused: Arc<AtomicBool>,
}

impl MpvResource {
    /// Spawns the audio worker thread and returns a new resource handle.
    ///
    /// # Arguments
    ///
    /// * `event_tx` - A channel to report load failures and worker crashes
    ///   back to the main event loop.
    pub(crate) fn new(event_tx: Sender<AppEvent>) -> Self {
        let (command_tx, command_rx) = mpsc::channel::<AudioPlayerCommand>();
        let paused = Arc::new(AtomicBool::new(true));

        commands::spawn_player_worker(command_rx, Arc::clone(&paused), event_tx);

        Self { command_tx, paused }
    }

    fn send(&self, command: AudioPlayerCommand) {
        if let Err(e) = self.command_tx.send(command) {
            log::error!("audio worker is gone, dropped {:?}", e.0);
        }
    }
}

impl AudioResource for MpvResource {
    fn set_volume(&mut self, volume: f64) {
        self.send(AudioPlayerCommand::SetVolume(volume.clamp(0.0, 1.0) * 100.0));
    }

    fn load(&mut self, track: &str) {
        self.paused.store(true, Ordering::Relaxed);
        self.send(AudioPlayerCommand::Load(track.to_string()));
    }

    fn play(&mut self) -> PendingPlay {
        let (result_tx, pending) = PendingPlay::channel();

        // The worker puts this back if the request is refused.
        self.paused.store(false, Ordering::Relaxed);

        // If the worker is gone the reply sender is dropped with the command
        // and the request reads as abandoned.
        self.send(AudioPlayerCommand::Play(result_tx));

        pending
    }

    fn pause(&mut self) {
        self.paused.store(true, Ordering::Relaxed);
        self.send(AudioPlayerCommand::Pause);
    }

    fn set_muted(&mut self, muted: bool) {
        self.send(AudioPlayerCommand::SetMuted(muted));
    }

    fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }
}
