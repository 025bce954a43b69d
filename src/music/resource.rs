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

//! The playable audio resource abstraction.
//!
//! The [`AudioSectionController`](crate::music::AudioSectionController) owns
//! exactly one value implementing [`AudioResource`]. Starting playback is the
//! only asynchronous operation; it hands back a [`PendingPlay`] that settles
//! later and is never waited on.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub(crate) enum PlaybackError {
    /// The backend refused to start, for example because nothing is loaded.
    #[error("playback rejected: {0}")]
    Rejected(String),

    #[error("audio backend error: {0}")]
    #[cfg_attr(not(feature = "mpv"), allow(dead_code))]
    Backend(String),

    /// The backend went away before answering.
    #[error("play request abandoned")]
    Abandoned,
}

pub(crate) type PlayResult = Result<(), PlaybackError>;

/// The not-yet-known outcome of a play command.
#[derive(Debug)]
pub(crate) struct PendingPlay {
    result_rx: Receiver<PlayResult>,
}

impl PendingPlay {
    /// Creates a pending result along with the sender the backend answers on.
    pub(crate) fn channel() -> (Sender<PlayResult>, Self) {
        let (result_tx, result_rx) = mpsc::channel();
        (result_tx, Self { result_rx })
    }

    /// A play command that settled immediately.
    pub(crate) fn settled(result: PlayResult) -> Self {
        let (result_tx, pending) = Self::channel();
        let _ = result_tx.send(result);
        pending
    }

    /// Returns the outcome if it is known, without blocking.
    pub(crate) fn poll(&self) -> Option<PlayResult> {
        match self.result_rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(PlaybackError::Abandoned)),
        }
    }
}

/// A single playable audio output.
///
/// Implementations only carry out commands; deciding which track should be
/// loaded and whether it should be audible belongs to the controller.
pub(crate) trait AudioResource {
    /// Sets the output level in the range `0.0..=1.0`.
    fn set_volume(&mut self, volume: f64);

    /// Attaches `track` and rewinds to the start. The resource is left paused.
    fn load(&mut self, track: &str);

    fn play(&mut self) -> PendingPlay;

    fn pause(&mut self);

    fn set_muted(&mut self, muted: bool);

    fn is_paused(&self) -> bool;
}

impl<R: AudioResource + ?Sized> AudioResource for Box<R> {
    fn set_volume(&mut self, volume: f64) {
        (**self).set_volume(volume)
    }

    fn load(&mut self, track: &str) {
        (**self).load(track)
    }

    fn play(&mut self) -> PendingPlay {
        (**self).play()
    }

    fn pause(&mut self) {
        (**self).pause()
    }

    fn set_muted(&mut self, muted: bool) {
        (**self).set_muted(muted)
    }

    fn is_paused(&self) -> bool {
        (**self).is_paused()
    }
}

/// Silent resource for running without an audio backend.
///
/// Every command is accepted and nothing is heard.
#[derive(Debug)]
pub(crate) struct NoopResource {
    paused: bool,
}

impl Default for NoopResource {
    fn default() -> Self {
        Self { paused: true }
    }
}

impl AudioResource for NoopResource {
    fn set_volume(&mut self, _: f64) {}

    fn load(&mut self, track: &str) {
        log::debug!("noop resource: load {}", track);
        self.paused = true;
    }

    fn play(&mut self) -> PendingPlay {
        self.paused = false;
        PendingPlay::settled(Ok(()))
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn set_muted(&mut self, _: bool) {}

    fn is_paused(&self) -> bool {
        self.paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_play_settles_when_answered() {
        let (result_tx, pending) = PendingPlay::channel();
        assert_eq!(pending.poll(), None);

        result_tx
            .send(Err(PlaybackError::Rejected("autoplay".into())))
            .unwrap();
        assert_eq!(
            pending.poll(),
            Some(Err(PlaybackError::Rejected("autoplay".into())))
        );
    }

    #[test]
    fn dropped_backend_abandons_the_request() {
        let (result_tx, pending) = PendingPlay::channel();
        drop(result_tx);
        assert_eq!(pending.poll(), Some(Err(PlaybackError::Abandoned)));
    }

    #[test]
    fn noop_resource_tracks_paused_state() {
        let mut resource = NoopResource::default();
        assert!(resource.is_paused());

        assert_eq!(resource.play().poll(), Some(Ok(())));
        assert!(!resource.is_paused());

        resource.load("ghar.mp3");
        assert!(resource.is_paused());
    }
}
