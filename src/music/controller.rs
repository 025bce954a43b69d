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

//! Section-driven playback control.
//!
//! The [`AudioSectionController`] keeps the single audio resource's loaded
//! track in line with the current [`Section`], and its play and mute state in
//! line with user intent.
//!
//! # Reconciliation
//!
//! Every mutating operation ends with one call to `reconcile`, which is the
//! only place a track is ever loaded. A track is loaded only when the intended
//! locator differs from the one last loaded, because loading rewinds to the
//! start and is audible as a glitch.
//!
//! The loaded track is remembered by the controller and never read back from
//! the resource, so backends that normalise paths cannot cause false
//! mismatches.

use thiserror::Error;

use crate::music::{
    registry::TrackRegistry,
    resource::{AudioResource, PendingPlay, PlaybackError},
    section::Section,
};

/// Output level applied whenever a resource is bound.
pub(crate) const DEFAULT_VOLUME: f64 = 0.5;

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ControllerError {
    #[error("no track registered for section '{0}'")]
    UnknownSection(String),
}

/// How a section without a registry entry is handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ConfigErrorPolicy {
    /// Report the error to the caller.
    Strict,
    /// Log the error and leave the music unchanged.
    Lenient,
}

impl Default for ConfigErrorPolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            ConfigErrorPolicy::Strict
        } else {
            ConfigErrorPolicy::Lenient
        }
    }
}

/// Owns the audio resource and the playback state shared by every view.
///
/// There is one controller per running session. Views report which section is
/// visible and forward button presses; they never touch the resource.
pub(crate) struct AudioSectionController<R: AudioResource> {
    registry: TrackRegistry,
    policy: ConfigErrorPolicy,

    current_section: Section,
    is_playing: bool,
    is_muted: bool,
    loaded_track: Option<String>,

    resource: Option<R>,
    pending: Vec<(&'static str, PendingPlay)>,
}

impl<R: AudioResource> AudioSectionController<R> {
    pub(crate) fn new(registry: TrackRegistry) -> Self {
        Self::with_policy(registry, ConfigErrorPolicy::default())
    }

    pub(crate) fn with_policy(registry: TrackRegistry, policy: ConfigErrorPolicy) -> Self {
        Self {
            registry,
            policy,
            current_section: Section::default(),
            is_playing: false,
            is_muted: false,
            loaded_track: None,
            resource: None,
            pending: Vec::new(),
        }
    }

    /// Binds the audio resource, replacing any previously bound one.
    ///
    /// The new resource gets the default volume and the current mute flag, then
    /// a reconciliation catches it up with the state recorded so far.
    pub(crate) fn register_resource(&mut self, mut resource: R) {
        if self.resource.is_some() {
            log::debug!("rebinding audio resource");
        }

        resource.set_volume(DEFAULT_VOLUME);
        resource.set_muted(self.is_muted);

        // A fresh resource has nothing attached.
        self.loaded_track = None;
        self.resource = Some(resource);

        self.reconcile();
    }

    /// Reports that `section` is now the one in view.
    ///
    /// # Errors
    ///
    /// Under [`ConfigErrorPolicy::Strict`], returns
    /// [`ControllerError::UnknownSection`] if the registry has no track for
    /// `section`.
    pub(crate) fn change_section(&mut self, section: Section) -> Result<(), ControllerError> {
        if self.registry.track(section).is_none() {
            return self.configuration_error(section.as_str());
        }

        if section == self.current_section {
            return Ok(());
        }

        log::debug!("section {} -> {}", self.current_section, section);
        self.current_section = section;
        self.reconcile();

        Ok(())
    }

    /// Same as [`Self::change_section`] for callers holding a section name.
    pub(crate) fn change_section_by_name(&mut self, name: &str) -> Result<(), ControllerError> {
        match name.parse::<Section>() {
            Ok(section) => self.change_section(section),
            Err(_) => self.configuration_error(name),
        }
    }

    /// Flips playback intent and commands the resource straight away.
    ///
    /// A play issued here is not repeated by reconciliation, even if the
    /// resource refused it and still reports itself paused.
    pub(crate) fn toggle_play(&mut self) {
        self.is_playing = !self.is_playing;

        let mut play_issued = false;
        if let Some(resource) = self.resource.as_mut() {
            if self.is_playing {
                let pending = resource.play();
                self.pending.push(("toggle play", pending));
                play_issued = true;
            } else {
                resource.pause();
            }
        }

        self.sync(play_issued);
    }

    /// Records the intent to play. The play command itself is issued by
    /// reconciliation.
    pub(crate) fn play(&mut self) {
        if self.is_playing {
            return;
        }

        self.is_playing = true;
        self.reconcile();
    }

    pub(crate) fn pause(&mut self) {
        if !self.is_playing {
            return;
        }

        self.is_playing = false;
        if let Some(resource) = self.resource.as_mut() {
            resource.pause();
        }

        self.reconcile();
    }

    /// Silences or restores output. Playback keeps progressing while muted.
    pub(crate) fn toggle_mute(&mut self) {
        self.is_muted = !self.is_muted;

        if let Some(resource) = self.resource.as_mut() {
            resource.set_muted(self.is_muted);
        }

        self.reconcile();
    }

    /// Collects play commands that have settled since the last call.
    ///
    /// Failures are logged and returned. Playback intent is left untouched so
    /// the next user interaction retries.
    pub(crate) fn poll_pending(&mut self) -> Vec<PlaybackError> {
        let mut failures = Vec::new();

        self.pending.retain(|(context, pending)| match pending.poll() {
            None => true,
            Some(Ok(())) => false,
            Some(Err(e)) => {
                log::warn!("{} failed: {}", context, e);
                failures.push(e);
                false
            }
        });

        failures
    }

    pub(crate) fn current_section(&self) -> Section {
        self.current_section
    }

    pub(crate) fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub(crate) fn is_muted(&self) -> bool {
        self.is_muted
    }

    pub(crate) fn loaded_track(&self) -> Option<&str> {
        self.loaded_track.as_deref()
    }

    pub(crate) fn registry(&self) -> &TrackRegistry {
        &self.registry
    }

    pub(crate) fn now_playing(&self) -> &'static str {
        self.current_section.now_playing_label()
    }

    #[cfg(test)]
    pub(crate) fn has_resource(&self) -> bool {
        self.resource.is_some()
    }

    #[cfg(test)]
    pub(crate) fn pending_plays(&self) -> usize {
        self.pending.len()
    }

    fn configuration_error(&self, name: &str) -> Result<(), ControllerError> {
        match self.policy {
            ConfigErrorPolicy::Strict => Err(ControllerError::UnknownSection(name.to_string())),
            ConfigErrorPolicy::Lenient => {
                log::error!("no track registered for section '{}', music unchanged", name);
                Ok(())
            }
        }
    }

    // Brings the resource in line with the current section and intent.
    fn reconcile(&mut self) {
        self.sync(false);
    }

    fn sync(&mut self, play_issued: bool) {
        let Some(resource) = self.resource.as_mut() else {
            return;
        };

        let Some(intended) = self.registry.track(self.current_section) else {
            log::warn!("no track for section {}, leaving audio as is", self.current_section);
            return;
        };

        let audible = self.is_playing && !self.is_muted;

        if self.loaded_track.as_deref() != Some(intended) {
            log::info!(
                "changing track from {} to {}",
                self.loaded_track.as_deref().unwrap_or("<none>"),
                intended
            );

            resource.load(intended);
            self.loaded_track = Some(intended.to_string());

            if audible {
                let pending = resource.play();
                self.pending.push(("play after track change", pending));
            }
        } else if audible && !play_issued && resource.is_paused() {
            log::debug!("resuming {}", intended);
            let pending = resource.play();
            self.pending.push(("resume", pending));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    enum Command {
        SetVolume(f64),
        Load(String),
        Play,
        Pause,
        SetMuted(bool),
    }

    #[derive(Default)]
    struct FakeState {
        commands: Vec<Command>,
        paused: bool,
        muted: bool,
        position: u64,
        reject_play: bool,
    }

    /// Records commands into state the test keeps a handle to.
    struct FakeResource {
        state: Rc<RefCell<FakeState>>,
    }

    impl FakeResource {
        fn new() -> (Self, Rc<RefCell<FakeState>>) {
            let state = Rc::new(RefCell::new(FakeState {
                paused: true,
                ..FakeState::default()
            }));
            (
                Self {
                    state: Rc::clone(&state),
                },
                state,
            )
        }
    }

    impl AudioResource for FakeResource {
        fn set_volume(&mut self, volume: f64) {
            self.state.borrow_mut().commands.push(Command::SetVolume(volume));
        }

        fn load(&mut self, track: &str) {
            let mut state = self.state.borrow_mut();
            state.commands.push(Command::Load(track.to_string()));
            state.paused = true;
            state.position = 0;
        }

        fn play(&mut self) -> PendingPlay {
            let mut state = self.state.borrow_mut();
            state.commands.push(Command::Play);
            if state.reject_play {
                PendingPlay::settled(Err(PlaybackError::Rejected("user gesture required".into())))
            } else {
                state.paused = false;
                PendingPlay::settled(Ok(()))
            }
        }

        fn pause(&mut self) {
            let mut state = self.state.borrow_mut();
            state.commands.push(Command::Pause);
            state.paused = true;
        }

        fn set_muted(&mut self, muted: bool) {
            let mut state = self.state.borrow_mut();
            state.commands.push(Command::SetMuted(muted));
            state.muted = muted;
        }

        fn is_paused(&self) -> bool {
            self.state.borrow().paused
        }
    }

    fn registry() -> TrackRegistry {
        TrackRegistry::from_entries([
            (Section::Welcome, "tum-hi-ho.mp3"),
            (Section::Lockscreen, "tum-hi-ho.mp3"),
            (Section::Unlock, "happy-birthday.mp3"),
        ])
    }

    fn controller(policy: ConfigErrorPolicy) -> AudioSectionController<FakeResource> {
        AudioSectionController::with_policy(registry(), policy)
    }

    fn take_commands(state: &Rc<RefCell<FakeState>>) -> Vec<Command> {
        std::mem::take(&mut state.borrow_mut().commands)
    }

    /// Bound and playing the welcome track, with the command log cleared.
    fn playing_controller() -> (AudioSectionController<FakeResource>, Rc<RefCell<FakeState>>) {
        let mut controller = controller(ConfigErrorPolicy::Strict);
        let (resource, state) = FakeResource::new();
        controller.register_resource(resource);
        controller.play();
        take_commands(&state);
        (controller, state)
    }

    #[test]
    fn walkthrough_from_welcome_to_unlock() {
        let mut controller = controller(ConfigErrorPolicy::Strict);
        let (resource, state) = FakeResource::new();

        assert_eq!(controller.current_section(), Section::Welcome);
        assert!(!controller.is_playing());
        assert!(!controller.has_resource());

        controller.register_resource(resource);
        assert_eq!(
            take_commands(&state),
            vec![
                Command::SetVolume(0.5),
                Command::SetMuted(false),
                Command::Load("tum-hi-ho.mp3".into()),
            ]
        );

        controller.play();
        assert!(controller.is_playing());
        assert_eq!(controller.loaded_track(), Some("tum-hi-ho.mp3"));
        assert_eq!(take_commands(&state), vec![Command::Play]);

        controller.change_section(Section::Lockscreen).unwrap();
        assert_eq!(controller.current_section(), Section::Lockscreen);
        assert!(take_commands(&state).is_empty());

        state.borrow_mut().position = 30;
        controller.change_section(Section::Unlock).unwrap();
        assert_eq!(controller.loaded_track(), Some("happy-birthday.mp3"));
        assert_eq!(
            take_commands(&state),
            vec![Command::Load("happy-birthday.mp3".into()), Command::Play]
        );
        assert_eq!(state.borrow().position, 0);

        state.borrow_mut().position = 12;
        controller.toggle_mute();
        assert!(controller.is_muted());
        assert!(state.borrow().muted);
        assert_eq!(take_commands(&state), vec![Command::SetMuted(true)]);
        assert_eq!(controller.loaded_track(), Some("happy-birthday.mp3"));
        assert_eq!(state.borrow().position, 12);

        assert!(controller.poll_pending().is_empty());
        assert_eq!(controller.pending_plays(), 0);
    }

    #[test]
    fn reporting_the_current_section_again_does_nothing() {
        let (mut controller, state) = playing_controller();

        controller.change_section(Section::Welcome).unwrap();

        assert_eq!(controller.loaded_track(), Some("tum-hi-ho.mp3"));
        assert!(take_commands(&state).is_empty());
    }

    #[test]
    fn changing_to_a_different_track_loads_and_plays_once() {
        let (mut controller, state) = playing_controller();

        controller.change_section(Section::Unlock).unwrap();

        let commands = take_commands(&state);
        assert_eq!(controller.loaded_track(), Some("happy-birthday.mp3"));
        assert_eq!(
            commands.iter().filter(|c| **c == Command::Play).count(),
            1
        );
        assert_eq!(commands[0], Command::Load("happy-birthday.mp3".into()));
    }

    #[test]
    fn shared_track_is_not_reloaded_but_resumes_when_paused() {
        let (mut controller, state) = playing_controller();
        state.borrow_mut().paused = true;
        state.borrow_mut().position = 77;

        controller.change_section(Section::Lockscreen).unwrap();

        assert_eq!(take_commands(&state), vec![Command::Play]);
        assert_eq!(state.borrow().position, 77);
    }

    #[test]
    fn pause_when_not_playing_issues_nothing() {
        let mut controller = controller(ConfigErrorPolicy::Strict);
        let (resource, state) = FakeResource::new();
        controller.register_resource(resource);
        take_commands(&state);

        controller.pause();

        assert!(!controller.is_playing());
        assert!(take_commands(&state).is_empty());
    }

    #[test]
    fn pause_while_playing_pauses_eagerly() {
        let (mut controller, state) = playing_controller();

        controller.pause();

        assert!(!controller.is_playing());
        assert_eq!(take_commands(&state), vec![Command::Pause]);
    }

    #[test]
    fn play_is_idempotent() {
        let (mut controller, state) = playing_controller();

        controller.play();

        assert!(take_commands(&state).is_empty());
    }

    #[test]
    fn toggle_play_commands_the_resource_directly() {
        let mut controller = controller(ConfigErrorPolicy::Strict);
        let (resource, state) = FakeResource::new();
        controller.register_resource(resource);
        take_commands(&state);

        controller.toggle_play();
        assert!(controller.is_playing());
        assert_eq!(take_commands(&state), vec![Command::Play]);

        controller.toggle_play();
        assert!(!controller.is_playing());
        assert_eq!(take_commands(&state), vec![Command::Pause]);
    }

    #[test]
    fn refused_toggle_play_is_not_repeated() {
        let mut controller = controller(ConfigErrorPolicy::Strict);
        let (resource, state) = FakeResource::new();
        state.borrow_mut().reject_play = true;
        controller.register_resource(resource);
        take_commands(&state);

        controller.toggle_play();

        assert!(controller.is_playing());
        assert!(state.borrow().paused);
        assert_eq!(take_commands(&state), vec![Command::Play]);
        assert_eq!(controller.poll_pending().len(), 1);
    }

    #[test]
    fn state_is_recorded_before_binding_and_caught_up_on_bind() {
        let mut controller = controller(ConfigErrorPolicy::Strict);

        controller.play();
        controller.change_section(Section::Unlock).unwrap();
        controller.toggle_mute();
        controller.toggle_mute();

        assert!(controller.is_playing());
        assert_eq!(controller.current_section(), Section::Unlock);
        assert_eq!(controller.loaded_track(), None);

        let (resource, state) = FakeResource::new();
        controller.register_resource(resource);

        assert_eq!(
            take_commands(&state),
            vec![
                Command::SetVolume(0.5),
                Command::SetMuted(false),
                Command::Load("happy-birthday.mp3".into()),
                Command::Play,
            ]
        );
    }

    #[test]
    fn rebinding_loads_the_track_into_the_new_resource() {
        let (mut controller, old_state) = playing_controller();
        controller.toggle_mute();
        take_commands(&old_state);

        let (resource, state) = FakeResource::new();
        controller.register_resource(resource);

        assert!(take_commands(&old_state).is_empty());
        assert_eq!(
            take_commands(&state),
            vec![
                Command::SetVolume(0.5),
                Command::SetMuted(true),
                Command::Load("tum-hi-ho.mp3".into()),
            ]
        );
    }

    #[test]
    fn muted_track_change_defers_play_until_unmuted() {
        let (mut controller, state) = playing_controller();
        controller.toggle_mute();
        take_commands(&state);

        controller.change_section(Section::Unlock).unwrap();
        assert_eq!(
            take_commands(&state),
            vec![Command::Load("happy-birthday.mp3".into())]
        );

        controller.toggle_mute();
        assert_eq!(
            take_commands(&state),
            vec![Command::SetMuted(false), Command::Play]
        );
    }

    #[test]
    fn rejected_play_keeps_intent_and_retries_on_next_toggle() {
        let mut controller = controller(ConfigErrorPolicy::Strict);
        let (resource, state) = FakeResource::new();
        state.borrow_mut().reject_play = true;
        controller.register_resource(resource);

        controller.play();
        let failures = controller.poll_pending();

        assert_eq!(
            failures,
            vec![PlaybackError::Rejected("user gesture required".into())]
        );
        assert!(controller.is_playing());
        assert_eq!(controller.pending_plays(), 0);

        state.borrow_mut().reject_play = false;
        take_commands(&state);
        controller.toggle_play();
        controller.toggle_play();

        assert!(controller.is_playing());
        assert!(!state.borrow().paused);
        assert_eq!(take_commands(&state), vec![Command::Pause, Command::Play]);
    }

    #[test]
    fn unsettled_play_stays_pending() {
        struct SlowResource(Vec<std::sync::mpsc::Sender<Result<(), PlaybackError>>>);

        impl AudioResource for SlowResource {
            fn set_volume(&mut self, _: f64) {}
            fn load(&mut self, _: &str) {}
            fn play(&mut self) -> PendingPlay {
                let (result_tx, pending) = PendingPlay::channel();
                self.0.push(result_tx);
                pending
            }
            fn pause(&mut self) {}
            fn set_muted(&mut self, _: bool) {}
            fn is_paused(&self) -> bool {
                false
            }
        }

        let mut controller = AudioSectionController::with_policy(registry(), ConfigErrorPolicy::Strict);
        controller.play();
        controller.register_resource(SlowResource(Vec::new()));

        assert_eq!(controller.pending_plays(), 1);
        assert!(controller.poll_pending().is_empty());
        assert_eq!(controller.pending_plays(), 1);
    }

    #[test]
    fn unknown_section_fails_loudly_when_strict() {
        let (mut controller, state) = playing_controller();

        assert_eq!(
            controller.change_section(Section::Footer),
            Err(ControllerError::UnknownSection("footer".into()))
        );
        assert_eq!(
            controller.change_section_by_name("gallery"),
            Err(ControllerError::UnknownSection("gallery".into()))
        );
        assert_eq!(controller.current_section(), Section::Welcome);
        assert!(take_commands(&state).is_empty());
    }

    #[test]
    fn unknown_section_is_a_no_op_when_lenient() {
        let mut controller = controller(ConfigErrorPolicy::Lenient);
        let (resource, state) = FakeResource::new();
        controller.register_resource(resource);
        take_commands(&state);

        assert_eq!(controller.change_section(Section::Hero), Ok(()));
        assert_eq!(controller.change_section_by_name("gallery"), Ok(()));

        assert_eq!(controller.current_section(), Section::Welcome);
        assert_eq!(controller.loaded_track(), Some("tum-hi-ho.mp3"));
        assert!(take_commands(&state).is_empty());
    }

    #[test]
    fn section_names_are_accepted() {
        let (mut controller, _state) = playing_controller();

        controller.change_section_by_name("unlock").unwrap();

        assert_eq!(controller.current_section(), Section::Unlock);
        assert_eq!(controller.now_playing(), "Happy Valentine's Week!");
        assert_eq!(controller.registry().track(Section::Unlock), Some("happy-birthday.mp3"));
    }
}
