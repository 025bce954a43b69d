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

//! Stage flow of the card.
//!
//! The card moves from the welcome screen to the countdown lock screen and on
//! to the main site. Each stage reports the section in view to the music
//! controller; the main site reports whichever of its sections is scrolled
//! into view.
//!
//! The lock screen stays shut until the configured unlock time. From then on
//! every tick reports the unlock section again; the controller collapses the
//! repeats.

use std::{fmt, sync::mpsc::Sender, thread, time::Duration};

use anyhow::Result;
use chrono::{DateTime, TimeDelta, Utc};

use crate::{App, actions::events::AppEvent, music::Section};

/// Delay before the lock screen starts the music if nothing is playing yet.
pub(crate) const AUTO_PLAY_DELAY: Duration = Duration::from_secs(1);

/// How long the unlock song is heard before the main site appears.
pub(crate) const UNLOCK_DELAY: Duration = Duration::from_millis(500);

/// Sections of the main site, top to bottom.
pub(crate) const MAIN_SITE_SECTIONS: [Section; 3] =
    [Section::Hero, Section::Anniversary, Section::Footer];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Stage {
    Welcome,
    /// `open` once the unlock time has passed.
    LockScreen { open: bool },
    /// Between the unlock key and the main site.
    Unlocking,
    MainSite { visible: usize },
}

impl Stage {
    pub(crate) fn title(self) -> &'static str {
        match self {
            Stage::Welcome => "Welcome",
            Stage::LockScreen { .. } | Stage::Unlocking => "Countdown",
            Stage::MainSite { .. } => "Valentine's Week",
        }
    }

    /// The section this stage reports as in view.
    pub(crate) fn visible_section(self) -> Section {
        match self {
            Stage::Welcome => Section::Welcome,
            Stage::LockScreen { open: false } => Section::Lockscreen,
            Stage::LockScreen { open: true } | Stage::Unlocking => Section::Unlock,
            Stage::MainSite { visible } => {
                MAIN_SITE_SECTIONS[visible.min(MAIN_SITE_SECTIONS.len() - 1)]
            }
        }
    }
}

/// Time left on the lock screen, zero once the unlock time has passed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Countdown {
    pub(crate) days: i64,
    pub(crate) hours: i64,
    pub(crate) minutes: i64,
    pub(crate) seconds: i64,
}

impl Countdown {
    pub(crate) fn until(unlock_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let left = (unlock_at - now).max(TimeDelta::zero()).num_seconds();
        Self {
            days: left / 86_400,
            hours: left % 86_400 / 3_600,
            minutes: left % 3_600 / 60,
            seconds: left % 60,
        }
    }

    pub(crate) fn is_over(self) -> bool {
        self.days == 0 && self.hours == 0 && self.minutes == 0 && self.seconds == 0
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}d {:02}h {:02}m {:02}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// Sends `event` to the main loop after `delay`.
pub(crate) fn schedule(event_tx: &Sender<AppEvent>, delay: Duration, event: AppEvent) {
    let event_tx = event_tx.clone();
    thread::spawn(move || {
        thread::sleep(delay);
        let _ = event_tx.send(event);
    });
}

/// Switches to `stage` and reports its section.
pub(crate) fn enter_stage(app: &mut App, stage: Stage) -> Result<()> {
    log::info!("entering stage {:?}", stage);
    app.stage = stage;
    app.music.change_section(stage.visible_section())?;

    if matches!(stage, Stage::LockScreen { open: false }) {
        schedule(&app.event_tx, AUTO_PLAY_DELAY, AppEvent::AutoPlay);
    }

    Ok(())
}

/// Starts the music and leaves the welcome screen.
pub(crate) fn start(app: &mut App) -> Result<()> {
    if app.stage != Stage::Welcome {
        return Ok(());
    }

    app.music.play();
    enter_stage(app, Stage::LockScreen { open: false })
}

/// Opens the lock screen once the unlock time has passed.
///
/// Called on every tick; after the unlock time the unlock section is reported
/// each time.
pub(crate) fn tick(app: &mut App, now: DateTime<Utc>) -> Result<()> {
    if !matches!(app.stage, Stage::LockScreen { .. }) || now < app.unlock_at {
        return Ok(());
    }

    if app.stage == (Stage::LockScreen { open: false }) {
        log::info!("countdown finished, lock screen open");
    }

    app.stage = Stage::LockScreen { open: true };
    app.music.change_section(Section::Unlock)?;

    Ok(())
}

/// Plays the unlock song, then moves on to the main site.
///
/// Ignored until the unlock time has passed.
pub(crate) fn unlock(app: &mut App, now: DateTime<Utc>) -> Result<()> {
    if !matches!(app.stage, Stage::LockScreen { .. }) {
        return Ok(());
    }

    if now < app.unlock_at {
        log::debug!("still locked for {}", Countdown::until(app.unlock_at, now));
        return Ok(());
    }

    enter_stage(app, Stage::Unlocking)?;
    schedule(
        &app.event_tx,
        UNLOCK_DELAY,
        AppEvent::ShowStage(Stage::MainSite { visible: 0 }),
    );

    Ok(())
}

/// Starts the music if the user has not already done so.
pub(crate) fn auto_play(app: &mut App) {
    if !app.music.is_playing() {
        app.music.toggle_play();
    }
}

/// Moves the main site's visible section by `delta`, clamped to the page.
pub(crate) fn scroll(app: &mut App, delta: isize) -> Result<()> {
    let Stage::MainSite { visible } = app.stage else {
        return Ok(());
    };

    let last = MAIN_SITE_SECTIONS.len() - 1;
    let visible = visible.saturating_add_signed(delta).min(last);

    app.stage = Stage::MainSite { visible };
    app.music.change_section(app.stage.visible_section())?;

    Ok(())
}
