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

//! Terminal background colour control.
//!
//! The card paints the whole terminal window in its theme colour using OSC
//! escape sequences, supported by most modern terminals (XTerm, iTerm2,
//! Alacritty, Kitty). Terminals without support ignore them.

use std::io::{self, Write};

const OSC_SET_BACKGROUND: &str = "\x1b]11;";
const OSC_RESET_BACKGROUND: &str = "\x1b]111";
const BEL: &str = "\x07";

fn background_sequence(hex_colour: Option<&str>) -> String {
    match hex_colour {
        Some(hex) => format!("{}{}{}", OSC_SET_BACKGROUND, hex, BEL),
        None => format!("{}{}", OSC_RESET_BACKGROUND, BEL),
    }
}

// A failed write only costs the colour, so it is ignored.
fn write_sequence(sequence: &str) {
    let mut stdout = io::stdout();
    let _ = stdout.write_all(sequence.as_bytes());
    let _ = stdout.flush();
}

/// Paints the terminal background, e.g. with `"#281432"`.
pub(crate) fn set_terminal_bg(hex_colour: &str) {
    write_sequence(&background_sequence(Some(hex_colour)));
}

/// Restores the user's own terminal background.
pub(crate) fn reset_terminal_bg() {
    write_sequence(&background_sequence(None));
}
