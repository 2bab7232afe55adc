// SPDX-License-Identifier: MIT

//! Symbolic key names and their control-character equivalents.
//!
//! The transport maps key names to raw sequences before calling the
//! runner's `write`; the runner itself only ever sees bytes.

/// Resolve a symbolic key name to the sequence sent to the PTY.
///
/// Returns `None` for unknown names; matching is case-insensitive.
pub fn key_sequence(name: &str) -> Option<&'static str> {
    let sequence = match name.to_ascii_lowercase().as_str() {
        "enter" | "return" => "\r",
        "space" => " ",
        "tab" => "\t",
        "escape" | "esc" => "\x1b",
        "backspace" => "\x7f",
        "up" => "\x1b[A",
        "down" => "\x1b[B",
        "right" => "\x1b[C",
        "left" => "\x1b[D",
        _ => return None,
    };
    Some(sequence)
}
