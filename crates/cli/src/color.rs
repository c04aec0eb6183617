// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Color handling for console output

use clap::ValueEnum;
use std::io::IsTerminal;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorMode {
    Auto,
    #[default]
    Always,
    Never,
}

impl std::fmt::Display for ColorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mode = match self {
            ColorMode::Auto => "auto",
            ColorMode::Always => "always",
            ColorMode::Never => "never",
        };
        write!(f, "{mode}")
    }
}

static MODE: OnceLock<ColorMode> = OnceLock::new();

/// Fix the color mode for the rest of the process. Later calls are ignored.
pub fn set_mode(mode: ColorMode) {
    let _ = MODE.set(mode);
}

/// Whether output should carry color codes.
///
/// `auto` honors `NO_COLOR` and requires stdout to be a terminal.
pub fn should_colorize() -> bool {
    match MODE.get().copied().unwrap_or_default() {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            if std::env::var("NO_COLOR").is_ok_and(|v| !v.is_empty()) {
                return false;
            }
            std::io::stdout().is_terminal()
        }
    }
}

const RESET: &str = "\x1b[0m";

fn paint(code: &str, text: &str, colorize: bool) -> String {
    if colorize {
        format!("{code}{text}{RESET}")
    } else {
        text.to_string()
    }
}

/// Apply green (ANSI 32) to text, respecting color settings.
pub fn green(text: &str) -> String {
    paint("\x1b[32m", text, should_colorize())
}

/// Apply yellow (ANSI 33) to text, respecting color settings.
pub fn yellow(text: &str) -> String {
    paint("\x1b[33m", text, should_colorize())
}

/// Apply red (ANSI 31) to text, respecting color settings.
pub fn red(text: &str) -> String {
    paint("\x1b[31m", text, should_colorize())
}

#[cfg(test)]
#[path = "color_tests.rs"]
mod tests;
