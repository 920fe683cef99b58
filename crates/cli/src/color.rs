// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::builder::styling::{Ansi256Color, Color, Style, Styles};
use dw_core::Status;
use std::io::IsTerminal;

pub mod codes {
    /// Section headers: pastel cyan / steel blue
    pub const HEADER: u8 = 74;
    /// Commands and literals: light grey
    pub const LITERAL: u8 = 250;
    /// Descriptions and context: medium grey
    pub const CONTEXT: u8 = 245;
    /// Muted / secondary text: darker grey
    pub const MUTED: u8 = 240;
    /// `ready`
    pub const GREEN: u8 = 71;
    /// `failed`
    pub const RED: u8 = 167;
    /// `building` / `deploying`
    pub const YELLOW: u8 = 179;
}

/// Determine if color output should be enabled.
///
/// Priority: `NO_COLOR=1` disables → `COLOR=1` forces → TTY check.
pub fn should_colorize() -> bool {
    if std::env::var("NO_COLOR").is_ok_and(|v| v == "1") {
        return false;
    }
    if std::env::var("COLOR").is_ok_and(|v| v == "1") {
        return true;
    }
    std::io::stdout().is_terminal()
}

/// Build clap `Styles` using the project palette.
pub fn styles() -> Styles {
    if !should_colorize() {
        return Styles::plain();
    }
    Styles::styled()
        .header(Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(codes::HEADER)))))
        .literal(Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(codes::LITERAL)))))
        .placeholder(Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(codes::CONTEXT)))))
}

const RESET: &str = "\x1b[0m";

/// Wrap `text` in a 256-color foreground when `enabled`.
pub fn paint(enabled: bool, code: u8, text: &str) -> String {
    if enabled {
        format!("\x1b[38;5;{code}m{text}{RESET}")
    } else {
        text.to_string()
    }
}

/// Palette entry for a deployment status.
pub fn status_code(status: Status) -> u8 {
    match status {
        Status::Ready => codes::GREEN,
        Status::Failed => codes::RED,
        Status::Building | Status::Deploying => codes::YELLOW,
        Status::Pending | Status::Cancelled => codes::CONTEXT,
    }
}

pub fn status(enabled: bool, status: Status) -> String {
    paint(enabled, status_code(status), &status.to_string())
}

pub fn header(enabled: bool, text: &str) -> String {
    paint(enabled, codes::HEADER, text)
}

pub fn context(enabled: bool, text: &str) -> String {
    paint(enabled, codes::CONTEXT, text)
}

pub fn muted(enabled: bool, text: &str) -> String {
    paint(enabled, codes::MUTED, text)
}

#[cfg(test)]
#[path = "color_tests.rs"]
mod tests;
