//! Severity labels and their display colors.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::style::{Color, Style};

/// A recognized log severity.
///
/// Both zap's level names (`debug`, `info`, `warn`, `error`, `dpanic`,
/// `panic`, `fatal`) and the upper-case severities written by the Stackdriver
/// driver encoder (`DEBUG`, `INFO`, `WARNING`, `ERROR`, `CRITICAL`, `ALERT`,
/// `EMERGENCY`) parse into one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Level {
    /// Debug level (most verbose).
    Debug = -1,
    /// Info level.
    Info = 0,
    /// Warning level.
    Warn = 1,
    /// Error level.
    Error = 2,
    /// Fatal, panic and the driver's critical/alert/emergency levels.
    Fatal = 3,
}

impl Level {
    /// Returns the canonical lower-case name of the level.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Fatal => "fatal",
        }
    }

    /// Returns the display color for this level.
    #[must_use]
    pub const fn color(&self) -> Color {
        match self {
            Self::Debug => Color::Blue,
            Self::Info => Color::Green,
            Self::Warn => Color::Yellow,
            Self::Error | Self::Fatal => Color::Red,
        }
    }
}

impl PartialOrd for Level {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Level {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (*self as i32).cmp(&(*other as i32))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            "fatal" | "panic" | "dpanic" | "critical" | "alert" | "emergency" => Ok(Self::Fatal),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// Error returned when a severity label is not one of the known levels.
///
/// Rendering never fails on this; unknown labels are shown uncolored.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown severity: {0:?}")]
pub struct ParseLevelError(String);

impl ParseLevelError {
    /// Returns the label that failed to parse.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.0
    }
}

/// Maps a severity label to its display color.
///
/// Comparison is case-insensitive; unknown labels map to [`Color::Default`].
#[must_use]
pub fn severity_color(label: &str) -> Color {
    label.parse::<Level>().map_or(Color::Default, |level| level.color())
}

/// Renders a severity label in its level color, keeping the original text.
#[must_use]
pub fn render_severity(label: &str, color: bool) -> String {
    Style::new().foreground(severity_color(label)).render(label, color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
        assert!(Level::Error < Level::Fatal);
    }

    #[test]
    fn test_level_parse_case_insensitive() {
        assert_eq!("info".parse::<Level>().unwrap(), Level::Info);
        assert_eq!("INFO".parse::<Level>().unwrap(), Level::Info);
        assert_eq!("Debug".parse::<Level>().unwrap(), Level::Debug);
        assert_eq!("WARNING".parse::<Level>().unwrap(), Level::Warn);
        assert_eq!("warn".parse::<Level>().unwrap(), Level::Warn);
        assert_eq!("panic".parse::<Level>().unwrap(), Level::Fatal);
        assert_eq!("EMERGENCY".parse::<Level>().unwrap(), Level::Fatal);
    }

    #[test]
    fn test_level_parse_unknown() {
        let err = "verbose".parse::<Level>().unwrap_err();
        assert_eq!(err.label(), "verbose");
        assert!("".parse::<Level>().is_err());
    }

    #[test]
    fn test_severity_colors() {
        assert_eq!(severity_color("info"), Color::Green);
        assert_eq!(severity_color("DEBUG"), Color::Blue);
        assert_eq!(severity_color("warning"), Color::Yellow);
        assert_eq!(severity_color("error"), Color::Red);
        assert_eq!(severity_color("FATAL"), Color::Red);
        assert_eq!(severity_color("panic"), Color::Red);
        assert_eq!(severity_color("s"), Color::Default);
    }

    #[test]
    fn test_render_severity_keeps_label_text() {
        assert_eq!(render_severity("INFO", true), "\x1b[32mINFO\x1b[0m");
        assert_eq!(render_severity("ERROR", true), "\x1b[31mERROR\x1b[0m");
        assert_eq!(render_severity("notice", true), "notice");
        assert_eq!(render_severity("INFO", false), "INFO");
    }

    #[test]
    fn test_level_display() {
        assert_eq!(Level::Warn.to_string(), "warn");
        assert_eq!(Level::Fatal.to_string(), "fatal");
    }
}
