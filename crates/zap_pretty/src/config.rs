//! Display configuration.
//!
//! Everything that is fixed for the lifetime of a run lives in [`Config`]
//! and is handed to the [`Processor`](crate::Processor) explicitly: the
//! display time zone, whether to emit color, and the header styles.

use std::str::FromStr;

use chrono_tz::Tz;

use crate::error::{Error, Result};
use crate::style::Styles;

/// When to emit ANSI color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Color when the output is a terminal, honoring `NO_COLOR`/`FORCE_COLOR`.
    #[default]
    Auto,
    /// Always color.
    Always,
    /// Never color.
    Never,
}

impl ColorMode {
    /// Resolves the mode against the current environment.
    #[must_use]
    pub fn resolve(self, is_terminal: bool) -> bool {
        let no_color = std::env::var_os("NO_COLOR").is_some();
        let force_color = std::env::var("FORCE_COLOR").ok();
        self.resolve_with(is_terminal, no_color, force_color.as_deref())
    }

    /// Resolves the mode from explicit inputs.
    ///
    /// `NO_COLOR` beats `FORCE_COLOR`, which beats terminal detection. A
    /// `FORCE_COLOR` of `""` or `"0"` does not force anything.
    #[must_use]
    pub fn resolve_with(self, is_terminal: bool, no_color: bool, force_color: Option<&str>) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto if no_color => false,
            Self::Auto => match force_color {
                Some(v) if !v.is_empty() && v != "0" => true,
                _ => is_terminal,
            },
        }
    }
}

impl FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            other => Err(format!("invalid color mode: {other:?}")),
        }
    }
}

/// Parses an IANA time zone name such as `America/New_York`.
///
/// A leading `:` (as allowed in `$TZ`) is ignored.
///
/// # Errors
///
/// Returns [`Error::UnknownTimezone`] for names not in the tz database.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    let trimmed = name.trim().trim_start_matches(':');
    trimmed
        .parse::<Tz>()
        .map_err(|_| Error::UnknownTimezone(name.to_string()))
}

/// Pipeline configuration.
///
/// Defaults:
/// - time zone `UTC`
/// - color disabled
///
/// # Example
///
/// ```rust
/// use zap_pretty::Config;
///
/// let config = Config::new()
///     .timezone(chrono_tz::America::New_York)
///     .color(true);
/// assert!(config.color_enabled());
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    timezone: Tz,
    color: bool,
    styles: Styles,
}

impl Config {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            timezone: Tz::UTC,
            color: false,
            styles: Styles::new(),
        }
    }

    /// Sets the display time zone.
    #[must_use]
    pub fn timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    /// Sets the display time zone by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTimezone`] when `name` is not a known zone.
    pub fn timezone_name(self, name: &str) -> Result<Self> {
        Ok(self.timezone(parse_timezone(name)?))
    }

    /// Enables or disables ANSI color.
    #[must_use]
    pub fn color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    /// Replaces the header styles.
    #[must_use]
    pub fn styles(mut self, styles: Styles) -> Self {
        self.styles = styles;
        self
    }

    /// Returns the display time zone.
    #[must_use]
    pub fn display_timezone(&self) -> Tz {
        self.timezone
    }

    /// Returns whether color output is enabled.
    #[must_use]
    pub fn color_enabled(&self) -> bool {
        self.color
    }

    /// Returns the header styles.
    #[must_use]
    pub fn header_styles(&self) -> &Styles {
        &self.styles
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
