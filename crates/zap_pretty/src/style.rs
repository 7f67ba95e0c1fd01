//! Terminal colors and text styles.
//!
//! A trimmed-down take on SGR styling: a [`Style`] carries a foreground
//! [`Color`] and renders text wrapped in `ESC[<code>m ... ESC[0m` when color
//! output is enabled, or the bare text otherwise.
//!
//! # Example
//!
//! ```rust
//! use zap_pretty::style::{Color, Style};
//!
//! let green = Style::new().foreground(Color::Green);
//! assert_eq!(green.render("info", true), "\x1b[32minfo\x1b[0m");
//! assert_eq!(green.render("info", false), "info");
//! ```

use std::fmt;

/// SGR reset sequence.
pub const RESET: &str = "\x1b[0m";

/// A foreground color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// Terminal default; renders no escape sequence.
    #[default]
    Default,
    /// ANSI red (31).
    Red,
    /// ANSI green (32).
    Green,
    /// ANSI yellow (33).
    Yellow,
    /// ANSI blue (34).
    Blue,
    /// 256-color palette entry (`38;5;n`).
    Ansi256(u8),
}

impl Color {
    /// Returns the SGR parameter for this color used as a foreground, or
    /// `None` for [`Color::Default`].
    #[must_use]
    pub fn fg_code(self) -> Option<String> {
        match self {
            Self::Default => None,
            Self::Red => Some("31".to_string()),
            Self::Green => Some("32".to_string()),
            Self::Yellow => Some("33".to_string()),
            Self::Blue => Some("34".to_string()),
            Self::Ansi256(n) => Some(format!("38;5;{n}")),
        }
    }

    /// Returns true if this color emits no escape sequence.
    #[must_use]
    pub const fn is_default(self) -> bool {
        matches!(self, Self::Default)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("default"),
            Self::Red => f.write_str("red"),
            Self::Green => f.write_str("green"),
            Self::Yellow => f.write_str("yellow"),
            Self::Blue => f.write_str("blue"),
            Self::Ansi256(n) => write!(f, "ansi256({n})"),
        }
    }
}

/// A text style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    fg: Color,
}

impl Style {
    /// Creates an unstyled style.
    #[must_use]
    pub const fn new() -> Self {
        Self { fg: Color::Default }
    }

    /// Sets the foreground color.
    #[must_use]
    pub const fn foreground(mut self, color: Color) -> Self {
        self.fg = color;
        self
    }

    /// Returns the foreground color.
    #[must_use]
    pub const fn fg(&self) -> Color {
        self.fg
    }

    /// Renders `text` with this style.
    ///
    /// With `color` false, or with no foreground set, the text comes back
    /// unchanged.
    #[must_use]
    pub fn render(&self, text: &str, color: bool) -> String {
        match self.fg.fg_code() {
            Some(code) if color => format!("\x1b[{code}m{text}{RESET}"),
            _ => text.to_string(),
        }
    }
}

/// Styles for the parts of a rendered header line.
#[derive(Debug, Clone)]
pub struct Styles {
    /// Style for the `(caller)` segment.
    pub caller: Style,
    /// Style for the message text.
    pub message: Style,
}

impl Default for Styles {
    fn default() -> Self {
        Self::new()
    }
}

impl Styles {
    /// Creates the default header styles: a grey caller and a blue message.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            caller: Style::new().foreground(Color::Ansi256(244)),
            message: Style::new().foreground(Color::Blue),
        }
    }
}
