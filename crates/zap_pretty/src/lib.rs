#![forbid(unsafe_code)]
// Allow pedantic lints for early-stage API ergonomics.
#![allow(clippy::nursery)]
#![allow(clippy::pedantic)]

//! # Zap Pretty
//!
//! A streaming reformatter for structured JSON logs.
//!
//! Zap Pretty reads log lines as written by zap-style JSON encoders and turns
//! each one into a colorized, scannable form:
//! - Standard records (`level`, `ts`, `caller`, `msg`)
//! - Driver records (`severity`, `time`/`timestamp`, `caller`, `message`)
//! - Embedded `errorVerbose` and `stacktrace` blobs, re-indented by section
//! - Anything else is passed through untouched
//!
//! ## Example
//!
//! ```rust
//! use zap_pretty::{Config, Processor};
//!
//! let processor = Processor::new(Config::new());
//! let rendered = processor.render_line(
//!     r#"{"level":"info","ts":1545445711.144533,"caller":"main.go:12","msg":"started","port":8080}"#,
//! );
//! assert_eq!(
//!     rendered.lines(),
//!     [r#"[2018-12-22 02:28:31.144 UTC] info (main.go:12) started {"port":8080}"#]
//! );
//! ```
//!
//! ## Output
//!
//! ```text
//! [<timestamp>] <severity> (<caller>) <message> [<extra fields as JSON>]
//! Error Verbose | Stacktrace
//!   <indented diagnostic lines>
//! ```

pub mod block;
pub mod config;
pub mod error;
pub mod level;
pub mod processor;
pub mod record;
pub mod style;
pub mod timestamp;

pub use config::{ColorMode, Config, parse_timezone};
pub use error::{Error, Result};
pub use level::{Level, ParseLevelError, severity_color};
pub use processor::{Processor, Rendered, Stats};
pub use record::{Diagnostic, DiagnosticKind, ExtractError, LogRecord};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::block::Segment;
    pub use crate::style::{Color, Style, Styles};
    pub use crate::{
        ColorMode, Config, Diagnostic, DiagnosticKind, Error, ExtractError, Level, LogRecord,
        ParseLevelError, Processor, Rendered, Result, Stats,
    };
}
