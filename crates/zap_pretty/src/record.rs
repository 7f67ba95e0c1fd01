//! Line classification and field extraction.
//!
//! A raw line is first classified: it is either a JSON object or it is passed
//! through untouched. Objects are then mapped onto a [`LogRecord`] using an
//! ordered table of candidate keys per logical attribute, so the standard
//! (`level`/`ts`/`msg`) and driver (`severity`/`time`/`message`) schemas share
//! a single extraction path.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::timestamp;

/// Candidate keys for the severity label, first present wins.
pub const SEVERITY_KEYS: &[&str] = &["severity", "level"];
/// Candidate keys for the timestamp, first present wins.
pub const TIMESTAMP_KEYS: &[&str] = &["time", "timestamp", "ts"];
/// Candidate keys for the caller location.
pub const CALLER_KEYS: &[&str] = &["caller"];
/// Candidate keys for the message, first present wins.
pub const MESSAGE_KEYS: &[&str] = &["message", "msg"];

/// Key holding a verbose error description with embedded stack frames.
pub const ERROR_VERBOSE_KEY: &str = "errorVerbose";
/// Key holding a plain stack trace.
pub const STACKTRACE_KEY: &str = "stacktrace";
/// Nested source location written by the driver encoder.
pub const SOURCE_LOCATION_KEY: &str = "logging.googleapis.com/sourceLocation";
/// Driver labels object.
pub const LABELS_KEY: &str = "labels";

/// Keys never rendered in the residual object.
pub const RESERVED_KEYS: &[&str] = &[
    "severity",
    "level",
    "time",
    "timestamp",
    "ts",
    "caller",
    "message",
    "msg",
    LABELS_KEY,
    ERROR_VERBOSE_KEY,
    STACKTRACE_KEY,
    SOURCE_LOCATION_KEY,
];

/// Reason a decoded object could not be turned into a [`LogRecord`].
///
/// These never surface to the user: any of them means the raw line is
/// written out unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// The line is not valid JSON.
    #[error("line is not valid JSON")]
    NotJson,
    /// The line is JSON but not an object.
    #[error("line is JSON but not an object")]
    NotAnObject,
    /// No candidate key for a required attribute is present.
    #[error("missing required field {0:?}")]
    MissingField(&'static str),
    /// A required field holds the wrong JSON kind.
    #[error("field {field:?} should be a {expected}")]
    WrongKind {
        /// The key that was found.
        field: &'static str,
        /// What kind of JSON value was expected.
        expected: &'static str,
    },
    /// The timestamp could not be interpreted.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Which reserved field a diagnostic blob came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// `errorVerbose`: intro line followed by sectioned stack frames.
    ErrorVerbose,
    /// `stacktrace`: a flat list of frames.
    Stacktrace,
}

impl DiagnosticKind {
    /// Returns the title line rendered above the blob.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::ErrorVerbose => "Error Verbose",
            Self::Stacktrace => "Stacktrace",
        }
    }
}

/// An embedded multi-line diagnostic blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Source field.
    pub kind: DiagnosticKind,
    /// Raw blob text.
    pub text: String,
}

/// A successfully decoded log record.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    /// Severity label exactly as written by the producer.
    pub severity: String,
    /// Instant, truncated to milliseconds.
    pub timestamp: DateTime<Utc>,
    /// Caller location.
    pub caller: String,
    /// Log message.
    pub message: String,
    /// At most one diagnostic blob.
    pub diagnostic: Option<Diagnostic>,
    /// Every non-reserved field, in first-seen order.
    pub residual: Map<String, Value>,
}

/// Outcome of classifying a raw line.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// Not a JSON object; emit the line as-is.
    PassThrough(ExtractError),
    /// A decoded JSON object, ready for extraction.
    Object(Map<String, Value>),
}

/// Classifies a raw line as a JSON object or a passthrough.
#[must_use]
pub fn classify(line: &str) -> Classification {
    match serde_json::from_str::<Value>(line) {
        Ok(Value::Object(map)) => Classification::Object(map),
        Ok(_) => Classification::PassThrough(ExtractError::NotAnObject),
        Err(_) => Classification::PassThrough(ExtractError::NotJson),
    }
}

/// Decodes a raw line straight into a [`LogRecord`].
///
/// # Errors
///
/// Returns the first [`ExtractError`] encountered; callers treat every error
/// as "pass the line through".
pub fn parse_line(line: &str) -> Result<LogRecord, ExtractError> {
    match classify(line) {
        Classification::Object(map) => extract(map),
        Classification::PassThrough(reason) => Err(reason),
    }
}

/// Extracts a [`LogRecord`] from a decoded object.
///
/// # Errors
///
/// Fails when a required attribute is absent, has the wrong kind, or carries
/// an unparseable timestamp.
pub fn extract(mut object: Map<String, Value>) -> Result<LogRecord, ExtractError> {
    let severity = required_string(&object, SEVERITY_KEYS)?;
    let timestamp = {
        let (key, value) = lookup(&object, TIMESTAMP_KEYS)?;
        timestamp::parse_value(key, value)?
    };
    let caller = required_string(&object, CALLER_KEYS)?;
    let message = required_string(&object, MESSAGE_KEYS)?;
    let diagnostic = diagnostic(&object);

    object.retain(|key, _| !RESERVED_KEYS.contains(&key.as_str()));

    Ok(LogRecord {
        severity,
        timestamp,
        caller,
        message,
        diagnostic,
        residual: object,
    })
}

/// Returns the first candidate key present in `object` along with its value.
fn lookup<'a>(
    object: &'a Map<String, Value>,
    candidates: &[&'static str],
) -> Result<(&'static str, &'a Value), ExtractError> {
    candidates
        .iter()
        .find_map(|key| object.get(*key).map(|value| (*key, value)))
        .ok_or(ExtractError::MissingField(candidates[0]))
}

fn required_string(
    object: &Map<String, Value>,
    candidates: &[&'static str],
) -> Result<String, ExtractError> {
    match lookup(object, candidates)? {
        (_, Value::String(s)) => Ok(s.clone()),
        (field, _) => Err(ExtractError::WrongKind {
            field,
            expected: "string",
        }),
    }
}

fn diagnostic(object: &Map<String, Value>) -> Option<Diagnostic> {
    let blob = |key: &str| match object.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        _ => None,
    };

    blob(ERROR_VERBOSE_KEY)
        .map(|text| Diagnostic {
            kind: DiagnosticKind::ErrorVerbose,
            text,
        })
        .or_else(|| {
            blob(STACKTRACE_KEY).map(|text| Diagnostic {
                kind: DiagnosticKind::Stacktrace,
                text,
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(line: &str) -> Map<String, Value> {
        match classify(line) {
            Classification::Object(map) => map,
            Classification::PassThrough(_) => panic!("expected an object: {line}"),
        }
    }

    #[test]
    fn test_classify_passthrough() {
        let not_json = Classification::PassThrough(ExtractError::NotJson);
        let not_object = Classification::PassThrough(ExtractError::NotAnObject);
        assert_eq!(classify("A non-JSON string line"), not_json);
        assert_eq!(classify(r#"{"severity":"s""#), not_json);
        assert_eq!(classify("[1,2,3]"), not_object);
        assert_eq!(classify("42"), not_object);
        assert_eq!(classify(""), not_json);
    }

    #[test]
    fn test_extract_standard_schema() {
        let record =
            parse_line(r#"{"level":"info","ts":1545445711.144533,"caller":"c","msg":"m"}"#)
                .unwrap();
        assert_eq!(record.severity, "info");
        assert_eq!(record.caller, "c");
        assert_eq!(record.message, "m");
        assert_eq!(record.timestamp.timestamp_subsec_millis(), 144);
        assert!(record.diagnostic.is_none());
        assert!(record.residual.is_empty());
    }

    #[test]
    fn test_extract_driver_schema_excludes_reserved() {
        let record = extract(object(
            r#"{"severity":"INFO","timestamp":"2018-12-21T23:06:49.435919-05:00","caller":"c:0","message":"m","folder":"f","labels":{},"logging.googleapis.com/sourceLocation":{"file":"f","line":"1","function":"fn"}}"#,
        ))
        .unwrap();
        assert_eq!(record.severity, "INFO");
        assert_eq!(record.residual.len(), 1);
        assert_eq!(record.residual["folder"], "f");
    }

    #[test]
    fn test_residual_keeps_first_seen_order() {
        let record = parse_line(
            r#"{"zeta":1,"level":"info","alpha":2,"ts":0,"caller":"c","mid":3,"msg":"m"}"#,
        )
        .unwrap();
        let keys: Vec<&str> = record.residual.keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_missing_message_fails() {
        let err = parse_line(r#"{"severity":"s","time":"t","caller":"c:0"}"#).unwrap_err();
        // The time field is checked before the message.
        assert_eq!(err, ExtractError::InvalidTimestamp("t".to_string()));

        let err =
            parse_line(r#"{"severity":"s","time":"2019-12-06T19:40:20.627Z","caller":"c:0"}"#)
                .unwrap_err();
        assert_eq!(err, ExtractError::MissingField("message"));
    }

    #[test]
    fn test_missing_fields_each() {
        let cases = [
            (r#"{"ts":0,"caller":"c","msg":"m"}"#, "severity"),
            (r#"{"level":"info","caller":"c","msg":"m"}"#, "time"),
            (r#"{"level":"info","ts":0,"msg":"m"}"#, "caller"),
            (r#"{"level":"info","ts":0,"caller":"c"}"#, "message"),
        ];
        for (line, field) in cases {
            assert_eq!(parse_line(line).unwrap_err(), ExtractError::MissingField(field));
        }
    }

    #[test]
    fn test_wrong_kind_fails_without_fallback() {
        let err = parse_line(r#"{"severity":3,"level":"info","ts":0,"caller":"c","msg":"m"}"#)
            .unwrap_err();
        assert_eq!(
            err,
            ExtractError::WrongKind {
                field: "severity",
                expected: "string"
            }
        );
        let err = parse_line(r#"{"level":"info","ts":0,"caller":null,"msg":"m"}"#).unwrap_err();
        assert!(matches!(err, ExtractError::WrongKind { field: "caller", .. }));
    }

    #[test]
    fn test_not_an_object() {
        assert_eq!(parse_line("[]").unwrap_err(), ExtractError::NotAnObject);
        assert_eq!(parse_line("nope").unwrap_err(), ExtractError::NotJson);
    }

    #[test]
    fn test_error_verbose_wins_over_stacktrace() {
        let record = parse_line(
            r#"{"level":"error","ts":0,"caller":"c","msg":"m","stacktrace":"s\n\tf","errorVerbose":"e"}"#,
        )
        .unwrap();
        let diagnostic = record.diagnostic.unwrap();
        assert_eq!(diagnostic.kind, DiagnosticKind::ErrorVerbose);
        assert_eq!(diagnostic.text, "e");
        assert!(record.residual.is_empty());
    }

    #[test]
    fn test_non_string_diagnostic_falls_back() {
        let record = parse_line(
            r#"{"level":"error","ts":0,"caller":"c","msg":"m","errorVerbose":{"a":1},"stacktrace":"s"}"#,
        )
        .unwrap();
        assert_eq!(record.diagnostic.unwrap().kind, DiagnosticKind::Stacktrace);
        assert!(record.residual.is_empty());

    }

    #[test]
    fn test_empty_error_verbose_still_wins() {
        let record = parse_line(
            r#"{"level":"error","ts":0,"caller":"c","msg":"m","errorVerbose":"","stacktrace":"s\n\tf"}"#,
        )
        .unwrap();
        let diagnostic = record.diagnostic.unwrap();
        assert_eq!(diagnostic.kind, DiagnosticKind::ErrorVerbose);
        assert_eq!(diagnostic.text, "");
        assert!(record.residual.is_empty());
    }

    #[test]
    fn test_diagnostic_titles() {
        assert_eq!(DiagnosticKind::ErrorVerbose.title(), "Error Verbose");
        assert_eq!(DiagnosticKind::Stacktrace.title(), "Stacktrace");
    }
}
