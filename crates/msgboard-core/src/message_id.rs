// SPDX-FileCopyrightText: 2026 Msgboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message identifier validation and display helpers.
//!
//! A message id is exactly 36 characters in 8-4-4-4-12 groups of uppercase
//! ASCII letters and digits, e.g. `ABCD1234-EFGH-5678-IJKL-MNOPQRSTUVWX`.
//! Validation is strict: no case folding or trimming is applied.
//!
//! Ids frequently arrive untyped (route parameters, JSON payloads), so every
//! check accepts anything convertible into [`RawId`], which distinguishes an
//! absent value, a string, and a non-string value.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static MESSAGE_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z0-9]{8}-[A-Z0-9]{4}-[A-Z0-9]{4}-[A-Z0-9]{4}-[A-Z0-9]{12}$").unwrap()
});

static LEGACY_NUMERIC_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").unwrap());

/// Length of a well-formed message id.
pub const MESSAGE_ID_LEN: usize = 36;

/// Default prefix length kept by [`truncate_for_display`].
pub const DEFAULT_DISPLAY_LEN: usize = 8;

const ELLIPSIS: &str = "...";

/// A possibly-missing, possibly-mistyped identifier as received from a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawId<'a> {
    /// No value, or a JSON value that counts as missing (`null`, `false`, `0`).
    Absent,
    /// A string value, not yet checked.
    Text(&'a str),
    /// A value of some other type (number, bool, object, ...).
    NotText,
}

impl<'a> From<&'a str> for RawId<'a> {
    fn from(s: &'a str) -> Self {
        RawId::Text(s)
    }
}

impl<'a> From<&'a String> for RawId<'a> {
    fn from(s: &'a String) -> Self {
        RawId::Text(s.as_str())
    }
}

impl<'a> From<Option<&'a str>> for RawId<'a> {
    fn from(s: Option<&'a str>) -> Self {
        s.map_or(RawId::Absent, RawId::Text)
    }
}

impl<'a> From<&'a serde_json::Value> for RawId<'a> {
    fn from(v: &'a serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null | serde_json::Value::Bool(false) => RawId::Absent,
            serde_json::Value::Number(n) if n.as_f64() == Some(0.0) => RawId::Absent,
            serde_json::Value::String(s) => RawId::Text(s),
            _ => RawId::NotText,
        }
    }
}

/// Why an identifier was rejected.
///
/// When several causes apply, the first in declaration order wins: emptiness,
/// then type, then the legacy numeric scheme, then the generic format check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdProblem {
    Empty,
    NotAString,
    LegacyNumeric,
    Malformed,
}

impl IdProblem {
    /// User-facing guidance for this problem.
    pub fn message(self) -> &'static str {
        match self {
            IdProblem::Empty => "message id must not be empty",
            IdProblem::NotAString => "message id must be a string",
            IdProblem::LegacyNumeric => {
                "legacy numeric message id: numeric ids were retired, use the 36-character id instead"
            }
            IdProblem::Malformed => {
                "invalid message id format: expected 36 uppercase letters and digits as XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX"
            }
        }
    }
}

impl fmt::Display for IdProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of [`validate_with_error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdValidation {
    pub is_valid: bool,
    pub error_message: Option<&'static str>,
    pub problem: Option<IdProblem>,
}

impl IdValidation {
    fn ok() -> Self {
        Self {
            is_valid: true,
            error_message: None,
            problem: None,
        }
    }

    fn rejected(problem: IdProblem) -> Self {
        Self {
            is_valid: false,
            error_message: Some(problem.message()),
            problem: Some(problem),
        }
    }
}

/// Returns true iff `id` is a string in the exact 36-character message id format.
pub fn is_valid_id<'a>(id: impl Into<RawId<'a>>) -> bool {
    match id.into() {
        RawId::Text(s) => s.len() == MESSAGE_ID_LEN && MESSAGE_ID_PATTERN.is_match(s),
        RawId::Absent | RawId::NotText => false,
    }
}

/// Returns true iff `id` is a string of one or more ASCII digits.
pub fn is_legacy_numeric_id<'a>(id: impl Into<RawId<'a>>) -> bool {
    match id.into() {
        RawId::Text(s) => LEGACY_NUMERIC_PATTERN.is_match(s),
        RawId::Absent | RawId::NotText => false,
    }
}

/// Classifies `id`, returning a user-facing message for the first failing check.
pub fn validate_with_error<'a>(id: impl Into<RawId<'a>>) -> IdValidation {
    match check(id) {
        Ok(()) => IdValidation::ok(),
        Err(problem) => IdValidation::rejected(problem),
    }
}

/// Like [`validate_with_error`], as a `Result`.
pub fn check<'a>(id: impl Into<RawId<'a>>) -> Result<(), IdProblem> {
    let s = match id.into() {
        RawId::Absent => return Err(IdProblem::Empty),
        RawId::Text("") => return Err(IdProblem::Empty),
        RawId::NotText => return Err(IdProblem::NotAString),
        RawId::Text(s) => s,
    };

    if is_legacy_numeric_id(s) {
        return Err(IdProblem::LegacyNumeric);
    }
    if !is_valid_id(s) {
        return Err(IdProblem::Malformed);
    }
    Ok(())
}

/// Shortens `id` to `max_len` characters plus `"..."` when it is longer.
///
/// Absent or non-string input yields an empty string.
pub fn truncate_for_display<'a>(id: impl Into<RawId<'a>>, max_len: usize) -> String {
    let RawId::Text(s) = id.into() else {
        return String::new();
    };

    if s.chars().count() <= max_len {
        return s.to_string();
    }

    let mut out: String = s.chars().take(max_len).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Renders an id for display. Ids are already grouped with dashes, so valid
/// and invalid input alike are returned unchanged.
pub fn format_for_display(id: &str) -> &str {
    id
}
