//! The error type shared by every fallible operation in the crate.

#[cfg(feature = "alloc")]
use alloc::string::String;
use core::fmt;

use crate::field::FieldId;

/// Error returned by building, formatting, parsing or finalising.
///
/// All error kinds live on one flat enum, mirroring the rest of the crate's
/// preference for closed sum types over per-kind error structs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Illegal construction of a format tree: incompatible capability,
    /// invalid padding, duplicate or empty names, `min > max`, an unknown
    /// Unicode pattern letter, a locale-dependent directive, or an
    /// unsupported directive length.
    Build(BuildErrorKind),
    /// No branch of the tree accepted the input, or the input was not fully
    /// consumed by a full-match parse.
    Parse(ParseErrorKind),
    /// A strict field value was out of range during finalisation, or a
    /// directive's parsed value violated its field's range during parsing.
    FieldValue {
        /// The field whose value was rejected.
        field: FieldId,
        /// The rejected value.
        value: i64,
    },
    /// A field required for formatting or finalisation was unset.
    MissingField(FieldId),
    /// A cross-field consistency check failed (day-of-week mismatch, AM/PM
    /// vs 24-hour mismatch, day-of-year vs month/day mismatch, ...).
    InconsistentFields(&'static str),
    /// An instant computation exceeded the representable range.
    Overflow,
}

/// Specific reasons a format tree failed to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildErrorKind {
    /// A directive from one capability (e.g. time) was added to a builder
    /// scoped to an incompatible capability (e.g. date-only).
    IncompatibleCapability(&'static str),
    /// `width == 0`, or a padding/width combination that cannot be
    /// satisfied.
    InvalidPadding,
    /// A name list passed to a named directive contained a duplicate.
    DuplicateName(
        #[cfg(feature = "alloc")] String,
        #[cfg(not(feature = "alloc"))] (),
    ),
    /// A name list passed to a named directive contained an empty string.
    EmptyName,
    /// `min_length > max_length` for a decimal-fraction directive.
    MinExceedsMax,
    /// An `Optional` body mentions a field with no declared default.
    OptionalFieldWithoutDefault(FieldId),
    /// An `Alternatives` branch mentions a field the primary branch does not
    /// mention and that has no default.
    AlternativeFieldMismatch(FieldId),
    /// The Unicode pattern lexer encountered an unknown directive letter.
    UnknownPatternLetter(char),
    /// The Unicode pattern lexer encountered a directive letter that
    /// requires locale data, which this crate does not support.
    LocaleDependentLetter {
        /// The offending letter.
        letter: char,
        /// A locale-independent directive to use instead, if one exists.
        suggestion: Option<&'static str>,
    },
    /// A Unicode pattern directive was repeated an unsupported number of
    /// times (e.g. `MMM`).
    UnsupportedPatternLength {
        /// The offending letter.
        letter: char,
        /// The repeat count that was rejected.
        length: usize,
    },
    /// The pattern string has an unterminated quote or bracket.
    UnterminatedPattern,
}

/// Specific reasons a parse failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// No branch of the tree accepted any prefix of the input.
    NoMatch,
    /// A branch accepted a prefix, but it was not the entire input.
    TrailingInput {
        /// How many bytes were left over.
        remaining: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Build(kind) => write!(f, "invalid format description: {kind}"),
            Error::Parse(ParseErrorKind::NoMatch) => write!(f, "input did not match the format"),
            Error::Parse(ParseErrorKind::TrailingInput { remaining }) => {
                write!(f, "{remaining} byte(s) of input left unconsumed")
            }
            Error::FieldValue { field, value } => {
                write!(f, "value {value} is out of range for field {field}")
            }
            Error::MissingField(field) => write!(f, "field {field} is required but unset"),
            Error::InconsistentFields(description) => {
                write!(f, "inconsistent fields: {description}")
            }
            Error::Overflow => write!(f, "computation exceeded the representable range"),
        }
    }
}

impl fmt::Display for BuildErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildErrorKind::IncompatibleCapability(what) => {
                write!(f, "{what} directive is not available in this scope")
            }
            BuildErrorKind::InvalidPadding => write!(f, "invalid width or padding"),
            BuildErrorKind::DuplicateName(_name) => write!(f, "duplicate name in name list"),
            BuildErrorKind::EmptyName => write!(f, "empty name in name list"),
            BuildErrorKind::MinExceedsMax => write!(f, "minLength exceeds maxLength"),
            BuildErrorKind::OptionalFieldWithoutDefault(field) => {
                write!(f, "optional section mentions {field}, which has no default")
            }
            BuildErrorKind::AlternativeFieldMismatch(field) => {
                write!(
                    f,
                    "alternative mentions {field}, which the primary branch does not mention and which has no default"
                )
            }
            BuildErrorKind::UnknownPatternLetter(letter) => {
                write!(f, "unknown pattern letter '{letter}'")
            }
            BuildErrorKind::LocaleDependentLetter { letter, suggestion } => match suggestion {
                Some(s) => write!(
                    f,
                    "pattern letter '{letter}' requires locale data, which is unsupported; use {s} instead"
                ),
                None => write!(
                    f,
                    "pattern letter '{letter}' requires locale data, which is unsupported"
                ),
            },
            BuildErrorKind::UnsupportedPatternLength { letter, length } => write!(
                f,
                "pattern letter '{letter}' repeated {length} times is not supported"
            ),
            BuildErrorKind::UnterminatedPattern => {
                write!(f, "unterminated quote or optional-group in pattern")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
