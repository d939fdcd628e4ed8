#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
#![warn(missing_copy_implementations)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]
#![warn(trivial_casts, trivial_numeric_casts)]
#![warn(unused_qualifications)]

//! Core engine for a declarative, composable date-time formatting and
//! parsing DSL.
//!
//! The crate is organised around three tightly coupled pieces that all share
//! one intermediate representation, the field [`Container`]:
//!
//! - a [`tree`] of format nodes (literals, directives, optional sections,
//!   alternatives, signed groups) built through the [`builder`] DSL or
//!   translated from an ICU-style pattern string by [`pattern`];
//! - a [`format`] interpreter that walks the tree and reads a filled
//!   container to produce text;
//! - a [`parse`] backtracking matcher that walks the same tree and writes a
//!   container from text, including `find`/`find_all` substring scanning.
//!
//! [`predefined`] exposes the standard ISO-8601 and RFC 1123 formats built
//! from these pieces. Calendar arithmetic and time-zone identifier
//! membership are modeled as narrow external-collaborator traits
//! ([`calendar::CalendarOps`], [`zone::ZoneIdRegistry`]) with one default
//! implementation each, since this crate does not depend on an external
//! calendar or tz-database crate.
//!
//! This crate does not implement locale-aware rendering: any directive that
//! would require locale data fails to build with [`Error::Build`].

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(not(feature = "alloc"))]
compile_error!("dt-format-core currently requires the `alloc` feature");

pub mod builder;
pub mod cache;
pub mod calendar;
pub mod container;
pub mod error;
pub mod field;
pub mod finalize;
pub mod format;
pub mod parse;
pub mod pattern;
pub mod populate;
pub mod predefined;
pub mod tree;
pub mod value;
pub mod zone;

pub use container::Container;
pub use error::Error;
pub use field::FieldId;
pub use tree::Node;
pub use value::{AmPm, Instant, LocalDate, LocalDateTime, LocalTime, UtcOffset, YearMonth};

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
