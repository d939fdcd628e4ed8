//! The stateful builder DSL: assembles a [`Node`] one directive at a time,
//! validating capability and shape constraints as it goes rather than
//! deferring every check to a final pass.
//!
//! A [`Builder`] is created with a [`Scope`] that determines which groups of
//! directives it accepts; calling a directive method outside its scope
//! fails immediately with [`BuildErrorKind::IncompatibleCapability`].

#[cfg(feature = "alloc")]
use alloc::boxed::Box;
#[cfg(feature = "alloc")]
use alloc::string::String;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use crate::error::{BuildErrorKind, Error};
use crate::field::FieldId;
use crate::tree::{Directive, NameList, Node, Padding};

/// The capability set a [`Builder`] accepts.
///
/// Mirrors the `WithDate`/`WithTime`/... capability interfaces: rather than
/// a trait per capability, one builder checks its own scope at each method
/// call, which keeps the directive methods on a single inherent `impl`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Date fields only (`year`, `monthNumber`, `dayOfMonth`, `dayOfYear`,
    /// `isoDayOfWeek`).
    WithDate,
    /// Time fields only.
    WithTime,
    /// Year and month only, no day (for `ISO_YEAR_MONTH`).
    WithYearMonth,
    /// UTC offset fields only.
    WithUtcOffset,
    /// Date and time fields.
    WithDateTime,
    /// Every field, including the time-zone identifier.
    WithDateTimeComponents,
}

impl Scope {
    fn allows_date(self) -> bool {
        matches!(self, Scope::WithDate | Scope::WithDateTime | Scope::WithDateTimeComponents)
    }

    fn allows_year_month(self) -> bool {
        self.allows_date() || matches!(self, Scope::WithYearMonth)
    }

    fn allows_time(self) -> bool {
        matches!(self, Scope::WithTime | Scope::WithDateTime | Scope::WithDateTimeComponents)
    }

    fn allows_offset(self) -> bool {
        matches!(self, Scope::WithUtcOffset | Scope::WithDateTimeComponents)
    }

    fn allows_zone(self) -> bool {
        matches!(self, Scope::WithDateTimeComponents)
    }
}

/// A stateful tree builder, scoped to one [`Scope`].
#[derive(Debug, Clone)]
pub struct Builder {
    scope: Scope,
    nodes: Vec<Node>,
}

fn validate_width(padding: Padding) -> Result<(), Error> {
    match padding {
        Padding::Zero(0) | Padding::Space(0) => Err(Error::Build(BuildErrorKind::InvalidPadding)),
        _ => Ok(()),
    }
}

impl Builder {
    /// Starts a new, empty builder scoped to `scope`.
    #[must_use]
    pub fn new(scope: Scope) -> Self {
        Self { scope, nodes: Vec::new() }
    }

    fn require(&self, ok: bool, what: &'static str) -> Result<(), Error> {
        if ok {
            Ok(())
        } else {
            Err(Error::Build(BuildErrorKind::IncompatibleCapability(what)))
        }
    }

    fn push(&mut self, node: Node) -> &mut Self {
        self.nodes.push(node);
        self
    }

    /// The full proleptic year, optionally signed when it overflows the
    /// padded width.
    ///
    /// # Errors
    ///
    /// Returns [`BuildErrorKind::IncompatibleCapability`] outside a
    /// date-capable scope, or [`BuildErrorKind::InvalidPadding`] for a
    /// zero-width `Zero`/`Space` padding.
    pub fn year(&mut self, padding: Padding) -> Result<&mut Self, Error> {
        self.require(self.scope.allows_year_month(), "year")?;
        validate_width(padding)?;
        Ok(self.push(Node::Basic(Directive::SignedYear { padding })))
    }

    /// A reduced two-digit year within `[base, base + 99]`, falling back to
    /// a signed full year outside that window.
    ///
    /// # Errors
    ///
    /// Returns [`BuildErrorKind::IncompatibleCapability`] outside a
    /// date-capable scope.
    pub fn reduced_year(&mut self, base: i64) -> Result<&mut Self, Error> {
        self.require(self.scope.allows_year_month(), "reduced year")?;
        Ok(self.push(Node::Basic(Directive::ReducedYear { base })))
    }

    /// The numeric month, `1..=12`.
    ///
    /// # Errors
    ///
    /// See [`Builder::year`].
    pub fn month_number(&mut self, padding: Padding) -> Result<&mut Self, Error> {
        self.require(self.scope.allows_year_month(), "month")?;
        validate_width(padding)?;
        Ok(self.push(Node::Basic(Directive::Unsigned {
            field: FieldId::MonthNumber,
            padding,
        })))
    }

    /// The month rendered by name, looked up in `names` (index 1 = January).
    ///
    /// # Errors
    ///
    /// Returns [`BuildErrorKind::IncompatibleCapability`] outside a
    /// date-capable scope, or a [`BuildErrorKind`] from
    /// [`NameList::new`] for a duplicate or empty entry.
    pub fn month_name(&mut self, names: Vec<String>) -> Result<&mut Self, Error> {
        self.require(self.scope.allows_year_month(), "month name")?;
        let names = NameList::new(names).map_err(Error::Build)?;
        Ok(self.push(Node::Basic(Directive::NamedEnum {
            field: FieldId::MonthNumber,
            names,
        })))
    }

    /// The day of the month, `1..=31`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildErrorKind::IncompatibleCapability`] outside
    /// [`Scope::WithDate`]/[`Scope::WithDateTime`]/[`Scope::WithDateTimeComponents`].
    pub fn day_of_month(&mut self, padding: Padding) -> Result<&mut Self, Error> {
        self.require(self.scope.allows_date(), "day of month")?;
        validate_width(padding)?;
        Ok(self.push(Node::Basic(Directive::Unsigned {
            field: FieldId::DayOfMonth,
            padding,
        })))
    }

    /// The day of the year, `1..=366`.
    ///
    /// # Errors
    ///
    /// See [`Builder::day_of_month`].
    pub fn day_of_year(&mut self, padding: Padding) -> Result<&mut Self, Error> {
        self.require(self.scope.allows_date(), "day of year")?;
        validate_width(padding)?;
        Ok(self.push(Node::Basic(Directive::Unsigned {
            field: FieldId::DayOfYear,
            padding,
        })))
    }

    /// The ISO day of week, `1..=7` with `1` meaning Monday.
    ///
    /// # Errors
    ///
    /// See [`Builder::day_of_month`].
    pub fn iso_day_of_week(&mut self, padding: Padding) -> Result<&mut Self, Error> {
        self.require(self.scope.allows_date(), "ISO day of week")?;
        validate_width(padding)?;
        Ok(self.push(Node::Basic(Directive::Unsigned {
            field: FieldId::IsoDayOfWeek,
            padding,
        })))
    }

    /// The ISO day of week rendered by name (index 1 = Monday).
    ///
    /// # Errors
    ///
    /// See [`Builder::month_name`].
    pub fn weekday_name(&mut self, names: Vec<String>) -> Result<&mut Self, Error> {
        self.require(self.scope.allows_date(), "weekday name")?;
        let names = NameList::new(names).map_err(Error::Build)?;
        Ok(self.push(Node::Basic(Directive::NamedEnum {
            field: FieldId::IsoDayOfWeek,
            names,
        })))
    }

    /// The hour of the day, `0..=23`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildErrorKind::IncompatibleCapability`] outside a
    /// time-capable scope.
    pub fn hour(&mut self, padding: Padding) -> Result<&mut Self, Error> {
        self.require(self.scope.allows_time(), "hour")?;
        validate_width(padding)?;
        Ok(self.push(Node::Basic(Directive::Unsigned {
            field: FieldId::Hour,
            padding,
        })))
    }

    /// The hour of the AM/PM half-day, `1..=12`.
    ///
    /// # Errors
    ///
    /// See [`Builder::hour`].
    pub fn hour_of_am_pm(&mut self, padding: Padding) -> Result<&mut Self, Error> {
        self.require(self.scope.allows_time(), "12-hour hour")?;
        validate_width(padding)?;
        Ok(self.push(Node::Basic(Directive::Unsigned {
            field: FieldId::HourOfAmPm,
            padding,
        })))
    }

    /// The AM/PM marker, rendered as `am_name`/`pm_name`.
    ///
    /// # Errors
    ///
    /// See [`Builder::hour`].
    pub fn am_pm_marker(&mut self, am_name: impl Into<String>, pm_name: impl Into<String>) -> Result<&mut Self, Error> {
        self.require(self.scope.allows_time(), "AM/PM marker")?;
        Ok(self.push(Node::Basic(Directive::AmPmMarker {
            names: (am_name.into(), pm_name.into()),
        })))
    }

    /// The minute of the hour, `0..=59`.
    ///
    /// # Errors
    ///
    /// See [`Builder::hour`].
    pub fn minute(&mut self, padding: Padding) -> Result<&mut Self, Error> {
        self.require(self.scope.allows_time(), "minute")?;
        validate_width(padding)?;
        Ok(self.push(Node::Basic(Directive::Unsigned {
            field: FieldId::Minute,
            padding,
        })))
    }

    /// The second of the minute, `0..=59`, defaults to `0`.
    ///
    /// # Errors
    ///
    /// See [`Builder::hour`].
    pub fn second(&mut self, padding: Padding) -> Result<&mut Self, Error> {
        self.require(self.scope.allows_time(), "second")?;
        validate_width(padding)?;
        Ok(self.push(Node::Basic(Directive::Unsigned {
            field: FieldId::Second,
            padding,
        })))
    }

    /// The fractional second, truncated/rounded to `max_length` digits.
    /// `min_length` of `None` emits the fewest digits that are a multiple of
    /// three; `Some(n)` clamps the trimmed length to at least `n`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildErrorKind::IncompatibleCapability`] outside a
    /// time-capable scope, [`BuildErrorKind::InvalidPadding`] if
    /// `max_length` is `0` or greater than `9`, or
    /// [`BuildErrorKind::MinExceedsMax`] if `min_length` exceeds
    /// `max_length`.
    pub fn fraction_of_second(&mut self, min_length: Option<usize>, max_length: usize) -> Result<&mut Self, Error> {
        self.require(self.scope.allows_time(), "fractional second")?;
        if max_length == 0 || max_length > 9 {
            return Err(Error::Build(BuildErrorKind::InvalidPadding));
        }
        if let Some(min) = min_length {
            if min > max_length {
                return Err(Error::Build(BuildErrorKind::MinExceedsMax));
            }
        }
        Ok(self.push(Node::Basic(Directive::DecimalFraction { min_length, max_length })))
    }

    /// Whether the UTC offset is negative, as a raw `0`/`1` unsigned field.
    /// Exposed for hand-built trees that need direct access to the sign bit
    /// outside a [`Builder::signed`] group.
    ///
    /// # Errors
    ///
    /// Returns [`BuildErrorKind::IncompatibleCapability`] outside an
    /// offset-capable scope.
    pub fn offset_is_negative(&mut self, padding: Padding) -> Result<&mut Self, Error> {
        self.require(self.scope.allows_offset(), "offset sign")?;
        validate_width(padding)?;
        Ok(self.push(Node::Basic(Directive::Unsigned {
            field: FieldId::OffsetIsNegative,
            padding,
        })))
    }

    /// The absolute offset hour magnitude, `0..=18`.
    ///
    /// # Errors
    ///
    /// See [`Builder::offset_is_negative`].
    pub fn offset_hours(&mut self, padding: Padding) -> Result<&mut Self, Error> {
        self.require(self.scope.allows_offset(), "offset hours")?;
        validate_width(padding)?;
        Ok(self.push(Node::Basic(Directive::Unsigned {
            field: FieldId::OffsetTotalHoursAbs,
            padding,
        })))
    }

    /// The absolute offset minute-of-hour magnitude, `0..=59`.
    ///
    /// # Errors
    ///
    /// See [`Builder::offset_is_negative`].
    pub fn offset_minutes_of_hour(&mut self, padding: Padding) -> Result<&mut Self, Error> {
        self.require(self.scope.allows_offset(), "offset minutes")?;
        validate_width(padding)?;
        Ok(self.push(Node::Basic(Directive::Unsigned {
            field: FieldId::OffsetMinutesOfHour,
            padding,
        })))
    }

    /// The absolute offset second-of-minute magnitude, `0..=59`.
    ///
    /// # Errors
    ///
    /// See [`Builder::offset_is_negative`].
    pub fn offset_seconds_of_minute(&mut self, padding: Padding) -> Result<&mut Self, Error> {
        self.require(self.scope.allows_offset(), "offset seconds")?;
        validate_width(padding)?;
        Ok(self.push(Node::Basic(Directive::Unsigned {
            field: FieldId::OffsetSecondsOfMinute,
            padding,
        })))
    }

    /// The time-zone identifier, drawn from an externally supplied
    /// [`crate::zone::ZoneIdRegistry`].
    ///
    /// # Errors
    ///
    /// Returns [`BuildErrorKind::IncompatibleCapability`] outside
    /// [`Scope::WithDateTimeComponents`].
    pub fn time_zone_id(&mut self) -> Result<&mut Self, Error> {
        self.require(self.scope.allows_zone(), "time zone id")?;
        Ok(self.push(Node::Basic(Directive::TimeZoneId)))
    }

    /// A single literal character.
    pub fn char(&mut self, c: char) -> &mut Self {
        let mut s = String::new();
        s.push(c);
        self.push(Node::Constant(s))
    }

    /// A literal string.
    pub fn chars(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(Node::Constant(text.into()))
    }

    /// Embeds an already-built sub-tree verbatim, e.g. a predefined format's
    /// internal directives.
    pub fn embed(&mut self, node: Node) -> &mut Self {
        self.push(node)
    }

    /// Appends an `Optional(onZero, body)` node. `body` is built with a
    /// fresh builder sharing this one's scope.
    ///
    /// # Errors
    ///
    /// Propagates any error from `body`, or
    /// [`BuildErrorKind::OptionalFieldWithoutDefault`] if `body` mentions a
    /// field without a declared default.
    pub fn optional(
        &mut self,
        on_zero: impl Into<String>,
        body: impl FnOnce(&mut Builder) -> Result<(), Error>,
    ) -> Result<&mut Self, Error> {
        let mut sub = Builder::new(self.scope);
        body(&mut sub)?;
        let node = sub.finish();
        node.require_all_fields_have_defaults().map_err(Error::Build)?;
        Ok(self.push(Node::Optional {
            on_zero: on_zero.into(),
            body: Box::new(node),
        }))
    }

    /// Appends a `Signed(body, withPlusSign)` node, deferring the sign to
    /// `sign_field`. `body` should mention only unsigned magnitude
    /// directives sharing that sign carrier.
    ///
    /// # Errors
    ///
    /// Propagates any error from `body`.
    pub fn signed(
        &mut self,
        with_plus_sign: bool,
        sign_field: FieldId,
        body: impl FnOnce(&mut Builder) -> Result<(), Error>,
    ) -> Result<&mut Self, Error> {
        let mut sub = Builder::new(self.scope);
        body(&mut sub)?;
        let node = sub.finish();
        Ok(self.push(Node::Signed {
            body: Box::new(node),
            with_plus_sign,
            sign_field,
        }))
    }

    /// Appends an `Alternatives(primary, alts)` node. Each alternative's
    /// fields must be a subset of the primary's (with defaults covering the
    /// rest).
    ///
    /// # Errors
    ///
    /// Propagates any error from `primary` or an alternative closure, or
    /// [`BuildErrorKind::AlternativeFieldMismatch`] if an alternative
    /// mentions a field the primary does not cover.
    #[allow(clippy::type_complexity)]
    pub fn alternative_parsing(
        &mut self,
        primary: impl FnOnce(&mut Builder) -> Result<(), Error>,
        alternatives: Vec<Box<dyn FnOnce(&mut Builder) -> Result<(), Error>>>,
    ) -> Result<&mut Self, Error> {
        let mut primary_builder = Builder::new(self.scope);
        primary(&mut primary_builder)?;
        let primary_node = primary_builder.finish();

        let mut alt_nodes = Vec::with_capacity(alternatives.len());
        for alt in alternatives {
            let mut sub = Builder::new(self.scope);
            alt(&mut sub)?;
            let node = sub.finish();
            node.require_alternative_compatible_with(&primary_node)
                .map_err(Error::Build)?;
            alt_nodes.push(node);
        }

        Ok(self.push(Node::Alternatives {
            primary: Box::new(primary_node),
            alternatives: alt_nodes,
        }))
    }

    fn finish(self) -> Node {
        Node::concat(self.nodes)
    }

    /// Finalises the builder into an immutable [`Node`].
    ///
    /// # Errors
    ///
    /// Currently infallible; returns `Result` so a future validation pass
    /// (e.g. rejecting an empty tree) can be added without breaking callers.
    pub fn build(self) -> Result<Node, Error> {
        Ok(self.finish())
    }
}
