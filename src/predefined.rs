//! The standard ISO-8601 and RFC 1123 formats, built from the [`builder`](crate::builder)
//! DSL over the same tree the formatter and parser already walk.
//!
//! Every tree here is built once behind a process-wide cache: with the
//! `std` feature, a [`once_cell::sync::Lazy`] holds the built [`Node`] and
//! every call clones out of it; without `std`, there is no thread-safe
//! place to cache a lazily-initialised static, so the tree is rebuilt on
//! each call instead (see [`crate::cache`] for the analogous pattern-string
//! cache).
//!
//! None of these trees mention [`FieldId::TimeZoneId`], so every parse,
//! `find` and `find_all` call here uses an empty [`StaticZoneIdRegistry`]
//! internally and assumes [`IsoCalendar`] for calendar-dependent
//! finalisation — these are, after all, *the* ISO-8601 and RFC 1123
//! formats, not configurable ones.

#[cfg(feature = "alloc")]
use alloc::boxed::Box;
#[cfg(feature = "alloc")]
use alloc::string::String;

use crate::builder::{Builder, Scope};
use crate::calendar::IsoCalendar;
use crate::container::Container;
use crate::error::Error;
use crate::field::FieldId;
use crate::finalize;
use crate::parse;
use crate::populate;
use crate::tree::{Node, Padding};
use crate::value::{Instant, LocalDate, LocalDateTime, LocalTime, UtcOffset, YearMonth};
use crate::zone::StaticZoneIdRegistry;

fn empty_registry() -> StaticZoneIdRegistry {
    StaticZoneIdRegistry::new(alloc::vec::Vec::new())
}

/// Builds a tree once and hands back an owned clone of it on every call
/// when `std` is available, or rebuilds it from scratch every time
/// otherwise.
macro_rules! predefined_tree {
    ($name:ident, $build:expr) => {
        fn $name() -> Node {
            #[cfg(feature = "std")]
            {
                static TREE: once_cell::sync::Lazy<Node> = once_cell::sync::Lazy::new(|| $build);
                TREE.clone()
            }
            #[cfg(not(feature = "std"))]
            {
                $build
            }
        }
    };
}

fn t_or_lowercase_t(b: &mut Builder) {
    b.alternative_parsing(
        |p| {
            p.chars("T");
            Ok(())
        },
        alloc::vec![
            Box::new(|alt: &mut Builder| {
                alt.chars("t");
                Ok(())
            }) as Box<dyn FnOnce(&mut Builder) -> Result<(), Error>>
        ],
    )
    .expect("'T'/'t' literal alternative is always buildable");
}

fn build_iso_date() -> Node {
    let mut b = Builder::new(Scope::WithDate);
    b.year(Padding::Zero(4)).expect("year directive is valid");
    b.char('-');
    b.month_number(Padding::Zero(2)).expect("month directive is valid");
    b.char('-');
    b.day_of_month(Padding::Zero(2)).expect("day directive is valid");
    b.build().expect("ISO date tree is valid")
}

fn build_iso_date_basic() -> Node {
    let mut b = Builder::new(Scope::WithDate);
    b.year(Padding::Zero(4)).expect("year directive is valid");
    b.month_number(Padding::Zero(2)).expect("month directive is valid");
    b.day_of_month(Padding::Zero(2)).expect("day directive is valid");
    b.build().expect("ISO date basic tree is valid")
}

fn build_iso_time() -> Node {
    let mut b = Builder::new(Scope::WithTime);
    b.hour(Padding::Zero(2)).expect("hour directive is valid");
    b.char(':');
    b.minute(Padding::Zero(2)).expect("minute directive is valid");
    b.optional("", |body| {
        body.char(':');
        body.second(Padding::Zero(2))?;
        body.optional("", |inner| {
            inner.char('.');
            inner.fraction_of_second(Some(0), 9)?;
            Ok(())
        })?;
        Ok(())
    })
    .expect("optional seconds/fraction is valid");
    b.build().expect("ISO time tree is valid")
}

fn build_iso_time_basic() -> Node {
    let mut b = Builder::new(Scope::WithTime);
    b.optional("", |body| {
        t_or_lowercase_t(body);
        Ok(())
    })
    .expect("optional T/t prefix is valid");
    b.hour(Padding::Zero(2)).expect("hour directive is valid");
    b.minute(Padding::Zero(2)).expect("minute directive is valid");
    b.optional("", |body| {
        body.second(Padding::Zero(2))?;
        body.optional("", |inner| {
            inner.char('.');
            inner.fraction_of_second(Some(0), 9)?;
            Ok(())
        })?;
        Ok(())
    })
    .expect("optional seconds/fraction is valid");
    b.build().expect("ISO time basic tree is valid")
}

/// `±hh:mm[:ss]`, with `Z`/`z` for a zero offset.
fn build_iso_offset() -> Node {
    let mut b = Builder::new(Scope::WithUtcOffset);
    b.signed(true, FieldId::OffsetIsNegative, |body| {
        body.offset_hours(Padding::Zero(2))?;
        body.char(':');
        body.offset_minutes_of_hour(Padding::Zero(2))?;
        body.optional("", |inner| {
            inner.char(':');
            inner.offset_seconds_of_minute(Padding::Zero(2))?;
            Ok(())
        })?;
        Ok(())
    })
    .expect("offset body is valid");
    let numeric = b.build().expect("offset tree is valid");
    Node::Alternatives {
        primary: Box::new(numeric),
        alternatives: alloc::vec![Node::Constant("Z".into()), Node::Constant("z".into())],
    }
}

/// `±hh[mm[ss]]`, with `Z`/`z` for a zero offset.
fn build_iso_offset_basic() -> Node {
    let mut b = Builder::new(Scope::WithUtcOffset);
    b.signed(true, FieldId::OffsetIsNegative, |body| {
        body.offset_hours(Padding::Zero(2))?;
        body.optional("", |minutes| {
            minutes.offset_minutes_of_hour(Padding::Zero(2))?;
            minutes.optional("", |seconds| {
                seconds.offset_seconds_of_minute(Padding::Zero(2))?;
                Ok(())
            })?;
            Ok(())
        })?;
        Ok(())
    })
    .expect("offset body is valid");
    let numeric = b.build().expect("offset basic tree is valid");
    Node::Alternatives {
        primary: Box::new(numeric),
        alternatives: alloc::vec![Node::Constant("Z".into()), Node::Constant("z".into())],
    }
}

/// `±hhmm`, always signed, no `Z` shortcut.
fn build_four_digit_offset() -> Node {
    let mut b = Builder::new(Scope::WithUtcOffset);
    b.signed(true, FieldId::OffsetIsNegative, |body| {
        body.offset_hours(Padding::Zero(2))?;
        body.offset_minutes_of_hour(Padding::Zero(2))?;
        Ok(())
    })
    .expect("four-digit offset body is valid");
    b.build().expect("four-digit offset tree is valid")
}

fn build_iso_date_time() -> Node {
    let mut b = Builder::new(Scope::WithDateTime);
    b.embed(build_iso_date());
    t_or_lowercase_t(&mut b);
    b.embed(build_iso_time());
    b.build().expect("ISO date-time tree is valid")
}

/// `hour:minute:second[.fraction]`, seconds mandatory (unlike
/// [`build_iso_time`]'s optional seconds).
fn build_offset_date_time_clock() -> Node {
    let mut b = Builder::new(Scope::WithTime);
    b.hour(Padding::Zero(2)).expect("hour directive is valid");
    b.char(':');
    b.minute(Padding::Zero(2)).expect("minute directive is valid");
    b.char(':');
    b.second(Padding::Zero(2)).expect("second directive is valid");
    b.optional("", |inner| {
        inner.char('.');
        inner.fraction_of_second(Some(0), 9)?;
        Ok(())
    })
    .expect("optional fraction is valid");
    b.build().expect("offset date-time clock tree is valid")
}

/// [`build_iso_offset`]'s tree with a bare `±hh` accepted as a further
/// alternative, for ISO date-time-offset's relaxed offset grammar.
fn build_offset_with_short_hours_variant() -> Node {
    let mut hb = Builder::new(Scope::WithUtcOffset);
    hb.signed(true, FieldId::OffsetIsNegative, |body| {
        body.offset_hours(Padding::Zero(2))?;
        Ok(())
    })
    .expect("short offset body is valid");
    let short = hb.build().expect("short offset tree is valid");

    match build_iso_offset() {
        Node::Alternatives {
            primary,
            mut alternatives,
        } => {
            alternatives.push(short);
            Node::Alternatives { primary, alternatives }
        }
        other => other,
    }
}

fn build_iso_date_time_offset() -> Node {
    let mut b = Builder::new(Scope::WithDateTimeComponents);
    b.embed(build_iso_date());
    t_or_lowercase_t(&mut b);
    b.embed(build_offset_date_time_clock());
    b.embed(build_offset_with_short_hours_variant());
    b.build().expect("ISO date-time-offset tree is valid")
}

fn weekday_abbreviations() -> alloc::vec::Vec<String> {
    ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]
        .iter()
        .map(|s| String::from(*s))
        .collect()
}

fn month_abbreviations() -> alloc::vec::Vec<String> {
    [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ]
    .iter()
    .map(|s| String::from(*s))
    .collect()
}

/// `'UT' | 'Z' | ['GMT'] ±hhmm`. The `GMT` prefix is modelled the same way
/// as [`t_or_lowercase_t`]'s leading letter: an `Optional` body that
/// mentions no fields always elides when formatting, so `GMT` is only ever
/// produced by parsing, never by formatting.
fn build_rfc1123_offset() -> Node {
    let mut b = Builder::new(Scope::WithUtcOffset);
    b.alternative_parsing(
        |primary| {
            primary.optional("", |gmt| {
                gmt.chars("GMT");
                Ok(())
            })?;
            primary.signed(true, FieldId::OffsetIsNegative, |body| {
                body.offset_hours(Padding::Zero(2))?;
                body.offset_minutes_of_hour(Padding::Zero(2))?;
                Ok(())
            })?;
            Ok(())
        },
        alloc::vec![
            Box::new(|alt: &mut Builder| {
                alt.chars("UT");
                Ok(())
            }) as Box<dyn FnOnce(&mut Builder) -> Result<(), Error>>,
            Box::new(|alt: &mut Builder| {
                alt.chars("Z");
                Ok(())
            }) as Box<dyn FnOnce(&mut Builder) -> Result<(), Error>>,
        ],
    )
    .expect("RFC 1123 offset alternatives are valid");
    b.build().expect("RFC 1123 offset tree is valid")
}

fn build_rfc1123() -> Node {
    let mut b = Builder::new(Scope::WithDateTimeComponents);
    b.alternative_parsing(
        |weekday| {
            weekday.weekday_name(weekday_abbreviations())?;
            weekday.chars(", ");
            Ok(())
        },
        alloc::vec![Box::new(|_: &mut Builder| Ok(())) as Box<dyn FnOnce(&mut Builder) -> Result<(), Error>>],
    )
    .expect("weekday alternative is valid");
    b.day_of_month(Padding::None).expect("day directive is valid");
    b.char(' ');
    b.month_name(month_abbreviations()).expect("month name directive is valid");
    b.char(' ');
    b.year(Padding::Zero(4)).expect("year directive is valid");
    b.char(' ');
    b.hour(Padding::Zero(2)).expect("hour directive is valid");
    b.char(':');
    b.minute(Padding::Zero(2)).expect("minute directive is valid");
    b.optional("", |inner| {
        inner.char(':');
        inner.second(Padding::Zero(2))?;
        Ok(())
    })
    .expect("optional seconds is valid");
    b.char(' ');
    b.embed(build_rfc1123_offset());
    b.build().expect("RFC 1123 tree is valid")
}

fn build_iso_year_month() -> Node {
    let mut b = Builder::new(Scope::WithYearMonth);
    b.year(Padding::Zero(4)).expect("year directive is valid");
    b.char('-');
    b.month_number(Padding::Zero(2)).expect("month directive is valid");
    b.build().expect("ISO year-month tree is valid")
}

predefined_tree!(iso_date_tree, build_iso_date());
predefined_tree!(iso_date_basic_tree, build_iso_date_basic());
predefined_tree!(iso_time_tree, build_iso_time());
predefined_tree!(iso_time_basic_tree, build_iso_time_basic());
predefined_tree!(iso_offset_tree, build_iso_offset());
predefined_tree!(iso_offset_basic_tree, build_iso_offset_basic());
predefined_tree!(four_digit_offset_tree, build_four_digit_offset());
predefined_tree!(iso_date_time_tree, build_iso_date_time());
predefined_tree!(iso_date_time_offset_tree, build_iso_date_time_offset());
predefined_tree!(rfc1123_tree, build_rfc1123());
predefined_tree!(iso_year_month_tree, build_iso_year_month());

fn populate_rfc1123(container: &mut Container, instant: &Instant) {
    populate::populate_date_with_calendar(container, instant.date_time().date(), &IsoCalendar);
    populate::populate_time(container, instant.date_time().time());
    populate::populate_offset_always(container, instant.offset());
}

/// Adapts [`populate::populate_instant`]'s `&Instant` parameter to the
/// by-value signature [`predefined_format!`] expects of every `$populate`.
fn populate_instant_owned(container: &mut Container, instant: Instant) {
    populate::populate_instant(container, &instant);
}

/// Adapts [`populate_rfc1123`]'s `&Instant` parameter the same way.
fn populate_rfc1123_owned(container: &mut Container, instant: Instant) {
    populate_rfc1123(container, &instant);
}

fn find_all_with<'a, T>(
    tree: Node,
    input: &'a str,
    finalize: impl Fn(&Container) -> Result<T, Error> + 'a,
) -> impl Iterator<Item = (usize, usize, T)> + 'a {
    let registry = empty_registry();
    let mut next_start = Some(0usize);
    core::iter::from_fn(move || {
        let start = next_start?;
        if start > input.len() {
            next_start = None;
            return None;
        }
        let (match_start, match_end, value) = parse::find(&tree, input, start, &registry, &finalize)?;
        next_start = Some(if match_end > match_start {
            match_end
        } else {
            match_end + parse::next_char_len(input, match_end)
        });
        Some((match_start, match_end, value))
    })
}

macro_rules! predefined_format {
    ($doc:literal, $ty:ident, $value:ty, $tree:expr, $populate:expr, $finalize:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy)]
        pub struct $ty;

        impl $ty {
            /// Renders `value` through this format.
            ///
            /// # Errors
            ///
            /// Returns [`Error::MissingField`] or [`Error::FieldValue`] if a
            /// directive in the tree cannot be satisfied, which should not
            /// happen for a well-formed value produced by this crate.
            pub fn format(value: $value) -> Result<String, Error> {
                let mut container = Container::new();
                ($populate)(&mut container, value);
                crate::format::format(&$tree, &container)
            }

            /// Parses `input` as this format, requiring the entire string to
            /// match.
            ///
            /// # Errors
            ///
            /// Returns [`Error::Parse`] if no full match exists,
            /// [`Error::FieldValue`] or [`Error::MissingField`] if the match's
            /// fields fail finalisation, or [`Error::InconsistentFields`] if
            /// cross-field checks fail.
            pub fn parse(input: &str) -> Result<$value, Error> {
                let container = parse::parse_full(&$tree, input, &empty_registry())?;
                ($finalize)(&container)
            }

            /// Like [`Self::parse`], but returns [`None`] instead of an error.
            #[must_use]
            pub fn parse_or_none(input: &str) -> Option<$value> {
                Self::parse(input).ok()
            }

            /// Scans `input` from byte offset `start` for the first substring
            /// matching this format, per [`crate::parse::find`].
            #[must_use]
            pub fn find(input: &str, start: usize) -> Option<(usize, usize, $value)> {
                parse::find(&$tree, input, start, &empty_registry(), &$finalize)
            }

            /// The lazy sequence of non-overlapping matches of this format in
            /// `input`, per [`crate::parse::find_all`].
            pub fn find_all(input: &str) -> impl Iterator<Item = (usize, usize, $value)> + '_ {
                find_all_with($tree, input, $finalize)
            }
        }
    };
}

predefined_format!(
    "`year(4-digit, signed out-of-range) '-' monthNumber(2) '-' dayOfMonth(2)`.",
    IsoDate,
    LocalDate,
    iso_date_tree(),
    populate::populate_date,
    |c: &Container| finalize::finalize_date(c, &IsoCalendar)
);

predefined_format!(
    "[`IsoDate`] without `-` separators.",
    IsoDateBasic,
    LocalDate,
    iso_date_basic_tree(),
    populate::populate_date,
    |c: &Container| finalize::finalize_date(c, &IsoCalendar)
);

predefined_format!(
    "`hour(2) ':' minute(2) [':' second(2) ['.' fractionOfSecond]]`.",
    IsoTime,
    LocalTime,
    iso_time_tree(),
    populate::populate_time,
    finalize::finalize_time
);

predefined_format!(
    "[`IsoTime`] with an optional leading `T`/`t` and no `:` separators.",
    IsoTimeBasic,
    LocalTime,
    iso_time_basic_tree(),
    populate::populate_time,
    finalize::finalize_time
);

predefined_format!(
    "`'Z'`/`'z'` on a zero offset, else `±hh:mm[:ss]`.",
    IsoOffset,
    UtcOffset,
    iso_offset_tree(),
    populate::populate_offset,
    finalize::finalize_offset
);

predefined_format!(
    "`'Z'`/`'z'` on a zero offset, else `±hh[mm[ss]]`.",
    IsoOffsetBasic,
    UtcOffset,
    iso_offset_basic_tree(),
    populate::populate_offset,
    finalize::finalize_offset
);

predefined_format!(
    "`±hhmm`, always signed, with no `Z` shortcut for a zero offset.",
    FourDigitOffset,
    UtcOffset,
    four_digit_offset_tree(),
    populate::populate_offset_always,
    finalize::finalize_offset
);

predefined_format!(
    "[`IsoDate`] + (`T`|`t`) + [`IsoTime`].",
    IsoDateTime,
    LocalDateTime,
    iso_date_time_tree(),
    populate::populate_date_time,
    |c: &Container| finalize::finalize_date_time(c, &IsoCalendar)
);

predefined_format!(
    "[`IsoDate`] + (`T`|`t`) + `hour:minute:second[.fraction]` + [`IsoOffset`] \
     (with a bare `±hh` also accepted while parsing).",
    IsoDateTimeOffset,
    Instant,
    iso_date_time_offset_tree(),
    populate_instant_owned,
    |c: &Container| finalize::finalize_instant(c, &IsoCalendar)
);

predefined_format!(
    "`[WeekdayAbbrev ', '] dayOfMonth(no-pad) ' ' MonthAbbrev ' ' year(4+) ' ' \
     hour(2) ':' minute(2) [':' second(2)] ' ' ('UT' | 'Z' | ['GMT'] ±hhmm)`.",
    Rfc1123,
    Instant,
    rfc1123_tree(),
    populate_rfc1123_owned,
    |c: &Container| finalize::finalize_instant(c, &IsoCalendar)
);

predefined_format!(
    "`year(4) '-' monthNumber(2)`.",
    IsoYearMonth,
    YearMonth,
    iso_year_month_tree(),
    populate::populate_year_month,
    finalize::finalize_year_month
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_date_round_trips() {
        let date = LocalDate::new_unchecked(2024, 3, 5);
        let text = IsoDate::format(date).unwrap();
        assert_eq!(text, "2024-03-05");
        assert_eq!(IsoDate::parse(&text).unwrap(), date);
    }

    #[test]
    fn iso_date_signs_years_past_four_digits() {
        let date = LocalDate::new_unchecked(12_345, 1, 1);
        let text = IsoDate::format(date).unwrap();
        assert_eq!(text, "+12345-01-01");
        assert_eq!(IsoDate::parse(&text).unwrap(), date);
    }

    #[test]
    fn iso_date_basic_has_no_separators() {
        let date = LocalDate::new_unchecked(2024, 3, 5);
        assert_eq!(IsoDateBasic::format(date).unwrap(), "20240305");
        assert_eq!(IsoDateBasic::parse("20240305").unwrap(), date);
    }

    #[test]
    fn iso_time_elides_absent_seconds_and_fraction() {
        let time = LocalTime::new_unchecked(9, 5, 0, 0);
        assert_eq!(IsoTime::format(time).unwrap(), "09:05");
        assert_eq!(IsoTime::parse("09:05").unwrap(), time);
    }

    #[test]
    fn iso_time_keeps_nonzero_seconds_and_fraction() {
        let time = LocalTime::new_unchecked(9, 5, 30, 250_000_000);
        assert_eq!(IsoTime::format(time).unwrap(), "09:05:30.25");
        assert_eq!(IsoTime::parse("09:05:30.25").unwrap(), time);
    }

    #[test]
    fn iso_time_basic_accepts_optional_t_prefix() {
        let time = LocalTime::new_unchecked(9, 5, 30, 0);
        assert_eq!(IsoTimeBasic::format(time).unwrap(), "090530");
        assert_eq!(IsoTimeBasic::parse("090530").unwrap(), time);
        assert_eq!(IsoTimeBasic::parse("T090530").unwrap(), time);
        assert_eq!(IsoTimeBasic::parse("t090530").unwrap(), time);
    }

    #[test]
    fn iso_offset_emits_z_for_zero() {
        assert_eq!(IsoOffset::format(UtcOffset::new_unchecked(0)).unwrap(), "Z");
        assert_eq!(
            IsoOffset::parse("Z").unwrap(),
            UtcOffset::new_unchecked(0)
        );
        assert_eq!(
            IsoOffset::parse("z").unwrap(),
            UtcOffset::new_unchecked(0)
        );
    }

    #[test]
    fn iso_offset_formats_nonzero_hours_and_minutes() {
        let offset = UtcOffset::new_unchecked(-(2 * 3600 + 30 * 60));
        let text = IsoOffset::format(offset).unwrap();
        assert_eq!(text, "-02:30");
        assert_eq!(IsoOffset::parse(&text).unwrap(), offset);
    }

    #[test]
    fn iso_offset_basic_omits_seconds_when_zero() {
        let offset = UtcOffset::new_unchecked(5 * 3600);
        assert_eq!(IsoOffsetBasic::format(offset).unwrap(), "+05");
        assert_eq!(IsoOffsetBasic::parse("+05").unwrap(), offset);
        assert_eq!(IsoOffsetBasic::parse("+0500").unwrap(), offset);
    }

    #[test]
    fn four_digit_offset_never_emits_z() {
        assert_eq!(FourDigitOffset::format(UtcOffset::new_unchecked(0)).unwrap(), "+0000");
        assert_eq!(
            FourDigitOffset::parse("+0000").unwrap(),
            UtcOffset::new_unchecked(0)
        );
        assert!(FourDigitOffset::parse("Z").is_err());
    }

    #[test]
    fn iso_date_time_joins_date_and_time_with_t() {
        let dt = LocalDateTime::new_unchecked(
            LocalDate::new_unchecked(2024, 3, 5),
            LocalTime::new_unchecked(9, 5, 0, 0),
        );
        let text = IsoDateTime::format(dt).unwrap();
        assert_eq!(text, "2024-03-05T09:05");
        assert_eq!(IsoDateTime::parse(&text).unwrap(), dt);
        assert_eq!(IsoDateTime::parse("2024-03-05t09:05").unwrap(), dt);
    }

    #[test]
    fn iso_date_time_offset_uses_z_for_utc() {
        let dt = LocalDateTime::new_unchecked(
            LocalDate::new_unchecked(2024, 3, 5),
            LocalTime::new_unchecked(9, 5, 30, 0),
        );
        let instant = Instant::new_unchecked(dt, UtcOffset::new_unchecked(0));
        let text = IsoDateTimeOffset::format(instant.clone()).unwrap();
        assert_eq!(text, "2024-03-05T09:05:30Z");
        assert_eq!(IsoDateTimeOffset::parse(&text).unwrap(), instant);
    }

    #[test]
    fn iso_date_time_offset_accepts_bare_hour_offset() {
        let dt = LocalDateTime::new_unchecked(
            LocalDate::new_unchecked(2024, 3, 5),
            LocalTime::new_unchecked(9, 5, 30, 0),
        );
        let instant = Instant::new_unchecked(dt, UtcOffset::new_unchecked(2 * 3600));
        assert_eq!(
            IsoDateTimeOffset::parse("2024-03-05T09:05:30+02").unwrap(),
            instant
        );
    }

    #[test]
    fn rfc1123_formats_without_gmt_or_weekday() {
        let dt = LocalDateTime::new_unchecked(
            LocalDate::new_unchecked(2020, 3, 16),
            LocalTime::new_unchecked(23, 59, 59, 0),
        );
        let instant = Instant::new_unchecked(dt, UtcOffset::new_unchecked(3 * 3600));
        let text = Rfc1123::format(instant.clone()).unwrap();
        assert_eq!(text, "Mon, 16 Mar 2020 23:59:59 +0300");
        assert_eq!(Rfc1123::parse(&text).unwrap(), instant);
    }

    #[test]
    fn rfc1123_parses_gmt_ut_and_z_offsets() {
        let dt = LocalDateTime::new_unchecked(
            LocalDate::new_unchecked(2020, 3, 16),
            LocalTime::new_unchecked(23, 59, 59, 0),
        );
        let instant = Instant::new_unchecked(dt, UtcOffset::new_unchecked(0));
        assert_eq!(Rfc1123::parse("16 Mar 2020 23:59:59 GMT+0000").unwrap(), instant);
        assert_eq!(Rfc1123::parse("16 Mar 2020 23:59:59 UT").unwrap(), instant);
        assert_eq!(Rfc1123::parse("16 Mar 2020 23:59:59 Z").unwrap(), instant);
    }

    #[test]
    fn rfc1123_rejects_a_weekday_that_does_not_match_the_date() {
        assert!(Rfc1123::parse("Tue, 16 Mar 2020 23:59:59 +0300").is_err());
    }

    #[test]
    fn iso_year_month_round_trips() {
        let ym = YearMonth::new_unchecked(2024, 3);
        let text = IsoYearMonth::format(ym).unwrap();
        assert_eq!(text, "2024-03");
        assert_eq!(IsoYearMonth::parse(&text).unwrap(), ym);
    }

    #[test]
    fn find_all_scans_iso_dates_out_of_surrounding_text() {
        let matches: alloc::vec::Vec<_> =
            IsoDate::find_all("start 2024-03-05 middle 2025-12-31 end").collect();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].2, LocalDate::new_unchecked(2024, 3, 5));
        assert_eq!(matches[1].2, LocalDate::new_unchecked(2025, 12, 31));
    }

    mod properties {
        use quickcheck_macros::quickcheck;

        use super::*;
        use crate::calendar::{CalendarOps, IsoCalendar};

        #[quickcheck]
        fn iso_date_round_trips_over_every_valid_date(year_offset: u16, month_raw: u8, day_raw: u8) -> bool {
            let year = 1 + i64::from(year_offset % 9999);
            let month = 1 + i64::from(month_raw % 12);
            let max_day = IsoCalendar.days_in_month(year, month);
            let day = 1 + i64::from(day_raw) % max_day;
            let date = LocalDate::new_unchecked(year, month, day);
            IsoDate::format(date).and_then(|text| IsoDate::parse(&text)) == Ok(date)
        }

        #[quickcheck]
        fn iso_time_round_trips_over_every_valid_time(hour: u8, minute: u8, second: u8, nanos: u32) -> bool {
            let time = LocalTime::new_unchecked(
                i64::from(hour % 24),
                i64::from(minute % 60),
                i64::from(second % 60),
                i64::from(nanos % 1_000_000_000),
            );
            IsoTime::format(time).and_then(|text| IsoTime::parse(&text)) == Ok(time)
        }

        #[quickcheck]
        fn iso_offset_round_trips_over_every_valid_offset(total_seconds: i32, negative: bool) -> bool {
            let magnitude = i64::from(total_seconds).rem_euclid(18 * 3600 + 1);
            let signed_seconds = if negative && magnitude != 0 { -magnitude } else { magnitude };
            let offset = UtcOffset::new_unchecked(signed_seconds);
            IsoOffset::format(offset).and_then(|text| IsoOffset::parse(&text)) == Ok(offset)
        }
    }
}
