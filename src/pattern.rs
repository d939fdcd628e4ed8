//! Translates ICU-style pattern strings (`"uuuu-MM-dd'T'HH:mm[:ss]"`) into
//! the same [`Node`] tree the [`crate::builder`] DSL produces.
//!
//! The lexer recognises three constructs: single-quoted literal runs
//! (a doubled quote is a literal quote), `[...]`-delimited optional groups,
//! and runs of a repeated ASCII letter, each *(letter, length)* pair mapped
//! to a directive by [`apply_directive`]. Everything else is a literal
//! character taken verbatim.

#[cfg(feature = "alloc")]
use alloc::boxed::Box;
#[cfg(feature = "alloc")]
use alloc::string::String;
#[cfg(feature = "alloc")]
use alloc::vec;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;
use core::iter::Peekable;
use core::str::Chars;

use crate::builder::{Builder, Scope};
use crate::error::{BuildErrorKind, Error};
use crate::tree::{Node, Padding};

/// Compiles `pattern` into a format tree.
///
/// # Errors
///
/// Returns [`Error::Build`] for an unknown letter, a locale-dependent
/// letter, an unsupported repeat length, or an unterminated quote or
/// optional group.
pub fn compile_pattern(pattern: &str) -> Result<Node, Error> {
    let mut builder = Builder::new(Scope::WithDateTimeComponents);
    let mut chars = pattern.chars().peekable();
    compile_into(&mut chars, &mut builder, false)?;
    builder.build()
}

fn compile_into(chars: &mut Peekable<Chars<'_>>, builder: &mut Builder, in_optional: bool) -> Result<(), Error> {
    loop {
        match chars.peek().copied() {
            None => {
                return if in_optional {
                    Err(Error::Build(BuildErrorKind::UnterminatedPattern))
                } else {
                    Ok(())
                };
            }
            Some(']') if in_optional => {
                chars.next();
                return Ok(());
            }
            Some('\'') => {
                chars.next();
                let mut literal = String::new();
                loop {
                    match chars.next() {
                        None => return Err(Error::Build(BuildErrorKind::UnterminatedPattern)),
                        Some('\'') => {
                            if chars.peek() == Some(&'\'') {
                                chars.next();
                                literal.push('\'');
                            } else {
                                break;
                            }
                        }
                        Some(c) => literal.push(c),
                    }
                }
                builder.chars(literal);
            }
            Some('[') => {
                chars.next();
                builder.optional("", |body| compile_into(&mut *chars, body, true))?;
            }
            Some(c) if c.is_ascii_alphabetic() => {
                let mut length = 0usize;
                while chars.peek() == Some(&c) {
                    chars.next();
                    length += 1;
                }
                apply_directive(c, length, builder)?;
            }
            Some(c) => {
                chars.next();
                builder.char(c);
            }
        }
    }
}

fn apply_directive(letter: char, length: usize, builder: &mut Builder) -> Result<(), Error> {
    match letter {
        'u' | 'y' => year_directive(length, builder),
        'M' | 'L' => month_directive(length, letter, builder),
        'd' => match length {
            1 => builder.day_of_month(Padding::None).map(|_| ()),
            2 => builder.day_of_month(Padding::Zero(2)).map(|_| ()),
            _ => unsupported(letter, length),
        },
        'D' => match length {
            1 => builder.day_of_year(Padding::None).map(|_| ()),
            3 => builder.day_of_year(Padding::Zero(3)).map(|_| ()),
            _ => unsupported(letter, length),
        },
        'H' => match length {
            1 => builder.hour(Padding::None).map(|_| ()),
            2 => builder.hour(Padding::Zero(2)).map(|_| ()),
            _ => unsupported(letter, length),
        },
        'm' => match length {
            1 => builder.minute(Padding::None).map(|_| ()),
            2 => builder.minute(Padding::Zero(2)).map(|_| ()),
            _ => unsupported(letter, length),
        },
        's' => match length {
            1 => builder.second(Padding::None).map(|_| ()),
            2 => builder.second(Padding::Zero(2)).map(|_| ()),
            _ => unsupported(letter, length),
        },
        'S' => {
            if (1..=9).contains(&length) {
                builder.fraction_of_second(Some(length), length).map(|_| ())
            } else {
                unsupported(letter, length)
            }
        }
        'V' => {
            if length == 2 {
                builder.time_zone_id().map(|_| ())
            } else {
                unsupported(letter, length)
            }
        }
        'X' => offset_directive(length, true, letter).map(|node| {
            builder.embed(node);
        }),
        'x' => offset_directive(length, false, letter).map(|node| {
            builder.embed(node);
        }),
        'Z' => zone_offset_directive(length).map(|node| {
            builder.embed(node);
        }),
        'G' => Err(Error::Build(BuildErrorKind::LocaleDependentLetter {
            letter,
            suggestion: None,
        })),
        'E' | 'e' | 'c' => Err(Error::Build(BuildErrorKind::LocaleDependentLetter {
            letter,
            suggestion: None,
        })),
        'Q' | 'q' => Err(Error::Build(BuildErrorKind::LocaleDependentLetter {
            letter,
            suggestion: None,
        })),
        'z' | 'v' => Err(Error::Build(BuildErrorKind::LocaleDependentLetter {
            letter,
            suggestion: Some("'V'"),
        })),
        'O' => Err(Error::Build(BuildErrorKind::LocaleDependentLetter {
            letter,
            suggestion: Some("'X' or 'x'"),
        })),
        _ => Err(Error::Build(BuildErrorKind::UnknownPatternLetter(letter))),
    }
}

fn unsupported(letter: char, length: usize) -> Result<(), Error> {
    Err(Error::Build(BuildErrorKind::UnsupportedPatternLength { letter, length }))
}

fn year_directive(length: usize, builder: &mut Builder) -> Result<(), Error> {
    match length {
        1 => builder.year(Padding::None).map(|_| ()),
        2 => builder.reduced_year(2000).map(|_| ()),
        4 => builder.year(Padding::Zero(4)).map(|_| ()),
        _ => unsupported('u', length),
    }
}

fn month_directive(length: usize, letter: char, builder: &mut Builder) -> Result<(), Error> {
    match length {
        1 => builder.month_number(Padding::None).map(|_| ()),
        2 => builder.month_number(Padding::Zero(2)).map(|_| ()),
        _ if length >= 3 => Err(Error::Build(BuildErrorKind::LocaleDependentLetter {
            letter,
            suggestion: None,
        })),
        _ => unsupported(letter, length),
    }
}

/// How a UTC-offset pattern directive treats a minutes/seconds sub-field:
/// always present, present only when nonzero, or never present at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OffsetPart {
    Never,
    Always,
    IfNonzero,
}

fn build_offset_tree(minutes: OffsetPart, seconds: OffsetPart, separator: bool) -> Result<Node, Error> {
    let mut b = Builder::new(Scope::WithUtcOffset);
    b.signed(true, crate::field::FieldId::OffsetIsNegative, |body| {
        body.offset_hours(Padding::Zero(2))?;
        match minutes {
            OffsetPart::Never => {}
            OffsetPart::Always => {
                if separator {
                    body.char(':');
                }
                body.offset_minutes_of_hour(Padding::Zero(2))?;
            }
            OffsetPart::IfNonzero => {
                body.optional("", |inner| {
                    if separator {
                        inner.char(':');
                    }
                    inner.offset_minutes_of_hour(Padding::Zero(2))?;
                    Ok(())
                })?;
            }
        }
        match seconds {
            OffsetPart::Never => {}
            OffsetPart::Always => {
                if separator {
                    body.char(':');
                }
                body.offset_seconds_of_minute(Padding::Zero(2))?;
            }
            OffsetPart::IfNonzero => {
                body.optional("", |inner| {
                    if separator {
                        inner.char(':');
                    }
                    inner.offset_seconds_of_minute(Padding::Zero(2))?;
                    Ok(())
                })?;
            }
        }
        Ok(())
    })?;
    b.build()
}

fn offset_directive(length: usize, zero_on_zero: bool, letter: char) -> Result<Node, Error> {
    let (minutes, seconds, separator) = match length {
        1 => (OffsetPart::Never, OffsetPart::Never, false),
        2 => (OffsetPart::Always, OffsetPart::Never, false),
        3 => (OffsetPart::Always, OffsetPart::Never, true),
        4 => (OffsetPart::Always, OffsetPart::IfNonzero, false),
        5 => (OffsetPart::Always, OffsetPart::IfNonzero, true),
        _ => return Err(Error::Build(BuildErrorKind::UnsupportedPatternLength { letter, length })),
    };
    let numeric = build_offset_tree(minutes, seconds, separator)?;
    Ok(if zero_on_zero {
        Node::Alternatives {
            primary: Box::new(numeric),
            alternatives: vec![Node::Constant("Z".into())],
        }
    } else {
        numeric
    })
}

fn zone_offset_directive(length: usize) -> Result<Node, Error> {
    match length {
        1..=3 => offset_directive(2, false, 'Z'),
        4 => Err(Error::Build(BuildErrorKind::LocaleDependentLetter {
            letter: 'Z',
            suggestion: Some("'X' or 'x'"),
        })),
        5 => offset_directive(5, true, 'Z'),
        _ => Err(Error::Build(BuildErrorKind::UnsupportedPatternLength { letter: 'Z', length })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::Container;
    use crate::field::FieldId;
    use crate::format::format;
    use crate::parse::parse_full;
    use crate::populate::populate_offset;
    use crate::value::UtcOffset;
    use crate::zone::StaticZoneIdRegistry;

    #[test]
    fn compiles_a_basic_date_pattern() {
        let node = compile_pattern("uuuu-MM-dd").unwrap();
        let mut c = Container::new();
        c.set(FieldId::Year, 2024);
        c.set(FieldId::MonthNumber, 3);
        c.set(FieldId::DayOfMonth, 5);
        assert_eq!(format(&node, &c).unwrap(), "2024-03-05");
    }

    #[test]
    fn quoted_literal_is_taken_verbatim() {
        let node = compile_pattern("HH'h'mm").unwrap();
        let mut c = Container::new();
        c.set(FieldId::Hour, 9);
        c.set(FieldId::Minute, 5);
        assert_eq!(format(&node, &c).unwrap(), "09h05");
    }

    #[test]
    fn doubled_quote_is_a_literal_quote() {
        let node = compile_pattern("HH''mm").unwrap();
        let mut c = Container::new();
        c.set(FieldId::Hour, 9);
        c.set(FieldId::Minute, 5);
        assert_eq!(format(&node, &c).unwrap(), "09'05");
    }

    #[test]
    fn optional_group_is_elided_on_defaults() {
        let node = compile_pattern("HH:mm[:ss]").unwrap();
        let mut c = Container::new();
        c.set(FieldId::Hour, 12);
        c.set(FieldId::Minute, 34);
        assert_eq!(format(&node, &c).unwrap(), "12:34");
        c.set(FieldId::Second, 56);
        assert_eq!(format(&node, &c).unwrap(), "12:34:56");
    }

    #[test]
    fn unknown_letter_is_rejected() {
        let err = compile_pattern("Q").unwrap_err();
        assert_eq!(
            err,
            Error::Build(BuildErrorKind::LocaleDependentLetter {
                letter: 'Q',
                suggestion: None,
            })
        );
    }

    #[test]
    fn generic_month_name_is_rejected_as_locale_dependent() {
        let err = compile_pattern("MMM").unwrap_err();
        assert_eq!(
            err,
            Error::Build(BuildErrorKind::LocaleDependentLetter {
                letter: 'M',
                suggestion: None,
            })
        );
    }

    #[test]
    fn unterminated_quote_is_rejected() {
        let err = compile_pattern("'abc").unwrap_err();
        assert_eq!(err, Error::Build(BuildErrorKind::UnterminatedPattern));
    }

    #[test]
    fn x_pattern_emits_z_on_zero_offset() {
        let node = compile_pattern("XXXXX").unwrap();
        let mut c = Container::new();
        populate_offset(&mut c, UtcOffset::new_unchecked(0));
        assert_eq!(format(&node, &c).unwrap(), "Z");

        let mut c = Container::new();
        populate_offset(&mut c, UtcOffset::new_unchecked(2 * 3600 + 30 * 60));
        assert_eq!(format(&node, &c).unwrap(), "+02:30");
    }

    #[test]
    fn lowercase_x_pattern_never_emits_z() {
        let node = compile_pattern("xxxxx").unwrap();
        let mut c = Container::new();
        populate_offset(&mut c, UtcOffset::new_unchecked(0));
        let err = format(&node, &c).unwrap_err();
        assert!(matches!(err, Error::MissingField(FieldId::OffsetTotalHoursAbs)));
    }

    #[test]
    fn time_zone_id_pattern_round_trips() {
        let node = compile_pattern("VV").unwrap();
        let registry = StaticZoneIdRegistry::new(vec!["Europe/Paris", "UTC"]);
        let container = parse_full(&node, "Europe/Paris", &registry).unwrap();
        assert_eq!(container.zone_id(), Some("Europe/Paris"));
    }
}
