//! The formatter: a pure, left-to-right walk over a format tree that reads
//! a filled [`Container`] and writes text.
//!
//! Formatting never mutates the container and never fails to build valid
//! output except when a required field truly is missing — there is no
//! separate "compile the tree" step distinct from walking it.

use core::fmt::Write as _;

#[cfg(feature = "alloc")]
use alloc::string::String;

use crate::container::Container;
use crate::error::Error;
use crate::field::FieldId;
use crate::tree::{Directive, NameList, Node, Padding};

/// Formats `container` through `node`, producing text.
///
/// # Errors
///
/// Returns [`Error::MissingField`] if a directive's field is unset with no
/// default, or [`Error::FieldValue`] if a named-enum field's value has no
/// corresponding name.
pub fn format(node: &Node, container: &Container) -> Result<String, Error> {
    let mut out = String::new();
    format_into(node, container, &mut out)?;
    Ok(out)
}

fn format_into(node: &Node, container: &Container, out: &mut String) -> Result<(), Error> {
    match node {
        Node::Basic(directive) => format_directive(directive, container, out),
        Node::Constant(literal) => {
            out.push_str(literal);
            Ok(())
        }
        Node::Optional { on_zero, body } => {
            if body.fields_mentioned().iter().all(|&field| field_at_default(container, field)) {
                out.push_str(on_zero);
                Ok(())
            } else {
                format_into(body, container, out)
            }
        }
        Node::Alternatives { primary, alternatives } => {
            format_into(choose_alternative(primary, alternatives, container), container, out)
        }
        Node::Signed {
            body,
            with_plus_sign,
            sign_field,
        } => format_signed(body, *with_plus_sign, *sign_field, container, out),
        Node::Concat(children) => {
            for child in children {
                format_into(child, container, out)?;
            }
            Ok(())
        }
    }
}

/// A field that has no default (e.g. [`FieldId::TimeZoneId`], or a required
/// field that happens to live inside an `Optional`'s body in a hand-built
/// tree) never blocks elision: [`Node::require_all_fields_have_defaults`]
/// already guarantees every *numeric* field in an `Optional` body has one,
/// so this only has to resolve what "at default" means for a populated vs.
/// unset field.
fn field_at_default(container: &Container, field: FieldId) -> bool {
    if field == FieldId::TimeZoneId {
        return true;
    }
    let default = field
        .default()
        .expect("Optional body fields are required to have a default at build time");
    container.get(field).map_or(true, |value| value == default)
}

/// Picks the branch the formatter should use: the first of `primary`
/// followed by `alternatives`, in order, whose mentioned fields are either
/// populated or backed by a default, breaking ties toward the earliest
/// branch with the most populated fields. Falls back to `primary` if none
/// qualify, so formatting still reports a sensible missing-field error.
fn choose_alternative<'a>(primary: &'a Node, alternatives: &'a [Node], container: &Container) -> &'a Node {
    let mut satisfied = core::iter::once(primary)
        .chain(alternatives.iter())
        .filter(|node| node.requirements_satisfied(container));

    let Some(mut best) = satisfied.next() else {
        return primary;
    };
    let mut best_score = best.populated_requirement_count(container);
    for candidate in satisfied {
        let score = candidate.populated_requirement_count(container);
        if score > best_score {
            best = candidate;
            best_score = score;
        }
    }
    best
}

fn format_signed(
    body: &Node,
    with_plus_sign: bool,
    sign_field: FieldId,
    container: &Container,
    out: &mut String,
) -> Result<(), Error> {
    let is_negative = container.get_or_default(sign_field)? != 0;
    if is_negative {
        out.push('-');
    } else if with_plus_sign {
        out.push('+');
    }
    format_into(body, container, out)
}

fn format_directive(directive: &Directive, container: &Container, out: &mut String) -> Result<(), Error> {
    match directive {
        Directive::Unsigned { field, padding } => {
            let value = container.get_or_default(*field)?;
            format_padded(value, *padding, out);
            Ok(())
        }
        Directive::SignedYear { padding } => {
            let value = container.get_or_default(FieldId::Year)?;
            format_signed_year(value, padding.width(), out);
            Ok(())
        }
        Directive::ReducedYear { base } => {
            let value = container.get_or_default(FieldId::Year)?;
            format_reduced_year(value, *base, out);
            Ok(())
        }
        Directive::DecimalFraction { min_length, max_length } => {
            let nanos = container.get_or_default(FieldId::Nanosecond)?;
            format_decimal_fraction(nanos, *min_length, *max_length, out);
            Ok(())
        }
        Directive::NamedEnum { field, names } => {
            let value = container.get_or_default(*field)?;
            format_named_enum(*field, value, names, out)
        }
        Directive::AmPmMarker { names } => {
            let value = container.get_or_default(FieldId::AmPm)?;
            out.push_str(if value == 0 { &names.0 } else { &names.1 });
            Ok(())
        }
        Directive::TimeZoneId => {
            let id = container.zone_id().ok_or(Error::MissingField(FieldId::TimeZoneId))?;
            out.push_str(id);
            Ok(())
        }
    }
}

fn format_named_enum(field: FieldId, value: i64, names: &NameList, out: &mut String) -> Result<(), Error> {
    let name = names.by_index(value).ok_or(Error::FieldValue { field, value })?;
    out.push_str(name);
    Ok(())
}

fn format_padded(value: i64, padding: Padding, out: &mut String) {
    match padding {
        Padding::None => {
            let _ = write!(out, "{value}");
        }
        Padding::Zero(width) => {
            let _ = write!(out, "{value:0width$}");
        }
        Padding::Space(width) => {
            let _ = write!(out, "{value:>width$}");
        }
    }
}

fn digit_count(mut magnitude: u64) -> usize {
    if magnitude == 0 {
        return 1;
    }
    let mut count = 0;
    while magnitude > 0 {
        magnitude /= 10;
        count += 1;
    }
    count
}

fn format_signed_year(value: i64, width: usize, out: &mut String) {
    let magnitude = value.unsigned_abs();
    if digit_count(magnitude) > width {
        out.push(if value < 0 { '-' } else { '+' });
        let _ = write!(out, "{magnitude}");
    } else {
        if value < 0 {
            out.push('-');
        }
        let _ = write!(out, "{magnitude:0width$}");
    }
}

fn format_reduced_year(value: i64, base: i64, out: &mut String) {
    if value >= base && value <= base + 99 {
        let _ = write!(out, "{:02}", value.rem_euclid(100));
    } else {
        out.push(if value < 0 { '-' } else { '+' });
        let _ = write!(out, "{}", value.unsigned_abs());
    }
}

/// Rounds `nanos` to `length` significant digits (half-up, saturating
/// rather than carrying past `length` nines).
fn round_nanos_to_length(nanos: i64, length: usize) -> i64 {
    if length >= 9 {
        return nanos;
    }
    let divisor = 10i64.pow((9 - length) as u32);
    let max_value = 10i64.pow(length as u32) - 1;
    ((nanos + divisor / 2) / divisor).min(max_value)
}

fn format_decimal_fraction(nanos: i64, min_length: Option<usize>, max_length: usize, out: &mut String) {
    let rounded = round_nanos_to_length(nanos, max_length);
    let mut full = String::new();
    let _ = write!(full, "{rounded:0max_length$}");
    let exact_len = full.trim_end_matches('0').len().max(1);

    let emit_len = match min_length {
        Some(min) => exact_len.clamp(min.min(max_length), max_length),
        None => {
            let mut len = exact_len;
            while len % 3 != 0 && len < max_length {
                len += 1;
            }
            len
        }
    };
    out.push_str(&full[..emit_len]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NameList;

    #[test]
    fn formats_zero_padded_unsigned() {
        let mut c = Container::new();
        c.set(FieldId::Minute, 7);
        let node = Node::Basic(Directive::Unsigned {
            field: FieldId::Minute,
            padding: Padding::Zero(2),
        });
        assert_eq!(format(&node, &c).unwrap(), "07");
    }

    #[test]
    fn formats_signed_year_within_width() {
        let mut c = Container::new();
        c.set(FieldId::Year, 1993);
        let node = Node::Basic(Directive::SignedYear { padding: Padding::Zero(4) });
        assert_eq!(format(&node, &c).unwrap(), "1993");
    }

    #[test]
    fn formats_signed_year_beyond_width_with_mandatory_sign() {
        let mut c = Container::new();
        c.set(FieldId::Year, 12345);
        let node = Node::Basic(Directive::SignedYear { padding: Padding::Zero(4) });
        assert_eq!(format(&node, &c).unwrap(), "+12345");

        c.set(FieldId::Year, -12345);
        let node = Node::Basic(Directive::SignedYear { padding: Padding::Zero(4) });
        assert_eq!(format(&node, &c).unwrap(), "-12345");
    }

    #[test]
    fn formats_reduced_year_inside_and_outside_window() {
        let mut c = Container::new();
        c.set(FieldId::Year, 1993);
        let node = Node::Basic(Directive::ReducedYear { base: 1960 });
        assert_eq!(format(&node, &c).unwrap(), "93");

        c.set(FieldId::Year, 2061);
        assert_eq!(format(&node, &c).unwrap(), "+2061");
    }

    #[test]
    fn formats_decimal_fraction_trimmed_to_multiple_of_three() {
        let mut c = Container::new();
        c.set(FieldId::Nanosecond, 100_000_000);
        let node = Node::Basic(Directive::DecimalFraction {
            min_length: None,
            max_length: 9,
        });
        assert_eq!(format(&node, &c).unwrap(), "100");
    }

    #[test]
    fn formats_decimal_fraction_with_explicit_minimum() {
        let mut c = Container::new();
        c.set(FieldId::Nanosecond, 500_000_000);
        let node = Node::Basic(Directive::DecimalFraction {
            min_length: Some(0),
            max_length: 9,
        });
        assert_eq!(format(&node, &c).unwrap(), "5");
    }

    #[test]
    fn optional_elides_when_fields_at_default() {
        let c = Container::new();
        let body = Node::Basic(Directive::Unsigned {
            field: FieldId::Second,
            padding: Padding::Zero(2),
        });
        let node = Node::Optional {
            on_zero: String::new(),
            body: alloc::boxed::Box::new(body),
        };
        assert_eq!(format(&node, &c).unwrap(), "");
    }

    #[test]
    fn optional_emits_body_when_field_is_not_default() {
        let mut c = Container::new();
        c.set(FieldId::Second, 30);
        let body = Node::Basic(Directive::Unsigned {
            field: FieldId::Second,
            padding: Padding::Zero(2),
        });
        let node = Node::Optional {
            on_zero: String::new(),
            body: alloc::boxed::Box::new(body),
        };
        assert_eq!(format(&node, &c).unwrap(), "30");
    }

    #[test]
    fn alternatives_prefers_the_branch_with_more_populated_fields() {
        let mut c = Container::new();
        c.set(FieldId::Year, 2024);
        c.set(FieldId::MonthNumber, 3);
        let primary = Node::Concat(alloc::vec![
            Node::Basic(Directive::Unsigned {
                field: FieldId::Year,
                padding: Padding::None,
            }),
            Node::Basic(Directive::Unsigned {
                field: FieldId::MonthNumber,
                padding: Padding::None,
            }),
        ]);
        let alt = Node::Basic(Directive::Unsigned {
            field: FieldId::Year,
            padding: Padding::None,
        });
        let node = Node::Alternatives {
            primary: alloc::boxed::Box::new(primary),
            alternatives: alloc::vec![alt],
        };
        assert_eq!(format(&node, &c).unwrap(), "20243");
    }

    #[test]
    fn named_enum_formats_by_index() {
        let mut c = Container::new();
        c.set(FieldId::MonthNumber, 3);
        let names = NameList::new(alloc::vec![
            "Jan".into(),
            "Feb".into(),
            "Mar".into(),
        ])
        .unwrap();
        let node = Node::Basic(Directive::NamedEnum {
            field: FieldId::MonthNumber,
            names,
        });
        assert_eq!(format(&node, &c).unwrap(), "Mar");
    }

    mod properties {
        use quickcheck_macros::quickcheck;

        use super::*;

        #[quickcheck]
        fn zero_padding_never_emits_fewer_digits_than_requested(value: u32, width_raw: u8) -> bool {
            let width = 1 + usize::from(width_raw % 6);
            let mut out = String::new();
            format_padded(i64::from(value % 1_000_000), Padding::Zero(width), &mut out);
            out.len() >= width
        }
    }
}
