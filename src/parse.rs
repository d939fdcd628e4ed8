//! The backtracking parser: a non-deterministic matcher over the format
//! tree that produces every field container consistent with the input,
//! rather than committing to the first interpretation that happens to
//! work.
//!
//! Each node's `consume` step takes a set of candidate `(position,
//! container)` states and returns the set of states reachable by matching
//! that node starting from each of them. A node that rejects every input
//! contributes nothing; `Alternatives` tries every branch and keeps every
//! surviving state; `Optional` forks into "body matched" and "elided"
//! states. The tree never needs to decide up front which branch is
//! correct — the caller narrows the candidate set down by requiring a full
//! match, or, for `find`, the longest match that also finalises.

#[cfg(feature = "alloc")]
use alloc::string::String;
#[cfg(feature = "alloc")]
use alloc::vec;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use crate::container::Container;
use crate::error::{Error, ParseErrorKind};
use crate::field::FieldId;
use crate::tree::{Directive, NameList, Node, Padding};
use crate::zone::ZoneIdRegistry;

/// One candidate interpretation: how far into the input this path has
/// consumed, and the container as filled in by that path so far.
#[derive(Debug, Clone)]
struct ParseState {
    position: usize,
    container: Container,
}

fn consume(node: &Node, input: &str, states: Vec<ParseState>, registry: &dyn ZoneIdRegistry) -> Vec<ParseState> {
    match node {
        Node::Constant(literal) => states
            .into_iter()
            .filter_map(|state| consume_literal(literal, input, state))
            .collect(),
        Node::Basic(directive) => states
            .into_iter()
            .flat_map(|state| consume_directive(directive, input, state, registry))
            .collect(),
        Node::Optional { on_zero, body } => states
            .into_iter()
            .flat_map(|state| consume_optional(on_zero, body, input, state, registry))
            .collect(),
        Node::Alternatives { primary, alternatives } => states
            .into_iter()
            .flat_map(|state| consume_alternatives(primary, alternatives, input, state, registry))
            .collect(),
        Node::Signed { body, sign_field, .. } => states
            .into_iter()
            .flat_map(|state| consume_signed(body, *sign_field, input, state, registry))
            .collect(),
        Node::Concat(children) => {
            let mut current = states;
            for child in children {
                if current.is_empty() {
                    break;
                }
                current = consume(child, input, current, registry);
            }
            current
        }
    }
}

fn consume_literal(literal: &str, input: &str, state: ParseState) -> Option<ParseState> {
    input[state.position..].starts_with(literal).then(|| ParseState {
        position: state.position + literal.len(),
        container: state.container,
    })
}

fn consume_optional(
    on_zero: &str,
    body: &Node,
    input: &str,
    state: ParseState,
    registry: &dyn ZoneIdRegistry,
) -> Vec<ParseState> {
    let mut candidates = consume(body, input, vec![state.clone()], registry);
    if let Some(elided) = consume_literal(on_zero, input, state) {
        candidates.push(elided);
    }
    candidates
}

fn consume_alternatives(
    primary: &Node,
    alternatives: &[Node],
    input: &str,
    state: ParseState,
    registry: &dyn ZoneIdRegistry,
) -> Vec<ParseState> {
    let mut candidates = consume(primary, input, vec![state.clone()], registry);
    for alt in alternatives {
        candidates.extend(consume(alt, input, vec![state.clone()], registry));
    }
    candidates
}

fn consume_signed(
    body: &Node,
    sign_field: FieldId,
    input: &str,
    mut state: ParseState,
    registry: &dyn ZoneIdRegistry,
) -> Vec<ParseState> {
    let (is_negative, advance) = match input[state.position..].as_bytes().first() {
        Some(b'-') => (true, 1),
        Some(b'+') => (false, 1),
        _ => (false, 0),
    };
    state.position += advance;
    if state
        .container
        .try_set_lax(sign_field, i64::from(is_negative))
        .is_err()
    {
        return Vec::new();
    }
    consume(body, input, vec![state], registry)
}

fn consume_directive(
    directive: &Directive,
    input: &str,
    state: ParseState,
    registry: &dyn ZoneIdRegistry,
) -> Vec<ParseState> {
    match directive {
        Directive::Unsigned { field, padding } => consume_unsigned(*field, *padding, input, state),
        Directive::SignedYear { padding } => consume_signed_year(*padding, input, state),
        Directive::ReducedYear { base } => consume_reduced_year(*base, input, state),
        Directive::DecimalFraction { max_length, .. } => consume_decimal_fraction(*max_length, input, state),
        Directive::NamedEnum { field, names } => consume_named_enum(*field, names, input, state),
        Directive::AmPmMarker { names } => consume_am_pm(names, input, state),
        Directive::TimeZoneId => consume_time_zone_id(registry, input, state),
    }
}

/// The run of consecutive ASCII digits starting at `pos`, possibly empty.
fn digit_run(input: &str, pos: usize) -> &str {
    let rest = &input[pos..];
    let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    &rest[..end]
}

/// The maximum digit-run length this parser will ever try to parse as one
/// `i64`, comfortably below `i64::MAX`'s 19 digits.
const MAX_DIGITS: usize = 18;

fn skip_leading_spaces(input: &str, pos: usize, width: usize) -> usize {
    let max_skip = width.saturating_sub(1);
    let mut skipped = 0;
    for c in input[pos..].chars() {
        if c == ' ' && skipped < max_skip {
            skipped += 1;
        } else {
            break;
        }
    }
    pos + skipped
}

fn consume_unsigned(field: FieldId, padding: Padding, input: &str, state: ParseState) -> Vec<ParseState> {
    let digit_start = match padding {
        Padding::Space(width) => skip_leading_spaces(input, state.position, width),
        Padding::None | Padding::Zero(_) => state.position,
    };
    let digits = digit_run(input, digit_start);
    if digits.is_empty() {
        return Vec::new();
    }
    let min_len = match padding {
        Padding::Zero(width) | Padding::Space(width) => width.min(digits.len()),
        Padding::None => 1,
    };
    let max_len = digits.len().min(MAX_DIGITS);

    let mut out = Vec::new();
    for len in min_len.max(1)..=max_len {
        let Ok(value) = digits[..len].parse::<i64>() else {
            continue;
        };
        let mut candidate = state.clone();
        candidate.position = digit_start + len;
        if candidate.container.try_set_lax(field, value).is_ok() {
            out.push(candidate);
        }
    }
    out
}

fn consume_signed_year(padding: Padding, input: &str, state: ParseState) -> Vec<ParseState> {
    let (sign, advance) = match input[state.position..].as_bytes().first() {
        Some(b'-') => (-1i64, 1),
        Some(b'+') => (1i64, 1),
        _ => (1i64, 0),
    };
    let digit_start = state.position + advance;
    let digits = digit_run(input, digit_start);
    if digits.is_empty() {
        return Vec::new();
    }
    let min_len = if advance == 1 { 1 } else { padding.width().min(digits.len()) };
    let max_len = digits.len().min(MAX_DIGITS);

    let mut out = Vec::new();
    for len in min_len.max(1)..=max_len {
        let Ok(magnitude) = digits[..len].parse::<i64>() else {
            continue;
        };
        let mut candidate = state.clone();
        candidate.position = digit_start + len;
        if candidate.container.try_set_lax(FieldId::Year, sign * magnitude).is_ok() {
            out.push(candidate);
        }
    }
    out
}

fn consume_reduced_year(base: i64, input: &str, state: ParseState) -> Vec<ParseState> {
    if matches!(input[state.position..].as_bytes().first(), Some(b'+') | Some(b'-')) {
        return consume_signed_year(Padding::None, input, state);
    }

    let digits = digit_run(input, state.position);
    if digits.len() < 2 {
        return Vec::new();
    }
    let Ok(two_digit_value) = digits[..2].parse::<i64>() else {
        return Vec::new();
    };

    let century = base - base.rem_euclid(100);
    let mut candidate_year = century + two_digit_value;
    if candidate_year < base {
        candidate_year += 100;
    } else if candidate_year > base + 99 {
        candidate_year -= 100;
    }

    let mut candidate = state;
    candidate.position += 2;
    if candidate.container.try_set_lax(FieldId::Year, candidate_year).is_ok() {
        vec![candidate]
    } else {
        Vec::new()
    }
}

fn consume_decimal_fraction(max_length: usize, input: &str, state: ParseState) -> Vec<ParseState> {
    let digits = digit_run(input, state.position);
    let upper = max_length.min(digits.len()).min(9);

    let mut out = Vec::new();
    for len in 1..=upper {
        let Ok(value) = digits[..len].parse::<i64>() else {
            continue;
        };
        let nanos = value * 10i64.pow((9 - len) as u32);
        let mut candidate = state.clone();
        candidate.position = state.position + len;
        if candidate.container.try_set_lax(FieldId::Nanosecond, nanos).is_ok() {
            out.push(candidate);
        }
    }
    out
}

fn consume_named_enum(field: FieldId, names: &NameList, input: &str, state: ParseState) -> Vec<ParseState> {
    match names.longest_prefix_match(&input[state.position..]) {
        Some((index, len)) => {
            let mut candidate = state;
            candidate.position += len;
            if candidate.container.try_set_lax(field, index).is_ok() {
                vec![candidate]
            } else {
                Vec::new()
            }
        }
        None => Vec::new(),
    }
}

fn consume_am_pm(names: &(String, String), input: &str, state: ParseState) -> Vec<ParseState> {
    let rest = &input[state.position..];
    let mut out = Vec::new();
    for (text, value) in [(&names.0, 0i64), (&names.1, 1i64)] {
        if rest.starts_with(text.as_str()) {
            let mut candidate = state.clone();
            candidate.position += text.len();
            if candidate.container.try_set_lax(FieldId::AmPm, value).is_ok() {
                out.push(candidate);
            }
        }
    }
    out
}

fn consume_time_zone_id(registry: &dyn ZoneIdRegistry, input: &str, state: ParseState) -> Vec<ParseState> {
    match registry.longest_prefix_match(&input[state.position..]) {
        Some(matched) => {
            let mut candidate = state;
            candidate.position += matched.len();
            #[cfg(feature = "alloc")]
            candidate.container.set_zone_id(String::from(matched));
            vec![candidate]
        }
        None => Vec::new(),
    }
}

/// Parses the entire `input` through `node`, requiring a state that
/// consumed every byte.
///
/// # Errors
///
/// Returns [`Error::Parse`] with [`ParseErrorKind::NoMatch`] if no branch
/// accepted any prefix, or [`ParseErrorKind::TrailingInput`] if the
/// greediest accepted prefix stopped short of the end of input.
pub fn parse_full(node: &Node, input: &str, registry: &dyn ZoneIdRegistry) -> Result<Container, Error> {
    let initial = ParseState {
        position: 0,
        container: Container::new(),
    };
    let candidates = consume(node, input, vec![initial], registry);
    if candidates.is_empty() {
        return Err(Error::Parse(ParseErrorKind::NoMatch));
    }
    if let Some(full) = candidates.iter().find(|state| state.position == input.len()) {
        return Ok(full.container.clone());
    }
    let furthest = candidates
        .iter()
        .map(|state| state.position)
        .max()
        .expect("candidates is non-empty");
    Err(Error::Parse(ParseErrorKind::TrailingInput {
        remaining: input.len() - furthest,
    }))
}

fn node_begins_numeric(node: &Node) -> bool {
    match node {
        Node::Basic(directive) => matches!(
            directive,
            Directive::Unsigned { .. }
                | Directive::SignedYear { .. }
                | Directive::ReducedYear { .. }
                | Directive::DecimalFraction { .. }
        ),
        Node::Constant(_) => false,
        Node::Optional { body, .. } | Node::Signed { body, .. } => node_begins_numeric(body),
        Node::Alternatives { primary, .. } => node_begins_numeric(primary),
        Node::Concat(children) => children.first().is_some_and(node_begins_numeric),
    }
}

pub(crate) fn next_char_len(input: &str, pos: usize) -> usize {
    input[pos..].chars().next().map_or(1, char::len_utf8)
}

fn preceded_by_digit(input: &str, pos: usize) -> bool {
    input[..pos].chars().next_back().is_some_and(|c| c.is_ascii_digit())
}

/// Searches `input` from byte offset `start` for the first substring that
/// matches `node` and that `finalize` accepts, returning its byte span and
/// finalised value.
///
/// If `node` begins with a numeric directive, a candidate starting position
/// other than `start` itself is skipped when the character immediately
/// before it is a digit, so a `find` for a two-digit directive does not
/// carve a match out of the middle of a longer run of digits.
#[must_use]
pub fn find<T>(
    node: &Node,
    input: &str,
    start: usize,
    registry: &dyn ZoneIdRegistry,
    finalize: &dyn Fn(&Container) -> Result<T, Error>,
) -> Option<(usize, usize, T)> {
    let begins_numeric = node_begins_numeric(node);
    let mut pos = start;
    while pos <= input.len() {
        if input.is_char_boundary(pos) {
            let allowed = pos == start || !begins_numeric || !preceded_by_digit(input, pos);
            if allowed {
                let initial = ParseState {
                    position: pos,
                    container: Container::new(),
                };
                let candidates = consume(node, input, vec![initial], registry);
                if let Some(best) = candidates.iter().max_by_key(|state| state.position) {
                    if let Ok(value) = finalize(&best.container) {
                        return Some((pos, best.position, value));
                    }
                }
            }
        }
        if pos == input.len() {
            break;
        }
        pos += next_char_len(input, pos);
    }
    None
}

/// Iterates every non-overlapping match of `node` in `input`, in order,
/// resuming each search right after the previous match's end (or one
/// character past its start, for a zero-length match).
pub fn find_all<'a, T, R>(
    node: &'a Node,
    input: &'a str,
    registry: R,
    finalize: impl Fn(&Container) -> Result<T, Error> + 'a,
) -> impl Iterator<Item = (usize, usize, T)> + 'a
where
    R: ZoneIdRegistry + 'a,
{
    let mut next_start = Some(0usize);
    core::iter::from_fn(move || {
        let start = next_start?;
        if start > input.len() {
            next_start = None;
            return None;
        }
        let (match_start, match_end, value) = find(node, input, start, &registry, &finalize)?;
        next_start = Some(if match_end > match_start {
            match_end
        } else {
            match_end + next_char_len(input, match_end)
        });
        Some((match_start, match_end, value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zone::StaticZoneIdRegistry;

    fn empty_registry() -> StaticZoneIdRegistry {
        StaticZoneIdRegistry::new(Vec::new())
    }

    #[test]
    fn full_match_parses_literal_and_directive() {
        let node = Node::concat(vec![
            Node::Basic(Directive::Unsigned {
                field: FieldId::Hour,
                padding: Padding::Zero(2),
            }),
            Node::Constant(":".into()),
            Node::Basic(Directive::Unsigned {
                field: FieldId::Minute,
                padding: Padding::Zero(2),
            }),
        ]);
        let container = parse_full(&node, "09:30", &empty_registry()).unwrap();
        assert_eq!(container.get(FieldId::Hour), Some(9));
        assert_eq!(container.get(FieldId::Minute), Some(30));
    }

    #[test]
    fn full_match_tolerates_extra_leading_zeros() {
        let node = Node::Basic(Directive::Unsigned {
            field: FieldId::Minute,
            padding: Padding::Zero(2),
        });
        let container = parse_full(&node, "007", &empty_registry());
        assert_eq!(container.unwrap().get(FieldId::Minute), Some(7));
    }

    #[test]
    fn trailing_input_is_reported() {
        let node = Node::Constant("ab".into());
        let err = parse_full(&node, "abc", &empty_registry()).unwrap_err();
        assert_eq!(err, Error::Parse(ParseErrorKind::TrailingInput { remaining: 1 }));
    }

    #[test]
    fn no_match_is_reported() {
        let node = Node::Constant("ab".into());
        let err = parse_full(&node, "xy", &empty_registry()).unwrap_err();
        assert_eq!(err, Error::Parse(ParseErrorKind::NoMatch));
    }

    #[test]
    fn reduced_year_recovers_the_window() {
        let node = Node::Basic(Directive::ReducedYear { base: 1960 });
        let c = parse_full(&node, "93", &empty_registry()).unwrap();
        assert_eq!(c.get(FieldId::Year), Some(1993));

        let c = parse_full(&node, "59", &empty_registry()).unwrap();
        assert_eq!(c.get(FieldId::Year), Some(2059));
    }

    #[test]
    fn decimal_fraction_normalises_to_nine_digit_nanos() {
        let node = Node::Basic(Directive::DecimalFraction {
            min_length: None,
            max_length: 9,
        });
        let c = parse_full(&node, "5", &empty_registry()).unwrap();
        assert_eq!(c.get(FieldId::Nanosecond), Some(500_000_000));
    }

    #[test]
    fn decimal_fraction_caps_consumption_at_max_length() {
        let node = Node::concat(vec![
            Node::Basic(Directive::DecimalFraction {
                min_length: None,
                max_length: 3,
            }),
            Node::Constant("X".into()),
        ]);
        // 4 digits, but max_length = 3: the fourth digit must be left for
        // the literal "X" to match, so parsing the full "123X" succeeds.
        let c = parse_full(&node, "123X", &empty_registry()).unwrap();
        assert_eq!(c.get(FieldId::Nanosecond), Some(123_000_000));
    }

    #[test]
    fn find_skips_matches_preceded_by_a_digit() {
        let node = Node::concat(vec![
            Node::Basic(Directive::Unsigned {
                field: FieldId::Hour,
                padding: Padding::Zero(2),
            }),
            Node::Constant(":".into()),
            Node::Basic(Directive::Unsigned {
                field: FieldId::Minute,
                padding: Padding::Zero(2),
            }),
        ]);
        let found = find(
            &node,
            "987654321:00",
            0,
            &empty_registry(),
            &|c: &Container| -> Result<(i64, i64), Error> {
                Ok((
                    c.finalize_field(FieldId::Hour)?,
                    c.finalize_field(FieldId::Minute)?,
                ))
            },
        );
        assert!(found.is_none());
    }

    #[test]
    fn find_all_returns_non_overlapping_matches_in_order() {
        let node = Node::Basic(Directive::Unsigned {
            field: FieldId::DayOfMonth,
            padding: Padding::Zero(2),
        });
        let matches: Vec<_> = find_all(&node, "12 and 25", empty_registry(), |c: &Container| {
            c.finalize_field(FieldId::DayOfMonth)
        })
        .collect();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].2, 12);
        assert_eq!(matches[1].2, 25);
    }
}
