//! The format tree: the shared intermediate representation walked by both
//! the formatter and the parser.

#[cfg(feature = "alloc")]
use alloc::string::String;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use crate::error::BuildErrorKind;
use crate::field::FieldId;

/// How a numeric directive pads its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Padding {
    /// Emit the minimum number of digits needed (at least one).
    None,
    /// Zero-pad on the left to `width` digits.
    Zero(usize),
    /// Space-pad on the left to `width` characters.
    Space(usize),
}

impl Padding {
    /// The width this padding pads to, or `1` for [`Padding::None`].
    #[must_use]
    pub fn width(self) -> usize {
        match self {
            Padding::None => 1,
            Padding::Zero(w) | Padding::Space(w) => w,
        }
    }
}

/// A validated, duplicate-free, non-empty-entry list of names for a named
/// directive (month names, weekday names, AM/PM markers).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameList {
    names: Vec<String>,
}

impl NameList {
    /// Builds a name list, rejecting duplicates and empty entries.
    ///
    /// # Errors
    ///
    /// Returns [`BuildErrorKind::EmptyName`] if any entry is empty, or
    /// [`BuildErrorKind::DuplicateName`] if two entries are equal.
    pub fn new(names: Vec<String>) -> Result<Self, BuildErrorKind> {
        for (i, name) in names.iter().enumerate() {
            if name.is_empty() {
                return Err(BuildErrorKind::EmptyName);
            }
            if names[..i].iter().any(|other| other == name) {
                return Err(BuildErrorKind::DuplicateName(name.clone()));
            }
        }
        Ok(Self { names })
    }

    /// The name at 1-based `index` (`1` is the first name), if in range.
    #[must_use]
    pub fn by_index(&self, index: i64) -> Option<&str> {
        if index < 1 {
            return None;
        }
        self.names.get((index - 1) as usize).map(String::as_str)
    }

    /// Finds the longest name that is a prefix of `input`, returning its
    /// 1-based index and byte length.
    #[must_use]
    pub fn longest_prefix_match(&self, input: &str) -> Option<(i64, usize)> {
        self.names
            .iter()
            .enumerate()
            .filter(|(_, name)| input.starts_with(name.as_str()))
            .max_by_key(|(_, name)| name.len())
            .map(|(i, name)| ((i + 1) as i64, name.len()))
    }
}

/// A leaf of the format tree that handles one field, or a closely bound
/// field set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// A directive emitting/consuming a non-negative integer field with no
    /// sign character (month, day, hour, minute, second, day-of-year, ISO
    /// day of week).
    Unsigned {
        /// The field this directive reads or writes.
        field: FieldId,
        /// Output padding.
        padding: Padding,
    },
    /// The full proleptic-year directive: emits a mandatory leading sign
    /// once the magnitude exceeds the padded width.
    SignedYear {
        /// Output padding.
        padding: Padding,
    },
    /// A two-digit reduced-year directive with the given window base; years
    /// outside `[base, base + 99]` fall back to a signed full year.
    ReducedYear {
        /// Lower bound of the 100-year window.
        base: i64,
    },
    /// The fraction-of-a-second directive, over [`FieldId::Nanosecond`].
    DecimalFraction {
        /// Minimum digits to emit; `None` emits the fewest multiple of
        /// three.
        min_length: Option<usize>,
        /// Maximum digits to emit or accept while parsing.
        max_length: usize,
    },
    /// A named-enum directive (month name, weekday name) over a field whose
    /// strict range starts at 1.
    NamedEnum {
        /// The field this directive reads or writes.
        field: FieldId,
        /// The names, indexed by the field's 1-based value.
        names: NameList,
    },
    /// The AM/PM marker directive, over [`FieldId::AmPm`].
    AmPmMarker {
        /// `(am_name, pm_name)`.
        names: (String, String),
    },
    /// The time-zone identifier directive.
    TimeZoneId,
}

impl Directive {
    /// The fields this directive reads or writes.
    #[must_use]
    pub fn fields(&self) -> Vec<FieldId> {
        match self {
            Directive::Unsigned { field, .. } | Directive::NamedEnum { field, .. } => {
                alloc::vec![*field]
            }
            Directive::SignedYear { .. } | Directive::ReducedYear { .. } => {
                alloc::vec![FieldId::Year]
            }
            Directive::DecimalFraction { .. } => alloc::vec![FieldId::Nanosecond],
            Directive::AmPmMarker { .. } => alloc::vec![FieldId::AmPm],
            Directive::TimeZoneId => alloc::vec![FieldId::TimeZoneId],
        }
    }
}

/// One node of the format tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A directive leaf.
    Basic(Directive),
    /// A fixed literal string.
    Constant(String),
    /// Emitted as `on_zero` when every field `body` mentions equals its
    /// default; otherwise emits/consumes `body`. Accepts either during
    /// parsing.
    Optional {
        /// Literal emitted when `body`'s fields are all at their defaults.
        on_zero: String,
        /// The elided sub-tree.
        body: alloc::boxed::Box<Node>,
    },
    /// `primary` is used for formatting when its requirements can't be beaten
    /// by a more specific alternative; all branches are tried in order
    /// while parsing.
    Alternatives {
        /// The branch used for formatting by default.
        primary: alloc::boxed::Box<Node>,
        /// Additional branches, each a subset of `primary`'s fields.
        alternatives: Vec<Node>,
    },
    /// Defers a single sign to `body`'s shared-sign field.
    Signed {
        /// The sub-tree whose numeric directives share one sign.
        body: alloc::boxed::Box<Node>,
        /// Whether a non-negative value still emits a leading `+`.
        with_plus_sign: bool,
        /// The field carrying the shared sign flag.
        sign_field: FieldId,
    },
    /// Sequential composition, flattened at build time (no nested `Concat`
    /// after going through [`Node::concat`]).
    Concat(Vec<Node>),
}

impl Node {
    /// Builds a flattened [`Node::Concat`], splicing any direct `Concat`
    /// children into this one rather than nesting.
    #[must_use]
    pub fn concat(children: Vec<Node>) -> Node {
        let mut flat = Vec::with_capacity(children.len());
        for child in children {
            match child {
                Node::Concat(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        if flat.len() == 1 {
            flat.into_iter().next().expect("len checked above")
        } else {
            Node::Concat(flat)
        }
    }

    /// All fields this node (including its descendants) reads or writes, in
    /// left-to-right traversal order.
    #[must_use]
    pub fn fields_mentioned(&self) -> Vec<FieldId> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields(&self, out: &mut Vec<FieldId>) {
        match self {
            Node::Basic(directive) => out.extend(directive.fields()),
            Node::Constant(_) => {}
            Node::Optional { body, .. } => body.collect_fields(out),
            Node::Alternatives {
                primary,
                alternatives,
            } => {
                primary.collect_fields(out);
                for alt in alternatives {
                    alt.collect_fields(out);
                }
            }
            Node::Signed { body, .. } => body.collect_fields(out),
            Node::Concat(children) => {
                for child in children {
                    child.collect_fields(out);
                }
            }
        }
    }

    /// Validates that every field `self` mentions has a declared default,
    /// as required for the body of an `Optional` node.
    ///
    /// # Errors
    ///
    /// Returns [`BuildErrorKind::OptionalFieldWithoutDefault`] for the first
    /// offending field found.
    pub fn require_all_fields_have_defaults(&self) -> Result<(), BuildErrorKind> {
        for field in self.fields_mentioned() {
            if field != FieldId::TimeZoneId && field.default().is_none() {
                return Err(BuildErrorKind::OptionalFieldWithoutDefault(field));
            }
        }
        Ok(())
    }

    /// Validates that every field an alternative branch mentions is either
    /// mentioned by `primary` or has a declared default.
    ///
    /// # Errors
    ///
    /// Returns [`BuildErrorKind::AlternativeFieldMismatch`] for the first
    /// offending field found.
    pub fn require_alternative_compatible_with(&self, primary: &Node) -> Result<(), BuildErrorKind> {
        let primary_fields = primary.fields_mentioned();
        for field in self.fields_mentioned() {
            if !primary_fields.contains(&field) && field != FieldId::TimeZoneId && field.default().is_none() {
                return Err(BuildErrorKind::AlternativeFieldMismatch(field));
            }
        }
        Ok(())
    }

    /// Number of fields this node requires (mentions with no default) that
    /// are populated in `container`. Used by the formatter's alternative
    /// selection.
    #[must_use]
    pub fn populated_requirement_count(&self, container: &crate::container::Container) -> usize {
        self.fields_mentioned()
            .iter()
            .filter(|&&f| f != FieldId::TimeZoneId && container.get(f).is_some())
            .count()
    }

    /// Whether every field this node mentions is either populated in
    /// `container` or has a default to fall back on.
    #[must_use]
    pub fn requirements_satisfied(&self, container: &crate::container::Container) -> bool {
        self.fields_mentioned().iter().all(|&f| {
            f == FieldId::TimeZoneId || container.get(f).is_some() || f.default().is_some()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concat_flattens_nested_children() {
        let node = Node::concat(alloc::vec![
            Node::Constant("a".into()),
            Node::concat(alloc::vec![Node::Constant("b".into()), Node::Constant("c".into())]),
        ]);
        match node {
            Node::Concat(children) => assert_eq!(children.len(), 3),
            other => panic!("expected Concat, got {other:?}"),
        }
    }

    #[test]
    fn name_list_rejects_duplicates() {
        assert!(NameList::new(alloc::vec!["Jan".into(), "Jan".into()]).is_err());
    }

    #[test]
    fn name_list_rejects_empty() {
        assert!(NameList::new(alloc::vec!["Jan".into(), "".into()]).is_err());
    }

    #[test]
    fn name_list_longest_prefix_match() {
        let list = NameList::new(alloc::vec!["Mon".into(), "Monday".into()]).unwrap();
        assert_eq!(list.longest_prefix_match("Monday!"), Some((2, 6)));
    }

    #[test]
    fn optional_body_requires_defaults() {
        let body = Node::Basic(Directive::Unsigned {
            field: FieldId::Second,
            padding: Padding::Zero(2),
        });
        assert!(body.require_all_fields_have_defaults().is_ok());

        let bad = Node::Basic(Directive::Unsigned {
            field: FieldId::Hour,
            padding: Padding::Zero(2),
        });
        assert!(bad.require_all_fields_have_defaults().is_err());
    }
}
