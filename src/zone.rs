//! The time-zone identifier collaborator.
//!
//! This crate does not embed a tz database: it only needs to know whether a
//! candidate identifier is one the embedding application recognizes, so
//! that the zone-id directive can participate in parsing and `find`. That
//! membership test is a narrow external-collaborator trait, mirroring
//! [`crate::calendar::CalendarOps`].

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// Membership test for time-zone identifiers.
///
/// Implementations decide what counts as a valid identifier; this crate
/// does not interpret the string beyond storing it on the container.
pub trait ZoneIdRegistry {
    /// Whether `candidate` is a recognized zone identifier.
    fn contains(&self, candidate: &str) -> bool;

    /// Iterates over every identifier this registry recognizes.
    fn iter(&self) -> alloc::boxed::Box<dyn Iterator<Item = &str> + '_>;

    /// Finds the longest recognized identifier that is a prefix of `input`,
    /// used by the time-zone-id directive's `consume` during parsing and by
    /// `find`/`findAll`.
    #[must_use]
    fn longest_prefix_match<'a>(&self, input: &'a str) -> Option<&'a str> {
        self.iter()
            .filter(|id| input.starts_with(id))
            .max_by_key(|id| id.len())
            .map(|id| &input[..id.len()])
    }
}

/// A [`ZoneIdRegistry`] backed by a fixed, caller-supplied list of
/// identifiers, sorted longest-first so `find`-style greedy matching prefers
/// the longest valid identifier at a given position.
#[derive(Debug, Clone, Default)]
#[cfg(feature = "alloc")]
pub struct StaticZoneIdRegistry {
    ids: Vec<&'static str>,
}

#[cfg(feature = "alloc")]
impl StaticZoneIdRegistry {
    /// Builds a registry from a fixed set of identifiers.
    #[must_use]
    pub fn new(mut ids: Vec<&'static str>) -> Self {
        ids.sort_unstable_by_key(|s| core::cmp::Reverse(s.len()));
        Self { ids }
    }
}

#[cfg(feature = "alloc")]
impl ZoneIdRegistry for StaticZoneIdRegistry {
    fn contains(&self, candidate: &str) -> bool {
        self.ids.iter().any(|&id| id == candidate)
    }

    fn iter(&self) -> alloc::boxed::Box<dyn Iterator<Item = &str> + '_> {
        alloc::boxed::Box::new(self.ids.iter().copied())
    }
}
