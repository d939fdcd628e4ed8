//! The field container: a flat record of nullable field values threaded
//! through formatting, parsing and finalisation.

#[cfg(feature = "alloc")]
use alloc::string::String;

use crate::error::Error;
use crate::field::FieldId;

const NUM_NUMERIC_FIELDS: usize = 15;

fn slot(field: FieldId) -> usize {
    match field {
        FieldId::Year => 0,
        FieldId::MonthNumber => 1,
        FieldId::DayOfMonth => 2,
        FieldId::DayOfYear => 3,
        FieldId::IsoDayOfWeek => 4,
        FieldId::Hour => 5,
        FieldId::HourOfAmPm => 6,
        FieldId::AmPm => 7,
        FieldId::Minute => 8,
        FieldId::Second => 9,
        FieldId::Nanosecond => 10,
        FieldId::OffsetIsNegative => 11,
        FieldId::OffsetTotalHoursAbs => 12,
        FieldId::OffsetMinutesOfHour => 13,
        FieldId::OffsetSecondsOfMinute => 14,
        FieldId::TimeZoneId => unreachable!("time zone id is stored separately"),
    }
}

/// A flat record of nullable field values.
///
/// Every numeric [`FieldId`] maps to one `Option<i64>` slot; [`FieldId::TimeZoneId`]
/// is stored separately as an owned string. Formatting reads from a
/// container that some caller has populated; parsing writes into one that
/// starts out entirely empty; finalisation reads one back out into a typed
/// value, applying field defaults and strict-range checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Container {
    numeric: [Option<i64>; NUM_NUMERIC_FIELDS],
    #[cfg(feature = "alloc")]
    zone_id: Option<String>,
}

impl Container {
    /// Returns an empty container with every field unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a numeric field, or `None` if it is unset.
    ///
    /// # Panics
    ///
    /// Panics for [`FieldId::TimeZoneId`]; use [`Container::zone_id`] instead.
    #[must_use]
    pub fn get(&self, field: FieldId) -> Option<i64> {
        self.numeric[slot(field)]
    }

    /// Unconditionally overwrites a numeric field. Used by formatting and by
    /// finalisation-adjacent callers that already know the value is in
    /// range.
    ///
    /// # Panics
    ///
    /// Panics for [`FieldId::TimeZoneId`]; use [`Container::set_zone_id`] instead.
    pub fn set(&mut self, field: FieldId, value: i64) {
        self.numeric[slot(field)] = Some(value);
    }

    /// Attempts to record a value parsed for `field`.
    ///
    /// Applies the field's *lax* assignment range (see [`crate::field::FieldSpec`]),
    /// not its strict range: a two-digit year directive may lay down `-1` or
    /// `147` momentarily, which finalisation will reject later if the whole
    /// value turns out inconsistent. A second assignment to an
    /// already-set field must agree exactly with the first, modeling two
    /// directives in one tree that both mention the same field (e.g. day of
    /// week appearing in two alternative branches).
    ///
    /// # Errors
    ///
    /// Returns [`Error::FieldValue`] if `value` falls outside the field's
    /// lax range, or [`Error::InconsistentFields`] if `field` was already
    /// set to a different value.
    pub fn try_set_lax(&mut self, field: FieldId, value: i64) -> Result<(), Error> {
        let spec = field.spec();
        let (min, max) = spec.assign_range;
        if value < min || value > max {
            return Err(Error::FieldValue { field, value });
        }
        let idx = slot(field);
        match self.numeric[idx] {
            Some(existing) if existing != value => {
                Err(Error::InconsistentFields("conflicting value for the same field"))
            }
            _ => {
                self.numeric[idx] = Some(value);
                Ok(())
            }
        }
    }

    /// Returns the zone identifier field, if set.
    #[cfg(feature = "alloc")]
    #[must_use]
    pub fn zone_id(&self) -> Option<&str> {
        self.zone_id.as_deref()
    }

    /// Sets the zone identifier field.
    #[cfg(feature = "alloc")]
    pub fn set_zone_id(&mut self, id: String) {
        self.zone_id = Some(id);
    }

    /// Reads a field, falling back to its declared default.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingField`] if the field is unset and has no
    /// default.
    pub fn get_or_default(&self, field: FieldId) -> Result<i64, Error> {
        match self.get(field) {
            Some(v) => Ok(v),
            None => field.default().ok_or(Error::MissingField(field)),
        }
    }

    /// Validates a field against its strict range, applying its default if
    /// unset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingField`] if unset with no default, or
    /// [`Error::FieldValue`] if the resolved value lies outside the field's
    /// strict range.
    pub fn finalize_field(&self, field: FieldId) -> Result<i64, Error> {
        let value = self.get_or_default(field)?;
        let (min, max) = field.spec().strict_range;
        if value < min || value > max {
            return Err(Error::FieldValue { field, value });
        }
        Ok(value)
    }

    /// Returns the signed magnitude of an offset component, combining it
    /// with its shared sign carrier per [`crate::field::FieldSpec::sign_carrier`].
    ///
    /// # Errors
    ///
    /// Propagates [`Container::finalize_field`] errors for both `field` and
    /// its sign carrier.
    pub fn finalize_signed(&self, field: FieldId) -> Result<i64, Error> {
        let magnitude = self.finalize_field(field)?;
        let carrier = field
            .spec()
            .sign_carrier
            .expect("finalize_signed called on a field without a sign carrier");
        let is_negative = self.finalize_field(carrier)? != 0;
        Ok(if is_negative { -magnitude } else { magnitude })
    }

    /// True if every field named in `fields` is set.
    #[must_use]
    pub fn has_all(&self, fields: &[FieldId]) -> bool {
        fields.iter().all(|&f| self.get(f).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lax_range_accepts_two_digit_overshoot() {
        let mut c = Container::new();
        assert!(c.try_set_lax(FieldId::DayOfMonth, 47).is_ok());
        assert_eq!(c.get(FieldId::DayOfMonth), Some(47));
    }

    #[test]
    fn lax_range_rejects_out_of_bounds() {
        let mut c = Container::new();
        assert_eq!(
            c.try_set_lax(FieldId::DayOfMonth, 147),
            Err(Error::FieldValue {
                field: FieldId::DayOfMonth,
                value: 147
            })
        );
    }

    #[test]
    fn conflicting_assignment_is_rejected() {
        let mut c = Container::new();
        c.try_set_lax(FieldId::Hour, 5).unwrap();
        assert!(c.try_set_lax(FieldId::Hour, 6).is_err());
        assert!(c.try_set_lax(FieldId::Hour, 5).is_ok());
    }

    #[test]
    fn finalize_field_rejects_out_of_strict_range() {
        let mut c = Container::new();
        c.try_set_lax(FieldId::DayOfMonth, 47).unwrap();
        assert!(c.finalize_field(FieldId::DayOfMonth).is_err());
    }

    #[test]
    fn finalize_field_applies_default() {
        let c = Container::new();
        assert_eq!(c.finalize_field(FieldId::Second), Ok(0));
    }

    #[test]
    fn finalize_signed_combines_magnitude_and_carrier() {
        let mut c = Container::new();
        c.set(FieldId::OffsetIsNegative, 1);
        c.set(FieldId::OffsetTotalHoursAbs, 5);
        assert_eq!(c.finalize_signed(FieldId::OffsetTotalHoursAbs), Ok(-5));
    }
}
