//! Field identifiers and their static specifications.
//!
//! A [`FieldId`] names one storage slot on [`crate::Container`]. Its
//! [`FieldSpec`] carries the range, default, and shared-sign information the
//! tree, formatter and parser need without hard-coding any of it inline.

use core::fmt;

/// One named, typed slot on the field container.
///
/// `TimeZoneId` is the one non-numeric field; it is stored separately on the
/// container as an owned string rather than through [`FieldSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum FieldId {
    /// Proleptic ISO year. Unbounded.
    Year,
    /// Month of the year, `1..=12`.
    MonthNumber,
    /// Day of the month, `1..=31`.
    DayOfMonth,
    /// Day of the year, `1..=366`.
    DayOfYear,
    /// ISO day of week, `1..=7` with `1` meaning Monday.
    IsoDayOfWeek,
    /// Hour of the day, `0..=23`.
    Hour,
    /// Hour of the AM/PM half-day, `1..=12`.
    HourOfAmPm,
    /// `0` for AM, `1` for PM.
    AmPm,
    /// Minute of the hour, `0..=59`.
    Minute,
    /// Second of the minute, `0..=59`, defaults to `0`.
    Second,
    /// Nanosecond of the second, `0..=999_999_999`, defaults to `0`.
    Nanosecond,
    /// `1` if the UTC offset is negative, `0` otherwise. Defaults to `0`.
    OffsetIsNegative,
    /// Absolute hour magnitude of a UTC offset, `0..=18`.
    OffsetTotalHoursAbs,
    /// Absolute minute-of-hour magnitude of a UTC offset, `0..=59`, defaults
    /// to `0`.
    OffsetMinutesOfHour,
    /// Absolute second-of-minute magnitude of a UTC offset, `0..=59`,
    /// defaults to `0`.
    OffsetSecondsOfMinute,
    /// Time-zone identifier, drawn from an externally supplied set.
    TimeZoneId,
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldId::Year => "year",
            FieldId::MonthNumber => "monthNumber",
            FieldId::DayOfMonth => "dayOfMonth",
            FieldId::DayOfYear => "dayOfYear",
            FieldId::IsoDayOfWeek => "isoDayOfWeek",
            FieldId::Hour => "hour",
            FieldId::HourOfAmPm => "hourOfAmPm",
            FieldId::AmPm => "amPm",
            FieldId::Minute => "minute",
            FieldId::Second => "second",
            FieldId::Nanosecond => "nanosecond",
            FieldId::OffsetIsNegative => "isNegative",
            FieldId::OffsetTotalHoursAbs => "totalHoursAbs",
            FieldId::OffsetMinutesOfHour => "minutesOfHour",
            FieldId::OffsetSecondsOfMinute => "secondsOfMinute",
            FieldId::TimeZoneId => "timeZoneId",
        };
        f.write_str(name)
    }
}

/// Static specification of a numeric field: its lax assignment range (used
/// while parsing, see [`crate::container::Container::try_set_lax`]), its
/// strict validation range (used at finalisation), its default, and an
/// optional shared-sign carrier field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// The field this spec describes.
    pub id: FieldId,
    /// Inclusive lax range accepted while a parser is accumulating digits.
    pub assign_range: (i64, i64),
    /// Inclusive strict range enforced when finalising into a validated
    /// value.
    pub strict_range: (i64, i64),
    /// Default used by `Optional`/`Alternatives` elision logic, and as the
    /// fallback during finalisation.
    pub default: Option<i64>,
    /// For offset magnitude fields, the field carrying their shared sign.
    pub sign_carrier: Option<FieldId>,
}

impl FieldId {
    /// Returns this field's static specification.
    ///
    /// # Panics
    ///
    /// Panics for [`FieldId::TimeZoneId`], which has no numeric
    /// specification; callers must special-case it.
    #[must_use]
    pub fn spec(self) -> FieldSpec {
        match self {
            FieldId::Year => FieldSpec {
                id: self,
                assign_range: (i64::MIN, i64::MAX),
                strict_range: (i64::MIN, i64::MAX),
                default: None,
                sign_carrier: None,
            },
            FieldId::MonthNumber => FieldSpec {
                id: self,
                assign_range: (-99, 99),
                strict_range: (1, 12),
                default: None,
                sign_carrier: None,
            },
            FieldId::DayOfMonth => FieldSpec {
                id: self,
                assign_range: (-99, 99),
                strict_range: (1, 31),
                default: None,
                sign_carrier: None,
            },
            FieldId::DayOfYear => FieldSpec {
                id: self,
                assign_range: (-999, 999),
                strict_range: (1, 366),
                default: None,
                sign_carrier: None,
            },
            FieldId::IsoDayOfWeek => FieldSpec {
                id: self,
                assign_range: (-99, 99),
                strict_range: (1, 7),
                default: None,
                sign_carrier: None,
            },
            FieldId::Hour => FieldSpec {
                id: self,
                assign_range: (-99, 99),
                strict_range: (0, 23),
                default: None,
                sign_carrier: None,
            },
            FieldId::HourOfAmPm => FieldSpec {
                id: self,
                assign_range: (-99, 99),
                strict_range: (1, 12),
                default: None,
                sign_carrier: None,
            },
            FieldId::AmPm => FieldSpec {
                id: self,
                assign_range: (0, 1),
                strict_range: (0, 1),
                default: None,
                sign_carrier: None,
            },
            FieldId::Minute => FieldSpec {
                id: self,
                assign_range: (-99, 99),
                strict_range: (0, 59),
                default: None,
                sign_carrier: None,
            },
            FieldId::Second => FieldSpec {
                id: self,
                assign_range: (-99, 99),
                strict_range: (0, 59),
                default: Some(0),
                sign_carrier: None,
            },
            FieldId::Nanosecond => FieldSpec {
                id: self,
                assign_range: (-999_999_999, 999_999_999),
                strict_range: (0, 999_999_999),
                default: Some(0),
                sign_carrier: None,
            },
            FieldId::OffsetIsNegative => FieldSpec {
                id: self,
                assign_range: (0, 1),
                strict_range: (0, 1),
                default: Some(0),
                sign_carrier: None,
            },
            FieldId::OffsetTotalHoursAbs => FieldSpec {
                id: self,
                assign_range: (-99, 99),
                strict_range: (0, 18),
                default: None,
                sign_carrier: Some(FieldId::OffsetIsNegative),
            },
            FieldId::OffsetMinutesOfHour => FieldSpec {
                id: self,
                assign_range: (-99, 99),
                strict_range: (0, 59),
                default: Some(0),
                sign_carrier: Some(FieldId::OffsetIsNegative),
            },
            FieldId::OffsetSecondsOfMinute => FieldSpec {
                id: self,
                assign_range: (-99, 99),
                strict_range: (0, 59),
                default: Some(0),
                sign_carrier: Some(FieldId::OffsetIsNegative),
            },
            FieldId::TimeZoneId => panic!("FieldId::TimeZoneId has no numeric FieldSpec"),
        }
    }

    /// The declared default for this field, if any. `None` for
    /// [`FieldId::TimeZoneId`].
    #[must_use]
    pub fn default(self) -> Option<i64> {
        if matches!(self, FieldId::TimeZoneId) {
            None
        } else {
            self.spec().default
        }
    }
}
