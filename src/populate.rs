//! Bridges from validated value types into a field [`Container`], the
//! inverse direction of the routines in [`crate::finalize`].
//!
//! Formatting a value always goes through one of these first: the tree
//! itself only ever reads a container, never a [`LocalDate`] or an
//! [`Instant`] directly.

#[cfg(feature = "alloc")]
use alloc::string::String;

use crate::calendar::CalendarOps;
use crate::container::Container;
use crate::field::FieldId;
use crate::value::{AmPm, Instant, LocalDate, LocalDateTime, LocalTime, UtcOffset, YearMonth};

/// Sets year, month and day from `date`.
pub fn populate_date(container: &mut Container, date: LocalDate) {
    container.set(FieldId::Year, date.year());
    container.set(FieldId::MonthNumber, date.month());
    container.set(FieldId::DayOfMonth, date.day());
}

/// Sets year, month, day, day-of-year and ISO day of week from `date`,
/// deriving the latter two through `calendar`.
pub fn populate_date_with_calendar(container: &mut Container, date: LocalDate, calendar: &dyn CalendarOps) {
    populate_date(container, date);
    container.set(
        FieldId::DayOfYear,
        calendar.day_of_year(date.year(), date.month(), date.day()),
    );
    container.set(
        FieldId::IsoDayOfWeek,
        calendar.iso_day_of_week(date.year(), date.month(), date.day()),
    );
}

/// Sets year and month from `year_month`.
pub fn populate_year_month(container: &mut Container, year_month: YearMonth) {
    container.set(FieldId::Year, year_month.year());
    container.set(FieldId::MonthNumber, year_month.month());
}

/// Sets hour, hour-of-am/pm, am/pm, minute, second and nanosecond from
/// `time`.
pub fn populate_time(container: &mut Container, time: LocalTime) {
    container.set(FieldId::Hour, time.hour());
    let hour_of_am_pm = if time.hour() % 12 == 0 { 12 } else { time.hour() % 12 };
    container.set(FieldId::HourOfAmPm, hour_of_am_pm);
    container.set(FieldId::AmPm, AmPm::from_hour24(time.hour()).to_field_value());
    container.set(FieldId::Minute, time.minute());
    container.set(FieldId::Second, time.second());
    container.set(FieldId::Nanosecond, time.nanosecond());
}

/// Sets every field [`populate_date`] and [`populate_time`] set.
pub fn populate_date_time(container: &mut Container, date_time: LocalDateTime) {
    populate_date(container, date_time.date());
    populate_time(container, date_time.time());
}

/// Sets the offset magnitude and sign fields from `offset`.
///
/// When `offset` is exactly zero, every offset field is left **unset**
/// rather than set to `0`. [`FieldId::OffsetTotalHoursAbs`] has no declared
/// default, so an `Alternatives` node built with a numeric primary branch
/// and a literal `Z`/`z` alternative will find the primary branch's
/// requirements unsatisfied in that case and fall through to the
/// alternative — which is exactly the "`Z`/`z` on zero" behaviour the ISO
/// offset predefined formats need. A tree with no such alternative (the
/// four-digit offset format, or a hand-built format with no `Z` branch)
/// requires the hour field regardless, so it correctly reports
/// [`crate::error::Error::MissingField`] rather than silently printing
/// nothing for a zero offset; callers that want `+0000` for zero should set
/// the fields themselves or use a predefined format that does.
pub fn populate_offset(container: &mut Container, offset: UtcOffset) {
    let total = offset.total_seconds();
    if total == 0 {
        return;
    }
    let is_negative = total < 0;
    let magnitude = total.unsigned_abs() as i64;
    container.set(FieldId::OffsetIsNegative, i64::from(is_negative));
    container.set(FieldId::OffsetTotalHoursAbs, magnitude / 3600);
    container.set(FieldId::OffsetMinutesOfHour, (magnitude / 60) % 60);
    container.set(FieldId::OffsetSecondsOfMinute, magnitude % 60);
}

/// Like [`populate_offset`], but always sets every field, even for a zero
/// offset. Used by formats with no `Z`-on-zero shortcut.
pub fn populate_offset_always(container: &mut Container, offset: UtcOffset) {
    let total = offset.total_seconds();
    let is_negative = total < 0;
    let magnitude = total.unsigned_abs() as i64;
    container.set(FieldId::OffsetIsNegative, i64::from(is_negative));
    container.set(FieldId::OffsetTotalHoursAbs, magnitude / 3600);
    container.set(FieldId::OffsetMinutesOfHour, (magnitude / 60) % 60);
    container.set(FieldId::OffsetSecondsOfMinute, magnitude % 60);
}

/// Populates `container` from every component of `instant`: date, time,
/// offset (with the zero-as-unset convention from [`populate_offset`]) and
/// zone id, if any.
pub fn populate_instant(container: &mut Container, instant: &Instant) {
    populate_date_time(container, instant.date_time());
    populate_offset(container, instant.offset());
    #[cfg(feature = "alloc")]
    if let Some(id) = instant.zone_id() {
        container.set_zone_id(String::from(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::IsoCalendar;

    #[test]
    fn populate_date_sets_the_three_fields() {
        let mut c = Container::new();
        populate_date(&mut c, LocalDate::new_unchecked(2024, 3, 5));
        assert_eq!(c.get(FieldId::Year), Some(2024));
        assert_eq!(c.get(FieldId::MonthNumber), Some(3));
        assert_eq!(c.get(FieldId::DayOfMonth), Some(5));
    }

    #[test]
    fn populate_date_with_calendar_derives_day_of_year_and_weekday() {
        let mut c = Container::new();
        populate_date_with_calendar(&mut c, LocalDate::new_unchecked(2024, 3, 5), &IsoCalendar);
        assert_eq!(c.get(FieldId::DayOfYear), Some(31 + 29 + 5));
        assert_eq!(c.get(FieldId::IsoDayOfWeek), Some(2));
    }

    #[test]
    fn populate_time_derives_twelve_hour_fields() {
        let mut c = Container::new();
        populate_time(&mut c, LocalTime::new_unchecked(13, 30, 0, 0));
        assert_eq!(c.get(FieldId::HourOfAmPm), Some(1));
        assert_eq!(c.get(FieldId::AmPm), Some(1));

        let mut midnight = Container::new();
        populate_time(&mut midnight, LocalTime::new_unchecked(0, 0, 0, 0));
        assert_eq!(midnight.get(FieldId::HourOfAmPm), Some(12));
        assert_eq!(midnight.get(FieldId::AmPm), Some(0));
    }

    #[test]
    fn populate_offset_leaves_fields_unset_for_zero() {
        let mut c = Container::new();
        populate_offset(&mut c, UtcOffset::new_unchecked(0));
        assert_eq!(c.get(FieldId::OffsetTotalHoursAbs), None);
    }

    #[test]
    fn populate_offset_always_sets_fields_for_zero() {
        let mut c = Container::new();
        populate_offset_always(&mut c, UtcOffset::new_unchecked(0));
        assert_eq!(c.get(FieldId::OffsetTotalHoursAbs), Some(0));
    }

    #[test]
    fn populate_offset_sets_sign_and_magnitude() {
        let mut c = Container::new();
        populate_offset(&mut c, UtcOffset::new_unchecked(-(2 * 3600 + 30 * 60)));
        assert_eq!(c.get(FieldId::OffsetIsNegative), Some(1));
        assert_eq!(c.get(FieldId::OffsetTotalHoursAbs), Some(2));
        assert_eq!(c.get(FieldId::OffsetMinutesOfHour), Some(30));
    }
}
