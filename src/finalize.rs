//! Turning a filled [`Container`] into a validated value.
//!
//! Each function here enforces the strict range of every field it reads
//! (via [`Container::finalize_field`]/[`Container::finalize_signed`]) and
//! the cross-field consistency checks the bag alone cannot express: day of
//! week against year/month/day, day of year against year/month/day, and
//! 12-hour-plus-AM/PM against a directly set 24-hour field.

use crate::calendar::CalendarOps;
use crate::container::Container;
use crate::error::Error;
use crate::field::FieldId;
use crate::value::{Instant, LocalDate, LocalDateTime, LocalTime, UtcOffset, YearMonth};

/// Seconds in 10,000 Gregorian years, used to keep the year-splitting
/// computation in [`seconds_since_epoch`] within `i64` range for years far
/// from the epoch.
pub const SECONDS_PER_10000_YEARS: i64 = 315_569_520_000;

/// Finalises the date-related fields of `container` into a [`LocalDate`].
///
/// If day-of-year is set, it is cross-checked against year/month/day when
/// those are also set, or used to derive month/day when they are not. If
/// ISO day of week is set, it is always cross-checked against the resolved
/// year/month/day.
///
/// # Errors
///
/// Returns [`Error::MissingField`] if neither a month/day pair nor a
/// day-of-year can be resolved, [`Error::FieldValue`] if any field is out of
/// its strict range, or [`Error::InconsistentFields`] if day-of-year or
/// ISO day of week disagrees with the resolved month/day.
pub fn finalize_date(container: &Container, calendar: &dyn CalendarOps) -> Result<LocalDate, Error> {
    let year = container.finalize_field(FieldId::Year)?;

    let have_month_day =
        container.get(FieldId::MonthNumber).is_some() && container.get(FieldId::DayOfMonth).is_some();
    let have_day_of_year = container.get(FieldId::DayOfYear).is_some();

    let (month, day) = if have_month_day {
        let month = container.finalize_field(FieldId::MonthNumber)?;
        let day = container.finalize_field(FieldId::DayOfMonth)?;
        if day > calendar.days_in_month(year, month) {
            return Err(Error::FieldValue {
                field: FieldId::DayOfMonth,
                value: day,
            });
        }
        if have_day_of_year {
            let day_of_year = container.finalize_field(FieldId::DayOfYear)?;
            if calendar.day_of_year(year, month, day) != day_of_year {
                return Err(Error::InconsistentFields(
                    "dayOfYear does not match monthNumber/dayOfMonth",
                ));
            }
        }
        (month, day)
    } else if have_day_of_year {
        let day_of_year = container.finalize_field(FieldId::DayOfYear)?;
        if day_of_year > calendar.days_in_year(year) {
            return Err(Error::FieldValue {
                field: FieldId::DayOfYear,
                value: day_of_year,
            });
        }
        calendar.month_day_from_day_of_year(year, day_of_year)
    } else {
        return Err(Error::MissingField(FieldId::DayOfMonth));
    };

    if let Some(declared_dow) = container.get(FieldId::IsoDayOfWeek) {
        let actual_dow = calendar.iso_day_of_week(year, month, day);
        if declared_dow != actual_dow {
            return Err(Error::InconsistentFields(
                "isoDayOfWeek does not match year/month/day",
            ));
        }
    }

    Ok(LocalDate::new_unchecked(year, month, day))
}

/// Finalises just the year and month fields of `container`, for formats
/// scoped to [`crate::builder::WithYearMonth`].
///
/// # Errors
///
/// Returns [`Error::MissingField`] or [`Error::FieldValue`] as for
/// [`finalize_date`].
pub fn finalize_year_month(container: &Container) -> Result<YearMonth, Error> {
    let year = container.finalize_field(FieldId::Year)?;
    let month = container.finalize_field(FieldId::MonthNumber)?;
    Ok(YearMonth::new_unchecked(year, month))
}

/// Finalises the time-of-day fields of `container` into a [`LocalTime`].
///
/// If both a 24-hour `hour` and a 12-hour `hourOfAmPm`/`amPm` pair are set,
/// they must agree.
///
/// # Errors
///
/// Returns [`Error::MissingField`] if no hour can be resolved,
/// [`Error::FieldValue`] if any field is out of its strict range, or
/// [`Error::InconsistentFields`] if the 24-hour and 12-hour representations
/// disagree.
pub fn finalize_time(container: &Container) -> Result<LocalTime, Error> {
    let have_24h = container.get(FieldId::Hour).is_some();
    let have_12h =
        container.get(FieldId::HourOfAmPm).is_some() && container.get(FieldId::AmPm).is_some();

    let hour = if have_24h {
        let hour24 = container.finalize_field(FieldId::Hour)?;
        if have_12h {
            let derived = derive_24h(
                container.finalize_field(FieldId::HourOfAmPm)?,
                container.finalize_field(FieldId::AmPm)?,
            );
            if derived != hour24 {
                return Err(Error::InconsistentFields(
                    "hour does not match hourOfAmPm/amPm",
                ));
            }
        }
        hour24
    } else if have_12h {
        derive_24h(
            container.finalize_field(FieldId::HourOfAmPm)?,
            container.finalize_field(FieldId::AmPm)?,
        )
    } else {
        return Err(Error::MissingField(FieldId::Hour));
    };

    let minute = container.finalize_field(FieldId::Minute)?;
    let second = container.finalize_field(FieldId::Second)?;
    let nanosecond = container.finalize_field(FieldId::Nanosecond)?;
    Ok(LocalTime::new_unchecked(hour, minute, second, nanosecond))
}

fn derive_24h(hour_of_am_pm: i64, am_pm: i64) -> i64 {
    let h = hour_of_am_pm % 12;
    h + if am_pm == 1 { 12 } else { 0 }
}

/// Finalises `container` into a full [`LocalDateTime`].
///
/// # Errors
///
/// Propagates errors from [`finalize_date`] and [`finalize_time`].
pub fn finalize_date_time(
    container: &Container,
    calendar: &dyn CalendarOps,
) -> Result<LocalDateTime, Error> {
    let date = finalize_date(container, calendar)?;
    let time = finalize_time(container)?;
    Ok(LocalDateTime::new_unchecked(date, time))
}

/// Finalises the UTC offset fields of `container`.
///
/// Unlike [`Container::finalize_field`], an unset magnitude defaults to
/// zero here even though [`FieldId::OffsetTotalHoursAbs`] declares no
/// default of its own: that declared-default gap is what lets a predefined
/// format's `Z`-on-zero `Alternatives` branch win over the numeric branch
/// when an offset is zero (see [`crate::populate::populate_offset`]), and
/// this function is where the zero is actually put back.
///
/// # Errors
///
/// Returns [`Error::FieldValue`] if any offset field is out of its strict
/// range, or if the hour magnitude is `18` with a nonzero minute or second.
pub fn finalize_offset(container: &Container) -> Result<UtcOffset, Error> {
    let hours = container.get(FieldId::OffsetTotalHoursAbs).unwrap_or(0);
    let minutes = container.get(FieldId::OffsetMinutesOfHour).unwrap_or(0);
    let seconds = container.get(FieldId::OffsetSecondsOfMinute).unwrap_or(0);
    let is_negative = container.get(FieldId::OffsetIsNegative).unwrap_or(0) != 0;

    for (field, value, max) in [
        (FieldId::OffsetTotalHoursAbs, hours, 18),
        (FieldId::OffsetMinutesOfHour, minutes, 59),
        (FieldId::OffsetSecondsOfMinute, seconds, 59),
    ] {
        if !(0..=max).contains(&value) {
            return Err(Error::FieldValue { field, value });
        }
    }
    if hours == 18 && (minutes != 0 || seconds != 0) {
        return Err(Error::FieldValue {
            field: FieldId::OffsetMinutesOfHour,
            value: minutes,
        });
    }

    let magnitude = hours * 3600 + minutes * 60 + seconds;
    Ok(UtcOffset::new_unchecked(if is_negative {
        -magnitude
    } else {
        magnitude
    }))
}

/// Finalises `container` into a full [`Instant`]: a date-time plus a UTC
/// offset.
///
/// # Errors
///
/// Propagates errors from [`finalize_date_time`] and [`finalize_offset`].
pub fn finalize_instant(
    container: &Container,
    calendar: &dyn CalendarOps,
) -> Result<Instant, Error> {
    let date_time = finalize_date_time(container, calendar)?;
    let offset = finalize_offset(container)?;
    let mut instant = Instant::new_unchecked(date_time, offset);
    #[cfg(feature = "alloc")]
    {
        instant.zone_id = container.zone_id().map(alloc::string::String::from);
    }
    Ok(instant)
}

/// Seconds elapsed from the Unix epoch (`1970-01-01T00:00:00Z`) to
/// `date_time`, ignoring any offset.
///
/// Splits `year` into `q` blocks of 10,000 years plus a remainder `r`, so
/// the running total never has to carry more than a few thousand years'
/// worth of seconds before multiplying by [`SECONDS_PER_10000_YEARS`]; this
/// keeps the arithmetic in range for years far from the epoch without
/// switching to a wider integer type.
///
/// # Errors
///
/// Returns [`Error::Overflow`] if the result does not fit in `i64`.
pub fn seconds_since_epoch(
    date_time: &LocalDateTime,
    calendar: &dyn CalendarOps,
) -> Result<i64, Error> {
    let year = date_time.date().year();
    let q = year.div_euclid(10_000);
    let r = year.rem_euclid(10_000);

    let mut days: i64 = 0;
    if q != 0 {
        days = q
            .checked_mul(SECONDS_PER_10000_YEARS / 86_400)
            .ok_or(Error::Overflow)?;
    }

    let epoch_year = 1970i64;
    let (lo, hi, sign) = if r >= epoch_year {
        (epoch_year, r, 1i64)
    } else {
        (r, epoch_year, -1i64)
    };
    let mut years_days: i64 = 0;
    let mut y = lo;
    while y < hi {
        years_days = years_days
            .checked_add(calendar.days_in_year(y))
            .ok_or(Error::Overflow)?;
        y += 1;
    }
    days = days
        .checked_add(sign * years_days)
        .ok_or(Error::Overflow)?;

    let day_of_year = calendar.day_of_year(r, date_time.date().month(), date_time.date().day());
    days = days
        .checked_add(day_of_year - 1)
        .ok_or(Error::Overflow)?;

    let time = date_time.time();
    let seconds_of_day = time.hour() * 3600 + time.minute() * 60 + time.second();

    days.checked_mul(86_400)
        .and_then(|d| d.checked_add(seconds_of_day))
        .ok_or(Error::Overflow)
}

/// Seconds elapsed from the Unix epoch to `instant`, applying its offset.
///
/// # Errors
///
/// Returns [`Error::Overflow`] on arithmetic overflow.
pub fn instant_seconds_since_epoch(
    instant: &Instant,
    calendar: &dyn CalendarOps,
) -> Result<i64, Error> {
    let local = seconds_since_epoch(&instant.date_time(), calendar)?;
    local
        .checked_sub(instant.offset().total_seconds())
        .ok_or(Error::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::IsoCalendar;

    fn filled_date(year: i64, month: i64, day: i64) -> Container {
        let mut c = Container::new();
        c.set(FieldId::Year, year);
        c.set(FieldId::MonthNumber, month);
        c.set(FieldId::DayOfMonth, day);
        c
    }

    #[test]
    fn finalize_date_round_trips_simple_date() {
        let c = filled_date(2024, 3, 5);
        let date = finalize_date(&c, &IsoCalendar).unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 3, 5));
    }

    #[test]
    fn finalize_date_rejects_day_out_of_month() {
        let c = filled_date(2023, 2, 29);
        assert!(finalize_date(&c, &IsoCalendar).is_err());
    }

    #[test]
    fn finalize_date_cross_checks_day_of_week() {
        let mut c = filled_date(2024, 3, 5); // a Tuesday, ISO day 2
        c.set(FieldId::IsoDayOfWeek, 3);
        assert!(finalize_date(&c, &IsoCalendar).is_err());
        c.set(FieldId::IsoDayOfWeek, 2);
        assert!(finalize_date(&c, &IsoCalendar).is_ok());
    }

    #[test]
    fn finalize_date_derives_month_day_from_day_of_year() {
        let mut c = Container::new();
        c.set(FieldId::Year, 2024);
        c.set(FieldId::DayOfYear, 61); // 2024 is a leap year: Jan 31 + Feb 29 + 1
        let date = finalize_date(&c, &IsoCalendar).unwrap();
        assert_eq!((date.month(), date.day()), (3, 1));
    }

    #[test]
    fn finalize_time_cross_checks_12h_and_24h() {
        let mut c = Container::new();
        c.set(FieldId::HourOfAmPm, 1);
        c.set(FieldId::AmPm, 1);
        c.set(FieldId::Minute, 0);
        let time = finalize_time(&c).unwrap();
        assert_eq!(time.hour(), 13);

        c.set(FieldId::Hour, 14);
        assert!(finalize_time(&c).is_err());
    }

    #[test]
    fn finalize_offset_applies_shared_sign() {
        let mut c = Container::new();
        c.set(FieldId::OffsetIsNegative, 1);
        c.set(FieldId::OffsetTotalHoursAbs, 2);
        c.set(FieldId::OffsetMinutesOfHour, 30);
        let offset = finalize_offset(&c).unwrap();
        assert_eq!(offset.total_seconds(), -(2 * 3600 + 30 * 60));
    }

    #[test]
    fn finalize_offset_defaults_unset_magnitudes_to_zero() {
        let offset = finalize_offset(&Container::new()).unwrap();
        assert_eq!(offset.total_seconds(), 0);
    }

    #[test]
    fn finalize_offset_rejects_minutes_past_eighteen_hours() {
        let mut c = Container::new();
        c.set(FieldId::OffsetTotalHoursAbs, 18);
        c.set(FieldId::OffsetMinutesOfHour, 30);
        assert!(finalize_offset(&c).is_err());
    }

    #[test]
    fn seconds_since_epoch_at_epoch_is_zero() {
        let date_time = LocalDateTime::new_unchecked(
            LocalDate::new_unchecked(1970, 1, 1),
            LocalTime::new_unchecked(0, 0, 0, 0),
        );
        assert_eq!(seconds_since_epoch(&date_time, &IsoCalendar).unwrap(), 0);
    }

    #[test]
    fn seconds_since_epoch_one_day_later() {
        let date_time = LocalDateTime::new_unchecked(
            LocalDate::new_unchecked(1970, 1, 2),
            LocalTime::new_unchecked(0, 0, 0, 0),
        );
        assert_eq!(
            seconds_since_epoch(&date_time, &IsoCalendar).unwrap(),
            86_400
        );
    }

    #[test]
    fn instant_seconds_since_epoch_matches_worked_example() {
        let date_time = LocalDateTime::new_unchecked(
            LocalDate::new_unchecked(2020, 3, 16),
            LocalTime::new_unchecked(23, 59, 59, 999_999_999),
        );
        let offset = UtcOffset::new_unchecked(3 * 3600);
        let instant = Instant::new_unchecked(date_time, offset);
        assert_eq!(
            instant_seconds_since_epoch(&instant, &IsoCalendar).unwrap(),
            1_584_399_599
        );
    }

    #[test]
    fn seconds_since_epoch_splits_years_past_ten_thousand() {
        let date_time = LocalDateTime::new_unchecked(
            LocalDate::new_unchecked(12020, 1, 31),
            LocalTime::new_unchecked(23, 59, 59, 0),
        );
        let seconds = seconds_since_epoch(&date_time, &IsoCalendar).unwrap();
        assert!(seconds > (1i64 << 35));

        let expected = SECONDS_PER_10000_YEARS
            + seconds_since_epoch(
                &LocalDateTime::new_unchecked(
                    LocalDate::new_unchecked(2020, 1, 31),
                    LocalTime::new_unchecked(23, 59, 59, 0),
                ),
                &IsoCalendar,
            )
            .unwrap();
        assert_eq!(seconds, expected);
    }
}
