//! Wall-clock date arithmetic.
//!
//! Calendar layout works in two clocks at once. Day boundaries, week rows and
//! slot labels follow the *wall clock* of the calendar's time zone, while
//! elapsed durations are measured between absolute instants. The helpers here
//! keep the two apart and add the DST correction where they meet.

use chrono::{
    DateTime, Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone,
    Weekday,
};
use chrono_tz::Tz;

/// A zoned instant. Every event boundary and slot date is one of these.
pub type Timestamp = DateTime<Tz>;

/// Wall-clock calendar day of an instant.
pub fn start_of_day(ts: &Timestamp) -> NaiveDate {
    ts.date_naive()
}

/// Day an instant rounds up to.
///
/// Midnight stays on its own day; any later time of day rounds to the next
/// day. An event ending at `00:00` therefore ends on the previous day.
pub fn ceil_day(ts: &Timestamp) -> NaiveDate {
    let local = ts.naive_local();
    if local.time() == NaiveTime::MIN {
        local.date()
    } else {
        add_days(local.date(), 1)
    }
}

/// Minutes the UTC offset moved between `a` and `b`.
///
/// Positive when clocks moved forward (spring), negative when they moved
/// back (autumn), zero when no transition lies between the two instants.
pub fn dst_offset_minutes(a: &Timestamp, b: &Timestamp) -> i64 {
    let before = a.offset().fix().local_minus_utc();
    let after = b.offset().fix().local_minus_utc();
    i64::from(after - before) / 60
}

/// Wall-clock minutes from `a` to `b`: elapsed minutes plus the DST shift.
pub fn minutes_between(a: &Timestamp, b: &Timestamp) -> i64 {
    (*b - *a).num_minutes() + dst_offset_minutes(a, b)
}

/// Map a wall-clock time onto an instant in `tz`.
///
/// Ambiguous times (autumn fold) take the earlier instant. Times that do not
/// exist (spring gap) move forward past the gap.
pub fn localize(tz: Tz, naive: NaiveDateTime) -> Timestamp {
    if let Some(ts) = tz.from_local_datetime(&naive).earliest() {
        return ts;
    }
    for step in 1..=4 {
        let shifted = naive + Duration::minutes(30 * step);
        if let Some(ts) = tz.from_local_datetime(&shifted).earliest() {
            return ts;
        }
    }
    tz.from_utc_datetime(&naive)
}

/// Midnight at the start of `date` in `tz`.
pub fn day_start(tz: Tz, date: NaiveDate) -> Timestamp {
    localize(tz, date.and_time(NaiveTime::MIN))
}

/// `date` at the wall-clock time of day of `time_of`.
pub fn merge(tz: Tz, date: NaiveDate, time_of: &Timestamp) -> Timestamp {
    localize(tz, date.and_time(time_of.naive_local().time()))
}

/// Add days, saturating at the representable calendar range.
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days)).unwrap_or(date)
}

/// Add (or subtract) whole months; the day of month clamps to month end.
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.unwrap_or(date)
}

/// First day of the week containing `date`.
pub fn start_of_week(date: NaiveDate, week_start: Weekday) -> NaiveDate {
    let back = (7 + date.weekday().num_days_from_monday() - week_start.num_days_from_monday()) % 7;
    add_days(date, -i64::from(back))
}

/// Last day of the week containing `date`.
pub fn end_of_week(date: NaiveDate, week_start: Weekday) -> NaiveDate {
    add_days(start_of_week(date, week_start), 6)
}

/// First day of the month containing `date`.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Last day of the month containing `date`.
pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    add_days(add_months(first_of_month(date), 1), -1)
}

/// January 1st of the year containing `date`.
pub fn first_of_year(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
}

/// Whether two dates fall in the same calendar month.
pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// Every day from `first` through `last`, inclusive.
pub fn visible_days(first: NaiveDate, last: NaiveDate) -> Vec<NaiveDate> {
    first.iter_days().take_while(|d| *d <= last).collect()
}

/// Full weeks covering the month of `date`, one `Vec` of 7 days per week.
pub fn month_weeks(date: NaiveDate, week_start: Weekday) -> Vec<Vec<NaiveDate>> {
    let first = start_of_week(first_of_month(date), week_start);
    let last = end_of_week(last_of_month(date), week_start);
    visible_days(first, last)
        .chunks(7)
        .map(|week| week.to_vec())
        .collect()
}

/// Number of week rows a month grid needs (4 to 6).
pub fn weeks_in_month(date: NaiveDate, week_start: Weekday) -> usize {
    let first = start_of_week(first_of_month(date), week_start);
    let last = end_of_week(last_of_month(date), week_start);
    ((last - first).num_days() as usize + 1) / 7
}

/// Weekdays in display order starting from `week_start`.
pub fn weekday_order(week_start: Weekday) -> [Weekday; 7] {
    let mut order = [week_start; 7];
    let mut day = week_start;
    for slot in order.iter_mut() {
        *slot = day;
        day = day.succ();
    }
    order
}
