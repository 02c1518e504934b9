use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Trading days per year used to annualize returns
pub const BUSINESS_DAYS_PER_YEAR: f64 = 252.0;

pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Weekdays in `(start, end]`: the start date is excluded, the end date counted.
///
/// No holiday calendar. Returns 0 when `end` is not after `start`.
pub fn business_days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    let total = (end - start).num_days();
    if total <= 0 {
        return 0;
    }

    let full_weeks = total / 7;
    let remainder_start = start + Duration::days(full_weeks * 7);
    let remainder = (1..=total % 7)
        .filter(|offset| is_business_day(remainder_start + Duration::days(*offset)))
        .count() as i64;

    full_weeks * 5 + remainder
}
