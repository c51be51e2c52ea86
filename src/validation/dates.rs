use chrono::{Datelike, Duration, Months, NaiveDate};

pub const MIN_WORKER_AGE: i32 = 18;
pub const MAX_WORKER_AGE: i32 = 45;
/// Stock movements may be back-dated by at most this many days.
pub const STOCK_BACKDATE_DAYS: i64 = 7;

/// Whole years between `birth` and `today`.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

/// The same calendar day `years` years earlier; Feb 29 falls back to Feb 28.
pub fn years_before(today: NaiveDate, years: u32) -> NaiveDate {
    today
        .checked_sub_months(Months::new(years * 12))
        .unwrap_or(NaiveDate::MIN)
}

/// Latest birth date whose holder is at least `MIN_WORKER_AGE` today.
pub fn latest_birth_date(today: NaiveDate) -> NaiveDate {
    years_before(today, MIN_WORKER_AGE as u32)
}

/// Earliest birth date whose holder is still `MAX_WORKER_AGE` today.
pub fn earliest_birth_date(today: NaiveDate) -> NaiveDate {
    years_before(today, MAX_WORKER_AGE as u32 + 1) + Duration::days(1)
}

pub fn is_working_age(birth: NaiveDate, today: NaiveDate) -> bool {
    (MIN_WORKER_AGE..=MAX_WORKER_AGE).contains(&age_on(birth, today))
}

/// Moves an out-of-range birth date to the nearest boundary date.
pub fn clamp_birth_date(birth: NaiveDate, today: NaiveDate) -> NaiveDate {
    let age = age_on(birth, today);
    if age < MIN_WORKER_AGE {
        latest_birth_date(today)
    } else if age > MAX_WORKER_AGE {
        earliest_birth_date(today)
    } else {
        birth
    }
}

/// Future-only dates (expiry, scheduling) snap to today.
pub fn clamp_not_before(date: NaiveDate, today: NaiveDate) -> NaiveDate {
    date.max(today)
}

/// First day of the trailing stock window.
pub fn stock_window_start(today: NaiveDate) -> NaiveDate {
    today - Duration::days(STOCK_BACKDATE_DAYS)
}

/// Stock dates stay inside `[today - 7 days, today]`.
pub fn clamp_stock_date(date: NaiveDate, today: NaiveDate) -> NaiveDate {
    date.clamp(stock_window_start(today), today)
}
