use crate::error::{CalculatorError, Result};
use crate::schema::DailyRecord;
use chrono::{Datelike, Days, NaiveDate};

/// ISO-8601 week-numbering key `(iso_year, iso_week)`.
///
/// Weeks start on Monday and belong to the year of their Thursday, so the
/// first days of January can fall in week 52/53 of the previous year and the
/// last days of December in week 1 of the next.
pub fn iso_week_key(date: NaiveDate) -> (i32, u32) {
    let week = date.iso_week();
    (week.year(), week.week())
}

/// Plain calendar month key `(year, month)` with `month` in `1..=12`.
pub fn month_key(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.month())
}

pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn last_day_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.checked_sub_days(Days::new(1)))
        .ok_or_else(|| CalculatorError::DateError(format!("Invalid month {}-{:02}", year, month)))
}

/// Parses a period string in the format "YYYY-MM" or "YYYY-MM:YYYY-MM"
/// Returns (start_date, end_date), both inclusive.
pub fn parse_period_string(period: &str) -> Result<(NaiveDate, NaiveDate)> {
    let parts: Vec<&str> = period.split(':').collect();

    let (first, last) = match parts.as_slice() {
        [single] => (*single, *single),
        [start, end] => (*start, *end),
        _ => {
            return Err(CalculatorError::DateError(format!(
                "Invalid period format: {}. Expected 'YYYY-MM' or 'YYYY-MM:YYYY-MM'",
                period
            )))
        }
    };

    let start_date = parse_month_start(first)?;
    let end_start = parse_month_start(last)?;
    let end_date = last_day_of_month(end_start.year(), end_start.month())?;

    if end_date < start_date {
        return Err(CalculatorError::DateError(format!(
            "Period '{}' ends before it starts",
            period
        )));
    }

    Ok((start_date, end_date))
}

fn parse_month_start(text: &str) -> Result<NaiveDate> {
    let start_str = format!("{}-01", text.trim());
    NaiveDate::parse_from_str(&start_str, "%Y-%m-%d").map_err(|_| {
        CalculatorError::DateError(format!(
            "Invalid date format in period: {}. Expected YYYY-MM",
            text
        ))
    })
}

/// Records whose UTC calendar date falls inside `period`, order preserved.
pub fn records_in_period(records: &[DailyRecord], period: &str) -> Result<Vec<DailyRecord>> {
    let (start, end) = parse_period_string(period)?;
    Ok(records
        .iter()
        .filter(|r| {
            let day = r.created_at.date_naive();
            day >= start && day <= end
        })
        .cloned()
        .collect())
}
