//! Weekly and monthly grouping of saved daily records.
//!
//! Buckets are keyed on the UTC calendar date of each record. Weeks follow
//! ISO-8601 numbering; months are plain calendar months.

use crate::config::LabelLocale;
use crate::schema::{DailyRecord, MonthlySummary, WeeklySummary};
use crate::utils::{capitalize_first, iso_week_key, month_key};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PeriodKey {
    Week { iso_year: i32, iso_week: u32 },
    Month { year: i32, month: u32 },
}

impl PeriodKey {
    pub fn week_of(record: &DailyRecord) -> Self {
        let (iso_year, iso_week) = iso_week_key(record.created_at.date_naive());
        Self::Week { iso_year, iso_week }
    }

    pub fn month_of(record: &DailyRecord) -> Self {
        let (year, month) = month_key(record.created_at.date_naive());
        Self::Month { year, month }
    }

    /// Label for the bucket this key identifies; `record` is the record that
    /// opened the bucket.
    pub fn label(&self, record: &DailyRecord, locale: LabelLocale) -> String {
        match *self {
            Self::Week { iso_year, iso_week } => locale.week_label(iso_week, iso_year),
            Self::Month { .. } => month_year_label(record, locale),
        }
    }
}

pub fn month_year_label(record: &DailyRecord, locale: LabelLocale) -> String {
    let raw = record
        .created_at
        .format_localized(locale.month_year_format(), locale.chrono_locale())
        .to_string();
    capitalize_first(&raw)
}

/// Running totals for one period.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodBucket {
    pub key: PeriodKey,
    pub label: String,
    pub receipts: f64,
    pub expenses: f64,
    pub profit: f64,
    pub count: usize,
    pub entries: Vec<DailyRecord>,
}

impl PeriodBucket {
    fn open(key: PeriodKey, label: String) -> Self {
        Self {
            key,
            label,
            receipts: 0.0,
            expenses: 0.0,
            profit: 0.0,
            count: 0,
            entries: Vec::new(),
        }
    }

    fn push(&mut self, record: &DailyRecord) {
        self.receipts += record.receipts;
        self.expenses += record.expenses;
        self.profit += record.profit;
        self.count += 1;
        self.entries.push(record.clone());
    }
}

/// Single pass grouping of `records` by `key_of`, newest bucket first.
///
/// Bucket order compares the date of each bucket's first appended entry.
/// When records arrive newest first, as the store lists them, that is the
/// most recent entry of the bucket.
pub fn aggregate_by<F>(records: &[DailyRecord], locale: LabelLocale, key_of: F) -> Vec<PeriodBucket>
where
    F: Fn(&DailyRecord) -> PeriodKey,
{
    let mut index: HashMap<PeriodKey, usize> = HashMap::new();
    let mut buckets: Vec<PeriodBucket> = Vec::new();

    for record in records {
        let key = key_of(record);
        let slot = *index.entry(key).or_insert_with(|| {
            buckets.push(PeriodBucket::open(key, key.label(record, locale)));
            buckets.len() - 1
        });
        buckets[slot].push(record);
    }

    buckets.sort_by(|a, b| {
        let a_date = a.entries.first().map(|r| r.created_at);
        let b_date = b.entries.first().map(|r| r.created_at);
        b_date.cmp(&a_date)
    });

    debug!(
        "Aggregated {} records into {} buckets",
        records.len(),
        buckets.len()
    );

    buckets
}

pub fn weekly_summaries(records: &[DailyRecord], locale: LabelLocale) -> Vec<WeeklySummary> {
    aggregate_by(records, locale, PeriodKey::week_of)
        .into_iter()
        .map(|b| WeeklySummary {
            week_year: b.label,
            receipts: b.receipts,
            expenses: b.expenses,
            profit: b.profit,
            count: b.count,
            entries: b.entries,
        })
        .collect()
}

pub fn monthly_summaries(records: &[DailyRecord], locale: LabelLocale) -> Vec<MonthlySummary> {
    aggregate_by(records, locale, PeriodKey::month_of)
        .into_iter()
        .map(|b| MonthlySummary {
            month_year: b.label,
            receipts: b.receipts,
            expenses: b.expenses,
            profit: b.profit,
            count: b.count,
            entries: b.entries,
        })
        .collect()
}
