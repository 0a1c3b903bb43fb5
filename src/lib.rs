//! # Pricing Calculator
//!
//! Pricing and profitability model for a small service business, plus the
//! history reports built from saved daily summaries.
//!
//! ## Core Concepts
//!
//! - **Total costs**: the sum of the fixed-expense and contingency-cost lines
//! - **Ideal monthly billing**: revenue that covers costs, the financial reserve and the desired margin
//! - **Suggested rates**: ideal billing split over 20 working days of 8 hours
//! - **Daily record**: a saved calculator snapshot with cached receipts/expenses/profit totals
//! - **Reports**: records grouped by ISO week or calendar month, newest first
//!
//! ## Example
//!
//! ```rust
//! use pricing_calculator::*;
//!
//! let pricing = PricingEngine::breakdown(1000.0, 20.0, 10.0);
//! assert!((pricing.ideal_monthly_billing - 1300.0).abs() < 1e-9);
//! assert!((pricing.suggested_price_per_hour - 8.125).abs() < 1e-9);
//!
//! let mut state = CalculatorState::default();
//! state
//!     .apply(Command::SetItemValue {
//!         list: ExpenseList::Fixed,
//!         id: "fe1".to_string(),
//!         value: 1000.0,
//!     })
//!     .unwrap();
//! state.apply(Command::SetClientReceipts(1500.0)).unwrap();
//! assert!((state.report().realized.monthly_profit - 370.0).abs() < 1e-9);
//! ```

pub mod aggregation;
pub mod charts;
pub mod config;
pub mod error;
pub mod history;
pub mod pricing;
pub mod schema;
pub mod state;
pub mod store;
pub mod utils;

#[cfg(feature = "gemini")]
pub mod llm;

pub use aggregation::{aggregate_by, monthly_summaries, weekly_summaries, PeriodBucket, PeriodKey};
pub use charts::{
    aggregate_expenses, expense_composition, monthly_series, top_expenses, HistoryTotals,
    MonthlyPoint,
};
pub use config::{CalculatorConfig, LabelLocale, StoreSettings};
pub use error::{CalculatorError, Result};
pub use history::{build_record, HistoryService, SaveOutcome};
pub use pricing::*;
pub use schema::*;
pub use state::{CalculatorMode, CalculatorState, Command, OpenMode};
pub use store::{InMemoryStore, RecordStore};
pub use utils::*;

use log::debug;
use serde::Serialize;

/// Everything the history screens show, derived from one listing of the
/// store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryReport {
    pub records: Vec<DailyRecord>,
    pub weekly: Vec<WeeklySummary>,
    pub monthly: Vec<MonthlySummary>,
    pub totals: HistoryTotals,
}

pub struct HistoryProcessor;

impl HistoryProcessor {
    /// Builds weekly and monthly summaries plus overall totals. `records`
    /// are expected newest first, as the store lists them.
    pub fn process(records: Vec<DailyRecord>, locale: LabelLocale) -> HistoryReport {
        debug!("Building history report for {} records", records.len());

        let weekly = weekly_summaries(&records, locale);
        let monthly = monthly_summaries(&records, locale);
        let totals = HistoryTotals::from_records(&records);

        HistoryReport {
            records,
            weekly,
            monthly,
            totals,
        }
    }

    /// Same as [`process`](Self::process), restricted to a "YYYY-MM" or
    /// "YYYY-MM:YYYY-MM" period.
    pub fn process_period(
        records: &[DailyRecord],
        period: &str,
        locale: LabelLocale,
    ) -> Result<HistoryReport> {
        let selected = records_in_period(records, period)?;
        Ok(Self::process(selected, locale))
    }
}

pub fn process_history(records: Vec<DailyRecord>, locale: LabelLocale) -> HistoryReport {
    HistoryProcessor::process(records, locale)
}
