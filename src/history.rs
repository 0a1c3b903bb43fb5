//! Write boundary between the calculator and the record store.
//!
//! Stored `expenses` and `profit` are always recomputed from the snapshot
//! here, never taken from the caller.

use crate::aggregation::{monthly_summaries, weekly_summaries};
use crate::config::LabelLocale;
use crate::error::{CalculatorError, Result};
use crate::pricing::PricingReport;
use crate::schema::{CalculatorSnapshot, DailyRecord, MonthlySummary, NewRecord, WeeklySummary};
use crate::state::{CalculatorMode, CalculatorState};
use crate::store::RecordStore;
use chrono::{DateTime, Utc};
use log::{info, warn};

/// Maximum drift tolerated between a record's cached totals and the totals
/// derived from its snapshot.
pub const CACHE_TOLERANCE: f64 = 0.01;

/// Outcome of [`HistoryService::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Created(String),
    Updated(String),
}

impl SaveOutcome {
    pub fn id(&self) -> &str {
        match self {
            Self::Created(id) | Self::Updated(id) => id,
        }
    }
}

/// Builds the persistable record for `snapshot`, stamped at `now`.
pub fn build_record(snapshot: CalculatorSnapshot, now: DateTime<Utc>) -> NewRecord {
    let report = PricingReport::from_snapshot(&snapshot);
    NewRecord {
        created_at: now,
        receipts: snapshot.client_receipts,
        expenses: report.costs.total,
        profit: report.realized.monthly_profit,
        snapshot,
    }
}

impl DailyRecord {
    /// Whether the cached totals still match the snapshot.
    pub fn is_consistent(&self, tolerance: f64) -> bool {
        let report = PricingReport::from_snapshot(&self.snapshot);
        (self.expenses - report.costs.total).abs() <= tolerance
            && (self.profit - report.realized.monthly_profit).abs() <= tolerance
            && (self.receipts - self.snapshot.client_receipts).abs() <= tolerance
    }
}

pub struct HistoryService<S> {
    store: S,
}

impl<S: RecordStore> HistoryService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates a record in `New` mode, replaces the edited record in `Edit`
    /// mode. `View` mode is rejected.
    pub async fn save(&self, state: &CalculatorState, now: DateTime<Utc>) -> Result<SaveOutcome> {
        let record = build_record(state.snapshot(), now);

        match state.mode() {
            CalculatorMode::New => {
                let id = self.store.create(record).await?;
                info!("Saved new daily record {}", id);
                Ok(SaveOutcome::Created(id))
            }
            CalculatorMode::Edit(id) => {
                self.store.replace(id, record).await?;
                info!("Updated daily record {}", id);
                Ok(SaveOutcome::Updated(id.clone()))
            }
            CalculatorMode::View(id) => Err(CalculatorError::ReadOnly(id.clone())),
        }
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.store.delete(id).await?;
        info!("Deleted daily record {}", id);
        Ok(())
    }

    /// All records, newest first. Records with stale cached totals are
    /// reported but still returned.
    pub async fn list(&self) -> Result<Vec<DailyRecord>> {
        let records = self.store.list().await?;
        for record in records.iter().filter(|r| !r.is_consistent(CACHE_TOLERANCE)) {
            warn!(
                "Record {} has cached totals that differ from its snapshot",
                record.id
            );
        }
        Ok(records)
    }

    pub async fn find(&self, id: &str) -> Result<DailyRecord> {
        self.list()
            .await?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| CalculatorError::RecordNotFound(id.to_string()))
    }

    pub async fn weekly(&self, locale: LabelLocale) -> Result<Vec<WeeklySummary>> {
        Ok(weekly_summaries(&self.list().await?, locale))
    }

    pub async fn monthly(&self, locale: LabelLocale) -> Result<Vec<MonthlySummary>> {
        Ok(monthly_summaries(&self.list().await?, locale))
    }
}
