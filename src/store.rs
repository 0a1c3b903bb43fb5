//! Boundary to the remote tabular store that persists daily records.

#[cfg(feature = "supabase")]
pub mod supabase;

use crate::error::{CalculatorError, Result};
use crate::schema::{DailyRecord, NewRecord};
use log::debug;
use parking_lot::Mutex;

/// Persistence operations needed by the calculator. One call per user
/// action; implementations do not retry.
#[allow(async_fn_in_trait)]
pub trait RecordStore {
    /// All records, newest first.
    async fn list(&self) -> Result<Vec<DailyRecord>>;

    /// Inserts a record and returns the id the store assigned.
    async fn create(&self, record: NewRecord) -> Result<String>;

    /// Replaces every field of an existing record.
    async fn replace(&self, id: &str, record: NewRecord) -> Result<()>;

    async fn delete(&self, id: &str) -> Result<()>;
}

/// Process-local store with sequential numeric ids.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    records: Vec<DailyRecord>,
    next_id: u64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<DailyRecord>) -> Self {
        let next_id = records
            .iter()
            .filter_map(|r| r.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self {
            inner: Mutex::new(MemoryInner { records, next_id }),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecordStore for InMemoryStore {
    async fn list(&self) -> Result<Vec<DailyRecord>> {
        let mut records = self.inner.lock().records.clone();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn create(&self, record: NewRecord) -> Result<String> {
        let mut inner = self.inner.lock();
        inner.next_id += 1;
        let id = inner.next_id.to_string();
        debug!("In-memory store: inserting record {}", id);
        inner.records.push(record.with_id(id.clone()));
        Ok(id)
    }

    async fn replace(&self, id: &str, record: NewRecord) -> Result<()> {
        let mut inner = self.inner.lock();
        let slot = inner
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| CalculatorError::RecordNotFound(id.to_string()))?;
        *slot = record.with_id(id);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        let before = inner.records.len();
        inner.records.retain(|r| r.id != id);
        if inner.records.len() == before {
            return Err(CalculatorError::RecordNotFound(id.to_string()));
        }
        Ok(())
    }
}
