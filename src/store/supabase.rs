use crate::config::{read_secret, StoreSettings};
use crate::error::{CalculatorError, Result};
use crate::schema::{CalculatorSnapshot, DailyRecord, NewRecord};
use crate::store::RecordStore;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};

/// PostgREST-backed store. Rows carry `id`, `summary_date`, `receipts`,
/// `expenses`, `profit` and a JSON `snapshot` column.
#[derive(Clone)]
pub struct SupabaseStore {
    client: Client,
    base_url: String,
    table: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct RowPayload<'a> {
    summary_date: DateTime<Utc>,
    receipts: f64,
    expenses: f64,
    profit: f64,
    snapshot: &'a CalculatorSnapshot,
}

impl<'a> From<&'a NewRecord> for RowPayload<'a> {
    fn from(record: &'a NewRecord) -> Self {
        Self {
            summary_date: record.created_at,
            receipts: record.receipts,
            expenses: record.expenses,
            profit: record.profit,
            snapshot: &record.snapshot,
        }
    }
}

#[derive(Debug, Deserialize)]
struct StoredRow {
    id: serde_json::Value,
    summary_date: DateTime<Utc>,
    #[serde(default)]
    receipts: f64,
    #[serde(default)]
    expenses: f64,
    #[serde(default)]
    profit: f64,
    #[serde(default)]
    snapshot: CalculatorSnapshot,
}

impl StoredRow {
    fn into_record(self) -> DailyRecord {
        DailyRecord {
            id: id_to_string(&self.id),
            created_at: self.summary_date,
            receipts: self.receipts,
            expenses: self.expenses,
            profit: self.profit,
            snapshot: self.snapshot,
        }
    }
}

fn id_to_string(id: &serde_json::Value) -> String {
    match id {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl SupabaseStore {
    pub fn new(
        base_url: impl Into<String>,
        table: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            table: table.into(),
            api_key: api_key.into(),
        }
    }

    /// Builds a store from settings, reading the key from the environment.
    pub fn from_settings(settings: &StoreSettings) -> Result<Self> {
        let api_key = read_secret(&settings.api_key_env)?;
        Ok(Self::new(&settings.url, &settings.table, api_key))
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    async fn check(response: Response, action: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await?;
        Err(CalculatorError::Store(format!(
            "{} failed (status {}): {}",
            action, status, body
        )))
    }

    /// Number of rows a `return=representation` write echoed back. A 2xx
    /// with an empty body counts as zero rows.
    async fn affected_rows(response: Response, action: &str) -> Result<usize> {
        let body = Self::check(response, action).await?.text().await?;
        if body.trim().is_empty() {
            return Ok(0);
        }
        let rows: Vec<serde_json::Value> = serde_json::from_str(&body)?;
        Ok(rows.len())
    }
}

impl RecordStore for SupabaseStore {
    async fn list(&self) -> Result<Vec<DailyRecord>> {
        let url = format!("{}?select=*&order=summary_date.desc", self.table_url());
        let res = self.authorized(self.client.get(&url)).send().await?;
        let rows: Vec<serde_json::Value> = Self::check(res, "List records").await?.json().await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            match serde_json::from_value::<StoredRow>(row) {
                Ok(parsed) => records.push(parsed.into_record()),
                Err(e) => warn!("Skipping malformed record from {}: {}", self.table, e),
            }
        }
        debug!("Fetched {} records from {}", records.len(), self.table);
        Ok(records)
    }

    async fn create(&self, record: NewRecord) -> Result<String> {
        let res = self
            .authorized(self.client.post(self.table_url()))
            .header("Prefer", "return=representation")
            .json(&RowPayload::from(&record))
            .send()
            .await?;
        let rows: Vec<serde_json::Value> = Self::check(res, "Insert record").await?.json().await?;

        rows.first()
            .and_then(|row| row.get("id"))
            .map(id_to_string)
            .ok_or_else(|| CalculatorError::Store("Insert response missing 'id'".to_string()))
    }

    async fn replace(&self, id: &str, record: NewRecord) -> Result<()> {
        let url = format!("{}?id=eq.{}", self.table_url(), id);
        let res = self
            .authorized(self.client.patch(&url))
            .header("Prefer", "return=representation")
            .json(&RowPayload::from(&record))
            .send()
            .await?;
        if Self::affected_rows(res, "Update record").await? == 0 {
            return Err(CalculatorError::RecordNotFound(id.to_string()));
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let url = format!("{}?id=eq.{}", self.table_url(), id);
        let res = self
            .authorized(self.client.delete(&url))
            .header("Prefer", "return=representation")
            .send()
            .await?;
        if Self::affected_rows(res, "Delete record").await? == 0 {
            return Err(CalculatorError::RecordNotFound(id.to_string()));
        }
        Ok(())
    }
}
