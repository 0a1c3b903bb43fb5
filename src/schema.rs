use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One cost line in either the fixed-expense or the contingency list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExpenseItem {
    #[schemars(description = "Identifier, unique within its list")]
    pub id: String,

    #[serde(default)]
    #[schemars(description = "Free text label shown to the user (e.g. 'MARKETING')")]
    pub label: String,

    #[serde(default)]
    #[schemars(description = "Monthly currency amount for this line")]
    pub value: f64,
}

impl ExpenseItem {
    pub fn new(id: impl Into<String>, label: impl Into<String>, value: f64) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseList {
    Fixed,
    Contingency,
}

impl fmt::Display for ExpenseList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed => write!(f, "fixed expenses"),
            Self::Contingency => write!(f, "contingency costs"),
        }
    }
}

/// Full reconstructable calculator state.
///
/// Missing fields deserialize as zero or empty so that older or partially
/// written rows still load; a field with the wrong type rejects the record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CalculatorSnapshot {
    #[schemars(description = "Recurring fixed and variable cost lines")]
    pub fixed_expenses: Vec<ExpenseItem>,

    #[schemars(description = "Occasional cost lines tracked separately")]
    pub contingency_costs: Vec<ExpenseItem>,

    #[schemars(description = "Desired profit margin, in percent")]
    pub profit_margin: f64,

    #[schemars(description = "Share of ideal billing set aside as a financial reserve, in percent")]
    pub financial_reserve_percentage: f64,

    #[schemars(description = "Actual amount received from clients")]
    pub client_receipts: f64,
}

impl CalculatorSnapshot {
    /// Every line of both lists, fixed expenses first.
    pub fn all_items(&self) -> impl Iterator<Item = &ExpenseItem> {
        self.fixed_expenses.iter().chain(self.contingency_costs.iter())
    }
}

/// The persisted unit. `expenses` and `profit` are a cache of what the
/// pricing engine derives from `snapshot`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    pub id: String,

    #[serde(rename = "createdDate")]
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub receipts: f64,

    #[serde(default)]
    pub expenses: f64,

    #[serde(default)]
    pub profit: f64,

    #[serde(default)]
    pub snapshot: CalculatorSnapshot,
}

/// A record before the store has assigned it an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecord {
    #[serde(rename = "createdDate")]
    pub created_at: DateTime<Utc>,
    pub receipts: f64,
    pub expenses: f64,
    pub profit: f64,
    pub snapshot: CalculatorSnapshot,
}

impl NewRecord {
    pub fn with_id(self, id: impl Into<String>) -> DailyRecord {
        DailyRecord {
            id: id.into(),
            created_at: self.created_at,
            receipts: self.receipts,
            expenses: self.expenses,
            profit: self.profit,
            snapshot: self.snapshot,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySummary {
    /// e.g. "Semana 30 de 2024"
    pub week_year: String,
    pub receipts: f64,
    pub expenses: f64,
    pub profit: f64,
    pub count: usize,
    pub entries: Vec<DailyRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    /// e.g. "Julho de 2024"
    pub month_year: String,
    pub receipts: f64,
    pub expenses: f64,
    pub profit: f64,
    pub count: usize,
    pub entries: Vec<DailyRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Kpis {
    #[schemars(description = "Sum of 'receipts' across all records")]
    pub total_receipts: f64,

    #[schemars(description = "Sum of 'expenses' across all records")]
    pub total_expenses: f64,

    #[schemars(description = "Sum of 'profit' across all records")]
    pub total_profit: f64,

    #[schemars(
        description = "Average profit margin: (totalProfit / totalReceipts) * 100. Return 0 when totalReceipts is 0."
    )]
    pub average_profit_margin: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExpenseTotal {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CostAnalysis {
    #[schemars(
        description = "The 5 largest expenses aggregated across all records. Sum values sharing the same 'label' across every 'snapshot.fixedExpenses' and 'snapshot.contingencyCosts'."
    )]
    pub top_expenses: Vec<ExpenseTotal>,
}

/// Structured answer of the AI summarization collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsightData {
    pub kpis: Kpis,

    pub cost_analysis: CostAnalysis,

    #[schemars(
        description = "3 to 5 short, actionable recommendations. Compare expenses with receipts, point out trends and quantify the impact with currency values."
    )]
    pub alerts: Vec<String>,
}

impl InsightData {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(InsightData)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}
