//! Data series behind the dashboard charts and KPI cards.

use crate::config::LabelLocale;
use crate::schema::{DailyRecord, ExpenseTotal, Kpis};
use crate::utils::month_key;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Number of individual slices before the remainder is folded together.
pub const COMPOSITION_SLICES: usize = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyPoint {
    pub label: String,
    pub receipts: f64,
    pub expenses: f64,
    pub profit: f64,
}

/// One point per calendar month, oldest first.
pub fn monthly_series(records: &[DailyRecord], locale: LabelLocale) -> Vec<MonthlyPoint> {
    let mut months: BTreeMap<(i32, u32), MonthlyPoint> = BTreeMap::new();

    for record in records {
        let point = months
            .entry(month_key(record.created_at.date_naive()))
            .or_insert_with(|| MonthlyPoint {
                label: record
                    .created_at
                    .format_localized(locale.short_month_format(), locale.chrono_locale())
                    .to_string(),
                receipts: 0.0,
                expenses: 0.0,
                profit: 0.0,
            });
        point.receipts += record.receipts;
        point.expenses += record.expenses;
        point.profit += record.profit;
    }

    months.into_values().collect()
}

/// Expense values summed by label across both lists of every snapshot,
/// largest first. Equal totals keep first-seen order.
pub fn aggregate_expenses(records: &[DailyRecord]) -> Vec<ExpenseTotal> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<ExpenseTotal> = Vec::new();

    for item in records.iter().flat_map(|r| r.snapshot.all_items()) {
        match index.get(item.label.as_str()) {
            Some(&slot) => totals[slot].value += item.value,
            None => {
                index.insert(item.label.as_str(), totals.len());
                totals.push(ExpenseTotal {
                    label: item.label.clone(),
                    value: item.value,
                });
            }
        }
    }

    totals.sort_by(|a, b| b.value.total_cmp(&a.value));
    totals
}

pub fn top_expenses(records: &[DailyRecord], n: usize) -> Vec<ExpenseTotal> {
    let mut totals = aggregate_expenses(records);
    totals.truncate(n);
    totals
}

/// Pie chart slices: the seven largest expenses plus one slice for the rest
/// when it is positive.
pub fn expense_composition(records: &[DailyRecord], locale: LabelLocale) -> Vec<ExpenseTotal> {
    let totals = aggregate_expenses(records);
    let split = totals.len().min(COMPOSITION_SLICES);
    let others: f64 = totals[split..].iter().map(|t| t.value).sum();

    let mut slices = totals[..split].to_vec();
    if others > 0.0 {
        slices.push(ExpenseTotal {
            label: locale.other_expenses_label().to_string(),
            value: others,
        });
    }
    slices
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct HistoryTotals {
    pub total_receipts: f64,
    pub total_expenses: f64,
    pub total_profit: f64,
}

impl HistoryTotals {
    pub fn from_records(records: &[DailyRecord]) -> Self {
        records.iter().fold(Self::default(), |mut acc, r| {
            acc.total_receipts += r.receipts;
            acc.total_expenses += r.expenses;
            acc.total_profit += r.profit;
            acc
        })
    }

    /// Profit as a percentage of receipts; 0 when nothing was received.
    pub fn average_profit_margin(&self) -> f64 {
        if self.total_receipts == 0.0 {
            0.0
        } else {
            self.total_profit / self.total_receipts * 100.0
        }
    }

    pub fn to_kpis(&self) -> Kpis {
        Kpis {
            total_receipts: self.total_receipts,
            total_expenses: self.total_expenses,
            total_profit: self.total_profit,
            average_profit_margin: self.average_profit_margin(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CalculatorSnapshot, ExpenseItem};
    use chrono::{TimeZone, Utc};

    fn record(m: u32, d: u32, items: &[(&str, f64)], receipts: f64, profit: f64) -> DailyRecord {
        let fixed: Vec<_> = items
            .iter()
            .enumerate()
            .map(|(i, (label, value))| ExpenseItem::new(format!("fe{}", i), *label, *value))
            .collect();
        let expenses = fixed.iter().map(|i| i.value).sum();
        DailyRecord {
            id: format!("{}-{}", m, d),
            created_at: Utc.with_ymd_and_hms(2024, m, d, 12, 0, 0).unwrap(),
            receipts,
            expenses,
            profit,
            snapshot: CalculatorSnapshot {
                fixed_expenses: fixed,
                contingency_costs: vec![ExpenseItem::new("cc1", "MATERIAL ESCRITÓRIO", 5.0)],
                ..CalculatorSnapshot::default()
            },
        }
    }

    #[test]
    fn test_monthly_series_is_chronological() {
        let records = vec![
            record(3, 2, &[], 30.0, 3.0),
            record(1, 15, &[], 10.0, 1.0),
            record(3, 1, &[], 5.0, 0.5),
        ];
        let series = monthly_series(&records, LabelLocale::EnUs);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].label, "Jan 24");
        assert_eq!(series[1].label, "Mar 24");
        assert_eq!(series[1].receipts, 35.0);

        let series = monthly_series(&records, LabelLocale::PtBr);
        assert_eq!(series[0].label, "jan. de 24");
    }

    #[test]
    fn test_expenses_aggregate_by_label_across_lists() {
        let records = vec![
            record(1, 1, &[("MARKETING", 100.0), ("CRM", 20.0)], 0.0, 0.0),
            record(1, 2, &[("MARKETING", 50.0)], 0.0, 0.0),
        ];
        let totals = aggregate_expenses(&records);
        assert_eq!(totals[0], ExpenseTotal { label: "MARKETING".into(), value: 150.0 });
        assert_eq!(totals[1], ExpenseTotal { label: "CRM".into(), value: 20.0 });
        assert_eq!(totals[2].label, "MATERIAL ESCRITÓRIO");
        assert_eq!(totals[2].value, 10.0);

        assert_eq!(top_expenses(&records, 1).len(), 1);
    }

    #[test]
    fn test_composition_folds_remainder() {
        let items: Vec<(String, f64)> = (0..9).map(|i| (format!("E{}", i), 100.0 - i as f64)).collect();
        let borrowed: Vec<(&str, f64)> = items.iter().map(|(l, v)| (l.as_str(), *v)).collect();
        let records = vec![record(2, 1, &borrowed, 0.0, 0.0)];

        let slices = expense_composition(&records, LabelLocale::PtBr);
        assert_eq!(slices.len(), COMPOSITION_SLICES + 1);
        let last = slices.last().unwrap();
        assert_eq!(last.label, "Outras");
        // E7 (93) + E8 (92) + MATERIAL ESCRITÓRIO (5)
        assert_eq!(last.value, 190.0);
    }

    #[test]
    fn test_totals_and_margin() {
        let records = vec![record(1, 1, &[("A", 40.0)], 200.0, 50.0), record(1, 2, &[], 0.0, -10.0)];
        let totals = HistoryTotals::from_records(&records);
        assert_eq!(totals.total_receipts, 200.0);
        assert_eq!(totals.total_profit, 40.0);
        assert_eq!(totals.average_profit_margin(), 20.0);

        assert_eq!(HistoryTotals::default().average_profit_margin(), 0.0);
        assert_eq!(HistoryTotals::from_records(&records).to_kpis().total_expenses, 40.0);
    }
}
