//! Closed-form pricing model.
//!
//! Every value here is a pure function of total costs, the profit margin,
//! the reserve percentage and the actual client receipts. Nothing is
//! validated: negative or non-finite inputs flow through to the outputs.

use crate::schema::{CalculatorSnapshot, ExpenseItem};
use serde::{Deserialize, Serialize};

/// Working days used to turn a monthly target into a day rate.
pub const WORKING_DAYS_PER_MONTH: f64 = 20.0;

/// Working hours used to turn a day rate into an hour rate.
pub const WORKING_HOURS_PER_DAY: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PricingInputs {
    pub total_costs: f64,
    pub profit_margin_pct: f64,
    pub reserve_pct: f64,
    pub client_receipts: f64,
}

/// Target figures derived from costs and policy percentages.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PricingBreakdown {
    pub ideal_monthly_billing: f64,
    pub financial_reserve_value: f64,
    pub profit_value: f64,
    pub suggested_price_per_day: f64,
    pub suggested_price_per_hour: f64,
}

/// What the month actually produced compared with the target.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RealizedResult {
    pub monthly_profit: f64,
    pub real_vs_ideal_difference: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PricingReport {
    pub inputs: PricingInputs,
    pub costs: CostTotals,
    pub pricing: PricingBreakdown,
    pub realized: RealizedResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CostTotals {
    pub fixed: f64,
    pub contingency: f64,
    pub total: f64,
}

impl CostTotals {
    pub fn from_snapshot(snapshot: &CalculatorSnapshot) -> Self {
        let fixed = expense_total(&snapshot.fixed_expenses);
        let contingency = expense_total(&snapshot.contingency_costs);
        Self {
            fixed,
            contingency,
            total: fixed + contingency,
        }
    }
}

pub fn expense_total(items: &[ExpenseItem]) -> f64 {
    items.iter().map(|item| item.value).sum()
}

pub struct PricingEngine;

impl PricingEngine {
    pub fn breakdown(total_costs: f64, profit_margin_pct: f64, reserve_pct: f64) -> PricingBreakdown {
        let ideal_monthly_billing =
            total_costs * (1.0 + profit_margin_pct / 100.0 + reserve_pct / 100.0);
        let financial_reserve_value = ideal_monthly_billing * (reserve_pct / 100.0);
        let profit_value = ideal_monthly_billing - total_costs - financial_reserve_value;
        let suggested_price_per_day = ideal_monthly_billing / WORKING_DAYS_PER_MONTH;
        let suggested_price_per_hour = suggested_price_per_day / WORKING_HOURS_PER_DAY;

        PricingBreakdown {
            ideal_monthly_billing,
            financial_reserve_value,
            profit_value,
            suggested_price_per_day,
            suggested_price_per_hour,
        }
    }

    /// The reserve is sized against the ideal billing, not against the
    /// receipts actually collected.
    pub fn realized(
        pricing: &PricingBreakdown,
        total_costs: f64,
        client_receipts: f64,
    ) -> RealizedResult {
        let monthly_profit = client_receipts - total_costs - pricing.financial_reserve_value;
        RealizedResult {
            monthly_profit,
            real_vs_ideal_difference: pricing.profit_value - monthly_profit,
        }
    }

    pub fn calculate(inputs: &PricingInputs) -> (PricingBreakdown, RealizedResult) {
        let pricing = Self::breakdown(
            inputs.total_costs,
            inputs.profit_margin_pct,
            inputs.reserve_pct,
        );
        let realized = Self::realized(&pricing, inputs.total_costs, inputs.client_receipts);
        (pricing, realized)
    }
}

impl PricingReport {
    pub fn from_snapshot(snapshot: &CalculatorSnapshot) -> Self {
        let costs = CostTotals::from_snapshot(snapshot);
        let inputs = PricingInputs {
            total_costs: costs.total,
            profit_margin_pct: snapshot.profit_margin,
            reserve_pct: snapshot.financial_reserve_percentage,
            client_receipts: snapshot.client_receipts,
        };
        let (pricing, realized) = PricingEngine::calculate(&inputs);

        Self {
            inputs,
            costs,
            pricing,
            realized,
        }
    }
}
