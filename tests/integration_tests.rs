use chrono::{DateTime, TimeZone, Utc};
use pricing_calculator::*;
use std::collections::HashMap;

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 14, 0, 0).unwrap()
}

fn snapshot(rent: f64, supplies: f64, receipts: f64) -> CalculatorSnapshot {
    CalculatorSnapshot {
        fixed_expenses: vec![
            ExpenseItem::new("fe15", "ALUGUEL DA SALA", rent),
            ExpenseItem::new("fe9", "MARKETING", 120.0),
        ],
        contingency_costs: vec![ExpenseItem::new("cc1", "REPOSIÇÃO DE ESTOQUE(DESCARTÁVEIS)", supplies)],
        profit_margin: 20.0,
        financial_reserve_percentage: 10.0,
        client_receipts: receipts,
    }
}

fn saved(id: &str, when: DateTime<Utc>, snap: CalculatorSnapshot) -> DailyRecord {
    build_record(snap, when).with_id(id)
}

fn sums_by_label(summaries: &[MonthlySummary]) -> HashMap<String, (f64, f64, f64, usize)> {
    summaries
        .iter()
        .map(|s| (s.month_year.clone(), (s.receipts, s.expenses, s.profit, s.count)))
        .collect()
}

#[test]
fn test_reference_pricing_chain() {
    let inputs = PricingInputs {
        total_costs: 1000.0,
        profit_margin_pct: 20.0,
        reserve_pct: 10.0,
        client_receipts: 1500.0,
    };
    let (pricing, realized) = PricingEngine::calculate(&inputs);

    assert!((pricing.ideal_monthly_billing - 1300.0).abs() < 1e-9);
    assert!((pricing.financial_reserve_value - 130.0).abs() < 1e-9);
    assert!((pricing.profit_value - 170.0).abs() < 1e-9);
    assert!((pricing.suggested_price_per_day - 65.0).abs() < 1e-9);
    assert!((pricing.suggested_price_per_hour - 8.125).abs() < 1e-9);
    assert!((realized.monthly_profit - 370.0).abs() < 1e-9);
    assert!((realized.real_vs_ideal_difference + 200.0).abs() < 1e-9);
}

#[test]
fn test_calculator_session_matches_engine() {
    let mut state = CalculatorState::default();
    for (list, id, value) in [
        (ExpenseList::Fixed, "fe1", 700.0),
        (ExpenseList::Fixed, "fe10", 100.0),
        (ExpenseList::Contingency, "cc2", 200.0),
    ] {
        state
            .apply(Command::SetItemValue {
                list,
                id: id.to_string(),
                value,
            })
            .unwrap();
    }
    state.apply(Command::SetClientReceipts(1500.0)).unwrap();

    let report = state.report();
    let pricing = PricingEngine::breakdown(1000.0, 20.0, 10.0);
    assert_eq!(report.costs.total, 1000.0);
    assert_eq!(report.pricing, pricing);
    assert!((report.realized.monthly_profit - 370.0).abs() < 1e-9);
}

#[test]
fn test_new_year_sunday_belongs_to_previous_iso_week() {
    let records = vec![
        saved("2", at(2023, 1, 1), snapshot(500.0, 10.0, 900.0)),
        saved("1", at(2022, 12, 29), snapshot(500.0, 10.0, 800.0)),
    ];

    let weeks = weekly_summaries(&records, LabelLocale::PtBr);
    assert_eq!(weeks.len(), 1);
    assert_eq!(weeks[0].week_year, "Semana 52 de 2022");
    assert_eq!(weeks[0].count, 2);
    assert_eq!(weeks[0].receipts, 1700.0);

    // Monthly buckets stay on the calendar.
    let months = monthly_summaries(&records, LabelLocale::PtBr);
    assert_eq!(months.len(), 2);
    assert_eq!(months[0].month_year, "Janeiro de 2023");
    assert_eq!(months[1].month_year, "Dezembro de 2022");
}

#[test]
fn test_monthly_order_follows_first_entry_dates() {
    let records = vec![
        saved("a", at(2024, 3, 5), snapshot(100.0, 0.0, 0.0)),
        saved("b", at(2024, 1, 10), snapshot(100.0, 0.0, 0.0)),
        saved("c", at(2024, 2, 20), snapshot(100.0, 0.0, 0.0)),
    ];
    let labels: Vec<String> = monthly_summaries(&records, LabelLocale::PtBr)
        .into_iter()
        .map(|m| m.month_year)
        .collect();
    assert_eq!(labels, vec!["Março de 2024", "Fevereiro de 2024", "Janeiro de 2024"]);
}

#[test]
fn test_aggregation_is_additive_over_disjoint_sets() {
    let left = vec![
        saved("1", at(2024, 4, 30), snapshot(600.0, 20.0, 1000.0)),
        saved("2", at(2024, 4, 2), snapshot(600.0, 35.0, 700.0)),
    ];
    let right = vec![
        saved("3", at(2024, 5, 3), snapshot(650.0, 0.0, 1200.0)),
        saved("4", at(2024, 4, 15), snapshot(600.0, 12.5, 950.0)),
    ];
    let mut union = left.clone();
    union.extend(right.clone());
    union.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let l = sums_by_label(&monthly_summaries(&left, LabelLocale::EnUs));
    let r = sums_by_label(&monthly_summaries(&right, LabelLocale::EnUs));
    let u = sums_by_label(&monthly_summaries(&union, LabelLocale::EnUs));

    let april = "April 2024";
    let (lr, le, lp, lc) = l[april];
    let (rr, re, rp, rc) = r[april];
    let (ur, ue, up, uc) = u[april];
    assert!((ur - (lr + rr)).abs() < 1e-9);
    assert!((ue - (le + re)).abs() < 1e-9);
    assert!((up - (lp + rp)).abs() < 1e-9);
    assert_eq!(uc, lc + rc);

    assert_eq!(
        monthly_summaries(&union, LabelLocale::EnUs),
        monthly_summaries(&union, LabelLocale::EnUs)
    );
}

#[test]
fn test_empty_history() {
    let report = process_history(Vec::new(), LabelLocale::PtBr);
    assert!(report.weekly.is_empty());
    assert!(report.monthly.is_empty());
    assert_eq!(report.totals, HistoryTotals::default());
    assert!(expense_composition(&report.records, LabelLocale::PtBr).is_empty());
}

#[test]
fn test_persisted_row_with_missing_fields_loads_as_zero() -> anyhow::Result<()> {
    let raw = r#"[
        { "id": "1", "createdDate": "2024-06-03T09:00:00Z", "receipts": 400.0,
          "snapshot": { "fixedExpenses": [{ "id": "fe1", "label": "CRM", "value": 50.0 }] } },
        { "id": "2", "createdDate": "2024-06-01T09:00:00Z" }
    ]"#;
    let records: Vec<DailyRecord> = serde_json::from_str(raw)?;

    assert_eq!(records[1].snapshot, CalculatorSnapshot::default());
    assert!(records[1].is_consistent(0.01));
    // Row 1 has receipts but a zeroed snapshot, so its cache is stale.
    assert!(!records[0].is_consistent(0.01));

    let months = monthly_summaries(&records, LabelLocale::EnUs);
    assert_eq!(months[0].receipts, 400.0);
    Ok(())
}

#[tokio::test]
async fn test_save_edit_delete_cycle() -> anyhow::Result<()> {
    let service = HistoryService::new(InMemoryStore::new());
    let mut state = CalculatorState::default();

    state.apply(Command::SetItemValue {
        list: ExpenseList::Fixed,
        id: "fe15".to_string(),
        value: 900.0,
    })?;
    state.apply(Command::AddItem(ExpenseList::Contingency))?;
    let new_id = state.contingency_costs().last().map(|i| i.id.clone()).unwrap();
    state.apply(Command::SetItemLabel {
        list: ExpenseList::Contingency,
        id: new_id.clone(),
        label: "PRODUTOS".to_string(),
    })?;
    state.apply(Command::SetItemValue {
        list: ExpenseList::Contingency,
        id: new_id,
        value: 100.0,
    })?;
    state.apply(Command::SetClientReceipts(1500.0))?;

    let first = service.save(&state, at(2024, 7, 1)).await?;
    state.reset();
    state.apply(Command::SetItemValue {
        list: ExpenseList::Fixed,
        id: "fe15".to_string(),
        value: 1000.0,
    })?;
    state.apply(Command::SetClientReceipts(1100.0))?;
    let second = service.save(&state, at(2024, 7, 9)).await?;
    assert_ne!(first.id(), second.id());

    let records = service.list().await?;
    assert_eq!(records[0].id, second.id());
    assert_eq!(records[1].expenses, 1000.0);
    assert!((records[1].profit - 370.0).abs() < 1e-9);

    // Re-open the first record for editing; the update moves it to the top.
    let mut editor = CalculatorState::default();
    editor.apply(Command::LoadRecord {
        record: service.find(first.id()).await?,
        mode: OpenMode::Edit,
    })?;
    editor.apply(Command::SetClientReceipts(2000.0))?;
    let updated = service.save(&editor, at(2024, 7, 20)).await?;
    assert_eq!(updated, SaveOutcome::Updated(first.id().to_string()));

    let records = service.list().await?;
    assert_eq!(records[0].id, first.id());
    assert!((records[0].profit - 870.0).abs() < 1e-9);

    let composition = expense_composition(&records, LabelLocale::PtBr);
    assert_eq!(composition[0].label, "ALUGUEL DA SALA");
    assert_eq!(composition[0].value, 1900.0);

    service.delete(second.id()).await?;
    assert_eq!(service.list().await?.len(), 1);
    assert!(service.delete(second.id()).await.is_err());
    Ok(())
}

#[test]
fn test_insight_schema_describes_kpis() {
    let schema = InsightData::schema_as_json().unwrap();
    assert!(schema.contains("totalReceipts"));
    assert!(schema.contains("alerts"));
}
