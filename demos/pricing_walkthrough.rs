use chrono::{Duration, Utc};
use pricing_calculator::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("💼 Pricing walkthrough\n");

    let config = CalculatorConfig::from_env()?;
    let mut state = CalculatorState::new(&config);

    for (id, value) in [("fe1", 2500.0), ("fe9", 300.0), ("fe15", 900.0), ("fe21", 250.0)] {
        state.apply(Command::SetItemValue {
            list: ExpenseList::Fixed,
            id: id.to_string(),
            value,
        })?;
    }
    state.apply(Command::SetItemValue {
        list: ExpenseList::Contingency,
        id: "cc1".to_string(),
        value: 180.0,
    })?;
    state.apply(Command::SetClientReceipts(5200.0))?;

    let report = state.report();
    println!("📋 Costs");
    println!("  Fixed:        ${:>10.2}", report.costs.fixed);
    println!("  Contingency:  ${:>10.2}", report.costs.contingency);
    println!("  Total:        ${:>10.2}", report.costs.total);
    println!("\n🎯 Targets");
    println!("  Ideal billing: ${:>10.2}", report.pricing.ideal_monthly_billing);
    println!("  Reserve:       ${:>10.2}", report.pricing.financial_reserve_value);
    println!("  Profit:        ${:>10.2}", report.pricing.profit_value);
    println!("  Per day:       ${:>10.2}", report.pricing.suggested_price_per_day);
    println!("  Per hour:      ${:>10.2}", report.pricing.suggested_price_per_hour);
    println!("\n📈 Realized");
    println!("  Monthly profit:    ${:>10.2}", report.realized.monthly_profit);
    println!("  Ideal minus real:  ${:>10.2}", report.realized.real_vs_ideal_difference);

    // Save a few days of history and print the reports.
    let service = HistoryService::new(InMemoryStore::new());
    let today = Utc::now();
    for days_ago in [21, 14, 9, 2, 0] {
        let receipts = 4800.0 + days_ago as f64 * 25.0;
        state.apply(Command::SetClientReceipts(receipts))?;
        service.save(&state, today - Duration::days(days_ago)).await?;
    }

    println!("\n🗓️  Weekly");
    for week in service.weekly(config.locale).await? {
        println!(
            "  {:<22} {} record(s)  receipts ${:>10.2}  profit ${:>10.2}",
            week.week_year, week.count, week.receipts, week.profit
        );
    }

    println!("\n🗓️  Monthly");
    for month in service.monthly(config.locale).await? {
        println!(
            "  {:<22} {} record(s)  receipts ${:>10.2}  profit ${:>10.2}",
            month.month_year, month.count, month.receipts, month.profit
        );
    }

    let totals = HistoryTotals::from_records(&service.list().await?);
    println!(
        "\n✅ Average margin across history: {:.2}%",
        totals.average_profit_margin()
    );

    Ok(())
}
