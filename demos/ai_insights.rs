use chrono::{Duration, Utc};
use pricing_calculator::llm::InsightGenerator;
use pricing_calculator::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = CalculatorConfig::from_env()?;
    let generator = InsightGenerator::from_config(&config)?;

    let mut state = CalculatorState::new(&config);
    state.apply(Command::SetItemValue {
        list: ExpenseList::Fixed,
        id: "fe1".to_string(),
        value: 2500.0,
    })?;
    state.apply(Command::SetItemValue {
        list: ExpenseList::Fixed,
        id: "fe22".to_string(),
        value: 650.0,
    })?;

    let now = Utc::now();
    let history: Vec<DailyRecord> = [4200.0, 3900.0, 4600.0]
        .iter()
        .enumerate()
        .map(|(i, receipts)| {
            let mut snap = state.snapshot();
            snap.client_receipts = *receipts;
            build_record(snap, now - Duration::days(7 * i as i64)).with_id(i.to_string())
        })
        .collect();

    println!("🤖 Asking {} for insights...", config.gemini_model);
    let insights = generator.summarize(&history).await?;

    println!("\n📊 KPIs");
    println!("  Receipts: ${:.2}", insights.kpis.total_receipts);
    println!("  Expenses: ${:.2}", insights.kpis.total_expenses);
    println!("  Profit:   ${:.2}", insights.kpis.total_profit);
    println!("  Margin:   {:.2}%", insights.kpis.average_profit_margin);

    println!("\n💸 Top expenses");
    for expense in &insights.cost_analysis.top_expenses {
        println!("  {:<30} ${:.2}", expense.label, expense.value);
    }

    println!("\n⚠️  Alerts");
    for alert in &insights.alerts {
        println!("  - {}", alert);
    }

    Ok(())
}
