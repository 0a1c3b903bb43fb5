use crate::config::LabelLocale;

pub const ANALYST_SYSTEM_PROMPT: &str = "You are a financial analyst who specializes in small \
house-cleaning businesses. You read a history of daily pricing summaries and return KPIs, a cost \
structure analysis and practical alerts for the business owner. Respond strictly with JSON that \
matches the provided schema. Do not add any explanation or text outside the JSON.";

const ANALYSIS_STEPS: &str = "\
Key points to analyze:
1. KPIs: compute total receipts, total expenses and total profit by summing the values of every \
summary. Compute the average profit margin as (totalProfit / totalReceipts) * 100, or 0 when \
receipts are 0.
2. Cost analysis: find the most significant expenses. Sum the values of every expense that shares \
the same 'label' across all 'snapshot.fixedExpenses' and 'snapshot.contingencyCosts'. Return the 5 \
expenses with the largest totals.
3. Alerts: based on the data, write 3 to 5 actionable alerts or recommendations. Compare expenses \
with receipts, identify trends and suggest improvements. Be concise and use currency values to \
show the impact. Example: 'Vehicle costs are X% of expenses. Cutting them by 10% would raise \
profit by $ Y.'";

/// User turn for the insight request: instructions followed by the history
/// serialized as a JSON array.
pub fn insight_request(history_json: &str, locale: LabelLocale) -> String {
    format!(
        "Analyze the historical data below: a JSON array of daily summaries.\n\
         {}\n\
         Write every alert in {}.\n\n\
         Here is the data: {}",
        ANALYSIS_STEPS,
        locale.language_name(),
        history_json
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_embeds_history_and_language() {
        let prompt = insight_request("[{\"id\":\"1\"}]", LabelLocale::PtBr);
        assert!(prompt.contains("Brazilian Portuguese"));
        assert!(prompt.ends_with("[{\"id\":\"1\"}]"));
        assert!(prompt.contains("Return the 5 expenses"));
    }
}
