use crate::config::{CalculatorConfig, LabelLocale};
use crate::error::{CalculatorError, Result};
use crate::llm::client::GeminiClient;
use crate::llm::prompts::{insight_request, ANALYST_SYSTEM_PROMPT};
use crate::schema::{DailyRecord, InsightData};
use log::info;
use schemars::gen::SchemaSettings;
use schemars::JsonSchema;

/// Keywords the Gemini response schema does not accept.
const UNSUPPORTED_SCHEMA_KEYS: [&str; 6] = [
    "$schema",
    "definitions",
    "title",
    "additionalProperties",
    "default",
    "examples",
];

/// Turns history into [`InsightData`] through one model call.
pub struct InsightGenerator {
    client: GeminiClient,
    model: String,
    locale: LabelLocale,
}

impl InsightGenerator {
    pub fn new(client: GeminiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            locale: LabelLocale::default(),
        }
    }

    pub fn from_config(config: &CalculatorConfig) -> Result<Self> {
        let client = GeminiClient::new(config.gemini_api_key()?);
        Ok(Self::new(client, config.gemini_model.clone()).with_locale(config.locale))
    }

    pub fn with_locale(mut self, locale: LabelLocale) -> Self {
        self.locale = locale;
        self
    }

    pub async fn summarize(&self, history: &[DailyRecord]) -> Result<InsightData> {
        if history.is_empty() {
            return Err(CalculatorError::EmptyHistory);
        }

        info!(
            "Generating insights for {} records with {}",
            history.len(),
            self.model
        );

        let history_json = serde_json::to_string(history)?;
        let raw = self
            .client
            .generate_content(
                &self.model,
                ANALYST_SYSTEM_PROMPT,
                insight_request(&history_json, self.locale),
                Some(gemini_schema::<InsightData>()?),
            )
            .await?;

        parse_insights(&raw)
    }
}

/// Parses a model reply; anything that is not a complete `InsightData`
/// object is a failure.
pub fn parse_insights(raw: &str) -> Result<InsightData> {
    serde_json::from_str(clean_json_output(raw))
        .map_err(|e| CalculatorError::Insight(format!("Malformed insight response: {}", e)))
}

/// JSON schema for `T` in the OpenAPI subset the Gemini API accepts:
/// subschemas inlined, unsupported keywords removed.
pub fn gemini_schema<T: JsonSchema>() -> Result<serde_json::Value> {
    let generator = SchemaSettings::openapi3()
        .with(|s| s.inline_subschemas = true)
        .into_generator();
    let mut value = serde_json::to_value(generator.into_root_schema_for::<T>())?;
    strip_unsupported(&mut value);
    Ok(value)
}

fn strip_unsupported(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            for key in UNSUPPORTED_SCHEMA_KEYS {
                map.remove(key);
            }
            map.values_mut().for_each(strip_unsupported);
        }
        serde_json::Value::Array(items) => items.iter_mut().for_each(strip_unsupported),
        _ => {}
    }
}

fn clean_json_output(raw: &str) -> &str {
    let trimmed = raw.trim();
    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    }
}
