use crate::error::{CalculatorError, Result};
use chrono::Locale;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_PROFIT_MARGIN: f64 = 20.0;
pub const DEFAULT_RESERVE_PERCENTAGE: f64 = 10.0;
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Language used for period labels, chart labels and AI alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LabelLocale {
    #[default]
    #[serde(rename = "pt-BR")]
    PtBr,
    #[serde(rename = "en-US")]
    EnUs,
}

impl LabelLocale {
    pub fn chrono_locale(self) -> Locale {
        match self {
            Self::PtBr => Locale::pt_BR,
            Self::EnUs => Locale::en_US,
        }
    }

    pub fn week_label(self, iso_week: u32, iso_year: i32) -> String {
        match self {
            Self::PtBr => format!("Semana {} de {}", iso_week, iso_year),
            Self::EnUs => format!("Week {} of {}", iso_week, iso_year),
        }
    }

    /// chrono format string for the long "month + year" label.
    pub fn month_year_format(self) -> &'static str {
        match self {
            Self::PtBr => "%B de %Y",
            Self::EnUs => "%B %Y",
        }
    }

    /// chrono format string for compact chart axis labels.
    pub fn short_month_format(self) -> &'static str {
        match self {
            Self::PtBr => "%b. de %y",
            Self::EnUs => "%b %y",
        }
    }

    pub fn other_expenses_label(self) -> &'static str {
        match self {
            Self::PtBr => "Outras",
            Self::EnUs => "Other",
        }
    }

    pub fn language_name(self) -> &'static str {
        match self {
            Self::PtBr => "Brazilian Portuguese",
            Self::EnUs => "English",
        }
    }

    pub fn parse(code: &str) -> Result<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "pt-br" | "pt_br" | "pt" => Ok(Self::PtBr),
            "en-us" | "en_us" | "en" => Ok(Self::EnUs),
            other => Err(CalculatorError::Config(format!(
                "Unsupported locale '{}'. Expected 'pt-BR' or 'en-US'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Base URL of the project, e.g. `https://xyz.supabase.co`.
    pub url: String,
    pub table: String,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_store_key_env")]
    pub api_key_env: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    pub default_profit_margin: f64,
    pub default_reserve_percentage: f64,
    pub locale: LabelLocale,
    pub gemini_model: String,
    pub gemini_api_key_env: String,
    pub store: Option<StoreSettings>,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            default_profit_margin: DEFAULT_PROFIT_MARGIN,
            default_reserve_percentage: DEFAULT_RESERVE_PERCENTAGE,
            locale: LabelLocale::default(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_api_key_env: "GEMINI_API_KEY".to_string(),
            store: None,
        }
    }
}

fn default_store_key_env() -> String {
    "SUPABASE_KEY".to_string()
}

impl CalculatorConfig {
    /// Reads a JSON config file; fields it omits keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading calculator config from {}", path.display());
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|var| std::env::var(var).ok())
    }

    /// Applies `PRICING_LOCALE`, `GEMINI_MODEL`, `SUPABASE_URL` and
    /// `SUPABASE_TABLE` as resolved by `lookup`. Without a configured store,
    /// the two store variables must be set together.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(locale) = lookup("PRICING_LOCALE") {
            self.locale = LabelLocale::parse(&locale)?;
        }
        if let Some(model) = lookup("GEMINI_MODEL") {
            self.gemini_model = model;
        }

        let url = lookup("SUPABASE_URL");
        let table = lookup("SUPABASE_TABLE");
        if let Some(store) = self.store.as_mut() {
            if let Some(url) = url {
                store.url = url;
            }
            if let Some(table) = table {
                store.table = table;
            }
        } else {
            match (url, table) {
                (Some(url), Some(table)) => {
                    self.store = Some(StoreSettings {
                        url,
                        table,
                        api_key_env: default_store_key_env(),
                    });
                }
                (None, None) => {}
                (Some(_), None) => {
                    return Err(CalculatorError::Config(
                        "SUPABASE_URL is set but SUPABASE_TABLE is not".to_string(),
                    ));
                }
                (None, Some(_)) => {
                    return Err(CalculatorError::Config(
                        "SUPABASE_TABLE is set but SUPABASE_URL is not".to_string(),
                    ));
                }
            }
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.default_profit_margin.is_finite() || !self.default_reserve_percentage.is_finite()
        {
            return Err(CalculatorError::Config(
                "Default percentages must be finite numbers".to_string(),
            ));
        }
        if self.gemini_model.trim().is_empty() {
            return Err(CalculatorError::Config(
                "gemini_model must not be empty".to_string(),
            ));
        }
        if let Some(store) = &self.store {
            if store.url.trim().is_empty() || store.table.trim().is_empty() {
                return Err(CalculatorError::Config(
                    "store.url and store.table must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Reads the API key named by `gemini_api_key_env`.
    pub fn gemini_api_key(&self) -> Result<String> {
        read_secret(&self.gemini_api_key_env)
    }
}

pub(crate) fn read_secret(var: &str) -> Result<String> {
    std::env::var(var)
        .map_err(|_| CalculatorError::Config(format!("Environment variable {} is not set", var)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = CalculatorConfig::default();
        assert_eq!(config.default_profit_margin, 20.0);
        assert_eq!(config.default_reserve_percentage, 10.0);
        assert_eq!(config.locale, LabelLocale::PtBr);
        assert_eq!(config.gemini_model, "gemini-2.5-flash");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let path = std::env::temp_dir().join(format!(
            "pricing-calculator-config-{}.json",
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{ "locale": "en-US", "store": {{ "url": "https://example.supabase.co", "table": "summaries" }} }}"#
        )
        .unwrap();
        drop(file);

        let config = CalculatorConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.locale, LabelLocale::EnUs);
        assert_eq!(config.default_profit_margin, 20.0);
        let store = config.store.unwrap();
        assert_eq!(store.table, "summaries");
        assert_eq!(store.api_key_env, "SUPABASE_KEY");
    }

    #[test]
    fn test_invalid_store_rejected() {
        let config = CalculatorConfig {
            store: Some(StoreSettings {
                url: String::new(),
                table: "t".to_string(),
                api_key_env: "K".to_string(),
            }),
            ..CalculatorConfig::default()
        };
        assert!(matches!(config.validate(), Err(CalculatorError::Config(_))));
    }

    #[test]
    fn test_locale_parsing_and_labels() {
        assert_eq!(LabelLocale::parse("pt-BR").unwrap(), LabelLocale::PtBr);
        assert_eq!(LabelLocale::parse("EN").unwrap(), LabelLocale::EnUs);
        assert!(LabelLocale::parse("fr").is_err());
        assert_eq!(LabelLocale::PtBr.week_label(30, 2024), "Semana 30 de 2024");
        assert_eq!(LabelLocale::EnUs.week_label(1, 2026), "Week 1 of 2026");
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: std::collections::HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn with_store() -> CalculatorConfig {
        CalculatorConfig {
            store: Some(StoreSettings {
                url: "https://old.supabase.co".to_string(),
                table: "old_table".to_string(),
                api_key_env: "CUSTOM_KEY".to_string(),
            }),
            ..CalculatorConfig::default()
        }
    }

    #[test]
    fn test_overrides_without_variables_keep_config() {
        let config = CalculatorConfig::default().with_overrides(vars(&[])).unwrap();
        assert_eq!(config, CalculatorConfig::default());
    }

    #[test]
    fn test_overrides_locale_and_model() {
        let config = CalculatorConfig::default()
            .with_overrides(vars(&[("PRICING_LOCALE", "en-US"), ("GEMINI_MODEL", "gemini-pro")]))
            .unwrap();
        assert_eq!(config.locale, LabelLocale::EnUs);
        assert_eq!(config.gemini_model, "gemini-pro");

        let err = CalculatorConfig::default()
            .with_overrides(vars(&[("PRICING_LOCALE", "fr-FR")]))
            .unwrap_err();
        assert!(matches!(err, CalculatorError::Config(_)));
    }

    #[test]
    fn test_store_created_from_url_and_table() {
        let config = CalculatorConfig::default()
            .with_overrides(vars(&[
                ("SUPABASE_URL", "https://new.supabase.co"),
                ("SUPABASE_TABLE", "summaries"),
            ]))
            .unwrap();
        let store = config.store.unwrap();
        assert_eq!(store.url, "https://new.supabase.co");
        assert_eq!(store.table, "summaries");
        assert_eq!(store.api_key_env, "SUPABASE_KEY");
    }

    #[test]
    fn test_half_store_variables_rejected_without_store() {
        for pairs in [
            [("SUPABASE_URL", "https://new.supabase.co")],
            [("SUPABASE_TABLE", "summaries")],
        ] {
            let err = CalculatorConfig::default()
                .with_overrides(vars(&pairs))
                .unwrap_err();
            assert!(matches!(err, CalculatorError::Config(_)));
        }
    }

    #[test]
    fn test_single_store_variable_updates_existing_store() {
        let config = with_store()
            .with_overrides(vars(&[("SUPABASE_TABLE", "summaries")]))
            .unwrap();
        let store = config.store.unwrap();
        assert_eq!(store.url, "https://old.supabase.co");
        assert_eq!(store.table, "summaries");
        assert_eq!(store.api_key_env, "CUSTOM_KEY");

        let config = with_store()
            .with_overrides(vars(&[("SUPABASE_URL", "https://new.supabase.co")]))
            .unwrap();
        let store = config.store.unwrap();
        assert_eq!(store.url, "https://new.supabase.co");
        assert_eq!(store.table, "old_table");
    }
}
