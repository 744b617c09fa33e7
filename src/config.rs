use anyhow::{Context, Result};

use crate::pricing::rates::{env_var_for, RATE_NAMES};
use crate::pricing::PricingRates;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub templates_glob: String,
    pub allowed_origins: Vec<String>,
    pub rates: PricingRates,
    /// Where the active rate table came from, for `/health`.
    pub rates_source: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port: u16 = lookup("PORT")
            .unwrap_or_else(|| "8890".into())
            .parse()
            .context("PORT must be a number")?;

        let templates_glob =
            lookup("TEMPLATES_GLOB").unwrap_or_else(|| "templates/**/*.html".into());

        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let (mut rates, mut rates_source) = match lookup("CREDIT_RATES_FILE") {
            Some(path) => {
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading CREDIT_RATES_FILE {}", path))?;
                let rates: PricingRates = serde_json::from_str(&raw)
                    .with_context(|| format!("parsing CREDIT_RATES_FILE {}", path))?;
                (rates, path)
            }
            None => (PricingRates::default(), "defaults".to_string()),
        };

        let mut overridden = 0;
        for name in RATE_NAMES {
            let key = env_var_for(name);
            if let Some(raw) = lookup(&key) {
                let value: f64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("{} must be a number", key))?;
                rates.set(name, value)?;
                overridden += 1;
            }
        }
        if overridden > 0 {
            rates_source = format!("{} + {} env override(s)", rates_source, overridden);
        }

        rates.validate().context("credit rate table is invalid")?;

        Ok(Config {
            port,
            templates_glob,
            allowed_origins,
            rates,
            rates_source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8890);
        assert_eq!(config.templates_glob, "templates/**/*.html");
        assert!(config.allowed_origins.is_empty());
        assert_eq!(config.rates, PricingRates::default());
        assert_eq!(config.rates_source, "defaults");
    }

    #[test]
    fn env_overrides_single_rates() {
        let config = config_from(&[
            ("CREDITS_OCR_PER_MB", "0.75"),
            ("CREDITS_PERSONA_CHAT_FIRST_GENERATION", "9"),
            ("ALLOWED_ORIGINS", "https://a.example, https://b.example,"),
        ])
        .unwrap();
        assert_eq!(config.rates.ocr.per_mb, 0.75);
        assert_eq!(config.rates.persona_chat.first_generation, 9.0);
        assert_eq!(config.rates_source, "defaults + 2 env override(s)");
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn rejects_bad_values() {
        assert!(config_from(&[("PORT", "eighty")]).is_err());
        assert!(config_from(&[("CREDITS_OCR_BASE", "cheap")]).is_err());
        assert!(config_from(&[("CREDITS_OCR_BASE", "-1")]).is_err());
        assert!(config_from(&[("CREDITS_PERSONA_CHAT_FOLLOW_UP_MESSAGE", "100")]).is_err());
    }

    #[test]
    fn loads_partial_rate_file() {
        let path = std::env::temp_dir()
            .join(format!("persona-credits-rates-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"concept_simulation": {"base": 7.5}}"#).unwrap();
        let path_str = path.to_string_lossy().to_string();

        let config = config_from(&[
            ("CREDIT_RATES_FILE", path_str.as_str()),
            ("CREDITS_CONCEPT_SIMULATION_PER_PERSONA", "4"),
        ])
        .unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.rates.concept_simulation.base, 7.5);
        assert_eq!(config.rates.concept_simulation.per_persona, 4.0);
        assert_eq!(config.rates.ocr, PricingRates::default().ocr);
        assert_eq!(config.rates_source, format!("{} + 1 env override(s)", path_str));
    }

    #[test]
    fn missing_rate_file_is_an_error() {
        let err = config_from(&[("CREDIT_RATES_FILE", "/nonexistent/rates.json")]).unwrap_err();
        assert!(err.to_string().contains("CREDIT_RATES_FILE"));
    }
}
