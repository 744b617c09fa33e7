use crate::config::Config;
use crate::pricing::CreditCalculator;
use std::sync::Arc;
use tera::Tera;

#[derive(Clone)]
pub struct AppState {
    pub tera: Arc<Tera>,
    pub config: Arc<Config>,
    pub calculator: Arc<CreditCalculator>,
}

impl AppState {
    pub fn new(config: Config, tera: Tera) -> anyhow::Result<Self> {
        let calculator = CreditCalculator::new(config.rates)?;
        Ok(Self {
            tera: Arc::new(tera),
            config: Arc::new(config),
            calculator: Arc::new(calculator),
        })
    }
}
