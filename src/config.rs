use std::{str::FromStr, time::Duration};

use tracing::warn;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub api_key: Option<String>,
    pub genai_base_url: String,
    pub fast_model: String,
    pub smart_model: String,
    pub ai_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://datehub.db?mode=rwc".to_owned(),
            bind_addr: "127.0.0.1:8080".to_owned(),
            api_key: None,
            genai_base_url: "https://generativelanguage.googleapis.com/v1beta".to_owned(),
            fast_model: "gemini-3-flash-preview".to_owned(),
            smart_model: "gemini-3-pro-preview".to_owned(),
            ai_timeout: Duration::from_secs(8),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        let defaults = Self::default();

        Self {
            database_url: dotenv::var("DATABASE_URL").unwrap_or(defaults.database_url),
            bind_addr: dotenv::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            api_key: dotenv::var("API_KEY").ok().filter(|key| !key.trim().is_empty()),
            genai_base_url: dotenv::var("GENAI_BASE_URL").unwrap_or(defaults.genai_base_url),
            fast_model: dotenv::var("GENAI_FAST_MODEL").unwrap_or(defaults.fast_model),
            smart_model: dotenv::var("GENAI_SMART_MODEL").unwrap_or(defaults.smart_model),
            ai_timeout: parsed_var::<u64>("AI_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.ai_timeout),
        }
    }
}

fn parsed_var<T: FromStr>(name: &str) -> Option<T> {
    let raw = dotenv::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(var = name, value = %raw, "ignoring unparseable setting");
            None
        }
    }
}
