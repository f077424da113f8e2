use async_trait::async_trait;
use std::fmt::Debug;

use crate::{Config, WeatherSnapshot, gateway::gemini::GeminiGateway};

pub mod gemini;

/// The only failure the gateway reports. Lookup misses, transport errors and
/// unusable responses all end up here; the payload is for logs.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("city not found or service unavailable: {0}")]
    NotFoundOrUnavailable(String),
}

/// Turns a city name into a weather snapshot with AI commentary.
#[async_trait]
pub trait WeatherGateway: Send + Sync + Debug {
    async fn fetch_weather(&self, city: &str) -> Result<WeatherSnapshot, GatewayError>;
}

/// Construct the Gemini gateway from config.
pub fn gateway_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherGateway>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No Gemini API key configured.\n\
                 Hint: run `skysense configure` or set SKYSENSE_API_KEY."
        )
    })?;

    let gateway = GeminiGateway::new(api_key)
        .with_model(config.model())
        .with_base_url(config.base_url());

    Ok(Box::new(gateway))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeminiConfig;

    #[test]
    fn gateway_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = gateway_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No Gemini API key configured"));
    }

    #[test]
    fn gateway_from_config_works_when_key_set() {
        let cfg = Config {
            gemini: GeminiConfig {
                api_key: Some("KEY".into()),
                ..GeminiConfig::default()
            },
            ..Config::default()
        };

        assert!(gateway_from_config(&cfg).is_ok());
    }

    #[test]
    fn error_message_is_generic() {
        let err = GatewayError::NotFoundOrUnavailable("status 500".into());
        assert!(err.to_string().starts_with("city not found or service unavailable"));
    }
}
