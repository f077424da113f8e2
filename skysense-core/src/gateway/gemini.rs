use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::Local;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::model::{Source, WeatherSnapshot};

use super::{GatewayError, WeatherGateway};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gateway backed by the Gemini `generateContent` endpoint with Google
/// Search grounding.
#[derive(Debug, Clone)]
pub struct GeminiGateway {
    api_key: String,
    model: String,
    base_url: String,
    http: Client,
}

impl GeminiGateway {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn request(&self, city: &str) -> Result<WeatherSnapshot> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt(city) }] }],
            "tools": [{ "google_search": {} }],
        });

        debug!(city, model = %self.model, "requesting weather from Gemini");

        let res = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("Failed to send request to Gemini")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("Failed to read Gemini response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Gemini request failed with status {}: {}",
                status,
                truncate_body(&text),
            ));
        }

        let parsed: GmResponse =
            serde_json::from_str(&text).context("Failed to parse Gemini response JSON")?;

        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Gemini response contained no candidates"))?;

        let answer: String = candidate
            .content
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| p.text)
            .collect();

        let payload = parse_payload(&answer)?;
        let sources = candidate
            .grounding_metadata
            .map(|m| collect_sources(m.grounding_chunks))
            .unwrap_or_default();

        Ok(payload.into_snapshot(sources))
    }
}

#[async_trait]
impl WeatherGateway for GeminiGateway {
    async fn fetch_weather(&self, city: &str) -> Result<WeatherSnapshot, GatewayError> {
        self.request(city).await.map_err(|err| {
            warn!(city, error = %format!("{err:#}"), "weather lookup failed");
            GatewayError::NotFoundOrUnavailable(format!("{err:#}"))
        })
    }
}

fn prompt(city: &str) -> String {
    format!(
        "Use Google Search to find the current weather in \"{city}\".\n\
         Reply with a single JSON object and nothing else, using these keys:\n\
         city (resolved city name with country), temperature (Celsius), \
         condition (short label such as \"Partly Cloudy\"), humidity (percent), \
         windSpeed (km/h), feelsLike (Celsius), high (Celsius), low (Celsius), \
         description (one sentence), aiInsights (a short paragraph of practical \
         advice for the day: clothing, activities, anything notable).\n\
         All numbers must be plain JSON numbers.\n\
         If the location cannot be identified, reply with {{\"error\": \"not_found\"}}."
    )
}

/// The JSON object the model is asked to produce.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WeatherPayload {
    city: String,
    temperature: f64,
    condition: String,
    humidity: f64,
    wind_speed: f64,
    feels_like: f64,
    high: f64,
    low: f64,
    #[serde(default)]
    description: String,
    #[serde(default)]
    ai_insights: String,
}

impl WeatherPayload {
    fn into_snapshot(self, sources: Vec<Source>) -> WeatherSnapshot {
        WeatherSnapshot {
            city: self.city,
            temperature: self.temperature,
            condition: self.condition,
            humidity: self.humidity,
            wind_speed: self.wind_speed,
            feels_like: self.feels_like,
            high: self.high,
            low: self.low,
            description: self.description,
            timestamp: Local::now().format("%Y-%m-%d %H:%M").to_string(),
            ai_insights: self.ai_insights,
            sources,
        }
    }
}

/// Pull the weather object out of the model's free-text answer. Only the
/// first JSON value is read; anything after it is ignored.
fn parse_payload(answer: &str) -> Result<WeatherPayload> {
    let start = answer.find('{').ok_or_else(|| {
        anyhow!("Gemini answer contained no JSON object: {}", truncate_body(answer))
    })?;

    let value = serde_json::Deserializer::from_str(&answer[start..])
        .into_iter::<serde_json::Value>()
        .next()
        .ok_or_else(|| anyhow!("Gemini answer ended before a JSON value"))?
        .context("Failed to parse weather JSON from Gemini answer")?;

    if let Some(error) = value.get("error") {
        return Err(anyhow!("Gemini could not resolve the location: {error}"));
    }

    serde_json::from_value(value).context("Gemini weather JSON is missing required fields")
}

fn collect_sources(chunks: Vec<GmGroundingChunk>) -> Vec<Source> {
    let mut sources: Vec<Source> = Vec::new();

    for web in chunks.into_iter().filter_map(|c| c.web) {
        let Some(uri) = web.uri.filter(|u| !u.is_empty()) else {
            continue;
        };
        if sources.iter().any(|s| s.uri == uri) {
            continue;
        }

        let title = web.title.filter(|t| !t.is_empty()).unwrap_or_else(|| uri.clone());
        sources.push(Source { title, uri });
    }

    sources
}

#[derive(Debug, Deserialize)]
struct GmPart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GmContent {
    #[serde(default)]
    parts: Vec<GmPart>,
}

#[derive(Debug, Deserialize)]
struct GmWeb {
    uri: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GmGroundingChunk {
    web: Option<GmWeb>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GmGroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GmGroundingChunk>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GmCandidate {
    content: Option<GmContent>,
    grounding_metadata: Option<GmGroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct GmResponse {
    #[serde(default)]
    candidates: Vec<GmCandidate>,
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
