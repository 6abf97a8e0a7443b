use anyhow::{Result, anyhow};
use axum::{Json, extract::State};
use serde_json::{Value, json};
use tracing::warn;

use murmur_types::api::SuggestionsResponse;

use crate::auth::AppState;

const GEMINI_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent";

const THEMES: [&str; 4] = [
    "motivational and encouraging",
    "thoughtful and caring",
    "friendly and supportive",
    "uplifting and positive",
];

const FALLBACK: [&str; 3] = [
    "What's something that made you smile today?",
    "You're doing better than you think you are.",
    "If you could master one skill overnight, what would it be?",
];

/// Best-effort generative collaborator. Advisory UI content only: any
/// upstream problem (no key, network error, malformed reply) falls back to
/// the static list and never surfaces as an error.
pub struct Suggester {
    client: reqwest::Client,
    api_key: Option<String>,
}

impl Suggester {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }

    pub async fn suggest(&self) -> Vec<String> {
        match self.generate().await {
            Ok(suggestions) if !suggestions.is_empty() => suggestions,
            Ok(_) => fallback(),
            Err(e) => {
                warn!("suggestion upstream failed, serving fallback: {:#}", e);
                fallback()
            }
        }
    }

    async fn generate(&self) -> Result<Vec<String>> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("no suggestions API key configured"))?;

        let now = chrono::Utc::now().timestamp_millis();
        let theme = THEMES[now as usize % THEMES.len()];
        let prompt = format!(
            "Generate 3 unique {theme} anonymous messages to brighten someone's day. \
             Keep each under 50 characters and separate them with ||. \
             Random seed: {now}"
        );

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": 1.2,
                "topP": 0.9,
                "maxOutputTokens": 150,
            },
        });

        let response: Value = self
            .client
            .post(format!("{GEMINI_URL}?key={key}"))
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let text = response["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| anyhow!("unexpected response shape"))?;

        Ok(text
            .split("||")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect())
    }
}

fn fallback() -> Vec<String> {
    FALLBACK.iter().map(|s| s.to_string()).collect()
}

/// Always 200: suggestions are advisory and must never block message intake.
pub async fn suggest_messages(State(state): State<AppState>) -> Json<SuggestionsResponse> {
    Json(SuggestionsResponse {
        suggestions: state.suggester.suggest().await,
    })
}
