use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{config::Config, model::Review};

#[derive(Debug, Error)]
pub enum GenAiError {
    #[error("no API key configured")]
    Disabled,
    #[error("request timed out")]
    Timeout,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("endpoint answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

/// Client for a `generateContent` style text-generation endpoint.
#[derive(Clone)]
pub struct GenAi {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl GenAi {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.ai_timeout).build()?;

        Ok(Self {
            client,
            base_url: config.genai_base_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
            timeout: config.ai_timeout,
        })
    }

    /// Sends one prompt and returns the text of the first candidate, which may
    /// be empty.
    pub async fn generate(
        &self,
        model: &str,
        prompt: &str,
        response_schema: Option<Value>,
    ) -> Result<String, GenAiError> {
        let Some(api_key) = &self.api_key else {
            return Err(GenAiError::Disabled);
        };

        let mut body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });
        if let Some(schema) = response_schema {
            body["generationConfig"] = json!({
                "responseMimeType": "application/json",
                "responseSchema": schema,
            });
        }

        let url = format!("{}/models/{model}:generateContent", self.base_url);
        debug!(model, "calling generative endpoint");

        let request = async {
            let resp = self
                .client
                .post(&url)
                .header("x-goog-api-key", api_key)
                .json(&body)
                .send()
                .await?;

            let status = resp.status();
            let text = resp.text().await?;
            if !status.is_success() {
                return Err(GenAiError::Status {
                    status: status.as_u16(),
                    body: text.chars().take(200).collect(),
                });
            }

            let parsed: GenerateResponse = serde_json::from_str(&text)?;
            let text = parsed
                .candidates
                .into_iter()
                .next()
                .and_then(|candidate| candidate.content)
                .map(|content| {
                    content
                        .parts
                        .into_iter()
                        .filter_map(|part| part.text)
                        .collect::<String>()
                })
                .unwrap_or_default();

            Ok::<_, GenAiError>(text)
        };

        tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| GenAiError::Timeout)?
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateIdea {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl RiskLevel {
    /// The first whole-word HIGH, MEDIUM or LOW in a classification.
    pub fn detect(text: &str) -> Option<Self> {
        text.split(|c: char| !c.is_alphanumeric())
            .find_map(|word| match word.to_ascii_uppercase().as_str() {
                "HIGH" => Some(RiskLevel::High),
                "MEDIUM" => Some(RiskLevel::Medium),
                "LOW" => Some(RiskLevel::Low),
                _ => None,
            })
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::High => "HIGH",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::Low => "LOW",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetyVerdict {
    pub risk: Option<RiskLevel>,
    pub summary: String,
}

pub const QUEUED_FOR_REVIEW: &str = "Report received and queued for review.";
pub const REPLY_FALLBACK: &str = "That sounds great! Can't wait.";
pub const REPLY_WHEN_EMPTY: &str = "that sounds cool, when are you free?";

fn idea_fallback() -> DateIdea {
    DateIdea {
        title: "Spontaneous Coffee".to_owned(),
        description: "Let's grab a coffee and walk around the park.".to_owned(),
    }
}

fn idea_when_empty() -> DateIdea {
    DateIdea {
        title: "Spontaneous Walk".to_owned(),
        description: "Exploring the city together.".to_owned(),
    }
}

/// Writing helpers for forms and chats. Every operation answers with a usable
/// value: when the endpoint fails, times out or is not configured, a fixed
/// fallback comes back instead.
#[derive(Clone)]
pub struct Assist {
    genai: GenAi,
    fast_model: String,
    smart_model: String,
}

impl Assist {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self {
            genai: GenAi::new(config)?,
            fast_model: config.fast_model.clone(),
            smart_model: config.smart_model.clone(),
        })
    }

    async fn ask(&self, op: &str, model: &str, prompt: &str, schema: Option<Value>) -> Option<String> {
        match self.genai.generate(model, prompt, schema).await {
            Ok(text) => Some(text),
            Err(GenAiError::Disabled) => {
                debug!(op, "assist disabled, using fallback");
                None
            }
            Err(err) => {
                warn!(op, error = %err, "assist call failed, using fallback");
                None
            }
        }
    }

    pub async fn enhance_description(&self, activity: &str, draft: &str) -> String {
        let prompt = format!(
            "Rewrite this date activity description.\n\
             Activity: {activity}.\n\
             Draft: \"{draft}\".\n\
             Make it read like a cool, adventurous person wrote it. Short and punchy, under 140 characters, no emojis."
        );

        match self.ask("enhance_description", &self.fast_model, &prompt, None).await {
            Some(text) if !text.trim().is_empty() => text.trim().to_owned(),
            _ => draft.to_owned(),
        }
    }

    pub async fn suggest_date_idea(&self, vibe: &str) -> DateIdea {
        let prompt = format!("Suggest a unique date idea for the vibe: {vibe}.");
        let schema = json!({
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING" },
                "description": { "type": "STRING" },
            },
            "required": ["title", "description"],
        });

        let Some(text) = self
            .ask("suggest_date_idea", &self.fast_model, &prompt, Some(schema))
            .await
        else {
            return idea_fallback();
        };

        if text.trim().is_empty() {
            return idea_when_empty();
        }

        match serde_json::from_str::<DateIdea>(text.trim()) {
            Ok(idea) => idea,
            Err(err) => {
                warn!(error = %err, "date idea was not valid JSON, using fallback");
                idea_fallback()
            }
        }
    }

    pub async fn generate_chat_reply(&self, persona: &str, context: &str, incoming: &str) -> String {
        let prompt = format!(
            "Dating app chat simulation.\n\
             You are: {persona}.\n\
             Context: you posted an activity called \"{context}\".\n\
             Message received: \"{incoming}\".\n\
             Reply like a real, casual person in their mid-20s: lowercase where it fits, under 15 words, \
             interested in the person or the activity, witty but polite, never like an AI assistant."
        );

        match self.ask("generate_chat_reply", &self.smart_model, &prompt, None).await {
            Some(text) => {
                let reply = text.replace('"', "");
                if reply.trim().is_empty() {
                    REPLY_WHEN_EMPTY.to_owned()
                } else {
                    reply.trim().to_owned()
                }
            }
            None => REPLY_FALLBACK.to_owned(),
        }
    }

    pub async fn summarize_reviews(&self, reviews: &[Review]) -> Option<String> {
        if reviews.is_empty() {
            return None;
        }

        let comments = reviews
            .iter()
            .map(|review| review.comment.as_str())
            .collect::<Vec<_>>()
            .join(". ");
        let prompt = format!(
            "Analyze these host reviews and extract the dominant personality vibe: \"{comments}\".\n\
             Return a single punchy sentence of about 10 words starting with \"This host is...\""
        );

        self.ask("summarize_reviews", &self.smart_model, &prompt, None)
            .await
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty())
    }

    pub async fn analyze_safety_report(&self, reason: &str, details: &str) -> SafetyVerdict {
        let prompt = format!(
            "A user has been reported on a dating app.\n\
             Reason: {reason}.\n\
             Details: {details}.\n\
             Classify as HIGH, MEDIUM, or LOW risk and give a one-sentence action."
        );

        match self.ask("analyze_safety_report", &self.fast_model, &prompt, None).await {
            Some(text) if !text.trim().is_empty() => SafetyVerdict {
                risk: RiskLevel::detect(&text),
                summary: text.trim().to_owned(),
            },
            _ => SafetyVerdict {
                risk: None,
                summary: QUEUED_FOR_REVIEW.to_owned(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    };

    use axum::{http::HeaderMap, http::StatusCode, response::IntoResponse, Json, Router};

    use super::*;

    fn config(base_url: &str) -> Config {
        Config {
            api_key: Some("test-key".to_owned()),
            genai_base_url: base_url.to_owned(),
            ai_timeout: Duration::from_millis(300),
            ..Config::default()
        }
    }

    fn candidate(text: &str) -> Value {
        json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
    }

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn answering(body: Value) -> String {
        serve(Router::new().fallback(move || {
            let body = body.clone();
            async move { Json(body) }
        }))
        .await
    }

    async fn failing() -> String {
        serve(Router::new().fallback(|| async {
            (StatusCode::TOO_MANY_REQUESTS, "quota exhausted").into_response()
        }))
        .await
    }

    fn reviews() -> Vec<Review> {
        vec![Review {
            id: "r1".to_owned(),
            reviewer_name: "Kabir".to_owned(),
            reviewer_photo: String::new(),
            rating: 5,
            comment: "Showed up on time and picked a great spot".to_owned(),
            timestamp: "Oct 12".to_owned(),
        }]
    }

    async fn assert_all_fallbacks(assist: &Assist) {
        assert_eq!(
            assist.enhance_description("Dining", "pasta on a roof").await,
            "pasta on a roof"
        );
        assert_eq!(assist.suggest_date_idea("adventurous").await, idea_fallback());
        assert_eq!(
            assist.generate_chat_reply("Ananya", "Rooftop Dinner", "hi!").await,
            REPLY_FALLBACK
        );
        assert_eq!(assist.summarize_reviews(&reviews()).await, None);
        assert_eq!(
            assist.analyze_safety_report("spam", "sent links").await,
            SafetyVerdict {
                risk: None,
                summary: QUEUED_FOR_REVIEW.to_owned()
            }
        );
    }

    #[tokio::test]
    async fn http_errors_fall_back() {
        let assist = Assist::new(&config(&failing().await)).unwrap();
        assert_all_fallbacks(&assist).await;
    }

    #[tokio::test]
    async fn unreachable_endpoint_falls_back() {
        let assist = Assist::new(&config("http://127.0.0.1:9")).unwrap();
        assert_all_fallbacks(&assist).await;
    }

    #[tokio::test]
    async fn missing_api_key_falls_back() {
        let assist = Assist::new(&Config::default()).unwrap();
        assert_all_fallbacks(&assist).await;
    }

    #[tokio::test]
    async fn slow_endpoint_times_out() {
        let base = serve(Router::new().fallback(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(candidate("too late"))
        }))
        .await;
        let assist = Assist::new(&config(&base)).unwrap();

        assert_all_fallbacks(&assist).await;
    }

    #[tokio::test]
    async fn malformed_idea_falls_back() {
        let assist = Assist::new(&config(&answering(candidate("{\"title\": ")).await)).unwrap();

        assert_eq!(assist.suggest_date_idea("cozy").await, idea_fallback());
    }

    #[tokio::test]
    async fn empty_answers_use_their_defaults() {
        let assist = Assist::new(&config(&answering(json!({ "candidates": [] })).await)).unwrap();

        assert_eq!(assist.enhance_description("Movie", "films").await, "films");
        assert_eq!(assist.suggest_date_idea("cozy").await, idea_when_empty());
        assert_eq!(
            assist.generate_chat_reply("Ananya", "Rooftop Dinner", "hi").await,
            REPLY_WHEN_EMPTY
        );
        assert_eq!(assist.summarize_reviews(&reviews()).await, None);
        assert_eq!(
            assist.analyze_safety_report("spam", "links").await.summary,
            QUEUED_FOR_REVIEW
        );
    }

    #[tokio::test]
    async fn successful_answers_pass_through() {
        let assist = Assist::new(&config(
            &answering(candidate("  \"sunset kayaking then tacos?\" HIGH  ")).await,
        ))
        .unwrap();

        assert_eq!(
            assist.enhance_description("Outdoor", "kayak").await,
            "\"sunset kayaking then tacos?\" HIGH"
        );
        assert_eq!(
            assist.generate_chat_reply("Ananya", "Rooftop Dinner", "hi").await,
            "sunset kayaking then tacos? HIGH"
        );

        let verdict = assist.analyze_safety_report("harassment", "rude").await;
        assert_eq!(verdict.risk, Some(RiskLevel::High));
    }

    #[tokio::test]
    async fn idea_request_carries_schema_and_key() {
        let seen: Arc<Mutex<Vec<(Option<String>, Value)>>> = Arc::default();
        let recorder = seen.clone();
        let base = serve(Router::new().fallback(move |headers: HeaderMap, Json(body): Json<Value>| {
            let recorder = recorder.clone();
            async move {
                let key = headers
                    .get("x-goog-api-key")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_owned);
                recorder.lock().unwrap().push((key, body));
                Json(candidate(r#"{"title":"Night Market Crawl","description":"Street food, one stall each."}"#))
            }
        }))
        .await;
        let assist = Assist::new(&config(&base)).unwrap();

        let idea = assist.suggest_date_idea("adventurous and unique").await;

        assert_eq!(idea.title, "Night Market Crawl");
        let seen = seen.lock().unwrap();
        let (key, body) = &seen[0];
        assert_eq!(key.as_deref(), Some("test-key"));
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(
            body["generationConfig"]["responseSchema"]["required"],
            json!(["title", "description"])
        );
        assert!(body["contents"][0]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("adventurous and unique"));
    }

    #[tokio::test]
    async fn no_reviews_means_no_request() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let base = serve(Router::new().fallback(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Json(candidate("This host is lovely."))
            }
        }))
        .await;
        let assist = Assist::new(&config(&base)).unwrap();

        assert_eq!(assist.summarize_reviews(&[]).await, None);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert_eq!(
            assist.summarize_reviews(&reviews()).await.as_deref(),
            Some("This host is lovely.")
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn risk_detection_reads_first_level_word() {
        assert_eq!(RiskLevel::detect("high risk: suspend"), Some(RiskLevel::High));
        assert_eq!(RiskLevel::detect("MEDIUM. warn the user"), Some(RiskLevel::Medium));
        assert_eq!(RiskLevel::detect("Low risk, monitor"), Some(RiskLevel::Low));
        assert_eq!(RiskLevel::detect("unclear"), None);
        assert_eq!(
            RiskLevel::detect("LOW risk. Highlight to moderators and monitor."),
            Some(RiskLevel::Low)
        );
        assert_eq!(
            RiskLevel::detect("Unclear severity; follow up with the reporter."),
            None
        );
        assert_eq!(
            RiskLevel::detect("Risk: MEDIUM, could escalate to high"),
            Some(RiskLevel::Medium)
        );
    }
}
