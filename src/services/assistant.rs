use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::models::Profile;

const SYSTEM_PROMPT: &str = "You are a digital assistant mimicking the user's conversational style.";

/// Errors that can occur when generating a reply
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Model returned no reply")]
    EmptyReply,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat completions endpoint
///
/// Produces replies written in a user's style, based on their profile and
/// questionnaire answers.
pub struct AssistantClient {
    base_url: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
    max_tokens: u32,
    client: Client,
}

impl AssistantClient {
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        model: String,
        temperature: f32,
        max_tokens: u32,
        timeout: Duration,
    ) -> Result<Self, AssistantError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key: api_key.filter(|k| !k.is_empty()),
            model,
            temperature,
            max_tokens,
            client,
        })
    }

    /// Generate a reply to `message` in the style of `profile`
    pub async fn generate_reply(
        &self,
        profile: &Profile,
        message: &str,
    ) -> Result<String, AssistantError> {
        let prompt = build_prompt(profile, message);
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Text generation failed for user {}: {} - {}", profile.id, status, text);
            return Err(AssistantError::ApiError(format!("{}: {}", status, text)));
        }

        let completion: ChatCompletionResponse = response.json().await?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(AssistantError::EmptyReply)
    }
}

/// Build the user prompt from a profile's identity and questionnaire
pub fn build_prompt(profile: &Profile, message: &str) -> String {
    let identity = format!(
        "name: {}, age: {}, gender: {}, city: {}, interests: {}",
        profile.name,
        profile.age,
        profile.gender,
        profile.city,
        profile.interests.join(", ")
    );

    let personality = profile
        .questionnaire
        .iter()
        .map(|(question, answer)| format!("Q: {}\nA: {}", question, answer))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{}\nThe user has provided their identity as {}\n\
         The user has provided the following personality traits:\n{}\n\
         Now, respond to the following message in their style:\n{}",
        SYSTEM_PROMPT, identity, personality, message
    )
}
