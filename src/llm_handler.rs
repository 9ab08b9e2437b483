use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::chef_config::ChefConfig;
use crate::models::ChatContext;
use crate::prompts::{generate_chat_prompt, generate_recipe_prompt};
use crate::recipe::{parse_recipe_response, RecipeOutcome, RecipeRequest};

// Gemini API configuration
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_FLASH_MODEL: &str = "gemini-3.0-flash";
pub const DEFAULT_PRO_MODEL: &str = "gemini-3.0-pro";

const HARM_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];
const HARM_BLOCK_THRESHOLD: &str = "BLOCK_MEDIUM_AND_ABOVE";

/// Which model a task runs on: Flash for conversation, Pro for recipes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelTier {
    Flash,
    Pro,
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("GEMINI_API_KEY environment variable not set")]
    MissingApiKey,

    #[error("Failed to send request to Gemini: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Gemini returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Gemini blocked the prompt: {0}")]
    Blocked(String),

    #[error("No response from Gemini")]
    EmptyResponse,
}

/// A hosted text-completion service.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, tier: ModelTier, prompt: &str) -> Result<String, LlmError>;
}

// Struct to hold the Gemini LLM response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}

impl GeminiResponse {
    fn into_text(self) -> Result<String, LlmError> {
        if self.candidates.is_empty() {
            if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
                return Err(LlmError::Blocked(reason));
            }
            return Err(LlmError::EmptyResponse);
        }

        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            Err(LlmError::EmptyResponse)
        } else {
            Ok(text)
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_url: String,
    pub flash_model: String,
    pub pro_model: String,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_GEMINI_API_URL.to_string(),
            flash_model: DEFAULT_FLASH_MODEL.to_string(),
            pro_model: DEFAULT_PRO_MODEL.to_string(),
        }
    }
}

/// A resolved model: its name plus the credential to call it with.
pub struct GeminiModel<'a> {
    pub name: &'a str,
    api_key: &'a str,
}

pub struct GeminiProvider {
    client: Client,
    settings: GeminiSettings,
    api_key: Option<String>,
}

impl GeminiProvider {
    pub fn new(settings: GeminiSettings, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            settings,
            api_key: api_key.filter(|key| !key.is_empty()),
        }
    }

    pub fn from_env(settings: GeminiSettings) -> Self {
        let api_key = env::var(GEMINI_API_KEY_VAR).ok();
        if api_key.is_none() {
            warn!("{} is not set; completion requests will fail", GEMINI_API_KEY_VAR);
        }
        Self::new(settings, api_key)
    }

    /// Fails before any network traffic when no credential is configured.
    pub fn model(&self, tier: ModelTier) -> Result<GeminiModel<'_>, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;
        let name = match tier {
            ModelTier::Flash => self.settings.flash_model.as_str(),
            ModelTier::Pro => self.settings.pro_model.as_str(),
        };
        Ok(GeminiModel { name, api_key })
    }

    async fn generate_content(&self, model: GeminiModel<'_>, prompt: &str) -> Result<String, LlmError> {
        let safety_settings: Vec<_> = HARM_CATEGORIES
            .iter()
            .map(|category| json!({ "category": category, "threshold": HARM_BLOCK_THRESHOLD }))
            .collect();

        let payload = json!({
            "contents": [
                {
                    "role": "user",
                    "parts": [ { "text": prompt } ]
                }
            ],
            "safetySettings": safety_settings
        });

        let url = format!(
            "{}/models/{}:generateContent",
            self.settings.api_url.trim_end_matches('/'),
            model.name
        );
        debug!("Sending {} byte prompt to {}", prompt.len(), model.name);

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", model.api_key)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response.json::<GeminiResponse>().await?.into_text()
    }
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    async fn complete(&self, tier: ModelTier, prompt: &str) -> Result<String, LlmError> {
        let model = self.model(tier)?;
        self.generate_content(model, prompt).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("{0}")]
    Configuration(String),

    #[error("AI response generation failed: {0}")]
    Chat(String),

    #[error("Recipe generation failed: {0}")]
    Recipe(String),
}

impl GatewayError {
    fn chat(error: LlmError) -> Self {
        match error {
            LlmError::MissingApiKey => GatewayError::Configuration(error.to_string()),
            other => GatewayError::Chat(other.to_string()),
        }
    }

    fn recipe(error: LlmError) -> Self {
        match error {
            LlmError::MissingApiKey => GatewayError::Configuration(error.to_string()),
            other => GatewayError::Recipe(other.to_string()),
        }
    }
}

/// Conversational reply in the persona's voice, returned as raw text.
pub async fn send_chef_message(
    provider: &dyn CompletionProvider,
    message: &str,
    chef_config: &ChefConfig,
    context: Option<&ChatContext>,
) -> Result<String, GatewayError> {
    let prompt = generate_chat_prompt(message, chef_config, context);

    let reply = provider
        .complete(ModelTier::Flash, &prompt)
        .await
        .map_err(GatewayError::chat)?;

    info!("Chef {} replied with {} bytes", chef_config.name, reply.len());
    Ok(reply)
}

/// Recipe generation. Unparseable model output is a [`RecipeOutcome::Raw`],
/// not an error; only provider failures are.
pub async fn generate_recipe(
    provider: &dyn CompletionProvider,
    request: &RecipeRequest,
) -> Result<RecipeOutcome, GatewayError> {
    let prompt = generate_recipe_prompt(request);

    let text = provider
        .complete(ModelTier::Pro, &prompt)
        .await
        .map_err(GatewayError::recipe)?;

    let outcome = parse_recipe_response(&text);
    match &outcome {
        RecipeOutcome::Structured(recipe) => info!("Generated recipe '{}'", recipe.title),
        RecipeOutcome::Raw { .. } => warn!("Recipe response was not structured; returning raw text"),
    }
    Ok(outcome)
}
