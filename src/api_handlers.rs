use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, warn};

use crate::chef_presets::{chef_presets, find_preset_by_id, ChefPreset};
use crate::llm_handler::{generate_recipe, send_chef_message, CompletionProvider, GatewayError};
use crate::models::{ChatResponse, ErrorResponse, RecipeResponse};
use crate::prompts::chef_greeting;
use crate::validation::{validate_chat_request, validate_recipe_request, ValidationFailure};

// Shared handler state. Requests share nothing mutable.
pub struct AppState {
    pub provider: Arc<dyn CompletionProvider>,
}

impl AppState {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("잘못된 요청입니다.")]
    InvalidRequest(ValidationFailure),

    #[error("AI 응답 생성 중 오류가 발생했습니다.")]
    ChatFailed(#[source] GatewayError),

    #[error("레시피 생성 중 오류가 발생했습니다.")]
    RecipeFailed(#[source] GatewayError),

    #[error("셰프 프리셋을 찾을 수 없습니다: {0}")]
    PresetNotFound(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ChatFailed(_) | ApiError::RecipeFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::PresetNotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let details = match self {
            ApiError::InvalidRequest(failure) => Some(failure.issues.clone()),
            _ => None,
        };
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
            details,
        })
    }
}

// Preset entry as served to clients
#[derive(Serialize)]
pub struct PresetView<'a> {
    #[serde(flatten)]
    pub preset: &'a ChefPreset,
    pub greeting: String,
}

impl<'a> From<&'a ChefPreset> for PresetView<'a> {
    fn from(preset: &'a ChefPreset) -> Self {
        Self {
            preset,
            greeting: chef_greeting(&preset.config),
        }
    }
}

fn parse_body(body: &[u8]) -> Result<Value, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!("Rejected non-JSON request body: {}", e);
        ApiError::InvalidRequest(ValidationFailure::single(
            Vec::new(),
            format!("Invalid JSON body: {}", e),
        ))
    })
}

fn rejected(endpoint: &str, failure: ValidationFailure) -> ApiError {
    warn!("{} request rejected: {}", endpoint, failure);
    ApiError::InvalidRequest(failure)
}

// POST /api/chat
pub async fn chat_handler(body: web::Bytes, data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let value = parse_body(&body)?;
    let request = validate_chat_request(&value).map_err(|f| rejected("Chat", f))?;

    let reply = send_chef_message(
        data.provider.as_ref(),
        &request.message,
        &request.chef_config,
        request.context.as_ref(),
    )
    .await
    .map_err(|e| {
        error!("Chat API error: {}", e);
        ApiError::ChatFailed(e)
    })?;

    Ok(HttpResponse::Ok().json(ChatResponse { response: reply }))
}

// POST /api/recipe
pub async fn recipe_handler(body: web::Bytes, data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let value = parse_body(&body)?;
    let request = validate_recipe_request(&value).map_err(|f| rejected("Recipe", f))?;

    let recipe = generate_recipe(data.provider.as_ref(), &request)
        .await
        .map_err(|e| {
            error!("Recipe API error: {}", e);
            ApiError::RecipeFailed(e)
        })?;

    Ok(HttpResponse::Ok().json(RecipeResponse { recipe }))
}

// GET /api/presets
pub async fn list_presets_handler() -> impl Responder {
    let presets: Vec<PresetView> = chef_presets().iter().map(PresetView::from).collect();
    HttpResponse::Ok().json(serde_json::json!({ "presets": presets }))
}

// GET /api/presets/{id}
pub async fn get_preset_handler(path: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let preset = find_preset_by_id(&id).ok_or(ApiError::PresetNotFound(id))?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "preset": PresetView::from(preset) })))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/chat", web::post().to(chat_handler))
            .route("/recipe", web::post().to(recipe_handler))
            .route("/presets", web::get().to(list_presets_handler))
            .route("/presets/{id}", web::get().to(get_preset_handler)),
    );
}
