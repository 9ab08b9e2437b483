use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use super::state::StateCell;
use super::transport::ChefTransport;
use crate::chef_presets::{resolve_preset_config, DEFAULT_PRESET_ID};
use crate::recipe::{RecipeOutcome, RecipePreferences, RecipeRequest};

pub const RECIPE_PATH: &str = "/api/recipe";
pub const MISSING_INGREDIENTS_MESSAGE: &str = "재료를 최소 1개 이상 입력해주세요.";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeState {
    pub ingredients: Vec<String>,
    pub tools: Vec<String>,
    pub preferences: RecipePreferences,
    pub selected_preset_id: String,
    pub recipe: Option<RecipeOutcome>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Default for RecipeState {
    fn default() -> Self {
        Self {
            ingredients: Vec::new(),
            tools: Vec::new(),
            preferences: RecipePreferences::default(),
            selected_preset_id: DEFAULT_PRESET_ID.to_string(),
            recipe: None,
            is_loading: false,
            error: None,
        }
    }
}

// Trimmed, non-empty and not already present.
fn push_unique(list: &mut Vec<String>, item: &str) {
    let trimmed = item.trim();
    if trimmed.is_empty() || list.iter().any(|existing| existing == trimmed) {
        return;
    }
    list.push(trimmed.to_string());
}

pub struct RecipeStore {
    state: StateCell<RecipeState>,
    transport: Arc<dyn ChefTransport>,
}

impl RecipeStore {
    pub fn new(transport: Arc<dyn ChefTransport>) -> Self {
        Self {
            state: StateCell::new(RecipeState::default()),
            transport,
        }
    }

    pub fn state(&self) -> &StateCell<RecipeState> {
        &self.state
    }

    pub fn snapshot(&self) -> RecipeState {
        self.state.snapshot()
    }

    pub fn add_ingredient(&self, ingredient: &str) {
        self.state.update(|s| push_unique(&mut s.ingredients, ingredient));
    }

    pub fn remove_ingredient(&self, ingredient: &str) {
        self.state.update(|s| s.ingredients.retain(|i| i != ingredient));
    }

    pub fn add_tool(&self, tool: &str) {
        self.state.update(|s| push_unique(&mut s.tools, tool));
    }

    pub fn remove_tool(&self, tool: &str) {
        self.state.update(|s| s.tools.retain(|t| t != tool));
    }

    pub fn set_preferences(&self, update: RecipePreferences) {
        self.state.update(|s| s.preferences.merge(update));
    }

    pub fn set_preset(&self, preset_id: &str) {
        self.state.update(|s| s.selected_preset_id = preset_id.to_string());
    }

    /// Requests a recipe for the current ingredients, tools and preferences.
    /// Does nothing but set `error` while the ingredient list is empty.
    pub async fn generate_recipe(&self) {
        let snapshot = self.state.snapshot();
        if snapshot.ingredients.is_empty() {
            self.state
                .update(|s| s.error = Some(MISSING_INGREDIENTS_MESSAGE.to_string()));
            return;
        }

        self.state.update(|s| {
            s.is_loading = true;
            s.error = None;
        });

        let request = RecipeRequest {
            ingredients: snapshot.ingredients,
            tools: snapshot.tools,
            preferences: snapshot.preferences,
            chef_config: resolve_preset_config(&snapshot.selected_preset_id).clone(),
        };

        match self.request_recipe(&request).await {
            Ok(recipe) => self.state.update(|s| {
                s.recipe = recipe;
                s.is_loading = false;
            }),
            Err(e) => {
                warn!("Recipe request failed: {}", e);
                self.state.update(|s| {
                    s.is_loading = false;
                    s.error = Some(e);
                });
            }
        }
    }

    async fn request_recipe(&self, request: &RecipeRequest) -> Result<Option<RecipeOutcome>, String> {
        let body = serde_json::to_value(request).map_err(|e| e.to_string())?;
        let response = self
            .transport
            .post_json(RECIPE_PATH, &body)
            .await
            .map_err(|e| e.to_string())?;

        if !response.is_success() {
            return Err(format!("API 오류: {}", response.status));
        }

        Ok(extract_recipe(&response.body))
    }

    pub fn reset(&self) {
        self.state.replace(RecipeState::default());
    }
}

fn extract_recipe(body: &Value) -> Option<RecipeOutcome> {
    let recipe = body
        .get("data")
        .and_then(|d| d.get("recipe"))
        .or_else(|| body.get("recipe"))
        .filter(|r| !r.is_null())?;

    match serde_json::from_value(recipe.clone()) {
        Ok(outcome) => Some(outcome),
        Err(e) => {
            debug!("Ignoring unreadable recipe payload: {}", e);
            None
        }
    }
}
