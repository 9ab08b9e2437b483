use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;
use tracing::{debug, warn};

use crate::chef_config::ChefConfig;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipePreferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    /// Upper bound in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooking_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<f64>,
}

impl RecipePreferences {
    /// Shallow merge: every field set in `update` replaces the current value.
    pub fn merge(&mut self, update: RecipePreferences) {
        if update.cuisine.is_some() {
            self.cuisine = update.cuisine;
        }
        if update.difficulty.is_some() {
            self.difficulty = update.difficulty;
        }
        if update.cooking_time.is_some() {
            self.cooking_time = update.cooking_time;
        }
        if update.servings.is_some() {
            self.servings = update.servings;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRequest {
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub preferences: RecipePreferences,
    pub chef_config: ChefConfig,
}

/// A number the model may also have written as text ("2", 2, "2인분").
/// Kept exactly as received.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Measure {
    Number(Number),
    Text(String),
}

impl Measure {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Measure::Number(n) => n.as_f64(),
            Measure::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measure::Number(n) => write!(f, "{}", n),
            Measure::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeIngredient {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Measure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub substitute: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeTool {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeInstruction {
    pub step: Measure,
    pub title: String,
    pub description: String,
    /// Minutes, or whatever the model wrote ("5분").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<Measure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NutritionInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<Measure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<Measure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbs: Option<Measure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fat: Option<Measure>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A recipe as the model wrote it. Only `title`, `description`,
/// `ingredients` and `instructions` are required; keys this type does not
/// name are carried in `extra` and serialized back unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedRecipe {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    /// Usually one of easy/medium/hard, but taken as written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooking_time: Option<Measure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<Measure>,
    pub ingredients: Vec<RecipeIngredient>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<RecipeTool>>,
    pub instructions: Vec<RecipeInstruction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<NutritionInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chef_note: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// What a recipe generation produced: the structured recipe, or the model's
/// text as-is when it could not be read as one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RecipeOutcome {
    Structured(GeneratedRecipe),
    Raw {
        #[serde(rename = "rawText")]
        raw_text: String,
    },
}

impl RecipeOutcome {
    pub fn recipe(&self) -> Option<&GeneratedRecipe> {
        match self {
            RecipeOutcome::Structured(recipe) => Some(recipe),
            RecipeOutcome::Raw { .. } => None,
        }
    }
}

const REQUIRED_RECIPE_KEYS: [&str; 4] = ["title", "description", "ingredients", "instructions"];

lazy_static! {
    static ref JSON_FENCE: Regex = Regex::new(r"(?s)```json\n?(.*?)\n?```").unwrap();
}

fn raw(text: &str) -> RecipeOutcome {
    RecipeOutcome::Raw {
        raw_text: text.to_string(),
    }
}

/// Reads a model response as a recipe. A ```json fence wins when present;
/// otherwise the whole text is tried. Never fails.
pub fn parse_recipe_response(text: &str) -> RecipeOutcome {
    let candidate = match JSON_FENCE.captures(text).and_then(|caps| caps.get(1)) {
        Some(block) => block.as_str(),
        None => text.trim(),
    };

    let value: Value = match serde_json::from_str(candidate) {
        Ok(value) => value,
        Err(e) => {
            debug!("Recipe response is not JSON: {}", e);
            return raw(text);
        }
    };

    if let Some(missing) = REQUIRED_RECIPE_KEYS.iter().find(|key| value.get(**key).is_none()) {
        debug!("Recipe JSON has no '{}' key", missing);
        return raw(text);
    }

    match serde_json::from_value::<GeneratedRecipe>(value) {
        Ok(recipe) => RecipeOutcome::Structured(recipe),
        Err(e) => {
            warn!("Recipe JSON has the required keys but an unreadable shape: {}", e);
            raw(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_recipe_json() -> Value {
        json!({
            "title": "김치찌개",
            "description": "얼큰한 찌개",
            "cuisine": "한식",
            "difficulty": "easy",
            "cookingTime": 25,
            "servings": 2,
            "ingredients": [
                { "name": "김치", "quantity": "200", "unit": "g", "isAvailable": true, "substitute": null },
                { "name": "두부", "quantity": 1, "unit": "모" }
            ],
            "tools": [ { "name": "냄비", "isAvailable": true, "alternative": null } ],
            "instructions": [
                { "step": 1, "title": "볶기", "description": "김치를 볶는다", "time": 5, "tips": null }
            ],
            "nutrition": { "calories": 320, "protein": 18, "carbs": 20, "fat": 15 },
            "chefNote": "묵은지가 좋아요"
        })
    }

    #[test]
    fn test_parses_fenced_json() {
        let body = sample_recipe_json();
        let text = format!("여기 레시피입니다!\n```json\n{}\n```\n맛있게 드세요", body);

        let outcome = parse_recipe_response(&text);
        let expected: GeneratedRecipe = serde_json::from_value(body).unwrap();
        assert_eq!(outcome, RecipeOutcome::Structured(expected));
    }

    #[test]
    fn test_parses_bare_json() {
        let body = sample_recipe_json();
        let outcome = parse_recipe_response(&body.to_string());

        let recipe = outcome.recipe().unwrap();
        assert_eq!(recipe.title, "김치찌개");
        assert_eq!(recipe.ingredients[1].quantity.as_ref().unwrap().to_string(), "1");
        assert_eq!(recipe.difficulty.as_deref(), Some(Difficulty::Easy.as_str()));
        assert_eq!(recipe.cooking_time.as_ref().and_then(Measure::as_f64), Some(25.0));
    }

    #[test]
    fn test_loosely_typed_fields_stay_structured() {
        let body = json!({
            "title": "계란말이",
            "description": "폭신한 계란말이",
            "servings": "2인분",
            "cookingTime": "15분",
            "difficulty": "쉬움",
            "ingredients": [{ "name": "달걀", "quantity": "3", "unit": "개" }],
            "instructions": [{ "step": 1, "title": "풀기", "description": "달걀을 푼다", "time": "5분" }],
            "nutrition": { "calories": 320 }
        });
        let text = format!("```json\n{}\n```", body);

        let recipe = match parse_recipe_response(&text) {
            RecipeOutcome::Structured(recipe) => recipe,
            RecipeOutcome::Raw { .. } => panic!("fenced recipe with loose types came back raw"),
        };
        assert_eq!(recipe.servings, Some(Measure::Text("2인분".to_string())));
        assert_eq!(recipe.instructions[0].time.as_ref().unwrap().to_string(), "5분");
        assert_eq!(recipe.nutrition.as_ref().unwrap().calories.as_ref().and_then(Measure::as_f64), Some(320.0));
        assert_eq!(recipe.nutrition.as_ref().unwrap().fat, None);
        assert_eq!(serde_json::to_value(&recipe).unwrap(), body);
    }

    #[test]
    fn test_unknown_keys_survive_round_trip() {
        let body = json!({
            "title": "비빔밥",
            "description": "나물 듬뿍",
            "tags": ["한식", "채식"],
            "ingredients": [{ "name": "밥", "quantity": 1, "unit": "공기", "calories": 300 }],
            "tools": [{ "name": "그릇", "isAvailable": true }],
            "instructions": [{ "step": 1, "title": "담기", "description": "밥 위에 나물을 올린다", "warning": "뜨거움" }],
            "chefNote": "고추장은 취향껏"
        });

        let outcome = parse_recipe_response(&body.to_string());
        let recipe = outcome.recipe().unwrap();
        assert_eq!(recipe.extra.get("tags"), Some(&json!(["한식", "채식"])));
        assert_eq!(serde_json::to_value(&outcome).unwrap(), body);
    }

    #[test]
    fn test_missing_required_key_degrades_to_raw() {
        let text = r#"{"title": "라면", "description": "간단", "ingredients": []}"#;
        assert_eq!(
            parse_recipe_response(text),
            RecipeOutcome::Raw {
                raw_text: text.to_string()
            }
        );
    }

    #[test]
    fn test_plain_text_degrades_to_raw() {
        let text = "죄송해요, 오늘은 레시피를 만들 수 없어요.";
        assert_eq!(
            parse_recipe_response(text),
            RecipeOutcome::Raw {
                raw_text: text.to_string()
            }
        );
    }

    #[test]
    fn test_wrong_shape_degrades_to_raw() {
        let text = "```json\n{\"foo\": 1}\n```";
        assert!(matches!(parse_recipe_response(text), RecipeOutcome::Raw { .. }));
    }

    #[test]
    fn test_outcome_wire_shapes() {
        let raw = RecipeOutcome::Raw {
            raw_text: "그냥 텍스트".to_string(),
        };
        assert_eq!(serde_json::to_value(&raw).unwrap(), json!({ "rawText": "그냥 텍스트" }));

        let back: RecipeOutcome = serde_json::from_value(json!({ "rawText": "x" })).unwrap();
        assert!(matches!(back, RecipeOutcome::Raw { .. }));

        let structured: RecipeOutcome = serde_json::from_value(sample_recipe_json()).unwrap();
        assert!(structured.recipe().is_some());
    }

    #[test]
    fn test_preferences_merge_overrides_set_fields() {
        let mut prefs = RecipePreferences {
            cuisine: Some("한식".to_string()),
            difficulty: Some(Difficulty::Hard),
            ..Default::default()
        };
        prefs.merge(RecipePreferences {
            difficulty: Some(Difficulty::Easy),
            servings: Some(2.0),
            ..Default::default()
        });

        assert_eq!(prefs.cuisine.as_deref(), Some("한식"));
        assert_eq!(prefs.difficulty, Some(Difficulty::Easy));
        assert_eq!(prefs.servings, Some(2.0));
        assert_eq!(prefs.cooking_time, None);
    }
}
