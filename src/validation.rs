//! Request validation at the HTTP boundary.
//!
//! Each request shape is a JSON Schema document compiled once. A body is
//! checked against its schema first, collecting every violation, and only a
//! conforming body is deserialized into the typed request.

use jsonschema::error::ValidationErrorKind;
use jsonschema::{Draft, JSONSchema, ValidationError};
use lazy_static::lazy_static;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::models::ChatRequest;
use crate::recipe::RecipeRequest;

/// One offending field. `path` runs from the request root to the value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationIssue {
    pub path: Vec<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("request failed validation with {} issue(s)", .issues.len())]
pub struct ValidationFailure {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationFailure {
    pub fn single(path: Vec<String>, message: impl Into<String>) -> Self {
        Self {
            issues: vec![ValidationIssue {
                path,
                message: message.into(),
            }],
        }
    }
}

fn string_list_schema(min_items: usize) -> Value {
    json!({
        "type": "array",
        "items": { "type": "string" },
        "minItems": min_items
    })
}

pub fn chef_config_schema() -> Value {
    json!({
        "type": "object",
        "required": ["name", "personality", "expertise", "speakingStyle"],
        "properties": {
            "name": { "type": "string", "minLength": 1 },
            "personality": {
                "enum": ["professional", "friendly", "motherly", "coach", "scientific", "custom"]
            },
            "customPersonality": { "type": "string" },
            "expertise": string_list_schema(1),
            "cookingPhilosophy": { "type": "string" },
            "speakingStyle": {
                "type": "object",
                "required": ["formality", "emojiUsage", "technicality"],
                "properties": {
                    "formality": { "enum": ["formal", "casual"] },
                    "emojiUsage": { "enum": ["high", "medium", "low", "none"] },
                    "technicality": { "enum": ["expert", "general", "beginner"] }
                }
            }
        }
    })
}

pub fn chat_request_schema() -> Value {
    json!({
        "type": "object",
        "required": ["message", "chefConfig"],
        "properties": {
            "message": { "type": "string", "minLength": 1 },
            "chefConfig": chef_config_schema(),
            "context": {
                "type": "object",
                "properties": {
                    "ingredients": string_list_schema(0),
                    "tools": string_list_schema(0)
                }
            }
        }
    })
}

pub fn recipe_request_schema() -> Value {
    json!({
        "type": "object",
        "required": ["ingredients", "chefConfig"],
        "properties": {
            "ingredients": string_list_schema(1),
            "tools": string_list_schema(0),
            "preferences": {
                "type": "object",
                "properties": {
                    "cuisine": { "type": "string" },
                    "difficulty": { "enum": ["easy", "medium", "hard"] },
                    "cookingTime": { "type": "number", "minimum": 0 },
                    "servings": { "type": "number", "minimum": 0 }
                }
            },
            "chefConfig": chef_config_schema()
        }
    })
}

fn compile(schema: &Value) -> JSONSchema {
    JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(schema)
        .expect("request schemas are static and well-formed")
}

lazy_static! {
    static ref CHAT_REQUEST_SCHEMA: JSONSchema = compile(&chat_request_schema());
    static ref RECIPE_REQUEST_SCHEMA: JSONSchema = compile(&recipe_request_schema());
}

fn issue_from_error(error: &ValidationError<'_>) -> ValidationIssue {
    let mut path: Vec<String> = error
        .instance_path
        .to_string()
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect();

    // A missing property is reported against its parent object.
    if let ValidationErrorKind::Required { property } = &error.kind {
        match property.as_str() {
            Some(name) => path.push(name.to_string()),
            None => path.push(property.to_string()),
        }
    }

    ValidationIssue {
        path,
        message: error.to_string(),
    }
}

fn validate_against<T: DeserializeOwned>(schema: &JSONSchema, body: &Value) -> Result<T, ValidationFailure> {
    if let Err(errors) = schema.validate(body) {
        let issues = errors.map(|error| issue_from_error(&error)).collect();
        return Err(ValidationFailure { issues });
    }

    serde_json::from_value(body.clone())
        .map_err(|e| ValidationFailure::single(Vec::new(), e.to_string()))
}

pub fn validate_chat_request(body: &Value) -> Result<ChatRequest, ValidationFailure> {
    validate_against(&CHAT_REQUEST_SCHEMA, body)
}

/// Omitted `tools` and `preferences` come back empty.
pub fn validate_recipe_request(body: &Value) -> Result<RecipeRequest, ValidationFailure> {
    validate_against(&RECIPE_REQUEST_SCHEMA, body)
}
