// Library surface shared by the server binary and the client stores

pub mod api_handlers;
pub mod app_config;
pub mod chef_config;
pub mod chef_presets;
pub mod client;
pub mod llm_handler;
pub mod models;
pub mod prompts;
pub mod recipe;
pub mod telemetry;
pub mod validation;
