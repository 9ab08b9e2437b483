use actix_web::{middleware, web, App, HttpServer};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

use ai_chef::api_handlers::{configure_routes, AppState};
use ai_chef::app_config::{AppConfig, Cli};
use ai_chef::llm_handler::GeminiProvider;
use ai_chef::telemetry::init_tracing;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let mut config = match AppConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    config.apply_cli(&cli);

    let _log_guard = init_tracing(config.log_dir.as_deref());
    info!("Loaded configuration from {}", cli.config.display());

    let provider = Arc::new(GeminiProvider::from_env(config.gemini_settings()));
    let app_state = web::Data::new(AppState::new(provider));

    let (host, port) = config.bind_address();
    info!("Starting server at http://{}:{}", host, port);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure_routes)
    })
    .bind((host.as_str(), port))
    .map_err(|e| {
        error!("Failed to bind {}:{}: {}", host, port, e);
        e
    })?;

    server.run().await
}
