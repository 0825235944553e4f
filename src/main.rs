use std::sync::Arc;
use tracing::{info, instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use idf_equation_service::app::Application;
use idf_equation_service::config::Config;
use idf_equation_service::equations::EquationRepository;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing with environment filter support
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,idf_equation_service=debug")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env();
    info!("Starting IDF equation service with config: {:?}", config);

    // Missing workbook or sheets abort startup
    let workbook_path = config.resolve_workbook_path()?;
    let repository = tokio::task::spawn_blocking(move || {
        EquationRepository::from_workbook(&workbook_path)
    })
    .await??;

    let application = Application::build(config, Arc::new(repository)).await?;
    application.run_until_stopped().await
}
