use std::sync::Arc;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::{create_router, AppState};
use crate::config::Config;
use crate::equations::EquationRepository;
use crate::services::{GeoService, IdfService, ReferenceService};

/// Running HTTP server over a loaded equation dataset
pub struct Application {
    pub server_handle: JoinHandle<Result<(), std::io::Error>>,
}

impl Application {
    /// Wire the services around the loaded repository and spawn the HTTP server
    pub async fn build(
        config: Config,
        repository: Arc<EquationRepository>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        info!(
            "Initializing application components ({} equations)",
            repository.len()
        );

        let app = create_router(app_state(repository)).layer(TraceLayer::new_for_http());

        let addr = config.server_addr();
        info!("Starting HTTP server on {}", addr);

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        let server_handle = tokio::spawn(async move { axum::serve(listener, app).await });

        info!("Application initialized successfully");

        Ok(Self { server_handle })
    }

    /// Run until the server stops (which runs indefinitely unless error)
    pub async fn run_until_stopped(self) -> Result<(), Box<dyn std::error::Error>> {
        self.server_handle.await??;
        Ok(())
    }
}

/// Services sharing one repository, as handed to the router
pub fn app_state(repository: Arc<EquationRepository>) -> AppState {
    AppState {
        geo_service: GeoService::new(repository.clone()),
        idf_service: IdfService::new(repository.clone()),
        reference_service: ReferenceService::new(repository),
    }
}
