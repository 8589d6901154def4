use crate::api::{create_router, AppState};
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use docgit_core::{ProjectRegistry, Settings};
use std::net::SocketAddr;
use std::path::PathBuf;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;

/// Browser front-end origins (dev server and static build).
const ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://localhost:8080"];

pub struct DocgitServer {
    state: AppState,
}

impl DocgitServer {
    pub fn new(settings: Settings, projects_file: PathBuf) -> Self {
        Self {
            state: AppState::new(settings, ProjectRegistry::new(projects_file)),
        }
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(AllowOrigin::list(
                ALLOWED_ORIGINS.map(HeaderValue::from_static),
            ))
            .allow_methods([Method::GET, Method::POST, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE]);

        create_router(self.state.clone()).layer(cors)
    }

    pub async fn serve(self, addr: SocketAddr) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        self.serve_listener(listener).await
    }

    pub async fn serve_listener(self, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
        let app = self.router();

        info!("Server listening on {}", listener.local_addr()?);
        info!("Projects file: {:?}", self.state.registry.path());

        axum::serve(listener, app).await?;

        Ok(())
    }

    pub fn projects_file(&self) -> &std::path::Path {
        self.state.registry.path()
    }
}
