use crate::web::api::{
    bands_handler, confirm_field_handler, grid_handler, measure_handler, slot_handler,
    validate_boundary_handler,
};
use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use fieldscope::engine::grid::GridConfig;
use std::net::{IpAddr, SocketAddr, TcpListener};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub fn build_router(defaults: GridConfig) -> Router {
    Router::new()
        .route("/api/bands", get(bands_handler))
        .route("/api/boundary/validate", post(validate_boundary_handler))
        .route("/api/grid", post(grid_handler))
        .route("/api/measure", post(measure_handler))
        .route("/api/slot", post(slot_handler))
        .route("/api/fields/confirm", post(confirm_field_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(defaults))
}

pub async fn run_server(host: IpAddr, port: u16, defaults: GridConfig) -> Result<()> {
    let mut current_port = port;
    let listener = loop {
        let addr = SocketAddr::new(host, current_port);
        match TcpListener::bind(addr) {
            Ok(listener) => {
                // Tokio requires a non-blocking std listener
                listener.set_nonblocking(true)?;
                info!("Successfully bound to {}", addr);
                break listener;
            }
            Err(e) => {
                warn!("Failed to bind to {}: {}. Trying next port...", addr, e);
                current_port = current_port
                    .checked_add(1)
                    .ok_or_else(|| anyhow::anyhow!("No available ports found"))?;
            }
        }
    };

    let app = build_router(defaults);

    let tokio_listener = tokio::net::TcpListener::from_std(listener)?;
    info!(
        "Fieldscope server started on http://{:?} (default grid {}x{})",
        tokio_listener.local_addr()?,
        defaults.rows,
        defaults.cols
    );

    axum::serve(tokio_listener, app).await?;

    Ok(())
}
