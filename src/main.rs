// Campus Events Server - HTTP entry point

use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use campus_events::{api::create_api_router, app_state::AppState, config::Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize application state (store + services)
    let app_state = AppState::new(config.clone()).await?;

    // Build main application router
    let app = Router::new()
        .nest("/api/v1", create_api_router(app_state))
        .layer(CorsLayer::permissive());

    // Start server
    let addr: SocketAddr = config.server_address().parse()?;
    println!("🚀 Campus events server starting on http://{}", addr);
    println!("  GET  /api/v1/events                - Active events, two-tier sorted");
    println!("  POST /api/v1/events/{{id}}/reserve   - Toggle a reservation");
    println!("  POST /api/v1/events/{{id}}/save      - Toggle a save");
    println!("  POST /api/v1/clubs/{{id}}/join       - Join a club");
    println!("  GET  /api/v1/search?q=             - Search events, clubs, buildings");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
