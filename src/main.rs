mod intent;
mod routes;
mod services;
mod state;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");
    let fetch_delay_ms: u64 = std::env::var("FETCH_DELAY_MS")
        .unwrap_or_else(|_| "200".into())
        .parse()
        .expect("invalid FETCH_DELAY_MS");

    let state = state::AppState::new(
        services::store::seed_demo_state(),
        std::time::Duration::from_millis(fetch_delay_ms),
    );

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "schedboard listening");
    axum::serve(listener, app).await.expect("server failed");
}
