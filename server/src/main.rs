mod db;
mod rate_limit;
mod routes;
mod services;
mod state;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");

    let pool = db::init_pool(&database_url)
        .await
        .expect("database init failed");

    let state = state::AppState::new(pool);

    // Seed the first admin account if the users table is empty and
    // ADMIN_EMAIL/ADMIN_PASSWORD are configured.
    if let Err(e) = services::auth::seed_admin_from_env(&state.pool).await {
        tracing::warn!(error = %e, "admin seed skipped");
    }

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "coursebook listening");
    axum::serve(listener, app).await.expect("server failed");
}
