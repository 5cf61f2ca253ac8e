use sea_orm::Database;
use tracing::info;

use linguamate_core::config::Config;
use linguamate_identity::config::IdentityConfig;
use linguamate_identity::router::build_router;
use linguamate_identity::state::AppState;

#[tokio::main]
async fn main() {
    linguamate_core::tracing::init_tracing();

    let config = IdentityConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState {
        db,
        jwt_secret: config.jwt_secret,
        cookie_domain: config.cookie_domain,
        code_ttl_secs: config.code_ttl_secs,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.identity_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("identity service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
