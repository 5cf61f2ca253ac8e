use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

use linguamate_core::health::{healthz, readyz};
use linguamate_core::middleware::{request_id_layer, trace_layer};

use crate::handlers::{
    account::{change_password, get_me, register},
    code::request_code,
    token::{check_token, create_token, refresh_token, revoke_token},
    verify::redeem_code,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Account
        .route("/account", post(register))
        .route("/account/@me", get(get_me))
        .route("/account/@me/password", put(change_password))
        // Verification code
        .route("/auth/code", post(request_code))
        .route("/auth/verify", post(redeem_code))
        // Token
        .route("/auth/token", get(check_token))
        .route("/auth/token", post(create_token))
        .route("/auth/token", patch(refresh_token))
        .route("/auth/token", delete(revoke_token))
        .layer(trace_layer())
        .layer(request_id_layer())
        .with_state(state)
}
