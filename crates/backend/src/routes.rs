//! # ルートテーブル
//!
//! CORS・リクエストトレース・認証プラグインとバックエンドのエンドポイントを組み立てる。

use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use lunasec_demo_sdk::{AuthPlugin, SessionResolver};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::auth_context_callback;
use crate::config::BackendState;
use crate::endpoints;

/// バックエンドのルーターを構築する。
pub fn create_routes(state: Arc<BackendState>) -> Router {
    let session_resolver: Arc<dyn SessionResolver> = state.clone();
    let auth_plugin = AuthPlugin::new(
        Arc::clone(&state.token_service),
        session_resolver,
        state.secure_frame_url.clone(),
        auth_context_callback,
    );

    let router = Router::new()
        .route("/set-id-token", get(endpoints::handle_set_id_token))
        .route("/", get(endpoints::handle_root))
        .route("/signup", post(endpoints::handle_signup))
        .route("/grant", get(endpoints::handle_grant));

    auth_plugin
        .register(router)
        .layer(cors_layer(state.cors_origin.clone()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 単一オリジンからのGET/POSTのみを許可するCORSレイヤー。
fn cors_layer(origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_methods([Method::GET, Method::POST])
}
