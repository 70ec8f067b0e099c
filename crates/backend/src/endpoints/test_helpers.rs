//! # エンドポイントテスト用共通ヘルパー

use std::sync::Arc;

use lunasec_demo_sdk::{
    DeploymentStage, MockDetokenizer, MockTokenAuthService, SecureResolver, TokenAuthService,
};
use lunasec_demo_types::{ResolvedFormData, SessionId};

use crate::config::{BackendConfig, BackendState, FormProcessor};

/// テスト用の設定。フォールバックセッションは呼び出し側で指定する。
pub fn test_config(fallback_session_id: Option<&str>) -> BackendConfig {
    BackendConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        cors_origin: axum::http::HeaderValue::from_static("http://localhost:3000"),
        stage: DeploymentStage::Dev,
        secure_frame_url: "http://frame.test".to_string(),
        fallback_session_id: fallback_session_id.map(SessionId::new),
        mock_mode: true,
        session_capacity: crate::sessions::DEFAULT_SESSION_CAPACITY,
    }
}

/// テスト用BackendStateを構築するヘルパー。
///
/// デトークナイザは `abc` → `123-45-6789` のみを解決する。
pub fn test_state<F>(
    token_service: impl TokenAuthService + 'static,
    form_processor: F,
    fallback_session_id: Option<&str>,
) -> Arc<BackendState>
where
    F: Fn(ResolvedFormData) -> Option<String> + Send + Sync + 'static,
{
    let detokenizer = MockDetokenizer::from_pairs([("abc", "123-45-6789")]);
    let resolver = SecureResolver::new(DeploymentStage::Dev, Arc::new(detokenizer));
    let token_service: Arc<dyn TokenAuthService> = Arc::new(token_service);

    Arc::new(BackendState::new(
        token_service,
        resolver.wrap(Box::new(form_processor) as FormProcessor),
        &test_config(fallback_session_id),
    ))
}

/// 平文をそのまま返すフォーム処理を持つ標準のテスト状態。
pub fn default_state() -> Arc<BackendState> {
    test_state(MockTokenAuthService::new(), |form| Some(form.ssn), None)
}

/// ルーターをランダムポートで起動し、ベースURLを返す。
pub async fn start_backend(state: Arc<BackendState>) -> String {
    let app = crate::routes::create_routes(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    format!("http://127.0.0.1:{port}")
}

/// リダイレクトを追わないクライアント。
pub fn no_redirect_client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}
