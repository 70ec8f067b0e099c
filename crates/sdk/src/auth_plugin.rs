//! # セキュアフレーム認証プラグイン
//!
//! axumルーターに `GET /secure-frame` を登録する。
//!
//! ## フロー
//! 1. セキュアフレームが `state` 付きでブラウザをリダイレクトしてくる
//! 2. 認証コンテキストコールバックでリクエストの認証状態を判定する
//! 3. 認証コンテキストに対応するセッションを解決する（バックエンドと共有するセッション）
//! 4. そのセッションを認証し、発行したIDトークンを添えてセキュアフレームに戻す

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use lunasec_demo_types::{AuthContext, SecureFrameQuery, SessionId};

use crate::token_service::TokenAuthService;

/// プラグインが登録するパス。
pub const SECURE_FRAME_PATH: &str = "/secure-frame";

/// リクエストヘッダから認証コンテキストを導出するコールバック。
/// 未認証なら `None` を返す。
pub type AuthContextCallback = Arc<dyn Fn(&HeaderMap) -> Option<AuthContext> + Send + Sync>;

/// 認証コンテキストから、バックエンドとセキュアフレームが共有するセッションを引く。
#[async_trait::async_trait]
pub trait SessionResolver: Send + Sync {
    /// 既知のセッションが無ければ `None`。
    async fn resolve_session(&self, auth_context: &AuthContext) -> Option<SessionId>;
}

/// セキュアフレーム認証プラグイン。
pub struct AuthPlugin {
    token_service: Arc<dyn TokenAuthService>,
    session_resolver: Arc<dyn SessionResolver>,
    /// セキュアフレームのベースURL
    secure_frame_url: String,
    auth_context_callback: AuthContextCallback,
}

impl AuthPlugin {
    pub fn new<F>(
        token_service: Arc<dyn TokenAuthService>,
        session_resolver: Arc<dyn SessionResolver>,
        secure_frame_url: impl Into<String>,
        auth_context_callback: F,
    ) -> Self
    where
        F: Fn(&HeaderMap) -> Option<AuthContext> + Send + Sync + 'static,
    {
        Self {
            token_service,
            session_resolver,
            secure_frame_url: secure_frame_url.into(),
            auth_context_callback: Arc::new(auth_context_callback),
        }
    }

    /// リクエストの認証コンテキストを導出する。
    pub fn auth_context(&self, headers: &HeaderMap) -> Option<AuthContext> {
        (self.auth_context_callback)(headers)
    }

    /// ルーターにプラグインのルートを登録する。
    pub fn register<S>(self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        let plugin_routes = Router::new()
            .route(SECURE_FRAME_PATH, axum::routing::get(handle_secure_frame))
            .with_state(Arc::new(self));
        router.merge(plugin_routes)
    }

    fn verify_url(&self, state: &str, openid_token: &str) -> Result<reqwest::Url, String> {
        let base = format!(
            "{}/session/verify",
            self.secure_frame_url.trim_end_matches('/')
        );
        reqwest::Url::parse_with_params(&base, &[("state", state), ("openid_token", openid_token)])
            .map_err(|e| format!("セキュアフレームURLが不正です ({base}): {e}"))
    }
}

/// GET /secure-frame — セキュアフレームへの認証リダイレクト。
async fn handle_secure_frame(
    State(plugin): State<Arc<AuthPlugin>>,
    headers: HeaderMap,
    Query(query): Query<SecureFrameQuery>,
) -> Result<Response, StatusCode> {
    let Some(state) = query.state.filter(|s| !s.is_empty()) else {
        tracing::warn!("secure-frameリクエストにstateがありません");
        return Err(StatusCode::BAD_REQUEST);
    };

    let Some(auth_context) = plugin.auth_context(&headers) else {
        tracing::warn!("認証コンテキストを取得できないためsecure-frameを拒否します");
        return Err(StatusCode::UNAUTHORIZED);
    };

    let Some(session_id) = plugin.session_resolver.resolve_session(&auth_context).await else {
        tracing::warn!("IDトークンに対応するセッションが無いためsecure-frameを拒否します");
        return Err(StatusCode::UNAUTHORIZED);
    };

    let token = plugin
        .token_service
        .authenticate(&session_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "secure-frame用のセッション認証に失敗");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let location = plugin.verify_url(&state, token.as_str()).map_err(|e| {
        tracing::error!(error = %e, "リダイレクト先の構築に失敗");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lunasec_demo_types::IdToken;

    use crate::test_helpers::start_mock_service;
    use crate::token_service::MockTokenAuthService;

    fn cookie_callback(headers: &HeaderMap) -> Option<AuthContext> {
        headers.get(header::COOKIE).map(|_| AuthContext {
            id_token: IdToken::new("cookie"),
        })
    }

    /// `cookie` トークンにだけ `s1` を対応させるリゾルバ。
    struct KnownSession;

    #[async_trait::async_trait]
    impl SessionResolver for KnownSession {
        async fn resolve_session(&self, auth_context: &AuthContext) -> Option<SessionId> {
            (auth_context.id_token == IdToken::new("cookie")).then(|| SessionId::new("s1"))
        }
    }

    /// どのトークンにもセッションを返さないリゾルバ。
    struct NoSession;

    #[async_trait::async_trait]
    impl SessionResolver for NoSession {
        async fn resolve_session(&self, _auth_context: &AuthContext) -> Option<SessionId> {
            None
        }
    }

    async fn start_plugin(token_service: MockTokenAuthService) -> String {
        start_plugin_with(token_service, Arc::new(KnownSession)).await
    }

    async fn start_plugin_with(
        token_service: MockTokenAuthService,
        session_resolver: Arc<dyn SessionResolver>,
    ) -> String {
        let plugin = AuthPlugin::new(
            Arc::new(token_service),
            session_resolver,
            "https://frame.example.com/",
            cookie_callback,
        );
        let app = plugin.register(axum::Router::new());
        start_mock_service(app).await
    }

    fn no_redirect_client() -> reqwest::Client {
        reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_secure_frame_redirects_with_token() {
        let base_url = start_plugin(MockTokenAuthService::new()).await;

        let response = no_redirect_client()
            .get(format!("{base_url}/secure-frame?state=abc"))
            .header(header::COOKIE, "id_token=x")
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        let location = response.headers()[header::LOCATION].to_str().unwrap();
        let url = reqwest::Url::parse(location).unwrap();
        assert_eq!(url.host_str(), Some("frame.example.com"));
        assert_eq!(url.path(), "/session/verify");

        let params: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(params.contains(&("state".to_string(), "abc".to_string())));
        // 解決したセッションに対して発行されたトークンが渡る
        assert!(params.contains(&(
            "openid_token".to_string(),
            "mock-id-token.s1".to_string()
        )));
    }

    #[tokio::test]
    async fn test_secure_frame_rejects_unknown_session() {
        let base_url = start_plugin_with(MockTokenAuthService::new(), Arc::new(NoSession)).await;

        let response = no_redirect_client()
            .get(format!("{base_url}/secure-frame?state=abc"))
            .header(header::COOKIE, "id_token=x")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_secure_frame_requires_state() {
        let base_url = start_plugin(MockTokenAuthService::new()).await;

        let response = no_redirect_client()
            .get(format!("{base_url}/secure-frame"))
            .header(header::COOKIE, "id_token=x")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_secure_frame_requires_auth_context() {
        let base_url = start_plugin(MockTokenAuthService::new()).await;

        let response = no_redirect_client()
            .get(format!("{base_url}/secure-frame?state=abc"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_secure_frame_token_service_failure() {
        let base_url = start_plugin(MockTokenAuthService::failing()).await;

        let response = no_redirect_client()
            .get(format!("{base_url}/secure-frame?state=abc"))
            .header(header::COOKIE, "id_token=x")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
