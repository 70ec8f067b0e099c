//! # バックエンド設定・共有状態
//!
//! 環境変数からの設定読み込みとバックエンドの共有状態の定義。
//!
//! | 環境変数 | 既定値 |
//! |---|---|
//! | `BIND_ADDR` | `0.0.0.0:3001` |
//! | `CORS_ORIGIN` | `http://localhost:3000` |
//! | `LUNASEC_STAGE` | `dev` |
//! | `LUNASEC_SECURE_FRAME_URL` | devステージのみ既定値あり |
//! | `FALLBACK_SESSION_ID` | 未設定 |
//! | `MOCK_MODE` | `false` |
//! | `SESSION_CAPACITY` | `10000` |

use std::sync::Arc;

use anyhow::Context;
use axum::http::HeaderValue;
use lunasec_demo_sdk::{
    DeploymentStage, Detokenizer, HttpDetokenizer, HttpTokenAuthService, MockDetokenizer,
    MockTokenAuthService, SecureFunction, SecureResolver, SessionResolver, TokenAuthService,
};
use lunasec_demo_types::{AuthContext, IdToken, ResolvedFormData, SessionId};
use tokio::sync::RwLock;

use crate::process_form::process_form;
use crate::sessions::{SessionTable, DEFAULT_SESSION_CAPACITY};

/// 解決済みフォームを処理する関数。
pub type FormProcessor = Box<dyn Fn(ResolvedFormData) -> Option<String> + Send + Sync>;

/// トークン化フォームを受け取るよう包まれた処理関数。
pub type SecureFormProcessor = SecureFunction<FormProcessor>;

/// 起動時に読み込むバックエンド設定。
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// 待ち受けアドレス
    pub bind_addr: String,
    /// CORSで許可するオリジン
    pub cors_origin: HeaderValue,
    pub stage: DeploymentStage,
    /// トークンサービス・セキュアフレームのベースURL
    pub secure_frame_url: String,
    /// /grant でCookieからセッションを特定できない場合に使うセッションID
    pub fallback_session_id: Option<SessionId>,
    /// trueならメモリ内モックのトークンサービス・デトークナイザを使う
    pub mock_mode: bool,
    /// セッション表の最大登録数
    pub session_capacity: usize,
}

impl BackendConfig {
    /// 環境変数から構築する。
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意の値取得関数から構築する。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3001".to_string());

        let cors_origin = lookup("CORS_ORIGIN")
            .unwrap_or_else(|| "http://localhost:3000".to_string());
        let cors_origin = HeaderValue::from_str(&cors_origin)
            .with_context(|| format!("CORS_ORIGINが不正です: {cors_origin}"))?;

        let stage = match lookup("LUNASEC_STAGE") {
            Some(s) => s.parse::<DeploymentStage>()?,
            None => DeploymentStage::Dev,
        };
        let secure_frame_url = stage.secure_frame_url(lookup("LUNASEC_SECURE_FRAME_URL"))?;

        let fallback_session_id = lookup("FALLBACK_SESSION_ID")
            .filter(|s| !s.is_empty())
            .map(SessionId::new);

        let mock_mode = lookup("MOCK_MODE").unwrap_or_default() == "true";

        let session_capacity = match lookup("SESSION_CAPACITY") {
            Some(s) => s
                .parse::<usize>()
                .with_context(|| format!("SESSION_CAPACITYが不正です: {s}"))?,
            None => DEFAULT_SESSION_CAPACITY,
        };

        Ok(Self {
            bind_addr,
            cors_origin,
            stage,
            secure_frame_url,
            fallback_session_id,
            mock_mode,
            session_capacity,
        })
    }
}

/// バックエンドの共有状態。
pub struct BackendState {
    /// トークン認証サービス（HTTP/モック、トレイトで抽象化）
    pub token_service: Arc<dyn TokenAuthService>,
    /// セキュアリゾルバで包んだフォーム処理関数
    pub secure_process_form: SecureFormProcessor,
    /// IDトークン → セッションID（/set-id-token で登録、容量超過で古い順に削除）
    pub sessions: RwLock<SessionTable>,
    pub fallback_session_id: Option<SessionId>,
    pub cors_origin: HeaderValue,
    pub secure_frame_url: String,
}

impl BackendState {
    /// 設定から外部サービスクライアントを選択して構築する。
    pub fn from_config(config: &BackendConfig, http_client: reqwest::Client) -> Self {
        let (token_service, detokenizer): (Arc<dyn TokenAuthService>, Arc<dyn Detokenizer>) =
            if config.mock_mode {
                tracing::info!("モックのトークンサービスで起動します");
                (
                    Arc::new(MockTokenAuthService::new()),
                    Arc::new(MockDetokenizer::passthrough()),
                )
            } else {
                tracing::info!(
                    secure_frame_url = %config.secure_frame_url,
                    stage = %config.stage,
                    "外部トークンサービスに接続します"
                );
                (
                    Arc::new(HttpTokenAuthService::new(
                        config.secure_frame_url.clone(),
                        http_client.clone(),
                    )),
                    Arc::new(HttpDetokenizer::new(
                        config.secure_frame_url.clone(),
                        http_client,
                    )),
                )
            };

        let resolver = SecureResolver::new(config.stage, detokenizer);
        Self::new(
            token_service,
            resolver.wrap(Box::new(process_form) as FormProcessor),
            config,
        )
    }

    pub fn new(
        token_service: Arc<dyn TokenAuthService>,
        secure_process_form: SecureFormProcessor,
        config: &BackendConfig,
    ) -> Self {
        Self {
            token_service,
            secure_process_form,
            sessions: RwLock::new(SessionTable::new(config.session_capacity)),
            fallback_session_id: config.fallback_session_id.clone(),
            cors_origin: config.cors_origin.clone(),
            secure_frame_url: config.secure_frame_url.clone(),
        }
    }

    /// 発行したIDトークンとセッションの対応を記録する。
    pub async fn remember_session(&self, id_token: IdToken, session_id: SessionId) {
        let mut sessions = self.sessions.write().await;
        sessions.insert(id_token, session_id);
        tracing::debug!(sessions = sessions.len(), "セッションを記録");
    }

    /// 認証コンテキストからセッションIDを特定する。
    ///
    /// IDトークンに対応するセッションが無ければ、設定されたフォールバックを返す。
    pub async fn session_for(&self, auth_context: Option<&AuthContext>) -> Option<SessionId> {
        if let Some(ctx) = auth_context {
            if let Some(session_id) = self.sessions.read().await.get(&ctx.id_token) {
                return Some(session_id.clone());
            }
            tracing::debug!("IDトークンに対応するセッションが見つかりません");
        }
        self.fallback_session_id.clone()
    }
}

/// 認証プラグインは /grant と同じセッションを使う。
#[async_trait::async_trait]
impl SessionResolver for BackendState {
    async fn resolve_session(&self, auth_context: &AuthContext) -> Option<SessionId> {
        self.session_for(Some(auth_context)).await
    }
}
