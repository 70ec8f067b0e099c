//! # LunaSec セキュアフォーム デモバックエンド
//!
//! 外部トークンサービスとセキュアリゾルバを使い、トークン化されたフォームを扱うデモサーバー。
//!
//! ## 役割
//! - セッション認証（IDトークンCookieの発行）
//! - 機密フィールドのトークンに対するアクセスグラント発行
//! - トークン化フォームの平文解決とフォーム処理への受け渡し
//!
//! ## API エンドポイント
//! - `GET /set-id-token` — IDトークン発行 + リファラへのリダイレクト
//! - `GET /` — 本文なしの200
//! - `POST /signup` — セキュアフォーム処理
//! - `GET /grant` — トークングラント発行
//! - `GET /secure-frame` — 認証プラグインによるセキュアフレームへのリダイレクト

mod auth;
mod config;
mod cookies;
mod endpoints;
mod error;
mod process_form;
mod routes;
mod sessions;

use std::sync::Arc;

use crate::config::{BackendConfig, BackendState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = BackendConfig::from_env()?;
    if config.fallback_session_id.is_some() {
        tracing::warn!("FALLBACK_SESSION_IDが設定されています。Cookieのないgrantリクエストも認可されます（開発環境用）");
    }

    let state = Arc::new(BackendState::from_config(&config, reqwest::Client::new()));
    let app = routes::create_routes(state);

    tracing::info!("バックエンドを {} で起動します", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
