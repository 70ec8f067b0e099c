//! # トークン認証サービス
//!
//! セッション認証（IDトークン発行）とトークンへのアクセスグラント発行を抽象化するトレイト。
//! 環境変数 `MOCK_MODE` で実装を切り替える。
//!
//! 現在の実装:
//! - `http` — 外部トークンサービスへのHTTPクライアント
//! - `mock` — ローカル開発・テスト用（メモリ内で決定的な値を返す）

pub mod http;
pub mod mock;

pub use http::HttpTokenAuthService;
pub use mock::MockTokenAuthService;

use lunasec_demo_types::{IdToken, SessionId, TokenGrant};

use crate::error::SdkError;

/// トークン認証サービスのトレイト。
#[async_trait::async_trait]
pub trait TokenAuthService: Send + Sync {
    /// セッションを認証し、IDトークンを発行する。
    async fn authenticate(&self, session_id: &SessionId) -> Result<IdToken, SdkError>;

    /// セッションに対して、指定トークンへのアクセスグラントを発行する。
    async fn authorize(
        &self,
        session_id: &SessionId,
        token_id: &str,
    ) -> Result<TokenGrant, SdkError>;
}
