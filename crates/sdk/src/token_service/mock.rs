//! # ローカル開発用モックトークンサービス
//!
//! 外部トークンサービスが利用できない開発環境で使用するモック実装。
//! 入力から決定的なIDトークン・グラントを組み立てて返す。

use lunasec_demo_types::{IdToken, SessionId, TokenGrant};
use reqwest::StatusCode;

use super::TokenAuthService;
use crate::error::SdkError;

/// モックトークンサービス。ローカル開発・テスト用。
#[derive(Debug, Default)]
pub struct MockTokenAuthService {
    /// trueの場合、全呼び出しを503で失敗させる
    failing: bool,
}

impl MockTokenAuthService {
    pub fn new() -> Self {
        Self { failing: false }
    }

    /// 全呼び出しが失敗するモックを構築する。
    pub fn failing() -> Self {
        Self { failing: true }
    }

    fn unavailable() -> SdkError {
        SdkError::Status {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: "mock token service unavailable".to_string(),
        }
    }
}

#[async_trait::async_trait]
impl TokenAuthService for MockTokenAuthService {
    async fn authenticate(&self, session_id: &SessionId) -> Result<IdToken, SdkError> {
        if self.failing {
            return Err(Self::unavailable());
        }
        Ok(IdToken::new(format!("mock-id-token.{session_id}")))
    }

    async fn authorize(
        &self,
        session_id: &SessionId,
        token_id: &str,
    ) -> Result<TokenGrant, SdkError> {
        if self.failing {
            return Err(Self::unavailable());
        }
        Ok(TokenGrant::new(format!("mock-grant.{session_id}.{token_id}")))
    }
}
