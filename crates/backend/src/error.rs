//! # バックエンド エラー型
//!
//! 全ハンドラで共通のエラー型。
//! レスポンスは本文なしのステータスコードのみで、ログは境界でまとめて出力する。

use axum::http::StatusCode;
use lunasec_demo_sdk::SdkError;

/// バックエンドエラー型。
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// 不正なリクエスト（必須フィールド欠落、型不一致、パース失敗）
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),
    /// セッションを特定できない
    #[error("認証が必要です: {0}")]
    Unauthorized(String),
    /// 外部サービス（トークンサービス・リゾルバ）の失敗
    #[error("外部サービス呼び出しに失敗: {0}")]
    Sdk(#[from] SdkError),
    /// 内部エラー
    #[error("内部エラー: {0}")]
    Internal(String),
}

impl BackendError {
    pub fn status(&self) -> StatusCode {
        match self {
            BackendError::BadRequest(_) | BackendError::Sdk(SdkError::InvalidToken(_)) => {
                StatusCode::BAD_REQUEST
            }
            BackendError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            BackendError::Sdk(_) | BackendError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl axum::response::IntoResponse for BackendError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "リクエスト処理に失敗");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "リクエストを拒否");
        }
        status.into_response()
    }
}
