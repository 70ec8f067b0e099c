//! # SDK エラー型

use reqwest::StatusCode;

/// 外部サービス呼び出しのエラー型。
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    /// HTTP送信・受信に失敗
    #[error("HTTP通信に失敗: {0}")]
    Http(String),
    /// 外部サービスが非2xxを返した
    #[error("外部サービスがエラーを返しました: HTTP {status} - {body}")]
    Status { status: StatusCode, body: String },
    /// レスポンスのデコードに失敗
    #[error("レスポンスのデコードに失敗: {0}")]
    Decode(String),
    /// 不正なトークン
    #[error("不正なトークン: {0}")]
    InvalidToken(String),
    /// 設定不備
    #[error("設定が不正です: {0}")]
    Config(String),
}
