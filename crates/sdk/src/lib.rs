//! # LunaSec デモ SDK
//!
//! 外部のトークンサービス・セキュアリゾルバへのクライアントを提供する。
//!
//! ## 構成
//! - `token_service` — セッション認証（IDトークン発行）とグラント発行
//! - `resolver` — トークンの平文解決と、解決済みフォームを受け取る関数のラップ
//! - `auth_plugin` — axumルーターに登録するセキュアフレーム認証プラグイン
//!
//! トークンの暗号処理・検証は外部サービス側の責務であり、本クレートでは扱わない。

pub mod auth_plugin;
pub mod client;
pub mod error;
pub mod resolver;
pub mod token_service;

#[cfg(test)]
mod test_helpers;

pub use auth_plugin::{AuthContextCallback, AuthPlugin, SessionResolver};
pub use error::SdkError;
pub use resolver::{
    DeploymentStage, Detokenizer, HttpDetokenizer, MockDetokenizer, SecureFunction,
    SecureResolver,
};
pub use token_service::{HttpTokenAuthService, MockTokenAuthService, TokenAuthService};
