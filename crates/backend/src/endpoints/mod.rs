//! # バックエンドエンドポイント

pub mod grant;
pub mod root;
pub mod set_id_token;
pub mod signup;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use grant::handle_grant;
pub use root::handle_root;
pub use set_id_token::handle_set_id_token;
pub use signup::handle_signup;
