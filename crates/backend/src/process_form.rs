//! # フォーム処理
//!
//! セキュアリゾルバがトークンを平文に解決した後に呼ばれるデモ用の処理。

use lunasec_demo_types::ResolvedFormData;

/// 解決済みフォームを処理し、処理結果（平文SSN）を返す。
/// SSNが空の場合は `None`。
pub fn process_form(form: ResolvedFormData) -> Option<String> {
    let ssn = form.ssn.trim();
    if ssn.is_empty() {
        return None;
    }
    Some(ssn.to_string())
}
