// src/utils/validation.rs

pub mod common;

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

/// フランス国内形式の電話番号（正規化後）: 0 + 1〜9 + 8 桁
pub static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0[1-9][0-9]{8}$").expect("Invalid phone regex"));

/// 電話番号から空白・ハイフン・ピリオドを取り除く
pub fn normalize_phone(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.'))
        .collect()
}

/// 電話番号を正規化して検証する
pub fn validate_phone(raw: &str) -> Result<(), ValidationError> {
    if PHONE_REGEX.is_match(&normalize_phone(raw)) {
        Ok(())
    } else {
        let mut error = ValidationError::new("invalid_phone");
        error.message = Some(
            "Numéro de téléphone invalide (format attendu: 10 chiffres commençant par 0, ex. 06 12 34 56 78)"
                .into(),
        );
        Err(error)
    }
}

/// メールアドレスの前後の空白を除き小文字にする（検証前に適用する）
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// 前後の空白を除いた文字数
pub fn trimmed_len(value: &str) -> usize {
    value.trim().chars().count()
}

/// 設備名の末尾にある「(識別子)」を取り除いた表示名
///
/// "Ascenseur 1 (ASC-A-01)" -> "Ascenseur 1"
pub fn display_name(name: &str) -> String {
    if !(name.contains('(') && name.contains(')')) {
        return name.to_string();
    }

    let head = name.split('(').next().unwrap_or(name).trim();
    if head.is_empty() {
        name.trim().to_string()
    } else {
        head.to_string()
    }
}
