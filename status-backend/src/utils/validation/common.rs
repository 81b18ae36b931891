// src/utils/validation/common.rs

//! 共通バリデーション定数とカスタムバリデーション関数
//!
//! 文字数はすべて前後の空白を除いて数える。

use super::trimmed_len;
use validator::ValidationError;

// =============================================================================
// バリデーション定数
// =============================================================================

/// チケット関連の制約
pub mod ticket {
    pub const TITLE_MIN_LENGTH: usize = 3;
    pub const DESCRIPTION_MIN_LENGTH: usize = 10;
    pub const REPORTER_NAME_MIN_LENGTH: usize = 2;
    pub const LOCATION_MIN_LENGTH: usize = 3;
}

/// 名称（コプロ、建物、設備）の制約
pub mod name {
    pub const MIN_LENGTH: usize = 2;
    pub const MAX_LENGTH: u64 = 200;
}

/// インシデント関連の制約
pub mod incident {
    pub const TITLE_MIN_LENGTH: usize = 3;
    pub const COMMENT_MIN_LENGTH: usize = 1;
}

// =============================================================================
// カスタムバリデーション関数
// =============================================================================

fn min_trimmed(
    value: &str,
    min: usize,
    code: &'static str,
    message: String,
) -> Result<(), ValidationError> {
    if trimmed_len(value) < min {
        let mut error = ValidationError::new(code);
        error.message = Some(message.into());
        return Err(error);
    }
    Ok(())
}

pub fn validate_ticket_title(value: &str) -> Result<(), ValidationError> {
    min_trimmed(
        value,
        ticket::TITLE_MIN_LENGTH,
        "title_too_short",
        format!(
            "Le titre doit contenir au moins {} caractères",
            ticket::TITLE_MIN_LENGTH
        ),
    )
}

pub fn validate_ticket_description(value: &str) -> Result<(), ValidationError> {
    min_trimmed(
        value,
        ticket::DESCRIPTION_MIN_LENGTH,
        "description_too_short",
        format!(
            "La description doit contenir au moins {} caractères",
            ticket::DESCRIPTION_MIN_LENGTH
        ),
    )
}

pub fn validate_reporter_name(value: &str) -> Result<(), ValidationError> {
    min_trimmed(
        value,
        ticket::REPORTER_NAME_MIN_LENGTH,
        "name_too_short",
        format!(
            "Le nom doit contenir au moins {} caractères",
            ticket::REPORTER_NAME_MIN_LENGTH
        ),
    )
}

pub fn validate_location(value: &str) -> Result<(), ValidationError> {
    min_trimmed(
        value,
        ticket::LOCATION_MIN_LENGTH,
        "location_too_short",
        format!(
            "La localisation doit contenir au moins {} caractères",
            ticket::LOCATION_MIN_LENGTH
        ),
    )
}

/// コプロ・建物・設備の名称
pub fn validate_name(value: &str) -> Result<(), ValidationError> {
    min_trimmed(
        value,
        name::MIN_LENGTH,
        "name_too_short",
        format!(
            "Le nom doit contenir au moins {} caractères",
            name::MIN_LENGTH
        ),
    )
}

pub fn validate_incident_title(value: &str) -> Result<(), ValidationError> {
    min_trimmed(
        value,
        incident::TITLE_MIN_LENGTH,
        "title_too_short",
        format!(
            "Le titre doit contenir au moins {} caractères",
            incident::TITLE_MIN_LENGTH
        ),
    )
}

/// 空白のみの本文を拒否する（コメント、更新メッセージ）
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    min_trimmed(
        value,
        incident::COMMENT_MIN_LENGTH,
        "empty_or_whitespace",
        "Le texte ne peut pas être vide".to_string(),
    )
}
