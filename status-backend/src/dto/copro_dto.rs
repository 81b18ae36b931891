// src/dto/copro_dto.rs
use crate::domain::copro_model;
use crate::utils::validation::common;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// --- Request DTOs ---

#[derive(Deserialize, Serialize, Debug, Clone, Validate)]
pub struct CreateCoproDto {
    #[validate(
        length(max = common::name::MAX_LENGTH, message = "Le nom est trop long"),
        custom(function = common::validate_name)
    )]
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    #[validate(length(max = 16, message = "Code postal trop long"))]
    pub postal_code: Option<String>,
    /// 省略時は "France"
    pub country: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, Validate)]
pub struct UpdateCoproDto {
    #[validate(
        length(max = common::name::MAX_LENGTH, message = "Le nom est trop long"),
        custom(function = common::validate_name)
    )]
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    #[validate(length(max = 16, message = "Code postal trop long"))]
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub is_active: Option<bool>,
}

// --- Response DTO ---

/// 公開ステータスページに載せるコプロ情報
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CoproInfoDto {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: String,
}

impl From<copro_model::Model> for CoproInfoDto {
    fn from(model: copro_model::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            address: model.address,
            city: model.city,
            postal_code: model.postal_code,
            country: model.country,
        }
    }
}
