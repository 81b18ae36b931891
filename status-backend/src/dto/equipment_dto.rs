// src/dto/equipment_dto.rs
use crate::utils::validation::common;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// --- Request DTOs ---

#[derive(Deserialize, Serialize, Debug, Clone, Validate)]
pub struct CreateEquipmentDto {
    pub building_id: Uuid,

    #[validate(
        length(max = common::name::MAX_LENGTH, message = "Le nom est trop long"),
        custom(function = common::validate_name)
    )]
    pub name: String,

    pub identifier: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    /// 省略時は operational
    pub status: Option<String>,
    pub display_order: Option<i32>,
}

/// 部分更新。指定されたフィールドだけを書き換える
#[derive(Deserialize, Serialize, Debug, Clone, Default, Validate)]
pub struct UpdateEquipmentDto {
    pub building_id: Option<Uuid>,

    #[validate(
        length(max = common::name::MAX_LENGTH, message = "Le nom est trop long"),
        custom(function = common::validate_name)
    )]
    pub name: Option<String>,

    pub identifier: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}

// --- Response DTO ---

/// 公開一覧用（建物名付き）
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PublicEquipmentDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub display_order: i32,
    pub building_id: Uuid,
    pub building_name: Option<String>,
}
