// src/dto/building_dto.rs
use crate::utils::validation::common;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Deserialize, Serialize, Debug, Clone, Validate)]
pub struct CreateBuildingDto {
    #[validate(
        length(max = common::name::MAX_LENGTH, message = "Le nom est trop long"),
        custom(function = common::validate_name)
    )]
    pub name: String,
    pub description: Option<String>,
    pub display_order: Option<i32>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, Validate)]
pub struct UpdateBuildingDto {
    #[validate(
        length(max = common::name::MAX_LENGTH, message = "Le nom est trop long"),
        custom(function = common::validate_name)
    )]
    pub name: Option<String>,
    pub description: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}
