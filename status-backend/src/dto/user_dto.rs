// src/dto/user_dto.rs
use crate::domain::user_model;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// ユーザー作成（パスワードは認証コンポーネントでハッシュ済み）
#[derive(Deserialize, Serialize, Debug, Clone, Validate)]
pub struct CreateUserDto {
    #[validate(email(message = "Adresse email invalide"))]
    pub email: String,

    #[validate(length(min = 1, message = "Mot de passe haché requis"))]
    pub hashed_password: String,

    #[serde(default)]
    pub is_superuser: bool,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub lot_number: Option<String>,
    pub floor: Option<String>,
    pub copro_id: Option<Uuid>,
    pub building_id: Option<Uuid>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UserDto {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub lot_number: Option<String>,
    pub floor: Option<String>,
    pub copro_id: Option<Uuid>,
    pub building_id: Option<Uuid>,
}

impl From<user_model::Model> for UserDto {
    fn from(model: user_model::Model) -> Self {
        Self {
            display_name: model.display_name(),
            id: model.id,
            email: model.email,
            is_active: model.is_active,
            is_superuser: model.is_superuser,
            lot_number: model.lot_number,
            floor: model.floor,
            copro_id: model.copro_id,
            building_id: model.building_id,
        }
    }
}
