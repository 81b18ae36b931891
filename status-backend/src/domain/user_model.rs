// src/domain/user_model.rs

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, DbErr, Set};
use serde::{Deserialize, Serialize};

/// ユーザーエンティティ（管理者と居住者）
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub is_active: bool,
    pub is_superuser: bool,
    #[sea_orm(nullable)]
    pub first_name: Option<String>,
    #[sea_orm(nullable)]
    pub last_name: Option<String>,
    #[sea_orm(nullable)]
    pub lot_number: Option<String>,
    #[sea_orm(nullable)]
    pub floor: Option<String>,
    #[sea_orm(nullable)]
    pub copro_id: Option<Uuid>,
    #[sea_orm(nullable)]
    pub building_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    /// 表示用の氏名（未設定ならメールアドレス）
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => self.email.clone(),
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::copro_model::Entity",
        from = "Column::CoproId",
        to = "super::copro_model::Column::Id"
    )]
    Copro,
    #[sea_orm(
        belongs_to = "super::building_model::Entity",
        from = "Column::BuildingId",
        to = "super::building_model::Column::Id"
    )]
    Building,
}

impl Related<super::copro_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Copro.def()
    }
}

impl Related<super::building_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Building.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            is_active: Set(true),
            is_superuser: Set(false),
            created_at: Set(Utc::now()),
            updated_at: Set(Utc::now()),
            ..ActiveModelTrait::default()
        }
    }

    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if !insert {
            self.updated_at = Set(Utc::now());
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first: Option<&str>, last: Option<&str>) -> Model {
        Model {
            id: Uuid::new_v4(),
            email: "gardien@residence.fr".to_string(),
            hashed_password: "hash".to_string(),
            is_active: true,
            is_superuser: true,
            first_name: first.map(str::to_string),
            last_name: last.map(str::to_string),
            lot_number: None,
            floor: None,
            copro_id: None,
            building_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(user(Some("Marie"), Some("Curie")).display_name(), "Marie Curie");
        assert_eq!(user(None, None).display_name(), "gardien@residence.fr");
    }

    #[test]
    fn test_password_is_not_serialized() {
        let json = serde_json::to_string(&user(None, None)).unwrap();
        assert!(!json.contains("hashed_password"));
    }
}
