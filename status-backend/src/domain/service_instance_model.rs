// src/domain/service_instance_model.rs

use super::service_status::ServiceStatus;
use crate::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, DbErr, Set};
use serde::{Deserialize, Serialize};

/// 設備エンティティ（エレベーター、ボイラー、駐車場ゲートなど）
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service_instances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub copro_id: Uuid,
    pub building_id: Uuid,
    pub name: String,
    #[sea_orm(nullable)]
    pub identifier: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(nullable)]
    pub location: Option<String>,
    pub status: String,
    pub is_active: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    /// 保存されている状態文字列を列挙型として取得
    pub fn service_status(&self) -> AppResult<ServiceStatus> {
        self.status
            .parse::<ServiceStatus>()
            .map_err(AppError::ValidationError)
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
            status: Set(ServiceStatus::Operational.as_str().to_string()),
            is_active: Set(true),
            display_order: Set(0),
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
