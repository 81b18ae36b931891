// src/domain/incident_model.rs

use super::incident_status::IncidentStatus;
use crate::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, DbErr, Set};
use serde::{Deserialize, Serialize};

/// インシデントエンティティ
///
/// 対象設備は `incident_service_instances` で保持する。旧来の単一設備 ID は
/// 保存せず、リンクの先頭要素として導出する。
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "incidents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub copro_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub message: Option<String>,
    pub status: String,
    pub is_scheduled: bool,
    #[sea_orm(nullable)]
    pub scheduled_for: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sea_orm(nullable)]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Model {
    pub fn incident_status(&self) -> AppResult<IncidentStatus> {
        self.status
            .parse::<IncidentStatus>()
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
    #[sea_orm(has_many = "super::incident_service_instance_model::Entity")]
    ServiceInstanceLinks,
    #[sea_orm(has_many = "super::incident_update_model::Entity")]
    Updates,
    #[sea_orm(has_many = "super::incident_comment_model::Entity")]
    Comments,
}

impl Related<super::copro_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Copro.def()
    }
}

impl Related<super::incident_update_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Updates.def()
    }
}

impl Related<super::incident_comment_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl Related<super::service_instance_model::Entity> for Entity {
    fn to() -> RelationDef {
        super::incident_service_instance_model::Relation::ServiceInstance.def()
    }

    fn via() -> Option<RelationDef> {
        Some(
            super::incident_service_instance_model::Relation::Incident
                .def()
                .rev(),
        )
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            status: Set(IncidentStatus::Investigating.as_str().to_string()),
            is_scheduled: Set(false),
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
