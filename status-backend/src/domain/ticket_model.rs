// src/domain/ticket_model.rs

use super::ticket_status::{TicketStatus, TicketType};
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, DbErr, Set};
use serde::{Deserialize, Serialize};

/// 居住者からの報告チケット
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tickets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub copro_id: Uuid,
    #[sea_orm(nullable)]
    pub service_instance_id: Option<Uuid>,
    pub reporter_name: String,
    pub reporter_email: String,
    #[sea_orm(nullable)]
    pub reporter_phone: Option<String>,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(nullable)]
    pub location: Option<String>,
    pub ticket_type: String,
    pub status: String,
    #[sea_orm(nullable)]
    pub assigned_to: Option<Uuid>,
    #[sea_orm(nullable)]
    pub reviewed_by: Option<Uuid>,
    #[sea_orm(nullable)]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[sea_orm(nullable)]
    pub incident_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
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
        belongs_to = "super::service_instance_model::Entity",
        from = "Column::ServiceInstanceId",
        to = "super::service_instance_model::Column::Id",
        on_delete = "SetNull"
    )]
    ServiceInstance,
    #[sea_orm(
        belongs_to = "super::incident_model::Entity",
        from = "Column::IncidentId",
        to = "super::incident_model::Column::Id",
        on_delete = "SetNull"
    )]
    Incident,
    #[sea_orm(has_many = "super::ticket_comment_model::Entity")]
    Comments,
}

impl Related<super::service_instance_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceInstance.def()
    }
}

impl Related<super::incident_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Incident.def()
    }
}

impl Related<super::ticket_comment_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            ticket_type: Set(TicketType::Incident.as_str().to_string()),
            status: Set(TicketStatus::Analyzing.as_str().to_string()),
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
