// src/domain/incident_service_instance_model.rs

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// インシデントと設備の多対多リンク（position 順）
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "incident_service_instances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub incident_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub service_instance_id: Uuid,
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::incident_model::Entity",
        from = "Column::IncidentId",
        to = "super::incident_model::Column::Id",
        on_delete = "Cascade"
    )]
    Incident,
    #[sea_orm(
        belongs_to = "super::service_instance_model::Entity",
        from = "Column::ServiceInstanceId",
        to = "super::service_instance_model::Column::Id",
        on_delete = "Cascade"
    )]
    ServiceInstance,
}

impl Related<super::incident_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Incident.def()
    }
}

impl Related<super::service_instance_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceInstance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
