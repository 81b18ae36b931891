// src/domain/maintenance_service_instance_model.rs

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "maintenance_service_instances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub maintenance_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub service_instance_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::maintenance_model::Entity",
        from = "Column::MaintenanceId",
        to = "super::maintenance_model::Column::Id",
        on_delete = "Cascade"
    )]
    Maintenance,
    #[sea_orm(
        belongs_to = "super::service_instance_model::Entity",
        from = "Column::ServiceInstanceId",
        to = "super::service_instance_model::Column::Id",
        on_delete = "Cascade"
    )]
    ServiceInstance,
}

impl Related<super::maintenance_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Maintenance.def()
    }
}

impl Related<super::service_instance_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceInstance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
