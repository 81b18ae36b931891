// src/dto/maintenance_dto.rs
use crate::domain::maintenance_model;
use crate::utils::validation::common;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Deserialize, Serialize, Debug, Clone, Validate)]
pub struct CreateMaintenanceDto {
    #[validate(
        length(max = 200, message = "Le titre est trop long"),
        custom(function = common::validate_incident_title)
    )]
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub service_instance_ids: Vec<Uuid>,
}

/// `service_instance_ids` が Some の場合は対象設備を置き換える
#[derive(Deserialize, Serialize, Debug, Clone, Default, Validate)]
pub struct UpdateMaintenanceDto {
    #[validate(
        length(max = 200, message = "Le titre est trop long"),
        custom(function = common::validate_incident_title)
    )]
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub service_instance_ids: Option<Vec<Uuid>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MaintenanceDto {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub service_instance_ids: Vec<Uuid>,
}

impl MaintenanceDto {
    pub fn from_model(model: maintenance_model::Model, service_instance_ids: Vec<Uuid>) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            start_date: model.start_date,
            end_date: model.end_date,
            service_instance_ids,
        }
    }
}
