// src/dto/status_dto.rs
use crate::domain::service_status::ServiceStatus;
use crate::dto::copro_dto::CoproInfoDto;
use crate::dto::incident_dto::IncidentUpdateDto;
use crate::dto::maintenance_dto::MaintenanceDto;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// ステータスページの設備行（メンテナンス中なら status は maintenance）
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ServiceStatusDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: ServiceStatus,
    pub display_order: i32,
    pub building_id: Uuid,
    pub building_name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PublicIncidentDto {
    pub id: Uuid,
    pub title: String,
    pub message: Option<String>,
    pub status: String,
    pub is_scheduled: bool,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub service_instance_id: Option<Uuid>,
    /// 主設備の現在の状態
    pub equipment_status: Option<String>,
    pub updates: Vec<IncidentUpdateDto>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StatusPageDto {
    pub services: Vec<ServiceStatusDto>,
    pub incidents: Vec<PublicIncidentDto>,
    pub maintenances: Vec<MaintenanceDto>,
    pub overall_status: ServiceStatus,
    pub copro: Option<CoproInfoDto>,
}

impl StatusPageDto {
    /// 有効なコプロがない場合のページ
    pub fn empty() -> Self {
        Self {
            services: Vec::new(),
            incidents: Vec::new(),
            maintenances: Vec::new(),
            overall_status: ServiceStatus::Operational,
            copro: None,
        }
    }
}
