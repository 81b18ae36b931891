// src/dto/statistics_dto.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DailyIncidentCount {
    pub date: NaiveDate,
    pub count: u64,
}

/// 設備ごとの稼働率（年単位）
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EquipmentAvailabilityDto {
    pub equipment_id: Uuid,
    pub equipment_name: String,
    pub incident_count: u64,
    pub downtime_hours: f64,
    pub availability_percent: f64,
    pub avg_resolution_hours: Option<f64>,
}

/// 設備ごとの解決時間（全期間の解決済みインシデント）
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ResolutionTimeDto {
    pub equipment_id: Uuid,
    pub equipment_name: String,
    pub resolved_count: u64,
    pub min_hours: f64,
    pub avg_hours: f64,
    pub max_hours: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IncidentSummaryDto {
    pub id: Uuid,
    pub title: String,
    pub service_instance: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolution_time_hours: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StatisticsDto {
    pub year: i32,
    pub total_hours: f64,
    /// 建物別統計の場合のみ
    pub building_id: Option<Uuid>,
    pub incidents_by_day: Vec<DailyIncidentCount>,
    pub equipment_availability: Vec<EquipmentAvailabilityDto>,
    pub resolution_time_by_equipment: Vec<ResolutionTimeDto>,
    pub all_incidents: Vec<IncidentSummaryDto>,
}
