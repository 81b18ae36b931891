// src/service/availability_service.rs

//! 稼働率統計
//!
//! インシデント履歴から毎回再計算する読み取り専用の集計で、結果は保存しない。

use crate::db::DbPool;
use crate::domain::{incident_model, service_instance_model};
use crate::dto::statistics_dto::{
    DailyIncidentCount, EquipmentAvailabilityDto, IncidentSummaryDto, ResolutionTimeDto,
    StatisticsDto,
};
use crate::error::AppResult;
use crate::repository::building_repository::BuildingRepository;
use crate::repository::incident_repository::IncidentRepository;
use crate::repository::service_instance_repository::{
    ServiceInstanceFilter, ServiceInstanceRepository,
};
use crate::utils::error_helper::{not_found_error, validation_error};
use crate::with_transaction;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use sea_orm::ConnectionTrait;
use std::collections::{BTreeMap, HashMap};
use tracing::instrument;
use uuid::Uuid;

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// 年間の総時間（8760 または 8784）
pub fn total_hours(year: i32) -> f64 {
    let days = if is_leap_year(year) { 366.0 } else { 365.0 };
    days * 24.0
}

/// [1 月 1 日 00:00:00, 12 月 31 日 23:59:59]（UTC）
pub fn year_bounds(year: i32) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
    let start = Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).single();
    let end = Utc.with_ymd_and_hms(year, 12, 31, 23, 59, 59).single();

    match (start, end) {
        (Some(start), Some(end)) => Ok((start, end)),
        _ => Err(validation_error("year", "année hors limites")),
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 経過時間（時間単位）。負の区間は 0 とみなす
pub fn hours_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    let seconds = (end - start).num_seconds();
    if seconds <= 0 {
        0.0
    } else {
        seconds as f64 / 3600.0
    }
}

/// 集計に必要なインシデントの時間範囲
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncidentWindow {
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl From<&incident_model::Model> for IncidentWindow {
    fn from(model: &incident_model::Model) -> Self {
        Self {
            created_at: model.created_at,
            resolved_at: model.resolved_at,
        }
    }
}

impl IncidentWindow {
    /// 年の範囲に切り詰めた停止時間。未解決なら now までを数える
    pub fn downtime_within(
        &self,
        year_start: DateTime<Utc>,
        year_end: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> f64 {
        let start = self.created_at.max(year_start);
        let end = match self.resolved_at {
            Some(resolved_at) => resolved_at.min(year_end),
            None => now.min(year_end),
        };
        hours_between(start, end)
    }
}

/// 1 設備分の稼働率を計算する
pub fn compute_availability(
    equipment: &service_instance_model::Model,
    incidents: &[IncidentWindow],
    year: i32,
    now: DateTime<Utc>,
) -> AppResult<EquipmentAvailabilityDto> {
    let (year_start, year_end) = year_bounds(year)?;
    let total = total_hours(year);

    let mut downtime = 0.0;
    let mut resolved_total = 0.0;
    let mut resolved_count = 0u32;

    for incident in incidents {
        let hours = incident.downtime_within(year_start, year_end, now);
        downtime += hours;
        if incident.resolved_at.is_some() {
            resolved_total += hours;
            resolved_count += 1;
        }
    }

    let availability = ((total - downtime) / total * 100.0).clamp(0.0, 100.0);
    let avg_resolution_hours =
        (resolved_count > 0).then(|| round2(resolved_total / f64::from(resolved_count)));

    Ok(EquipmentAvailabilityDto {
        equipment_id: equipment.id,
        equipment_name: equipment.name.clone(),
        incident_count: incidents.len() as u64,
        downtime_hours: round2(downtime),
        availability_percent: round2(availability),
        avg_resolution_hours,
    })
}

/// 作成日ごとの件数（日付順）
pub fn count_by_day(incidents: &[incident_model::Model]) -> Vec<DailyIncidentCount> {
    let mut counts: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for incident in incidents {
        *counts.entry(incident.created_at.date_naive()).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(date, count)| DailyIncidentCount { date, count })
        .collect()
}

/// 全期間の解決済みインシデントから設備ごとの最小・平均・最大解決時間
pub fn resolution_times(
    equipment: &[service_instance_model::Model],
    resolved: &[incident_model::Model],
    links: &HashMap<Uuid, Vec<Uuid>>,
) -> Vec<ResolutionTimeDto> {
    let mut durations: HashMap<Uuid, Vec<f64>> = HashMap::new();
    for incident in resolved {
        let Some(resolved_at) = incident.resolved_at else {
            continue;
        };
        let hours = hours_between(incident.created_at, resolved_at);
        for equipment_id in links.get(&incident.id).into_iter().flatten() {
            durations.entry(*equipment_id).or_default().push(hours);
        }
    }

    equipment
        .iter()
        .filter_map(|e| {
            let hours = durations.get(&e.id)?;
            let min = hours.iter().copied().fold(f64::INFINITY, f64::min);
            let max = hours.iter().copied().fold(0.0, f64::max);
            let avg = hours.iter().sum::<f64>() / hours.len() as f64;
            Some(ResolutionTimeDto {
                equipment_id: e.id,
                equipment_name: e.name.clone(),
                resolved_count: hours.len() as u64,
                min_hours: round2(min),
                avg_hours: round2(avg),
                max_hours: round2(max),
            })
        })
        .collect()
}

/// 稼働率統計サービス
pub struct AvailabilityService {
    db: DbPool,
}

impl AvailabilityService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// コプロの有効な全設備の統計
    #[instrument(skip(self), fields(copro_id = %copro_id, year = year))]
    pub async fn general_statistics(
        &self,
        copro_id: Uuid,
        year: i32,
        now: DateTime<Utc>,
    ) -> AppResult<StatisticsDto> {
        year_bounds(year)?;

        with_transaction!(self.db, "statistics.general", |txn| async move {
            build_statistics(txn, copro_id, None, year, now).await
        })
    }

    /// 1 つの建物に限定した統計
    #[instrument(skip(self), fields(copro_id = %copro_id, building_id = %building_id, year = year))]
    pub async fn building_statistics(
        &self,
        copro_id: Uuid,
        building_id: Uuid,
        year: i32,
        now: DateTime<Utc>,
    ) -> AppResult<StatisticsDto> {
        year_bounds(year)?;

        with_transaction!(self.db, "statistics.building", |txn| async move {
            BuildingRepository::find_in_copro(txn, copro_id, building_id)
                .await?
                .ok_or_else(|| not_found_error("Bâtiment", building_id))?;
            build_statistics(txn, copro_id, Some(building_id), year, now).await
        })
    }
}

async fn build_statistics<C: ConnectionTrait>(
    db: &C,
    copro_id: Uuid,
    building_id: Option<Uuid>,
    year: i32,
    now: DateTime<Utc>,
) -> AppResult<StatisticsDto> {
    let (year_start, year_end) = year_bounds(year)?;

    let equipment = ServiceInstanceRepository::list(
        db,
        copro_id,
        ServiceInstanceFilter {
            building_id,
            active_only: true,
        },
    )
    .await?;
    let names: HashMap<Uuid, &str> = equipment.iter().map(|e| (e.id, e.name.as_str())).collect();

    let year_incidents =
        IncidentRepository::find_created_between(db, copro_id, year_start, year_end).await?;
    let year_ids: Vec<Uuid> = year_incidents.iter().map(|i| i.id).collect();
    let year_links = IncidentRepository::equipment_ids_for(db, &year_ids).await?;

    // 建物で絞る場合は対象設備に触れるインシデントだけを残す
    let year_incidents: Vec<incident_model::Model> = year_incidents
        .into_iter()
        .filter(|i| {
            building_id.is_none()
                || year_links
                    .get(&i.id)
                    .is_some_and(|ids| ids.iter().any(|id| names.contains_key(id)))
        })
        .collect();

    let mut windows: HashMap<Uuid, Vec<IncidentWindow>> = HashMap::new();
    for incident in &year_incidents {
        for equipment_id in year_links.get(&incident.id).into_iter().flatten() {
            windows
                .entry(*equipment_id)
                .or_default()
                .push(IncidentWindow::from(incident));
        }
    }

    let mut equipment_availability = Vec::with_capacity(equipment.len());
    for e in &equipment {
        let incidents = windows.get(&e.id).map(Vec::as_slice).unwrap_or_default();
        equipment_availability.push(compute_availability(e, incidents, year, now)?);
    }

    let resolved = IncidentRepository::find_resolved(db, copro_id).await?;
    let resolved_ids: Vec<Uuid> = resolved.iter().map(|i| i.id).collect();
    let resolved_links = IncidentRepository::equipment_ids_for(db, &resolved_ids).await?;
    let resolution_time_by_equipment = resolution_times(&equipment, &resolved, &resolved_links);

    let incidents_by_day = count_by_day(&year_incidents);
    let all_incidents = year_incidents
        .into_iter()
        .map(|i| {
            let primary = year_links.get(&i.id).and_then(|ids| ids.first());
            IncidentSummaryDto {
                id: i.id,
                title: i.title,
                service_instance: primary
                    .and_then(|id| names.get(id))
                    .map(|n| (*n).to_string()),
                status: i.status,
                created_at: i.created_at,
                resolved_at: i.resolved_at,
                resolution_time_hours: i
                    .resolved_at
                    .map(|r| round2(hours_between(i.created_at, r))),
            }
        })
        .collect();

    Ok(StatisticsDto {
        year,
        total_hours: total_hours(year),
        building_id,
        incidents_by_day,
        equipment_availability,
        resolution_time_by_equipment,
        all_incidents,
    })
}
