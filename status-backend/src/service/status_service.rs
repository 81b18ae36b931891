// src/service/status_service.rs

//! 公開ステータスページの集計

use crate::db::DbPool;
use crate::domain::service_status::ServiceStatus;
use crate::domain::{building_model, incident_model, service_instance_model};
use crate::dto::copro_dto::CoproInfoDto;
use crate::dto::incident_dto::IncidentUpdateDto;
use crate::dto::status_dto::{PublicIncidentDto, ServiceStatusDto, StatusPageDto};
use crate::error::{AppError, AppResult};
use crate::repository::incident_repository::IncidentRepository;
use crate::repository::service_instance_repository::ServiceInstanceRepository;
use crate::service::copro_service::ensure_active_copro;
use crate::service::maintenance_service::load_active_maintenances;
use crate::utils::validation::display_name;
use crate::with_transaction;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use tracing::instrument;
use uuid::Uuid;

/// ステータスページに載せるインシデント数
pub const RECENT_INCIDENT_LIMIT: u64 = 20;

/// メンテナンス中の設備は保存状態に関係なく maintenance と表示する
pub fn effective_status(
    stored: ServiceStatus,
    equipment_id: Uuid,
    maintenance_ids: &HashSet<Uuid>,
) -> ServiceStatus {
    if maintenance_ids.contains(&equipment_id) {
        ServiceStatus::Maintenance
    } else {
        stored
    }
}

/// 最も深刻な状態。空なら operational
pub fn overall_status<I>(statuses: I) -> ServiceStatus
where
    I: IntoIterator<Item = ServiceStatus>,
{
    statuses
        .into_iter()
        .max_by_key(ServiceStatus::severity)
        .unwrap_or(ServiceStatus::Operational)
}

pub struct StatusService {
    db: DbPool,
}

impl StatusService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// 公開ステータスページ
    ///
    /// `copro_id` が None（有効なコプロなし）の場合は空のページを返す。
    #[instrument(skip(self))]
    pub async fn status_page(
        &self,
        copro_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> AppResult<StatusPageDto> {
        let Some(copro_id) = copro_id else {
            return Ok(StatusPageDto::empty());
        };

        with_transaction!(self.db, "status.page", |txn| async move {
            let copro = ensure_active_copro(txn, copro_id).await?;
            let maintenance = load_active_maintenances(txn, copro_id, now).await?;

            let equipment =
                ServiceInstanceRepository::list_active_with_building(txn, copro_id).await?;
            let services = equipment
                .into_iter()
                .map(|(e, building)| service_row(e, building, &maintenance.equipment_ids))
                .collect::<AppResult<Vec<_>>>()?;

            let overall = overall_status(services.iter().map(|s| s.status));

            let incidents =
                IncidentRepository::list(txn, copro_id, None, Some(RECENT_INCIDENT_LIMIT)).await?;
            let incident_ids: Vec<Uuid> = incidents.iter().map(|i| i.id).collect();
            let links = IncidentRepository::equipment_ids_for(txn, &incident_ids).await?;
            let mut updates = IncidentRepository::updates_for(txn, &incident_ids).await?;

            let primary_ids: Vec<Uuid> = links
                .values()
                .filter_map(|ids| ids.first().copied())
                .collect();
            let primary_status: HashMap<Uuid, String> =
                ServiceInstanceRepository::find_many_in_copro(txn, copro_id, &primary_ids)
                    .await?
                    .into_iter()
                    .map(|e| (e.id, e.status))
                    .collect();

            let incidents = incidents
                .into_iter()
                .map(|incident| {
                    let primary = links.get(&incident.id).and_then(|ids| ids.first().copied());
                    let updates = updates.remove(&incident.id).unwrap_or_default();
                    public_incident(
                        incident,
                        primary,
                        primary.and_then(|id| primary_status.get(&id).cloned()),
                        updates.into_iter().map(Into::into).collect(),
                    )
                })
                .collect();

            Ok::<_, AppError>(StatusPageDto {
                services,
                incidents,
                maintenances: maintenance.maintenances,
                overall_status: overall,
                copro: Some(CoproInfoDto::from(copro)),
            })
        })
    }
}

fn service_row(
    equipment: service_instance_model::Model,
    building: Option<building_model::Model>,
    maintenance_ids: &HashSet<Uuid>,
) -> AppResult<ServiceStatusDto> {
    let stored = equipment.service_status()?;

    Ok(ServiceStatusDto {
        id: equipment.id,
        name: display_name(&equipment.name),
        description: equipment.description,
        status: effective_status(stored, equipment.id, maintenance_ids),
        display_order: equipment.display_order,
        building_id: equipment.building_id,
        building_name: building.map(|b| b.name),
    })
}

fn public_incident(
    incident: incident_model::Model,
    primary: Option<Uuid>,
    equipment_status: Option<String>,
    updates: Vec<IncidentUpdateDto>,
) -> PublicIncidentDto {
    PublicIncidentDto {
        id: incident.id,
        title: incident.title,
        message: incident.message,
        status: incident.status,
        is_scheduled: incident.is_scheduled,
        scheduled_for: incident.scheduled_for,
        created_at: incident.created_at,
        resolved_at: incident.resolved_at,
        service_instance_id: primary,
        equipment_status,
        updates,
    }
}
