// src/service/maintenance_service.rs

use crate::auth::AuthenticatedUser;
use crate::db::DbPool;
use crate::domain::maintenance_model::ActiveModel as MaintenanceActiveModel;
use crate::dto::maintenance_dto::{CreateMaintenanceDto, MaintenanceDto, UpdateMaintenanceDto};
use crate::error::{AppError, AppResult};
use crate::repository::maintenance_repository::MaintenanceRepository;
use crate::service::equipment_service::resolve_equipment;
use crate::utils::error_helper::{convert_validation_errors, not_found_error};
use crate::{log_with_context, with_transaction};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelBehavior, ConnectionTrait, IntoActiveModel, Set};
use std::collections::HashSet;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

/// 現在有効なメンテナンスと、その対象設備の和集合
#[derive(Debug, Clone, Default)]
pub struct ActiveMaintenances {
    pub maintenances: Vec<MaintenanceDto>,
    pub equipment_ids: HashSet<Uuid>,
}

impl ActiveMaintenances {
    pub fn covers(&self, equipment_id: Uuid) -> bool {
        self.equipment_ids.contains(&equipment_id)
    }
}

fn ensure_window(start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<()> {
    if end <= start {
        return Err(AppError::ValidationError(
            "La date de fin doit être postérieure à la date de début".to_string(),
        ));
    }
    Ok(())
}

/// 計画メンテナンス期間の管理
///
/// メンテナンスは設備の保存状態を変更しない。表示時にのみ
/// `maintenance` として上書きされる。
pub struct MaintenanceService {
    db: DbPool,
}

impl MaintenanceService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    #[instrument(skip(self, user, input), fields(copro_id = %copro_id))]
    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        copro_id: Uuid,
        input: CreateMaintenanceDto,
    ) -> AppResult<MaintenanceDto> {
        user.require_admin()?;
        input
            .validate()
            .map_err(|e| convert_validation_errors(e, "maintenance_service::create"))?;
        ensure_window(input.start_date, input.end_date)?;

        let maintenance = with_transaction!(self.db, "maintenance.create", |txn| async move {
            let equipment = resolve_equipment(txn, copro_id, &input.service_instance_ids).await?;
            let equipment_ids: Vec<Uuid> = equipment.iter().map(|e| e.id).collect();

            let mut active = MaintenanceActiveModel::new();
            active.copro_id = Set(copro_id);
            active.title = Set(input.title.trim().to_string());
            active.description = Set(input.description);
            active.start_date = Set(input.start_date);
            active.end_date = Set(input.end_date);

            let model = MaintenanceRepository::create(txn, active).await?;
            MaintenanceRepository::replace_links(txn, model.id, &equipment_ids).await?;

            Ok::<_, AppError>(MaintenanceDto::from_model(model, equipment_ids))
        })?;

        log_with_context!(
            tracing::Level::INFO,
            "Maintenance scheduled",
            "maintenance_id" => maintenance.id,
            "equipment_count" => maintenance.service_instance_ids.len()
        );
        Ok(maintenance)
    }

    /// 日付は変更後の組み合わせで再検証する
    #[instrument(skip(self, user, input), fields(copro_id = %copro_id, maintenance_id = %maintenance_id))]
    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        copro_id: Uuid,
        maintenance_id: Uuid,
        input: UpdateMaintenanceDto,
    ) -> AppResult<MaintenanceDto> {
        user.require_admin()?;
        input
            .validate()
            .map_err(|e| convert_validation_errors(e, "maintenance_service::update"))?;

        with_transaction!(self.db, "maintenance.update", |txn| async move {
            let current = MaintenanceRepository::find_in_copro(txn, copro_id, maintenance_id)
                .await?
                .ok_or_else(|| not_found_error("Maintenance", maintenance_id))?;

            let start = input.start_date.unwrap_or(current.start_date);
            let end = input.end_date.unwrap_or(current.end_date);
            ensure_window(start, end)?;

            let replacement = match &input.service_instance_ids {
                Some(ids) => Some(
                    resolve_equipment(txn, copro_id, ids)
                        .await?
                        .into_iter()
                        .map(|e| e.id)
                        .collect::<Vec<_>>(),
                ),
                None => None,
            };

            let mut active = current.into_active_model();
            if let Some(title) = input.title {
                active.title = Set(title.trim().to_string());
            }
            if let Some(description) = input.description {
                active.description = Set(Some(description));
            }
            active.start_date = Set(start);
            active.end_date = Set(end);
            let model = MaintenanceRepository::update(txn, active).await?;

            if let Some(ids) = &replacement {
                MaintenanceRepository::replace_links(txn, model.id, ids).await?;
            }

            let equipment_ids = MaintenanceRepository::equipment_ids_for(txn, &[model.id])
                .await?
                .remove(&model.id)
                .unwrap_or_default();
            Ok::<_, AppError>(MaintenanceDto::from_model(model, equipment_ids))
        })
    }

    #[instrument(skip(self, user), fields(copro_id = %copro_id, maintenance_id = %maintenance_id))]
    pub async fn delete(
        &self,
        user: &AuthenticatedUser,
        copro_id: Uuid,
        maintenance_id: Uuid,
    ) -> AppResult<()> {
        user.require_admin()?;

        with_transaction!(self.db, "maintenance.delete", |txn| async move {
            MaintenanceRepository::find_in_copro(txn, copro_id, maintenance_id)
                .await?
                .ok_or_else(|| not_found_error("Maintenance", maintenance_id))?;
            MaintenanceRepository::delete(txn, maintenance_id).await?;
            Ok::<_, AppError>(())
        })
    }

    /// `now` を含むメンテナンスと対象設備の和集合
    pub async fn active(&self, copro_id: Uuid, now: DateTime<Utc>) -> AppResult<ActiveMaintenances> {
        load_active_maintenances(&self.db, copro_id, now).await
    }

    pub async fn list(&self, copro_id: Uuid) -> AppResult<Vec<MaintenanceDto>> {
        let models = MaintenanceRepository::list(&self.db, copro_id).await?;
        with_equipment(&self.db, models).await
    }

    /// 開始前のメンテナンス
    pub async fn upcoming(
        &self,
        copro_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<MaintenanceDto>> {
        let models = MaintenanceRepository::find_upcoming(&self.db, copro_id, now).await?;
        with_equipment(&self.db, models).await
    }

    pub async fn get(&self, copro_id: Uuid, maintenance_id: Uuid) -> AppResult<MaintenanceDto> {
        let model = MaintenanceRepository::find_in_copro(&self.db, copro_id, maintenance_id)
            .await?
            .ok_or_else(|| not_found_error("Maintenance", maintenance_id))?;
        let mut dtos = with_equipment(&self.db, vec![model]).await?;
        dtos.pop()
            .ok_or_else(|| not_found_error("Maintenance", maintenance_id))
    }
}

async fn with_equipment<C: ConnectionTrait>(
    db: &C,
    models: Vec<crate::domain::maintenance_model::Model>,
) -> AppResult<Vec<MaintenanceDto>> {
    let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
    let mut links = MaintenanceRepository::equipment_ids_for(db, &ids).await?;

    Ok(models
        .into_iter()
        .map(|m| {
            let equipment_ids = links.remove(&m.id).unwrap_or_default();
            MaintenanceDto::from_model(m, equipment_ids)
        })
        .collect())
}

pub(crate) async fn load_active_maintenances<C: ConnectionTrait>(
    db: &C,
    copro_id: Uuid,
    now: DateTime<Utc>,
) -> AppResult<ActiveMaintenances> {
    let models = MaintenanceRepository::find_active(db, copro_id, now).await?;
    let maintenances = with_equipment(db, models).await?;

    let equipment_ids = maintenances
        .iter()
        .flat_map(|m| m.service_instance_ids.iter().copied())
        .collect();

    Ok(ActiveMaintenances {
        maintenances,
        equipment_ids,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_window_must_end_after_start() {
        let start = Utc::now();
        assert!(ensure_window(start, start + Duration::minutes(1)).is_ok());
        assert!(ensure_window(start, start).unwrap_err().is_validation());
        assert!(ensure_window(start, start - Duration::hours(1)).is_err());
    }

    #[test]
    fn test_covers() {
        let id = Uuid::new_v4();
        let active = ActiveMaintenances {
            maintenances: Vec::new(),
            equipment_ids: [id].into_iter().collect(),
        };
        assert!(active.covers(id));
        assert!(!active.covers(Uuid::new_v4()));
    }
}
