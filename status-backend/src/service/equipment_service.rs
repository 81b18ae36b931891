// src/service/equipment_service.rs

use crate::auth::AuthenticatedUser;
use crate::db::DbPool;
use crate::domain::service_instance_model::{self, ActiveModel as ServiceInstanceActiveModel};
use crate::domain::service_status::ServiceStatus;
use crate::dto::equipment_dto::{CreateEquipmentDto, PublicEquipmentDto, UpdateEquipmentDto};
use crate::error::{AppError, AppResult};
use crate::repository::building_repository::BuildingRepository;
use crate::repository::service_instance_repository::{
    ServiceInstanceFilter, ServiceInstanceRepository,
};
use crate::utils::error_helper::{convert_validation_errors, not_found_error};
use crate::{log_with_context, with_transaction};
use sea_orm::{ActiveModelBehavior, ConnectionTrait, IntoActiveModel, Set};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

/// 5 値のいずれかでなければ Validation エラー
pub fn parse_service_status(raw: &str) -> AppResult<ServiceStatus> {
    raw.parse::<ServiceStatus>()
        .map_err(AppError::ValidationError)
}

/// 設備の登録と状態管理
pub struct EquipmentService {
    db: DbPool,
}

impl EquipmentService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    #[instrument(skip(self, user, input), fields(copro_id = %copro_id))]
    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        copro_id: Uuid,
        input: CreateEquipmentDto,
    ) -> AppResult<service_instance_model::Model> {
        user.require_admin()?;
        input
            .validate()
            .map_err(|e| convert_validation_errors(e, "equipment_service::create"))?;

        let status = match input.status.as_deref() {
            Some(raw) => parse_service_status(raw)?,
            None => ServiceStatus::Operational,
        };

        let instance = with_transaction!(self.db, "equipment.create", |txn| async move {
            BuildingRepository::find_in_copro(txn, copro_id, input.building_id)
                .await?
                .ok_or_else(|| not_found_error("Bâtiment", input.building_id))?;

            let name = input.name.trim().to_string();
            ensure_unique_name(txn, copro_id, &name, None).await?;

            let mut active = ServiceInstanceActiveModel::new();
            active.copro_id = Set(copro_id);
            active.building_id = Set(input.building_id);
            active.name = Set(name);
            active.identifier = Set(input.identifier);
            active.description = Set(input.description);
            active.location = Set(input.location);
            active.status = Set(status.as_str().to_string());
            active.display_order = Set(input.display_order.unwrap_or(0));

            Ok::<_, AppError>(ServiceInstanceRepository::create(txn, active).await?)
        })?;

        log_with_context!(
            tracing::Level::INFO,
            "Equipment created",
            "equipment_id" => instance.id,
            "status" => &instance.status
        );
        Ok(instance)
    }

    /// 部分更新。名前と状態は指定された場合だけ再検証する
    #[instrument(skip(self, user, input), fields(copro_id = %copro_id, equipment_id = %equipment_id))]
    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        copro_id: Uuid,
        equipment_id: Uuid,
        input: UpdateEquipmentDto,
    ) -> AppResult<service_instance_model::Model> {
        user.require_admin()?;
        input
            .validate()
            .map_err(|e| convert_validation_errors(e, "equipment_service::update"))?;

        let status = input
            .status
            .as_deref()
            .map(parse_service_status)
            .transpose()?;

        with_transaction!(self.db, "equipment.update", |txn| async move {
            let instance = ServiceInstanceRepository::find_in_copro(txn, copro_id, equipment_id)
                .await?
                .ok_or_else(|| not_found_error("Équipement", equipment_id))?;

            let mut active = instance.into_active_model();

            if let Some(building_id) = input.building_id {
                BuildingRepository::find_in_copro(txn, copro_id, building_id)
                    .await?
                    .ok_or_else(|| not_found_error("Bâtiment", building_id))?;
                active.building_id = Set(building_id);
            }
            if let Some(name) = input.name {
                let name = name.trim().to_string();
                ensure_unique_name(txn, copro_id, &name, Some(equipment_id)).await?;
                active.name = Set(name);
            }
            if let Some(identifier) = input.identifier {
                active.identifier = Set(Some(identifier));
            }
            if let Some(description) = input.description {
                active.description = Set(Some(description));
            }
            if let Some(location) = input.location {
                active.location = Set(Some(location));
            }
            if let Some(status) = status {
                active.status = Set(status.as_str().to_string());
            }
            if let Some(display_order) = input.display_order {
                active.display_order = Set(display_order);
            }
            if let Some(is_active) = input.is_active {
                active.is_active = Set(is_active);
            }

            Ok::<_, AppError>(ServiceInstanceRepository::update(txn, active).await?)
        })
    }

    /// 管理者による状態の直接変更
    #[instrument(skip(self, user), fields(copro_id = %copro_id, equipment_id = %equipment_id))]
    pub async fn set_status(
        &self,
        user: &AuthenticatedUser,
        copro_id: Uuid,
        equipment_id: Uuid,
        status: &str,
    ) -> AppResult<service_instance_model::Model> {
        user.require_admin()?;
        let status = parse_service_status(status)?;

        let instance = with_transaction!(self.db, "equipment.set_status", |txn| async move {
            let instance = ServiceInstanceRepository::find_in_copro(txn, copro_id, equipment_id)
                .await?
                .ok_or_else(|| not_found_error("Équipement", equipment_id))?;

            Ok::<_, AppError>(ServiceInstanceRepository::set_status(txn, instance, status).await?)
        })?;

        log_with_context!(
            tracing::Level::INFO,
            "Equipment status changed",
            "equipment_id" => equipment_id,
            "status" => status.as_str()
        );
        Ok(instance)
    }

    /// 物理削除。インシデント・メンテナンスのリンクは CASCADE、
    /// チケットの参照は NULL になる
    #[instrument(skip(self, user), fields(copro_id = %copro_id, equipment_id = %equipment_id))]
    pub async fn delete(
        &self,
        user: &AuthenticatedUser,
        copro_id: Uuid,
        equipment_id: Uuid,
    ) -> AppResult<()> {
        user.require_admin()?;

        with_transaction!(self.db, "equipment.delete", |txn| async move {
            ServiceInstanceRepository::find_in_copro(txn, copro_id, equipment_id)
                .await?
                .ok_or_else(|| not_found_error("Équipement", equipment_id))?;
            ServiceInstanceRepository::delete(txn, equipment_id).await?;
            Ok::<_, AppError>(())
        })
    }

    pub async fn list(
        &self,
        copro_id: Uuid,
        building_id: Option<Uuid>,
    ) -> AppResult<Vec<service_instance_model::Model>> {
        let filter = ServiceInstanceFilter {
            building_id,
            active_only: false,
        };
        Ok(ServiceInstanceRepository::list(&self.db, copro_id, filter).await?)
    }

    /// 有効な設備のみ、建物名付き
    pub async fn list_public(&self, copro_id: Uuid) -> AppResult<Vec<PublicEquipmentDto>> {
        let rows =
            ServiceInstanceRepository::list_active_with_building(&self.db, copro_id).await?;

        Ok(rows
            .into_iter()
            .map(|(instance, building)| PublicEquipmentDto {
                id: instance.id,
                name: instance.name,
                description: instance.description,
                status: instance.status,
                display_order: instance.display_order,
                building_id: instance.building_id,
                building_name: building.map(|b| b.name),
            })
            .collect())
    }

    pub async fn get(
        &self,
        copro_id: Uuid,
        equipment_id: Uuid,
    ) -> AppResult<service_instance_model::Model> {
        ServiceInstanceRepository::find_in_copro(&self.db, copro_id, equipment_id)
            .await?
            .ok_or_else(|| not_found_error("Équipement", equipment_id))
    }
}

async fn ensure_unique_name<C: ConnectionTrait>(
    db: &C,
    copro_id: Uuid,
    name: &str,
    current_id: Option<Uuid>,
) -> AppResult<()> {
    if let Some(existing) = ServiceInstanceRepository::find_by_name(db, copro_id, name).await? {
        if Some(existing.id) != current_id {
            return Err(AppError::Conflict(format!(
                "Un équipement nommé '{}' existe déjà",
                name
            )));
        }
    }
    Ok(())
}

/// 指定された設備がすべて存在し、同じコプロに属することを確認する
///
/// 重複 ID は最初の出現だけを残す（順序は保持）。
pub(crate) async fn resolve_equipment<C: ConnectionTrait>(
    db: &C,
    copro_id: Uuid,
    ids: &[Uuid],
) -> AppResult<Vec<service_instance_model::Model>> {
    let mut unique: Vec<Uuid> = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(id) {
            unique.push(*id);
        }
    }

    let found = ServiceInstanceRepository::find_many_in_copro(db, copro_id, &unique).await?;
    if found.len() != unique.len() {
        return Err(AppError::NotFound(format!(
            "Équipement(s) introuvable(s): {} demandé(s), {} trouvé(s) dans cette copropriété",
            unique.len(),
            found.len()
        )));
    }

    // 要求順に並べ直す
    let mut ordered = Vec::with_capacity(unique.len());
    for id in &unique {
        if let Some(instance) = found.iter().find(|i| i.id == *id) {
            ordered.push(instance.clone());
        }
    }
    Ok(ordered)
}
