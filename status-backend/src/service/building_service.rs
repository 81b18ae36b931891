// src/service/building_service.rs

use crate::auth::AuthenticatedUser;
use crate::db::DbPool;
use crate::domain::building_model::{self, ActiveModel as BuildingActiveModel};
use crate::dto::building_dto::{CreateBuildingDto, UpdateBuildingDto};
use crate::error::{AppError, AppResult};
use crate::repository::building_repository::BuildingRepository;
use crate::repository::service_instance_repository::ServiceInstanceRepository;
use crate::utils::error_helper::{convert_validation_errors, not_found_error};
use crate::{log_with_context, with_transaction};
use sea_orm::{ActiveModelBehavior, IntoActiveModel, Set};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

pub struct BuildingService {
    db: DbPool,
}

impl BuildingService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    #[instrument(skip(self, user, input), fields(copro_id = %copro_id))]
    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        copro_id: Uuid,
        input: CreateBuildingDto,
    ) -> AppResult<building_model::Model> {
        user.require_admin()?;
        input
            .validate()
            .map_err(|e| convert_validation_errors(e, "building_service::create"))?;

        with_transaction!(self.db, "building.create", |txn| async move {
            let name = input.name.trim().to_string();
            if BuildingRepository::find_by_name(txn, copro_id, &name)
                .await?
                .is_some()
            {
                return Err(AppError::Conflict(format!(
                    "Un bâtiment nommé '{}' existe déjà",
                    name
                )));
            }

            let mut active = BuildingActiveModel::new();
            active.copro_id = Set(copro_id);
            active.name = Set(name);
            active.description = Set(input.description);
            active.display_order = Set(input.display_order.unwrap_or(0));

            Ok(BuildingRepository::create(txn, active).await?)
        })
    }

    #[instrument(skip(self, user, input), fields(copro_id = %copro_id, building_id = %building_id))]
    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        copro_id: Uuid,
        building_id: Uuid,
        input: UpdateBuildingDto,
    ) -> AppResult<building_model::Model> {
        user.require_admin()?;
        input
            .validate()
            .map_err(|e| convert_validation_errors(e, "building_service::update"))?;

        with_transaction!(self.db, "building.update", |txn| async move {
            let building = BuildingRepository::find_in_copro(txn, copro_id, building_id)
                .await?
                .ok_or_else(|| not_found_error("Bâtiment", building_id))?;

            let mut active = building.into_active_model();

            if let Some(name) = input.name {
                let name = name.trim().to_string();
                if let Some(existing) =
                    BuildingRepository::find_by_name(txn, copro_id, &name).await?
                {
                    if existing.id != building_id {
                        return Err(AppError::Conflict(format!(
                            "Un bâtiment nommé '{}' existe déjà",
                            name
                        )));
                    }
                }
                active.name = Set(name);
            }
            if let Some(description) = input.description {
                active.description = Set(Some(description));
            }
            if let Some(display_order) = input.display_order {
                active.display_order = Set(display_order);
            }
            if let Some(is_active) = input.is_active {
                active.is_active = Set(is_active);
            }

            Ok(BuildingRepository::update(txn, active).await?)
        })
    }

    /// 設備が残っている建物は削除できない
    #[instrument(skip(self, user), fields(copro_id = %copro_id, building_id = %building_id))]
    pub async fn delete(
        &self,
        user: &AuthenticatedUser,
        copro_id: Uuid,
        building_id: Uuid,
    ) -> AppResult<()> {
        user.require_admin()?;

        with_transaction!(self.db, "building.delete", |txn| async move {
            BuildingRepository::find_in_copro(txn, copro_id, building_id)
                .await?
                .ok_or_else(|| not_found_error("Bâtiment", building_id))?;

            let equipment_count =
                ServiceInstanceRepository::count_by_building(txn, building_id).await?;
            if equipment_count > 0 {
                return Err(AppError::Conflict(format!(
                    "Impossible de supprimer le bâtiment: {} équipement(s) y sont rattachés",
                    equipment_count
                )));
            }

            BuildingRepository::delete(txn, building_id).await?;
            Ok(())
        })?;

        log_with_context!(
            tracing::Level::INFO,
            "Building deleted",
            "building_id" => building_id
        );
        Ok(())
    }

    pub async fn list(
        &self,
        copro_id: Uuid,
        active_only: bool,
    ) -> AppResult<Vec<building_model::Model>> {
        Ok(BuildingRepository::list(&self.db, copro_id, active_only).await?)
    }

    pub async fn get(&self, copro_id: Uuid, building_id: Uuid) -> AppResult<building_model::Model> {
        BuildingRepository::find_in_copro(&self.db, copro_id, building_id)
            .await?
            .ok_or_else(|| not_found_error("Bâtiment", building_id))
    }
}
