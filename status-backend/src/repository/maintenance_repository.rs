// src/repository/maintenance_repository.rs

use crate::domain::maintenance_model::{
    self, ActiveModel as MaintenanceActiveModel, Entity as MaintenanceEntity,
};
use crate::domain::maintenance_service_instance_model::{
    self, ActiveModel as MaintenanceLinkActiveModel, Entity as MaintenanceLinkEntity,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, DeleteResult, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use std::collections::HashMap;
use uuid::Uuid;

pub struct MaintenanceRepository;

impl MaintenanceRepository {
    pub async fn find_in_copro<C: ConnectionTrait>(
        db: &C,
        copro_id: Uuid,
        id: Uuid,
    ) -> Result<Option<maintenance_model::Model>, DbErr> {
        MaintenanceEntity::find_by_id(id)
            .filter(maintenance_model::Column::CoproId.eq(copro_id))
            .one(db)
            .await
    }

    /// 開始日順
    pub async fn list<C: ConnectionTrait>(
        db: &C,
        copro_id: Uuid,
    ) -> Result<Vec<maintenance_model::Model>, DbErr> {
        MaintenanceEntity::find()
            .filter(maintenance_model::Column::CoproId.eq(copro_id))
            .order_by_asc(maintenance_model::Column::StartDate)
            .all(db)
            .await
    }

    /// start_date <= now <= end_date
    pub async fn find_active<C: ConnectionTrait>(
        db: &C,
        copro_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<maintenance_model::Model>, DbErr> {
        MaintenanceEntity::find()
            .filter(maintenance_model::Column::CoproId.eq(copro_id))
            .filter(maintenance_model::Column::StartDate.lte(now))
            .filter(maintenance_model::Column::EndDate.gte(now))
            .order_by_asc(maintenance_model::Column::StartDate)
            .all(db)
            .await
    }

    pub async fn find_upcoming<C: ConnectionTrait>(
        db: &C,
        copro_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<maintenance_model::Model>, DbErr> {
        MaintenanceEntity::find()
            .filter(maintenance_model::Column::CoproId.eq(copro_id))
            .filter(maintenance_model::Column::StartDate.gt(now))
            .order_by_asc(maintenance_model::Column::StartDate)
            .all(db)
            .await
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        maintenance: MaintenanceActiveModel,
    ) -> Result<maintenance_model::Model, DbErr> {
        maintenance.insert(db).await
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        maintenance: MaintenanceActiveModel,
    ) -> Result<maintenance_model::Model, DbErr> {
        maintenance.update(db).await
    }

    /// リンクは ON DELETE CASCADE で消える
    pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<DeleteResult, DbErr> {
        MaintenanceLinkEntity::delete_many()
            .filter(maintenance_service_instance_model::Column::MaintenanceId.eq(id))
            .exec(db)
            .await?;
        MaintenanceEntity::delete_by_id(id).exec(db).await
    }

    /// 対象設備の集合を置き換える
    pub async fn replace_links<C: ConnectionTrait>(
        db: &C,
        maintenance_id: Uuid,
        service_instance_ids: &[Uuid],
    ) -> Result<(), DbErr> {
        MaintenanceLinkEntity::delete_many()
            .filter(maintenance_service_instance_model::Column::MaintenanceId.eq(maintenance_id))
            .exec(db)
            .await?;

        for service_instance_id in service_instance_ids {
            MaintenanceLinkActiveModel {
                maintenance_id: Set(maintenance_id),
                service_instance_id: Set(*service_instance_id),
            }
            .insert(db)
            .await?;
        }
        Ok(())
    }

    pub async fn equipment_ids_for<C: ConnectionTrait>(
        db: &C,
        maintenance_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Uuid>>, DbErr> {
        let mut map: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        if maintenance_ids.is_empty() {
            return Ok(map);
        }

        let links = MaintenanceLinkEntity::find()
            .filter(
                maintenance_service_instance_model::Column::MaintenanceId
                    .is_in(maintenance_ids.iter().copied()),
            )
            .all(db)
            .await?;

        for link in links {
            map.entry(link.maintenance_id)
                .or_default()
                .push(link.service_instance_id);
        }
        Ok(map)
    }
}
