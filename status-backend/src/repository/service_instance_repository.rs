// src/repository/service_instance_repository.rs

use crate::domain::building_model;
use crate::domain::service_instance_model::{
    self, ActiveModel as ServiceInstanceActiveModel, Entity as ServiceInstanceEntity,
};
use crate::domain::service_status::ServiceStatus;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, DeleteResult, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

/// 設備一覧の絞り込み条件
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceInstanceFilter {
    pub building_id: Option<Uuid>,
    pub active_only: bool,
}

pub struct ServiceInstanceRepository;

impl ServiceInstanceRepository {
    pub async fn find_by_id<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
    ) -> Result<Option<service_instance_model::Model>, DbErr> {
        ServiceInstanceEntity::find_by_id(id).one(db).await
    }

    pub async fn find_in_copro<C: ConnectionTrait>(
        db: &C,
        copro_id: Uuid,
        id: Uuid,
    ) -> Result<Option<service_instance_model::Model>, DbErr> {
        ServiceInstanceEntity::find_by_id(id)
            .filter(service_instance_model::Column::CoproId.eq(copro_id))
            .one(db)
            .await
    }

    /// 指定 ID のうちコプロに属するものだけを返す
    pub async fn find_many_in_copro<C: ConnectionTrait>(
        db: &C,
        copro_id: Uuid,
        ids: &[Uuid],
    ) -> Result<Vec<service_instance_model::Model>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        ServiceInstanceEntity::find()
            .filter(service_instance_model::Column::CoproId.eq(copro_id))
            .filter(service_instance_model::Column::Id.is_in(ids.iter().copied()))
            .all(db)
            .await
    }

    pub async fn find_by_name<C: ConnectionTrait>(
        db: &C,
        copro_id: Uuid,
        name: &str,
    ) -> Result<Option<service_instance_model::Model>, DbErr> {
        ServiceInstanceEntity::find()
            .filter(service_instance_model::Column::CoproId.eq(copro_id))
            .filter(service_instance_model::Column::Name.eq(name))
            .one(db)
            .await
    }

    /// 表示順、名前順で一覧
    pub async fn list<C: ConnectionTrait>(
        db: &C,
        copro_id: Uuid,
        filter: ServiceInstanceFilter,
    ) -> Result<Vec<service_instance_model::Model>, DbErr> {
        let mut query = ServiceInstanceEntity::find()
            .filter(service_instance_model::Column::CoproId.eq(copro_id));

        if let Some(building_id) = filter.building_id {
            query = query.filter(service_instance_model::Column::BuildingId.eq(building_id));
        }

        if filter.active_only {
            query = query.filter(service_instance_model::Column::IsActive.eq(true));
        }

        query
            .order_by_asc(service_instance_model::Column::DisplayOrder)
            .order_by_asc(service_instance_model::Column::Name)
            .all(db)
            .await
    }

    /// 有効な設備と所属建物
    pub async fn list_active_with_building<C: ConnectionTrait>(
        db: &C,
        copro_id: Uuid,
    ) -> Result<Vec<(service_instance_model::Model, Option<building_model::Model>)>, DbErr> {
        ServiceInstanceEntity::find()
            .filter(service_instance_model::Column::CoproId.eq(copro_id))
            .filter(service_instance_model::Column::IsActive.eq(true))
            .order_by_asc(service_instance_model::Column::DisplayOrder)
            .order_by_asc(service_instance_model::Column::Name)
            .find_also_related(building_model::Entity)
            .all(db)
            .await
    }

    pub async fn count_by_building<C: ConnectionTrait>(
        db: &C,
        building_id: Uuid,
    ) -> Result<u64, DbErr> {
        ServiceInstanceEntity::find()
            .filter(service_instance_model::Column::BuildingId.eq(building_id))
            .count(db)
            .await
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        instance: ServiceInstanceActiveModel,
    ) -> Result<service_instance_model::Model, DbErr> {
        instance.insert(db).await
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        instance: ServiceInstanceActiveModel,
    ) -> Result<service_instance_model::Model, DbErr> {
        instance.update(db).await
    }

    /// 状態を書き換え、更新日時を打刻する
    pub async fn set_status<C: ConnectionTrait>(
        db: &C,
        instance: service_instance_model::Model,
        status: ServiceStatus,
    ) -> Result<service_instance_model::Model, DbErr> {
        let mut active = instance.into_active_model();
        active.status = Set(status.as_str().to_string());
        active.updated_at = Set(Utc::now());
        active.update(db).await
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<DeleteResult, DbErr> {
        ServiceInstanceEntity::delete_by_id(id).exec(db).await
    }
}
