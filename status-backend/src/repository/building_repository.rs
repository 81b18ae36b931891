// src/repository/building_repository.rs

use crate::domain::building_model::{
    self, ActiveModel as BuildingActiveModel, Entity as BuildingEntity,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, DeleteResult, EntityTrait, QueryFilter,
    QueryOrder,
};
use uuid::Uuid;

pub struct BuildingRepository;

impl BuildingRepository {
    /// コプロに属する建物を ID で取得
    pub async fn find_in_copro<C: ConnectionTrait>(
        db: &C,
        copro_id: Uuid,
        id: Uuid,
    ) -> Result<Option<building_model::Model>, DbErr> {
        BuildingEntity::find_by_id(id)
            .filter(building_model::Column::CoproId.eq(copro_id))
            .one(db)
            .await
    }

    pub async fn find_by_name<C: ConnectionTrait>(
        db: &C,
        copro_id: Uuid,
        name: &str,
    ) -> Result<Option<building_model::Model>, DbErr> {
        BuildingEntity::find()
            .filter(building_model::Column::CoproId.eq(copro_id))
            .filter(building_model::Column::Name.eq(name))
            .one(db)
            .await
    }

    /// 表示順、名前順で一覧
    pub async fn list<C: ConnectionTrait>(
        db: &C,
        copro_id: Uuid,
        active_only: bool,
    ) -> Result<Vec<building_model::Model>, DbErr> {
        let mut query =
            BuildingEntity::find().filter(building_model::Column::CoproId.eq(copro_id));

        if active_only {
            query = query.filter(building_model::Column::IsActive.eq(true));
        }

        query
            .order_by_asc(building_model::Column::DisplayOrder)
            .order_by_asc(building_model::Column::Name)
            .all(db)
            .await
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        building: BuildingActiveModel,
    ) -> Result<building_model::Model, DbErr> {
        building.insert(db).await
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        building: BuildingActiveModel,
    ) -> Result<building_model::Model, DbErr> {
        building.update(db).await
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<DeleteResult, DbErr> {
        BuildingEntity::delete_by_id(id).exec(db).await
    }
}
