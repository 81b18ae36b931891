// src/repository/copro_repository.rs

use crate::domain::copro_model::{self, ActiveModel as CoproActiveModel, Entity as CoproEntity};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

/// コプロのデータアクセス
pub struct CoproRepository;

impl CoproRepository {
    pub async fn find_by_id<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
    ) -> Result<Option<copro_model::Model>, DbErr> {
        CoproEntity::find_by_id(id).one(db).await
    }

    /// 有効なコプロをすべて取得（通常は 0 件か 1 件）
    pub async fn find_active<C: ConnectionTrait>(
        db: &C,
    ) -> Result<Vec<copro_model::Model>, DbErr> {
        CoproEntity::find()
            .filter(copro_model::Column::IsActive.eq(true))
            .order_by_asc(copro_model::Column::CreatedAt)
            .all(db)
            .await
    }

    /// 指定 ID 以外の有効なコプロ
    pub async fn find_other_active<C: ConnectionTrait>(
        db: &C,
        exclude_id: Uuid,
    ) -> Result<Vec<copro_model::Model>, DbErr> {
        CoproEntity::find()
            .filter(copro_model::Column::IsActive.eq(true))
            .filter(copro_model::Column::Id.ne(exclude_id))
            .all(db)
            .await
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        copro: CoproActiveModel,
    ) -> Result<copro_model::Model, DbErr> {
        copro.insert(db).await
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        copro: CoproActiveModel,
    ) -> Result<copro_model::Model, DbErr> {
        copro.update(db).await
    }
}
