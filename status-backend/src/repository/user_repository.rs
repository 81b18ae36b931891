// src/repository/user_repository.rs

use crate::domain::user_model::{self, ActiveModel as UserActiveModel, Entity as UserEntity};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder,
};
use uuid::Uuid;

pub struct UserRepository;

impl UserRepository {
    pub async fn find_by_id<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
    ) -> Result<Option<user_model::Model>, DbErr> {
        UserEntity::find_by_id(id).one(db).await
    }

    pub async fn find_by_email<C: ConnectionTrait>(
        db: &C,
        email: &str,
    ) -> Result<Option<user_model::Model>, DbErr> {
        UserEntity::find()
            .filter(user_model::Column::Email.eq(email))
            .one(db)
            .await
    }

    /// コプロの有効な管理者（コプロ未設定の管理者も含む）
    pub async fn list_admins<C: ConnectionTrait>(
        db: &C,
        copro_id: Uuid,
    ) -> Result<Vec<user_model::Model>, DbErr> {
        UserEntity::find()
            .filter(user_model::Column::IsSuperuser.eq(true))
            .filter(user_model::Column::IsActive.eq(true))
            .filter(
                Condition::any()
                    .add(user_model::Column::CoproId.eq(copro_id))
                    .add(user_model::Column::CoproId.is_null()),
            )
            .order_by_asc(user_model::Column::Email)
            .all(db)
            .await
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        user: UserActiveModel,
    ) -> Result<user_model::Model, DbErr> {
        user.insert(db).await
    }
}
