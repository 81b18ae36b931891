// src/service/user_service.rs

use crate::auth::AuthenticatedUser;
use crate::db::DbPool;
use crate::domain::user_model::{self, ActiveModel as UserActiveModel};
use crate::dto::user_dto::{CreateUserDto, UserDto};
use crate::error::{AppError, AppResult};
use crate::repository::building_repository::BuildingRepository;
use crate::repository::copro_repository::CoproRepository;
use crate::repository::user_repository::UserRepository;
use crate::utils::error_helper::{convert_validation_errors, not_found_error};
use crate::utils::validation::normalize_email;
use crate::with_transaction;
use sea_orm::{ActiveModelBehavior, Set};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

/// 管理者・居住者アカウント
///
/// パスワードのハッシュ化とログインは認証コンポーネントの責務。
pub struct UserService {
    db: DbPool,
}

impl UserService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    #[instrument(skip(self, user, input), fields(admin_id = %user.user_id))]
    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        mut input: CreateUserDto,
    ) -> AppResult<user_model::Model> {
        user.require_admin()?;
        input.email = normalize_email(&input.email);
        input
            .validate()
            .map_err(|e| convert_validation_errors(e, "user_service::create"))?;

        with_transaction!(self.db, "user.create", |txn| async move {
            let email = input.email;
            if UserRepository::find_by_email(txn, &email).await?.is_some() {
                return Err(AppError::Conflict(format!(
                    "L'adresse email '{}' est déjà utilisée",
                    email
                )));
            }

            if let Some(copro_id) = input.copro_id {
                CoproRepository::find_by_id(txn, copro_id)
                    .await?
                    .ok_or_else(|| not_found_error("Copropriété", copro_id))?;
            }

            if let Some(building_id) = input.building_id {
                let copro_id = input.copro_id.ok_or_else(|| {
                    AppError::ValidationError(
                        "building_id: une copropriété est requise pour rattacher un bâtiment"
                            .to_string(),
                    )
                })?;
                BuildingRepository::find_in_copro(txn, copro_id, building_id)
                    .await?
                    .ok_or_else(|| not_found_error("Bâtiment", building_id))?;
            }

            let mut active = UserActiveModel::new();
            active.email = Set(email);
            active.hashed_password = Set(input.hashed_password);
            active.is_superuser = Set(input.is_superuser);
            active.first_name = Set(input.first_name);
            active.last_name = Set(input.last_name);
            active.lot_number = Set(input.lot_number);
            active.floor = Set(input.floor);
            active.copro_id = Set(input.copro_id);
            active.building_id = Set(input.building_id);

            Ok(UserRepository::create(txn, active).await?)
        })
    }

    /// チケット割り当て候補の管理者（コプロ未設定の管理者を含む）
    pub async fn list_admins(&self, copro_id: Uuid) -> AppResult<Vec<UserDto>> {
        let admins = UserRepository::list_admins(&self.db, copro_id).await?;
        Ok(admins.into_iter().map(UserDto::from).collect())
    }

    pub async fn get(&self, user_id: Uuid) -> AppResult<user_model::Model> {
        UserRepository::find_by_id(&self.db, user_id)
            .await?
            .ok_or_else(|| not_found_error("Utilisateur", user_id))
    }
}
