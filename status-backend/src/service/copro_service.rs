// src/service/copro_service.rs

use crate::auth::AuthenticatedUser;
use crate::db::DbPool;
use crate::domain::copro_model::{self, ActiveModel as CoproActiveModel};
use crate::dto::copro_dto::{CreateCoproDto, UpdateCoproDto};
use crate::error::{AppError, AppResult};
use crate::repository::copro_repository::CoproRepository;
use crate::utils::error_helper::{convert_validation_errors, not_found_error};
use crate::{log_with_context, with_transaction};
use sea_orm::{ActiveModelBehavior, ConnectionTrait, IntoActiveModel, Set};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

const DEFAULT_COUNTRY: &str = "France";

/// コプロ管理と「有効なコプロ」の解決
///
/// 有効なコプロは常に高々 1 件。ほかのサービスはここで解決した ID を
/// 引数として受け取る。
pub struct CoproService {
    db: DbPool,
}

impl CoproService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    #[instrument(skip(self, user, input), fields(admin_id = %user.user_id))]
    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        input: CreateCoproDto,
    ) -> AppResult<copro_model::Model> {
        user.require_admin()?;
        input
            .validate()
            .map_err(|e| convert_validation_errors(e, "copro_service::create"))?;

        let copro = with_transaction!(self.db, "copro.create", |txn| async move {
            if !CoproRepository::find_active(txn).await?.is_empty() {
                return Err(AppError::Conflict(
                    "Une copropriété active existe déjà".to_string(),
                ));
            }

            let mut active = CoproActiveModel::new();
            active.name = Set(input.name.trim().to_string());
            active.address = Set(input.address);
            active.city = Set(input.city);
            active.postal_code = Set(input.postal_code);
            active.country = Set(input
                .country
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_COUNTRY.to_string()));

            Ok(CoproRepository::create(txn, active).await?)
        })?;

        log_with_context!(
            tracing::Level::INFO,
            "Copro created",
            "copro_id" => copro.id,
            "name" => &copro.name
        );
        Ok(copro)
    }

    #[instrument(skip(self, user, input), fields(admin_id = %user.user_id))]
    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        copro_id: Uuid,
        input: UpdateCoproDto,
    ) -> AppResult<copro_model::Model> {
        user.require_admin()?;
        input
            .validate()
            .map_err(|e| convert_validation_errors(e, "copro_service::update"))?;

        with_transaction!(self.db, "copro.update", |txn| async move {
            let copro = CoproRepository::find_by_id(txn, copro_id)
                .await?
                .ok_or_else(|| not_found_error("Copropriété", copro_id))?;

            if input.is_active == Some(true) && !copro.is_active {
                let others = CoproRepository::find_other_active(txn, copro_id).await?;
                if !others.is_empty() {
                    return Err(AppError::Conflict(
                        "Une autre copropriété est déjà active".to_string(),
                    ));
                }
            }

            let mut active = copro.into_active_model();
            if let Some(name) = input.name {
                active.name = Set(name.trim().to_string());
            }
            if let Some(address) = input.address {
                active.address = Set(Some(address));
            }
            if let Some(city) = input.city {
                active.city = Set(Some(city));
            }
            if let Some(postal_code) = input.postal_code {
                active.postal_code = Set(Some(postal_code));
            }
            if let Some(country) = input.country {
                active.country = Set(country);
            }
            if let Some(is_active) = input.is_active {
                active.is_active = Set(is_active);
            }

            Ok(CoproRepository::update(txn, active).await?)
        })
    }

    /// 有効なコプロ（なければ None）
    pub async fn find_active(&self) -> AppResult<Option<copro_model::Model>> {
        find_active_copro(&self.db).await
    }

    /// 有効なコプロ（なければ NotFound）
    pub async fn get_active(&self) -> AppResult<copro_model::Model> {
        self.find_active()
            .await?
            .ok_or_else(|| AppError::NotFound("Aucune copropriété configurée".to_string()))
    }

    /// 各サービスに渡すテナント ID を解決する
    pub async fn resolve_active_id(&self) -> AppResult<Uuid> {
        Ok(self.get_active().await?.id)
    }
}

/// 有効なコプロを取得する。2 件以上あれば不変条件違反として Conflict
pub(crate) async fn find_active_copro<C: ConnectionTrait>(
    db: &C,
) -> AppResult<Option<copro_model::Model>> {
    let mut active = CoproRepository::find_active(db).await?;
    match active.len() {
        0 => Ok(None),
        1 => Ok(active.pop()),
        count => {
            log_with_context!(
                tracing::Level::ERROR,
                "More than one active copro",
                "count" => count
            );
            Err(AppError::Conflict(format!(
                "{} copropriétés actives trouvées, une seule est autorisée",
                count
            )))
        }
    }
}

/// コプロが存在し有効であることを確認する
pub(crate) async fn ensure_active_copro<C: ConnectionTrait>(
    db: &C,
    copro_id: Uuid,
) -> AppResult<copro_model::Model> {
    match CoproRepository::find_by_id(db, copro_id).await? {
        Some(copro) if copro.is_active => Ok(copro),
        _ => Err(AppError::NotFound(
            "Aucune copropriété active trouvée".to_string(),
        )),
    }
}
