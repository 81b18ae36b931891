// src/service/ticket_service.rs

use crate::auth::AuthenticatedUser;
use crate::db::DbPool;
use crate::domain::service_status::ServiceStatus;
use crate::domain::ticket_model::{self, ActiveModel as TicketActiveModel};
use crate::domain::ticket_status::{TicketStatus, TicketType};
use crate::dto::incident_dto::CreateIncidentDto;
use crate::dto::ticket_dto::{
    PromotionResultDto, SubmitTicketDto, TicketCommentDto, TicketCommentInputDto, TicketDetailDto,
    TicketDto,
};
use crate::error::{AppError, AppResult};
use crate::repository::incident_repository::IncidentRepository;
use crate::repository::service_instance_repository::ServiceInstanceRepository;
use crate::repository::ticket_repository::TicketRepository;
use crate::repository::user_repository::UserRepository;
use crate::service::copro_service::ensure_active_copro;
use crate::service::incident_service::create_incident_in;
use crate::utils::error_helper::{convert_validation_errors, not_found_error, validation_error};
use crate::utils::validation::{normalize_email, normalize_phone};
use crate::{log_with_context, with_transaction};
use chrono::Utc;
use sea_orm::{ActiveModelBehavior, ConnectionTrait, IntoActiveModel, Set};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

pub fn parse_ticket_status(raw: &str) -> AppResult<TicketStatus> {
    raw.parse::<TicketStatus>()
        .map_err(AppError::ValidationError)
}

/// 種別の解決。省略時は incident
pub fn resolve_ticket_type(
    raw: Option<&str>,
    service_instance_id: Option<Uuid>,
) -> AppResult<TicketType> {
    let ticket_type = match raw {
        Some(raw) => raw
            .parse::<TicketType>()
            .map_err(AppError::ValidationError)?,
        None => TicketType::default(),
    };

    if ticket_type.requires_equipment() && service_instance_id.is_none() {
        return Err(validation_error(
            "service_instance_id",
            "équipement obligatoire pour un incident",
        ));
    }
    Ok(ticket_type)
}

/// 昇格時にコピーするコメントの接頭辞
pub fn promoted_comment(ticket_id: Uuid, comment: &str) -> String {
    format!("[Ticket #{}] {}", ticket_id, comment)
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 居住者チケットの受付と管理者によるトリアージ
pub struct TicketService {
    db: DbPool,
}

impl TicketService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// 公開投稿。ステータスは常に analyzing で作成する
    #[instrument(skip(self, input), fields(copro_id = %copro_id))]
    pub async fn submit(
        &self,
        copro_id: Uuid,
        mut input: SubmitTicketDto,
    ) -> AppResult<TicketDto> {
        input.reporter_email = normalize_email(&input.reporter_email);
        // 空の電話番号は未入力として扱う
        input.reporter_phone = trimmed(input.reporter_phone);
        input
            .validate()
            .map_err(|e| convert_validation_errors(e, "ticket_service::submit"))?;
        let ticket_type =
            resolve_ticket_type(input.ticket_type.as_deref(), input.service_instance_id)?;

        let ticket = with_transaction!(self.db, "ticket.submit", |txn| async move {
            ensure_active_copro(txn, copro_id).await?;

            if let Some(equipment_id) = input.service_instance_id {
                ServiceInstanceRepository::find_in_copro(txn, copro_id, equipment_id)
                    .await?
                    .ok_or_else(|| not_found_error("Équipement", equipment_id))?;
            }

            let mut active = TicketActiveModel::new();
            active.copro_id = Set(copro_id);
            active.service_instance_id = Set(input.service_instance_id);
            active.reporter_name = Set(input.reporter_name.trim().to_string());
            active.reporter_email = Set(input.reporter_email);
            active.reporter_phone = Set(input.reporter_phone.as_deref().map(normalize_phone));
            active.title = Set(input.title.trim().to_string());
            active.description = Set(input.description.trim().to_string());
            active.location = Set(trimmed(input.location));
            active.ticket_type = Set(ticket_type.as_str().to_string());
            active.status = Set(TicketStatus::Analyzing.as_str().to_string());

            let model = TicketRepository::create(txn, active).await?;
            Ok::<_, AppError>(TicketDto::from(model))
        })?;

        log_with_context!(
            tracing::Level::INFO,
            "Ticket submitted",
            "ticket_id" => ticket.id,
            "ticket_type" => &ticket.ticket_type
        );
        Ok(ticket)
    }

    /// 管理者に割り当て、in_progress にする
    #[instrument(skip(self, user), fields(copro_id = %copro_id, ticket_id = %ticket_id))]
    pub async fn assign(
        &self,
        user: &AuthenticatedUser,
        copro_id: Uuid,
        ticket_id: Uuid,
        assignee_id: Uuid,
    ) -> AppResult<TicketDto> {
        user.require_admin()?;

        with_transaction!(self.db, "ticket.assign", |txn| async move {
            let ticket = find_ticket(txn, copro_id, ticket_id).await?;

            let assignee = UserRepository::find_by_id(txn, assignee_id)
                .await?
                .ok_or_else(|| not_found_error("Utilisateur", assignee_id))?;
            if !assignee.is_superuser {
                return Err(validation_error(
                    "assigned_to",
                    "le ticket doit être assigné à un administrateur",
                ));
            }

            let mut active = ticket.into_active_model();
            active.assigned_to = Set(Some(assignee_id));
            active.status = Set(TicketStatus::InProgress.as_str().to_string());
            let model = TicketRepository::update(txn, active).await?;
            Ok(TicketDto::from(model))
        })
    }

    /// チケットのステータスは遷移制約なし
    #[instrument(skip(self, user), fields(copro_id = %copro_id, ticket_id = %ticket_id))]
    pub async fn update_status(
        &self,
        user: &AuthenticatedUser,
        copro_id: Uuid,
        ticket_id: Uuid,
        new_status: &str,
    ) -> AppResult<TicketDto> {
        user.require_admin()?;
        let status = parse_ticket_status(new_status)?;

        with_transaction!(self.db, "ticket.update_status", |txn| async move {
            let ticket = find_ticket(txn, copro_id, ticket_id).await?;
            let mut active = ticket.into_active_model();
            active.status = Set(status.as_str().to_string());
            let model = TicketRepository::update(txn, active).await?;
            Ok::<_, AppError>(TicketDto::from(model))
        })
    }

    #[instrument(skip(self, user, input), fields(copro_id = %copro_id, ticket_id = %ticket_id))]
    pub async fn add_comment(
        &self,
        user: &AuthenticatedUser,
        copro_id: Uuid,
        ticket_id: Uuid,
        input: TicketCommentInputDto,
    ) -> AppResult<TicketCommentDto> {
        user.require_admin()?;
        input
            .validate()
            .map_err(|e| convert_validation_errors(e, "ticket_service::add_comment"))?;
        let admin_id = user.user_id;

        with_transaction!(self.db, "ticket.add_comment", |txn| async move {
            find_ticket(txn, copro_id, ticket_id).await?;
            let model = TicketRepository::add_comment(
                txn,
                ticket_id,
                admin_id,
                input.comment.trim().to_string(),
            )
            .await?;
            Ok::<_, AppError>(TicketCommentDto::from(model))
        })
    }

    /// チケットをインシデントに昇格する
    ///
    /// `create_incident` が true なら、チケットの設備を degraded にした
    /// インシデントを作成し、コメントを `[Ticket #<id>]` 付きでコピーする。
    /// false なら確認済みの記録（reviewed_by / reviewed_at）だけを残す。
    /// いずれもチケットのステータスは変えない。
    #[instrument(skip(self, user), fields(copro_id = %copro_id, ticket_id = %ticket_id))]
    pub async fn promote_to_incident(
        &self,
        user: &AuthenticatedUser,
        copro_id: Uuid,
        ticket_id: Uuid,
        create_incident: bool,
    ) -> AppResult<PromotionResultDto> {
        user.require_admin()?;
        let reviewer_id = user.user_id;
        let now = Utc::now();

        let result = with_transaction!(self.db, "ticket.promote", |txn| async move {
            let ticket = find_ticket(txn, copro_id, ticket_id).await?;
            if let Some(incident_id) = ticket.incident_id {
                return Err(AppError::Conflict(format!(
                    "Ce ticket est déjà lié à l'incident {}",
                    incident_id
                )));
            }

            let incident = if create_incident {
                let equipment_ids: Vec<Uuid> = ticket.service_instance_id.into_iter().collect();
                let equipment_status = if equipment_ids.is_empty() {
                    None
                } else {
                    Some(ServiceStatus::Degraded)
                };
                let input = CreateIncidentDto {
                    title: ticket.title.clone(),
                    message: Some(ticket.description.clone()),
                    service_instance_ids: equipment_ids,
                    ..Default::default()
                };
                let mut detail =
                    create_incident_in(txn, copro_id, input, equipment_status, now).await?;

                for comment in TicketRepository::list_comments(txn, ticket_id).await? {
                    let copied = IncidentRepository::add_comment(
                        txn,
                        detail.incident.id,
                        comment.admin_id,
                        promoted_comment(ticket_id, &comment.comment),
                        Some(comment.created_at),
                    )
                    .await?;
                    detail.comments.push(copied.into());
                }
                Some(detail)
            } else {
                None
            };

            let mut active = ticket.into_active_model();
            active.reviewed_by = Set(Some(reviewer_id));
            active.reviewed_at = Set(Some(now));
            if let Some(detail) = &incident {
                active.incident_id = Set(Some(detail.incident.id));
            }
            let model = TicketRepository::update(txn, active).await?;

            Ok(PromotionResultDto {
                ticket: TicketDto::from(model),
                incident,
            })
        })?;

        log_with_context!(
            tracing::Level::INFO,
            "Ticket reviewed",
            "ticket_id" => ticket_id,
            "incident_created" => result.incident.is_some()
        );
        Ok(result)
    }

    /// 新しい順。居住者の連絡先を含むため管理者のみ
    pub async fn list(
        &self,
        user: &AuthenticatedUser,
        copro_id: Uuid,
        status: Option<&str>,
    ) -> AppResult<Vec<TicketDto>> {
        user.require_admin()?;
        let status = status.map(parse_ticket_status).transpose()?;
        let models = TicketRepository::list(&self.db, copro_id, status).await?;
        Ok(models.into_iter().map(TicketDto::from).collect())
    }

    pub async fn get_detail(
        &self,
        user: &AuthenticatedUser,
        copro_id: Uuid,
        ticket_id: Uuid,
    ) -> AppResult<TicketDetailDto> {
        user.require_admin()?;

        with_transaction!(self.db, "ticket.get_detail", |txn| async move {
            let ticket = find_ticket(txn, copro_id, ticket_id).await?;
            let comments = TicketRepository::list_comments(txn, ticket_id).await?;
            Ok::<_, AppError>(TicketDetailDto {
                ticket: TicketDto::from(ticket),
                comments: comments.into_iter().map(Into::into).collect(),
            })
        })
    }
}

async fn find_ticket<C: ConnectionTrait>(
    db: &C,
    copro_id: Uuid,
    ticket_id: Uuid,
) -> AppResult<ticket_model::Model> {
    TicketRepository::find_in_copro(db, copro_id, ticket_id)
        .await?
        .ok_or_else(|| not_found_error("Ticket", ticket_id))
}
