// src/service/incident_service.rs

use crate::auth::AuthenticatedUser;
use crate::db::DbPool;
use crate::domain::incident_model::{self, ActiveModel as IncidentActiveModel};
use crate::domain::incident_status::IncidentStatus;
use crate::domain::service_status::ServiceStatus;
use crate::dto::incident_dto::{
    AddIncidentUpdateDto, CreateIncidentDto, IncidentCommentDto, IncidentDetailDto, IncidentDto,
    IncidentUpdateDto, StatusChangeDto, UpdateIncidentDto,
};
use crate::error::{AppError, AppResult};
use crate::repository::incident_repository::IncidentRepository;
use crate::repository::service_instance_repository::ServiceInstanceRepository;
use crate::service::equipment_service::{parse_service_status, resolve_equipment};
use crate::utils::error_helper::{convert_validation_errors, not_found_error, validation_error};
use crate::utils::validation::common;
use crate::{log_with_context, with_transaction};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelBehavior, ConnectionTrait, IntoActiveModel, Set};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

pub fn parse_incident_status(raw: &str) -> AppResult<IncidentStatus> {
    raw.parse::<IncidentStatus>()
        .map_err(AppError::ValidationError)
}

/// 遷移を判定する。同じステータスなら None（何もしない）
pub fn plan_transition(
    current: IncidentStatus,
    requested: IncidentStatus,
) -> AppResult<Option<IncidentStatus>> {
    if current == requested {
        return Ok(None);
    }

    if current.can_transition_to(requested) {
        Ok(Some(requested))
    } else {
        Err(AppError::ValidationError(format!(
            "Transition de statut invalide: {} → {}",
            current, requested
        )))
    }
}

/// resolved_at は最初に resolved / closed になった時刻のみを記録する
pub fn resolution_timestamp(
    existing: Option<DateTime<Utc>>,
    new_status: IncidentStatus,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match existing {
        Some(at) => Some(at),
        None if new_status.is_resolution() => Some(now),
        None => None,
    }
}

pub fn status_change_message(old: IncidentStatus, new: IncidentStatus) -> String {
    format!("Statut changé: {} → {}", old, new)
}

/// 設備を指定したインシデントでは設備状態が必須で、operational は不可
pub fn required_equipment_status(
    service_instance_ids: &[Uuid],
    equipment_status: Option<&str>,
) -> AppResult<Option<ServiceStatus>> {
    let parsed = equipment_status.map(parse_service_status).transpose()?;

    if service_instance_ids.is_empty() {
        return Ok(parsed);
    }

    match parsed {
        None => Err(validation_error(
            "equipment_status",
            "obligatoire lorsque des équipements sont concernés",
        )),
        Some(status) if !status.is_incident_status() => Err(validation_error(
            "equipment_status",
            "un incident ne peut pas marquer un équipement comme opérationnel",
        )),
        Some(status) => Ok(Some(status)),
    }
}

/// インシデントのライフサイクル管理
pub struct IncidentService {
    db: DbPool,
}

impl IncidentService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// インシデントを作成し、対象設備の状態を `equipment_status` に変更する
    ///
    /// 設備の検証はすべての書き込みより前に行い、失敗時は何も残らない。
    #[instrument(skip(self, user, input), fields(copro_id = %copro_id, equipment_count = input.service_instance_ids.len()))]
    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        copro_id: Uuid,
        input: CreateIncidentDto,
    ) -> AppResult<IncidentDetailDto> {
        user.require_admin()?;
        input
            .validate()
            .map_err(|e| convert_validation_errors(e, "incident_service::create"))?;

        let equipment_status = required_equipment_status(
            &input.service_instance_ids,
            input.equipment_status.as_deref(),
        )?;
        let now = Utc::now();

        let detail = with_transaction!(self.db, "incident.create", |txn| async move {
            create_incident_in(txn, copro_id, input, equipment_status, now).await
        })?;

        log_with_context!(
            tracing::Level::INFO,
            "Incident created",
            "incident_id" => detail.incident.id,
            "status" => &detail.incident.status,
            "equipment_count" => detail.incident.service_instance_ids.len()
        );
        Ok(detail)
    }

    /// フィールドの自由更新（ステータス以外）
    #[instrument(skip(self, user, input), fields(copro_id = %copro_id, incident_id = %incident_id))]
    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        copro_id: Uuid,
        incident_id: Uuid,
        input: UpdateIncidentDto,
    ) -> AppResult<IncidentDto> {
        user.require_admin()?;
        input
            .validate()
            .map_err(|e| convert_validation_errors(e, "incident_service::update"))?;

        with_transaction!(self.db, "incident.update", |txn| async move {
            let incident = find_incident(txn, copro_id, incident_id).await?;

            if let Some(ids) = &input.service_instance_ids {
                let equipment = resolve_equipment(txn, copro_id, ids).await?;
                let ids: Vec<Uuid> = equipment.iter().map(|e| e.id).collect();
                IncidentRepository::replace_links(txn, incident_id, &ids).await?;
            }

            let mut active = incident.into_active_model();
            if let Some(title) = input.title {
                active.title = Set(title.trim().to_string());
            }
            if let Some(message) = input.message {
                active.message = Set(Some(message));
            }
            if let Some(created_at) = input.created_at {
                active.created_at = Set(created_at);
            }
            if let Some(resolved_at) = input.resolved_at {
                active.resolved_at = Set(Some(resolved_at));
            }
            let model = IncidentRepository::update(txn, active).await?;

            let equipment_ids = IncidentRepository::equipment_ids(txn, model.id).await?;
            Ok::<_, AppError>(IncidentDto::from_model(model, equipment_ids))
        })
    }

    /// 遷移表に従ってステータスを変更し、更新履歴を 1 件追加する
    ///
    /// 現在と同じステータスなら何もせず `update` は None。
    #[instrument(skip(self, user), fields(copro_id = %copro_id, incident_id = %incident_id))]
    pub async fn update_status(
        &self,
        user: &AuthenticatedUser,
        copro_id: Uuid,
        incident_id: Uuid,
        new_status: &str,
    ) -> AppResult<StatusChangeDto> {
        user.require_admin()?;
        let requested = parse_incident_status(new_status)?;
        let now = Utc::now();

        let change = with_transaction!(self.db, "incident.update_status", |txn| async move {
            let incident = find_incident(txn, copro_id, incident_id).await?;
            let current = incident.incident_status()?;

            let Some(next) = plan_transition(current, requested)? else {
                let equipment_ids = IncidentRepository::equipment_ids(txn, incident_id).await?;
                return Ok(StatusChangeDto {
                    incident: IncidentDto::from_model(incident, equipment_ids),
                    update: None,
                });
            };

            let resolved_at = resolution_timestamp(incident.resolved_at, next, now);
            let mut active = incident.into_active_model();
            active.status = Set(next.as_str().to_string());
            active.resolved_at = Set(resolved_at);
            active.updated_at = Set(now);
            let model = IncidentRepository::update(txn, active).await?;

            let update = IncidentRepository::add_update(
                txn,
                incident_id,
                status_change_message(current, next),
                next,
                now,
            )
            .await?;

            let equipment_ids = IncidentRepository::equipment_ids(txn, incident_id).await?;
            Ok::<_, AppError>(StatusChangeDto {
                incident: IncidentDto::from_model(model, equipment_ids),
                update: Some(update.into()),
            })
        })?;

        if let Some(update) = &change.update {
            log_with_context!(
                tracing::Level::INFO,
                "Incident status changed",
                "incident_id" => incident_id,
                "message" => &update.message
            );
        }
        Ok(change)
    }

    /// 管理者による更新履歴の追加。遷移表を経由せずにステータスを上書きする
    #[instrument(skip(self, user, input), fields(copro_id = %copro_id, incident_id = %incident_id))]
    pub async fn add_update(
        &self,
        user: &AuthenticatedUser,
        copro_id: Uuid,
        incident_id: Uuid,
        input: AddIncidentUpdateDto,
    ) -> AppResult<IncidentUpdateDto> {
        user.require_admin()?;
        input
            .validate()
            .map_err(|e| convert_validation_errors(e, "incident_service::add_update"))?;
        let status = parse_incident_status(&input.status)?;
        let now = Utc::now();

        let update = with_transaction!(self.db, "incident.add_update", |txn| async move {
            let incident = find_incident(txn, copro_id, incident_id).await?;

            let resolved_at = resolution_timestamp(incident.resolved_at, status, now);
            let mut active = incident.into_active_model();
            active.status = Set(status.as_str().to_string());
            active.resolved_at = Set(resolved_at);
            IncidentRepository::update(txn, active).await?;

            let update = IncidentRepository::add_update(
                txn,
                incident_id,
                input.message.trim().to_string(),
                status,
                now,
            )
            .await?;
            Ok::<_, AppError>(IncidentUpdateDto::from(update))
        })?;

        log_with_context!(
            tracing::Level::INFO,
            "Incident update added",
            "incident_id" => incident_id,
            "status" => &update.status
        );
        Ok(update)
    }

    #[instrument(skip(self, user, comment), fields(copro_id = %copro_id, incident_id = %incident_id))]
    pub async fn add_comment(
        &self,
        user: &AuthenticatedUser,
        copro_id: Uuid,
        incident_id: Uuid,
        comment: &str,
    ) -> AppResult<IncidentCommentDto> {
        user.require_admin()?;
        common::validate_not_blank(comment).map_err(|e| {
            validation_error(
                "comment",
                &e.message.map(|m| m.to_string()).unwrap_or_default(),
            )
        })?;

        let admin_id = user.user_id;
        let comment = comment.trim().to_string();

        with_transaction!(self.db, "incident.add_comment", |txn| async move {
            find_incident(txn, copro_id, incident_id).await?;
            let model =
                IncidentRepository::add_comment(txn, incident_id, admin_id, comment, None).await?;
            Ok::<_, AppError>(IncidentCommentDto::from(model))
        })
    }

    /// 新しい順。`status` は任意のステータス名
    pub async fn list(
        &self,
        copro_id: Uuid,
        status: Option<&str>,
    ) -> AppResult<Vec<IncidentDto>> {
        let status = status.map(parse_incident_status).transpose()?;
        let models = IncidentRepository::list(&self.db, copro_id, status, None).await?;
        with_equipment(&self.db, models).await
    }

    pub async fn recent(&self, copro_id: Uuid, limit: u64) -> AppResult<Vec<IncidentDto>> {
        let models = IncidentRepository::list(&self.db, copro_id, None, Some(limit)).await?;
        with_equipment(&self.db, models).await
    }

    pub async fn get_detail(
        &self,
        copro_id: Uuid,
        incident_id: Uuid,
    ) -> AppResult<IncidentDetailDto> {
        with_transaction!(self.db, "incident.get_detail", |txn| async move {
            let incident = find_incident(txn, copro_id, incident_id).await?;
            load_incident_detail(txn, incident).await
        })
    }
}

async fn find_incident<C: ConnectionTrait>(
    db: &C,
    copro_id: Uuid,
    incident_id: Uuid,
) -> AppResult<incident_model::Model> {
    IncidentRepository::find_in_copro(db, copro_id, incident_id)
        .await?
        .ok_or_else(|| not_found_error("Incident", incident_id))
}

async fn with_equipment<C: ConnectionTrait>(
    db: &C,
    models: Vec<incident_model::Model>,
) -> AppResult<Vec<IncidentDto>> {
    let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
    let mut links = IncidentRepository::equipment_ids_for(db, &ids).await?;

    Ok(models
        .into_iter()
        .map(|m| {
            let equipment_ids = links.remove(&m.id).unwrap_or_default();
            IncidentDto::from_model(m, equipment_ids)
        })
        .collect())
}

pub(crate) async fn load_incident_detail<C: ConnectionTrait>(
    db: &C,
    incident: incident_model::Model,
) -> AppResult<IncidentDetailDto> {
    let equipment_ids = IncidentRepository::equipment_ids(db, incident.id).await?;
    let updates = IncidentRepository::list_updates(db, incident.id).await?;
    let comments = IncidentRepository::list_comments(db, incident.id).await?;

    Ok(IncidentDetailDto {
        incident: IncidentDto::from_model(incident, equipment_ids),
        updates: updates.into_iter().map(Into::into).collect(),
        comments: comments.into_iter().map(Into::into).collect(),
    })
}

/// トランザクション内でインシデントを作成する（チケット昇格からも使う）
pub(crate) async fn create_incident_in<C: ConnectionTrait>(
    db: &C,
    copro_id: Uuid,
    input: CreateIncidentDto,
    equipment_status: Option<ServiceStatus>,
    now: DateTime<Utc>,
) -> AppResult<IncidentDetailDto> {
    let equipment = resolve_equipment(db, copro_id, &input.service_instance_ids).await?;

    let initial_status = if input.is_scheduled {
        IncidentStatus::Scheduled
    } else {
        IncidentStatus::Investigating
    };

    let mut active = IncidentActiveModel::new();
    active.copro_id = Set(copro_id);
    active.title = Set(input.title.trim().to_string());
    active.message = Set(input.message);
    active.status = Set(initial_status.as_str().to_string());
    active.is_scheduled = Set(input.is_scheduled);
    active.scheduled_for = Set(input.scheduled_for);
    active.created_at = Set(input.created_at.unwrap_or(now));
    active.updated_at = Set(now);
    let incident = IncidentRepository::create(db, active).await?;

    let equipment_ids: Vec<Uuid> = equipment.iter().map(|e| e.id).collect();
    IncidentRepository::insert_links(db, incident.id, &equipment_ids).await?;

    if let Some(status) = equipment_status {
        for instance in equipment {
            ServiceInstanceRepository::set_status(db, instance, status).await?;
        }
    }

    Ok(IncidentDetailDto {
        incident: IncidentDto::from_model(incident, equipment_ids),
        updates: Vec::new(),
        comments: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use IncidentStatus::*;

    #[test]
    fn test_same_status_is_a_no_op() {
        assert_eq!(plan_transition(InProgress, InProgress).unwrap(), None);
        assert_eq!(plan_transition(Closed, Closed).unwrap(), None);
    }

    #[test]
    fn test_rejected_transition_names_both_statuses() {
        let err = plan_transition(Resolved, Investigating).unwrap_err();
        assert!(err.is_validation());
        let message = err.to_string();
        assert!(message.contains("resolved"));
        assert!(message.contains("investigating"));
    }

    #[test]
    fn test_closed_can_be_reopened() {
        // closed は遷移表にエントリがなく、実際には終端ではない
        assert_eq!(
            plan_transition(Closed, Investigating).unwrap(),
            Some(Investigating)
        );
        assert!(plan_transition(Closed, Scheduled).is_err());
    }

    #[test]
    fn test_resolution_timestamp_is_set_once() {
        let first = Utc::now();
        let later = first + Duration::hours(3);

        assert_eq!(resolution_timestamp(None, Resolved, first), Some(first));
        assert_eq!(resolution_timestamp(None, Closed, first), Some(first));
        assert_eq!(resolution_timestamp(None, InProgress, first), None);
        assert_eq!(resolution_timestamp(Some(first), Closed, later), Some(first));
        // 再オープンしても消さない
        assert_eq!(
            resolution_timestamp(Some(first), InProgress, later),
            Some(first)
        );
    }

    #[test]
    fn test_status_change_message() {
        assert_eq!(
            status_change_message(Investigating, InProgress),
            "Statut changé: investigating → in_progress"
        );
    }

    #[test]
    fn test_equipment_status_required_with_equipment() {
        let ids = vec![Uuid::new_v4()];

        assert!(required_equipment_status(&ids, None)
            .unwrap_err()
            .is_validation());
        assert!(required_equipment_status(&ids, Some("operational"))
            .unwrap_err()
            .is_validation());
        assert!(required_equipment_status(&ids, Some("cassé"))
            .unwrap_err()
            .is_validation());
        assert_eq!(
            required_equipment_status(&ids, Some("degraded")).unwrap(),
            Some(ServiceStatus::Degraded)
        );
    }

    #[test]
    fn test_equipment_status_optional_without_equipment() {
        assert_eq!(required_equipment_status(&[], None).unwrap(), None);
    }
}
