// src/dto/incident_dto.rs
use crate::domain::{incident_comment_model, incident_model, incident_update_model};
use crate::utils::validation::common;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// --- Request DTOs ---

#[derive(Deserialize, Serialize, Debug, Clone, Default, Validate)]
pub struct CreateIncidentDto {
    #[validate(
        length(max = 200, message = "Le titre est trop long"),
        custom(function = common::validate_incident_title)
    )]
    pub title: String,

    pub message: Option<String>,

    /// 先頭が主設備
    #[serde(default)]
    pub service_instance_ids: Vec<Uuid>,

    /// 設備を指定した場合は必須（operational 以外）
    pub equipment_status: Option<String>,

    /// 過去データ取り込み用の作成日時
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub is_scheduled: bool,
    pub scheduled_for: Option<DateTime<Utc>>,
}

/// 自由なフィールド更新（ステータスは含まない）
#[derive(Deserialize, Serialize, Debug, Clone, Default, Validate)]
pub struct UpdateIncidentDto {
    #[validate(
        length(max = 200, message = "Le titre est trop long"),
        custom(function = common::validate_incident_title)
    )]
    pub title: Option<String>,
    pub message: Option<String>,
    pub service_instance_ids: Option<Vec<Uuid>>,
    pub created_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Validate)]
pub struct AddIncidentUpdateDto {
    #[validate(custom(function = common::validate_not_blank))]
    pub message: String,
    pub status: String,
}

// --- Response DTOs ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IncidentDto {
    pub id: Uuid,
    pub copro_id: Uuid,
    pub title: String,
    pub message: Option<String>,
    pub status: String,
    pub is_scheduled: bool,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    /// 旧クライアント向けの主設備 ID（リンクの先頭）
    pub service_instance_id: Option<Uuid>,
    pub service_instance_ids: Vec<Uuid>,
}

impl IncidentDto {
    pub fn from_model(model: incident_model::Model, service_instance_ids: Vec<Uuid>) -> Self {
        Self {
            id: model.id,
            copro_id: model.copro_id,
            title: model.title,
            message: model.message,
            status: model.status,
            is_scheduled: model.is_scheduled,
            scheduled_for: model.scheduled_for,
            created_at: model.created_at,
            updated_at: model.updated_at,
            resolved_at: model.resolved_at,
            service_instance_id: service_instance_ids.first().copied(),
            service_instance_ids,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IncidentUpdateDto {
    pub id: Uuid,
    pub message: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<incident_update_model::Model> for IncidentUpdateDto {
    fn from(model: incident_update_model::Model) -> Self {
        Self {
            id: model.id,
            message: model.message,
            status: model.status,
            created_at: model.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IncidentCommentDto {
    pub id: Uuid,
    pub admin_id: Uuid,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl From<incident_comment_model::Model> for IncidentCommentDto {
    fn from(model: incident_comment_model::Model) -> Self {
        Self {
            id: model.id,
            admin_id: model.admin_id,
            comment: model.comment,
            created_at: model.created_at,
        }
    }
}

/// インシデントと履歴・コメント
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct IncidentDetailDto {
    pub incident: IncidentDto,
    pub updates: Vec<IncidentUpdateDto>,
    pub comments: Vec<IncidentCommentDto>,
}

/// ステータス変更の結果（同じステータスなら `update` は None）
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StatusChangeDto {
    pub incident: IncidentDto,
    pub update: Option<IncidentUpdateDto>,
}

impl StatusChangeDto {
    pub fn changed(&self) -> bool {
        self.update.is_some()
    }
}
