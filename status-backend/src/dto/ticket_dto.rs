// src/dto/ticket_dto.rs
use crate::domain::{ticket_comment_model, ticket_model};
use crate::dto::incident_dto::IncidentDetailDto;
use crate::utils::validation::{self, common};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// --- Request DTOs ---

/// 居住者からの公開投稿
#[derive(Deserialize, Serialize, Debug, Clone, Default, Validate)]
pub struct SubmitTicketDto {
    /// type = incident の場合は必須
    pub service_instance_id: Option<Uuid>,

    #[validate(custom(function = common::validate_reporter_name))]
    pub reporter_name: String,

    #[validate(email(message = "Adresse email invalide"))]
    pub reporter_email: String,

    #[validate(custom(function = validation::validate_phone))]
    pub reporter_phone: Option<String>,

    #[validate(
        length(max = 200, message = "Le titre est trop long"),
        custom(function = common::validate_ticket_title)
    )]
    pub title: String,

    #[validate(custom(function = common::validate_ticket_description))]
    pub description: String,

    #[validate(custom(function = common::validate_location))]
    pub location: Option<String>,

    /// "incident"（既定）または "request"
    #[serde(rename = "type")]
    pub ticket_type: Option<String>,

    /// 旧クライアントが送るステータス。常に無視して analyzing で作成する
    pub status: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Validate)]
pub struct TicketCommentInputDto {
    #[validate(custom(function = common::validate_not_blank))]
    pub comment: String,
}

// --- Response DTOs ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TicketDto {
    pub id: Uuid,
    pub copro_id: Uuid,
    pub service_instance_id: Option<Uuid>,
    pub reporter_name: String,
    pub reporter_email: String,
    pub reporter_phone: Option<String>,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub ticket_type: String,
    pub status: String,
    pub assigned_to: Option<Uuid>,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub incident_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ticket_model::Model> for TicketDto {
    fn from(model: ticket_model::Model) -> Self {
        Self {
            id: model.id,
            copro_id: model.copro_id,
            service_instance_id: model.service_instance_id,
            reporter_name: model.reporter_name,
            reporter_email: model.reporter_email,
            reporter_phone: model.reporter_phone,
            title: model.title,
            description: model.description,
            location: model.location,
            ticket_type: model.ticket_type,
            status: model.status,
            assigned_to: model.assigned_to,
            reviewed_by: model.reviewed_by,
            reviewed_at: model.reviewed_at,
            incident_id: model.incident_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TicketCommentDto {
    pub id: Uuid,
    pub admin_id: Uuid,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl From<ticket_comment_model::Model> for TicketCommentDto {
    fn from(model: ticket_comment_model::Model) -> Self {
        Self {
            id: model.id,
            admin_id: model.admin_id,
            comment: model.comment,
            created_at: model.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TicketDetailDto {
    pub ticket: TicketDto,
    pub comments: Vec<TicketCommentDto>,
}

/// チケット昇格の結果
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PromotionResultDto {
    pub ticket: TicketDto,
    pub incident: Option<IncidentDetailDto>,
}
