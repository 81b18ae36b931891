// src/repository/ticket_repository.rs

use crate::domain::ticket_comment_model::{
    self, ActiveModel as TicketCommentActiveModel, Entity as TicketCommentEntity,
};
use crate::domain::ticket_model::{self, ActiveModel as TicketActiveModel, Entity as TicketEntity};
use crate::domain::ticket_status::TicketStatus;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

pub struct TicketRepository;

impl TicketRepository {
    pub async fn find_in_copro<C: ConnectionTrait>(
        db: &C,
        copro_id: Uuid,
        id: Uuid,
    ) -> Result<Option<ticket_model::Model>, DbErr> {
        TicketEntity::find_by_id(id)
            .filter(ticket_model::Column::CoproId.eq(copro_id))
            .one(db)
            .await
    }

    /// 新しい順
    pub async fn list<C: ConnectionTrait>(
        db: &C,
        copro_id: Uuid,
        status: Option<TicketStatus>,
    ) -> Result<Vec<ticket_model::Model>, DbErr> {
        let mut query = TicketEntity::find().filter(ticket_model::Column::CoproId.eq(copro_id));

        if let Some(status) = status {
            query = query.filter(ticket_model::Column::Status.eq(status.as_str()));
        }

        query
            .order_by_desc(ticket_model::Column::CreatedAt)
            .all(db)
            .await
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        ticket: TicketActiveModel,
    ) -> Result<ticket_model::Model, DbErr> {
        ticket.insert(db).await
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        ticket: TicketActiveModel,
    ) -> Result<ticket_model::Model, DbErr> {
        ticket.update(db).await
    }

    pub async fn add_comment<C: ConnectionTrait>(
        db: &C,
        ticket_id: Uuid,
        admin_id: Uuid,
        comment: String,
    ) -> Result<ticket_comment_model::Model, DbErr> {
        let mut active = TicketCommentActiveModel::new();
        active.ticket_id = Set(ticket_id);
        active.admin_id = Set(admin_id);
        active.comment = Set(comment);
        active.insert(db).await
    }

    /// 古い順
    pub async fn list_comments<C: ConnectionTrait>(
        db: &C,
        ticket_id: Uuid,
    ) -> Result<Vec<ticket_comment_model::Model>, DbErr> {
        TicketCommentEntity::find()
            .filter(ticket_comment_model::Column::TicketId.eq(ticket_id))
            .order_by_asc(ticket_comment_model::Column::CreatedAt)
            .all(db)
            .await
    }
}
