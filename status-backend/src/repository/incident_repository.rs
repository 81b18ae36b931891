// src/repository/incident_repository.rs

use crate::domain::incident_comment_model::{
    self, ActiveModel as IncidentCommentActiveModel, Entity as IncidentCommentEntity,
};
use crate::domain::incident_model::{
    self, ActiveModel as IncidentActiveModel, Entity as IncidentEntity,
};
use crate::domain::incident_service_instance_model::{
    self, ActiveModel as IncidentLinkActiveModel, Entity as IncidentLinkEntity,
};
use crate::domain::incident_status::IncidentStatus;
use crate::domain::incident_update_model::{
    self, ActiveModel as IncidentUpdateActiveModel, Entity as IncidentUpdateEntity,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use std::collections::HashMap;
use uuid::Uuid;

pub struct IncidentRepository;

impl IncidentRepository {
    // --- インシデント本体 ---

    pub async fn find_in_copro<C: ConnectionTrait>(
        db: &C,
        copro_id: Uuid,
        id: Uuid,
    ) -> Result<Option<incident_model::Model>, DbErr> {
        IncidentEntity::find_by_id(id)
            .filter(incident_model::Column::CoproId.eq(copro_id))
            .one(db)
            .await
    }

    /// 新しい順。`limit` が None なら全件
    pub async fn list<C: ConnectionTrait>(
        db: &C,
        copro_id: Uuid,
        status: Option<IncidentStatus>,
        limit: Option<u64>,
    ) -> Result<Vec<incident_model::Model>, DbErr> {
        let mut query =
            IncidentEntity::find().filter(incident_model::Column::CoproId.eq(copro_id));

        if let Some(status) = status {
            query = query.filter(incident_model::Column::Status.eq(status.as_str()));
        }

        query
            .order_by_desc(incident_model::Column::CreatedAt)
            .limit(limit)
            .all(db)
            .await
    }

    /// created_at が [start, end] に入るインシデント
    pub async fn find_created_between<C: ConnectionTrait>(
        db: &C,
        copro_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<incident_model::Model>, DbErr> {
        IncidentEntity::find()
            .filter(incident_model::Column::CoproId.eq(copro_id))
            .filter(incident_model::Column::CreatedAt.gte(start))
            .filter(incident_model::Column::CreatedAt.lte(end))
            .order_by_asc(incident_model::Column::CreatedAt)
            .all(db)
            .await
    }

    /// 解決済み（resolved_at あり）の全インシデント
    pub async fn find_resolved<C: ConnectionTrait>(
        db: &C,
        copro_id: Uuid,
    ) -> Result<Vec<incident_model::Model>, DbErr> {
        IncidentEntity::find()
            .filter(incident_model::Column::CoproId.eq(copro_id))
            .filter(incident_model::Column::ResolvedAt.is_not_null())
            .all(db)
            .await
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        incident: IncidentActiveModel,
    ) -> Result<incident_model::Model, DbErr> {
        incident.insert(db).await
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        incident: IncidentActiveModel,
    ) -> Result<incident_model::Model, DbErr> {
        incident.update(db).await
    }

    // --- 設備リンク ---

    /// 渡された順に position を振ってリンクを作成
    pub async fn insert_links<C: ConnectionTrait>(
        db: &C,
        incident_id: Uuid,
        service_instance_ids: &[Uuid],
    ) -> Result<(), DbErr> {
        for (position, service_instance_id) in service_instance_ids.iter().enumerate() {
            IncidentLinkActiveModel {
                incident_id: Set(incident_id),
                service_instance_id: Set(*service_instance_id),
                position: Set(position as i32),
            }
            .insert(db)
            .await?;
        }
        Ok(())
    }

    /// 既存のリンクを置き換える
    pub async fn replace_links<C: ConnectionTrait>(
        db: &C,
        incident_id: Uuid,
        service_instance_ids: &[Uuid],
    ) -> Result<(), DbErr> {
        IncidentLinkEntity::delete_many()
            .filter(incident_service_instance_model::Column::IncidentId.eq(incident_id))
            .exec(db)
            .await?;
        Self::insert_links(db, incident_id, service_instance_ids).await
    }

    /// position 順の設備 ID（先頭が主設備）
    pub async fn equipment_ids<C: ConnectionTrait>(
        db: &C,
        incident_id: Uuid,
    ) -> Result<Vec<Uuid>, DbErr> {
        let links = IncidentLinkEntity::find()
            .filter(incident_service_instance_model::Column::IncidentId.eq(incident_id))
            .order_by_asc(incident_service_instance_model::Column::Position)
            .all(db)
            .await?;
        Ok(links.into_iter().map(|l| l.service_instance_id).collect())
    }

    /// 複数インシデントの設備 ID をまとめて取得
    pub async fn equipment_ids_for<C: ConnectionTrait>(
        db: &C,
        incident_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Uuid>>, DbErr> {
        let mut map: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        if incident_ids.is_empty() {
            return Ok(map);
        }

        let links = IncidentLinkEntity::find()
            .filter(
                incident_service_instance_model::Column::IncidentId
                    .is_in(incident_ids.iter().copied()),
            )
            .order_by_asc(incident_service_instance_model::Column::IncidentId)
            .order_by_asc(incident_service_instance_model::Column::Position)
            .all(db)
            .await?;

        for link in links {
            map.entry(link.incident_id)
                .or_default()
                .push(link.service_instance_id);
        }
        Ok(map)
    }

    // --- 更新履歴 ---

    pub async fn add_update<C: ConnectionTrait>(
        db: &C,
        incident_id: Uuid,
        message: String,
        status: IncidentStatus,
        created_at: DateTime<Utc>,
    ) -> Result<incident_update_model::Model, DbErr> {
        IncidentUpdateActiveModel {
            id: Set(Uuid::new_v4()),
            incident_id: Set(incident_id),
            message: Set(message),
            status: Set(status.as_str().to_string()),
            created_at: Set(created_at),
        }
        .insert(db)
        .await
    }

    /// 古い順
    pub async fn list_updates<C: ConnectionTrait>(
        db: &C,
        incident_id: Uuid,
    ) -> Result<Vec<incident_update_model::Model>, DbErr> {
        IncidentUpdateEntity::find()
            .filter(incident_update_model::Column::IncidentId.eq(incident_id))
            .order_by_asc(incident_update_model::Column::CreatedAt)
            .all(db)
            .await
    }

    pub async fn updates_for<C: ConnectionTrait>(
        db: &C,
        incident_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<incident_update_model::Model>>, DbErr> {
        let mut map: HashMap<Uuid, Vec<incident_update_model::Model>> = HashMap::new();
        if incident_ids.is_empty() {
            return Ok(map);
        }

        let updates = IncidentUpdateEntity::find()
            .filter(incident_update_model::Column::IncidentId.is_in(incident_ids.iter().copied()))
            .order_by_asc(incident_update_model::Column::CreatedAt)
            .all(db)
            .await?;

        for update in updates {
            map.entry(update.incident_id).or_default().push(update);
        }
        Ok(map)
    }

    // --- コメント ---

    pub async fn add_comment<C: ConnectionTrait>(
        db: &C,
        incident_id: Uuid,
        admin_id: Uuid,
        comment: String,
        created_at: Option<DateTime<Utc>>,
    ) -> Result<incident_comment_model::Model, DbErr> {
        IncidentCommentActiveModel {
            id: Set(Uuid::new_v4()),
            incident_id: Set(incident_id),
            admin_id: Set(admin_id),
            comment: Set(comment),
            created_at: created_at.map_or(Set(Utc::now()), Set),
        }
        .insert(db)
        .await
    }

    pub async fn list_comments<C: ConnectionTrait>(
        db: &C,
        incident_id: Uuid,
    ) -> Result<Vec<incident_comment_model::Model>, DbErr> {
        IncidentCommentEntity::find()
            .filter(incident_comment_model::Column::IncidentId.eq(incident_id))
            .order_by_asc(incident_comment_model::Column::CreatedAt)
            .all(db)
            .await
    }
}
