use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 1. incidents
        manager
            .create_table(
                Table::create()
                    .table(Incidents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Incidents::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Incidents::CoproId).uuid().not_null())
                    .col(ColumnDef::new(Incidents::Title).string().not_null())
                    .col(ColumnDef::new(Incidents::Message).text())
                    .col(
                        ColumnDef::new(Incidents::Status)
                            .string_len(20)
                            .not_null()
                            .default("investigating"),
                    )
                    .col(
                        ColumnDef::new(Incidents::IsScheduled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Incidents::ScheduledFor).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Incidents::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Incidents::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Incidents::ResolvedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_incidents_copro_id")
                            .from(Incidents::Table, Incidents::CoproId)
                            .to(Copros::Table, Copros::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_incidents_copro_created_at")
                    .table(Incidents::Table)
                    .col(Incidents::CoproId)
                    .col(Incidents::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // 2. incident_service_instances (インシデントと設備の多対多)
        manager
            .create_table(
                Table::create()
                    .table(IncidentServiceInstances::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IncidentServiceInstances::IncidentId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IncidentServiceInstances::ServiceInstanceId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IncidentServiceInstances::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .primary_key(
                        Index::create()
                            .col(IncidentServiceInstances::IncidentId)
                            .col(IncidentServiceInstances::ServiceInstanceId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_incident_service_instances_incident_id")
                            .from(
                                IncidentServiceInstances::Table,
                                IncidentServiceInstances::IncidentId,
                            )
                            .to(Incidents::Table, Incidents::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_incident_service_instances_service_instance_id")
                            .from(
                                IncidentServiceInstances::Table,
                                IncidentServiceInstances::ServiceInstanceId,
                            )
                            .to(ServiceInstances::Table, ServiceInstances::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_incident_service_instances_service_instance_id")
                    .table(IncidentServiceInstances::Table)
                    .col(IncidentServiceInstances::ServiceInstanceId)
                    .to_owned(),
            )
            .await?;

        // 3. incident_updates (追記専用)
        manager
            .create_table(
                Table::create()
                    .table(IncidentUpdates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IncidentUpdates::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(IncidentUpdates::IncidentId).uuid().not_null())
                    .col(ColumnDef::new(IncidentUpdates::Message).text().not_null())
                    .col(
                        ColumnDef::new(IncidentUpdates::Status)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IncidentUpdates::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_incident_updates_incident_id")
                            .from(IncidentUpdates::Table, IncidentUpdates::IncidentId)
                            .to(Incidents::Table, Incidents::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_incident_updates_incident_id")
                    .table(IncidentUpdates::Table)
                    .col(IncidentUpdates::IncidentId)
                    .to_owned(),
            )
            .await?;

        // 4. incident_comments (管理者のみ)
        manager
            .create_table(
                Table::create()
                    .table(IncidentComments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IncidentComments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(IncidentComments::IncidentId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(IncidentComments::AdminId).uuid().not_null())
                    .col(ColumnDef::new(IncidentComments::Comment).text().not_null())
                    .col(
                        ColumnDef::new(IncidentComments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_incident_comments_incident_id")
                            .from(IncidentComments::Table, IncidentComments::IncidentId)
                            .to(Incidents::Table, Incidents::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_incident_comments_admin_id")
                            .from(IncidentComments::Table, IncidentComments::AdminId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_incident_comments_incident_id")
                    .table(IncidentComments::Table)
                    .col(IncidentComments::IncidentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(IncidentComments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(IncidentUpdates::Table).to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(IncidentServiceInstances::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Incidents::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Incidents {
    Table,
    Id,
    CoproId,
    Title,
    Message,
    Status,
    IsScheduled,
    ScheduledFor,
    CreatedAt,
    UpdatedAt,
    ResolvedAt,
}

#[derive(DeriveIden)]
enum IncidentServiceInstances {
    Table,
    IncidentId,
    ServiceInstanceId,
    Position,
}

#[derive(DeriveIden)]
enum IncidentUpdates {
    Table,
    Id,
    IncidentId,
    Message,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum IncidentComments {
    Table,
    Id,
    IncidentId,
    AdminId,
    Comment,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Copros {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum ServiceInstances {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
