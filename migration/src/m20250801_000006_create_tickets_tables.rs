use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tickets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tickets::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Tickets::CoproId).uuid().not_null())
                    .col(ColumnDef::new(Tickets::ServiceInstanceId).uuid())
                    .col(ColumnDef::new(Tickets::ReporterName).string().not_null())
                    .col(ColumnDef::new(Tickets::ReporterEmail).string().not_null())
                    .col(ColumnDef::new(Tickets::ReporterPhone).string_len(20))
                    .col(ColumnDef::new(Tickets::Title).string().not_null())
                    .col(ColumnDef::new(Tickets::Description).text().not_null())
                    .col(ColumnDef::new(Tickets::Location).string())
                    .col(
                        ColumnDef::new(Tickets::TicketType)
                            .string_len(20)
                            .not_null()
                            .default("incident"),
                    )
                    .col(
                        ColumnDef::new(Tickets::Status)
                            .string_len(20)
                            .not_null()
                            .default("analyzing"),
                    )
                    .col(ColumnDef::new(Tickets::AssignedTo).uuid())
                    .col(ColumnDef::new(Tickets::ReviewedBy).uuid())
                    .col(ColumnDef::new(Tickets::ReviewedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Tickets::IncidentId).uuid())
                    .col(
                        ColumnDef::new(Tickets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Tickets::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tickets_copro_id")
                            .from(Tickets::Table, Tickets::CoproId)
                            .to(Copros::Table, Copros::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tickets_service_instance_id")
                            .from(Tickets::Table, Tickets::ServiceInstanceId)
                            .to(ServiceInstances::Table, ServiceInstances::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tickets_assigned_to")
                            .from(Tickets::Table, Tickets::AssignedTo)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tickets_reviewed_by")
                            .from(Tickets::Table, Tickets::ReviewedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tickets_incident_id")
                            .from(Tickets::Table, Tickets::IncidentId)
                            .to(Incidents::Table, Incidents::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tickets_copro_status")
                    .table(Tickets::Table)
                    .col(Tickets::CoproId)
                    .col(Tickets::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TicketComments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TicketComments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TicketComments::TicketId).uuid().not_null())
                    .col(ColumnDef::new(TicketComments::AdminId).uuid().not_null())
                    .col(ColumnDef::new(TicketComments::Comment).text().not_null())
                    .col(
                        ColumnDef::new(TicketComments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ticket_comments_ticket_id")
                            .from(TicketComments::Table, TicketComments::TicketId)
                            .to(Tickets::Table, Tickets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ticket_comments_admin_id")
                            .from(TicketComments::Table, TicketComments::AdminId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ticket_comments_ticket_id")
                    .table(TicketComments::Table)
                    .col(TicketComments::TicketId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TicketComments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tickets::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Tickets {
    Table,
    Id,
    CoproId,
    ServiceInstanceId,
    ReporterName,
    ReporterEmail,
    ReporterPhone,
    Title,
    Description,
    Location,
    TicketType,
    Status,
    AssignedTo,
    ReviewedBy,
    ReviewedAt,
    IncidentId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TicketComments {
    Table,
    Id,
    TicketId,
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

#[derive(DeriveIden)]
enum Incidents {
    Table,
    Id,
}
