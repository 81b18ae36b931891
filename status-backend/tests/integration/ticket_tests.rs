// tests/integration/ticket_tests.rs

use status_backend::dto::ticket_dto::TicketCommentInputDto;
use status_backend::error::AppError;
use status_backend::service::equipment_service::EquipmentService;
use status_backend::service::incident_service::IncidentService;
use status_backend::service::ticket_service::TicketService;
use uuid::Uuid;

use crate::common::test_data::{self, Fixture};

#[tokio::test]
async fn test_submit_normalizes_input() {
    let fx = Fixture::new().await;
    let elevator = fx.add_equipment("Ascenseur 1").await;
    let service = TicketService::new(fx.pool());

    let mut input = test_data::create_ticket_data(Some(elevator));
    input.status = Some("resolved".to_string());
    input.title = "  Ascenseur bloqué  ".to_string();

    let ticket = service.submit(fx.copro_id, input).await.unwrap();

    assert_eq!(ticket.status, "analyzing");
    assert_eq!(ticket.ticket_type, "incident");
    assert_eq!(ticket.reporter_phone.as_deref(), Some("0612345678"));
    assert_eq!(ticket.reporter_email, "jeanne.martin@example.fr");
    assert_eq!(ticket.title, "Ascenseur bloqué");
}

#[tokio::test]
async fn test_submit_trims_padded_email_and_ignores_blank_phone() {
    let fx = Fixture::new().await;
    let elevator = fx.add_equipment("Ascenseur 1").await;
    let service = TicketService::new(fx.pool());

    let mut input = test_data::create_ticket_data(Some(elevator));
    input.reporter_email = "  Jeanne.Martin@Example.fr ".to_string();
    input.reporter_phone = Some("   ".to_string());

    let ticket = service.submit(fx.copro_id, input).await.unwrap();

    assert_eq!(ticket.reporter_email, "jeanne.martin@example.fr");
    assert_eq!(ticket.reporter_phone, None);
}

#[tokio::test]
async fn test_incident_ticket_without_equipment_is_rejected() {
    let fx = Fixture::new().await;
    let service = TicketService::new(fx.pool());

    let err = service
        .submit(fx.copro_id, test_data::create_ticket_data(None))
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert!(err.to_string().contains("service_instance_id"));

    // 依頼なら設備なしで受け付ける
    let mut request = test_data::create_ticket_data(None);
    request.ticket_type = Some("request".to_string());
    let ticket = service.submit(fx.copro_id, request).await.unwrap();
    assert_eq!(ticket.ticket_type, "request");
}

#[tokio::test]
async fn test_submit_rejects_invalid_fields() {
    let fx = Fixture::new().await;
    let elevator = fx.add_equipment("Ascenseur 1").await;
    let service = TicketService::new(fx.pool());

    let mut bad_phone = test_data::create_ticket_data(Some(elevator));
    bad_phone.reporter_phone = Some("123".to_string());
    assert!(service
        .submit(fx.copro_id, bad_phone)
        .await
        .unwrap_err()
        .is_validation());

    let mut short = test_data::create_ticket_data(Some(elevator));
    short.description = "  court  ".to_string();
    assert!(service
        .submit(fx.copro_id, short)
        .await
        .unwrap_err()
        .is_validation());

    let foreign = service
        .submit(fx.copro_id, test_data::create_ticket_data(Some(Uuid::new_v4())))
        .await
        .unwrap_err();
    assert!(matches!(foreign, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_submit_requires_active_copro() {
    let fx = Fixture::new().await;
    let service = TicketService::new(fx.pool());

    let mut request = test_data::create_ticket_data(None);
    request.ticket_type = Some("request".to_string());
    let err = service.submit(Uuid::new_v4(), request).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_assign_moves_ticket_in_progress() {
    let fx = Fixture::new().await;
    let elevator = fx.add_equipment("Ascenseur 1").await;
    let service = TicketService::new(fx.pool());
    let ticket = service
        .submit(fx.copro_id, test_data::create_ticket_data(Some(elevator)))
        .await
        .unwrap();

    let assigned = service
        .assign(&fx.admin, fx.copro_id, ticket.id, fx.admin.user_id)
        .await
        .unwrap();
    assert_eq!(assigned.assigned_to, Some(fx.admin.user_id));
    assert_eq!(assigned.status, "in_progress");

    let not_admin = service
        .assign(&fx.admin, fx.copro_id, ticket.id, fx.resident.user_id)
        .await
        .unwrap_err();
    assert!(not_admin.is_validation());

    let unknown = service
        .assign(&fx.admin, fx.copro_id, ticket.id, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(unknown, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_ticket_status_is_free() {
    let fx = Fixture::new().await;
    let elevator = fx.add_equipment("Ascenseur 1").await;
    let service = TicketService::new(fx.pool());
    let ticket = service
        .submit(fx.copro_id, test_data::create_ticket_data(Some(elevator)))
        .await
        .unwrap();

    for status in ["closed", "analyzing", "resolved"] {
        let updated = service
            .update_status(&fx.admin, fx.copro_id, ticket.id, status)
            .await
            .unwrap();
        assert_eq!(updated.status, status);
    }

    assert!(service
        .update_status(&fx.admin, fx.copro_id, ticket.id, "pending")
        .await
        .unwrap_err()
        .is_validation());
}

#[tokio::test]
async fn test_promote_creates_incident_and_copies_comments() {
    let fx = Fixture::new().await;
    let elevator = fx.add_equipment("Ascenseur 1").await;
    let service = TicketService::new(fx.pool());
    let ticket = service
        .submit(fx.copro_id, test_data::create_ticket_data(Some(elevator)))
        .await
        .unwrap();
    service
        .add_comment(
            &fx.admin,
            fx.copro_id,
            ticket.id,
            TicketCommentInputDto {
                comment: "Ascensoriste contacté".to_string(),
            },
        )
        .await
        .unwrap();

    let result = service
        .promote_to_incident(&fx.admin, fx.copro_id, ticket.id, true)
        .await
        .unwrap();

    let incident = result.incident.expect("incident created");
    assert_eq!(result.ticket.incident_id, Some(incident.incident.id));
    assert_eq!(result.ticket.reviewed_by, Some(fx.admin.user_id));
    assert!(result.ticket.reviewed_at.is_some());
    assert_eq!(result.ticket.status, "analyzing");
    assert_eq!(incident.incident.title, ticket.title);
    assert_eq!(incident.incident.service_instance_id, Some(elevator));

    let equipment = EquipmentService::new(fx.pool())
        .get(fx.copro_id, elevator)
        .await
        .unwrap();
    assert_eq!(equipment.status, "degraded");

    let detail = IncidentService::new(fx.pool())
        .get_detail(fx.copro_id, incident.incident.id)
        .await
        .unwrap();
    assert_eq!(detail.comments.len(), 1);
    assert_eq!(detail.comments[0].admin_id, fx.admin.user_id);
    assert_eq!(
        detail.comments[0].comment,
        format!("[Ticket #{}] Ascensoriste contacté", ticket.id)
    );

    let again = service
        .promote_to_incident(&fx.admin, fx.copro_id, ticket.id, true)
        .await
        .unwrap_err();
    assert!(matches!(again, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_review_without_incident() {
    let fx = Fixture::new().await;
    let service = TicketService::new(fx.pool());
    let mut request = test_data::create_ticket_data(None);
    request.ticket_type = Some("request".to_string());
    let ticket = service.submit(fx.copro_id, request).await.unwrap();

    let result = service
        .promote_to_incident(&fx.admin, fx.copro_id, ticket.id, false)
        .await
        .unwrap();

    assert!(result.incident.is_none());
    assert_eq!(result.ticket.incident_id, None);
    assert_eq!(result.ticket.reviewed_by, Some(fx.admin.user_id));
    assert!(IncidentService::new(fx.pool())
        .list(fx.copro_id, None)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_ticket_listing_is_admin_only() {
    let fx = Fixture::new().await;
    let elevator = fx.add_equipment("Ascenseur 1").await;
    let service = TicketService::new(fx.pool());
    let ticket = service
        .submit(fx.copro_id, test_data::create_ticket_data(Some(elevator)))
        .await
        .unwrap();

    let err = service.list(&fx.resident, fx.copro_id, None).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let tickets = service
        .list(&fx.admin, fx.copro_id, Some("analyzing"))
        .await
        .unwrap();
    assert_eq!(tickets.len(), 1);

    let detail = service
        .get_detail(&fx.admin, fx.copro_id, ticket.id)
        .await
        .unwrap();
    assert!(detail.comments.is_empty());
}
