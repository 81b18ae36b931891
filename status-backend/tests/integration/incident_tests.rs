// tests/integration/incident_tests.rs

use status_backend::dto::incident_dto::{AddIncidentUpdateDto, UpdateIncidentDto};
use status_backend::error::AppError;
use status_backend::service::equipment_service::EquipmentService;
use status_backend::service::incident_service::IncidentService;
use uuid::Uuid;

use crate::common::test_data::{self, Fixture};

#[tokio::test]
async fn test_create_incident_marks_equipment() {
    let fx = Fixture::new().await;
    let elevator = fx.add_equipment("Ascenseur 1 (ASC-A-01)").await;
    let service = IncidentService::new(fx.pool());

    let detail = service
        .create(
            &fx.admin,
            fx.copro_id,
            test_data::create_incident_data("Panne ascenseur", vec![elevator], Some("degraded")),
        )
        .await
        .unwrap();

    assert_eq!(detail.incident.status, "investigating");
    assert_eq!(detail.incident.service_instance_id, Some(elevator));
    assert!(detail.updates.is_empty());

    let equipment = EquipmentService::new(fx.pool())
        .get(fx.copro_id, elevator)
        .await
        .unwrap();
    assert_eq!(equipment.status, "degraded");

    // 作成時には更新履歴を追加しない
    let stored = service.get_detail(fx.copro_id, detail.incident.id).await.unwrap();
    assert!(stored.updates.is_empty());
}

#[tokio::test]
async fn test_create_incident_requires_equipment_status() {
    let fx = Fixture::new().await;
    let boiler = fx.add_equipment("Chaudière").await;
    let service = IncidentService::new(fx.pool());

    let missing = service
        .create(
            &fx.admin,
            fx.copro_id,
            test_data::create_incident_data("Chauffage coupé", vec![boiler], None),
        )
        .await
        .unwrap_err();
    assert!(missing.is_validation());

    let operational = service
        .create(
            &fx.admin,
            fx.copro_id,
            test_data::create_incident_data("Chauffage coupé", vec![boiler], Some("operational")),
        )
        .await
        .unwrap_err();
    assert!(operational.is_validation());

    assert!(service.list(fx.copro_id, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_equipment_leaves_nothing_behind() {
    let fx = Fixture::new().await;
    let gate = fx.add_equipment("Portail").await;
    let service = IncidentService::new(fx.pool());

    let err = service
        .create(
            &fx.admin,
            fx.copro_id,
            test_data::create_incident_data(
                "Portail bloqué",
                vec![gate, Uuid::new_v4()],
                Some("major_outage"),
            ),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // 設備の状態もインシデントも変わっていない
    let equipment = EquipmentService::new(fx.pool())
        .get(fx.copro_id, gate)
        .await
        .unwrap();
    assert_eq!(equipment.status, "operational");
    assert!(service.list(fx.copro_id, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_scheduled_incident_starts_scheduled() {
    let fx = Fixture::new().await;
    let service = IncidentService::new(fx.pool());

    let mut input = test_data::create_incident_data("Coupure d'eau programmée", vec![], None);
    input.is_scheduled = true;
    input.scheduled_for = Some(chrono::Utc::now() + chrono::Duration::days(2));

    let detail = service.create(&fx.admin, fx.copro_id, input).await.unwrap();
    assert_eq!(detail.incident.status, "scheduled");
    assert!(detail.incident.is_scheduled);
}

#[tokio::test]
async fn test_status_transitions_record_updates() {
    let fx = Fixture::new().await;
    let service = IncidentService::new(fx.pool());
    let incident = service
        .create(
            &fx.admin,
            fx.copro_id,
            test_data::create_incident_data("Fuite parking", vec![], None),
        )
        .await
        .unwrap()
        .incident;

    let change = service
        .update_status(&fx.admin, fx.copro_id, incident.id, "in_progress")
        .await
        .unwrap();
    assert!(change.changed());
    assert_eq!(
        change.update.unwrap().message,
        "Statut changé: investigating → in_progress"
    );

    // 同じステータスは何も記録しない
    let same = service
        .update_status(&fx.admin, fx.copro_id, incident.id, "in_progress")
        .await
        .unwrap();
    assert!(!same.changed());

    let detail = service.get_detail(fx.copro_id, incident.id).await.unwrap();
    assert_eq!(detail.updates.len(), 1);
    assert_eq!(detail.incident.status, "in_progress");
}

#[tokio::test]
async fn test_invalid_transition_is_rejected() {
    let fx = Fixture::new().await;
    let service = IncidentService::new(fx.pool());
    let incident = service
        .create(
            &fx.admin,
            fx.copro_id,
            test_data::create_incident_data("Interphone muet", vec![], None),
        )
        .await
        .unwrap()
        .incident;

    service
        .update_status(&fx.admin, fx.copro_id, incident.id, "resolved")
        .await
        .unwrap();

    let err = service
        .update_status(&fx.admin, fx.copro_id, incident.id, "investigating")
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert!(err.to_string().contains("resolved → investigating"));

    let bogus = service
        .update_status(&fx.admin, fx.copro_id, incident.id, "reopened")
        .await
        .unwrap_err();
    assert!(bogus.is_validation());
}

#[tokio::test]
async fn test_resolved_at_is_set_once() {
    let fx = Fixture::new().await;
    let service = IncidentService::new(fx.pool());
    let incident = service
        .create(
            &fx.admin,
            fx.copro_id,
            test_data::create_incident_data("Éclairage escalier", vec![], None),
        )
        .await
        .unwrap()
        .incident;

    let resolved = service
        .update_status(&fx.admin, fx.copro_id, incident.id, "resolved")
        .await
        .unwrap();
    let first = resolved.incident.resolved_at.expect("resolved_at set");
    assert_eq!(Some(first), resolved.update.map(|u| u.created_at));

    let closed = service
        .update_status(&fx.admin, fx.copro_id, incident.id, "closed")
        .await
        .unwrap();
    assert_eq!(closed.incident.resolved_at, Some(first));

    // 再オープンしても resolved_at は残る
    let reopened = service
        .update_status(&fx.admin, fx.copro_id, incident.id, "investigating")
        .await
        .unwrap();
    assert_eq!(reopened.incident.status, "investigating");
    assert_eq!(reopened.incident.resolved_at, Some(first));
}

#[tokio::test]
async fn test_add_update_overrides_status() {
    let fx = Fixture::new().await;
    let service = IncidentService::new(fx.pool());
    let incident = service
        .create(
            &fx.admin,
            fx.copro_id,
            test_data::create_incident_data("Porte garage", vec![], None),
        )
        .await
        .unwrap()
        .incident;
    service
        .update_status(&fx.admin, fx.copro_id, incident.id, "resolved")
        .await
        .unwrap();

    // resolved → investigating は遷移表にないが、管理者の更新では許可される
    let update = service
        .add_update(
            &fx.admin,
            fx.copro_id,
            incident.id,
            AddIncidentUpdateDto {
                message: "Le problème est réapparu".to_string(),
                status: "investigating".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(update.status, "investigating");

    let detail = service.get_detail(fx.copro_id, incident.id).await.unwrap();
    assert_eq!(detail.incident.status, "investigating");
    assert!(detail.incident.resolved_at.is_some());
    assert_eq!(detail.updates.len(), 2);
    assert_eq!(detail.updates[1].message, "Le problème est réapparu");
}

#[tokio::test]
async fn test_update_replaces_equipment_links() {
    let fx = Fixture::new().await;
    let first = fx.add_equipment("Ascenseur 1").await;
    let second = fx.add_equipment("Ascenseur 2").await;
    let service = IncidentService::new(fx.pool());
    let incident = service
        .create(
            &fx.admin,
            fx.copro_id,
            test_data::create_incident_data("Ascenseurs", vec![first], Some("partial_outage")),
        )
        .await
        .unwrap()
        .incident;

    let updated = service
        .update(
            &fx.admin,
            fx.copro_id,
            incident.id,
            UpdateIncidentDto {
                service_instance_ids: Some(vec![second, first, second]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.service_instance_ids, vec![second, first]);
    assert_eq!(updated.service_instance_id, Some(second));
}

#[tokio::test]
async fn test_comments_are_attributed_to_admin() {
    let fx = Fixture::new().await;
    let service = IncidentService::new(fx.pool());
    let incident = service
        .create(
            &fx.admin,
            fx.copro_id,
            test_data::create_incident_data("VMC bruyante", vec![], None),
        )
        .await
        .unwrap()
        .incident;

    let comment = service
        .add_comment(&fx.admin, fx.copro_id, incident.id, "  Technicien appelé  ")
        .await
        .unwrap();
    assert_eq!(comment.admin_id, fx.admin.user_id);
    assert_eq!(comment.comment, "Technicien appelé");

    let blank = service
        .add_comment(&fx.admin, fx.copro_id, incident.id, "   ")
        .await
        .unwrap_err();
    assert!(blank.is_validation());
}

#[tokio::test]
async fn test_residents_cannot_manage_incidents() {
    let fx = Fixture::new().await;
    let service = IncidentService::new(fx.pool());

    let err = service
        .create(
            &fx.resident,
            fx.copro_id,
            test_data::create_incident_data("Tentative", vec![], None),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn test_list_filters_by_status() {
    let fx = Fixture::new().await;
    let service = IncidentService::new(fx.pool());
    for title in ["Digicode", "Boîtes aux lettres"] {
        service
            .create(
                &fx.admin,
                fx.copro_id,
                test_data::create_incident_data(title, vec![], None),
            )
            .await
            .unwrap();
    }
    let all = service.list(fx.copro_id, None).await.unwrap();
    service
        .update_status(&fx.admin, fx.copro_id, all[0].id, "closed")
        .await
        .unwrap();

    let closed = service.list(fx.copro_id, Some("closed")).await.unwrap();
    assert_eq!(closed.len(), 1);
    assert_eq!(closed[0].id, all[0].id);

    assert!(service
        .list(fx.copro_id, Some("archived"))
        .await
        .unwrap_err()
        .is_validation());
    assert_eq!(service.recent(fx.copro_id, 1).await.unwrap().len(), 1);
}
