// tests/integration/equipment_tests.rs

use status_backend::dto::equipment_dto::UpdateEquipmentDto;
use status_backend::error::AppError;
use status_backend::service::equipment_service::EquipmentService;
use status_backend::service::incident_service::IncidentService;
use uuid::Uuid;

use crate::common::test_data::{self, Fixture};

#[tokio::test]
async fn test_set_status_accepts_only_known_values() {
    let fx = Fixture::new().await;
    let boiler = fx.add_equipment("Chaudière").await;
    let service = EquipmentService::new(fx.pool());

    let updated = service
        .set_status(&fx.admin, fx.copro_id, boiler, "partial_outage")
        .await
        .unwrap();
    assert_eq!(updated.status, "partial_outage");

    for raw in ["", "down", "Operational"] {
        let err = service
            .set_status(&fx.admin, fx.copro_id, boiler, raw)
            .await
            .unwrap_err();
        assert!(err.is_validation(), "{raw} should be rejected");
    }

    let unchanged = service.get(fx.copro_id, boiler).await.unwrap();
    assert_eq!(unchanged.status, "partial_outage");
}

#[tokio::test]
async fn test_create_and_update_reject_unknown_status() {
    let fx = Fixture::new().await;
    let service = EquipmentService::new(fx.pool());

    let mut input = test_data::create_equipment_data(fx.building_id, "Portail");
    input.status = Some("down".to_string());
    let err = service
        .create(&fx.admin, fx.copro_id, input)
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert!(service.list(fx.copro_id, None).await.unwrap().is_empty());

    let gate = fx.add_equipment("Portail").await;
    let err = service
        .update(
            &fx.admin,
            fx.copro_id,
            gate,
            UpdateEquipmentDto {
                status: Some("Operational".to_string()),
                name: Some("Portail nord".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let unchanged = service.get(fx.copro_id, gate).await.unwrap();
    assert_eq!(unchanged.name, "Portail");
    assert_eq!(unchanged.status, "operational");
}

#[tokio::test]
async fn test_create_rejects_unknown_building() {
    let fx = Fixture::new().await;
    let err = EquipmentService::new(fx.pool())
        .create(
            &fx.admin,
            fx.copro_id,
            test_data::create_equipment_data(Uuid::new_v4(), "Interphone"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_deactivated_equipment_is_hidden_from_public_list() {
    let fx = Fixture::new().await;
    let gate = fx.add_equipment("Portail").await;
    fx.add_equipment("Digicode").await;
    let service = EquipmentService::new(fx.pool());

    service
        .update(
            &fx.admin,
            fx.copro_id,
            gate,
            UpdateEquipmentDto {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let public = service.list_public(fx.copro_id).await.unwrap();
    assert_eq!(public.len(), 1);
    assert_eq!(public[0].name, "Digicode");
    assert_eq!(public[0].building_name.as_deref(), Some("Bâtiment A"));
    assert_eq!(service.list(fx.copro_id, None).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_delete_detaches_incidents() {
    let fx = Fixture::new().await;
    let elevator = fx.add_equipment("Ascenseur 1").await;
    let incidents = IncidentService::new(fx.pool());
    let incident = incidents
        .create(
            &fx.admin,
            fx.copro_id,
            test_data::create_incident_data("Panne", vec![elevator], Some("major_outage")),
        )
        .await
        .unwrap()
        .incident;

    EquipmentService::new(fx.pool())
        .delete(&fx.admin, fx.copro_id, elevator)
        .await
        .unwrap();

    let detail = incidents.get_detail(fx.copro_id, incident.id).await.unwrap();
    assert!(detail.incident.service_instance_ids.is_empty());
    assert_eq!(detail.incident.service_instance_id, None);
}

#[tokio::test]
async fn test_residents_cannot_change_status() {
    let fx = Fixture::new().await;
    let boiler = fx.add_equipment("Chaudière").await;
    let err = EquipmentService::new(fx.pool())
        .set_status(&fx.resident, fx.copro_id, boiler, "degraded")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}
