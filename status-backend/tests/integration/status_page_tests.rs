// tests/integration/status_page_tests.rs

use chrono::{Duration, Utc};
use status_backend::domain::service_status::ServiceStatus;
use status_backend::service::equipment_service::EquipmentService;
use status_backend::service::incident_service::IncidentService;
use status_backend::service::maintenance_service::MaintenanceService;
use status_backend::service::status_service::StatusService;

use crate::common::test_data::{self, Fixture};

#[tokio::test]
async fn test_page_without_copro_is_empty() {
    let fx = Fixture::new().await;
    let page = StatusService::new(fx.pool())
        .status_page(None, Utc::now())
        .await
        .unwrap();

    assert!(page.services.is_empty());
    assert!(page.copro.is_none());
    assert_eq!(page.overall_status, ServiceStatus::Operational);
}

#[tokio::test]
async fn test_page_reports_worst_status() {
    let fx = Fixture::new().await;
    let elevator = fx.add_equipment("Ascenseur 1 (ASC-A-01)").await;
    fx.add_equipment("Chaudière").await;

    IncidentService::new(fx.pool())
        .create(
            &fx.admin,
            fx.copro_id,
            test_data::create_incident_data("Panne ascenseur", vec![elevator], Some("major_outage")),
        )
        .await
        .unwrap();

    let page = StatusService::new(fx.pool())
        .status_page(Some(fx.copro_id), Utc::now())
        .await
        .unwrap();

    assert_eq!(page.overall_status, ServiceStatus::MajorOutage);
    assert_eq!(page.copro.as_ref().map(|c| c.id), Some(fx.copro_id));

    let row = page.services.iter().find(|s| s.id == elevator).unwrap();
    assert_eq!(row.name, "Ascenseur 1");
    assert_eq!(row.building_name.as_deref(), Some("Bâtiment A"));

    assert_eq!(page.incidents.len(), 1);
    assert_eq!(page.incidents[0].service_instance_id, Some(elevator));
    assert_eq!(page.incidents[0].equipment_status.as_deref(), Some("major_outage"));
}

#[tokio::test]
async fn test_maintenance_overlays_stored_status() {
    let fx = Fixture::new().await;
    let elevator = fx.add_equipment("Ascenseur 1").await;
    let now = Utc::now();

    EquipmentService::new(fx.pool())
        .set_status(&fx.admin, fx.copro_id, elevator, "major_outage")
        .await
        .unwrap();
    MaintenanceService::new(fx.pool())
        .create(
            &fx.admin,
            fx.copro_id,
            test_data::create_maintenance_data(
                vec![elevator],
                now - Duration::minutes(30),
                now + Duration::hours(2),
            ),
        )
        .await
        .unwrap();

    let page = StatusService::new(fx.pool())
        .status_page(Some(fx.copro_id), now)
        .await
        .unwrap();

    assert_eq!(page.services[0].status, ServiceStatus::Maintenance);
    assert_eq!(page.overall_status, ServiceStatus::Maintenance);
    assert_eq!(page.maintenances.len(), 1);
    assert_eq!(page.maintenances[0].service_instance_ids, vec![elevator]);

    // 保存された状態はそのまま
    let stored = EquipmentService::new(fx.pool())
        .get(fx.copro_id, elevator)
        .await
        .unwrap();
    assert_eq!(stored.status, "major_outage");

    // 期間外ならメンテナンス表示は消える
    let later = StatusService::new(fx.pool())
        .status_page(Some(fx.copro_id), now + Duration::hours(3))
        .await
        .unwrap();
    assert_eq!(later.services[0].status, ServiceStatus::MajorOutage);
    assert!(later.maintenances.is_empty());
}

#[tokio::test]
async fn test_page_lists_incident_updates() {
    let fx = Fixture::new().await;
    let incidents = IncidentService::new(fx.pool());
    let incident = incidents
        .create(
            &fx.admin,
            fx.copro_id,
            test_data::create_incident_data("Coupure électrique", vec![], None),
        )
        .await
        .unwrap()
        .incident;
    incidents
        .update_status(&fx.admin, fx.copro_id, incident.id, "in_progress")
        .await
        .unwrap();

    let page = StatusService::new(fx.pool())
        .status_page(Some(fx.copro_id), Utc::now())
        .await
        .unwrap();

    assert_eq!(page.incidents[0].status, "in_progress");
    assert_eq!(page.incidents[0].updates.len(), 1);
    assert_eq!(page.incidents[0].equipment_status, None);
    assert_eq!(page.overall_status, ServiceStatus::Operational);
}
