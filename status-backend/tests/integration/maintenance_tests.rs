// tests/integration/maintenance_tests.rs

use chrono::{Duration, Utc};
use status_backend::dto::maintenance_dto::UpdateMaintenanceDto;
use status_backend::service::equipment_service::EquipmentService;
use status_backend::service::maintenance_service::MaintenanceService;

use crate::common::test_data::{self, Fixture};

#[tokio::test]
async fn test_window_must_be_ordered() {
    let fx = Fixture::new().await;
    let now = Utc::now();
    let err = MaintenanceService::new(fx.pool())
        .create(
            &fx.admin,
            fx.copro_id,
            test_data::create_maintenance_data(vec![], now, now - Duration::hours(1)),
        )
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_active_and_upcoming_windows() {
    let fx = Fixture::new().await;
    let elevator = fx.add_equipment("Ascenseur 1").await;
    let boiler = fx.add_equipment("Chaudière").await;
    let service = MaintenanceService::new(fx.pool());
    let now = Utc::now();

    let current = service
        .create(
            &fx.admin,
            fx.copro_id,
            test_data::create_maintenance_data(
                vec![elevator],
                now - Duration::hours(1),
                now + Duration::hours(1),
            ),
        )
        .await
        .unwrap();
    let later = service
        .create(
            &fx.admin,
            fx.copro_id,
            test_data::create_maintenance_data(
                vec![boiler],
                now + Duration::days(3),
                now + Duration::days(4),
            ),
        )
        .await
        .unwrap();

    let active = service.active(fx.copro_id, now).await.unwrap();
    assert_eq!(active.maintenances.len(), 1);
    assert_eq!(active.maintenances[0].id, current.id);
    assert!(active.covers(elevator));
    assert!(!active.covers(boiler));

    let upcoming = service.upcoming(fx.copro_id, now).await.unwrap();
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0].id, later.id);

    // メンテナンスは設備の保存状態を変えない
    let stored = EquipmentService::new(fx.pool())
        .get(fx.copro_id, elevator)
        .await
        .unwrap();
    assert_eq!(stored.status, "operational");
}

#[tokio::test]
async fn test_update_replaces_equipment() {
    let fx = Fixture::new().await;
    let elevator = fx.add_equipment("Ascenseur 1").await;
    let boiler = fx.add_equipment("Chaudière").await;
    let service = MaintenanceService::new(fx.pool());
    let now = Utc::now();

    let maintenance = service
        .create(
            &fx.admin,
            fx.copro_id,
            test_data::create_maintenance_data(
                vec![elevator],
                now + Duration::days(1),
                now + Duration::days(2),
            ),
        )
        .await
        .unwrap();

    let updated = service
        .update(
            &fx.admin,
            fx.copro_id,
            maintenance.id,
            UpdateMaintenanceDto {
                service_instance_ids: Some(vec![boiler]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.service_instance_ids, vec![boiler]);

    // 終了日だけを開始日より前にすると拒否される
    let err = service
        .update(
            &fx.admin,
            fx.copro_id,
            maintenance.id,
            UpdateMaintenanceDto {
                end_date: Some(now),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_validation());

    service
        .delete(&fx.admin, fx.copro_id, maintenance.id)
        .await
        .unwrap();
    assert!(service.list(fx.copro_id).await.unwrap().is_empty());
}
