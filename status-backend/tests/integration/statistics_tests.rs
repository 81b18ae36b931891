// tests/integration/statistics_tests.rs

use chrono::{TimeZone, Utc};
use status_backend::dto::incident_dto::UpdateIncidentDto;
use status_backend::error::AppError;
use status_backend::service::availability_service::AvailabilityService;
use status_backend::service::incident_service::IncidentService;
use uuid::Uuid;

use crate::common::test_data::{self, Fixture};

#[tokio::test]
async fn test_year_without_incidents() {
    let fx = Fixture::new().await;
    let elevator = fx.add_equipment("Ascenseur 1").await;

    let stats = AvailabilityService::new(fx.pool())
        .general_statistics(fx.copro_id, 2024, Utc::now())
        .await
        .unwrap();

    assert_eq!(stats.total_hours, 8784.0);
    assert!(stats.incidents_by_day.is_empty());
    let row = &stats.equipment_availability[0];
    assert_eq!(row.equipment_id, elevator);
    assert_eq!(row.availability_percent, 100.0);
}

#[tokio::test]
async fn test_full_year_outage() {
    let fx = Fixture::new().await;
    let elevator = fx.add_equipment("Ascenseur 1").await;
    let boiler = fx.add_equipment("Chaudière").await;

    let mut input =
        test_data::create_incident_data("Ascenseur hors service", vec![elevator], Some("major_outage"));
    input.created_at = Some(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap());
    IncidentService::new(fx.pool())
        .create(&fx.admin, fx.copro_id, input)
        .await
        .unwrap();

    let stats = AvailabilityService::new(fx.pool())
        .general_statistics(fx.copro_id, 2023, Utc::now())
        .await
        .unwrap();

    assert_eq!(stats.total_hours, 8760.0);
    let elevator_row = stats
        .equipment_availability
        .iter()
        .find(|r| r.equipment_id == elevator)
        .unwrap();
    assert_eq!(elevator_row.availability_percent, 0.0);
    assert_eq!(elevator_row.incident_count, 1);

    let boiler_row = stats
        .equipment_availability
        .iter()
        .find(|r| r.equipment_id == boiler)
        .unwrap();
    assert_eq!(boiler_row.availability_percent, 100.0);

    assert_eq!(stats.incidents_by_day.len(), 1);
    assert_eq!(stats.all_incidents[0].service_instance.as_deref(), Some("Ascenseur 1"));
}

#[tokio::test]
async fn test_resolution_times() {
    let fx = Fixture::new().await;
    let elevator = fx.add_equipment("Ascenseur 1").await;
    let incidents = IncidentService::new(fx.pool());

    let mut input = test_data::create_incident_data("Porte palière", vec![elevator], Some("degraded"));
    input.created_at = Some(Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap());
    let incident = incidents
        .create(&fx.admin, fx.copro_id, input)
        .await
        .unwrap()
        .incident;

    incidents
        .update(
            &fx.admin,
            fx.copro_id,
            incident.id,
            UpdateIncidentDto {
                resolved_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 14, 0, 0).unwrap()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let stats = AvailabilityService::new(fx.pool())
        .general_statistics(fx.copro_id, 2024, Utc::now())
        .await
        .unwrap();

    let row = &stats.equipment_availability[0];
    assert_eq!(row.downtime_hours, 6.0);
    assert_eq!(row.avg_resolution_hours, Some(6.0));

    let resolution = &stats.resolution_time_by_equipment[0];
    assert_eq!(resolution.resolved_count, 1);
    assert_eq!(resolution.min_hours, 6.0);
    assert_eq!(resolution.max_hours, 6.0);
    assert_eq!(stats.all_incidents[0].resolution_time_hours, Some(6.0));
}

#[tokio::test]
async fn test_building_statistics_scope() {
    let fx = Fixture::new().await;
    fx.add_equipment("Ascenseur 1").await;
    let service = AvailabilityService::new(fx.pool());

    let stats = service
        .building_statistics(fx.copro_id, fx.building_id, 2024, Utc::now())
        .await
        .unwrap();
    assert_eq!(stats.building_id, Some(fx.building_id));
    assert_eq!(stats.equipment_availability.len(), 1);

    let err = service
        .building_statistics(fx.copro_id, Uuid::new_v4(), 2024, Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
