// tests/integration/copro_tests.rs

use status_backend::dto::copro_dto::UpdateCoproDto;
use status_backend::dto::user_dto::CreateUserDto;
use status_backend::error::AppError;
use status_backend::service::building_service::BuildingService;
use status_backend::service::copro_service::CoproService;
use status_backend::service::user_service::UserService;

use crate::common::test_data::{self, Fixture};

#[tokio::test]
async fn test_only_one_active_copro() {
    let fx = Fixture::new().await;
    let service = CoproService::new(fx.pool());

    let active = service.get_active().await.unwrap();
    assert_eq!(active.id, fx.copro_id);
    assert_eq!(active.country, "France");

    let err = service
        .create(&fx.admin, test_data::create_copro_data("Résidence du Parc"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_deactivated_copro_is_not_resolved() {
    let fx = Fixture::new().await;
    let service = CoproService::new(fx.pool());

    service
        .update(
            &fx.admin,
            fx.copro_id,
            UpdateCoproDto {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(service.find_active().await.unwrap().is_none());
    assert!(matches!(
        service.resolve_active_id().await.unwrap_err(),
        AppError::NotFound(_)
    ));
}

#[tokio::test]
async fn test_building_with_equipment_cannot_be_deleted() {
    let fx = Fixture::new().await;
    let elevator = fx.add_equipment("Ascenseur 1").await;
    let buildings = BuildingService::new(fx.pool());

    let err = buildings
        .delete(&fx.admin, fx.copro_id, fx.building_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert!(err.to_string().contains("1 équipement(s)"));

    status_backend::service::equipment_service::EquipmentService::new(fx.pool())
        .delete(&fx.admin, fx.copro_id, elevator)
        .await
        .unwrap();
    buildings
        .delete(&fx.admin, fx.copro_id, fx.building_id)
        .await
        .unwrap();
    assert!(buildings.list(fx.copro_id, false).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_building_names_are_unique() {
    let fx = Fixture::new().await;
    let err = BuildingService::new(fx.pool())
        .create(
            &fx.admin,
            fx.copro_id,
            test_data::create_building_data("Bâtiment A"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_user_emails_are_normalized_and_unique() {
    let fx = Fixture::new().await;
    let users = UserService::new(fx.pool());

    let err = users
        .create(
            &fx.admin,
            test_data::create_user_data("  SYNDIC@example.fr ", true, Some(fx.copro_id)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let caretaker = users
        .create(
            &fx.admin,
            test_data::create_user_data(" Gardien@Example.fr  ", false, Some(fx.copro_id)),
        )
        .await
        .unwrap();
    assert_eq!(caretaker.email, "gardien@example.fr");

    let invalid = users
        .create(
            &fx.admin,
            CreateUserDto {
                email: "pas-un-email".to_string(),
                ..test_data::create_user_data("x@example.fr", false, None)
            },
        )
        .await
        .unwrap_err();
    assert!(invalid.is_validation());
}

#[tokio::test]
async fn test_list_admins_includes_unscoped_admins() {
    let fx = Fixture::new().await;
    let users = UserService::new(fx.pool());
    users
        .create(
            &fx.admin,
            test_data::create_user_data("astreinte@example.fr", true, None),
        )
        .await
        .unwrap();

    let admins = users.list_admins(fx.copro_id).await.unwrap();
    let emails: Vec<&str> = admins.iter().map(|u| u.email.as_str()).collect();
    assert_eq!(emails, vec!["astreinte@example.fr", "syndic@example.fr"]);
}

#[tokio::test]
async fn test_failed_operation_rolls_back() {
    use sea_orm::{ActiveModelBehavior, Set};
    use status_backend::domain::building_model::ActiveModel as BuildingActiveModel;
    use status_backend::repository::building_repository::BuildingRepository;
    use status_backend::with_transaction;

    let fx = Fixture::new().await;
    let pool = fx.pool();
    let copro_id = fx.copro_id;

    let result: Result<(), AppError> = with_transaction!(pool, "test.rollback", |txn| async move {
        let mut active = BuildingActiveModel::new();
        active.copro_id = Set(copro_id);
        active.name = Set("Bâtiment B".to_string());
        BuildingRepository::create(txn, active).await?;

        Err::<(), _>(AppError::Conflict("échec simulé".to_string()))
    });
    assert!(matches!(result, Err(AppError::Conflict(_))));

    let buildings = BuildingService::new(fx.pool())
        .list(fx.copro_id, false)
        .await
        .unwrap();
    assert_eq!(buildings.len(), 1);
    assert_eq!(buildings[0].name, "Bâtiment A");
}
