// tests/common/test_data.rs

use super::db::TestDatabase;
use chrono::{DateTime, Utc};
use status_backend::auth::AuthenticatedUser;
use status_backend::db::DbPool;
use status_backend::dto::building_dto::CreateBuildingDto;
use status_backend::dto::copro_dto::CreateCoproDto;
use status_backend::dto::equipment_dto::CreateEquipmentDto;
use status_backend::dto::incident_dto::CreateIncidentDto;
use status_backend::dto::maintenance_dto::CreateMaintenanceDto;
use status_backend::dto::ticket_dto::SubmitTicketDto;
use status_backend::dto::user_dto::CreateUserDto;
use status_backend::service::building_service::BuildingService;
use status_backend::service::copro_service::CoproService;
use status_backend::service::equipment_service::EquipmentService;
use status_backend::service::user_service::UserService;
use uuid::Uuid;

/// コプロ 1 件、建物 1 件、管理者 1 名を用意したテスト環境
pub struct Fixture {
    pub db: TestDatabase,
    pub admin: AuthenticatedUser,
    pub resident: AuthenticatedUser,
    pub copro_id: Uuid,
    pub building_id: Uuid,
}

impl Fixture {
    pub async fn new() -> Self {
        let db = TestDatabase::new().await;
        let pool = db.pool();

        // 最初の管理者はまだ DB にいないため、仮の主体で作成する
        let bootstrap = AuthenticatedUser::admin(Uuid::new_v4());

        let copro = CoproService::new(pool.clone())
            .create(&bootstrap, create_copro_data("Résidence Les Tilleuls"))
            .await
            .expect("create copro");

        let admin = UserService::new(pool.clone())
            .create(
                &bootstrap,
                create_user_data("syndic@example.fr", true, Some(copro.id)),
            )
            .await
            .expect("create admin");

        let resident = UserService::new(pool.clone())
            .create(
                &bootstrap,
                create_user_data("resident@example.fr", false, Some(copro.id)),
            )
            .await
            .expect("create resident");

        let admin = AuthenticatedUser::admin(admin.id);
        let building = BuildingService::new(pool)
            .create(&admin, copro.id, create_building_data("Bâtiment A"))
            .await
            .expect("create building");

        Self {
            db,
            admin,
            resident: AuthenticatedUser::resident(resident.id),
            copro_id: copro.id,
            building_id: building.id,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.db.pool()
    }

    /// 建物 A に設備を追加して ID を返す
    pub async fn add_equipment(&self, name: &str) -> Uuid {
        EquipmentService::new(self.pool())
            .create(
                &self.admin,
                self.copro_id,
                create_equipment_data(self.building_id, name),
            )
            .await
            .expect("create equipment")
            .id
    }
}

pub fn create_copro_data(name: &str) -> CreateCoproDto {
    CreateCoproDto {
        name: name.to_string(),
        address: Some("12 rue des Lilas".to_string()),
        city: Some("Lyon".to_string()),
        postal_code: Some("69003".to_string()),
        country: None,
    }
}

pub fn create_user_data(email: &str, is_superuser: bool, copro_id: Option<Uuid>) -> CreateUserDto {
    CreateUserDto {
        email: email.to_string(),
        hashed_password: "$argon2id$v=19$placeholder".to_string(),
        is_superuser,
        first_name: Some("Claire".to_string()),
        last_name: Some("Durand".to_string()),
        lot_number: None,
        floor: None,
        copro_id,
        building_id: None,
    }
}

pub fn create_building_data(name: &str) -> CreateBuildingDto {
    CreateBuildingDto {
        name: name.to_string(),
        description: None,
        display_order: None,
    }
}

pub fn create_equipment_data(building_id: Uuid, name: &str) -> CreateEquipmentDto {
    CreateEquipmentDto {
        building_id,
        name: name.to_string(),
        identifier: None,
        description: None,
        location: None,
        status: None,
        display_order: None,
    }
}

pub fn create_incident_data(
    title: &str,
    equipment_ids: Vec<Uuid>,
    equipment_status: Option<&str>,
) -> CreateIncidentDto {
    CreateIncidentDto {
        title: title.to_string(),
        message: Some("Intervention en cours de planification".to_string()),
        service_instance_ids: equipment_ids,
        equipment_status: equipment_status.map(str::to_string),
        ..Default::default()
    }
}

pub fn create_maintenance_data(
    equipment_ids: Vec<Uuid>,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
) -> CreateMaintenanceDto {
    CreateMaintenanceDto {
        title: "Révision annuelle".to_string(),
        description: None,
        start_date,
        end_date,
        service_instance_ids: equipment_ids,
    }
}

pub fn create_ticket_data(equipment_id: Option<Uuid>) -> SubmitTicketDto {
    SubmitTicketDto {
        service_instance_id: equipment_id,
        reporter_name: "Jeanne Martin".to_string(),
        reporter_email: "Jeanne.Martin@Example.fr".to_string(),
        reporter_phone: Some("06 12 34 56 78".to_string()),
        title: "Ascenseur bloqué".to_string(),
        description: "L'ascenseur est bloqué au troisième étage".to_string(),
        location: Some("Hall A".to_string()),
        ticket_type: None,
        status: None,
    }
}
