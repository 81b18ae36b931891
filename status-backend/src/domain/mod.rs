// src/domain/mod.rs
pub mod building_model;
pub mod copro_model;
pub mod incident_comment_model;
pub mod incident_model;
pub mod incident_service_instance_model;
pub mod incident_status;
pub mod incident_update_model;
pub mod maintenance_model;
pub mod maintenance_service_instance_model;
pub mod service_instance_model;
pub mod service_status;
pub mod ticket_comment_model;
pub mod ticket_model;
pub mod ticket_status;
pub mod user_model;
