// src/service/mod.rs
pub mod availability_service;
pub mod building_service;
pub mod copro_service;
pub mod equipment_service;
pub mod incident_service;
pub mod maintenance_service;
pub mod status_service;
pub mod ticket_service;
pub mod user_service;
