// tests/integration/mod.rs

pub mod copro_tests;
pub mod equipment_tests;
pub mod incident_tests;
pub mod maintenance_tests;
pub mod statistics_tests;
pub mod status_page_tests;
pub mod ticket_tests;
