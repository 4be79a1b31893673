pub mod appointment_service;
pub mod catalog_service;
pub mod dashboard_service;
pub mod inventory_service;
pub mod session_service;
