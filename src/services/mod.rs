pub mod feedback_service;
pub mod health_service;
pub mod mail;
pub mod rate_limit_service;
