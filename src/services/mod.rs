pub mod clock;
pub mod reset_service;
pub mod validation;
