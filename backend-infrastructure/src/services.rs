pub mod credential_service;
pub mod health_service;

pub use credential_service::*;
pub use health_service::*;
