// Ports: what the domain needs from the ledger, catalog store, audit log and hashing

pub mod repositories;
pub mod services;

pub use repositories::*;
pub use services::*;
