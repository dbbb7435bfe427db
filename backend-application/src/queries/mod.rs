pub mod account_queries;
pub mod catalog_queries;
pub mod inventory_queries;
pub mod opening_queries;
pub mod session_queries;
