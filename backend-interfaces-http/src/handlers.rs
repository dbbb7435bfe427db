pub mod account_handlers;
pub mod case_handlers;
pub mod inventory_handlers;
pub mod opening_handlers;
pub mod ops_handlers;

pub use account_handlers::*;
pub use case_handlers::*;
pub use inventory_handlers::*;
pub use opening_handlers::*;
pub use ops_handlers::*;
