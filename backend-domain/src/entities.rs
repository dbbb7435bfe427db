// Domain entities
pub mod account;
pub mod case;
pub mod catalog;
pub mod inventory;
pub mod model;
pub mod opening;
pub mod session;

pub use account::*;
pub use case::*;
pub use catalog::*;
pub use inventory::*;
pub use model::*;
pub use opening::*;
pub use session::*;
