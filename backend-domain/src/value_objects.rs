// Domain value objects
pub mod currency;
pub mod identifiers;
pub mod item_status;
pub mod money;

pub use currency::*;
pub use identifiers::*;
pub use item_status::*;
pub use money::*;
