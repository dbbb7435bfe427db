pub mod account_commands;
pub mod catalog_commands;
pub mod inventory_commands;
pub mod opening_commands;
