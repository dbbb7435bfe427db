pub mod catalog_files;
pub mod clickhouse_repo;
pub mod memory_ledger;

pub use catalog_files::*;
pub use clickhouse_repo::*;
pub use memory_ledger::*;
