pub mod database;
pub mod error;
pub mod model;
pub mod table;

pub use database::Database;
