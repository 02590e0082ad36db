pub mod catalog;
pub mod db;

pub use catalog::{ArgSpec, ToolSpec, ToolsCatalog};
pub use db::{ActionScript, Case, CaseDb, DatasetError};
