pub mod registry;
pub mod sql_file;

pub use registry::QueryRegistry;
pub use sql_file::SqlFile;
