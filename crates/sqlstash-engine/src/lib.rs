pub mod io;
pub mod models;
pub mod parsing;

// Re-export key types for easier usage
pub use models::{registry::*, sql_file::*};
pub use parsing::ParseError;
