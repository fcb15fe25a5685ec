use relative_path::{RelativePath, RelativePathBuf};

/// Represents a SQL file with a relative path and display-friendly name
#[derive(Debug, Clone, PartialEq)]
pub struct SqlFile {
    relative_path: RelativePathBuf,
    display_name: String,
}

impl SqlFile {
    /// Create a new SqlFile from a path relative to the queries root
    pub fn new(relative_path: RelativePathBuf) -> Self {
        let display_name = Self::extract_display_name(&relative_path);
        Self {
            relative_path,
            display_name,
        }
    }

    /// Create from a relative path string
    pub fn from_relative_str(path: &str) -> Self {
        Self::new(RelativePathBuf::from(path))
    }

    /// Get the relative path
    pub fn relative_path(&self) -> &RelativePath {
        &self.relative_path
    }

    /// Get the display name (without .sql extension)
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Extract display name from a relative path (strips .sql extension)
    fn extract_display_name(path: &RelativePath) -> String {
        path.file_name()
            .map(|name| name.strip_suffix(".sql").unwrap_or(name))
            .unwrap_or("Untitled")
            .to_string()
    }
}

impl From<RelativePathBuf> for SqlFile {
    fn from(path: RelativePathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&str> for SqlFile {
    fn from(path: &str) -> Self {
        Self::from_relative_str(path)
    }
}
