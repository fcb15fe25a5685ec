use crate::models::{QueryRegistry, SqlFile};
use crate::parsing::ParseError;
use relative_path::{RelativePath, RelativePathBuf};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid queries directory: {0}")]
    InvalidQueriesDir(String),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Open a SQL file under the queries root and parse it into a [`QueryRegistry`]
pub fn load_registry(
    relative_path: &RelativePath,
    queries_root: &Path,
) -> Result<QueryRegistry, IoError> {
    let absolute_path = relative_path.to_path(queries_root);
    if !absolute_path.exists() {
        return Err(IoError::NotFound(absolute_path));
    }
    let file = fs::File::open(&absolute_path).map_err(IoError::Io)?;
    Ok(QueryRegistry::from_reader(file)?)
}

/// Discover the `.sql` files under the queries root.
///
/// Returns them as root-relative [`SqlFile`]s, sorted by path. Other file
/// types and files with non-UTF-8 names are skipped.
pub fn scan_sql_files(queries_root: &Path) -> Result<Vec<SqlFile>, IoError> {
    validate_queries_dir(queries_root)?;

    let mut found = Vec::new();
    let mut pending = vec![queries_root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|ext| ext == "sql")
                && let Ok(rel) = path.strip_prefix(queries_root)
                && let Ok(rel) = RelativePathBuf::from_path(rel)
            {
                found.push(SqlFile::new(rel));
            }
        }
    }

    found.sort_by(|a, b| a.relative_path().as_str().cmp(b.relative_path().as_str()));
    Ok(found)
}

pub fn validate_queries_dir(path: &Path) -> Result<(), IoError> {
    if !path.is_dir() {
        return Err(IoError::InvalidQueriesDir(format!(
            "{} is not a directory",
            path.display()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Builds a queries root holding the given relative-path/content pairs.
    fn queries_root(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().expect("Failed to create temp dir");
        for (name, content) in files {
            let path = dir.path().join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        dir
    }

    #[test]
    fn scan_returns_root_relative_sorted_sql_files() {
        let root = queries_root(&[
            ("users.sql", "-- #all\nSELECT * FROM users;"),
            ("reports/daily.sql", "-- #run\nSELECT 1;"),
            ("readme.md", "not sql"),
            ("schema.json", "{}"),
        ]);

        let files = scan_sql_files(root.path()).unwrap();

        let paths: Vec<&str> = files.iter().map(|f| f.relative_path().as_str()).collect();
        assert_eq!(paths, vec!["reports/daily.sql", "users.sql"]);
        assert_eq!(files[0].display_name(), "daily");
    }

    #[test]
    fn scan_rejects_missing_root() {
        let result = scan_sql_files(Path::new("/this/path/does/not/exist"));

        assert!(matches!(result, Err(IoError::InvalidQueriesDir(_))));
    }

    #[test]
    fn scan_result_feeds_load_registry() {
        let root = queries_root(&[(
            "users.sql",
            "-- #by_id\nSELECT * FROM users WHERE id = ?;\n-- #count\nSELECT count(*) FROM users;",
        )]);

        let files = scan_sql_files(root.path()).unwrap();
        let registry = load_registry(files[0].relative_path(), root.path()).unwrap();

        assert_eq!(registry.names(), vec!["by_id", "count"]);
        assert_eq!(
            registry.lookup("by_id"),
            Some("SELECT * FROM users WHERE id = ?;")
        );
    }

    #[test]
    fn load_registry_missing_file() {
        let root = queries_root(&[]);

        let result = load_registry(RelativePath::new("gone.sql"), root.path());

        assert!(matches!(result, Err(IoError::NotFound(_))));
    }

    #[test]
    fn validate_accepts_existing_directory() {
        let root = queries_root(&[]);
        assert!(validate_queries_dir(root.path()).is_ok());
    }

    #[test]
    fn validate_rejects_file_as_root() {
        let root = queries_root(&[("only.sql", "-- #q\nSELECT 1;")]);

        let result = validate_queries_dir(&root.path().join("only.sql"));

        assert!(matches!(result, Err(IoError::InvalidQueriesDir(_))));
    }
}
