use std::collections::HashMap;
use std::io::Read;

use tracing::{debug, info};

use crate::parsing::{self, NamedBlock, ParseError};

/// Immutable name→SQL mapping produced by parsing an annotated source.
///
/// Built in one pass during construction and read-only afterwards. Duplicate
/// block names resolve to the later occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRegistry {
    queries: HashMap<String, String>,
}

impl QueryRegistry {
    /// Parses an in-memory source. Cannot fail; malformed input degrades to a
    /// smaller (possibly empty) registry.
    pub fn parse(text: &str) -> Self {
        Self::from_blocks(parsing::parse_blocks(text))
    }

    /// Parses a line-oriented byte stream, consuming it to the end.
    ///
    /// Fails only if the underlying source cannot be read; no partial
    /// registry is ever returned.
    pub fn from_reader<R: Read>(source: R) -> Result<Self, ParseError> {
        Ok(Self::from_blocks(parsing::parse_blocks_from_reader(
            source,
        )?))
    }

    fn from_blocks(blocks: Vec<NamedBlock>) -> Self {
        let mut queries = HashMap::new();
        for block in blocks {
            // Later blocks with the same name win.
            debug!(name = %block.name, "registering query");
            queries.insert(block.name, block.sql);
        }

        let registry = Self { queries };
        let names = registry.names();
        info!(count = names.len(), ?names, "query registry initialized");
        registry
    }

    /// Every registered block name, in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.queries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// The SQL registered under `name`, exact case-sensitive match.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.queries.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lookup_returns_registered_sql() {
        let registry = QueryRegistry::parse("-- #one\nSELECT 1;");
        assert_eq!(registry.lookup("one"), Some("SELECT 1;"));
    }

    #[test]
    fn lookup_is_exact_and_case_sensitive() {
        let registry = QueryRegistry::parse("-- #one\nSELECT 1;");
        assert_eq!(registry.lookup("One"), None);
        assert_eq!(registry.lookup(" one"), None);
        assert_eq!(registry.lookup("missing"), None);
    }

    #[test]
    fn names_are_sorted() {
        let registry = QueryRegistry::parse("-- #zeta\nSELECT 1;\n-- #alpha\nSELECT 2;");
        assert_eq!(registry.names(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn duplicate_name_keeps_later_block() {
        let registry =
            QueryRegistry::parse("-- #q\nSELECT 'old';\n-- #q\nSELECT 'new';");
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("q"), Some("SELECT 'new';"));
    }

    #[test]
    fn empty_source_gives_empty_registry() {
        let registry = QueryRegistry::parse("");
        assert!(registry.is_empty());
        assert!(registry.names().is_empty());
    }

    #[test]
    fn construction_emits_one_summary_event() {
        use std::sync::{Arc, Mutex};

        #[derive(Clone, Default)]
        struct Capture(Arc<Mutex<Vec<u8>>>);

        impl std::io::Write for Capture {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for Capture {
            type Writer = Capture;

            fn make_writer(&'a self) -> Self::Writer {
                self.clone()
            }
        }

        let capture = Capture::default();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(capture.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            QueryRegistry::parse("-- #a\nSELECT 1;\n-- #b\nSELECT 2;");
        });

        let output = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
        assert_eq!(output.matches("query registry initialized").count(), 1);
        assert!(output.contains("count=2"));
        assert!(output.contains(r#"names=["a", "b"]"#));
    }
}
