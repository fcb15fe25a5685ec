use regex::Regex;
use std::sync::OnceLock;

/// Classification of a single source line containing only local facts.
///
/// This is phase 1 of block parsing: each line is classified independently
/// without reference to surrounding context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass {
    /// A `-- #name` header line opening a new named block. Carries the
    /// captured block name.
    Header { name: String },
    /// A non-blank, non-comment line belonging to the active block.
    Content,
    /// A blank line, or a comment line that is not a header. Skipped.
    Ignorable,
}

/// Comment marker that introduces both plain comments and headers.
pub const COMMENT_MARKER: &str = "--";

/// Header shape: optional leading whitespace, the comment marker, optional
/// whitespace, `#`, then the block name as one run of word characters.
///
/// Detection and name extraction both go through this single pattern, so a
/// line recognized as a header always yields a name.
const HEADER_PATTERN: &str = r"^\s*--\s*#(\w+)";

fn header_regex() -> &'static Regex {
    static HEADER_RE: OnceLock<Regex> = OnceLock::new();
    HEADER_RE.get_or_init(|| Regex::new(HEADER_PATTERN).expect("Invalid header regex"))
}

/// Extracts the block name from a header line, or `None` if the line is not
/// header-shaped.
pub fn header_name(line: &str) -> Option<&str> {
    header_regex()
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Whether the line opens a new named block.
pub fn is_header(line: &str) -> bool {
    header_name(line).is_some()
}

/// Whether the line carries block content: non-blank and not a comment.
pub fn is_content(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && !trimmed.starts_with(COMMENT_MARKER)
}

/// Classifies individual lines for the block parsing phase.
pub struct SqlLineClassifier;

impl SqlLineClassifier {
    /// Classifies a line into a [`LineClass`].
    ///
    /// Header detection wins over the content test: a header line's own text
    /// never counts as content.
    pub fn classify(&self, line: &str) -> LineClass {
        let line = line.trim_end_matches(['\r', '\n']);
        if let Some(name) = header_name(line) {
            return LineClass::Header {
                name: name.to_string(),
            };
        }
        if is_content(line) {
            return LineClass::Content;
        }
        LineClass::Ignorable
    }
}
