use super::classify::LineClass;

/// A finalized named block: header name plus the content lines joined with
/// `\n` (no trailing newline).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedBlock {
    pub name: String,
    pub sql: String,
}

#[derive(Debug, Clone)]
enum BlockState {
    NoActiveBlock,
    Accumulating { name: String, lines: Vec<String> },
}

/// State machine for block construction.
///
/// Feeds on classified lines and emits a [`NamedBlock`] whenever a header
/// closes the block before it, plus a final flush at end of input. Blocks
/// with a blank name or no content lines are dropped rather than emitted.
pub struct BlockBuilder {
    state: BlockState,
    out: Vec<NamedBlock>,
}

impl BlockBuilder {
    pub fn new() -> Self {
        Self {
            state: BlockState::NoActiveBlock,
            out: vec![],
        }
    }

    pub fn push(&mut self, class: &LineClass, line: &str) {
        match class {
            LineClass::Header { name } => {
                self.flush_block();
                self.state = BlockState::Accumulating {
                    name: name.clone(),
                    lines: vec![],
                };
            }
            LineClass::Content => {
                // Content before the first header has no block to attach to.
                if let BlockState::Accumulating { lines, .. } = &mut self.state {
                    lines.push(line.trim_end_matches(['\r', '\n']).to_string());
                }
            }
            LineClass::Ignorable => {}
        }
    }

    pub fn finish(mut self) -> Vec<NamedBlock> {
        // EOF flush
        self.flush_block();
        self.out
    }

    fn flush_block(&mut self) {
        let prev = std::mem::replace(&mut self.state, BlockState::NoActiveBlock);
        if let BlockState::Accumulating { name, lines } = prev
            && !name.trim().is_empty()
            && !lines.is_empty()
        {
            self.out.push(NamedBlock {
                name,
                sql: lines.join("\n"),
            });
        }
    }
}

impl Default for BlockBuilder {
    fn default() -> Self {
        Self::new()
    }
}
