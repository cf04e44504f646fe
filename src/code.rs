//! Line-oriented Java code blocks.
//!
//! A [`CodeBlock`] is a list of lines with nesting depths; rendering applies
//! 4-space indents. The builder tracks the current depth, so nested blocks
//! splice in at the right level.

use std::fmt;

const INDENT: &str = "    ";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeBlock {
    lines: Vec<(usize, String)>,
}

impl CodeBlock {
    pub fn builder() -> CodeBlockBuilder {
        CodeBlockBuilder::default()
    }

    /// A single `statement;` line.
    pub fn statement(text: impl Into<String>) -> CodeBlock {
        CodeBlock { lines: vec![(0, format!("{};", text.into()))] }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for CodeBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (depth, text) in &self.lines {
            for _ in 0..*depth {
                f.write_str(INDENT)?;
            }
            writeln!(f, "{text}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct CodeBlockBuilder {
    lines: Vec<(usize, String)>,
    depth: usize,
}

impl CodeBlockBuilder {
    /// Opens a brace-delimited flow, e.g. `if (..) {`, and indents.
    pub fn begin_control_flow(mut self, header: impl Into<String>) -> Self {
        self.lines.push((self.depth, format!("{} {{", header.into())));
        self.depth += 1;
        self
    }

    pub fn end_control_flow(mut self) -> Self {
        debug_assert!(self.depth > 0, "unbalanced control flow");
        self.depth -= 1;
        self.lines.push((self.depth, "}".to_owned()));
        self
    }

    pub fn add_statement(mut self, statement: impl Into<String>) -> Self {
        self.lines.push((self.depth, format!("{};", statement.into())));
        self
    }

    pub fn add_comment(mut self, comment: impl Into<String>) -> Self {
        self.lines.push((self.depth, format!("// {}", comment.into())));
        self
    }

    /// Splices a nested block at the current depth.
    pub fn add(mut self, block: CodeBlock) -> Self {
        for (depth, text) in block.lines {
            self.lines.push((self.depth + depth, text));
        }
        self
    }

    pub fn build(self) -> CodeBlock {
        debug_assert_eq!(self.depth, 0, "unbalanced control flow");
        CodeBlock { lines: self.lines }
    }
}
