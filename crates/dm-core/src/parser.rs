//! Migration script parser
//!
//! A script is a sequence of version blocks:
//!
//! ```text
//! #v1.2
//! #[UP]
//! CREATE TABLE foo (
//!     id INTEGER NOT NULL
//! );
//! #[DOWN]
//! DROP TABLE foo;
//! ```
//!
//! - `#v<version>` opens a block and resets the direction to `Up`
//! - `#[UP]` / `#[DOWN]` switch the direction inside a block
//! - `--` starts a line comment
//! - a line holding `/*` starts a block comment that ends on the line holding `*/`;
//!   both lines are dropped entirely
//! - a statement may span lines and ends with `;`
//!
//! Only malformed version tags are errors. Text before the first version tag
//! and unterminated fragments at the end of a block are dropped.

use crate::error::{CoreError, CoreResult};
use crate::statement::{Direction, Statement};
use crate::version::Version;

/// Prefix of a version tag line.
pub const VERSION_PREFIX: &str = "#v";

/// Marker switching to the `Up` direction.
pub const UP_MARKER: &str = "#[UP]";

/// Marker switching to the `Down` direction.
pub const DOWN_MARKER: &str = "#[DOWN]";

const LINE_COMMENT: &str = "--";
const BLOCK_COMMENT_OPEN: &str = "/*";
const BLOCK_COMMENT_CLOSE: &str = "*/";
const STATEMENT_TERMINATOR: char = ';';

/// Parse a whole script.
pub fn parse_script(script: &str) -> CoreResult<Vec<Statement>> {
    parse_lines(script.lines())
}

/// Parse a script given as lines, in order.
pub fn parse_lines<I, S>(lines: I) -> CoreResult<Vec<Statement>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parser = ScriptParser::new();
    for line in lines {
        parser.feed(line.as_ref())?;
    }
    Ok(parser.finish())
}

/// Line-at-a-time script parser.
#[derive(Debug, Default)]
pub struct ScriptParser {
    version: Option<Version>,
    direction: Direction,
    buffer: Vec<String>,
    in_block_comment: bool,
    line_number: usize,
    statements: Vec<Statement>,
}

impl ScriptParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the next line of the script.
    pub fn feed(&mut self, raw: &str) -> CoreResult<()> {
        self.line_number += 1;
        let line = raw.trim();

        if self.in_block_comment {
            if line.contains(BLOCK_COMMENT_CLOSE) {
                self.in_block_comment = false;
            }
            return Ok(());
        }

        if line == UP_MARKER {
            self.direction = Direction::Up;
            return Ok(());
        }

        if line == DOWN_MARKER {
            self.direction = Direction::Down;
            return Ok(());
        }

        if line.starts_with(VERSION_PREFIX) {
            return self.open_version_block(line);
        }

        self.push_content(line);
        Ok(())
    }

    /// Finish parsing and return the statements in source order.
    pub fn finish(self) -> Vec<Statement> {
        if !self.buffer.is_empty() {
            log::debug!(
                "Dropping unterminated statement at end of script: {}",
                self.buffer.join(" ")
            );
        }
        self.statements
    }

    fn open_version_block(&mut self, line: &str) -> CoreResult<()> {
        let fragments: Vec<&str> = line.split(VERSION_PREFIX).collect();
        let tag = match fragments.as_slice() {
            ["", tag] if !tag.is_empty() => *tag,
            _ => return Err(self.bad_versioning(line)),
        };

        let version = Version::parse(tag).ok_or_else(|| self.bad_versioning(line))?;

        if !self.buffer.is_empty() {
            log::debug!(
                "Dropping unterminated statement before v{}: {}",
                version,
                self.buffer.join(" ")
            );
            self.buffer.clear();
        }

        self.version = Some(version);
        self.direction = Direction::Up;
        Ok(())
    }

    fn push_content(&mut self, line: &str) {
        let content = match line.find(LINE_COMMENT) {
            Some(idx) => &line[..idx],
            None => line,
        };

        if let Some(open) = content.find(BLOCK_COMMENT_OPEN) {
            // The opener line is dropped either way; a closer on the same line
            // means the comment is already over.
            let rest = &line[open + BLOCK_COMMENT_OPEN.len()..];
            self.in_block_comment = !rest.contains(BLOCK_COMMENT_CLOSE);
            return;
        }

        let content = content.trim();
        if content.is_empty() {
            return;
        }

        self.buffer.push(content.to_string());

        if content.ends_with(STATEMENT_TERMINATOR) {
            self.flush_statement();
        }
    }

    fn flush_statement(&mut self) {
        match self.version {
            Some(version) => {
                let sql = self.buffer.join(" ");
                self.statements.push(Statement::new(sql, version, self.direction));
            }
            None => {
                log::debug!(
                    "Ignoring statement before the first version tag: {}",
                    self.buffer.join(" ")
                );
            }
        }
        self.buffer.clear();
    }

    fn bad_versioning(&self, line: &str) -> CoreError {
        CoreError::BadVersioning {
            line_number: self.line_number,
            line: line.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod tests;
