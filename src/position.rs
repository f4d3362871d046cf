//! Translation of character offsets into line and column numbers.

use std::fmt;

/// A 1-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineColumn {
    pub line: usize,
    pub column: usize,
}

impl LineColumn {
    pub fn new(line: usize, column: usize) -> Self {
        LineColumn { line, column }
    }
}

impl fmt::Display for LineColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Start offsets of every line of a script.
///
/// `\n`, `\r`, `\r\n` and `\n\r` each end a line. Offsets count characters,
/// the same unit token offsets use.
#[derive(Debug, Clone)]
pub struct LineIndex {
    starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut starts = vec![0];
        let mut pending: Option<char> = None;
        let mut len = 0;

        for (i, c) in text.chars().enumerate() {
            len = i + 1;
            match (c, pending) {
                ('\r' | '\n', Some(previous)) if previous != c => {
                    // second half of \r\n or \n\r
                    starts.push(i + 1);
                    pending = None;
                }
                ('\r' | '\n', Some(_)) => starts.push(i),
                ('\r' | '\n', None) => pending = Some(c),
                (_, Some(_)) => {
                    starts.push(i);
                    pending = None;
                }
                (_, None) => {}
            }
        }

        // a pair at the very end does not open a line
        if starts.last() == Some(&len) && len > 0 {
            starts.pop();
        }

        LineIndex { starts, len }
    }

    /// Line and column of the character at `offset`, or `None` when the
    /// offset lies past the end of the text.
    pub fn locate(&self, offset: usize) -> Option<LineColumn> {
        if offset >= self.len {
            return None;
        }
        let line = self.starts.partition_point(|start| *start <= offset);
        let start = self.starts[line - 1];
        Some(LineColumn::new(line, offset - start + 1))
    }
}
