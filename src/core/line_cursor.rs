// src/core/line_cursor.rs

//! A pull-based line reader with one line of lookahead.
//!
//! Both passes over the task file need to stop an action block at the first
//! line that is *not* an action, without consuming it. `LineCursor` keeps that
//! line buffered so the next declaration can be read from it.

use std::io::{self, BufRead, Lines};

/// Whether a line belongs to an action block (starts with a space or a tab).
pub fn is_action_line(line: &str) -> bool {
    line.starts_with([' ', '\t'])
}

/// Lines that only contain whitespace are treated as blank.
pub fn is_blank_line(line: &str) -> bool {
    line.trim().is_empty()
}

/// Line reader over a task file that can peek one line ahead.
#[derive(Debug)]
pub struct LineCursor<R> {
    lines: Lines<R>,
    peeked: Option<String>,
    line_number: usize,
}

impl<R: BufRead> LineCursor<R> {
    /// Wraps `reader`, positioned before its first line.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            peeked: None,
            line_number: 0,
        }
    }

    /// 1-based number of the last line returned by [`next_line`](Self::next_line).
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Consumes and returns the next line.
    pub fn next_line(&mut self) -> io::Result<Option<String>> {
        let line = match self.peeked.take() {
            Some(line) => Some(line),
            None => self.lines.next().transpose()?,
        };
        if line.is_some() {
            self.line_number += 1;
        }
        Ok(line)
    }

    /// Returns the next line without consuming it.
    pub fn peek_line(&mut self) -> io::Result<Option<&str>> {
        if self.peeked.is_none() {
            self.peeked = self.lines.next().transpose()?;
        }
        Ok(self.peeked.as_deref())
    }

    /// Skips blank lines and returns the next non-blank line, if any.
    pub fn next_non_blank(&mut self) -> io::Result<Option<String>> {
        while let Some(line) = self.next_line()? {
            if !is_blank_line(&line) {
                return Ok(Some(line));
            }
        }
        Ok(None)
    }

    /// Consumes the action block that follows a declaration.
    ///
    /// Blank lines inside the block are skipped. The block ends before the first
    /// non-blank line that does not start with whitespace; that line stays in the
    /// cursor. With `keep == false` the lines are discarded and an empty vector
    /// is returned; otherwise each action is returned without its leading whitespace.
    pub fn take_action_block(&mut self, keep: bool) -> io::Result<Vec<String>> {
        let mut actions = Vec::new();
        loop {
            match self.peek_line()? {
                Some(line) if is_blank_line(line) || is_action_line(line) => {}
                _ => return Ok(actions),
            }
            let Some(line) = self.next_line()? else {
                return Ok(actions);
            };
            if keep && !is_blank_line(&line) {
                actions.push(line.trim_start_matches([' ', '\t']).to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn cursor(text: &str) -> LineCursor<Cursor<Vec<u8>>> {
        LineCursor::new(Cursor::new(text.as_bytes().to_vec()))
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut c = cursor("a:\nb:\n");
        assert_eq!(c.peek_line().unwrap(), Some("a:"));
        assert_eq!(c.peek_line().unwrap(), Some("a:"));
        assert_eq!(c.line_number(), 0);
        assert_eq!(c.next_line().unwrap().as_deref(), Some("a:"));
        assert_eq!(c.line_number(), 1);
        assert_eq!(c.next_line().unwrap().as_deref(), Some("b:"));
        assert_eq!(c.next_line().unwrap(), None);
        assert_eq!(c.line_number(), 2);
    }

    #[test]
    fn test_action_block_stops_at_next_declaration() {
        let mut c = cursor("a:\n  echo 1\n\n\techo 2\nb:\n  echo 3\n");
        c.next_line().unwrap();
        let actions = c.take_action_block(true).unwrap();
        assert_eq!(actions, vec!["echo 1", "echo 2"]);
        assert_eq!(c.next_line().unwrap().as_deref(), Some("b:"));
        assert_eq!(c.line_number(), 5);
    }

    #[test]
    fn test_skipped_block_returns_nothing_but_consumes_lines() {
        let mut c = cursor("a:\n  echo 1\n  echo 2\nb:\n");
        c.next_line().unwrap();
        assert!(c.take_action_block(false).unwrap().is_empty());
        assert_eq!(c.next_line().unwrap().as_deref(), Some("b:"));
    }

    #[test]
    fn test_whitespace_only_lines_are_blank() {
        let mut c = cursor("a:\n   \n  echo 1\n \t \n");
        c.next_line().unwrap();
        assert_eq!(c.take_action_block(true).unwrap(), vec!["echo 1"]);
        assert_eq!(c.next_line().unwrap(), None);
    }

    #[test]
    fn test_next_non_blank_skips_leading_blank_lines() {
        let mut c = cursor("\n\nsetup:\n");
        assert_eq!(c.next_non_blank().unwrap().as_deref(), Some("setup:"));
        assert_eq!(c.line_number(), 3);
    }

    #[test]
    fn test_crlf_line_endings() {
        let mut c = cursor("a:\r\n  echo 1\r\n");
        assert_eq!(c.next_line().unwrap().as_deref(), Some("a:"));
        assert_eq!(c.take_action_block(true).unwrap(), vec!["echo 1"]);
    }
}
