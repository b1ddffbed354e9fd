//! # Task Declaration Parser
//!
//! Turns a single `<name>: <dep> <dep> ...` line into a [`TaskDeclaration`].
//! The grammar is deliberately strict: names are runs of letters and digits,
//! dependencies are separated by spaces only, and there is no quoting or escaping.

use crate::models::TaskDeclaration;
use thiserror::Error;

/// A grammar error in a declaration line.
///
/// `line_number` is 1-based and is `0` until the caller attaches it with
/// [`ParseError::at_line`]. `position` is the 0-based character index in the line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error(
        "Parse error in line {line_number} \"{line}\" at pos {position}: unexpected '{found}'. Only letters and digits are allowed in task names."
    )]
    /// A character that is neither a letter, a digit nor an allowed separator.
    InvalidCharacter {
        /// The offending line.
        line: String,
        /// 1-based line number.
        line_number: usize,
        /// 0-based character index in the line.
        position: usize,
        /// The offending character.
        found: char,
    },
    #[error("Parse error in line {line_number} \"{line}\": no ':' separator after the task name.")]
    /// The line ends before the `:` after the task name.
    MissingSeparator {
        /// The offending line.
        line: String,
        /// 1-based line number.
        line_number: usize,
    },
}

impl ParseError {
    /// Attaches the 1-based line number the error was found on.
    pub fn at_line(mut self, number: usize) -> Self {
        match &mut self {
            Self::InvalidCharacter { line_number, .. } | Self::MissingSeparator { line_number, .. } => {
                *line_number = number;
            }
        }
        self
    }

}

/// Parses one declaration line.
pub fn parse_declaration(line: &str) -> Result<TaskDeclaration, ParseError> {
    let mut chars = line.chars().enumerate().peekable();

    // --- Target name ---
    let mut name = String::new();
    loop {
        match chars.next() {
            Some((_, c)) if c.is_alphanumeric() => name.push(c),
            Some((_, ':')) => break,
            Some((position, found)) => return Err(invalid(line, position, found)),
            None => {
                return Err(ParseError::MissingSeparator {
                    line: line.to_string(),
                    line_number: 0,
                });
            }
        }
    }

    // --- Dependency list ---
    let mut dependency_names = Vec::new();
    loop {
        while chars.next_if(|&(_, c)| c == ' ').is_some() {}

        let mut token = String::new();
        loop {
            match chars.next() {
                Some((_, c)) if c.is_alphanumeric() => token.push(c),
                // A single space closes a non-empty token; leading spaces were skipped above.
                Some((_, ' ')) if !token.is_empty() => break,
                Some((position, found)) => return Err(invalid(line, position, found)),
                None => break,
            }
        }

        if token.is_empty() {
            break;
        }
        dependency_names.push(token);
    }

    Ok(TaskDeclaration {
        name,
        dependency_names,
    })
}

fn invalid(line: &str, position: usize, found: char) -> ParseError {
    ParseError::InvalidCharacter {
        line: line.to_string(),
        line_number: 0,
        position,
        found,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deps(line: &str) -> Vec<String> {
        parse_declaration(line).unwrap().dependency_names
    }

    #[test]
    fn test_parses_target_and_ordered_dependencies() {
        let decl = parse_declaration("build: compile test").unwrap();
        assert_eq!(decl.name, "build");
        assert_eq!(decl.dependency_names, vec!["compile", "test"]);
    }

    #[test]
    fn test_declaration_without_dependencies() {
        let decl = parse_declaration("setup: ").unwrap();
        assert_eq!(decl.name, "setup");
        assert!(decl.dependency_names.is_empty());

        assert!(deps("setup:").is_empty());
    }

    #[test]
    fn test_repeated_and_trailing_spaces_are_skipped() {
        assert_eq!(deps("all:a   b  c   "), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_invalid_character_in_name_reports_position() {
        let err = parse_declaration("bad*name: x").unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidCharacter { found: '*', position: 3, .. }
        ));
        assert!(err.to_string().contains("at pos 3"));
    }

    #[test]
    fn test_space_before_colon_is_invalid() {
        let err = parse_declaration("build : x").unwrap_err();
        assert!(matches!(err, ParseError::InvalidCharacter { position: 5, .. }));
    }

    #[test]
    fn test_missing_separator() {
        let err = parse_declaration("build").unwrap_err();
        assert!(matches!(err, ParseError::MissingSeparator { .. }));

        let err = parse_declaration("").unwrap_err();
        assert!(matches!(err, ParseError::MissingSeparator { .. }));
    }

    #[test]
    fn test_invalid_character_in_dependency() {
        let err = parse_declaration("build: lib-a").unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidCharacter { position: 10, found: '-', .. }
        ));
    }

    #[test]
    fn test_tab_is_not_a_dependency_separator() {
        let err = parse_declaration("build: a\tb").unwrap_err();
        assert!(matches!(err, ParseError::InvalidCharacter { found: '\t', .. }));
    }

    #[test]
    fn test_unicode_letters_and_digits_are_names() {
        let decl = parse_declaration("paso1: compilación 2x").unwrap();
        assert_eq!(decl.name, "paso1");
        assert_eq!(decl.dependency_names, vec!["compilación", "2x"]);
    }

    #[test]
    fn test_line_number_is_attached() {
        let err = parse_declaration("a b: c").unwrap_err().at_line(7);
        assert!(err.to_string().contains("line 7"));
    }
}
