//! Error codes for the context map diagnostic system.
//!
//! Codes are grouped by phase:
//! - `E0xx` - Lexer errors
//! - `E1xx` - Parser errors
//! - `E2xx` - Reference checks

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Lexer Errors (E0xx)
    // =========================================================================
    /// Unterminated block comment.
    ///
    /// A `/*` was found without a matching `*/`. Block comments do not nest.
    E001,

    /// Unexpected character.
    ///
    /// A character that starts no token, including partial arrows such as
    /// `<`, `-` or `<>`.
    E002,

    // =========================================================================
    // Parser Errors (E1xx)
    // =========================================================================
    /// Unexpected token.
    E100,

    /// Incomplete input.
    E101,

    /// Unterminated type list.
    ///
    /// A relationship endpoint opened a `[` type list that is never closed.
    E102,

    /// Unterminated context map block.
    ///
    /// The `{` after `ContextMap` has no matching `}`.
    E103,

    // =========================================================================
    // Reference Checks (E2xx)
    // =========================================================================
    /// Undeclared bounded context.
    ///
    /// A relationship references a context that no `contains` declares.
    E200,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E200 => "E200",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unterminated block comment",
            ErrorCode::E002 => "unexpected character",
            ErrorCode::E100 => "unexpected token",
            ErrorCode::E101 => "incomplete input",
            ErrorCode::E102 => "unterminated type list",
            ErrorCode::E103 => "unterminated context map block",
            ErrorCode::E200 => "undeclared bounded context",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E001.to_string(), "E001");
        assert_eq!(ErrorCode::E102.to_string(), "E102");
        assert_eq!(ErrorCode::E200.to_string(), "E200");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::E001.description(), "unterminated block comment");
        assert_eq!(ErrorCode::E103.description(), "unterminated context map block");
        assert_eq!(ErrorCode::E200.description(), "undeclared bounded context");
    }
}
