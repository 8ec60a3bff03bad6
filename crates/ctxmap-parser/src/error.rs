//! Diagnostics for the context map parser.
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error or warning with an optional error code, labelled source
//! spans and help text. Every diagnostic a parse produces is wrapped in a
//! [`ParseError`].
//!
//! # Example
//!
//! ```
//! # use ctxmap_parser::error::{Diagnostic, ErrorCode};
//! # use ctxmap_parser::Span;
//! let diag = Diagnostic::error("unterminated type list")
//!     .with_code(ErrorCode::E102)
//!     .with_label(Span::new(14..22), "list opened here")
//!     .with_help("add closing `]`");
//!
//! assert_eq!(diag.to_string(), "error[E102]: unterminated type list");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
