//! Lexical analyzer for context map source text.
//!
//! The public entry point is [`tokenize`], which performs error-recovering
//! lexical analysis and collects all diagnostics in a single pass.

use winnow::{
    Parser as _,
    combinator::{alt, cut_err, not, peek, preceded, terminated},
    error::{ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{literal, one_of, take_until, take_while},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::Span,
    tokens::{PositionedToken, Token},
};

/// Diagnostic details attached to winnow errors via `.context()`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LexerDiagnostic {
    code: ErrorCode,
    message: &'static str,
    help: Option<&'static str>,
    /// The error span covers from `start` to the error position.
    start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<'a, O> = ModalResult<O, ContextError<LexerDiagnostic>>;

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Parse a block comment: `/* ... */`
///
/// The first `*/` closes the comment, so block comments do not nest. Once
/// `/*` is seen the comment must be closed before the end of input.
fn block_comment<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    let start_pos = input.current_token_start();

    literal("/*").parse_next(input)?;

    cut_err(terminated(take_until(0.., "*/"), "*/"))
        .context(LexerDiagnostic {
            code: ErrorCode::E001,
            message: "unterminated block comment",
            help: Some("add closing `*/`"),
            start: start_pos,
        })
        .map(Token::BlockComment)
        .parse_next(input)
}

/// Parse line comment starting with '//'
fn line_comment<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    preceded("//", take_while(0.., |c| c != '\n'))
        .map(Token::LineComment)
        .parse_next(input)
}

/// Parse keywords with word boundary checking
fn keyword<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    terminated(
        alt((literal("ContextMap"), literal("contains"))),
        peek(not(one_of(is_identifier_char))),
    )
    .map(|keyword: &str| match keyword {
        "ContextMap" => Token::ContextMap,
        _ => Token::Contains,
    })
    .parse_next(input)
}

/// Parse identifiers: `[A-Za-z_][A-Za-z0-9_]*`
fn identifier<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    take_while(1.., is_identifier_char)
        .verify(|s: &str| {
            s.chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        })
        .map(Token::Identifier)
        .parse_next(input)
}

/// Parse arrows, longest first so `<->` is never read as `<-` followed by `>`.
fn arrow<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    alt((
        literal("<->").value(Token::DoubleArrow),
        literal("->").value(Token::RightArrow),
        literal("<-").value(Token::LeftArrow),
    ))
    .parse_next(input)
}

fn punctuation<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    alt((
        '{'.value(Token::LeftBrace),
        '}'.value(Token::RightBrace),
        '['.value(Token::LeftBracket),
        ']'.value(Token::RightBracket),
        ','.value(Token::Comma),
    ))
    .parse_next(input)
}

/// Parse whitespace (spaces, tabs, carriage returns but not newlines)
fn whitespace<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    take_while(1.., |c: char| c.is_whitespace() && c != '\n')
        .value(Token::Whitespace)
        .parse_next(input)
}

fn newline<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    '\n'.value(Token::Newline).parse_next(input)
}

/// Parse a single token with position tracking
fn positioned_token<'a>(input: &mut Input<'a>) -> IResult<'a, PositionedToken<'a>> {
    let start_pos = input.current_token_start();

    let token = alt((
        block_comment, // Both comment forms start with '/'
        line_comment,
        arrow,
        keyword, // Must come before identifier
        identifier,
        punctuation,
        newline, // Must come before whitespace
        whitespace,
    ))
    .parse_next(input)?;

    let end_pos = input.current_token_start();
    let span = Span::new(start_pos..end_pos);

    Ok(PositionedToken::new(token, span))
}

/// Lexer that accumulates tokens and diagnostics during tokenization.
struct Lexer<'a> {
    tokens: Vec<PositionedToken<'a>>,
    diagnostics: DiagnosticCollector,
}

impl<'a> Lexer<'a> {
    fn new() -> Self {
        Self {
            tokens: Vec::new(),
            diagnostics: DiagnosticCollector::new(),
        }
    }

    /// Tokenize the input, collecting tokens and errors.
    fn tokenize(&mut self, mut input: Input<'a>) {
        while !input.is_empty() {
            match positioned_token(&mut input) {
                Ok(token) => {
                    self.tokens.push(token);
                }
                Err(e) => {
                    // An unterminated comment runs to the end of input; anything
                    // after it is comment text, not tokens.
                    if Self::is_unterminated_comment(&e) {
                        input.finish();
                    }

                    let error_pos = input.current_token_start();

                    let diagnostic = Self::convert_err_mode(e, error_pos);
                    self.diagnostics.emit(diagnostic);

                    if !input.is_empty() {
                        input.next_token();
                    }
                }
            }
        }
    }

    fn finish(self) -> Result<Vec<PositionedToken<'a>>, ParseError> {
        self.diagnostics.finish().map(|()| self.tokens)
    }

    fn is_unterminated_comment(err: &ErrMode<ContextError<LexerDiagnostic>>) -> bool {
        match err {
            ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => {
                ctx.context().any(|diag| diag.code == ErrorCode::E001)
            }
            ErrMode::Incomplete(_) => false,
        }
    }

    /// Convert an ErrMode and error position to a Diagnostic.
    ///
    /// Falls back to E002 (unexpected character) if no diagnostic context is
    /// attached to the error.
    fn convert_err_mode(
        err: ErrMode<ContextError<LexerDiagnostic>>,
        error_pos: usize,
    ) -> Diagnostic {
        let context_error = match err {
            ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
            ErrMode::Incomplete(_) => ContextError::new(),
        };

        if let Some(LexerDiagnostic {
            code,
            message,
            help,
            start,
        }) = context_error.context().next()
        {
            let span = Span::new(*start..error_pos);

            let mut diag = Diagnostic::error(*message)
                .with_code(*code)
                .with_label(span, code.description());
            if let Some(h) = help {
                diag = diag.with_help(*h);
            }
            return diag;
        }

        let span = Span::new(error_pos..error_pos.saturating_add(1));
        Diagnostic::error("unexpected character")
            .with_code(ErrorCode::E002)
            .with_label(span, ErrorCode::E002.description())
            .with_help("arrows are written `->`, `<-` or `<->`")
    }
}

/// Split source text into positioned tokens.
///
/// Lexing continues past errors so that every lexical problem in the input
/// is reported at once.
///
/// # Returns
///
/// - `Ok(tokens)` - All tokens successfully lexed, trivia included
/// - `Err(ParseError)` - One or more errors occurred; contains all diagnostics
pub fn tokenize(input: &str) -> Result<Vec<PositionedToken<'_>>, ParseError> {
    let located_input = LocatingSlice::new(input);
    let mut lexer = Lexer::new();
    lexer.tokenize(located_input);
    lexer.finish()
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    /// Identifiers that are not keywords.
    fn valid_identifier_strategy() -> impl Strategy<Value = String> {
        "[A-Za-z_][A-Za-z0-9_]{0,24}"
            .prop_filter("avoid keywords", |s| !matches!(s.as_str(), "ContextMap" | "contains"))
    }

    fn trivia_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(" ".to_string()),
            Just("\n".to_string()),
            Just("\t".to_string()),
            "[a-z ]{0,10}".prop_map(|body| format!("/*{body}*/")),
        ]
    }

    /// Valid identifiers always lex as a single identifier token.
    fn check_valid_identifiers_tokenize(id: &str) -> Result<(), TestCaseError> {
        let tokens = tokenize(id);
        prop_assert!(tokens.is_ok(), "failed to tokenize `{id}`: {:?}", tokens.err());

        let tokens = tokens.unwrap_or_default();
        prop_assert_eq!(tokens.len(), 1);
        prop_assert_eq!(&tokens[0].token, &Token::Identifier(id));
        Ok(())
    }

    /// Trivia between the tokens of a relationship never changes the meaningful tokens.
    fn check_trivia_is_transparent(
        source: &str,
        target: &str,
        trivia: &str,
    ) -> Result<(), TestCaseError> {
        let input = format!("{source}{trivia}->{trivia}{target}");
        let tokens = tokenize(&input);
        prop_assert!(tokens.is_ok(), "failed to tokenize `{input}`");

        let meaningful: Vec<_> = tokens
            .unwrap_or_default()
            .into_iter()
            .map(|t| t.token)
            .filter(|t| !t.is_trivia())
            .collect();
        prop_assert_eq!(
            meaningful,
            vec![
                Token::Identifier(source),
                Token::RightArrow,
                Token::Identifier(target)
            ]
        );
        Ok(())
    }

    proptest! {
        #[test]
        fn valid_identifiers_tokenize(id in valid_identifier_strategy()) {
            check_valid_identifiers_tokenize(&id)?;
        }

        #[test]
        fn trivia_is_transparent(
            source in valid_identifier_strategy(),
            target in valid_identifier_strategy(),
            trivia in trivia_strategy(),
        ) {
            check_trivia_is_transparent(&source, &target, &trivia)?;
        }
    }
}
