//! Parser for context map tokens.
//!
//! Transforms the token stream from the [`lexer`](super::lexer) into the
//! syntax tree defined in [`parser_types`](super::parser_types). The public
//! entry point is [`build_document`].

use winnow::{
    Parser as _,
    combinator::{alt, opt, preceded, repeat},
    error::{ContextError, ErrMode},
    stream::{Stream, TokenSlice},
    token::any,
};

use ctxmap_core::graph::ArrowDirection;

use crate::{
    error::{Diagnostic, ErrorCode},
    parser_types as types,
    span::{Span, Spanned},
    tokens::{PositionedToken, Token},
};

/// Context type for parser errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Context {
    /// Description of what is currently being parsed
    Label(&'static str),
    /// Remaining token count (`eof_offset()`) at error start position
    StartOffset(usize),
    /// A delimiter opened at the given span was never closed
    Unclosed(Delimiter, Span),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Delimiter {
    /// `{ ... }` of a context map
    Block,
    /// `[ ... ]` of a relationship type list
    TypeList,
}

type Input<'src> = TokenSlice<'src, PositionedToken<'src>>;
type IResult<O> = Result<O, ErrMode<ContextError<Context>>>;

/// Run `f`, turning any failure into a cut error that remembers where the
/// committed construct started.
fn cut_err<'src, O, F>(input: &mut Input<'src>, f: F) -> IResult<O>
where
    F: FnOnce(&mut Input<'src>) -> IResult<O>,
{
    let start_remaining = input.eof_offset();

    match f(input) {
        Ok(o) => Ok(o),
        Err(ErrMode::Backtrack(mut e)) | Err(ErrMode::Cut(mut e)) => {
            e.push(Context::StartOffset(start_remaining));
            Err(ErrMode::Cut(e))
        }
        Err(e) => Err(e),
    }
}

/// Cut error at the current position carrying a label
fn cut_error_with_label(input: &Input<'_>, label: &'static str) -> ErrMode<ContextError<Context>> {
    let mut e = ContextError::new();
    e.push(Context::Label(label));
    e.push(Context::StartOffset(input.eof_offset()));
    ErrMode::Cut(e)
}

fn unclosed_error(delimiter: Delimiter, open: Span) -> ErrMode<ContextError<Context>> {
    let mut e = ContextError::new();
    e.push(Context::Unclosed(delimiter, open));
    ErrMode::Cut(e)
}

/// Parse whitespace, newlines and comments
fn ws_comment<'src>(input: &mut Input<'src>) -> IResult<()> {
    any.verify(|token: &PositionedToken<'_>| token.is_trivia())
        .void()
        .parse_next(input)
}

/// Parse zero or more whitespace/comments
fn ws_comments0<'src>(input: &mut Input<'src>) -> IResult<()> {
    repeat(0.., ws_comment).parse_next(input)
}

/// Parse one token matching `predicate` and return its span
fn token_span<'src>(input: &mut Input<'src>, predicate: fn(&Token<'_>) -> bool) -> IResult<Span> {
    any.verify(|token: &PositionedToken<'_>| predicate(&token.token))
        .map(|token: &PositionedToken<'_>| token.span)
        .parse_next(input)
}

fn left_brace<'src>(input: &mut Input<'src>) -> IResult<Span> {
    token_span(input, |token| matches!(token, Token::LeftBrace))
}

fn right_brace<'src>(input: &mut Input<'src>) -> IResult<Span> {
    token_span(input, |token| matches!(token, Token::RightBrace))
}

fn left_bracket<'src>(input: &mut Input<'src>) -> IResult<Span> {
    token_span(input, |token| matches!(token, Token::LeftBracket))
}

fn right_bracket<'src>(input: &mut Input<'src>) -> IResult<Span> {
    token_span(input, |token| matches!(token, Token::RightBracket))
}

fn comma<'src>(input: &mut Input<'src>) -> IResult<Span> {
    token_span(input, |token| matches!(token, Token::Comma))
}

/// `,` surrounded by optional trivia
fn list_separator<'src>(input: &mut Input<'src>) -> IResult<()> {
    (ws_comments0, comma, ws_comments0).void().parse_next(input)
}

/// Parse a raw identifier with span preservation
fn raw_identifier<'src>(input: &mut Input<'src>) -> IResult<Spanned<&'src str>> {
    any.verify_map(|token: &'src PositionedToken<'src>| match &token.token {
        Token::Identifier(name) => Some(Spanned::new(*name, token.span)),
        _ => None,
    })
    .parse_next(input)
}

fn context_name<'src>(input: &mut Input<'src>) -> IResult<Spanned<&'src str>> {
    raw_identifier
        .context(Context::Label("bounded context name"))
        .parse_next(input)
}

fn relationship_type<'src>(input: &mut Input<'src>) -> IResult<Spanned<&'src str>> {
    raw_identifier
        .context(Context::Label("relationship type"))
        .parse_next(input)
}

fn arrow<'src>(input: &mut Input<'src>) -> IResult<Spanned<ArrowDirection>> {
    any.verify_map(|token: &PositionedToken<'_>| {
        let arrow = match token.token {
            Token::LeftArrow => ArrowDirection::Left,
            Token::RightArrow => ArrowDirection::Right,
            Token::DoubleArrow => ArrowDirection::Bidirectional,
            _ => return None,
        };
        Some(Spanned::new(arrow, token.span))
    })
    .context(Context::Label("arrow"))
    .parse_next(input)
}

/// Parse a type list: `[U, OHS, PL]`
///
/// Once `[` is seen the list must hold at least one type and be closed.
fn type_list<'src>(input: &mut Input<'src>) -> IResult<Vec<Spanned<&'src str>>> {
    let open = left_bracket.parse_next(input)?;

    cut_err(input, |input| {
        ws_comments0.parse_next(input)?;
        let first = relationship_type.parse_next(input)?;

        let rest: Vec<Spanned<&'src str>> = repeat(
            0..,
            preceded(list_separator, |input: &mut Input<'src>| {
                cut_err(input, relationship_type)
            }),
        )
        .parse_next(input)?;

        ws_comments0.parse_next(input)?;
        if opt(right_bracket).parse_next(input)?.is_none() {
            return Err(unclosed_error(Delimiter::TypeList, open));
        }

        let mut types = vec![first];
        types.extend(rest);
        Ok(types)
    })
}

/// Parse a contains declaration
///
/// Syntax: `contains A` or `contains A, B, C`
fn contains_decl<'src>(input: &mut Input<'src>) -> IResult<Vec<Spanned<&'src str>>> {
    token_span(input, |token| matches!(token, Token::Contains))?;

    cut_err(input, |input| {
        ws_comments0.parse_next(input)?;
        let first = context_name.parse_next(input)?;

        let rest: Vec<Spanned<&'src str>> = repeat(
            0..,
            preceded(list_separator, |input: &mut Input<'src>| {
                cut_err(input, context_name)
            }),
        )
        .parse_next(input)?;

        let mut names = vec![first];
        names.extend(rest);
        Ok(names)
    })
}

/// Parse a relationship
///
/// Syntax: `[T]? source [T]? arrow [T]? target`
///
/// Examples:
/// - `A -> B`
/// - `A [SK] <-> [SK] B`
/// - `[U,OHS] A -> [D,ACL] B`
fn relationship<'src>(input: &mut Input<'src>) -> IResult<types::Relationship<'src>> {
    let leading = opt(type_list).parse_next(input)?.unwrap_or_default();
    ws_comments0.parse_next(input)?;

    let source_id = raw_identifier.parse_next(input)?;
    ws_comments0.parse_next(input)?;

    let trailing = opt(type_list).parse_next(input)?.unwrap_or_default();
    ws_comments0.parse_next(input)?;

    let arrow = arrow.parse_next(input)?;

    // After parsing arrow, commit to parsing the relationship
    cut_err(input, |input| {
        ws_comments0.parse_next(input)?;
        let target_types = opt(type_list).parse_next(input)?.unwrap_or_default();
        ws_comments0.parse_next(input)?;

        let target_id = raw_identifier
            .context(Context::Label("target context after arrow"))
            .parse_next(input)?;

        let mut source_types = leading;
        source_types.extend(trailing);

        Ok(types::Relationship {
            source: types::Endpoint {
                id: source_id,
                types: source_types,
            },
            arrow,
            target: types::Endpoint {
                id: target_id,
                types: target_types,
            },
        })
    })
}

fn statement<'src>(input: &mut Input<'src>) -> IResult<types::Statement<'src>> {
    alt((
        contains_decl.map(types::Statement::Contains),
        relationship.map(types::Statement::Relationship),
    ))
    .parse_next(input)
}

/// Parse a context map block
///
/// Syntax: `ContextMap Name? { statement* }`
fn context_map<'src>(input: &mut Input<'src>) -> IResult<Spanned<types::ContextMapBlock<'src>>> {
    let keyword = token_span(input, |token| matches!(token, Token::ContextMap))?;

    cut_err(input, |input| {
        ws_comments0.parse_next(input)?;
        let name = opt(raw_identifier).parse_next(input)?;
        ws_comments0.parse_next(input)?;

        let open = left_brace
            .context(Context::Label("`{` after context map name"))
            .parse_next(input)?;

        let statements: Vec<types::Statement<'src>> =
            repeat(0.., preceded(ws_comments0, statement)).parse_next(input)?;
        ws_comments0.parse_next(input)?;

        if input.is_empty() {
            return Err(unclosed_error(Delimiter::Block, open));
        }

        let close = right_brace
            .context(Context::Label("relationship, `contains` declaration or `}`"))
            .parse_next(input)?;

        Ok(Spanned::new(
            types::ContextMapBlock { name, statements },
            keyword.union(close),
        ))
    })
}

/// Parse a complete document
fn document<'src>(input: &mut Input<'src>) -> IResult<types::Document<'src>> {
    ws_comments0.parse_next(input)?;
    let context_map = opt(context_map).parse_next(input)?;
    ws_comments0.parse_next(input)?;

    if !input.is_empty() {
        let label = if context_map.is_some() {
            "end of input after the context map"
        } else {
            "`ContextMap` block"
        };
        return Err(cut_error_with_label(input, label));
    }

    Ok(types::Document { context_map })
}

/// Zero-width span at the end of the last token.
fn end_of_input(tokens: &[PositionedToken<'_>]) -> Span {
    tokens
        .last()
        .map(|token| Span::new(token.span.end()..token.span.end()))
        .unwrap_or_default()
}

/// Span of the first meaningful token at or after `offset`, or the end of
/// input when only trivia remains.
fn offending_span(tokens: &[PositionedToken<'_>], offset: usize) -> (Span, bool) {
    tokens
        .get(offset..)
        .and_then(|rest| rest.iter().find(|token| !token.is_trivia()))
        .map(|token| (token.span, false))
        .unwrap_or_else(|| (end_of_input(tokens), true))
}

/// Convert winnow errors to diagnostics
///
/// Positions are derived from the number of tokens remaining when the error
/// was raised.
fn convert_error(
    error: ErrMode<ContextError<Context>>,
    tokens: &[PositionedToken<'_>],
    current_remaining: usize,
) -> Diagnostic {
    let end_offset = tokens.len().saturating_sub(current_remaining);
    let (span, at_eof) = offending_span(tokens, end_offset);

    let error = match error {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => e,
        ErrMode::Incomplete(_) => {
            // Token slices are complete input, kept for exhaustiveness.
            return Diagnostic::error("incomplete input")
                .with_code(ErrorCode::E101)
                .with_label(span, "input ends here")
                .with_help("the context map appears to be cut short");
        }
    };

    let unclosed = error.context().find_map(|ctx| match ctx {
        Context::Unclosed(delimiter, open) => Some((*delimiter, *open)),
        _ => None,
    });

    match unclosed {
        Some((Delimiter::TypeList, open)) => Diagnostic::error("unterminated type list")
            .with_code(ErrorCode::E102)
            .with_label(span, "expected `,` or `]`")
            .with_secondary_label(open, "type list opened here")
            .with_help("close the type list with `]`"),
        Some((Delimiter::Block, open)) => Diagnostic::error("unterminated context map block")
            .with_code(ErrorCode::E103)
            .with_label(span, "expected `}`")
            .with_secondary_label(open, "block opened here")
            .with_help("close the context map with `}`"),
        None => {
            let contexts: Vec<String> = error
                .context()
                .filter_map(|ctx| match ctx {
                    Context::Label(label) => Some(format!("expected {label}")),
                    _ => None,
                })
                .collect();

            let message = if contexts.is_empty() {
                "unexpected token or end of input".to_string()
            } else {
                contexts.join(" → ")
            };

            let label = if at_eof {
                "unexpected end of input"
            } else {
                "unexpected token"
            };

            Diagnostic::error(format!("unexpected token: {message}"))
                .with_code(ErrorCode::E100)
                .with_label(span, label)
                .with_help("check syntax and token positioning")
        }
    }
}

/// Build the syntax tree of a whole document from its tokens.
pub fn build_document<'src>(
    tokens: &'src [PositionedToken<'src>],
) -> Result<types::Document<'src>, Diagnostic> {
    let mut token_slice = TokenSlice::new(tokens);

    match document.parse_next(&mut token_slice) {
        Ok(document) => Ok(document),
        Err(e) => {
            let current_remaining = token_slice.eof_offset();
            Err(convert_error(e, tokens, current_remaining))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse_ok(input: &'static str) -> types::Document<'static> {
        let tokens = tokenize(input).expect("Failed to tokenize input");
        // The tree borrows from the tokens for the rest of the test.
        let tokens: &'static [PositionedToken<'static>] = Box::leak(tokens.into_boxed_slice());
        match build_document(tokens) {
            Ok(document) => document,
            Err(diag) => panic!("Failed to parse `{input}`: {diag}"),
        }
    }

    fn parse_err(input: &str) -> Diagnostic {
        let tokens = tokenize(input).expect("Failed to tokenize input");
        match build_document(&tokens) {
            Ok(document) => panic!("Expected `{input}` to fail, got {document:?}"),
            Err(diag) => diag,
        }
    }

    fn block<'a, 'src>(document: &'a types::Document<'src>) -> &'a types::ContextMapBlock<'src> {
        document
            .context_map
            .as_ref()
            .map(|block| block.inner())
            .expect("context map block")
    }

    fn names<'a>(list: &[Spanned<&'a str>]) -> Vec<&'a str> {
        list.iter().map(|s| *s.inner()).collect()
    }

    fn single_relationship<'a, 'src>(
        document: &'a types::Document<'src>,
    ) -> &'a types::Relationship<'src> {
        match block(document).statements.as_slice() {
            [types::Statement::Relationship(rel)] => rel,
            other => panic!("expected one relationship, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_and_trivia_only_documents() {
        for input in ["", "   \n\t", "/* only a comment */", "// line\n/* block */\n"] {
            let document = parse_ok(input);
            assert!(document.context_map.is_none(), "input: {input:?}");
        }
    }

    #[test]
    fn test_named_context_map() {
        let document = parse_ok("ContextMap DDDSample {\n}");
        let block = block(&document);

        assert_eq!(block.name.as_ref().map(|n| *n.inner()), Some("DDDSample"));
        assert!(block.statements.is_empty());
    }

    #[test]
    fn test_anonymous_context_map() {
        let document = parse_ok("ContextMap { contains A }");
        assert!(block(&document).name.is_none());
    }

    #[test]
    fn test_contains_declarations() {
        let document = parse_ok("ContextMap { contains A contains B, C\n contains A }");
        let declared: Vec<Vec<&str>> = block(&document)
            .statements
            .iter()
            .map(|statement| match statement {
                types::Statement::Contains(list) => names(list),
                other => panic!("unexpected statement {other:?}"),
            })
            .collect();

        assert_eq!(declared, vec![vec!["A"], vec!["B", "C"], vec!["A"]]);
    }

    #[test]
    fn test_relationship_without_types() {
        let document = parse_ok("ContextMap { A -> B }");
        let rel = single_relationship(&document);

        assert_eq!(*rel.source.id, "A");
        assert_eq!(*rel.target.id, "B");
        assert_eq!(*rel.arrow, ArrowDirection::Right);
        assert!(rel.source.types.is_empty());
        assert!(rel.target.types.is_empty());
    }

    #[test]
    fn test_relationship_with_types_on_both_sides() {
        let document = parse_ok("ContextMap { A [T1] <-> [T2] B }");
        let rel = single_relationship(&document);

        assert_eq!(*rel.arrow, ArrowDirection::Bidirectional);
        assert_eq!(names(&rel.source.types), vec!["T1"]);
        assert_eq!(names(&rel.target.types), vec!["T2"]);
    }

    #[test]
    fn test_leading_type_list_belongs_to_source() {
        let document = parse_ok("ContextMap { [U,OHS] A [PL] <- [D, ACL] B }");
        let rel = single_relationship(&document);

        assert_eq!(*rel.arrow, ArrowDirection::Left);
        assert_eq!(names(&rel.source.types), vec!["U", "OHS", "PL"]);
        assert_eq!(names(&rel.target.types), vec!["D", "ACL"]);
    }

    #[test]
    fn test_comments_between_tokens() {
        let document = parse_ok(
            "ContextMap /* name */ Demo {\n  A /* src */ [U] // note\n  -> /* tgt */ B\n}",
        );
        let rel = single_relationship(&document);

        assert_eq!(*rel.source.id, "A");
        assert_eq!(names(&rel.source.types), vec!["U"]);
        assert_eq!(*rel.target.id, "B");
    }

    #[test]
    fn test_relationship_span() {
        let input = "ContextMap { Alpha -> Beta }";
        let document = parse_ok(input);
        let rel = single_relationship(&document);
        let span = rel.span();

        assert_eq!(&input[span.start()..span.end()], "Alpha -> Beta");
    }

    #[test]
    fn test_error_missing_target() {
        let diag = parse_err("ContextMap { A -> }");

        assert_eq!(diag.code(), Some(ErrorCode::E100));
        assert!(
            diag.message().contains("target context after arrow"),
            "message: {}",
            diag.message()
        );
    }

    #[test]
    fn test_error_missing_arrow() {
        let input = "ContextMap { A B }";
        let diag = parse_err(input);

        assert_eq!(diag.code(), Some(ErrorCode::E100));
        let span = diag.primary_span().unwrap();
        assert_eq!(&input[span.start()..span.end()], "A");
    }

    #[test]
    fn test_error_unterminated_type_list() {
        let input = "ContextMap { A [U, OHS -> B }";
        let diag = parse_err(input);

        assert_eq!(diag.code(), Some(ErrorCode::E102));
        let labels = diag.labels();
        assert_eq!(&input[labels[0].span().start()..labels[0].span().end()], "->");
        assert!(labels[1].is_secondary());
        assert_eq!(labels[1].span().start(), input.find('[').unwrap());
    }

    #[test]
    fn test_error_empty_type_list() {
        let diag = parse_err("ContextMap { A [] -> B }");
        assert_eq!(diag.code(), Some(ErrorCode::E100));
        assert!(diag.message().contains("relationship type"));
    }

    #[test]
    fn test_error_trailing_comma_in_type_list() {
        let diag = parse_err("ContextMap { A [U,] -> B }");
        assert_eq!(diag.code(), Some(ErrorCode::E100));
    }

    #[test]
    fn test_error_unterminated_block() {
        let input = "ContextMap Demo {\n  contains A\n";
        let diag = parse_err(input);

        assert_eq!(diag.code(), Some(ErrorCode::E103));
        let labels = diag.labels();
        assert_eq!(labels[0].span().start(), input.len());
        assert_eq!(labels[1].span().start(), input.find('{').unwrap());
    }

    #[test]
    fn test_error_missing_open_brace() {
        let diag = parse_err("ContextMap Demo contains A }");
        assert_eq!(diag.code(), Some(ErrorCode::E100));
    }

    #[test]
    fn test_error_statement_outside_block() {
        let diag = parse_err("contains A");
        assert_eq!(diag.code(), Some(ErrorCode::E100));
        assert!(diag.message().contains("`ContextMap` block"));
    }

    #[test]
    fn test_error_content_after_block() {
        let diag = parse_err("ContextMap { } ContextMap { }");
        assert_eq!(diag.code(), Some(ErrorCode::E100));
    }

    #[test]
    fn test_error_contains_without_name() {
        let diag = parse_err("ContextMap { contains }");
        assert_eq!(diag.code(), Some(ErrorCode::E100));
        assert!(diag.message().contains("bounded context name"));
    }
}
