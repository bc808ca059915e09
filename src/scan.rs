//! Turns source text into tokens.
//!
//! Each lexical rule is a small `nom` parser. At every position the rules are
//! tried in a fixed order and the first one that matches a prefix of the
//! remaining input wins, so a keyword-looking word is only a keyword when no
//! higher-priority rule claims it and the whole word spells the keyword.

use crate::{
    diagnostic::DiagnosticSink,
    token::{Keyword, Operator, Separator, Token, TokenKind, TypeName},
    value::Value,
};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{alpha1, alphanumeric0, anychar, digit1, satisfy},
    combinator::{map, map_opt, not, recognize, value},
    sequence::{pair, terminated},
    IResult,
};
use thiserror::Error;

type Input<'a> = &'a str;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("illegal identifier `{0}`: identifiers cannot start with a digit")]
    IllegalIdentifier(String),
    #[error("unexpected character `{0}`")]
    UnexpectedCharacter(char),
    #[error("integer literal `{0}` is out of range")]
    IntegerOutOfRange(String),
}

/// What a single rule produced.
#[derive(Debug, Clone)]
enum Lexeme {
    Whitespace,
    Token(TokenKind),
    Malformed(LexErrorKind),
}

/// Scans the whole of `source`.
///
/// Lexical errors are reported to `sink` and scanning carries on, so one pass
/// can surface several of them. The returned tokens are in offset order.
pub fn scan(source: &str, sink: &mut dyn DiagnosticSink) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut rest = source;
    let mut error_count = 0;

    while !rest.is_empty() {
        let offset = source.len() - rest.len();
        match lexeme(rest) {
            Ok((remaining, lexeme)) => {
                match lexeme {
                    Lexeme::Whitespace => {}
                    Lexeme::Token(kind) => {
                        tokens.push(Token::new(kind, offset));
                    }
                    Lexeme::Malformed(error) => {
                        error_count += 1;
                        report(sink, error, offset);
                    }
                }
                rest = remaining;
            }
            Err(_) => {
                // Skip exactly one character and keep going.
                let mut chars = rest.chars();
                if let Some(c) = chars.next() {
                    error_count += 1;
                    report(sink, LexErrorKind::UnexpectedCharacter(c), offset);
                }
                rest = chars.as_str();
            }
        }
    }

    tracing::trace!(
        tokens = tokens.len(),
        errors = error_count,
        "finished scanning"
    );
    tokens
}

fn report(sink: &mut dyn DiagnosticSink, error: LexErrorKind, offset: usize) {
    tracing::debug!(offset, %error, "lexical error");
    sink.report(error.to_string(), offset);
}

fn lexeme(input: Input) -> IResult<Input, Lexeme> {
    alt((
        value(Lexeme::Whitespace, take_while1(char::is_whitespace)),
        illegal_identifier,
        keyword,
        type_name,
        boolean_literal,
        integer_literal,
        operator,
        separator,
        identifier,
    ))(input)
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// A maximal run of word characters. Matching whole words is what keeps
/// `elseclass` from being read as `else` followed by `class`.
fn word(input: Input) -> IResult<Input, &str> {
    take_while1(is_word_char)(input)
}

/// Digits running straight into a word, such as `123abc` or `123_abc`. The
/// whole word is taken so the digits are not reported one by one.
fn illegal_identifier(input: Input) -> IResult<Input, Lexeme> {
    let word_start = satisfy(|c: char| c.is_ascii_alphabetic() || c == '_');
    map(
        recognize(pair(digit1, pair(word_start, take_while(is_word_char)))),
        |text: &str| {
            Lexeme::Malformed(LexErrorKind::IllegalIdentifier(
                text.to_owned(),
            ))
        },
    )(input)
}

fn keyword(input: Input) -> IResult<Input, Lexeme> {
    map_opt(word, |word| {
        Keyword::from_word(word).map(|k| Lexeme::Token(TokenKind::Keyword(k)))
    })(input)
}

fn type_name(input: Input) -> IResult<Input, Lexeme> {
    map_opt(word, |word| {
        TypeName::from_word(word).map(|t| Lexeme::Token(TokenKind::TypeName(t)))
    })(input)
}

fn boolean_literal(input: Input) -> IResult<Input, Lexeme> {
    map_opt(word, |word| {
        let b = match word {
            "true" => true,
            "false" => false,
            _ => return None,
        };
        Some(Lexeme::Token(TokenKind::Literal(Value::Bool(b))))
    })(input)
}

fn integer_literal(input: Input) -> IResult<Input, Lexeme> {
    map(terminated(digit1, not(satisfy(is_word_char))), |digits: &str| {
        match digits.parse() {
            Ok(n) => Lexeme::Token(TokenKind::Literal(Value::Int(n))),
            Err(_) => Lexeme::Malformed(LexErrorKind::IntegerOutOfRange(
                digits.to_owned(),
            )),
        }
    })(input)
}

fn operator(input: Input) -> IResult<Input, Lexeme> {
    map(
        alt((
            value(Operator::LessEqual, tag("<=")),
            value(Operator::GreaterEqual, tag(">=")),
            value(Operator::Equal, tag("==")),
            value(Operator::And, tag("&&")),
            value(Operator::Or, tag("||")),
            value(Operator::Less, tag("<")),
            value(Operator::Greater, tag(">")),
        )),
        |operator| Lexeme::Token(TokenKind::Operator(operator)),
    )(input)
}

fn separator(input: Input) -> IResult<Input, Lexeme> {
    map_opt(anychar, |c| {
        Separator::from_char(c).map(|s| Lexeme::Token(TokenKind::Separator(s)))
    })(input)
}

fn identifier(input: Input) -> IResult<Input, Lexeme> {
    map(recognize(pair(alpha1, alphanumeric0)), |name: &str| {
        Lexeme::Token(TokenKind::Identifier(name.to_owned()))
    })(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Diagnostics;

    fn scan_ok(source: &str) -> Vec<Token> {
        let mut diagnostics = Diagnostics::default();
        let tokens = scan(source, &mut diagnostics);
        assert!(diagnostics.is_empty(), "{:?}", diagnostics.items);
        tokens
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        scan_ok(source).into_iter().map(|token| token.kind).collect()
    }

    fn ident(name: &str) -> TokenKind {
        TokenKind::Identifier(name.to_owned())
    }

    #[test]
    fn empty_class() {
        assert_eq!(
            scan_ok("class C {}"),
            vec![
                Token::new(TokenKind::Keyword(Keyword::Class), 0),
                Token::new(ident("C"), 6),
                Token::new(TokenKind::Separator(Separator::OpenBrace), 8),
                Token::new(TokenKind::Separator(Separator::CloseBrace), 9),
            ]
        );
    }

    #[test]
    fn keyword_prefixed_words_are_identifiers() {
        assert_eq!(
            kinds("intboolean test123 elseclass truex newer"),
            vec![
                ident("intboolean"),
                ident("test123"),
                ident("elseclass"),
                ident("truex"),
                ident("newer"),
            ]
        );
    }

    #[test]
    fn keywords_types_and_literals() {
        assert_eq!(
            kinds("while void true 42 false"),
            vec![
                TokenKind::Keyword(Keyword::While),
                TokenKind::TypeName(TypeName::Void),
                TokenKind::Literal(Value::Bool(true)),
                TokenKind::Literal(Value::Int(42)),
                TokenKind::Literal(Value::Bool(false)),
            ]
        );
    }

    #[test]
    fn operators_prefer_the_longest_spelling() {
        assert_eq!(
            kinds("a<=b>=c==d<e>f&&g||h"),
            vec![
                ident("a"),
                TokenKind::Operator(Operator::LessEqual),
                ident("b"),
                TokenKind::Operator(Operator::GreaterEqual),
                ident("c"),
                TokenKind::Operator(Operator::Equal),
                ident("d"),
                TokenKind::Operator(Operator::Less),
                ident("e"),
                TokenKind::Operator(Operator::Greater),
                ident("f"),
                TokenKind::Operator(Operator::And),
                ident("g"),
                TokenKind::Operator(Operator::Or),
                ident("h"),
            ]
        );
    }

    #[test]
    fn single_equals_is_a_separator() {
        assert_eq!(
            kinds("x = = y"),
            vec![
                ident("x"),
                TokenKind::Separator(Separator::Assign),
                TokenKind::Separator(Separator::Assign),
                ident("y"),
            ]
        );
    }

    #[test]
    fn illegal_identifier_is_reported_and_skipped() {
        let mut diagnostics = Diagnostics::default();
        let tokens = scan("int 123abc;", &mut diagnostics);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.items[0].offset, 4);
        assert!(diagnostics.items[0].message.contains("123abc"));
        assert_eq!(
            tokens,
            vec![
                Token::new(TokenKind::TypeName(TypeName::Int), 0),
                Token::new(TokenKind::Separator(Separator::Semicolon), 10),
            ]
        );
    }

    #[test]
    fn scanning_continues_after_unexpected_characters() {
        let mut diagnostics = Diagnostics::default();
        let tokens = scan("a # b @ é", &mut diagnostics);
        let offsets: Vec<_> =
            diagnostics.items.iter().map(|d| d.offset).collect();
        assert_eq!(offsets, vec![2, 6, 8]);
        assert!(diagnostics.items[0].message.contains('#'));
        assert_eq!(
            tokens,
            vec![Token::new(ident("a"), 0), Token::new(ident("b"), 4)]
        );
    }

    #[test]
    fn oversized_integer_is_reported() {
        let mut diagnostics = Diagnostics::default();
        let tokens = scan("99999999999999999999 1", &mut diagnostics);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            tokens,
            vec![Token::new(TokenKind::Literal(Value::Int(1)), 21)]
        );
    }

    #[test]
    fn digits_before_an_underscore_form_one_illegal_identifier() {
        let mut diagnostics = Diagnostics::default();
        let tokens = scan("123_abc = 4", &mut diagnostics);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.items[0].offset, 0);
        assert!(diagnostics.items[0].message.contains("123_abc"));
        assert_eq!(
            tokens,
            vec![
                Token::new(TokenKind::Separator(Separator::Assign), 8),
                Token::new(TokenKind::Literal(Value::Int(4)), 10),
            ]
        );
    }

    #[test]
    fn whitespace_of_any_kind_is_skipped() {
        assert_eq!(
            scan_ok("\tx\r\n  y"),
            vec![Token::new(ident("x"), 1), Token::new(ident("y"), 6)]
        );
    }
}
