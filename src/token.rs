//! The token vocabulary shared by the scanner and the parser.

use crate::value::Value;
use std::fmt;

/// A classified lexical unit and the byte offset where it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

impl Token {
    pub fn new(kind: TokenKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Identifier(String),
    Keyword(Keyword),
    Separator(Separator),
    Literal(Value),
    TypeName(TypeName),
    Operator(Operator),
}

impl TokenKind {
    /// Whether this token can start a type: a built-in type name or a class
    /// name.
    pub fn is_type_like(&self) -> bool {
        matches!(self, Self::TypeName(_) | Self::Identifier(_))
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier(name) => write!(f, "identifier `{name}`"),
            Self::Keyword(keyword) => write!(f, "keyword `{keyword}`"),
            Self::Separator(separator) => {
                write!(f, "separator `{separator}`")
            }
            Self::Literal(value) => write!(f, "literal `{value}`"),
            Self::TypeName(name) => write!(f, "type `{name}`"),
            Self::Operator(operator) => write!(f, "operator `{operator}`"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    New,
    Class,
    Break,
    Extends,
    If,
    Else,
    While,
    Return,
}

impl Keyword {
    pub fn from_word(word: &str) -> Option<Self> {
        Some(match word {
            "new" => Self::New,
            "class" => Self::Class,
            "break" => Self::Break,
            "extends" => Self::Extends,
            "if" => Self::If,
            "else" => Self::Else,
            "while" => Self::While,
            "return" => Self::Return,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Class => "class",
            Self::Break => "break",
            Self::Extends => "extends",
            Self::If => "if",
            Self::Else => "else",
            Self::While => "while",
            Self::Return => "return",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeName {
    Int,
    Boolean,
    Void,
}

impl TypeName {
    pub fn from_word(word: &str) -> Option<Self> {
        Some(match word {
            "int" => Self::Int,
            "boolean" => Self::Boolean,
            "void" => Self::Void,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Boolean => "boolean",
            Self::Void => "void",
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Separator {
    Dot,
    OpenBrace,
    OpenParen,
    CloseBrace,
    CloseParen,
    Comma,
    Semicolon,
    Assign,
}

impl Separator {
    pub fn from_char(c: char) -> Option<Self> {
        Some(match c {
            '.' => Self::Dot,
            '{' => Self::OpenBrace,
            '(' => Self::OpenParen,
            '}' => Self::CloseBrace,
            ')' => Self::CloseParen,
            ',' => Self::Comma,
            ';' => Self::Semicolon,
            '=' => Self::Assign,
            _ => return None,
        })
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Dot => '.',
            Self::OpenBrace => '{',
            Self::OpenParen => '(',
            Self::CloseBrace => '}',
            Self::CloseParen => ')',
            Self::Comma => ',',
            Self::Semicolon => ';',
            Self::Assign => '=',
        }
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Relational and logical binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    And,
    Or,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,
}

impl Operator {
    /// Binding strength used by precedence climbing. Higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
            Self::Less
            | Self::LessEqual
            | Self::Greater
            | Self::GreaterEqual
            | Self::Equal => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::And => "&&",
            Self::Or => "||",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::Equal => "==",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
