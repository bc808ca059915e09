use crate::{expression::Expression, program::Type};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub stmts: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Block(Block),
    If {
        cond: Expression,
        then: Box<Statement>,
        r#else: Option<Box<Statement>>,
    },
    While {
        cond: Expression,
        body: Box<Statement>,
    },
    Return {
        exp: Option<Expression>,
    },
    Break,
    Declaration {
        t: Type,
        id: String,
        exp: Option<Expression>,
    },
    Expression(Expression),
    /// A lone `;`.
    Empty,
}
