use crate::{expression::Expression, statement::Block};

/// Types are plain names; `int` and a class name look the same here.
pub type Type = String;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub body: Vec<Class>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Class {
    pub id: String,
    pub parent: Option<String>,
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    Field {
        t: Type,
        id: String,
        exp: Option<Expression>,
    },
    Method {
        return_type: Type,
        id: String,
        params: Vec<Param>,
        block: Block,
    },
    Constructor {
        id: String,
        params: Vec<Param>,
        block: Block,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub t: Type,
    pub id: String,
}
