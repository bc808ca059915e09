use crate::{token::Operator, value::Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Literal(Value),
    Reference(Reference),
    New {
        id: String,
        args: Vec<Self>,
    },
    Call {
        reference: Reference,
        args: Vec<Self>,
    },
    Assignment {
        reference: Reference,
        exp: Box<Self>,
    },
    Binary {
        operator: Operator,
        left: Box<Self>,
        right: Box<Self>,
    },
}

/// A dotted access path such as `this.owner.name`. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference(pub Vec<String>);
