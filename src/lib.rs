//! Front end for Moka, a small class-based language: a scanner that turns
//! source text into tokens and a parser that turns tokens into an AST.

pub mod diagnostic;
pub mod expression;
pub mod parse;
pub mod program;
pub mod scan;
pub mod statement;
pub mod token;
pub mod value;

pub use diagnostic::{Diagnostic, DiagnosticSink, Diagnostics};
pub use parse::{parse, ParseError, Parser};
pub use program::Program;
pub use scan::scan;

/// Scans and parses `source`, collecting every diagnostic.
///
/// Parsing is skipped when scanning reported anything, since the token
/// stream is then missing pieces of the input.
pub fn compile(source: &str) -> Result<Program, Vec<Diagnostic>> {
    let mut diagnostics = Diagnostics::default();
    let tokens = scan(source, &mut diagnostics);
    if !diagnostics.is_empty() {
        return Err(diagnostics.items);
    }
    match parse(&tokens, &mut diagnostics) {
        Ok(program) => Ok(program),
        Err(_) => Err(diagnostics.items),
    }
}
