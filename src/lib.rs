//! A minimal Lisp interpreter: an S-expression reader, a cons-cell value
//! model with interned symbols, and an evaluator with user-defined functions
//! and macros. The [`Interpreter`] owns the root environment; the binary in
//! `main.rs` wraps it in a read-eval-print loop.

mod env;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod logger;
pub mod obj;
pub mod parser;
pub mod prims;
pub mod symbol;
mod util;

use crate::{
    env::{add_variable, make_env},
    error::{Error, EvalError, ParseError},
    lexer::Lexer,
    obj::{Obj, ObjRef},
};

/// An interpreter instance: the root environment with `t` and the primitives
/// installed. Distinct instances share the symbol interner but nothing else.
pub struct Interpreter {
    env: ObjRef,
}

impl Interpreter {
    pub fn new() -> Self {
        let env = make_env(Obj::Nil.into(), None);
        add_variable(&env, symbol::intern("t"), Obj::True.into());
        prims::install(&env);
        Interpreter { env }
    }

    /// The root environment frame.
    pub fn env(&self) -> ObjRef {
        self.env.clone()
    }

    /// Evaluate a single parsed object in the root environment.
    pub fn eval(&self, obj: &ObjRef) -> Result<ObjRef, EvalError> {
        eval::eval(&self.env, obj)
    }

    /// Parse and evaluate every form in `src`, returning one result per
    /// top-level form. Stops at the first error.
    pub fn run(&self, src: &str) -> Result<Vec<ObjRef>, Error> {
        let mut tokens = Lexer::new(src);
        let mut results = Vec::new();
        loop {
            match tokens.peek_next_token() {
                Err(ParseError::Eof) => return Ok(results),
                Err(e) => return Err(e.into()),
                Ok(_) => {}
            }
            let obj = parser::parse_expr(&mut tokens).map_err(|e| match e {
                ParseError::Eof => ParseError::SyntaxError("Unclosed parenthesis".to_string()),
                other => other,
            })?;
            results.push(eval::eval(&self.env, &obj)?);
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
