//! The parser module: turns tokens into object trees.
//!
//! End of input at a token boundary surfaces as [`ParseError::Eof`], which
//! the caller distinguishes from a syntax error: at the top level it is the
//! normal end of a program, in the middle of an expression it means the input
//! is incomplete (an unclosed list, or more lines to come in the REPL).

use crate::error::ParseError;
use crate::lexer::{Lexer, Token};
use crate::obj::{Obj, ObjRef, cons};
use crate::symbol::intern;

/// Parse the next complete expression from the token stream.
pub fn parse_expr(tokens: &mut Lexer) -> Result<ObjRef, ParseError> {
    match tokens.try_next()? {
        Token::LParen => parse_list(tokens),
        Token::Quote => parse_quote(tokens),
        Token::Int(value) => Ok(Obj::Int(value).into()),
        Token::Symbol(name) => Ok(intern(&name)),
        Token::RParen => Err(ParseError::SyntaxError(format!(
            "At position {}: Stray close parenthesis",
            tokens.get_cur_pos()
        ))),
        Token::Dot => Err(ParseError::SyntaxError(format!(
            "At position {}: Stray dot",
            tokens.get_cur_pos()
        ))),
    }
}

/// Parse the remainder of a list according to the following BNF:
///
/// ```ignore
/// List ::= LParen ListRest;
/// ListRest ::= RParen                    // 1
///            | Expr ListRest             // 2
///            | Expr "." Expr RParen;     // 3
/// ```
///
/// The `LParen` is already consumed when this function is called. A dot in
/// first position falls through to [`parse_expr`], which rejects it.
fn parse_list(tokens: &mut Lexer) -> Result<ObjRef, ParseError> {
    stacker::maybe_grow(32 * 1024, 1024 * 1024, || {
        match tokens.peek_next_token()? {
            // case 1
            (_, Token::RParen) => {
                tokens.consume(Token::RParen)?;
                Ok(Obj::Nil.into())
            }
            _ => {
                let car = parse_expr(tokens)?;
                let cdr = if let Ok((_, Token::Dot)) = tokens.peek_next_token() {
                    // case 3
                    tokens.consume(Token::Dot)?;
                    let cdr = parse_expr(tokens)?;
                    match tokens.try_next()? {
                        Token::RParen => cdr,
                        _ => {
                            return Err(ParseError::SyntaxError(format!(
                                "At position {}: Closed parenthesis expected after dot",
                                tokens.get_cur_pos()
                            )));
                        }
                    }
                } else {
                    // case 2
                    parse_list(tokens)?
                };
                Ok(cons(car, cdr))
            }
        }
    })
}

/// `'expr` expands at read time to `(quote expr)`.
fn parse_quote(tokens: &mut Lexer) -> Result<ObjRef, ParseError> {
    let quoted = parse_expr(tokens)?;
    Ok(cons(intern("quote"), cons(quoted, Obj::Nil.into())))
}
