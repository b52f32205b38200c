//! The lexer module: splits raw characters into S-expression tokens.

use crate::error::ParseError;

/// Symbol names longer than this are rejected.
pub const SYMBOL_MAX_LEN: usize = 200;

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Token {
    /// Token `(`.
    LParen,
    /// Token `)`.
    RParen,
    /// Token `'`.
    Quote,
    /// Token `.`.
    Dot,
    /// Decimal integer token, including the `-` prefix.
    Int(i64),
    /// Symbol token. The lexer does not intern; the parser does.
    Symbol(String),
}

pub struct Lexer {
    chars: Vec<char>,
    cur_pos: usize,
}

fn is_whitespace(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\r' || c == '\n'
}

/// Whether `c` may start a symbol.
pub fn is_symbol_lead(c: char) -> bool {
    c.is_ascii_alphabetic() || "+=!@#$%^&*".contains(c)
}

/// Whether `c` may continue a symbol.
pub fn is_symbol_part(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

impl Lexer {
    pub fn new<T>(s: T) -> Lexer
    where
        T: ToString,
    {
        Lexer {
            chars: s.to_string().chars().collect(),
            cur_pos: 0,
        }
    }

    pub fn get_cur_pos(&self) -> usize {
        self.cur_pos
    }

    fn char_at(&self, pos: usize) -> Option<char> {
        self.chars.get(pos).copied()
    }

    /// Scan a run of digits starting at `pos` and return the magnitude
    /// together with the position one past the last digit. The magnitude is
    /// unsigned so that the caller can range-check against either end of the
    /// `i64` domain; `-9223372036854775808` is a legal literal even though
    /// its digit run alone overflows `i64`.
    fn peek_number(&self, pos: usize) -> Result<(usize, u64), ParseError> {
        let mut cur_pos = pos;
        let mut digits = String::new();
        while let Some(c) = self.char_at(cur_pos) {
            if !c.is_ascii_digit() {
                break;
            }
            digits.push(c);
            cur_pos += 1;
        }
        let magnitude = digits.parse::<u64>().map_err(|_| {
            ParseError::SyntaxError(format!("At position {pos}: Integer literal too large"))
        })?;
        Ok((cur_pos, magnitude))
    }

    fn peek_symbol(&self, pos: usize) -> Result<(usize, Token), ParseError> {
        let mut symbol = String::new();
        let mut cur_pos = pos;
        // The lead character was classified by the caller; everything in
        // [A-Za-z0-9-] extends the symbol.
        while let Some(c) = self.char_at(cur_pos) {
            if !symbol.is_empty() && !is_symbol_part(c) {
                break;
            }
            if symbol.len() >= SYMBOL_MAX_LEN {
                return Err(ParseError::SyntaxError(format!(
                    "At position {pos}: Symbol name too long"
                )));
            }
            symbol.push(c);
            cur_pos += 1;
        }
        Ok((cur_pos, Token::Symbol(symbol)))
    }

    /// Peek the next token without consuming it. The lexer's state only
    /// changes when a comment is met, in which case the comment is skipped
    /// for good and no token is produced for it.
    pub fn peek_next_token(&mut self) -> Result<(usize, Token), ParseError> {
        let mut cur_pos = self.cur_pos;
        while let Some(c) = self.char_at(cur_pos) {
            if is_whitespace(c) {
                cur_pos += 1;
            } else {
                break;
            }
        }
        match self.char_at(cur_pos) {
            None => Err(ParseError::Eof),
            Some(c) => match c {
                '(' => Ok((cur_pos + 1, Token::LParen)),
                ')' => Ok((cur_pos + 1, Token::RParen)),
                '\'' => Ok((cur_pos + 1, Token::Quote)),
                '.' => Ok((cur_pos + 1, Token::Dot)),
                // Comment runs from `;` to LF, CR or CRLF.
                ';' => {
                    let mut next_pos = cur_pos + 1;
                    while let Some(c) = self.char_at(next_pos) {
                        next_pos += 1;
                        if c == '\n' {
                            break;
                        }
                        if c == '\r' {
                            if self.char_at(next_pos) == Some('\n') {
                                next_pos += 1;
                            }
                            break;
                        }
                    }
                    self.cur_pos = next_pos;
                    self.peek_next_token()
                }
                c if c.is_ascii_digit() => {
                    let (next_pos, magnitude) = self.peek_number(cur_pos)?;
                    if magnitude > i64::MAX as u64 {
                        return Err(ParseError::SyntaxError(format!(
                            "At position {cur_pos}: Integer literal too large"
                        )));
                    }
                    Ok((next_pos, Token::Int(magnitude as i64)))
                }
                // `-` followed by digits is a negative integer; a bare `-`
                // is a negative number with no digits, i.e. zero.
                '-' => match self.char_at(cur_pos + 1) {
                    Some(c) if c.is_ascii_digit() => {
                        let (next_pos, magnitude) = self.peek_number(cur_pos + 1)?;
                        if magnitude > i64::MIN.unsigned_abs() {
                            return Err(ParseError::SyntaxError(format!(
                                "At position {cur_pos}: Integer literal too large"
                            )));
                        }
                        Ok((next_pos, Token::Int(magnitude.wrapping_neg() as i64)))
                    }
                    _ => Ok((cur_pos + 1, Token::Int(0))),
                },
                c if is_symbol_lead(c) => self.peek_symbol(cur_pos),
                c => Err(ParseError::SyntaxError(format!(
                    "At position {cur_pos}: Don't know how to handle {c}"
                ))),
            },
        }
    }

    pub fn try_next(&mut self) -> Result<Token, ParseError> {
        let (next_pos, token) = self.peek_next_token()?;
        self.cur_pos = next_pos;
        Ok(token)
    }

    pub fn consume(&mut self, token: Token) -> Result<(), ParseError> {
        match self.try_next() {
            Ok(actual) if actual == token => Ok(()),
            Ok(actual) => Err(ParseError::SyntaxError(format!(
                "At position {}: Expected {token:?}, found {actual:?}",
                self.get_cur_pos()
            ))),
            Err(e) => Err(e),
        }
    }
}

impl Iterator for Lexer {
    type Item = Token;
    fn next(&mut self) -> Option<Self::Item> {
        match self.try_next() {
            Ok(token) => Some(token),
            Err(ParseError::Eof) => None,
            Err(e) => panic!("lexer error: {e}"),
        }
    }
}
