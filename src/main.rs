use std::{
    fs::read_to_string,
    io::{self, IsTerminal, Read},
    path::PathBuf,
};

use clap::Parser;
use minlisp::{
    Interpreter,
    error::ParseError,
    lexer::{Lexer, is_symbol_lead, is_symbol_part},
    logger::{fatal, log_debug},
    parser::parse_expr,
    prims::PRIMITIVES,
};
use rustyline::{
    Context, Editor,
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
};

#[derive(Parser)]
#[command(name = "minlisp", about = "A minimal Lisp interpreter")]
struct Cli {
    /// Input file path. The file is evaluated instead of standard input.
    #[arg(short, long, value_name = "FILE")]
    input_path: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    println!("minlisp");

    let interp = Interpreter::new();
    match cli.input_path {
        Some(path) => {
            log_debug(format!("evaluating file {}", path.display()));
            let source = match read_to_string(&path) {
                Ok(source) => source,
                Err(e) => fatal(format!("Cannot read {}: {e}", path.display())),
            };
            run_source(&interp, &source);
        }
        None if io::stdin().is_terminal() => repl(&interp),
        None => {
            let mut source = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut source) {
                fatal(format!("Cannot read standard input: {e}"));
            }
            run_source(&interp, &source);
        }
    }
}

/// Evaluate a complete source text form by form, printing each result as it
/// is produced. The first error of any kind is fatal.
fn run_source(interp: &Interpreter, source: &str) {
    let mut tokens = Lexer::new(source);
    loop {
        match tokens.peek_next_token() {
            Err(ParseError::Eof) => return,
            Err(e) => fatal(e),
            Ok(_) => {}
        }
        let obj = match parse_expr(&mut tokens) {
            Ok(obj) => obj,
            Err(ParseError::Eof) => fatal("Unclosed parenthesis"),
            Err(e) => fatal(e),
        };
        match interp.eval(&obj) {
            Ok(value) => println!("{}", value.borrow()),
            Err(e) => fatal(e),
        }
    }
}

/// Tab completion over the initial global bindings. A completable word is a
/// run of the reader's symbol characters; everything else is a boundary.
struct ReplCompleter {
    candidates: Vec<String>,
}

impl rustyline::Helper for ReplCompleter {}

impl Hinter for ReplCompleter {
    type Hint = String;
}

impl Highlighter for ReplCompleter {}

impl Validator for ReplCompleter {}

impl Completer for ReplCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> Result<(usize, Vec<Pair>), ReadlineError> {
        let start = line[..pos]
            .char_indices()
            .rev()
            .take_while(|&(_, c)| is_symbol_lead(c) || is_symbol_part(c))
            .last()
            .map_or(pos, |(i, _)| i);
        let word = &line[start..pos];
        let matches = self
            .candidates
            .iter()
            .filter(|name| name.starts_with(word))
            .map(|name| Pair {
                display: name.clone(),
                replacement: name.clone(),
            })
            .collect();
        Ok((start, matches))
    }
}

/// The interactive loop: line editing, history and completion over the
/// primitive names. An expression may span lines; the buffer keeps growing
/// until it parses.
fn repl(interp: &Interpreter) {
    let candidates: Vec<String> = PRIMITIVES
        .iter()
        .map(|(name, _)| name.to_string())
        .chain(std::iter::once("t".to_string()))
        .collect();
    let mut rl: Editor<ReplCompleter, DefaultHistory> = match Editor::new() {
        Ok(editor) => editor,
        Err(e) => fatal(format!("Cannot start line editor: {e}")),
    };
    rl.set_helper(Some(ReplCompleter { candidates }));

    let mut buffer = String::new();
    loop {
        let prompt = if buffer.is_empty() { "> " } else { "  " };
        match rl.readline(prompt) {
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());
                buffer.push_str(&line);
                buffer.push('\n');
                consume_buffer(interp, &mut buffer);
            }
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => return,
            Err(e) => fatal(format!("Cannot read line: {e}")),
        }
    }
}

/// Evaluate every complete form in the buffer, printing each result. An
/// unfinished trailing form stays buffered until the next line arrives.
fn consume_buffer(interp: &Interpreter, buffer: &mut String) {
    let mut consumed = 0;
    let mut tokens = Lexer::new(buffer.as_str());
    loop {
        match tokens.peek_next_token() {
            Err(ParseError::Eof) => {
                buffer.clear();
                return;
            }
            Err(e) => fatal(e),
            Ok(_) => {}
        }
        match parse_expr(&mut tokens) {
            Ok(obj) => {
                consumed = tokens.get_cur_pos();
                match interp.eval(&obj) {
                    Ok(value) => println!("{}", value.borrow()),
                    Err(e) => fatal(e),
                }
            }
            Err(ParseError::Eof) => {
                let rest: String = buffer.chars().skip(consumed).collect();
                *buffer = rest;
                return;
            }
            Err(e) => fatal(e),
        }
    }
}
