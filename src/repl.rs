// ABOUTME: Interactive REPL with bracket-balanced multi-line input assembly

use crate::env::Environment;
use crate::error::Error;
use crate::eval;
use crate::lexer;
use crate::reader::Reader;
use crate::token::{SpannedToken, Token};
use crate::value::Value;
use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{BufRead, Write};
use std::rc::Rc;

const HISTORY_FILE: &str = ".minilisp_history";

/// Count a token into the running paren balance. A closing paren with no
/// open paren is rejected immediately — balancing happens after lexing, so
/// parens inside string literals never miscount.
fn update_balance(open: &mut usize, token: &Token) -> Result<(), Error> {
    match token {
        Token::LeftParen => *open += 1,
        Token::RightParen => {
            if *open == 0 {
                return Err(Error::syntax("Unmatched parens"));
            }
            *open -= 1;
        }
        _ => {}
    }
    Ok(())
}

/// A buffer is complete when it holds at least one token, all parens are
/// balanced, and it does not end with a dangling quote-family prefix
fn buffer_complete(tokens: &[SpannedToken], open: usize) -> bool {
    match tokens.last() {
        None => false,
        Some(last) => {
            open == 0
                && !matches!(
                    last.token,
                    Token::Quote | Token::Quasiquote | Token::Unquote
                )
        }
    }
}

pub struct Repl {
    editor: DefaultEditor,
}

impl Repl {
    pub fn new() -> Result<Self, ReadlineError> {
        let config = Config::builder().auto_add_history(true).build();
        let mut editor = DefaultEditor::with_config(config)?;
        let _ = editor.load_history(HISTORY_FILE);
        Ok(Repl { editor })
    }

    /// Prompt, assemble, evaluate, print; loops until end-of-file. Each
    /// complete top-level expression in the buffer prints its external
    /// representation on one line.
    pub fn run(&mut self, env: &Rc<Environment>) {
        loop {
            match self.read_tokens() {
                Ok(Some(tokens)) => {
                    let mut reader = Reader::new(tokens);
                    while !reader.is_empty() {
                        match reader.parse().and_then(|expr| eval::eval(&expr, env)) {
                            Ok(value) => println!("{}", value),
                            Err(e) => {
                                eprintln!("Error: {}", e);
                                break;
                            }
                        }
                    }
                }
                Ok(None) => break,
                Err(e) => eprintln!("Error: {}", e),
            }
        }
        let _ = self.editor.save_history(HISTORY_FILE);
    }

    /// Accumulate lines until the buffer holds at least one complete
    /// expression. Returns None at end-of-file.
    fn read_tokens(&mut self) -> Result<Option<Vec<SpannedToken>>, Error> {
        let mut tokens: Vec<SpannedToken> = Vec::new();
        let mut open = 0usize;

        loop {
            let prompt = if tokens.is_empty() { ">>> " } else { "... " };
            let line = match self.editor.readline(prompt) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => {
                    // Ctrl-C drops the buffer and starts over
                    tokens.clear();
                    open = 0;
                    continue;
                }
                Err(ReadlineError::Eof) => return Ok(None),
                Err(e) => return Err(Error::File(e.to_string())),
            };

            for spanned in lexer::tokenize(&line)? {
                update_balance(&mut open, &spanned.token)?;
                tokens.push(spanned);
            }

            if buffer_complete(&tokens, open) {
                return Ok(Some(tokens));
            }
        }
    }
}

thread_local! {
    /// Forms already assembled by `read` but not yet handed out
    static READ_CACHE: RefCell<VecDeque<Value>> = const { RefCell::new(VecDeque::new()) };
}

/// Reads one expression from standard input for the `read` builtin, using
/// the same bracket-balance assembly as the prompt loop. When one input line
/// holds several complete forms, the extras are cached for later calls.
/// End-of-file terminates the process with status 0.
pub fn read_from_stdin() -> Result<Value, Error> {
    if let Some(value) = READ_CACHE.with(|cache| cache.borrow_mut().pop_front()) {
        return Ok(value);
    }

    let stdin = std::io::stdin();
    let mut tokens: Vec<SpannedToken> = Vec::new();
    let mut open = 0usize;

    loop {
        let mut line = String::new();
        let bytes = stdin
            .lock()
            .read_line(&mut line)
            .map_err(|e| Error::File(e.to_string()))?;
        if bytes == 0 {
            let _ = std::io::stdout().flush();
            std::process::exit(0);
        }

        for spanned in lexer::tokenize(&line)? {
            update_balance(&mut open, &spanned.token)?;
            tokens.push(spanned);
        }

        if !buffer_complete(&tokens, open) {
            print!("... ");
            let _ = std::io::stdout().flush();
            continue;
        }

        let mut reader = Reader::new(std::mem::take(&mut tokens));
        let mut values = VecDeque::new();
        while !reader.is_empty() {
            values.push_back(reader.parse()?);
        }
        let first = values
            .pop_front()
            .ok_or_else(|| Error::syntax("Empty tokens"))?;
        READ_CACHE.with(|cache| *cache.borrow_mut() = values);
        return Ok(first);
    }
}
