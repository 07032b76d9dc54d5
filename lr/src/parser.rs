//! a shift-reduce parser driven by a supplied action/goto table.

use grammar::{Symbol, END_MARK};
use thiserror::Error;
use crate::table::{Action, SrTable};

/// a classified token: symbol name plus the literal text used for
/// position tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SrToken<'a> {
  pub kind: &'a str,
  pub text: &'a str,
}

impl<'a> SrToken<'a> {
  pub fn new(kind: &'a str, text: &'a str) -> Self {
    SrToken { kind, text }
  }
}

/// splits on whitespace; every word is its own symbol name.
pub fn tokenize(input: &str) -> impl Iterator<Item = SrToken<'_>> {
  input.split_whitespace().map(|word| SrToken::new(word, word))
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
  #[error("syntax error at {line}:{column}: unexpected '{found}', expected one of: {}", .expected.join(", "))]
  Syntax {
    found: String,
    line: u32,
    column: u32,
    expected: Vec<String>,
  },
  /// a reduction exposed a state with no transition for the reduced
  /// nonterminal; the table itself is malformed.
  #[error("no goto transition from state {state} on {nonterminal}")]
  Goto {
    state: u32,
    nonterminal: String,
  },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<'a> {
  Shift {
    text: &'a str,
    to: u32,
  },
  Reduce {
    production: u32,
    to: u32,
  },
  Accept,
}

pub fn parse<'a, I>(table: &SrTable, tokens: I) -> Result<(), ParseError>
  where I: IntoIterator<Item = SrToken<'a>>
{
  parse_with_trace(table, tokens, |_| ())
}

pub fn parse_with_trace<'a, I>(
  table: &SrTable,
  tokens: I,
  mut trace: impl FnMut(Step<'a>),
) -> Result<(), ParseError>
  where I: IntoIterator<Item = SrToken<'a>>
{
  let mut tokens = tokens.into_iter();
  let mut token = tokens.next();
  let mut line = 1u32;
  let mut column = 1u32;
  // symbols interleaved with the states they led to; the bottom pair is
  // the end marker with the initial state
  let mut stack: Vec<(Symbol, u32)> = vec![(Symbol::Eof, 0)];

  loop {
    let state = stack.last().unwrap().1;
    let symbol = match &token {
      None => Symbol::Eof,
      Some(t) if t.kind == END_MARK => Symbol::Eof,
      Some(t) => match table.resolve(t.kind) {
        Some(kind) => Symbol::Token(kind),
        None => return Err(syntax_error(table, state, &token, line, column)),
      },
    };

    match table.action(state, symbol) {
      None => return Err(syntax_error(table, state, &token, line, column)),
      Some(Action::Shift(to)) => {
        let text = token.take().unwrap().text;
        stack.push((symbol, to));
        trace(Step::Shift { text, to });

        // position advances by the shifted token's width
        for c in text.chars() {
          if c == '\n' {
            line += 1;
            column = 1;
          } else {
            column += 1;
          }
        }

        token = tokens.next();
      }
      Some(Action::Reduce(prod)) => {
        let (lhs, rhs_len) = table.production(prod);
        // a zero-length right-hand side pops nothing
        stack.truncate(stack.len() - rhs_len);

        let exposed = stack.last().unwrap().1;
        let to = match table.goto(exposed, lhs) {
          Some(to) => to,
          None => {
            return Err(ParseError::Goto {
              state: exposed,
              nonterminal: table.nt_name(lhs).to_owned(),
            });
          }
        };

        stack.push((Symbol::Nonterminal(lhs), to));
        trace(Step::Reduce { production: prod, to });
      }
      Some(Action::Accept) => {
        trace(Step::Accept);
        return Ok(());
      }
    }
  }
}

fn syntax_error(
  table: &SrTable,
  state: u32,
  token: &Option<SrToken<'_>>,
  line: u32,
  column: u32,
) -> ParseError {
  ParseError::Syntax {
    found: token.as_ref().map(|t| t.text.to_owned()).unwrap_or_else(|| END_MARK.to_owned()),
    line,
    column,
    expected: table.expected(state),
  }
}
