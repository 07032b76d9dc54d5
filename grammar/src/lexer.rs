//! a whitespace-splitting lexer that classifies each word as the terminal
//! of the same name.

use thiserror::Error;
use crate::grammar::{Grammar, TokenId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'input> {
  pub kind: TokenId,
  pub text: &'input str,
  pub start: usize,
  pub end: usize,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LexError {
  #[error("unknown token '{text}' at {start}..{end}")]
  UnknownToken {
    text: String,
    start: usize,
    end: usize,
  },
}

pub struct Tokens<'g, 'input> {
  grammar: &'g Grammar,
  input: &'input str,
  pos: usize,
}

pub fn tokenize<'g, 'input>(
  grammar: &'g Grammar,
  input: &'input str,
) -> Tokens<'g, 'input> {
  Tokens {
    grammar,
    input,
    pos: 0,
  }
}

impl<'g, 'input> Iterator for Tokens<'g, 'input> {
  type Item = Result<Token<'input>, LexError>;

  fn next(&mut self) -> Option<Self::Item> {
    let rest = &self.input[self.pos..];
    let offset = rest.char_indices().find(|(_, c)| !c.is_whitespace());
    let start = match offset {
      Some((offset, _)) => self.pos + offset,
      None => {
        self.pos = self.input.len();
        return None;
      }
    };

    let word = &self.input[start..];
    let len = word.char_indices()
      .find(|(_, c)| c.is_whitespace())
      .map(|(i, _)| i)
      .unwrap_or(word.len());
    let end = start + len;
    let text = &self.input[start..end];

    self.pos = end;

    match self.grammar.token(text) {
      Some(kind) => Some(Ok(Token { kind, text, start, end })),
      None => Some(Err(LexError::UnknownToken {
        text: text.to_owned(),
        start,
        end,
      })),
    }
  }
}
