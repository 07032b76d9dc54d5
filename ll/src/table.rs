//! build a predictive parse table from FIRST and FOLLOW sets.

use grammar::{Grammar, NonterminalId, Symbol};
use thiserror::Error;
use crate::ffn::{self, Ffn};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LlTable {
  /// entry in `cells[nt][terminal]`:
  /// - zero: no production
  /// - positive: production (n - 1)
  ///
  /// one column per token, plus a trailing column for the end marker.
  cells: Vec<Vec<u32>>,
  num_tokens: usize,
}

impl LlTable {
  pub(crate) fn new(num_nts: usize, num_tokens: usize) -> Self {
    LlTable {
      cells: vec![vec![0; num_tokens + 1]; num_nts],
      num_tokens,
    }
  }

  pub fn get(&self, nt: NonterminalId, lookahead: Symbol) -> Option<usize> {
    let col = self.col(lookahead)?;

    match self.cells[nt.index()][col] {
      0 => None,
      n => Some(n as usize - 1),
    }
  }

  pub(crate) fn set(&mut self, nt: NonterminalId, lookahead: Symbol, prod_ix: usize) {
    let col = self.col(lookahead).unwrap();
    self.cells[nt.index()][col] = prod_ix as u32 + 1;
  }

  fn col(&self, lookahead: Symbol) -> Option<usize> {
    match lookahead {
      Symbol::Token(token) => Some(token.index()),
      Symbol::Eof => Some(self.num_tokens),
      Symbol::Nonterminal(_) | Symbol::Epsilon => None,
    }
  }
}

/// Two distinct productions claimed the same cell. Non-fatal: the table
/// keeps the entry chosen by the policy in [`build`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("conflict at table[{nonterminal}][{lookahead}]: already contains {present}, collides with {incoming}")]
pub struct Conflict {
  pub nonterminal: String,
  pub lookahead: String,
  pub present: String,
  pub incoming: String,
}

impl Conflict {
  fn new(
    grammar: &Grammar,
    nt: NonterminalId,
    lookahead: Symbol,
    present: usize,
    incoming: usize,
  ) -> Self {
    Conflict {
      nonterminal: grammar.nt_name(nt).to_owned(),
      lookahead: grammar.symbol_name(lookahead).to_owned(),
      present: grammar.production_text(present),
      incoming: grammar.production_text(incoming),
    }
  }
}

/// For every production, claim a cell per terminal in FIRST(rhs); a
/// nullable rhs additionally claims a cell per terminal in FOLLOW(nt).
/// Colliding claims are recorded as conflicts; a FIRST-driven claim
/// overwrites the cell, a FOLLOW-driven claim leaves it untouched.
pub fn build(grammar: &Grammar, ffn: &Ffn) -> (LlTable, Vec<Conflict>) {
  let mut table = LlTable::new(grammar.nts.len(), grammar.tokens.len());
  let mut conflicts = vec![];

  for (&nt, range) in &grammar.nt_prods {
    for prod_ix in range.clone() {
      let prod = &grammar.prods[prod_ix];
      let prod_first = ffn::first_of_sequence(&ffn.first, &prod.symbols);

      for symbol in prod_first.iter() {
        if symbol == Symbol::Epsilon {
          continue;
        }

        match table.get(nt, symbol) {
          Some(present) if present != prod_ix => {
            conflicts.push(Conflict::new(grammar, nt, symbol, present, prod_ix));
            table.set(nt, symbol, prod_ix);
          }
          Some(_) => {}
          None => table.set(nt, symbol, prod_ix),
        }
      }

      if prod_first.has_epsilon() {
        for symbol in ffn.follow_of(nt).iter() {
          match table.get(nt, symbol) {
            Some(present) if present != prod_ix => {
              conflicts.push(Conflict::new(grammar, nt, symbol, present, prod_ix));
            }
            Some(_) => {}
            None => table.set(nt, symbol, prod_ix),
          }
        }
      }
    }
  }

  (table, conflicts)
}

/// like [`build`], but rejects the grammar on any conflict.
pub fn build_strict(grammar: &Grammar, ffn: &Ffn) -> Result<LlTable, Vec<Conflict>> {
  let (table, conflicts) = build(grammar, ffn);

  if conflicts.is_empty() {
    Ok(table)
  } else {
    Err(conflicts)
  }
}
