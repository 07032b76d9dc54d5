//! encode and decode a predictive parse table as tabular text: a header
//! row of terminal names plus the end marker, one row per nonterminal,
//! comma-delimited cells holding space-separated right-hand sides (or ε),
//! blank cells meaning "no entry".

use std::fmt::Write;
use grammar::{Grammar, NonterminalId, Symbol, END_MARK, EPSILON};
use itertools::Itertools;
use thiserror::Error;
use crate::table::LlTable;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TabularError {
  #[error("table text has no header row")]
  Empty,
  #[error("unknown terminal '{0}' in header")]
  UnknownTerminal(String),
  #[error("unknown nonterminal '{0}'")]
  UnknownNonterminal(String),
  #[error("unknown symbol '{0}' in a cell")]
  UnknownSymbol(String),
  #[error("row for {nonterminal} has {found} cells, expected {expected}")]
  RaggedRow {
    nonterminal: String,
    found: usize,
    expected: usize,
  },
  #[error("no production {nonterminal} -> {rhs}")]
  UnknownProduction {
    nonterminal: String,
    rhs: String,
  },
}

pub fn encode(grammar: &Grammar, table: &LlTable) -> String {
  let columns = grammar.tokens.iter()
    .map(|(&token, name)| (name.as_str(), Symbol::Token(token)))
    .sorted()
    .chain(Some((END_MARK, Symbol::Eof)))
    .collect::<Vec<_>>();
  let rows = grammar.nt_prods.keys()
    .map(|&nt| (grammar.nt_name(nt), nt))
    .sorted()
    .collect::<Vec<_>>();

  let mut buf = String::new();
  writeln!(buf, ",{}", columns.iter().map(|(name, _)| *name).join(",")).unwrap();

  for (name, nt) in rows {
    write!(buf, "{}", name).unwrap();

    for &(_, symbol) in &columns {
      write!(buf, ",").unwrap();

      if let Some(prod_ix) = table.get(nt, symbol) {
        let rhs = grammar.prods[prod_ix].symbols.iter()
          .map(|&symbol| grammar.symbol_name(symbol))
          .join(" ");
        write!(buf, "{}", rhs).unwrap();
      }
    }

    writeln!(buf).unwrap();
  }

  buf
}

pub fn decode(grammar: &Grammar, text: &str) -> Result<LlTable, TabularError> {
  let mut lines = text.lines().filter(|line| !line.trim().is_empty());
  let header = lines.next().ok_or(TabularError::Empty)?;

  let mut columns = vec![];
  for name in header.split(',').skip(1) {
    let name = name.trim();
    let symbol = if name == END_MARK {
      Symbol::Eof
    } else {
      let token = grammar.token(name)
        .ok_or_else(|| TabularError::UnknownTerminal(name.to_owned()))?;
      Symbol::Token(token)
    };
    columns.push(symbol);
  }

  let mut table = LlTable::new(grammar.nts.len(), grammar.tokens.len());

  for line in lines {
    let mut cells = line.split(',');
    let name = cells.next().unwrap().trim();
    let nt = grammar.nonterminal(name)
      .ok_or_else(|| TabularError::UnknownNonterminal(name.to_owned()))?;
    let cells = cells.collect::<Vec<_>>();

    if cells.len() != columns.len() {
      return Err(TabularError::RaggedRow {
        nonterminal: name.to_owned(),
        found: cells.len(),
        expected: columns.len(),
      });
    }

    for (cell, &symbol) in cells.iter().zip(&columns) {
      let cell = cell.trim();
      if cell.is_empty() {
        continue;
      }

      let rhs = cell.split_whitespace()
        .map(|word| symbol_by_name(grammar, word))
        .collect::<Result<Vec<_>, _>>()?;
      let prod_ix = find_production(grammar, nt, &rhs)
        .ok_or_else(|| TabularError::UnknownProduction {
          nonterminal: name.to_owned(),
          rhs: cell.to_owned(),
        })?;

      table.set(nt, symbol, prod_ix);
    }
  }

  Ok(table)
}

fn symbol_by_name(grammar: &Grammar, name: &str) -> Result<Symbol, TabularError> {
  if name == EPSILON {
    return Ok(Symbol::Epsilon);
  }

  grammar.token(name).map(Symbol::Token)
    .or_else(|| grammar.nonterminal(name).map(Symbol::Nonterminal))
    .ok_or_else(|| TabularError::UnknownSymbol(name.to_owned()))
}

fn find_production(
  grammar: &Grammar,
  nt: NonterminalId,
  rhs: &[Symbol],
) -> Option<usize> {
  grammar.nt_prods[&nt].clone()
    .find(|&prod_ix| grammar.prods[prod_ix].symbols == rhs)
}
