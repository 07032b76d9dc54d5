//! an externally supplied shift/reduce/goto table. The table carries its
//! own symbol vocabulary, so it can be built and used without a grammar.

use grammar::{BiMap, Map, NonterminalId, NonterminalIdGen, Symbol, TokenId, TokenIdGen, END_MARK, EPSILON};
use itertools::Itertools;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
  Shift(u32),
  Reduce(u32),
  Accept,
}

#[derive(Debug, Clone)]
pub struct SrTable {
  tokens: BiMap<TokenId, String>,
  nts: BiMap<NonterminalId, String>,
  /// per-state action row, keyed by token or end marker.
  actions: Vec<Map<Symbol, Action>>,
  /// per-state goto row for nonterminal transitions after a reduction.
  gotos: Vec<Map<NonterminalId, u32>>,
  /// production number -> (left-hand side, length of the right-hand side)
  prods: Vec<(NonterminalId, usize)>,
}

impl SrTable {
  pub fn builder() -> SrTableBuilder {
    SrTableBuilder::new()
  }

  pub fn action(&self, state: u32, symbol: Symbol) -> Option<Action> {
    self.actions.get(state as usize)?.get(&symbol).copied()
  }

  pub fn goto(&self, state: u32, nt: NonterminalId) -> Option<u32> {
    self.gotos.get(state as usize)?.get(&nt).copied()
  }

  pub fn production(&self, prod: u32) -> (NonterminalId, usize) {
    self.prods[prod as usize]
  }

  pub fn resolve(&self, name: &str) -> Option<TokenId> {
    self.tokens.get_by_right(name).copied()
  }

  pub fn token_name(&self, token: TokenId) -> &str {
    self.tokens.get_by_left(&token).map(String::as_str).unwrap_or(END_MARK)
  }

  pub fn nt_name(&self, nt: NonterminalId) -> &str {
    self.nts.get_by_left(&nt).map(String::as_str).unwrap_or("?")
  }

  /// names of every symbol the state has an entry for, sorted.
  pub fn expected(&self, state: u32) -> Vec<String> {
    let actions = self.actions.get(state as usize).into_iter()
      .flat_map(|row| row.keys())
      .map(move |&symbol| match symbol {
        Symbol::Token(token) => self.token_name(token).to_owned(),
        Symbol::Nonterminal(nt) => self.nt_name(nt).to_owned(),
        Symbol::Epsilon => EPSILON.to_owned(),
        Symbol::Eof => END_MARK.to_owned(),
      });
    let gotos = self.gotos.get(state as usize).into_iter()
      .flat_map(|row| row.keys())
      .map(move |&nt| self.nt_name(nt).to_owned());

    actions.chain(gotos).sorted().collect()
  }
}

pub struct SrTableBuilder {
  tokens: BiMap<TokenId, String>,
  token_id_gen: TokenIdGen,
  nts: BiMap<NonterminalId, String>,
  nt_id_gen: NonterminalIdGen,
  actions: Vec<Map<Symbol, Action>>,
  gotos: Vec<Map<NonterminalId, u32>>,
  prods: Vec<(NonterminalId, usize)>,
}

impl SrTableBuilder {
  pub fn new() -> Self {
    SrTableBuilder {
      tokens: BiMap::new(),
      token_id_gen: TokenIdGen::default(),
      nts: BiMap::new(),
      nt_id_gen: NonterminalIdGen::default(),
      actions: vec![],
      gotos: vec![],
      prods: vec![],
    }
  }

  pub fn token(&mut self, name: &str) -> TokenId {
    if let Some(&token) = self.tokens.get_by_right(name) {
      return token;
    }

    let token = self.token_id_gen.gen();
    self.tokens.insert(token, name.to_owned());
    token
  }

  pub fn nonterminal(&mut self, name: &str) -> NonterminalId {
    if let Some(&nt) = self.nts.get_by_right(name) {
      return nt;
    }

    let nt = self.nt_id_gen.gen();
    self.nts.insert(nt, name.to_owned());
    nt
  }

  /// registers a production's arity; returns its production number.
  pub fn production(&mut self, lhs: NonterminalId, rhs_len: usize) -> u32 {
    self.prods.push((lhs, rhs_len));
    self.prods.len() as u32 - 1
  }

  pub fn shift(&mut self, state: u32, token: TokenId, to: u32) -> &mut Self {
    self.action_row(state).insert(Symbol::Token(token), Action::Shift(to));
    self
  }

  pub fn reduce(&mut self, state: u32, lookahead: Symbol, prod: u32) -> &mut Self {
    self.action_row(state).insert(lookahead, Action::Reduce(prod));
    self
  }

  pub fn accept(&mut self, state: u32, lookahead: Symbol) -> &mut Self {
    self.action_row(state).insert(lookahead, Action::Accept);
    self
  }

  pub fn goto(&mut self, state: u32, nt: NonterminalId, to: u32) -> &mut Self {
    let state = state as usize;
    if self.gotos.len() <= state {
      self.gotos.resize_with(state + 1, Map::new);
    }

    self.gotos[state].insert(nt, to);
    self
  }

  pub fn build(self) -> SrTable {
    SrTable {
      tokens: self.tokens,
      nts: self.nts,
      actions: self.actions,
      gotos: self.gotos,
      prods: self.prods,
    }
  }

  fn action_row(&mut self, state: u32) -> &mut Map<Symbol, Action> {
    let state = state as usize;
    if self.actions.len() <= state {
      self.actions.resize_with(state + 1, Map::new);
    }

    &mut self.actions[state]
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn builder_interns_and_registers() {
    let mut builder = SrTable::builder();
    let a = builder.token("a");
    let a_again = builder.token("a");
    let s = builder.nonterminal("S");
    let prod = builder.production(s, 2);

    builder.shift(0, a, 1)
      .reduce(1, Symbol::Eof, prod)
      .goto(0, s, 2)
      .accept(2, Symbol::Eof);
    let table = builder.build();

    assert_eq!(a, a_again);
    assert_eq!(table.action(0, Symbol::Token(a)), Some(Action::Shift(1)));
    assert_eq!(table.action(1, Symbol::Eof), Some(Action::Reduce(prod)));
    assert_eq!(table.action(2, Symbol::Eof), Some(Action::Accept));
    assert_eq!(table.goto(0, s), Some(2));
    assert_eq!(table.goto(1, s), None);
    assert_eq!(table.production(prod), (s, 2));
    assert_eq!(table.resolve("a"), Some(a));
    assert_eq!(table.resolve("b"), None);
  }

  #[test]
  fn expected_lists_every_entry_of_a_state() {
    let mut builder = SrTable::builder();
    let int = builder.token("int");
    let lparen = builder.token("(");
    let e = builder.nonterminal("E");

    builder.shift(0, int, 5)
      .shift(0, lparen, 4)
      .goto(0, e, 1);
    let table = builder.build();

    assert_eq!(table.expected(0), vec!["(", "E", "int"]);
    assert_eq!(table.expected(7), Vec::<String>::new());
  }
}
