//! compute FIRST and FOLLOW sets.

use bittyset::BitSet;
use grammar::{Grammar, Map, NonterminalId, Symbol, TokenId};

/// A set of terminals, possibly extended with the empty marker and the
/// end-of-input marker.
#[derive(Clone, Debug)]
pub struct TermSet {
  tokens: BitSet,
  epsilon: bool,
  eof: bool,
}

impl PartialEq for TermSet {
  fn eq(&self, other: &Self) -> bool {
    self.epsilon == other.epsilon
      && self.eof == other.eof
      && self.tokens.len() == other.tokens.len()
      && self.tokens.iter().all(|index| other.tokens.contains(index))
  }
}

impl Eq for TermSet {}

impl TermSet {
  pub fn new() -> Self {
    TermSet {
      tokens: BitSet::new(),
      epsilon: false,
      eof: false,
    }
  }

  pub fn insert(&mut self, symbol: Symbol) -> bool {
    match symbol {
      Symbol::Token(token) => self.tokens.insert(token.index()),
      Symbol::Epsilon => !std::mem::replace(&mut self.epsilon, true),
      Symbol::Eof => !std::mem::replace(&mut self.eof, true),
      Symbol::Nonterminal(_) => unreachable!(),
    }
  }

  pub fn contains(&self, symbol: Symbol) -> bool {
    match symbol {
      Symbol::Token(token) => self.tokens.contains(token.index()),
      Symbol::Epsilon => self.epsilon,
      Symbol::Eof => self.eof,
      Symbol::Nonterminal(_) => false,
    }
  }

  pub fn has_epsilon(&self) -> bool {
    self.epsilon
  }

  /// returns whether the set grew.
  pub fn union_with(&mut self, other: &TermSet) -> bool {
    let mut changed = self.union_tokens(other);

    if other.epsilon && !self.epsilon {
      self.epsilon = true;
      changed = true;
    }

    changed
  }

  /// union, leaving the empty marker out; returns whether the set grew.
  pub fn union_without_epsilon(&mut self, other: &TermSet) -> bool {
    self.union_tokens(other)
  }

  fn union_tokens(&mut self, other: &TermSet) -> bool {
    let old_len = self.tokens.len();
    self.tokens.union_with(&other.tokens);
    let mut changed = self.tokens.len() != old_len;

    if other.eof && !self.eof {
      self.eof = true;
      changed = true;
    }

    changed
  }

  pub fn len(&self) -> usize {
    self.tokens.len() + self.epsilon as usize + self.eof as usize
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// tokens in id order, then the end marker, then the empty marker.
  pub fn iter(&self) -> impl Iterator<Item = Symbol> + '_ {
    let eof = if self.eof { Some(Symbol::Eof) } else { None };
    let epsilon = if self.epsilon { Some(Symbol::Epsilon) } else { None };

    self.tokens.iter()
      .map(|index| Symbol::Token(TokenId::from_index(index)))
      .chain(eof)
      .chain(epsilon)
  }
}

impl Default for TermSet {
  fn default() -> Self {
    TermSet::new()
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ffn {
  pub first: Map<NonterminalId, TermSet>,
  pub follow: Map<NonterminalId, TermSet>,
}

impl Ffn {
  /// FIRST of a single symbol; total over the symbol vocabulary.
  pub fn first_of(&self, symbol: Symbol) -> TermSet {
    first_of_symbol(&self.first, symbol)
  }

  pub fn follow_of(&self, nt: NonterminalId) -> &TermSet {
    &self.follow[&nt]
  }

  pub fn nullable(&self, nt: NonterminalId) -> bool {
    self.first[&nt].has_epsilon()
  }
}

pub fn compute(grammar: &Grammar) -> Ffn {
  let first = compute_first(grammar);
  let follow = compute_follow(grammar, &first);

  Ffn { first, follow }
}

fn first_of_symbol(first: &Map<NonterminalId, TermSet>, symbol: Symbol) -> TermSet {
  match symbol {
    Symbol::Nonterminal(nt) => first[&nt].clone(),
    terminal => {
      let mut set = TermSet::new();
      set.insert(terminal);
      set
    }
  }
}

/// FIRST of a sequence of symbols: accumulate FIRST of each symbol from the
/// left, stopping at the first one that cannot derive the empty sequence;
/// an all-nullable (or empty) sequence gets the empty marker.
pub fn first_of_sequence(
  first: &Map<NonterminalId, TermSet>,
  symbols: &[Symbol],
) -> TermSet {
  let mut set = TermSet::new();

  for &symbol in symbols {
    let symbol_first = first_of_symbol(first, symbol);
    set.union_with(&symbol_first);

    if !symbol_first.has_epsilon() {
      return set;
    }
  }

  set.insert(Symbol::Epsilon);
  set
}

fn compute_first(grammar: &Grammar) -> Map<NonterminalId, TermSet> {
  let mut first = Map::<NonterminalId, TermSet>::new();

  for &nt in grammar.nt_prods.keys() {
    first.insert(nt, TermSet::new());
  }

  loop {
    let mut changed = false;

    for (nt, range) in &grammar.nt_prods {
      for prod in &grammar.prods[range.clone()] {
        let prod_first = first_of_sequence(&first, &prod.symbols);
        changed |= first.get_mut(nt).unwrap().union_with(&prod_first);
      }
    }

    if !changed {
      break;
    }
  }

  first
}

fn compute_follow(
  grammar: &Grammar,
  first: &Map<NonterminalId, TermSet>,
) -> Map<NonterminalId, TermSet> {
  let mut follow = Map::<NonterminalId, TermSet>::new();

  for &nt in grammar.nt_prods.keys() {
    follow.insert(nt, TermSet::new());
  }

  follow.get_mut(&grammar.start()).unwrap().insert(Symbol::Eof);

  loop {
    let mut changed = false;

    for (nt, range) in &grammar.nt_prods {
      for prod in &grammar.prods[range.clone()] {
        // what can follow the suffix seen so far, scanning right to left
        let mut trailer = follow[nt].clone();

        for &symbol in prod.symbols.iter().rev() {
          match symbol {
            Symbol::Nonterminal(s) => {
              changed |= follow.get_mut(&s).unwrap().union_with(&trailer);

              let symbol_first = &first[&s];
              if symbol_first.has_epsilon() {
                trailer.union_without_epsilon(symbol_first);
              } else {
                trailer = symbol_first.clone();
              }
            }
            terminal => {
              let mut set = TermSet::new();
              set.insert(terminal);
              trailer = set;
            }
          }
        }
      }
    }

    if !changed {
      break;
    }
  }

  follow
}
