use std::ops::Range;
use thiserror::Error;
use crate::{BiMap, Map};

/// name of the empty-production marker.
pub const EPSILON: &str = "ε";
/// name of the end-of-input marker.
pub const END_MARK: &str = "$";

#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
pub struct TokenId(u32);

#[derive(Default)]
pub struct TokenIdGen(u32);

impl TokenId {
  pub fn id(self) -> u32 {
    self.0
  }

  pub fn index(self) -> usize {
    self.0 as usize
  }

  pub fn from_index(index: usize) -> Self {
    TokenId(index as u32)
  }
}

impl TokenIdGen {
  pub fn gen(&mut self) -> TokenId {
    let i = self.0;
    self.0 += 1;
    TokenId(i)
  }
}

#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
pub struct NonterminalId(u32);

#[derive(Default)]
pub struct NonterminalIdGen(u32);

impl NonterminalId {
  pub fn id(self) -> u32 {
    self.0
  }

  pub fn index(self) -> usize {
    self.0 as usize
  }
}

impl NonterminalIdGen {
  pub fn gen(&mut self) -> NonterminalId {
    let i = self.0;
    self.0 += 1;
    NonterminalId(i)
  }
}

/// A grammar symbol. The empty-production marker and the end-of-input
/// marker are their own variants, so they can never be confused with a
/// declared terminal or nonterminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
  Nonterminal(NonterminalId),
  Token(TokenId),
  Epsilon,
  Eof,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
  pub nt: NonterminalId,
  /// the empty derivation is the single-element sequence `[Epsilon]`.
  pub symbols: Vec<Symbol>,
}

#[derive(Debug, Clone)]
pub struct Grammar {
  pub prods: Vec<Production>,
  /// per-nonterminal slice of `prods`; the first key is the start
  /// nonterminal.
  pub nt_prods: Map<NonterminalId, Range<usize>>,
  pub nts: BiMap<NonterminalId, String>,
  pub tokens: BiMap<TokenId, String>,
}

impl Grammar {
  pub fn start(&self) -> NonterminalId {
    *self.nt_prods.keys().next().unwrap()
  }

  pub fn prods_of(&self, nt: NonterminalId) -> &[Production] {
    &self.prods[self.nt_prods[&nt].clone()]
  }

  pub fn token(&self, name: &str) -> Option<TokenId> {
    self.tokens.get_by_right(name).copied()
  }

  pub fn nonterminal(&self, name: &str) -> Option<NonterminalId> {
    self.nts.get_by_right(name).copied()
  }

  pub fn token_name(&self, token: TokenId) -> &str {
    self.tokens.get_by_left(&token).map(String::as_str).unwrap_or(END_MARK)
  }

  pub fn nt_name(&self, nt: NonterminalId) -> &str {
    self.nts.get_by_left(&nt).map(String::as_str).unwrap_or("?")
  }

  pub fn symbol_name(&self, symbol: Symbol) -> &str {
    match symbol {
      Symbol::Nonterminal(nt) => self.nt_name(nt),
      Symbol::Token(token) => self.token_name(token),
      Symbol::Epsilon => EPSILON,
      Symbol::Eof => END_MARK,
    }
  }

  pub fn production_text(&self, prod_ix: usize) -> String {
    let prod = &self.prods[prod_ix];
    let mut buf = format!("{} ->", self.nt_name(prod.nt));

    for &symbol in &prod.symbols {
      buf.push(' ');
      buf.push_str(self.symbol_name(symbol));
    }

    buf
  }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GrammarError {
  #[error("grammar has no rules")]
  Empty,
  #[error("'{0}' is declared as both a terminal and a nonterminal")]
  DuplicateSymbol(String),
  #[error("a rule of '{0}' mixes ε with other symbols")]
  MisplacedEpsilon(String),
  #[error("a rule of '{0}' contains the end marker")]
  EndMarkerInRule(String),
  #[error("'{0}' appears in a rule but has no rules of its own")]
  UndefinedNonterminal(String),
}

/// Interns symbol names and collects rules; the first nonterminal that
/// receives a rule becomes the start symbol.
pub struct GrammarBuilder {
  tokens: BiMap<TokenId, String>,
  token_id_gen: TokenIdGen,
  nts: BiMap<NonterminalId, String>,
  nt_id_gen: NonterminalIdGen,
  rules: Vec<(NonterminalId, Vec<Symbol>)>,
}

impl GrammarBuilder {
  pub fn new() -> Self {
    GrammarBuilder {
      tokens: BiMap::new(),
      token_id_gen: TokenIdGen::default(),
      nts: BiMap::new(),
      nt_id_gen: NonterminalIdGen::default(),
      rules: vec![],
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

  /// an empty `rhs` is the empty derivation, stored as `[Epsilon]`.
  pub fn rule(&mut self, nt: NonterminalId, rhs: &[Symbol]) -> &mut Self {
    let symbols = if rhs.is_empty() {
      vec![Symbol::Epsilon]
    } else {
      rhs.to_vec()
    };

    self.rules.push((nt, symbols));
    self
  }

  pub fn build(self) -> Result<Grammar, GrammarError> {
    if self.rules.is_empty() {
      return Err(GrammarError::Empty);
    }

    for name in self.tokens.right_values() {
      if self.nts.get_by_right(name).is_some() {
        return Err(GrammarError::DuplicateSymbol(name.clone()));
      }
    }

    let mut grouped = Map::<NonterminalId, Vec<Vec<Symbol>>>::new();
    for (nt, symbols) in self.rules {
      grouped.entry(nt).or_insert_with(Vec::new).push(symbols);
    }

    for (&nt, alts) in &grouped {
      let name = || self.nts.get_by_left(&nt).unwrap().clone();

      for rhs in alts {
        for &symbol in rhs {
          match symbol {
            Symbol::Epsilon if rhs.len() != 1 => {
              return Err(GrammarError::MisplacedEpsilon(name()));
            }
            Symbol::Eof => {
              return Err(GrammarError::EndMarkerInRule(name()));
            }
            Symbol::Nonterminal(r) if !grouped.contains_key(&r) => {
              return Err(GrammarError::UndefinedNonterminal(
                self.nts.get_by_left(&r).unwrap().clone()));
            }
            _ => {}
          }
        }
      }
    }

    let mut prods = vec![];
    let mut nt_prods = Map::new();

    for (nt, alts) in grouped {
      let start = prods.len();

      for symbols in alts {
        prods.push(Production { nt, symbols });
      }

      nt_prods.insert(nt, start..prods.len());
    }

    Ok(Grammar {
      prods,
      nt_prods,
      nts: self.nts,
      tokens: self.tokens,
    })
  }
}
