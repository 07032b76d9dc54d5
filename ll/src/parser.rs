//! a predictive parser: a table-driven pushdown machine that builds the
//! derivation tree while it consumes the input.

use grammar::{Grammar, NonterminalId, Symbol, Token, END_MARK};
use thiserror::Error;
use crate::table::LlTable;
use crate::tree::{NodeId, ParseTree};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
  #[error("syntax error: no rule for {nonterminal} on '{found}'")]
  NoRule {
    nonterminal: String,
    found: String,
  },
  #[error("syntax error: expected '{expected}', found '{found}'")]
  Mismatch {
    expected: String,
    found: String,
  },
  #[error("symbol stack exhausted before the end marker")]
  StackExhausted,
}

/// one transition of the machine, for callers that opt into tracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<'input> {
  Match {
    symbol: Symbol,
    text: &'input str,
  },
  Expand {
    nonterminal: NonterminalId,
    production: usize,
  },
  Accept,
}

pub fn parse(
  grammar: &Grammar,
  table: &LlTable,
  tokens: &[Token<'_>],
) -> Result<ParseTree, ParseError> {
  parse_with_trace(grammar, table, tokens, |_| ())
}

pub fn parse_with_trace<'input>(
  grammar: &Grammar,
  table: &LlTable,
  tokens: &[Token<'input>],
  mut trace: impl FnMut(Step<'input>),
) -> Result<ParseTree, ParseError> {
  let start = Symbol::Nonterminal(grammar.start());
  let mut tree = ParseTree::new(start);
  // symbol and node stacks, popped in lockstep; the bottom pair carries
  // the end marker
  let mut stack: Vec<(Symbol, NodeId)> = vec![
    (Symbol::Eof, tree.root()),
    (start, tree.root()),
  ];
  let mut pos = 0;

  loop {
    let (top, node) = match stack.pop() {
      Some(top) => top,
      None => return Err(ParseError::StackExhausted),
    };
    let lookahead = match tokens.get(pos) {
      Some(token) => Symbol::Token(token.kind),
      None => Symbol::Eof,
    };

    match top {
      Symbol::Eof if lookahead == Symbol::Eof => {
        trace(Step::Accept);
        return Ok(tree);
      }
      symbol if symbol == lookahead => {
        let token = &tokens[pos];
        tree.set_text(node, token.text);
        trace(Step::Match { symbol, text: token.text });
        pos += 1;
      }
      Symbol::Nonterminal(nt) => {
        let prod_ix = match table.get(nt, lookahead) {
          Some(prod_ix) => prod_ix,
          None => {
            return Err(ParseError::NoRule {
              nonterminal: grammar.nt_name(nt).to_owned(),
              found: found_text(tokens, pos),
            });
          }
        };

        trace(Step::Expand { nonterminal: nt, production: prod_ix });

        let prod = &grammar.prods[prod_ix];
        if let [Symbol::Epsilon] = prod.symbols[..] {
          // an empty derivation leaves an explicit ε leaf and pushes
          // nothing
          let leaf = tree.add(Symbol::Epsilon);
          tree.attach(node, leaf);
        } else {
          let children = prod.symbols.iter()
            .map(|&symbol| {
              let child = tree.add(symbol);
              tree.attach(node, child);
              child
            })
            .collect::<Vec<_>>();

          for (&symbol, &child) in prod.symbols.iter().zip(children.iter()).rev() {
            stack.push((symbol, child));
          }
        }
      }
      expected => {
        return Err(ParseError::Mismatch {
          expected: grammar.symbol_name(expected).to_owned(),
          found: found_text(tokens, pos),
        });
      }
    }
  }
}

fn found_text(tokens: &[Token<'_>], pos: usize) -> String {
  tokens.get(pos)
    .map(|token| token.text.to_owned())
    .unwrap_or_else(|| END_MARK.to_owned())
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;
  use grammar::{lexer, GrammarBuilder};
  use crate::{ffn, table};

  fn arith() -> Grammar {
    let mut builder = GrammarBuilder::new();
    let int = builder.token("int");
    let plus = builder.token("+");
    let star = builder.token("*");
    let lparen = builder.token("(");
    let rparen = builder.token(")");
    let e = builder.nonterminal("E");
    let x = builder.nonterminal("X");
    let t = builder.nonterminal("T");
    let y = builder.nonterminal("Y");

    builder.rule(e, &[Symbol::Nonterminal(t), Symbol::Nonterminal(x)]);
    builder.rule(x, &[Symbol::Token(plus), Symbol::Nonterminal(e)]);
    builder.rule(x, &[]);
    builder.rule(t, &[Symbol::Token(lparen), Symbol::Nonterminal(e), Symbol::Token(rparen)]);
    builder.rule(t, &[Symbol::Token(int), Symbol::Nonterminal(y)]);
    builder.rule(y, &[Symbol::Token(star), Symbol::Nonterminal(t)]);
    builder.rule(y, &[]);

    builder.build().unwrap()
  }

  fn parse_arith(input: &str) -> Result<(Grammar, ParseTree), ParseError> {
    let grammar = arith();
    let ffn = ffn::compute(&grammar);
    let (table, conflicts) = table::build(&grammar, &ffn);
    assert!(conflicts.is_empty());

    let tokens = lexer::tokenize(&grammar, input)
      .collect::<Result<Vec<_>, _>>()
      .unwrap();
    let tree = parse(&grammar, &table, &tokens)?;

    Ok((grammar, tree))
  }

  fn leaf_labels(grammar: &Grammar, tree: &ParseTree) -> Vec<String> {
    tree.leaves().into_iter()
      .map(|id| {
        let node = tree.node(id);
        node.text.clone()
          .unwrap_or_else(|| grammar.symbol_name(node.symbol).to_owned())
      })
      .collect()
  }

  #[test]
  fn leaves_spell_the_input() {
    let (grammar, tree) = parse_arith("int + int").unwrap();

    assert_eq!(
      leaf_labels(&grammar, &tree),
      vec!["int", "ε", "+", "int", "ε", "ε"]
    );
  }

  #[test]
  fn tree_structure_follows_the_derivation() {
    let (grammar, tree) = parse_arith("int + int").unwrap();

    let root = tree.node(tree.root());
    assert_eq!(root.symbol, Symbol::Nonterminal(grammar.start()));

    let child_names = root.children.iter()
      .map(|&id| grammar.symbol_name(tree.node(id).symbol))
      .collect::<Vec<_>>();
    assert_eq!(child_names, vec!["T", "X"]);
  }

  #[test]
  fn matched_terminals_carry_their_text() {
    let (_, tree) = parse_arith("int + int").unwrap();

    let texts = tree.leaves().into_iter()
      .filter_map(|id| tree.node(id).text.clone())
      .collect::<Vec<_>>();
    assert_eq!(texts, vec!["int", "+", "int"]);
  }

  #[test]
  fn nullable_expansion_emits_an_epsilon_leaf() {
    let mut builder = GrammarBuilder::new();
    let a = builder.token("a");
    let b = builder.token("b");
    let s = builder.nonterminal("S");
    let opt = builder.nonterminal("B");
    builder.rule(s, &[Symbol::Token(a), Symbol::Nonterminal(opt)]);
    builder.rule(opt, &[Symbol::Token(b)]);
    builder.rule(opt, &[]);
    let grammar = builder.build().unwrap();

    let ffn = ffn::compute(&grammar);
    let (table, _) = table::build(&grammar, &ffn);
    let tokens = lexer::tokenize(&grammar, "a")
      .collect::<Result<Vec<_>, _>>()
      .unwrap();
    let tree = parse(&grammar, &table, &tokens).unwrap();

    assert_eq!(leaf_labels(&grammar, &tree), vec!["a", "ε"]);

    // the ε leaf is a real node under B, not an omission
    let b_node = tree.node(tree.node(tree.root()).children[1]);
    assert_eq!(b_node.children.len(), 1);
    assert_eq!(tree.node(b_node.children[0]).symbol, Symbol::Epsilon);
  }

  #[test]
  fn node_ids_count_up_in_creation_order() {
    let (_, tree) = parse_arith("int + int").unwrap();

    assert_eq!(tree.len(), 14);
    assert_eq!(tree.root().index(), 0);

    for id in tree.leaves() {
      assert!(id.index() < tree.len());
    }
  }

  #[test]
  fn missing_table_entry_is_a_syntax_error() {
    let err = parse_arith("int +").unwrap_err();

    assert_eq!(err, ParseError::NoRule {
      nonterminal: "E".to_owned(),
      found: "$".to_owned(),
    });
  }

  #[test]
  fn unmatched_terminal_is_a_syntax_error() {
    let err = parse_arith("( int").unwrap_err();

    assert_eq!(err, ParseError::Mismatch {
      expected: ")".to_owned(),
      found: "$".to_owned(),
    });
  }

  #[test]
  fn trace_reports_every_transition() {
    let grammar = arith();
    let ffn = ffn::compute(&grammar);
    let (table, _) = table::build(&grammar, &ffn);
    let tokens = lexer::tokenize(&grammar, "int")
      .collect::<Result<Vec<_>, _>>()
      .unwrap();

    let mut steps = vec![];
    parse_with_trace(&grammar, &table, &tokens, |step| steps.push(step)).unwrap();

    let int = grammar.token("int").unwrap();
    let e = grammar.nonterminal("E").unwrap();
    let x = grammar.nonterminal("X").unwrap();
    let t = grammar.nonterminal("T").unwrap();
    let y = grammar.nonterminal("Y").unwrap();

    assert_eq!(steps, vec![
      Step::Expand { nonterminal: e, production: 0 },
      Step::Expand { nonterminal: t, production: 4 },
      Step::Match { symbol: Symbol::Token(int), text: "int" },
      Step::Expand { nonterminal: y, production: 6 },
      Step::Expand { nonterminal: x, production: 2 },
      Step::Accept,
    ]);
  }
}
