//! end-to-end tests for the predictive pipeline: grammar -> FIRST/FOLLOW
//! -> parse table -> lexer -> parser.

use pretty_assertions::assert_eq;
use parsetab::grammar::{lexer, Grammar, GrammarBuilder, Symbol};
use parsetab::ll::{self, parser, tabular};

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

#[test]
fn full_pipeline_parses_nested_input() {
  let grammar = arith();
  let ffn = ll::compute(&grammar);
  let table = ll::table::build_strict(&grammar, &ffn).unwrap();

  let tokens = lexer::tokenize(&grammar, "int * ( int + int )")
    .collect::<Result<Vec<_>, _>>()
    .unwrap();
  let tree = parser::parse(&grammar, &table, &tokens).unwrap();

  let words = tree.leaves().into_iter()
    .filter_map(|id| tree.node(id).text.clone())
    .collect::<Vec<_>>();
  assert_eq!(words, vec!["int", "*", "(", "int", "+", "int", ")"]);
}

#[test]
fn parse_tree_renders_as_indented_text() {
  let grammar = arith();
  let ffn = ll::compute(&grammar);
  let table = ll::table::build_strict(&grammar, &ffn).unwrap();

  let tokens = lexer::tokenize(&grammar, "int")
    .collect::<Result<Vec<_>, _>>()
    .unwrap();
  let tree = parser::parse(&grammar, &table, &tokens).unwrap();

  assert_eq!(tree.to_string(&grammar), "\
E
  T
    int
    Y
      ε
  X
    ε
");
}

#[test]
fn table_survives_a_text_round_trip() {
  let grammar = arith();
  let ffn = ll::compute(&grammar);
  let table = ll::table::build_strict(&grammar, &ffn).unwrap();

  let text = tabular::encode(&grammar, &table);
  assert_eq!(tabular::decode(&grammar, &text).unwrap(), table);
}

#[test]
fn syntax_errors_surface_as_values() {
  let grammar = arith();
  let ffn = ll::compute(&grammar);
  let table = ll::table::build_strict(&grammar, &ffn).unwrap();

  let tokens = lexer::tokenize(&grammar, ") (")
    .collect::<Result<Vec<_>, _>>()
    .unwrap();
  let err = parser::parse(&grammar, &table, &tokens).unwrap_err();

  assert_eq!(err, parser::ParseError::NoRule {
    nonterminal: "E".to_owned(),
    found: ")".to_owned(),
  });
}
