pub mod grammar;
pub mod lexer;

pub use self::grammar::*;
pub use self::lexer::*;

// Insertion order of these maps is load-bearing: the start nonterminal is
// the first key of a grammar, and conflicts must be reported in a stable
// order.
pub type Map<K, V> = indexmap::IndexMap<K, V>;
pub type Set<T> = indexmap::IndexSet<T>;
pub type BiMap<L, R> = bimap::BiHashMap<L, R>;
