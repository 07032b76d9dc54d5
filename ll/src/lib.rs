pub mod ffn;
pub mod table;
pub mod tree;
pub mod parser;
pub mod tabular;

pub use ffn::{compute, Ffn, TermSet};
pub use table::{Conflict, LlTable};
pub use tree::{Node, NodeId, ParseTree};
pub use parser::{parse, parse_with_trace, ParseError, Step};
