//! grammar analysis and table-driven parsing.
//!
//! The `grammar` crate holds the symbol and production model, `ll` computes
//! FIRST/FOLLOW sets, builds predictive parse tables and runs the top-down
//! parser, and `lr` runs a bottom-up parser against a supplied
//! shift/reduce/goto table.

pub use grammar;
pub use ll;
pub use lr;
