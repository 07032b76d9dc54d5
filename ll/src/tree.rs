use std::fmt;
use grammar::{Grammar, Symbol};

/// index into the tree's node arena; also the node's creation order
/// within one parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
  pub fn id(self) -> u32 {
    self.0
  }

  pub fn index(self) -> usize {
    self.0 as usize
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
  pub symbol: Symbol,
  /// literal text of the matched token, for terminal leaves.
  pub text: Option<String>,
  pub children: Vec<NodeId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseTree {
  nodes: Vec<Node>,
}

impl ParseTree {
  pub(crate) fn new(root: Symbol) -> Self {
    let mut tree = ParseTree { nodes: vec![] };
    tree.add(root);
    tree
  }

  pub(crate) fn add(&mut self, symbol: Symbol) -> NodeId {
    let id = NodeId(self.nodes.len() as u32);
    self.nodes.push(Node {
      symbol,
      text: None,
      children: vec![],
    });
    id
  }

  pub(crate) fn attach(&mut self, parent: NodeId, child: NodeId) {
    self.nodes[parent.index()].children.push(child);
  }

  pub(crate) fn set_text(&mut self, id: NodeId, text: &str) {
    self.nodes[id.index()].text = Some(text.to_owned());
  }

  pub fn root(&self) -> NodeId {
    NodeId(0)
  }

  pub fn node(&self, id: NodeId) -> &Node {
    &self.nodes[id.index()]
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  /// leaves in left-to-right derivation order.
  pub fn leaves(&self) -> Vec<NodeId> {
    let mut leaves = vec![];
    let mut stack = vec![self.root()];

    while let Some(id) = stack.pop() {
      let node = self.node(id);

      if node.children.is_empty() {
        leaves.push(id);
      } else {
        stack.extend(node.children.iter().rev());
      }
    }

    leaves
  }

  pub fn fmt(
    &self,
    grammar: &Grammar,
    f: &mut impl fmt::Write,
  ) -> fmt::Result {
    self.fmt_node(grammar, f, self.root(), 0)
  }

  pub fn to_string(&self, grammar: &Grammar) -> String {
    let mut buf = String::new();
    self.fmt(grammar, &mut buf).unwrap();
    buf
  }

  fn fmt_node(
    &self,
    grammar: &Grammar,
    f: &mut impl fmt::Write,
    id: NodeId,
    depth: usize,
  ) -> fmt::Result {
    let node = self.node(id);
    let label = node.text.as_ref()
      .map(String::as_str)
      .unwrap_or_else(|| grammar.symbol_name(node.symbol));

    writeln!(f, "{:indent$}{}", "", label, indent = depth * 2)?;

    for &child in &node.children {
      self.fmt_node(grammar, f, child, depth + 1)?;
    }

    Ok(())
  }
}
