use crate::lexer::{Token, TokenKind};
use crate::span::Span;
use crate::typeck::types::ExprType;

/// Index of a node inside its [`ExprTree`] arena.
pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq)]
pub struct ExprNode {
    /// Operand (identifier / literal / `null`) or binary operator.
    pub token: Token,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
    /// Filled in by the type checker.
    pub ty: Option<ExprType>,
    /// Operand must be converted from i32 to f64 after evaluation.
    pub widen: bool,
}

impl ExprNode {
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Binary expression tree stored as an arena; every node except the root has
/// exactly one parent.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprTree {
    nodes: Vec<ExprNode>,
    root: NodeId,
}

impl ExprTree {
    pub(crate) fn new(nodes: Vec<ExprNode>, root: NodeId) -> Self {
        Self { nodes, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &ExprNode {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut ExprNode {
        &mut self.nodes[id]
    }

    /// Number of nodes reachable from the root.
    pub fn len(&self) -> usize {
        self.postorder().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node ids with children before parents, left before right.
    ///
    /// Walks with an explicit stack; a left-leaning chain is as deep as it
    /// has operators.
    pub fn postorder(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(self.root, false)];
        while let Some((id, expanded)) = stack.pop() {
            let node = &self.nodes[id];
            if expanded {
                out.push(id);
                continue;
            }
            stack.push((id, true));
            if let Some(r) = node.right {
                stack.push((r, false));
            }
            if let Some(l) = node.left {
                stack.push((l, false));
            }
        }
        out
    }

    /// Span from the leftmost to the rightmost token of the expression.
    pub fn span(&self) -> Span {
        self.postorder()
            .into_iter()
            .map(|id| self.nodes[id].token.span)
            .reduce(Span::to)
            .unwrap_or_else(Span::dummy)
    }

    pub fn root_type(&self) -> Option<ExprType> {
        self.nodes[self.root].ty
    }

    /// Fully parenthesised prefix rendering, e.g. `(+ 1 (* 2 3))`.
    pub fn render(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        for id in self.postorder() {
            let node = &self.nodes[id];
            let text = match (node.left, node.right) {
                (Some(_), Some(_)) => {
                    let right = parts.pop().unwrap_or_default();
                    let left = parts.pop().unwrap_or_default();
                    format!("({} {left} {right})", node.token.lexeme)
                }
                _ if node.token.kind == TokenKind::Null => "null".to_string(),
                _ => node.token.lexeme.clone(),
            };
            parts.push(text);
        }
        parts.pop().unwrap_or_default()
    }
}
