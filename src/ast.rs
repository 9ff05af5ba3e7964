use std::fmt;

use serde::{Deserialize, Serialize};

// =========================================================================
// 0. Identifiers and spans
// =========================================================================

/// Stable index of a node slot inside a [`Tree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Half-open `[start, end)` byte span in the original source text.
///
/// Spans are advisory: the parser fills them in and the (out-of-scope)
/// text regenerator consumes them. Nodes fabricated by a mutator carry
/// [`Span::SYNTHETIC`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub const SYNTHETIC: Span = Span { start: 0, end: 0 };
}

// =========================================================================
// 1. Operator sets
// =========================================================================
// One enum per operator-bearing expression category. `ALL` drives the
// same-category replacement pick; `as_str` gives the surface symbol.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Shl,
    Shr,
    UShr,
    BitAnd,
    BitOr,
    BitXor,
    In,
    InstanceOf,
}

impl BinaryOp {
    pub const ALL: &'static [BinaryOp] = &[
        BinaryOp::Add,
        BinaryOp::Sub,
        BinaryOp::Mul,
        BinaryOp::Div,
        BinaryOp::Rem,
        BinaryOp::Pow,
        BinaryOp::Eq,
        BinaryOp::NotEq,
        BinaryOp::StrictEq,
        BinaryOp::StrictNotEq,
        BinaryOp::Lt,
        BinaryOp::LtEq,
        BinaryOp::Gt,
        BinaryOp::GtEq,
        BinaryOp::Shl,
        BinaryOp::Shr,
        BinaryOp::UShr,
        BinaryOp::BitAnd,
        BinaryOp::BitOr,
        BinaryOp::BitXor,
        BinaryOp::In,
        BinaryOp::InstanceOf,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Pow => "**",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::StrictEq => "===",
            BinaryOp::StrictNotEq => "!==",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::UShr => ">>>",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::In => "in",
            BinaryOp::InstanceOf => "instanceof",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalOp {
    And,
    Or,
    Nullish,
}

impl LogicalOp {
    pub const ALL: &'static [LogicalOp] = &[LogicalOp::And, LogicalOp::Or, LogicalOp::Nullish];

    pub fn as_str(self) -> &'static str {
        match self {
            LogicalOp::And => "&&",
            LogicalOp::Or => "||",
            LogicalOp::Nullish => "??",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Minus,
    Plus,
    Not,
    BitNot,
    TypeOf,
    Void,
    Delete,
}

impl UnaryOp {
    pub const ALL: &'static [UnaryOp] = &[
        UnaryOp::Minus,
        UnaryOp::Plus,
        UnaryOp::Not,
        UnaryOp::BitNot,
        UnaryOp::TypeOf,
        UnaryOp::Void,
        UnaryOp::Delete,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Minus => "-",
            UnaryOp::Plus => "+",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
            UnaryOp::TypeOf => "typeof",
            UnaryOp::Void => "void",
            UnaryOp::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateOp {
    Inc,
    Dec,
}

impl UpdateOp {
    pub const ALL: &'static [UpdateOp] = &[UpdateOp::Inc, UpdateOp::Dec];

    pub fn as_str(self) -> &'static str {
        match self {
            UpdateOp::Inc => "++",
            UpdateOp::Dec => "--",
        }
    }
}

// =========================================================================
// 2. Node model
// =========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeclKind {
    Var,
    Let,
    Const,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FunctionKind {
    Declaration,
    Expression,
    Arrow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassKind {
    Declaration,
    Expression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MethodKind {
    Constructor,
    Method,
    Get,
    Set,
}

/// One syntax-tree node. Children are arena indices, so a `Node` value is
/// only meaningful relative to the [`Tree`] that owns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    // ── root ──
    Program { body: Vec<NodeId> },

    // ── statements ──
    ExprStmt { expr: NodeId },
    VarDecl { kind: DeclKind, declarators: Vec<NodeId> },
    Block { body: Vec<NodeId> },
    Return { argument: Option<NodeId> },
    Empty,

    // ── declarator (child of VarDecl) ──
    VarDeclarator { name: NodeId, init: Option<NodeId> },

    // ── expressions ──
    Ident { name: String },
    Num { value: f64 },
    Str { value: String },
    Bool { value: bool },
    Null,
    Binary { op: BinaryOp, left: NodeId, right: NodeId },
    Logical { op: LogicalOp, left: NodeId, right: NodeId },
    Unary { op: UnaryOp, argument: NodeId },
    Update { op: UpdateOp, prefix: bool, argument: NodeId },
    Object { properties: Vec<NodeId> },
    Property { key: NodeId, value: NodeId },
    Spread { argument: NodeId },
    Array { elements: Vec<NodeId> },
    Call { callee: NodeId, arguments: Vec<NodeId> },
    Member { object: NodeId, property: NodeId, computed: bool },
    Await { argument: Option<NodeId> },

    // ── functions and classes ──
    Function {
        kind: FunctionKind,
        name: Option<NodeId>,
        params: Vec<NodeId>,
        body: NodeId,
        is_async: bool,
    },
    Class {
        kind: ClassKind,
        name: Option<NodeId>,
        members: Vec<NodeId>,
    },
    Method {
        kind: MethodKind,
        key: NodeId,
        params: Vec<NodeId>,
        body: NodeId,
    },
    Field { key: NodeId, value: Option<NodeId> },
}

impl Node {
    pub fn is_statement(&self) -> bool {
        matches!(
            self,
            Node::ExprStmt { .. }
                | Node::VarDecl { .. }
                | Node::Block { .. }
                | Node::Return { .. }
                | Node::Empty
        )
    }

    pub fn is_expression(&self) -> bool {
        matches!(
            self,
            Node::Ident { .. }
                | Node::Num { .. }
                | Node::Str { .. }
                | Node::Bool { .. }
                | Node::Null
                | Node::Binary { .. }
                | Node::Logical { .. }
                | Node::Unary { .. }
                | Node::Update { .. }
                | Node::Object { .. }
                | Node::Array { .. }
                | Node::Call { .. }
                | Node::Member { .. }
                | Node::Await { .. }
                | Node::Function {
                    kind: FunctionKind::Expression | FunctionKind::Arrow,
                    ..
                }
                | Node::Class {
                    kind: ClassKind::Expression,
                    ..
                }
        )
    }

    /// Binary, logical, unary, or update expression: the four categories
    /// whose defining operator can be swapped in place.
    pub fn is_operator_bearing(&self) -> bool {
        matches!(
            self,
            Node::Binary { .. } | Node::Logical { .. } | Node::Unary { .. } | Node::Update { .. }
        )
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Node::Function { .. })
    }
}

// =========================================================================
// 3. Arena tree
// =========================================================================

/// Arena-backed syntax tree. Slots are never freed; a structural edit
/// overwrites a slot or re-points child indices, so subtrees detached by a
/// mutation stay addressable for change records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tree {
    nodes: Vec<Node>,
    spans: Vec<Span>,
    root: NodeId,
}

impl Tree {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            spans: Vec::new(),
            root: NodeId::new(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn set_root(&mut self, id: NodeId) {
        self.root = id;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::new(i as u32), n))
    }

    pub fn alloc(&mut self, node: Node) -> NodeId {
        self.alloc_spanned(node, Span::SYNTHETIC)
    }

    pub fn alloc_spanned(&mut self, node: Node, span: Span) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(node);
        self.spans.push(span);
        id
    }

    pub fn alloc_ident(&mut self, name: &str) -> NodeId {
        self.alloc(Node::Ident { name: name.to_string() })
    }

    pub fn alloc_num(&mut self, value: f64) -> NodeId {
        self.alloc(Node::Num { value })
    }

    pub fn alloc_str(&mut self, value: &str) -> NodeId {
        self.alloc(Node::Str { value: value.to_string() })
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.spans[id.index()]
    }

    /// Overwrite the slot at `id`, returning the node previously stored
    /// there. The slot keeps its span: the replacement occupies the same
    /// source region.
    pub fn replace(&mut self, id: NodeId, node: Node) -> Node {
        std::mem::replace(&mut self.nodes[id.index()], node)
    }

    /// The canonical ordered child sequence of a node, if it has one.
    pub fn seq(&self, owner: NodeId) -> Option<&Vec<NodeId>> {
        match self.node(owner) {
            Node::Program { body } | Node::Block { body } => Some(body),
            Node::VarDecl { declarators, .. } => Some(declarators),
            Node::Object { properties } => Some(properties),
            Node::Array { elements } => Some(elements),
            Node::Call { arguments, .. } => Some(arguments),
            Node::Function { params, .. } | Node::Method { params, .. } => Some(params),
            Node::Class { members, .. } => Some(members),
            _ => None,
        }
    }

    pub fn seq_mut(&mut self, owner: NodeId) -> Option<&mut Vec<NodeId>> {
        match self.node_mut(owner) {
            Node::Program { body } | Node::Block { body } => Some(body),
            Node::VarDecl { declarators, .. } => Some(declarators),
            Node::Object { properties } => Some(properties),
            Node::Array { elements } => Some(elements),
            Node::Call { arguments, .. } => Some(arguments),
            Node::Function { params, .. } | Node::Method { params, .. } => Some(params),
            Node::Class { members, .. } => Some(members),
            _ => None,
        }
    }

    /// Splice `child` into `owner`'s ordered sequence at `index`.
    /// Returns false when `owner` has no sequence or `index` is past the end.
    pub fn seq_insert(&mut self, owner: NodeId, index: usize, child: NodeId) -> bool {
        match self.seq_mut(owner) {
            Some(seq) if index <= seq.len() => {
                seq.insert(index, child);
                true
            }
            _ => false,
        }
    }

    /// Remove and return the element at `index` of `owner`'s ordered
    /// sequence. The removed subtree stays allocated in the arena.
    pub fn seq_remove(&mut self, owner: NodeId, index: usize) -> Option<NodeId> {
        match self.seq_mut(owner) {
            Some(seq) if index < seq.len() => Some(seq.remove(index)),
            _ => None,
        }
    }

    /// Clone the subtree rooted at `id` into fresh arena slots and return
    /// the new root. The copy shares no slots with the original, so later
    /// in-place edits to either side leave the other untouched.
    pub fn deep_copy(&mut self, id: NodeId) -> NodeId {
        let span = self.span(id);
        let node = self.node(id).clone();
        let copy = match node {
            Node::Program { body } => Node::Program { body: self.copy_all(body) },
            Node::ExprStmt { expr } => Node::ExprStmt { expr: self.deep_copy(expr) },
            Node::VarDecl { kind, declarators } => Node::VarDecl {
                kind,
                declarators: self.copy_all(declarators),
            },
            Node::Block { body } => Node::Block { body: self.copy_all(body) },
            Node::Return { argument } => Node::Return { argument: self.copy_opt(argument) },
            Node::Empty => Node::Empty,
            Node::VarDeclarator { name, init } => Node::VarDeclarator {
                name: self.deep_copy(name),
                init: self.copy_opt(init),
            },
            Node::Ident { .. } | Node::Num { .. } | Node::Str { .. } | Node::Bool { .. } | Node::Null => node,
            Node::Binary { op, left, right } => Node::Binary {
                op,
                left: self.deep_copy(left),
                right: self.deep_copy(right),
            },
            Node::Logical { op, left, right } => Node::Logical {
                op,
                left: self.deep_copy(left),
                right: self.deep_copy(right),
            },
            Node::Unary { op, argument } => Node::Unary { op, argument: self.deep_copy(argument) },
            Node::Update { op, prefix, argument } => Node::Update {
                op,
                prefix,
                argument: self.deep_copy(argument),
            },
            Node::Object { properties } => Node::Object { properties: self.copy_all(properties) },
            Node::Property { key, value } => Node::Property {
                key: self.deep_copy(key),
                value: self.deep_copy(value),
            },
            Node::Spread { argument } => Node::Spread { argument: self.deep_copy(argument) },
            Node::Array { elements } => Node::Array { elements: self.copy_all(elements) },
            Node::Call { callee, arguments } => Node::Call {
                callee: self.deep_copy(callee),
                arguments: self.copy_all(arguments),
            },
            Node::Member { object, property, computed } => Node::Member {
                object: self.deep_copy(object),
                property: self.deep_copy(property),
                computed,
            },
            Node::Await { argument } => Node::Await { argument: self.copy_opt(argument) },
            Node::Function { kind, name, params, body, is_async } => Node::Function {
                kind,
                name: self.copy_opt(name),
                params: self.copy_all(params),
                body: self.deep_copy(body),
                is_async,
            },
            Node::Class { kind, name, members } => Node::Class {
                kind,
                name: self.copy_opt(name),
                members: self.copy_all(members),
            },
            Node::Method { kind, key, params, body } => Node::Method {
                kind,
                key: self.deep_copy(key),
                params: self.copy_all(params),
                body: self.deep_copy(body),
            },
            Node::Field { key, value } => Node::Field {
                key: self.deep_copy(key),
                value: self.copy_opt(value),
            },
        };
        self.alloc_spanned(copy, span)
    }

    fn copy_all(&mut self, children: Vec<NodeId>) -> Vec<NodeId> {
        children.into_iter().map(|c| self.deep_copy(c)).collect()
    }

    fn copy_opt(&mut self, child: Option<NodeId>) -> Option<NodeId> {
        child.map(|c| self.deep_copy(c))
    }

    /// Structural equality of the subtree at `a` (in `self`) against the
    /// subtree at `b` (in `other`). Arena indices and spans are ignored;
    /// only node shapes and scalar fields count.
    pub fn deep_eq(&self, a: NodeId, other: &Tree, b: NodeId) -> bool {
        match (self.node(a), other.node(b)) {
            (Node::Program { body: x }, Node::Program { body: y }) => self.seq_eq(x, other, y),
            (Node::ExprStmt { expr: x }, Node::ExprStmt { expr: y }) => self.deep_eq(*x, other, *y),
            (
                Node::VarDecl { kind: k1, declarators: d1 },
                Node::VarDecl { kind: k2, declarators: d2 },
            ) => k1 == k2 && self.seq_eq(d1, other, d2),
            (Node::Block { body: x }, Node::Block { body: y }) => self.seq_eq(x, other, y),
            (Node::Return { argument: x }, Node::Return { argument: y }) => {
                self.opt_eq(*x, other, *y)
            }
            (Node::Empty, Node::Empty) => true,
            (
                Node::VarDeclarator { name: n1, init: i1 },
                Node::VarDeclarator { name: n2, init: i2 },
            ) => self.deep_eq(*n1, other, *n2) && self.opt_eq(*i1, other, *i2),
            (Node::Ident { name: x }, Node::Ident { name: y }) => x == y,
            (Node::Num { value: x }, Node::Num { value: y }) => x == y,
            (Node::Str { value: x }, Node::Str { value: y }) => x == y,
            (Node::Bool { value: x }, Node::Bool { value: y }) => x == y,
            (Node::Null, Node::Null) => true,
            (
                Node::Binary { op: o1, left: l1, right: r1 },
                Node::Binary { op: o2, left: l2, right: r2 },
            ) => o1 == o2 && self.deep_eq(*l1, other, *l2) && self.deep_eq(*r1, other, *r2),
            (
                Node::Logical { op: o1, left: l1, right: r1 },
                Node::Logical { op: o2, left: l2, right: r2 },
            ) => o1 == o2 && self.deep_eq(*l1, other, *l2) && self.deep_eq(*r1, other, *r2),
            (
                Node::Unary { op: o1, argument: a1 },
                Node::Unary { op: o2, argument: a2 },
            ) => o1 == o2 && self.deep_eq(*a1, other, *a2),
            (
                Node::Update { op: o1, prefix: p1, argument: a1 },
                Node::Update { op: o2, prefix: p2, argument: a2 },
            ) => o1 == o2 && p1 == p2 && self.deep_eq(*a1, other, *a2),
            (Node::Object { properties: x }, Node::Object { properties: y }) => {
                self.seq_eq(x, other, y)
            }
            (
                Node::Property { key: k1, value: v1 },
                Node::Property { key: k2, value: v2 },
            ) => self.deep_eq(*k1, other, *k2) && self.deep_eq(*v1, other, *v2),
            (Node::Spread { argument: x }, Node::Spread { argument: y }) => {
                self.deep_eq(*x, other, *y)
            }
            (Node::Array { elements: x }, Node::Array { elements: y }) => self.seq_eq(x, other, y),
            (
                Node::Call { callee: c1, arguments: a1 },
                Node::Call { callee: c2, arguments: a2 },
            ) => self.deep_eq(*c1, other, *c2) && self.seq_eq(a1, other, a2),
            (
                Node::Member { object: o1, property: p1, computed: c1 },
                Node::Member { object: o2, property: p2, computed: c2 },
            ) => c1 == c2 && self.deep_eq(*o1, other, *o2) && self.deep_eq(*p1, other, *p2),
            (Node::Await { argument: x }, Node::Await { argument: y }) => {
                self.opt_eq(*x, other, *y)
            }
            (
                Node::Function { kind: k1, name: n1, params: p1, body: b1, is_async: a1 },
                Node::Function { kind: k2, name: n2, params: p2, body: b2, is_async: a2 },
            ) => {
                k1 == k2
                    && a1 == a2
                    && self.opt_eq(*n1, other, *n2)
                    && self.seq_eq(p1, other, p2)
                    && self.deep_eq(*b1, other, *b2)
            }
            (
                Node::Class { kind: k1, name: n1, members: m1 },
                Node::Class { kind: k2, name: n2, members: m2 },
            ) => k1 == k2 && self.opt_eq(*n1, other, *n2) && self.seq_eq(m1, other, m2),
            (
                Node::Method { kind: k1, key: key1, params: p1, body: b1 },
                Node::Method { kind: k2, key: key2, params: p2, body: b2 },
            ) => {
                k1 == k2
                    && self.deep_eq(*key1, other, *key2)
                    && self.seq_eq(p1, other, p2)
                    && self.deep_eq(*b1, other, *b2)
            }
            (Node::Field { key: k1, value: v1 }, Node::Field { key: k2, value: v2 }) => {
                self.deep_eq(*k1, other, *k2) && self.opt_eq(*v1, other, *v2)
            }
            _ => false,
        }
    }

    fn seq_eq(&self, xs: &[NodeId], other: &Tree, ys: &[NodeId]) -> bool {
        xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| self.deep_eq(*x, other, *y))
    }

    fn opt_eq(&self, x: Option<NodeId>, other: &Tree, y: Option<NodeId>) -> bool {
        match (x, y) {
            (Some(a), Some(b)) => self.deep_eq(a, other, b),
            (None, None) => true,
            _ => false,
        }
    }
}
