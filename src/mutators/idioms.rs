use crate::ast::{Node, NodeId, Tree};
use crate::change::{Change, Location};
use crate::random::Rand;
use crate::testcase::TestCase;

use super::framework::{declarator_init, NodeMutator};

/// The merge idiom this rewrite targets: `Object.assign({}, ...rest)`.
pub const MERGE_NAMESPACE: &str = "Object";
pub const MERGE_METHOD: &str = "assign";

/// True when `call` is a call whose callee is the non-computed two-part
/// member access `Object.assign`.
pub fn is_merge_callee(tree: &Tree, call: NodeId) -> bool {
    let Node::Call { callee, .. } = tree.node(call) else {
        return false;
    };
    let Node::Member { object, property, computed: false } = tree.node(*callee) else {
        return false;
    };
    matches!(tree.node(*object), Node::Ident { name } if name == MERGE_NAMESPACE)
        && matches!(tree.node(*property), Node::Ident { name } if name == MERGE_METHOD)
}

/// Rewrite `Object.assign({}, a, b, …)` at `call` into the equivalent
/// spread literal `{...a, ...b, …}`. Deterministic: fires exactly when
/// the callee matches and the first argument is an empty object literal,
/// and leaves the tree untouched otherwise.
pub fn rewrite_merge_call(tc: &mut TestCase, call: NodeId) -> Option<Change> {
    if !is_merge_callee(&tc.tree, call) {
        return None;
    }
    let arguments = match tc.tree.node(call) {
        Node::Call { arguments, .. } => arguments.clone(),
        _ => return None,
    };
    let first = *arguments.first()?;
    match tc.tree.node(first) {
        Node::Object { properties } if properties.is_empty() => {}
        _ => return None,
    }

    let properties = arguments[1..]
        .iter()
        .map(|arg| match tc.tree.node(*arg) {
            // A spread argument already has the entry shape.
            Node::Spread { .. } => *arg,
            _ => tc.tree.alloc(Node::Spread { argument: *arg }),
        })
        .collect();

    let previous = tc.tree.deep_copy(call);
    tc.tree.replace(call, Node::Object { properties });
    let next = tc.tree.deep_copy(call);
    Some(Change::Node {
        at: Location::Node(call),
        previous: Some(previous),
        next: Some(next),
    })
}

pub struct MergeIdiomMutator;

impl NodeMutator for MergeIdiomMutator {
    fn name(&self) -> &'static str {
        "merge_idiom"
    }

    fn collect(&self, tc: &TestCase) -> Vec<NodeId> {
        tc.tree
            .iter()
            .filter(|(id, _)| {
                declarator_init(&tc.tree, *id)
                    .is_some_and(|init| is_merge_callee(&tc.tree, init))
            })
            .map(|(id, _)| id)
            .collect()
    }

    fn mutate(&mut self, tc: &mut TestCase, at: NodeId, _rng: &mut Rand) -> Option<Change> {
        let init = declarator_init(&tc.tree, at)?;
        rewrite_merge_call(tc, init)
    }
}
