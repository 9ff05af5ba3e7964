use crate::ast::{Node, NodeId};
use crate::change::Change;
use crate::random::Rand;
use crate::testcase::{TestCase, TypeTag};

use super::collections::{mutate_array_literal, mutate_object_literal};
use super::framework::{declarator_init, Synthesizer};
use super::functions::{mutate_function_params, mutate_function_to_async, mutate_remove_await};
use super::idioms::{is_merge_callee, rewrite_merge_call};
use super::operator::mutate_expr_op;

/// Retry budget for callers driving the dispatcher over random nodes.
pub const TRYTIMES: usize = 3;

/// Attempt one mutation at `at`. At most one structural edit commits per
/// call; every `None` path leaves the tree untouched.
///
/// Strategy order is fixed and load-bearing for reproducibility: earlier
/// strategies shadow later ones even when both would apply.
pub fn mutate(
    tc: &mut TestCase,
    at: NodeId,
    rng: &mut Rand,
    synth: &mut dyn Synthesizer,
) -> Option<Change> {
    // Nodes the type registry marked undefined are off limits.
    if tc.inferred(at) == Some(TypeTag::Undefined) {
        return None;
    }

    // Operator-bearing expressions get the narrow operand swap first.
    if tc.tree.node(at).is_operator_bearing() {
        if let Some(change) = mutate_expr_op(tc, at, rng) {
            return Some(change);
        }
    }

    // Of the statements, only expression statements are rebuilt, and that
    // is the synthesizer's job.
    if matches!(tc.tree.node(at), Node::ExprStmt { .. }) {
        return synth.synthesize_statement_replacement(tc, at, rng);
    }

    let init = declarator_init(&tc.tree, at);

    if let Some(init) = init {
        if matches!(tc.tree.node(init), Node::Object { .. }) {
            if let Some(change) = mutate_object_literal(tc, init, rng) {
                return Some(change);
            }
        }
        if matches!(tc.tree.node(init), Node::Array { .. }) {
            if let Some(change) = mutate_array_literal(tc, init, rng) {
                return Some(change);
            }
        }
    }

    if matches!(tc.tree.node(at), Node::Function { is_async: false, .. }) {
        if let Some(change) = mutate_function_params(tc, at, rng) {
            return Some(change);
        }
        if let Some(change) = mutate_function_to_async(tc, at, rng) {
            return Some(change);
        }
    }

    if let Some(init) = init {
        if matches!(tc.tree.node(init), Node::Await { .. }) {
            if let Some(change) = mutate_remove_await(tc, init, rng) {
                return Some(change);
            }
        }
        if is_merge_callee(&tc.tree, init) {
            if let Some(change) = rewrite_merge_call(tc, init) {
                return Some(change);
            }
        }
    }

    // Any other node with an inferred type goes to the synthesizer.
    if tc.inferred(at).is_some() {
        return synth.synthesize_node_replacement(tc, at, rng);
    }
    None
}
