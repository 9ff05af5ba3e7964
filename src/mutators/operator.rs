use crate::ast::{BinaryOp, LogicalOp, Node, NodeId, UnaryOp, UpdateOp};
use crate::change::{Change, ContractError, OpToken};
use crate::random::Rand;
use crate::testcase::TestCase;

use super::framework::NodeMutator;

/// One-in-N gate on attempting an operator swap at an eligible node.
pub const OP_MUTATE_ONE_IN: usize = 3;

// Helper to get a random DIFFERENT operator of the same category.
fn alternative<T: Copy + PartialEq>(all: &[T], current: T, rng: &mut Rand) -> Option<T> {
    let pool: Vec<T> = all.iter().copied().filter(|op| *op != current).collect();
    rng.pick(&pool).copied()
}

/// Swap the operator of a binary/logical/unary/update expression for a
/// same-category alternative. Yields no change when the probability gate
/// fails, when `at` is not operator-bearing, or when the category has no
/// alternative operator.
pub fn mutate_expr_op(tc: &mut TestCase, at: NodeId, rng: &mut Rand) -> Option<Change> {
    if !rng.chance(OP_MUTATE_ONE_IN) {
        return None;
    }

    match tc.tree.node_mut(at) {
        Node::Binary { op, .. } => {
            let prev = *op;
            let next = alternative(BinaryOp::ALL, prev, rng)?;
            *op = next;
            Some(Change::Operand {
                at,
                previous: OpToken::Binary(prev),
                next: OpToken::Binary(next),
            })
        }
        Node::Logical { op, .. } => {
            let prev = *op;
            let next = alternative(LogicalOp::ALL, prev, rng)?;
            *op = next;
            Some(Change::Operand {
                at,
                previous: OpToken::Logical(prev),
                next: OpToken::Logical(next),
            })
        }
        Node::Unary { op, .. } => {
            let prev = *op;
            let next = alternative(UnaryOp::ALL, prev, rng)?;
            *op = next;
            Some(Change::Operand {
                at,
                previous: OpToken::Unary(prev),
                next: OpToken::Unary(next),
            })
        }
        Node::Update { op, .. } => {
            let prev = *op;
            let next = alternative(UpdateOp::ALL, prev, rng)?;
            *op = next;
            Some(Change::Operand {
                at,
                previous: OpToken::Update(prev),
                next: OpToken::Update(next),
            })
        }
        _ => None,
    }
}

/// Write `op` back into the expression at `at`.
///
/// Contract: `at` must be an operator-bearing expression of `op`'s
/// category. Anything else is a caller bug, reported as a fatal
/// [`ContractError`] rather than a recoverable no-op.
pub fn revert_op(tc: &mut TestCase, at: NodeId, op: OpToken) -> Result<(), ContractError> {
    match (tc.tree.node_mut(at), op) {
        (Node::Binary { op: slot, .. }, OpToken::Binary(prev)) => {
            *slot = prev;
            Ok(())
        }
        (Node::Logical { op: slot, .. }, OpToken::Logical(prev)) => {
            *slot = prev;
            Ok(())
        }
        (Node::Unary { op: slot, .. }, OpToken::Unary(prev)) => {
            *slot = prev;
            Ok(())
        }
        (Node::Update { op: slot, .. }, OpToken::Update(prev)) => {
            *slot = prev;
            Ok(())
        }
        (node, _) if node.is_operator_bearing() => {
            Err(ContractError::OperatorCategoryMismatch(at))
        }
        _ => Err(ContractError::NotOperatorBearing(at)),
    }
}

pub struct OperatorMutator;

impl NodeMutator for OperatorMutator {
    fn name(&self) -> &'static str {
        "operator"
    }

    fn collect(&self, tc: &TestCase) -> Vec<NodeId> {
        tc.tree
            .iter()
            .filter(|(_, node)| node.is_operator_bearing())
            .map(|(id, _)| id)
            .collect()
    }

    fn mutate(&mut self, tc: &mut TestCase, at: NodeId, rng: &mut Rand) -> Option<Change> {
        mutate_expr_op(tc, at, rng)
    }
}
