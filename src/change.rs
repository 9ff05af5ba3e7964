use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ast::{BinaryOp, LogicalOp, NodeId, UnaryOp, UpdateOp};
use crate::mutators::operator::revert_op;
use crate::testcase::TestCase;

/// Programmer-contract violations. These signal a bug in the caller (a
/// change replayed against the wrong node shape), never a fuzzing-domain
/// condition, and must halt the run rather than silently no-op.
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("{0} is not an operator-bearing expression")]
    NotOperatorBearing(NodeId),
    #[error("operator category does not match the expression at {0}")]
    OperatorCategoryMismatch(NodeId),
    #[error("{owner} has no ordered child slot at index {index}")]
    BadSequenceSlot { owner: NodeId, index: usize },
    #[error("insertion change at {0} carries no sequence slot")]
    MalformedChange(NodeId),
}

/// The operator symbol of one of the four operator-bearing expression
/// categories, carried by operand-replace changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpToken {
    Binary(BinaryOp),
    Logical(LogicalOp),
    Unary(UnaryOp),
    Update(UpdateOp),
}

impl OpToken {
    pub fn as_str(self) -> &'static str {
        match self {
            OpToken::Binary(op) => op.as_str(),
            OpToken::Logical(op) => op.as_str(),
            OpToken::Unary(op) => op.as_str(),
            OpToken::Update(op) => op.as_str(),
        }
    }
}

impl fmt::Display for OpToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an edit landed: a whole node slot, or one indexed slot of a
/// node's canonical ordered child sequence.
///
/// Locations stay valid until the tree at or above them is structurally
/// replaced; callers re-derive locations after such a replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    Node(NodeId),
    Seq { owner: NodeId, index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    NodeReplace,
    OperandReplace,
}

/// One reversible structural edit.
///
/// For [`Change::Node`], `previous`/`next` are detached subtrees in the
/// same arena: `previous = None` marks a pure insertion, `next = None` a
/// pure deletion. Replacement payloads are deep copies, so the record
/// stays accurate across later in-place edits to the live tree; for pure
/// insertions `next` references the live inserted subtree (reverting only
/// needs the sequence slot).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Change {
    Node {
        at: Location,
        previous: Option<NodeId>,
        next: Option<NodeId>,
    },
    Operand {
        at: NodeId,
        previous: OpToken,
        next: OpToken,
    },
}

impl Change {
    pub fn kind(&self) -> ChangeKind {
        match self {
            Change::Node { .. } => ChangeKind::NodeReplace,
            Change::Operand { .. } => ChangeKind::OperandReplace,
        }
    }

    /// Replay `previous` at the recorded location, restoring the tree to
    /// its pre-mutation structure. Must be applied in reverse order of the
    /// mutations it undoes.
    pub fn revert(&self, tc: &mut TestCase) -> Result<(), ContractError> {
        match *self {
            Change::Operand { at, previous, .. } => revert_op(tc, at, previous),
            Change::Node { at: Location::Node(id), previous: Some(prev), .. } => {
                let restored = tc.tree.node(prev).clone();
                tc.tree.replace(id, restored);
                Ok(())
            }
            Change::Node { at: Location::Node(id), previous: None, .. } => {
                Err(ContractError::MalformedChange(id))
            }
            Change::Node { at: Location::Seq { owner, index }, previous: None, .. } => {
                // Undo a pure insertion.
                tc.tree
                    .seq_remove(owner, index)
                    .map(|_| ())
                    .ok_or(ContractError::BadSequenceSlot { owner, index })
            }
            Change::Node { at: Location::Seq { owner, index }, previous: Some(prev), next } => {
                if next.is_none() {
                    // Undo a pure deletion.
                    if tc.tree.seq_insert(owner, index, prev) {
                        Ok(())
                    } else {
                        Err(ContractError::BadSequenceSlot { owner, index })
                    }
                } else {
                    match tc.tree.seq_mut(owner) {
                        Some(seq) if index < seq.len() => {
                            seq[index] = prev;
                            Ok(())
                        }
                        _ => Err(ContractError::BadSequenceSlot { owner, index }),
                    }
                }
            }
        }
    }
}
