use crate::ast::{MethodKind, Node, NodeId};
use crate::change::{Change, Location};
use crate::random::Rand;
use crate::testcase::TestCase;

use super::framework::NodeMutator;

/// Outcomes for a class body: rename a method, remove a method, insert a
/// dummy method.
pub const CLASS_CHOICES: usize = 3;
const CLASS_RENAME: usize = 0;
const CLASS_REMOVE: usize = 1;

/// Suffix appended to a method name by the rename outcome.
pub const METHOD_RENAME_SUFFIX: &str = "_mut";

/// Name stem and suffix length for inserted dummy methods.
const DUMMY_METHOD_STEM: &str = "dummy";
const DUMMY_SUFFIX_LEN: usize = 2;

/// Mutate the member list of the class at `at`. Only method members are
/// candidates; a class without any yields no change, whichever outcome
/// is drawn.
pub fn mutate_class_members(tc: &mut TestCase, at: NodeId, rng: &mut Rand) -> Option<Change> {
    let members = match tc.tree.node(at) {
        Node::Class { members, .. } => members.clone(),
        _ => return None,
    };
    let methods: Vec<(usize, NodeId)> = members
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, m)| matches!(tc.tree.node(*m), Node::Method { .. }))
        .collect();
    if methods.is_empty() {
        return None;
    }

    match rng.below(CLASS_CHOICES) {
        CLASS_RENAME => {
            let (_, method) = methods[rng.below(methods.len())];
            let key = match tc.tree.node(method) {
                Node::Method { key, .. } => *key,
                _ => unreachable!("filtered above"),
            };
            let renamed = match tc.tree.node(key) {
                Node::Ident { name } => format!("{name}{METHOD_RENAME_SUFFIX}"),
                // Only identifier keys are renamed.
                _ => return None,
            };

            let previous = tc.tree.deep_copy(key);
            tc.tree.replace(key, Node::Ident { name: renamed });
            let next = tc.tree.deep_copy(key);
            Some(Change::Node {
                at: Location::Node(key),
                previous: Some(previous),
                next: Some(next),
            })
        }
        CLASS_REMOVE => {
            let (index, _) = methods[rng.below(methods.len())];
            let removed = tc.tree.seq_remove(at, index)?;
            Some(Change::Node {
                at: Location::Seq { owner: at, index },
                previous: Some(removed),
                next: None,
            })
        }
        _ => {
            let suffix = rng.lower_alpha(DUMMY_SUFFIX_LEN);
            let key = tc.tree.alloc_ident(&format!("{DUMMY_METHOD_STEM}{suffix}"));
            let note = tc.tree.alloc_str("dummy method");
            let stmt = tc.tree.alloc(Node::ExprStmt { expr: note });
            let body = tc.tree.alloc(Node::Block { body: vec![stmt] });
            let method = tc.tree.alloc(Node::Method {
                kind: MethodKind::Method,
                key,
                params: vec![],
                body,
            });

            let index = members.len();
            tc.tree.seq_insert(at, index, method);
            Some(Change::Node {
                at: Location::Seq { owner: at, index },
                previous: None,
                next: Some(method),
            })
        }
    }
}

pub struct ClassMemberMutator;

impl NodeMutator for ClassMemberMutator {
    fn name(&self) -> &'static str {
        "class_member"
    }

    fn collect(&self, tc: &TestCase) -> Vec<NodeId> {
        tc.tree
            .iter()
            .filter(|(id, node)| {
                matches!(node, Node::Class { .. })
                    && tc
                        .tree
                        .seq(*id)
                        .is_some_and(|members| {
                            members
                                .iter()
                                .any(|m| matches!(tc.tree.node(*m), Node::Method { .. }))
                        })
            })
            .map(|(id, _)| id)
            .collect()
    }

    fn mutate(&mut self, tc: &mut TestCase, at: NodeId, rng: &mut Rand) -> Option<Change> {
        mutate_class_members(tc, at, rng)
    }
}
