use crate::ast::{Node, NodeId};
use crate::change::{Change, Location};
use crate::random::Rand;
use crate::testcase::TestCase;
use crate::values::interesting_value;

use super::framework::{declarator_init, NodeMutator, IDENT_LEN_MAX, IDENT_LEN_MIN};

/// Outcome count for a non-empty object literal; outcome
/// [`OBJECT_RENAME_CHOICE`] renames one key, every other outcome inserts.
pub const OBJECT_CHOICES: usize = 6;
pub const OBJECT_RENAME_CHOICE: usize = 0;

/// Outcomes for an array literal: delete, insert, swap.
pub const ARRAY_CHOICES: usize = 3;
const ARRAY_DELETE: usize = 0;
const ARRAY_INSERT: usize = 1;

// Fabricate `key: value` with a fresh random key and a pool value.
fn fresh_property(tc: &mut TestCase, rng: &mut Rand) -> NodeId {
    let len = rng.range(IDENT_LEN_MIN, IDENT_LEN_MAX);
    let name = rng.lower_alpha(len);
    let key = tc.tree.alloc_ident(&name);
    let value = interesting_value(rng);
    let value = tc.tree.alloc_num(value);
    tc.tree.alloc(Node::Property { key, value })
}

/// Mutate the object literal at `at`: grow an empty literal by one
/// property; otherwise draw one of [`OBJECT_CHOICES`] outcomes — rename
/// one existing key in place (spread entries are skipped) or insert a
/// fresh property at a uniform position.
pub fn mutate_object_literal(tc: &mut TestCase, at: NodeId, rng: &mut Rand) -> Option<Change> {
    let props = match tc.tree.node(at) {
        Node::Object { properties } => properties.clone(),
        _ => return None,
    };

    if props.is_empty() {
        let prop = fresh_property(tc, rng);
        tc.tree.seq_insert(at, 0, prop);
        return Some(Change::Node {
            at: Location::Seq { owner: at, index: 0 },
            previous: None,
            next: Some(prop),
        });
    }

    if rng.below(OBJECT_CHOICES) == OBJECT_RENAME_CHOICE {
        let idx = rng.below(props.len());
        let key = match tc.tree.node(props[idx]) {
            Node::Property { key, .. } => *key,
            // Spread entries have no key to rename.
            _ => return None,
        };
        let string_key = match tc.tree.node(key) {
            Node::Ident { .. } => false,
            Node::Str { .. } => true,
            // Computed keys keep their shape.
            _ => return None,
        };
        let len = rng.range(IDENT_LEN_MIN, IDENT_LEN_MAX);
        let name = rng.lower_alpha(len);
        let new_key = if string_key {
            Node::Str { value: name }
        } else {
            Node::Ident { name }
        };

        let previous = tc.tree.deep_copy(key);
        tc.tree.replace(key, new_key);
        let next = tc.tree.deep_copy(key);
        Some(Change::Node {
            at: Location::Node(key),
            previous: Some(previous),
            next: Some(next),
        })
    } else {
        let index = rng.below(props.len() + 1);
        let prop = fresh_property(tc, rng);
        tc.tree.seq_insert(at, index, prop);
        Some(Change::Node {
            at: Location::Seq { owner: at, index },
            previous: None,
            next: Some(prop),
        })
    }
}

/// Mutate the array literal at `at` by one of delete / insert / swap.
/// Every branch commits a whole-array node replacement, so the record is
/// a single atomic swap of the literal.
pub fn mutate_array_literal(tc: &mut TestCase, at: NodeId, rng: &mut Rand) -> Option<Change> {
    let elements = match tc.tree.node(at) {
        Node::Array { elements } => elements.clone(),
        _ => return None,
    };

    let new_elements = match rng.below(ARRAY_CHOICES) {
        ARRAY_DELETE => {
            if elements.is_empty() {
                return None;
            }
            let idx = rng.below(elements.len());
            let mut next = elements;
            next.remove(idx);
            next
        }
        ARRAY_INSERT => {
            let value = interesting_value(rng);
            let idx = rng.below(elements.len() + 1);
            let elem = tc.tree.alloc_num(value);
            let mut next = elements;
            next.insert(idx, elem);
            next
        }
        _ => {
            if elements.len() < 2 {
                return None;
            }
            let first = rng.below(elements.len());
            let mut second = rng.below(elements.len());
            while second == first {
                second = rng.below(elements.len());
            }
            let mut next = elements;
            next.swap(first, second);
            next
        }
    };

    let previous = tc.tree.deep_copy(at);
    tc.tree.replace(at, Node::Array { elements: new_elements });
    let next = tc.tree.deep_copy(at);
    Some(Change::Node {
        at: Location::Node(at),
        previous: Some(previous),
        next: Some(next),
    })
}

pub struct ObjectLiteralMutator;

impl NodeMutator for ObjectLiteralMutator {
    fn name(&self) -> &'static str {
        "object_literal"
    }

    fn collect(&self, tc: &TestCase) -> Vec<NodeId> {
        tc.tree
            .iter()
            .filter(|(id, _)| {
                declarator_init(&tc.tree, *id)
                    .is_some_and(|init| matches!(tc.tree.node(init), Node::Object { .. }))
            })
            .map(|(id, _)| id)
            .collect()
    }

    fn mutate(&mut self, tc: &mut TestCase, at: NodeId, rng: &mut Rand) -> Option<Change> {
        let init = declarator_init(&tc.tree, at)?;
        mutate_object_literal(tc, init, rng)
    }
}

pub struct ArrayLiteralMutator;

impl NodeMutator for ArrayLiteralMutator {
    fn name(&self) -> &'static str {
        "array_literal"
    }

    fn collect(&self, tc: &TestCase) -> Vec<NodeId> {
        tc.tree
            .iter()
            .filter(|(id, _)| {
                declarator_init(&tc.tree, *id)
                    .is_some_and(|init| matches!(tc.tree.node(init), Node::Array { .. }))
            })
            .map(|(id, _)| id)
            .collect()
    }

    fn mutate(&mut self, tc: &mut TestCase, at: NodeId, rng: &mut Rand) -> Option<Change> {
        let init = declarator_init(&tc.tree, at)?;
        mutate_array_literal(tc, init, rng)
    }
}
