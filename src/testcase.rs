use serde::{Deserialize, Serialize};

use crate::ast::{NodeId, Tree};

/// Inferred-type tag attached to a node by the type-registry collaborator.
///
/// The mutation core only ever checks two things: whether a tag is present
/// at all, and whether it is the [`TypeTag::Undefined`] sentinel ("do not
/// mutate"). The remaining variants are opaque routing data for the
/// synthesizer side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeTag {
    Undefined,
    Number,
    String,
    Boolean,
    Object,
    Array,
    Function,
    Any,
}

/// One corpus entry: a program tree plus its per-node inferred types.
///
/// Mutators borrow the test case for the duration of a single mutation
/// call; nothing in this crate retains references into it across calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub tree: Tree,
    types: Vec<Option<TypeTag>>,
}

impl TestCase {
    pub fn new(tree: Tree) -> Self {
        let types = vec![None; tree.len()];
        Self { tree, types }
    }

    /// The inferred type of `id`, if the type registry produced one.
    /// Nodes fabricated after inference (mutation output) have none.
    pub fn inferred(&self, id: NodeId) -> Option<TypeTag> {
        self.types.get(id.index()).copied().flatten()
    }

    pub fn annotate(&mut self, id: NodeId, tag: TypeTag) {
        if self.types.len() <= id.index() {
            self.types.resize(id.index() + 1, None);
        }
        self.types[id.index()] = Some(tag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Node;

    #[test]
    fn annotations_track_nodes_and_default_to_absent() {
        let mut tree = Tree::new();
        let a = tree.alloc_num(1.0);
        let b = tree.alloc_ident("x");
        let mut tc = TestCase::new(tree);

        assert_eq!(tc.inferred(a), None);
        tc.annotate(a, TypeTag::Number);
        tc.annotate(b, TypeTag::Undefined);
        assert_eq!(tc.inferred(a), Some(TypeTag::Number));
        assert_eq!(tc.inferred(b), Some(TypeTag::Undefined));

        // A node allocated after inference carries no annotation.
        let c = tc.tree.alloc(Node::Null);
        assert_eq!(tc.inferred(c), None);
    }
}
