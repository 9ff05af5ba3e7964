use crate::ast::{Node, NodeId, Tree};
use crate::change::Change;
use crate::random::Rand;
use crate::testcase::TestCase;

/// Length bounds for fabricated lowercase identifier names (object keys,
/// parameters, method-name suffixes draw from the same alphabet).
pub const IDENT_LEN_MIN: usize = 1;
pub const IDENT_LEN_MAX: usize = 4;

/// The initializer of a variable declarator, if `id` is one. Several
/// mutation families route through declarator initializers; the dispatcher
/// and the per-family site collectors share this check.
pub(crate) fn declarator_init(tree: &Tree, id: NodeId) -> Option<NodeId> {
    match tree.node(id) {
        Node::VarDeclarator { init, .. } => *init,
        _ => None,
    }
}

/// Seam to the generic type-directed builder collaborator. The dispatcher
/// falls back to it for expression statements and for typed nodes no
/// specialized mutator claims.
pub trait Synthesizer {
    fn synthesize_statement_replacement(
        &mut self,
        tc: &mut TestCase,
        at: NodeId,
        rng: &mut Rand,
    ) -> Option<Change>;

    fn synthesize_node_replacement(
        &mut self,
        tc: &mut TestCase,
        at: NodeId,
        rng: &mut Rand,
    ) -> Option<Change>;
}

/// Stand-in used when no builder is wired up: always declines, so the
/// dispatcher's specialized strategies are the only mutation source.
pub struct NullSynthesizer;

impl Synthesizer for NullSynthesizer {
    fn synthesize_statement_replacement(
        &mut self,
        _tc: &mut TestCase,
        _at: NodeId,
        _rng: &mut Rand,
    ) -> Option<Change> {
        None
    }

    fn synthesize_node_replacement(
        &mut self,
        _tc: &mut TestCase,
        _at: NodeId,
        _rng: &mut Rand,
    ) -> Option<Change> {
        None
    }
}

// Standard Mutator Interface
pub trait NodeMutator {
    fn name(&self) -> &'static str;

    // Step 1 & 2: Traverse and collect candidate sites
    fn collect(&self, tc: &TestCase) -> Vec<NodeId>;

    // Step 4 & 5: Apply mutation to the selected site
    fn mutate(&mut self, tc: &mut TestCase, at: NodeId, rng: &mut Rand) -> Option<Change>;

    // Step 1-6 Driver (standardized logic)
    fn run(&mut self, tc: &mut TestCase, rng: &mut Rand) -> Option<Change> {
        self.run_with_meta(tc, rng, None).0
    }

    /// Like `run()`, but optionally forces a specific candidate `index`.
    /// Returns (change, chosen_index, candidate_count).
    ///
    /// The outer corpus driver uses the forced index to avoid repeatedly
    /// sampling the same mutation point for a given seed+mode.
    fn run_with_meta(
        &mut self,
        tc: &mut TestCase,
        rng: &mut Rand,
        forced_index: Option<usize>,
    ) -> (Option<Change>, usize, usize) {
        // Step 1 & 2
        let sites = self.collect(tc);
        if sites.is_empty() {
            return (None, 0, 0);
        }

        // Step 3: Select mutation instance
        let index = match forced_index {
            Some(i) if i < sites.len() => i,
            _ => rng.below(sites.len()),
        };

        // Step 4 & 5 & 6
        let change = self.mutate(tc, sites[index], rng);
        (change, index, sites.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Node, Tree};
    use crate::change::Location;

    struct EmptyObjectTagger;

    impl NodeMutator for EmptyObjectTagger {
        fn name(&self) -> &'static str {
            "empty_object_tagger"
        }

        fn collect(&self, tc: &TestCase) -> Vec<NodeId> {
            tc.tree
                .iter()
                .filter(|(_, n)| matches!(n, Node::Object { properties } if properties.is_empty()))
                .map(|(id, _)| id)
                .collect()
        }

        fn mutate(&mut self, tc: &mut TestCase, at: NodeId, _rng: &mut Rand) -> Option<Change> {
            let previous = tc.tree.deep_copy(at);
            tc.tree.replace(at, Node::Null);
            let next = tc.tree.deep_copy(at);
            Some(Change::Node {
                at: Location::Node(at),
                previous: Some(previous),
                next: Some(next),
            })
        }
    }

    fn two_site_case() -> (TestCase, NodeId, NodeId) {
        let mut tree = Tree::new();
        let a = tree.alloc(Node::Object { properties: vec![] });
        let b = tree.alloc(Node::Object { properties: vec![] });
        (TestCase::new(tree), a, b)
    }

    #[test]
    fn run_with_meta_reports_sites_and_choice() {
        let (mut tc, a, _) = two_site_case();
        let mut rng = Rand::with_seed(3);

        let (change, index, count) = EmptyObjectTagger.run_with_meta(&mut tc, &mut rng, Some(0));
        assert_eq!((index, count), (0, 2));
        assert!(change.is_some());
        assert_eq!(tc.tree.node(a), &Node::Null);
    }

    #[test]
    fn out_of_range_forced_index_falls_back_to_random() {
        let (mut tc, _, _) = two_site_case();
        let mut rng = Rand::with_seed(3);

        let (change, index, count) = EmptyObjectTagger.run_with_meta(&mut tc, &mut rng, Some(99));
        assert!(index < count);
        assert!(change.is_some());
    }

    #[test]
    fn no_sites_means_no_mutation() {
        let mut tree = Tree::new();
        tree.alloc_num(1.0);
        let mut tc = TestCase::new(tree);
        let mut rng = Rand::with_seed(3);

        let (change, index, count) = EmptyObjectTagger.run_with_meta(&mut tc, &mut rng, None);
        assert!(change.is_none());
        assert_eq!((index, count), (0, 0));
    }

    #[test]
    fn null_synthesizer_always_declines() {
        let (mut tc, a, _) = two_site_case();
        let mut rng = Rand::with_seed(3);
        assert!(NullSynthesizer
            .synthesize_statement_replacement(&mut tc, a, &mut rng)
            .is_none());
        assert!(NullSynthesizer
            .synthesize_node_replacement(&mut tc, a, &mut rng)
            .is_none());
    }
}
