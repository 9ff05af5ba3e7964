use crate::ast::{Node, NodeId};
use crate::change::{Change, Location};
use crate::random::Rand;
use crate::testcase::TestCase;

use super::framework::{declarator_init, NodeMutator, IDENT_LEN_MAX, IDENT_LEN_MIN};

/// Outcomes for parameter insertion: one inserts at the front, the other
/// two append, so appends carry a 2-in-3 weight.
pub const PARAM_CHOICES: usize = 3;
const PARAM_FRONT_CHOICE: usize = 0;

/// One-in-N gate on converting a synchronous function to asynchronous.
pub const ASYNC_CONVERT_ONE_IN: usize = 4;

/// One-in-N gate on desugaring `await E` to `E`.
pub const AWAIT_REMOVE_ONE_IN: usize = 3;

/// Insert one fresh parameter into the function at `at`, at the front or
/// (twice as often) at the end. `previous`/`next` snapshot the whole
/// function node so the record survives later edits to the live tree.
pub fn mutate_function_params(tc: &mut TestCase, at: NodeId, rng: &mut Rand) -> Option<Change> {
    if !tc.tree.node(at).is_function() {
        return None;
    }

    let previous = tc.tree.deep_copy(at);

    let len = rng.range(IDENT_LEN_MIN, IDENT_LEN_MAX);
    let name = rng.lower_alpha(len);
    let param = tc.tree.alloc_ident(&name);

    let index = if rng.below(PARAM_CHOICES) == PARAM_FRONT_CHOICE {
        0
    } else {
        match tc.tree.node(at) {
            Node::Function { params, .. } => params.len(),
            _ => unreachable!("checked above"),
        }
    };
    tc.tree.seq_insert(at, index, param);

    let next = tc.tree.deep_copy(at);
    Some(Change::Node {
        at: Location::Node(at),
        previous: Some(previous),
        next: Some(next),
    })
}

/// Flip a synchronous function at `at` to asynchronous, behind a
/// [`ASYNC_CONVERT_ONE_IN`] gate.
///
/// The body is left untouched: no suspension point is introduced, so the
/// mutant is syntactically `async` but may never actually suspend. This
/// is the deliberate asymmetry with [`mutate_remove_await`].
pub fn mutate_function_to_async(tc: &mut TestCase, at: NodeId, rng: &mut Rand) -> Option<Change> {
    match tc.tree.node(at) {
        Node::Function { is_async: false, .. } => {}
        _ => return None,
    }
    if !rng.chance(ASYNC_CONVERT_ONE_IN) {
        return None;
    }

    let previous = tc.tree.deep_copy(at);
    if let Node::Function { is_async, .. } = tc.tree.node_mut(at) {
        *is_async = true;
    }
    let next = tc.tree.deep_copy(at);
    Some(Change::Node {
        at: Location::Node(at),
        previous: Some(previous),
        next: Some(next),
    })
}

/// Desugar the await expression at `at` to its argument, behind a
/// [`AWAIT_REMOVE_ONE_IN`] gate. Skips when the argument is absent.
pub fn mutate_remove_await(tc: &mut TestCase, at: NodeId, rng: &mut Rand) -> Option<Change> {
    let argument = match tc.tree.node(at) {
        Node::Await { argument } => *argument,
        _ => return None,
    };
    if !rng.chance(AWAIT_REMOVE_ONE_IN) {
        return None;
    }
    let argument = argument?;

    let previous = tc.tree.deep_copy(at);
    let replacement = tc.tree.node(argument).clone();
    tc.tree.replace(at, replacement);
    let next = tc.tree.deep_copy(at);
    Some(Change::Node {
        at: Location::Node(at),
        previous: Some(previous),
        next: Some(next),
    })
}

fn sync_functions(tc: &TestCase) -> Vec<NodeId> {
    tc.tree
        .iter()
        .filter(|(_, node)| matches!(node, Node::Function { is_async: false, .. }))
        .map(|(id, _)| id)
        .collect()
}

pub struct ParamInsertMutator;

impl NodeMutator for ParamInsertMutator {
    fn name(&self) -> &'static str {
        "param_insert"
    }

    fn collect(&self, tc: &TestCase) -> Vec<NodeId> {
        sync_functions(tc)
    }

    fn mutate(&mut self, tc: &mut TestCase, at: NodeId, rng: &mut Rand) -> Option<Change> {
        mutate_function_params(tc, at, rng)
    }
}

pub struct AsyncConvertMutator;

impl NodeMutator for AsyncConvertMutator {
    fn name(&self) -> &'static str {
        "async_convert"
    }

    fn collect(&self, tc: &TestCase) -> Vec<NodeId> {
        sync_functions(tc)
    }

    fn mutate(&mut self, tc: &mut TestCase, at: NodeId, rng: &mut Rand) -> Option<Change> {
        mutate_function_to_async(tc, at, rng)
    }
}

pub struct AwaitRemovalMutator;

impl NodeMutator for AwaitRemovalMutator {
    fn name(&self) -> &'static str {
        "await_removal"
    }

    fn collect(&self, tc: &TestCase) -> Vec<NodeId> {
        tc.tree
            .iter()
            .filter(|(id, _)| {
                declarator_init(&tc.tree, *id)
                    .is_some_and(|init| matches!(tc.tree.node(init), Node::Await { .. }))
            })
            .map(|(id, _)| id)
            .collect()
    }

    fn mutate(&mut self, tc: &mut TestCase, at: NodeId, rng: &mut Rand) -> Option<Change> {
        let init = declarator_init(&tc.tree, at)?;
        mutate_remove_await(tc, init, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{FunctionKind, Tree};

    fn function_case(param_names: &[&str], is_async: bool) -> (TestCase, NodeId) {
        let mut tree = Tree::new();
        let params = param_names.iter().map(|p| tree.alloc_ident(p)).collect();
        let ret = tree.alloc(Node::Return { argument: None });
        let body = tree.alloc(Node::Block { body: vec![ret] });
        let name = tree.alloc_ident("f");
        let func = tree.alloc(Node::Function {
            kind: FunctionKind::Declaration,
            name: Some(name),
            params,
            body,
            is_async,
        });
        (TestCase::new(tree), func)
    }

    fn param_names(tc: &TestCase, func: NodeId) -> Vec<String> {
        tc.tree
            .seq(func)
            .unwrap()
            .iter()
            .map(|p| match tc.tree.node(*p) {
                Node::Ident { name } => name.clone(),
                other => panic!("non-identifier parameter: {other:?}"),
            })
            .collect()
    }

    #[test]
    fn param_insertion_grows_front_or_back_by_one() {
        let mut fronts = 0;
        let mut backs = 0;

        for seed in 0..200 {
            // Digits keep the fixture names out of the generator's
            // lowercase-alphabetic namespace.
            let (mut tc, func) = function_case(&["x0", "y1"], false);
            let before = tc.clone();
            let mut rng = Rand::with_seed(seed);

            let change = mutate_function_params(&mut tc, func, &mut rng)
                .expect("parameter insertion always commits");
            let names = param_names(&tc, func);
            assert_eq!(names.len(), 3);
            if names[0] != "x0" {
                fronts += 1;
                assert_eq!(&names[1..], &["x0".to_string(), "y1".to_string()]);
            } else {
                backs += 1;
                assert_eq!(&names[..2], &["x0".to_string(), "y1".to_string()]);
            }

            change.revert(&mut tc).unwrap();
            assert!(tc.tree.deep_eq(func, &before.tree, func));
        }

        // Front insertion is the 1-in-3 outcome.
        assert!(fronts > 0);
        assert!(backs > fronts);
    }

    #[test]
    fn param_snapshots_are_independent_of_the_live_tree() {
        let (mut tc, func) = function_case(&["x"], false);
        let before = tc.clone();
        let mut rng = Rand::with_seed(9);

        let change = mutate_function_params(&mut tc, func, &mut rng).unwrap();
        // Mangle the live function after the fact; the record must still
        // restore the original.
        let first_param = tc.tree.seq(func).unwrap()[0];
        tc.tree.replace(first_param, Node::Ident { name: "mangled".into() });

        change.revert(&mut tc).unwrap();
        assert!(tc.tree.deep_eq(func, &before.tree, func));
    }

    #[test]
    fn async_conversion_flips_the_flag_and_nothing_else() {
        let mut converted = 0;
        let mut gated = 0;

        for seed in 0..96 {
            let (mut tc, func) = function_case(&["x"], false);
            let before = tc.clone();
            let mut rng = Rand::with_seed(seed);

            match mutate_function_to_async(&mut tc, func, &mut rng) {
                None => {
                    gated += 1;
                    assert!(tc.tree.deep_eq(func, &before.tree, func));
                }
                Some(change) => {
                    converted += 1;
                    let (is_async, body) = match tc.tree.node(func) {
                        Node::Function { is_async, body, .. } => (*is_async, *body),
                        other => panic!("still a function: {other:?}"),
                    };
                    assert!(is_async);
                    // No suspension point is inserted: the body is untouched.
                    let body_before = match before.tree.node(func) {
                        Node::Function { body, .. } => *body,
                        _ => unreachable!(),
                    };
                    assert!(tc.tree.deep_eq(body, &before.tree, body_before));

                    change.revert(&mut tc).unwrap();
                    assert!(tc.tree.deep_eq(func, &before.tree, func));
                }
            }
        }

        assert!(converted > 0);
        assert!(gated > converted); // 1-in-4 gate
    }

    #[test]
    fn async_functions_are_not_converted_again() {
        let (mut tc, func) = function_case(&["x"], true);
        for seed in 0..64 {
            let mut rng = Rand::with_seed(seed);
            assert!(mutate_function_to_async(&mut tc, func, &mut rng).is_none());
        }
    }

    fn await_declarator() -> (TestCase, NodeId, NodeId) {
        let mut tree = Tree::new();
        let callee = tree.alloc_ident("f");
        let call = tree.alloc(Node::Call { callee, arguments: vec![] });
        let awaited = tree.alloc(Node::Await { argument: Some(call) });
        let name = tree.alloc_ident("x");
        let decl = tree.alloc(Node::VarDeclarator { name, init: Some(awaited) });
        (TestCase::new(tree), decl, awaited)
    }

    #[test]
    fn await_removal_desugars_to_the_argument() {
        let mut removed = 0;

        for seed in 0..96 {
            let (mut tc, _decl, awaited) = await_declarator();
            let before = tc.clone();
            let mut rng = Rand::with_seed(seed);

            match mutate_remove_await(&mut tc, awaited, &mut rng) {
                None => assert!(tc.tree.deep_eq(awaited, &before.tree, awaited)),
                Some(change) => {
                    removed += 1;
                    // The await slot now holds the call expression alone.
                    match tc.tree.node(awaited) {
                        Node::Call { callee, arguments } => {
                            assert!(arguments.is_empty());
                            assert_eq!(tc.tree.node(*callee), &Node::Ident { name: "f".into() });
                        }
                        other => panic!("expected the call expression: {other:?}"),
                    }
                    // previous = the original await node, next = the call.
                    match change {
                        Change::Node { previous: Some(p), next: Some(n), .. } => {
                            assert!(matches!(tc.tree.node(p), Node::Await { .. }));
                            assert!(matches!(tc.tree.node(n), Node::Call { .. }));
                        }
                        other => panic!("unexpected change: {other:?}"),
                    }

                    change.revert(&mut tc).unwrap();
                    assert!(tc.tree.deep_eq(awaited, &before.tree, awaited));
                }
            }
        }

        assert!(removed > 0);
    }

    #[test]
    fn bare_await_is_skipped() {
        let mut tree = Tree::new();
        let awaited = tree.alloc(Node::Await { argument: None });
        let mut tc = TestCase::new(tree);
        for seed in 0..64 {
            let mut rng = Rand::with_seed(seed);
            assert!(mutate_remove_await(&mut tc, awaited, &mut rng).is_none());
        }
    }

    #[test]
    fn collectors_gate_on_async_and_declarator_shape() {
        let mut tree = Tree::new();
        let body = tree.alloc(Node::Block { body: vec![] });
        let sync_fn = tree.alloc(Node::Function {
            kind: FunctionKind::Arrow,
            name: None,
            params: vec![],
            body,
            is_async: false,
        });
        let body2 = tree.alloc(Node::Block { body: vec![] });
        let async_fn = tree.alloc(Node::Function {
            kind: FunctionKind::Arrow,
            name: None,
            params: vec![],
            body: body2,
            is_async: true,
        });
        let _ = async_fn;
        let awaited = tree.alloc(Node::Await { argument: None });
        let name = tree.alloc_ident("x");
        let decl = tree.alloc(Node::VarDeclarator { name, init: Some(awaited) });
        let tc = TestCase::new(tree);

        assert_eq!(ParamInsertMutator.collect(&tc), vec![sync_fn]);
        assert_eq!(AsyncConvertMutator.collect(&tc), vec![sync_fn]);
        assert_eq!(AwaitRemovalMutator.collect(&tc), vec![decl]);
    }
}
