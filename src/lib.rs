//! AST-level mutation core for an ECMAScript-corpus fuzzer.
//!
//! Given a parsed, type-annotated program ([`testcase::TestCase`]) and a
//! node to aim at, the dispatcher ([`mutators::mutate`]) applies at most
//! one structural edit and returns a reversible [`change::Change`] record.
//! Parsing, type inference, the generic node synthesizer, and test
//! execution are external collaborators; this crate only does the tree
//! surgery.

pub mod ast;
pub mod change;
pub mod mutators;
pub mod random;
pub mod testcase;
pub mod values;
