use std::fs;
use std::path::PathBuf;

use clap::Parser;
use log::{error, info};

use mutation_es::ast::NodeId;
use mutation_es::change::Change;
use mutation_es::mutators::class::ClassMemberMutator;
use mutation_es::mutators::collections::{ArrayLiteralMutator, ObjectLiteralMutator};
use mutation_es::mutators::functions::{
    AsyncConvertMutator, AwaitRemovalMutator, ParamInsertMutator,
};
use mutation_es::mutators::idioms::MergeIdiomMutator;
use mutation_es::mutators::operator::OperatorMutator;
use mutation_es::mutators::{mutate, NodeMutator, NullSynthesizer, TRYTIMES};
use mutation_es::random::Rand;
use mutation_es::testcase::TestCase;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON test case (tree + type annotations) to mutate.
    #[arg(short, long)]
    input: PathBuf,

    #[arg(short, long)]
    output: PathBuf,

    /// "dispatch", "metrics", or one mutator family:
    /// operator | object | array | params | async | await | merge | class.
    #[arg(short, long)]
    mode: String,

    /// Seed for the mutation rng; omit for an entropy seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Force a particular mutation-candidate index (0-based) within the
    /// selected mutator. If out of range, the mutator falls back to
    /// random selection.
    #[arg(long)]
    index: Option<usize>,

    /// Emit mutation-choice metadata to stderr as a single parseable line.
    /// Format: "MUTATION_CHOICE mode=<mode> count=<count> index=<index> mutated=<0|1>"
    #[arg(long, default_value_t = false)]
    emit_choice: bool,
}

fn family(mode: &str) -> Option<Box<dyn NodeMutator>> {
    match mode {
        "operator" => Some(Box::new(OperatorMutator)),
        "object" => Some(Box::new(ObjectLiteralMutator)),
        "array" => Some(Box::new(ArrayLiteralMutator)),
        "params" => Some(Box::new(ParamInsertMutator)),
        "async" => Some(Box::new(AsyncConvertMutator)),
        "await" => Some(Box::new(AwaitRemovalMutator)),
        "merge" => Some(Box::new(MergeIdiomMutator)),
        "class" => Some(Box::new(ClassMemberMutator)),
        _ => None,
    }
}

/// Drive the dispatcher over up to TRYTIMES randomly chosen nodes.
fn run_dispatch(tc: &mut TestCase, rng: &mut Rand) -> (Option<Change>, usize, usize) {
    let count = tc.tree.len();
    if count == 0 {
        return (None, 0, 0);
    }
    let mut synth = NullSynthesizer;
    let mut last = 0;
    for _ in 0..TRYTIMES {
        let index = rng.below(count);
        last = index;
        let at = NodeId::new(index as u32);
        if let Some(change) = mutate(tc, at, rng, &mut synth) {
            return (Some(change), index, count);
        }
    }
    (None, last, count)
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let content = fs::read_to_string(&args.input).expect("Failed to read input file");
    let mut tc: TestCase = match serde_json::from_str(&content) {
        Ok(tc) => tc,
        Err(e) => {
            // Seeds can carry tree shapes newer than this tool understands.
            // Don't panic; let the driver skip this one.
            error!("Parse failed: {e}");
            info!("No mutation performed.");
            fs::write(&args.output, content).expect("Failed to write output file");
            return;
        }
    };

    // Metrics mode: emit per-family site counts for the outer driver's
    // seed selection, leaving the test case untouched.
    if args.mode.as_str() == "metrics" {
        let payload = serde_json::json!({
            "nodes": tc.tree.len(),
            "operator_sites": OperatorMutator.collect(&tc).len(),
            "object_sites": ObjectLiteralMutator.collect(&tc).len(),
            "array_sites": ArrayLiteralMutator.collect(&tc).len(),
            "param_sites": ParamInsertMutator.collect(&tc).len(),
            "async_sites": AsyncConvertMutator.collect(&tc).len(),
            "await_sites": AwaitRemovalMutator.collect(&tc).len(),
            "merge_sites": MergeIdiomMutator.collect(&tc).len(),
            "class_sites": ClassMemberMutator.collect(&tc).len(),
        });
        println!("{payload}");
        fs::write(&args.output, content).expect("Failed to write output file");
        return;
    }

    let mut rng = match args.seed {
        Some(seed) => Rand::with_seed(seed),
        None => Rand::from_entropy(),
    };

    let (change, chosen_index, candidate_count) = match args.mode.as_str() {
        "dispatch" => run_dispatch(&mut tc, &mut rng),
        mode => match family(mode) {
            Some(mut mutator) => mutator.run_with_meta(&mut tc, &mut rng, args.index),
            None => {
                error!("Unknown mode: {mode}");
                (None, 0, 0)
            }
        },
    };

    if args.emit_choice {
        let mutated = if change.is_some() { 1 } else { 0 };
        eprintln!(
            "MUTATION_CHOICE mode={} count={} index={} mutated={}",
            args.mode, candidate_count, chosen_index, mutated
        );
    }

    match &change {
        Some(change) => info!("Mutation successful: {change:?}"),
        None => info!("No mutation performed."),
    }

    let mutated_content =
        serde_json::to_string_pretty(&tc).expect("Failed to serialize test case");
    fs::write(&args.output, mutated_content).expect("Failed to write output file");
}
