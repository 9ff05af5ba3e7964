pub mod class;
pub mod collections;
pub mod dispatch;
pub mod framework;
pub mod functions;
pub mod idioms;
pub mod operator;

pub use dispatch::{mutate, TRYTIMES};
pub use framework::{NodeMutator, NullSynthesizer, Synthesizer};
