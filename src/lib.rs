// Lepton: A Small Mark-and-Sweep Lisp Interpreter
//
// The heap is a single arena of tagged values addressed by index handles;
// everything the evaluator touches lives there and is reclaimed by the
// collector between top-level forms.

pub mod arena;
pub mod eval;
pub mod expr;
pub mod gc;
pub mod matcher;
pub mod primitives;
pub mod printer;
pub mod reader;
pub mod repl;
pub mod scope;
pub mod types;
