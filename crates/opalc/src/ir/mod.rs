//! Intermediate representation
//!
//! A control-flow graph of basic blocks, lowered from the analyzed
//! program and rendered to text through `Display`.

mod builder;
mod inst;

pub use builder::IrBuilder;
pub use inst::*;
