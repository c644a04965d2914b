//! The Opal type system
//!
//! One flat set of primitive types shared by the AST, the semantic
//! analyzer and the IR. There are no compound types.

mod primitive;

pub use primitive::Type;
