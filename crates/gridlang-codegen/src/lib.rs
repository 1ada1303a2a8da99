//! Erlang code generation for gridlang node graphs.
//!
//! This crate walks the graph model from `gridlang-core` and produces
//! textual Erlang: one clause per root node, pattern arguments, optional
//! guards, `;`/`.` clause terminators. Problems found during the walk are
//! accumulated as [`Diagnostic`]s instead of aborting the compile.
//!
//! # Modules
//!
//! - [`diagnostics`] -- the non-fatal problem record
//! - [`emit`] -- the recursive, cycle-safe emission engine
//! - [`compiler`] -- compile entry point that caches the last output

pub mod compiler;
pub mod diagnostics;
pub mod emit;

pub use compiler::Compiler;
pub use diagnostics::Diagnostic;
pub use emit::{emit_module, EmitOutput};
