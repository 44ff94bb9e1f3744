//! # scoopc: scoop directive compiler
//!
//! Translates `.scoop` class-declaration files into CommonJS modules for the
//! `scooj` runtime or into CoffeeScript class sugar.
//!
//! ## Pipeline
//!
//! 1. **Scan**: every column-0 identifier-like line is a directive candidate and
//!    must match one of the thirteen directive patterns, tried most-specific
//!    first. Anything else is a fatal unknown directive.
//! 2. **Segment**: each directive owns the lines before it (comments) and after
//!    it (body). The line right before the next directive is never part of a
//!    body; it becomes the next directive's comment.
//! 3. **Compile**: each directive emits a header, its body, and a closing
//!    suffix. `super` calls in class, method, getter and setter bodies are
//!    rewritten into explicit `$super` dispatch.
//! 4. **Assemble**: comments, headers and bodies are joined back in order;
//!    divider comments are redrawn to a fixed width.
//!
//! ## Invariants
//!
//! 1. **Partition**: comments, directive line and body of all directives, in
//!    order, reproduce the source line list exactly.
//! 2. **One prelude**: only the first emitted directive binds the runtime.
//! 3. **One export**: only the first class is exported as the module value.
//! 4. **Footers**: a closing suffix is appended to the last body line, or takes
//!    its own line when the body is empty. Never both.
//! 5. **No globals**: transpile failures are counted per file and returned in
//!    [`CompileStats`]; batches sum them in [`BuildReport`].

mod build;
mod cache;
mod codegen;
mod compile;
mod directive;
mod discovery;
mod error;
mod finalize;
pub mod logging;
mod segment;
mod super_calls;
mod transpile;

#[cfg(test)]
mod directive_tests;

pub use build::{build, build_with_transpiler, BuildOptions, BuildReport, GeneratedModule};
pub use codegen::{Dialect, EmittedCode, Footer, ModuleFormat};
pub use compile::{
    compile_module, compile_named_module, CompileOptions, CompileOutput, CompileStats,
};
pub use directive::{is_directive_candidate, recognize, Directive, DirectiveKind, DirectiveNode};
pub use discovery::{discover_inputs, SourceFile};
pub use error::{ScoopError, TranspileError};
pub use segment::segment;
pub use super_calls::rewrite_super_calls;
pub use transpile::{BodyTranspiler, CommandTranspiler};
