pub mod api;
pub mod ast;
pub mod codegen;
pub mod collect;
pub mod config;
pub mod diagnostic;
pub mod runtime;
pub mod symbols;

// `tasmgen::project` for the CLI and tests
pub use config::project;

// Public API: `tasmgen::compile()` etc.
pub use api::*;
