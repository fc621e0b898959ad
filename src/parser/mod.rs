// Interaction script parser

pub mod ast;
pub mod lexer;
pub mod script;

// Public API re-exports
pub use ast::ScriptCommand;
pub use script::{parse_command, parse_script};
