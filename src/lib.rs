mod ast;
mod compiler;
mod interpreter;
mod optimizer;
mod parser;

pub mod assembly;
pub mod backend;

pub use ast::AST;
pub use compiler::{compile, compile_for, CompileError};
pub use interpreter::{Interpreter, RuntimeError};
pub use optimizer::optimize;
pub use parser::{parse, ParseError, ParseErrorKind};
