use std::error::Error;
use std::fmt;

use crate::backend::{Target, UnsupportedTarget};
use crate::optimizer::optimize;
use crate::parser::{parse, ParseError};

#[derive(Debug)]
pub enum CompileError {
    Parse(ParseError),
    UnsupportedTarget(UnsupportedTarget),
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CompileError::Parse(err) => err.fmt(f),
            CompileError::UnsupportedTarget(err) => err.fmt(f),
        }
    }
}

impl Error for CompileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CompileError::Parse(err) => Some(err),
            CompileError::UnsupportedTarget(err) => Some(err),
        }
    }
}

impl From<ParseError> for CompileError {
    fn from(err: ParseError) -> Self {
        CompileError::Parse(err)
    }
}

impl From<UnsupportedTarget> for CompileError {
    fn from(err: UnsupportedTarget) -> Self {
        CompileError::UnsupportedTarget(err)
    }
}

/// Compiles brainfuck source to a complete assembly unit for the target
/// named by `target`. Fails without producing any output if the source has
/// unmatched loop delimiters or the target name is unknown.
pub fn compile(code: &[u8], target: &str) -> Result<String, CompileError> {
    let target = target.parse::<Target>()?;
    Ok(compile_for(code, target)?)
}

/// Like [`compile`], for callers that already hold a resolved [`Target`].
pub fn compile_for(code: &[u8], target: Target) -> Result<String, ParseError> {
    let ast = optimize(&parse(code)?);
    let mut backend = target.backend();
    let body = backend.generate(&ast);
    Ok(backend.wrap(&body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmatched_delimiters_fail_for_both_targets() {
        for target in Target::NAMES.iter() {
            assert!(matches!(
                compile(b"[", target),
                Err(CompileError::Parse(_))
            ));
            assert!(matches!(
                compile(b"]", target),
                Err(CompileError::Parse(_))
            ));
        }
    }

    #[test]
    fn unknown_target_fails_even_for_valid_source() {
        assert!(matches!(
            compile(b"+++", "mips-linux"),
            Err(CompileError::UnsupportedTarget(_))
        ));
    }

    #[test]
    fn folded_run_reaches_the_text() {
        let asm = compile(b"+++", "x86_64-linux").unwrap();
        assert!(asm.contains("addb $3, (%rbx)"));
        let asm = compile(b"+++", "arm64-macos").unwrap();
        assert!(asm.contains("add w0, w0, #3"));
    }

    #[test]
    fn net_zero_source_emits_no_cell_instructions() {
        let asm = compile(b"+++---", "x86_64-linux").unwrap();
        assert!(!asm.contains("addb") && !asm.contains("subb"));
        let asm = compile(b"+++---", "arm64-macos").unwrap();
        assert!(!asm.contains("ldrb") && !asm.contains("strb"));
    }

    #[test]
    fn echo_program_compiles_for_both_targets() {
        let asm = compile(b",[.,]", "arm64-macos").unwrap();
        assert!(asm.contains("svc #0x80"));
        assert!(asm.contains("L_start_1:"));
        let asm = compile(b",[.,]", "x86_64-linux").unwrap();
        assert!(asm.contains("syscall"));
        assert!(asm.contains("L_start_1:"));
    }
}
