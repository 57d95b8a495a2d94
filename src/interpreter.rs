//! Tree-walking interpreter over the parsed IR.
//!
//! This is a collaborator of the compiler, not part of it: it shares the
//! parser but executes the tree directly. Unlike the generated code it
//! checks pointer underflow and grows the tape on the right, so it is also
//! useful for sanity-checking programs before compiling them.

use std::error::Error;
use std::fmt;
use std::io::{self, Read, Write};

use crate::ast::AST;

/// Initial tape length; the tape grows when the pointer moves past the end.
const INITIAL_TAPE_LEN: usize = 1000;

#[derive(Debug)]
pub enum RuntimeError {
    /// The data pointer moved below the start of the tape
    PointerUnderflow,
    Io(io::Error),
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RuntimeError::PointerUnderflow => {
                write!(f, "data pointer moved below the start of the tape")
            }
            RuntimeError::Io(err) => write!(f, "i/o error: {}", err),
        }
    }
}

impl Error for RuntimeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RuntimeError::PointerUnderflow => None,
            RuntimeError::Io(err) => Some(err),
        }
    }
}

impl From<io::Error> for RuntimeError {
    fn from(err: io::Error) -> Self {
        RuntimeError::Io(err)
    }
}

pub struct Interpreter<R, W> {
    pub tape: Vec<u8>,
    pub dptr: usize,
    reader: R,
    writer: W,
}

impl<R: Read, W: Write> Interpreter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Interpreter {
            tape: vec![0; INITIAL_TAPE_LEN],
            dptr: 0,
            reader,
            writer,
        }
    }

    /// Executes a sequence of nodes. State (tape and data pointer) persists
    /// across calls, which is what the REPL relies on.
    pub fn run(&mut self, ast: &[AST]) -> Result<(), RuntimeError> {
        for node in ast {
            self.step(node)?;
        }
        Ok(())
    }

    /// Executes a single node.
    pub fn step(&mut self, node: &AST) -> Result<(), RuntimeError> {
        match *node {
            AST::Add(value) => {
                let cell = &mut self.tape[self.dptr];
                *cell = cell.wrapping_add(value as u8);
            }
            AST::Move(steps) => {
                let dptr = self.dptr as i64 + i64::from(steps);
                if dptr < 0 {
                    return Err(RuntimeError::PointerUnderflow);
                }
                self.dptr = dptr as usize;
                if self.dptr >= self.tape.len() {
                    self.tape.resize(self.dptr + 1, 0);
                }
            }
            AST::Output => {
                self.writer.write_all(&[self.tape[self.dptr]])?;
                self.writer.flush()?;
            }
            AST::Input => {
                let mut buf = [0u8; 1];
                let n = self.reader.read(&mut buf)?;
                // Exhausted input reads as zero
                self.tape[self.dptr] = if n == 0 { 0 } else { buf[0] };
            }
            AST::Loop(ref body) => {
                while self.tape[self.dptr] != 0 {
                    self.run(body)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::optimize;
    use crate::parser::parse;

    const HELLO: &[u8] = b"++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]\
                           >>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";

    fn run(code: &[u8], input: &[u8]) -> (Vec<u8>, Vec<u8>, usize) {
        run_ast(&parse(code).unwrap(), input)
    }

    fn run_ast(ast: &[crate::AST], input: &[u8]) -> (Vec<u8>, Vec<u8>, usize) {
        let mut interp = Interpreter::new(input, Vec::new());
        interp.run(ast).unwrap();
        (interp.writer, interp.tape, interp.dptr)
    }

    #[test]
    fn hello_world() {
        let (output, _, _) = run(HELLO, b"");
        assert_eq!(output, b"Hello World!\n");
    }

    #[test]
    fn echo_until_zero_byte() {
        let (output, _, _) = run(b",[.,]", b"abcdef");
        assert_eq!(output, b"abcdef");
    }

    #[test]
    fn adds_two_input_bytes() {
        let (output, tape, _) = run(b",>,<[->+<]>.", b"\x03\x05");
        assert_eq!(output, b"\x08");
        assert_eq!(tape[1], 8);
    }

    #[test]
    fn exhausted_input_reads_zero() {
        let (_, tape, _) = run(b"+,", b"");
        assert_eq!(tape[0], 0);
    }

    #[test]
    fn cells_wrap_mod_256() {
        let (_, tape, _) = run(b"-", b"");
        assert_eq!(tape[0], 255);
        let (_, tape, _) = run_ast(&[crate::AST::Add(300)], b"");
        assert_eq!(tape[0], 44);
    }

    #[test]
    fn tape_grows_on_the_right() {
        let (_, tape, dptr) = run(b">+", b"");
        assert_eq!(dptr, 1);
        assert!(tape.len() >= 2);
        let mut code = vec![b'>'; INITIAL_TAPE_LEN + 10];
        code.push(b'+');
        let (_, tape, dptr) = run(&code, b"");
        assert_eq!(tape[dptr], 1);
    }

    #[test]
    fn pointer_underflow_is_an_error() {
        let ast = parse(b"<").unwrap();
        let mut interp = Interpreter::new(&b""[..], Vec::new());
        assert!(matches!(
            interp.run(&ast),
            Err(RuntimeError::PointerUnderflow)
        ));
    }

    #[test]
    fn optimized_and_unoptimized_trees_behave_identically() {
        for (code, input) in [
            (&HELLO[..], &b""[..]),
            (&b",[.,]"[..], &b"xyz"[..]),
            (&b"+++--->><+[>++<-]"[..], &b""[..]),
        ]
        .iter()
        {
            let ast = parse(code).unwrap();
            assert_eq!(run_ast(&ast, input), run_ast(&optimize(&ast), input));
        }
    }
}
