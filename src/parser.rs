use std::error::Error;
use std::fmt;

use unicode_width::UnicodeWidthStr;

use crate::ast::AST;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Input ended with at least one `[` still open
    UnclosedLoop,
    /// A `]` appeared outside of any loop
    ExtraCloseLoop,
}
use ParseErrorKind::*;

#[derive(Debug)]
pub struct ParseError {
    kind: ParseErrorKind,
    line: Vec<u8>,
    linenum: usize,
    offset: usize,
}

impl ParseError {
    fn new(kind: ParseErrorKind, code: &[u8], i: usize) -> Self {
        let (line, linenum, offset) = find_line(code, i);
        Self {
            kind,
            line: line.into(),
            linenum,
            offset,
        }
    }

    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let width = UnicodeWidthStr::width(&*String::from_utf8_lossy(&self.line[..self.offset]));

        match self.kind {
            UnclosedLoop => {
                writeln!(f, "reached end of input with an unterminated loop")?;
                writeln!(f, "loop started at {}:{}", self.linenum + 1, self.offset + 1)?;
            }
            ExtraCloseLoop => {
                writeln!(
                    f,
                    "] found at {}:{} when not in a loop",
                    self.linenum + 1,
                    self.offset + 1
                )?;
            }
        };

        writeln!(f, "{}", String::from_utf8_lossy(&self.line))?;
        write!(f, "{}^", " ".repeat(width))
    }
}

impl Error for ParseError {}

/// One in-progress loop body; `start` is the byte index of its `[`.
struct Scope {
    start: usize,
    body: Vec<AST>,
}

impl Scope {
    fn new(start: usize) -> Self {
        Scope {
            start,
            body: Vec::new(),
        }
    }
}

/// Parses brainfuck code to the compiler's intermediate representation,
/// without applying any optimization. Bytes other than the eight command
/// characters are ignored.
pub fn parse(code: &[u8]) -> Result<Vec<AST>, ParseError> {
    // Scope stack instead of call recursion, so nesting depth is not
    // limited by the host stack.
    let mut scopes = vec![Scope::new(0)];

    for (i, &c) in code.iter().enumerate() {
        let node = match c {
            b'+' => AST::Add(1),
            b'-' => AST::Add(-1),
            b'>' => AST::Move(1),
            b'<' => AST::Move(-1),
            b'.' => AST::Output,
            b',' => AST::Input,
            b'[' => {
                scopes.push(Scope::new(i));
                continue;
            }
            b']' => match scopes.pop() {
                Some(scope) if !scopes.is_empty() => AST::Loop(scope.body),
                _ => return Err(ParseError::new(ExtraCloseLoop, code, i)),
            },
            _ => continue,
        };
        if let Some(scope) = scopes.last_mut() {
            scope.body.push(node);
        }
    }

    match scopes.pop() {
        Some(scope) if scopes.is_empty() => Ok(scope.body),
        Some(scope) => Err(ParseError::new(UnclosedLoop, code, scope.start)),
        None => Ok(Vec::new()),
    }
}

fn find_line(code: &[u8], i: usize) -> (&[u8], usize, usize) {
    let offset = code[0..i].iter().rev().take_while(|x| **x != b'\n').count();
    let end = i + code[i..].iter().take_while(|x| **x != b'\n').count();
    let linenum = code[0..(i - offset)]
        .iter()
        .filter(|x| **x == b'\n')
        .count();
    (&code[(i - offset)..end], linenum, offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::AST::*;

    #[test]
    fn leaf_nodes() {
        assert_eq!(
            parse(b"+-><.,").unwrap(),
            vec![Add(1), Add(-1), Move(1), Move(-1), Output, Input]
        );
    }

    #[test]
    fn comments_ignored() {
        assert_eq!(
            parse(b"inc + and dec -\n").unwrap(),
            parse(b"+-").unwrap()
        );
        assert_eq!(parse(b"no commands at all").unwrap(), vec![]);
    }

    #[test]
    fn empty_program() {
        assert_eq!(parse(b"").unwrap(), vec![]);
    }

    #[test]
    fn echo_loop() {
        assert_eq!(
            parse(b",[.,]").unwrap(),
            vec![Input, Loop(vec![Output, Input])]
        );
    }

    #[test]
    fn nested_loops() {
        assert_eq!(
            parse(b"[[+]-]").unwrap(),
            vec![Loop(vec![Loop(vec![Add(1)]), Add(-1)])]
        );
    }

    #[test]
    fn extra_close_loop() {
        let err = parse(b"]").unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::ExtraCloseLoop);
        let err = parse(b"[+]]").unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::ExtraCloseLoop);
    }

    #[test]
    fn unclosed_loop() {
        let err = parse(b"[").unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::UnclosedLoop);
        let err = parse(b"+[>[<]").unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::UnclosedLoop);
    }

    #[test]
    fn error_position() {
        let err = parse(b"++\n+]").unwrap_err();
        let msg = format!("{}", err);
        assert!(msg.contains("2:2"), "unexpected message: {}", msg);
    }

    #[test]
    fn deep_nesting() {
        // Parsing is iterative, so nesting depth is unbounded. Dropping the
        // resulting tree recurses, so leak it rather than unwind 10000
        // levels on the test thread's stack.
        let mut code = vec![b'['; 10_000];
        code.extend(vec![b']'; 10_000]);
        std::mem::forget(parse(&code).unwrap());
    }
}
