use std::fmt;

/// A node in the compiler's intermediate representation.
///
/// The parser only ever produces `Add`/`Move` with values of 1 or -1; the
/// optimizer folds runs of them into larger magnitudes.
#[derive(Clone, PartialEq, Eq)]
pub enum AST {
    /// `Add(value)` Adds *value* to the current cell, wrapping mod 256
    Add(i32),
    /// `Move(steps)` Moves the data pointer by *steps* cells
    Move(i32),
    /// `Output` Writes the byte at the data pointer to stdout
    Output,
    /// `Input` Reads one byte from stdin into the current cell
    Input,
    /// `Loop(body)` Runs *body* while the current cell is not zero
    Loop(Vec<AST>),
}

impl fmt::Debug for AST {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            AST::Add(value) => write!(f, "Add(value={})", value),
            AST::Move(steps) => write!(f, "Move(steps={})", steps),
            AST::Output => write!(f, "Output"),
            AST::Input => write!(f, "Input"),
            AST::Loop(ref body) => {
                if f.alternate() {
                    write!(f, "Loop(body={:#?})", body)
                } else {
                    write!(f, "Loop(body={:?})", body)
                }
            }
        }
    }
}
