//! Target-specific code generation.
//!
//! Each backend turns the optimized IR into a list of assembly lines
//! (`generate`) and stitches them into a complete assembly unit with
//! prologue, epilogue and tape allocation (`wrap`). The set of targets is
//! closed, so selection is a plain enum match.

use std::error::Error;
use std::fmt;
use std::str::FromStr;

use static_assertions::const_assert;

mod arm64_macos;
mod x86_64_linux;

pub use arm64_macos::Arm64MacOs;
pub use x86_64_linux::X8664Linux;

use crate::ast::AST;

/// Number of cells in the statically allocated tape.
pub const TAPE_SIZE: usize = 30000;

const_assert!(tape_size_nonzero; TAPE_SIZE > 0);
const_assert!(tape_size_fits_i32; TAPE_SIZE <= i32::max_value() as usize);

pub trait Backend {
    /// Translates IR to assembly lines, without prologue or epilogue.
    /// Loop labels are drawn from a counter on the backend instance, so
    /// every loop in one compilation gets a distinct pair.
    fn generate(&mut self, ast: &[AST]) -> Vec<String>;

    /// Wraps generated lines into a complete assembly unit: entry symbol,
    /// tape pointer setup, the body, an exit(0) syscall and the tape
    /// allocation.
    fn wrap(&self, body: &[String]) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Arm64MacOs,
    X8664Linux,
}

impl Target {
    pub const NAMES: [&'static str; 2] = ["arm64-macos", "x86_64-linux"];

    pub fn name(self) -> &'static str {
        match self {
            Target::Arm64MacOs => "arm64-macos",
            Target::X8664Linux => "x86_64-linux",
        }
    }

    /// Returns a fresh backend for this target. Backends hold the label
    /// counter, so concurrent compilations never share state.
    pub fn backend(self) -> Box<dyn Backend> {
        match self {
            Target::Arm64MacOs => Box::new(Arm64MacOs::default()),
            Target::X8664Linux => Box::new(X8664Linux::default()),
        }
    }
}

impl FromStr for Target {
    type Err = UnsupportedTarget;

    fn from_str(s: &str) -> Result<Self, UnsupportedTarget> {
        match s {
            "arm64-macos" => Ok(Target::Arm64MacOs),
            "x86_64-linux" => Ok(Target::X8664Linux),
            _ => Err(UnsupportedTarget(s.to_string())),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug)]
pub struct UnsupportedTarget(pub String);

impl fmt::Display for UnsupportedTarget {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "unsupported target '{}' (supported: {})",
            self.0,
            Target::NAMES.join(", ")
        )
    }
}

impl Error for UnsupportedTarget {}

/// Indents everything except label definitions.
fn indent(line: &str) -> String {
    if line.ends_with(':') {
        line.to_string()
    } else {
        format!("    {}", line)
    }
}
