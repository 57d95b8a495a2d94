//! Drives the system assembler and linker over generated assembly text.

use std::io::{self, Write};
use std::process::{Command, Stdio};

use crate::backend::Target;

/// Assembles `code` into the object file `out_name` by piping it through
/// the system assembler. Returns whether the assembler succeeded.
pub fn assemble(code: &str, out_name: &str, debug: bool) -> io::Result<bool> {
    let mut command = Command::new("as");
    if debug {
        command.arg("-g");
    }
    let mut child = command
        .arg("-o")
        .arg(out_name)
        .arg("-") // Standard input
        .stdin(Stdio::piped())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(code.as_bytes())?;
    }

    Ok(child.wait()?.success())
}

/// Links the object file `o_name` into the executable `out_name`.
/// Mach-O executables go through the C driver so the SDK and libSystem are
/// found; ELF executables are freestanding and link with ld alone.
pub fn link(target: Target, o_name: &str, out_name: &str) -> io::Result<bool> {
    let status = match target {
        Target::Arm64MacOs => Command::new("clang")
            .arg("-arch")
            .arg("arm64")
            .arg(o_name)
            .arg("-o")
            .arg(out_name)
            .status()?,
        Target::X8664Linux => Command::new("ld")
            .arg(o_name)
            .arg("-o")
            .arg(out_name)
            .status()?,
    };
    Ok(status.success())
}
