//! ARM64 macOS backend.
//!
//! x19 holds the tape pointer for the whole program, w0 is the scratch
//! register for cell loads. Syscalls use the BSD numbers (read=3, write=4,
//! exit=1) in x16 with `svc #0x80`. The tape lives in `__DATA,__data` as a
//! zero-filled `_tape` symbol addressed via adrp/@PAGEOFF.

use super::{indent, Backend, TAPE_SIZE};
use crate::ast::AST;

#[derive(Default)]
pub struct Arm64MacOs {
    label_idx: u32,
}

/// Largest immediate one add/sub instruction encodes.
const MAX_ADD_IMM: i64 = 4095;

/// Emits add/sub instructions applying `value` to `regs` (a "dst, src"
/// pair), splitting values outside the encodable immediate range across
/// several instructions.
fn push_delta(lines: &mut Vec<String>, regs: &str, value: i32) {
    let op = if value > 0 { "add" } else { "sub" };
    let mut left = i64::from(value).abs();
    while left > 0 {
        let chunk = left.min(MAX_ADD_IMM);
        lines.push(format!("{} {}, #{}", op, regs, chunk));
        left -= chunk;
    }
}

impl Backend for Arm64MacOs {
    fn generate(&mut self, ast: &[AST]) -> Vec<String> {
        let mut lines = Vec::new();
        for node in ast {
            match *node {
                AST::Add(value) if value != 0 => {
                    lines.push("ldrb w0, [x19]".to_string());
                    push_delta(&mut lines, "w0, w0", value);
                    lines.push("strb w0, [x19]".to_string());
                }
                AST::Add(_) => (),
                AST::Move(steps) if steps != 0 => {
                    push_delta(&mut lines, "x19, x19", steps);
                }
                AST::Move(_) => (),
                AST::Output => {
                    // write(1, x19, 1)
                    lines.extend(
                        [
                            "mov x0, #1",
                            "mov x1, x19",
                            "mov x2, #1",
                            "mov x16, #4",
                            "svc #0x80",
                        ]
                        .iter()
                        .map(|s| s.to_string()),
                    );
                }
                AST::Input => {
                    // read(0, x19, 1); read leaves the buffer untouched at
                    // EOF, so clear the cell first and exhausted input
                    // reads as zero
                    lines.extend(
                        [
                            "strb wzr, [x19]",
                            "mov x0, #0",
                            "mov x1, x19",
                            "mov x2, #1",
                            "mov x16, #3",
                            "svc #0x80",
                        ]
                        .iter()
                        .map(|s| s.to_string()),
                    );
                }
                AST::Loop(ref body) => {
                    self.label_idx += 1;
                    let label = self.label_idx;
                    lines.push(format!("L_start_{}:", label));
                    lines.push("ldrb w0, [x19]".to_string());
                    lines.push(format!("cbz w0, L_end_{}", label));
                    lines.extend(self.generate(body));
                    lines.push(format!("b L_start_{}", label));
                    lines.push(format!("L_end_{}:", label));
                }
            }
        }
        lines
    }

    fn wrap(&self, body: &[String]) -> String {
        let mut asm = vec![
            ".section __TEXT,__text,regular,pure_instructions".to_string(),
            ".global _main".to_string(),
            ".align 2".to_string(),
            "_main:".to_string(),
            "    stp x29, x30, [sp, #-16]!".to_string(),
            "    adrp x19, _tape@PAGE".to_string(),
            "    add x19, x19, _tape@PAGEOFF".to_string(),
        ];
        asm.extend(body.iter().map(|line| indent(line)));
        // exit(0)
        asm.push("    mov x0, #0".to_string());
        asm.push("    mov x16, #1".to_string());
        asm.push("    svc #0x80".to_string());
        asm.push(".section __DATA,__data".to_string());
        asm.push(".align 3".to_string());
        asm.push("_tape:".to_string());
        asm.push(format!("    .zero {}", TAPE_SIZE));
        asm.join("\n") + "\n"
    }
}
