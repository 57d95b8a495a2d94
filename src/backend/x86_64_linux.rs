//! x86-64 Linux backend.
//!
//! %rbx holds the tape pointer for the whole program; cell updates use the
//! byte forms of add/sub directly on memory. Syscalls use the Linux numbers
//! (read=0, write=1, exit=60) in %rax with the `syscall` instruction. The
//! tape is a `.lcomm` allocation in `.bss`. Output is GNU as AT&T syntax.

use super::{indent, Backend, TAPE_SIZE};
use crate::ast::AST;

#[derive(Default)]
pub struct X8664Linux {
    label_idx: u32,
}

impl Backend for X8664Linux {
    fn generate(&mut self, ast: &[AST]) -> Vec<String> {
        let mut lines = Vec::new();
        for node in ast {
            match *node {
                AST::Add(value) if value > 0 => {
                    lines.push(format!("addb ${}, (%rbx)", value));
                }
                AST::Add(value) if value < 0 => {
                    lines.push(format!("subb ${}, (%rbx)", -value));
                }
                AST::Add(_) => (),
                AST::Move(steps) if steps > 0 => {
                    lines.push(format!("addq ${}, %rbx", steps));
                }
                AST::Move(steps) if steps < 0 => {
                    lines.push(format!("subq ${}, %rbx", -steps));
                }
                AST::Move(_) => (),
                AST::Output => {
                    // write(1, %rbx, 1)
                    lines.extend(
                        [
                            "movq $1, %rax",
                            "movq $1, %rdi",
                            "movq %rbx, %rsi",
                            "movq $1, %rdx",
                            "syscall",
                        ]
                        .iter()
                        .map(|s| s.to_string()),
                    );
                }
                AST::Input => {
                    // read(0, %rbx, 1); read leaves the buffer untouched at
                    // EOF, so clear the cell first and exhausted input
                    // reads as zero
                    lines.extend(
                        [
                            "movb $0, (%rbx)",
                            "xor %rax, %rax",
                            "xor %rdi, %rdi",
                            "movq %rbx, %rsi",
                            "movq $1, %rdx",
                            "syscall",
                        ]
                        .iter()
                        .map(|s| s.to_string()),
                    );
                }
                AST::Loop(ref body) => {
                    self.label_idx += 1;
                    let label = self.label_idx;
                    lines.push(format!("L_start_{}:", label));
                    lines.push("cmpb $0, (%rbx)".to_string());
                    lines.push(format!("je L_end_{}", label));
                    lines.extend(self.generate(body));
                    lines.push(format!("jmp L_start_{}", label));
                    lines.push(format!("L_end_{}:", label));
                }
            }
        }
        lines
    }

    fn wrap(&self, body: &[String]) -> String {
        let mut asm = vec![
            ".section .text".to_string(),
            ".global _start".to_string(),
            "_start:".to_string(),
            "    movq $tape, %rbx".to_string(),
        ];
        asm.extend(body.iter().map(|line| indent(line)));
        // exit(0)
        asm.push("    movq $60, %rax".to_string());
        asm.push("    xor %rdi, %rdi".to_string());
        asm.push("    syscall".to_string());
        asm.push(".section .bss".to_string());
        asm.push(format!("    .lcomm tape, {}", TAPE_SIZE));
        asm.join("\n") + "\n"
    }
}
