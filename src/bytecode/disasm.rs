use crate::bytecode::{CompiledProgram, Opcode};

/// Print disassembly of a compiled program
pub fn print_bc(bc: &CompiledProgram) {
    println!("=== BYTECODE PROGRAM ===\n");
    println!("════════════════════════════════════════");
    println!(" {} cells", bc.len());
    println!("════════════════════════════════════════");
    print!("{}", disassemble_to_string(&bc.code));
    println!();
}

/// Return disassembly as a String. Jump targets get a marker line so
/// loops and branches are easy to follow by eye.
pub fn disassemble_to_string(code: &[i32]) -> String {
    let jump_targets = collect_jump_targets(code);
    let mut output = String::new();

    let mut ip = 0;
    while ip < code.len() {
        if jump_targets.contains(&ip) {
            output.push_str("      ┌──────────────────────────────────\n");
        }

        output.push_str(&format!("{:04} ", ip));

        if jump_targets.contains(&ip) {
            output.push_str("► ");
        } else {
            output.push_str("  ");
        }

        match Opcode::from_byte_code(code[ip]) {
            Some(op) if op.operand_count() == 1 && ip + 1 < code.len() => {
                let target = code[ip + 1];
                let direction = if (target as i64) <= ip as i64 { "↑" } else { "↓" };
                output.push_str(&format!("{:<32}{:04} {}", op.mnemonic(), target, direction));
                ip += 2;
            }
            Some(op) => {
                output.push_str(op.mnemonic());
                ip += 1;
            }
            // not a known opcode, show the raw cell
            None => {
                output.push_str(&format!("{:<32}{}", "???", code[ip]));
                ip += 1;
            }
        }

        output.push('\n');
    }

    output
}

/// Collect every address some jump points at, in discovery order.
fn collect_jump_targets(code: &[i32]) -> Vec<usize> {
    let mut targets = Vec::new();

    let mut ip = 0;
    while ip < code.len() {
        match Opcode::from_byte_code(code[ip]) {
            Some(op) if op.operand_count() == 1 && ip + 1 < code.len() => {
                let target = code[ip + 1];
                if target >= 0 {
                    let target = target as usize;
                    if !targets.contains(&target) {
                        targets.push(target);
                    }
                }
                ip += 2;
            }
            _ => ip += 1,
        }
    }

    targets
}
