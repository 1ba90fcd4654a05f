//! Renders statement trees and whole programs back to BL source. The
//! output reparses to an equal tree, which is the contract the tests pin
//! down.

use super::program::Program;
use super::statement::Statement;

/// Spaces per nesting level.
pub const INDENT: usize = 4;

/// Render one statement tree, starting `offset` spaces from the left
/// margin. Every line ends in a newline; an empty block renders as
/// nothing at all.
#[allow(dead_code)]
pub fn statement_to_string(statement: &Statement, offset: usize) -> String {
    let mut out = String::new();
    write_statement(&mut out, statement, offset);
    out
}

fn write_line(out: &mut String, offset: usize, text: &str) {
    for _ in 0..offset {
        out.push(' ');
    }
    out.push_str(text);
    out.push('\n');
}

fn write_statement(out: &mut String, statement: &Statement, offset: usize) {
    match statement {
        Statement::Block(children) => {
            for child in children {
                write_statement(out, child, offset);
            }
        }
        Statement::If { condition, body } => {
            write_line(out, offset, &format!("IF {} THEN", condition));
            write_statement(out, body, offset + INDENT);
            write_line(out, offset, "END IF");
        }
        Statement::IfElse {
            condition,
            then_body,
            else_body,
        } => {
            write_line(out, offset, &format!("IF {} THEN", condition));
            write_statement(out, then_body, offset + INDENT);
            write_line(out, offset, "ELSE");
            write_statement(out, else_body, offset + INDENT);
            write_line(out, offset, "END IF");
        }
        Statement::While { condition, body } => {
            write_line(out, offset, &format!("WHILE {} DO", condition));
            write_statement(out, body, offset + INDENT);
            write_line(out, offset, "END WHILE");
        }
        Statement::Call(name) => {
            write_line(out, offset, name);
        }
    }
}

/// Render a whole program. Instruction definitions are listed in name
/// order, since the context map itself has no stable order.
pub fn program_to_string(program: &Program) -> String {
    let mut out = String::new();

    write_line(&mut out, 0, &format!("PROGRAM {} IS", program.name));
    out.push('\n');

    let mut instructions: Vec<_> = program.context.iter().collect();
    instructions.sort_by_key(|(name, _)| *name);

    for (name, body) in instructions {
        write_line(&mut out, INDENT, &format!("INSTRUCTION {} IS", name));
        write_statement(&mut out, body, 2 * INDENT);
        write_line(&mut out, INDENT, &format!("END {}", name));
        out.push('\n');
    }

    write_line(&mut out, 0, "BEGIN");
    write_statement(&mut out, &program.body, INDENT);
    write_line(&mut out, 0, &format!("END {}", program.name));

    out
}

/// Print a program to stdout in source form.
pub fn print_program(program: &Program) {
    print!("{}", program_to_string(program));
}
