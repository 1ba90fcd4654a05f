//! Tree passes over parsed statements: call counting, instruction renaming
//! and if-else simplification. All of them share the compiler's recursion
//! shape but run on borrows, so none of them can change the tree except
//! where that is the point.

use std::mem;

use super::program::Program;
use super::statement::{Statement, is_primitive};

/// Number of calls to primitive instructions anywhere in the tree.
pub fn count_primitive_calls(statement: &Statement) -> usize {
    match statement {
        Statement::Block(children) => children.iter().map(count_primitive_calls).sum(),
        Statement::If { body, .. } | Statement::While { body, .. } => count_primitive_calls(body),
        Statement::IfElse {
            then_body,
            else_body,
            ..
        } => count_primitive_calls(then_body) + count_primitive_calls(else_body),
        Statement::Call(name) => {
            if is_primitive(name) {
                1
            } else {
                0
            }
        }
    }
}

/// Number of calls to the instruction named `name` anywhere in the tree.
pub fn count_instruction_calls(statement: &Statement, name: &str) -> usize {
    match statement {
        Statement::Block(children) => children
            .iter()
            .map(|child| count_instruction_calls(child, name))
            .sum(),
        Statement::If { body, .. } | Statement::While { body, .. } => {
            count_instruction_calls(body, name)
        }
        Statement::IfElse {
            then_body,
            else_body,
            ..
        } => count_instruction_calls(then_body, name) + count_instruction_calls(else_body, name),
        Statement::Call(called) => {
            if called == name {
                1
            } else {
                0
            }
        }
    }
}

/// Rewrites every `Call` of `old_name` into a call of `new_name`, in place.
/// A tree that never calls `old_name` comes back unchanged.
pub fn rename_instruction(statement: &mut Statement, old_name: &str, new_name: &str) {
    match statement {
        Statement::Block(children) => {
            for child in children {
                rename_instruction(child, old_name, new_name);
            }
        }
        Statement::If { body, .. } | Statement::While { body, .. } => {
            rename_instruction(body, old_name, new_name);
        }
        Statement::IfElse {
            then_body,
            else_body,
            ..
        } => {
            rename_instruction(then_body, old_name, new_name);
            rename_instruction(else_body, old_name, new_name);
        }
        Statement::Call(name) => {
            if name == old_name {
                *name = new_name.to_string();
            }
        }
    }
}

/// Renames a user instruction across a whole program: every call site in
/// the body, every call site inside other instruction bodies, and the
/// context key itself. The caller must pick a `new_name` not already
/// defined, or the moved entry would clobber an existing one.
pub fn rename_in_program(program: &mut Program, old_name: &str, new_name: &str) {
    rename_instruction(&mut program.body, old_name, new_name);
    for body in program.context.values_mut() {
        rename_instruction(body, old_name, new_name);
    }
    if let Some(body) = program.context.remove(old_name) {
        program.context.insert(new_name.to_string(), body);
    }
}

/// Rewrites every `IfElse` guarded by a negated sensor into the positive
/// sensor with the branches swapped. Subtrees are simplified first, so a
/// single pass normalizes arbitrarily nested negations.
pub fn simplify_if_else(statement: &mut Statement) {
    match statement {
        Statement::Block(children) => {
            for child in children {
                simplify_if_else(child);
            }
        }
        Statement::If { body, .. } | Statement::While { body, .. } => simplify_if_else(body),
        Statement::IfElse {
            condition,
            then_body,
            else_body,
        } => {
            simplify_if_else(then_body);
            simplify_if_else(else_body);
            if let Some(positive) = condition.without_negation() {
                *condition = positive;
                mem::swap(then_body, else_body);
            }
        }
        Statement::Call(_) => {}
    }
}

/// Applies [`simplify_if_else`] to the body and to every instruction
/// definition of a program.
pub fn simplify_program(program: &mut Program) {
    simplify_if_else(&mut program.body);
    for body in program.context.values_mut() {
        simplify_if_else(body);
    }
}
