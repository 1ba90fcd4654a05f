//! # BL Statement Trees
//!
//! This module defines the tree representation of a BL robot program.
//! Trees are produced by the parser and consumed by the bytecode compiler,
//! the pretty-printer, and the analysis passes.
//!
//! ## Documentation conventions
//!
//! - BL keywords are written in caps: `IF ... THEN ... END IF`.
//! - "Primitive" always means one of the five built-in robot actions;
//!   "instruction" means a user-defined `INSTRUCTION name IS ...` body.

pub mod condition;
pub mod passes;
pub mod pretty;
pub mod program;
pub mod statement;
