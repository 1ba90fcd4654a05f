use serde::{Deserialize, Serialize};

use super::condition::Condition;

/// The five built-in atomic actions. Callable without a definition, and
/// reserved: a user instruction may not take one of these names.
pub const PRIMITIVES: [&str; 5] = ["move", "turnleft", "turnright", "infect", "skip"];

/// Whether `name` is one of the five primitive instructions.
pub fn is_primitive(name: &str) -> bool {
    PRIMITIVES.contains(&name)
}

/// One node of a BL statement tree.
///
/// The tree is strictly hierarchical: every node owns its children, and a
/// node is exactly one variant at a time. Taking a node apart (by matching)
/// and rebuilding it from the same parts yields an equal value, which is
/// what lets the tree-walking passes rewrite subtrees in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Statement {
    /// Ordered sequence of statements; insertion order is execution order.
    ///
    /// Every instruction body and every `THEN`/`ELSE`/`DO` region is a
    /// block, possibly empty.
    Block(Vec<Statement>),

    /// `IF <condition> THEN <body> END IF`
    If {
        condition: Condition,
        /// The `THEN` region, always a `Block`.
        body: Box<Statement>,
    },

    /// `IF <condition> THEN <then> ELSE <else> END IF`
    IfElse {
        condition: Condition,
        then_body: Box<Statement>,
        else_body: Box<Statement>,
    },

    /// `WHILE <condition> DO <body> END WHILE`
    While {
        condition: Condition,
        body: Box<Statement>,
    },

    /// Call of an instruction by name: one of the primitives or a
    /// user-defined instruction from the enclosing program's context.
    Call(String),
}

/// Variant tag of a [`Statement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum Kind {
    Block,
    If,
    IfElse,
    While,
    Call,
}

impl Statement {
    /// The variant this node currently is. No side effects.
    #[allow(dead_code)]
    pub fn kind(&self) -> Kind {
        match self {
            Statement::Block(_) => Kind::Block,
            Statement::If { .. } => Kind::If,
            Statement::IfElse { .. } => Kind::IfElse,
            Statement::While { .. } => Kind::While,
            Statement::Call(_) => Kind::Call,
        }
    }

    /// An empty block: the initial state of every body under construction
    /// and the placeholder left behind by `mem::take`.
    pub fn empty_block() -> Statement {
        Statement::Block(Vec::new())
    }
}

impl Default for Statement {
    fn default() -> Self {
        Statement::empty_block()
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Kind::Block => "BLOCK",
            Kind::If => "IF",
            Kind::IfElse => "IF_ELSE",
            Kind::While => "WHILE",
            Kind::Call => "CALL",
        })
    }
}
