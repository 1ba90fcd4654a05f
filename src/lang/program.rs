use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::statement::Statement;

/// User-defined instruction bodies in scope for one program, keyed by
/// instruction name. Key uniqueness is enforced by the parser; the
/// compiler only reads the map.
pub type Context = HashMap<String, Statement>;

/// Parsed BL program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    /// Name from the `PROGRAM <name> IS ... END <name>` frame.
    pub name: String,
    /// User-defined instructions.
    pub context: Context,
    /// Top-level `BEGIN ... END` body, always a `Block`.
    pub body: Statement,
}
