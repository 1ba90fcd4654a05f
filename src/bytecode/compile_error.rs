#[derive(Debug, Clone)]
pub enum CompileError {
    /// A call names an instruction the program never defines
    UndefinedInstruction { name: String },
    /// Expanding an instruction reached that same instruction again
    RecursiveInstruction { name: String, chain: Vec<String> },
}

impl CompileError {
    /// Create an error for a call to an unknown instruction
    pub fn undefined(name: &str) -> Self {
        CompileError::UndefinedInstruction {
            name: name.to_string(),
        }
    }

    /// Create an error for an instruction that expands through itself.
    /// `chain` is the expansion path, ending with the repeated name.
    pub fn recursive(name: &str, chain: Vec<String>) -> Self {
        CompileError::RecursiveInstruction {
            name: name.to_string(),
            chain,
        }
    }
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::UndefinedInstruction { name } => {
                write!(f, "compile error: call to undefined instruction '{}'", name)?;
                write!(
                    f,
                    "\n  hint: define it with 'INSTRUCTION {} IS ... END {}', or check the spelling",
                    name, name
                )
            }
            CompileError::RecursiveInstruction { name, chain } => {
                write!(f, "compile error: instruction '{}' is recursive", name)?;
                if chain.len() > 1 {
                    write!(f, " ({})", chain.join(" calls "))?;
                }
                write!(
                    f,
                    "\n  hint: calls are expanded inline, so an instruction can never reach itself"
                )
            }
        }
    }
}

impl std::error::Error for CompileError {}
