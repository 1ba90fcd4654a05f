pub mod compile;
pub mod compile_error;
pub mod disasm;
pub mod image_error;
pub mod ir;
pub mod op;

pub use ir::CompiledProgram;
pub use op::Opcode;
