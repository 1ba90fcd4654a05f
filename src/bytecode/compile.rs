use crate::{
    bytecode::{compile_error::CompileError, ir::CompiledProgram, op::Opcode},
    lang::{
        condition::Condition,
        program::{Context, Program},
        statement::Statement,
    },
};

/// Compile a whole program to flat code. The result always ends in HALT,
/// and the input program is left untouched.
pub fn compile_program(program: &Program) -> Result<CompiledProgram, CompileError> {
    let mut compiler = Compiler::new(&program.context);
    compiler.statement(&program.body)?;
    compiler.emit_op(Opcode::Halt);
    Ok(CompiledProgram {
        code: compiler.code,
    })
}

pub struct Compiler<'a> {
    /// Instruction definitions available for inlining
    context: &'a Context,

    /// Output code, one cell per opcode or address operand
    code: Vec<i32>,

    /// Names currently being expanded, outermost first
    inlining: Vec<String>,
}

impl<'a> Compiler<'a> {
    pub fn new(context: &'a Context) -> Self {
        Self {
            context,
            code: Vec::new(),
            inlining: Vec::new(),
        }
    }

    /// Compile a single statement without the trailing HALT
    /// (for testing or explicit use).
    #[allow(dead_code)]
    pub fn compile_statement(mut self, statement: &Statement) -> Result<Vec<i32>, CompileError> {
        self.statement(statement)?;
        Ok(self.code)
    }

    fn statement(&mut self, statement: &Statement) -> Result<(), CompileError> {
        match statement {
            Statement::Block(children) => {
                for child in children {
                    self.statement(child)?;
                }
            }

            // JUMP_IF_NOT_c exit
            // <body>
            // exit:
            Statement::If { condition, body } => {
                let exit = self.emit_test(*condition);
                self.statement(body)?;
                self.patch(exit);
            }

            // JUMP_IF_NOT_c else
            // <then-body>
            // JUMP end
            // else: <else-body>
            // end:
            Statement::IfElse {
                condition,
                then_body,
                else_body,
            } => {
                let to_else = self.emit_test(*condition);
                self.statement(then_body)?;
                self.emit_op(Opcode::Jump);
                let to_end = self.emit_placeholder();
                self.patch(to_else);
                self.statement(else_body)?;
                self.patch(to_end);
            }

            // top: JUMP_IF_NOT_c exit
            // <body>
            // JUMP top
            // exit:
            Statement::While { condition, body } => {
                let top = self.here();
                let exit = self.emit_test(*condition);
                self.statement(body)?;
                self.emit_op(Opcode::Jump);
                self.emit(top);
                self.patch(exit);
            }

            Statement::Call(name) => self.call(name)?,
        }

        Ok(())
    }

    /// Compile a call, either to a primitive opcode or by expanding an
    /// instruction body in place.
    fn call(&mut self, name: &str) -> Result<(), CompileError> {
        if let Some(op) = Opcode::for_primitive(name) {
            self.emit_op(op);
            return Ok(());
        }

        if self.inlining.iter().any(|inlined| inlined == name) {
            let mut chain = self.inlining.clone();
            chain.push(name.to_string());
            return Err(CompileError::recursive(name, chain));
        }

        let body = match self.context.get(name) {
            Some(body) => body,
            None => return Err(CompileError::undefined(name)),
        };

        self.inlining.push(name.to_string());
        self.statement(body)?;
        self.inlining.pop();

        Ok(())
    }

    // =========================================================================
    // Code buffer
    // =========================================================================

    /// Address of the next cell to be emitted.
    fn here(&self) -> i32 {
        self.code.len() as i32
    }

    fn emit(&mut self, cell: i32) {
        self.code.push(cell);
    }

    fn emit_op(&mut self, op: Opcode) {
        self.emit(op.byte_code());
    }

    /// Reserve one address cell and return its index. Every reserved cell
    /// is patched exactly once before compilation finishes.
    fn emit_placeholder(&mut self) -> usize {
        self.code.push(-1);
        self.code.len() - 1
    }

    /// Emit a conditional jump with a reserved target cell; returns the
    /// cell's index for patching.
    fn emit_test(&mut self, condition: Condition) -> usize {
        self.emit_op(Opcode::jump_if_not(condition));
        self.emit_placeholder()
    }

    /// Point a reserved cell at the next address to be emitted.
    fn patch(&mut self, slot: usize) {
        debug_assert_eq!(self.code[slot], -1);
        self.code[slot] = self.here();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::lexer::Lexer;
    use crate::frontend::parser::Parser;

    fn program(source: &str) -> Program {
        let tokens = Lexer::new(source).tokenize();
        Parser::new(tokens).parse_program().unwrap()
    }

    fn compile(source: &str) -> Vec<i32> {
        compile_program(&program(source)).unwrap().code
    }

    fn compile_err(source: &str) -> CompileError {
        compile_program(&program(source)).unwrap_err()
    }

    // =========================================================================
    // Straight-line code
    // =========================================================================

    #[test]
    fn test_empty_program_is_just_halt() {
        assert_eq!(compile("PROGRAM Test IS BEGIN END Test"), vec![16]);
    }

    #[test]
    fn test_primitives_compile_to_their_opcodes() {
        let code = compile("PROGRAM Test IS BEGIN move turnleft END Test");
        assert_eq!(code, vec![0, 1, 16]);
    }

    #[test]
    fn test_all_five_primitives() {
        let code = compile("PROGRAM Test IS BEGIN move turnleft turnright infect skip END Test");
        assert_eq!(code, vec![0, 1, 2, 3, 4, 16]);
    }

    // =========================================================================
    // Jump layouts
    // =========================================================================

    #[test]
    fn test_if_jumps_past_its_body() {
        let code = compile("PROGRAM Test IS BEGIN IF next-is-wall THEN move move END IF END Test");

        // 0: JUMP_IF_NOT_NEXT_IS_WALL 4
        // 2: MOVE
        // 3: MOVE
        // 4: HALT
        assert_eq!(code, vec![12, 4, 0, 0, 16]);

        let target = code[1] as usize;
        assert_eq!(code[target], 16, "exit jump should land on HALT");
    }

    #[test]
    fn test_if_with_empty_body() {
        let code = compile("PROGRAM Test IS BEGIN IF next-is-wall THEN END IF END Test");
        assert_eq!(code, vec![12, 2, 16]);
    }

    #[test]
    fn test_if_else_takes_one_arm_past_the_other() {
        let code = compile(
            "PROGRAM Test IS BEGIN \
                 IF next-is-wall THEN turnleft ELSE turnright END IF \
             END Test",
        );

        // 0: JUMP_IF_NOT_NEXT_IS_WALL 5
        // 2: TURNLEFT
        // 3: JUMP 6
        // 5: TURNRIGHT
        // 6: HALT
        assert_eq!(code, vec![12, 5, 1, 5, 6, 2, 16]);

        let else_target = code[1] as usize;
        assert_eq!(code[else_target], 2, "false branch should land on TURNRIGHT");
        let end_target = code[4] as usize;
        assert_eq!(code[end_target], 16, "then arm should jump past the else arm");
    }

    #[test]
    fn test_if_else_with_empty_arms_lands_both_jumps_on_halt() {
        let code = compile("PROGRAM Test IS BEGIN IF true THEN move ELSE END IF END Test");

        // 0: JUMP_IF_NOT_TRUE 5
        // 2: MOVE
        // 3: JUMP 5
        // 5: HALT
        assert_eq!(code, vec![15, 5, 0, 5, 5, 16]);
    }

    #[test]
    fn test_while_jumps_back_to_its_test() {
        let code = compile("PROGRAM Test IS BEGIN WHILE true DO move END WHILE END Test");

        // 0: JUMP_IF_NOT_TRUE 5
        // 2: MOVE
        // 3: JUMP 0
        // 5: HALT
        assert_eq!(code, vec![15, 5, 0, 5, 0, 16]);

        assert_eq!(code[4], 0, "backward jump should land on the loop test");
        let exit_target = code[1] as usize;
        assert_eq!(code[exit_target], 16, "loop exit should land on HALT");
    }

    #[test]
    fn test_if_nested_inside_while() {
        let code = compile(
            "PROGRAM Test IS BEGIN \
                 WHILE next-is-not-wall DO \
                     IF random THEN move END IF \
                 END WHILE \
             END Test",
        );

        // 0: JUMP_IF_NOT_NEXT_IS_NOT_WALL 7
        // 2: JUMP_IF_NOT_RANDOM 5
        // 4: MOVE
        // 5: JUMP 0
        // 7: HALT
        assert_eq!(code, vec![13, 7, 14, 5, 0, 5, 0, 16]);
    }

    #[test]
    fn test_each_condition_selects_its_own_jump() {
        let conditions = [
            ("next-is-empty", 6),
            ("next-is-not-empty", 7),
            ("next-is-enemy", 8),
            ("next-is-not-enemy", 9),
            ("next-is-friend", 10),
            ("next-is-not-friend", 11),
            ("next-is-wall", 12),
            ("next-is-not-wall", 13),
            ("random", 14),
            ("true", 15),
        ];
        for (condition, opcode) in conditions {
            let source = format!(
                "PROGRAM Test IS BEGIN IF {} THEN skip END IF END Test",
                condition
            );
            let code = compile(&source);
            assert_eq!(code, vec![opcode, 3, 4, 16], "condition {}", condition);
        }
    }

    // =========================================================================
    // Instruction expansion
    // =========================================================================

    #[test]
    fn test_calls_expand_the_instruction_body_in_place() {
        let code = compile(
            "PROGRAM Test IS \
             INSTRUCTION step IS move move END step \
             BEGIN step step END Test",
        );
        assert_eq!(code, vec![0, 0, 0, 0, 16]);
    }

    #[test]
    fn test_expansion_reaches_through_nested_calls() {
        let code = compile(
            "PROGRAM Test IS \
             INSTRUCTION step IS move END step \
             INSTRUCTION dance IS step turnleft step END dance \
             BEGIN dance END Test",
        );
        assert_eq!(code, vec![0, 1, 0, 16]);
    }

    #[test]
    fn test_expanded_bodies_carry_their_own_jumps() {
        let code = compile(
            "PROGRAM Test IS \
             INSTRUCTION guard IS IF next-is-wall THEN turnleft END IF END guard \
             BEGIN move guard END Test",
        );

        // 0: MOVE
        // 1: JUMP_IF_NOT_NEXT_IS_WALL 4
        // 3: TURNLEFT
        // 4: HALT
        assert_eq!(code, vec![0, 12, 4, 1, 16]);
    }

    #[test]
    fn test_same_instruction_may_be_expanded_twice() {
        let code = compile(
            "PROGRAM Test IS \
             INSTRUCTION turnaround IS turnleft turnleft END turnaround \
             BEGIN turnaround move turnaround END Test",
        );
        assert_eq!(code, vec![1, 1, 0, 1, 1, 16]);
    }

    // =========================================================================
    // Errors
    // =========================================================================

    #[test]
    fn test_call_to_undefined_instruction_fails() {
        let err = compile_err("PROGRAM Test IS BEGIN zigzag END Test");

        assert!(matches!(
            &err,
            CompileError::UndefinedInstruction { name } if name == "zigzag"
        ));
    }

    #[test]
    fn test_direct_recursion_fails() {
        let err = compile_err(
            "PROGRAM Test IS \
             INSTRUCTION forever IS move forever END forever \
             BEGIN forever END Test",
        );

        assert!(matches!(
            &err,
            CompileError::RecursiveInstruction { name, .. } if name == "forever"
        ));
    }

    #[test]
    fn test_mutual_recursion_fails_with_the_chain() {
        let err = compile_err(
            "PROGRAM Test IS \
             INSTRUCTION ping IS pong END ping \
             INSTRUCTION pong IS ping END pong \
             BEGIN ping END Test",
        );

        match err {
            CompileError::RecursiveInstruction { name, chain } => {
                assert_eq!(name, "ping");
                assert_eq!(chain, vec!["ping", "pong", "ping"]);
            }
            other => panic!("expected recursion error, got {:?}", other),
        }
    }

    #[test]
    fn test_unused_recursive_instruction_is_harmless() {
        // Expansion only happens for instructions the body reaches.
        let code = compile(
            "PROGRAM Test IS \
             INSTRUCTION forever IS forever END forever \
             BEGIN move END Test",
        );
        assert_eq!(code, vec![0, 16]);
    }

    // =========================================================================
    // Whole-program behavior
    // =========================================================================

    #[test]
    fn test_compilation_leaves_the_program_unchanged() {
        let p = program(
            "PROGRAM Test IS \
             INSTRUCTION step IS move END step \
             BEGIN WHILE true DO step END WHILE END Test",
        );
        let before = p.clone();

        compile_program(&p).unwrap();

        assert_eq!(p, before);
    }

    #[test]
    fn test_every_reserved_cell_is_patched() {
        let code = compile(
            "PROGRAM Test IS BEGIN \
                 WHILE next-is-not-empty DO \
                     IF next-is-enemy THEN infect ELSE move END IF \
                 END WHILE \
             END Test",
        );
        assert!(!code.contains(&-1), "unpatched placeholder in {:?}", code);
    }

    #[test]
    fn test_statement_compilation_omits_the_halt() {
        let p = program(
            "PROGRAM Test IS \
             INSTRUCTION step IS move END step \
             BEGIN step turnleft END Test",
        );

        let code = Compiler::new(&p.context).compile_statement(&p.body).unwrap();

        assert_eq!(code, vec![0, 1]);
    }
}
