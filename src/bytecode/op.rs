use std::fmt;

use crate::lang::condition::Condition;

// =============================================================================
// OPCODE - Flat robot instructions
// =============================================================================

/// One cell of compiled code. The numeric values are the on-disk format,
/// so they never change; new opcodes go on the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    // primitive actions
    Move = 0,
    TurnLeft = 1,
    TurnRight = 2,
    Infect = 3,
    Skip = 4,

    /// Unconditional jump. The next cell holds the absolute target address.
    Jump = 5,

    // conditional jumps, one per condition. Each tests its condition and
    // jumps to the address in the next cell when the test comes out false.
    JumpIfNotNextIsEmpty = 6,
    JumpIfNotNextIsNotEmpty = 7,
    JumpIfNotNextIsEnemy = 8,
    JumpIfNotNextIsNotEnemy = 9,
    JumpIfNotNextIsFriend = 10,
    JumpIfNotNextIsNotFriend = 11,
    JumpIfNotNextIsWall = 12,
    JumpIfNotNextIsNotWall = 13,
    JumpIfNotRandom = 14,
    JumpIfNotTrue = 15,

    /// End of program.
    Halt = 16,
}

impl Opcode {
    /// The cell value this opcode compiles to.
    pub fn byte_code(self) -> i32 {
        self as i32
    }

    /// Decode one cell value. Address operands are plain integers, so
    /// values outside the opcode range simply decode to `None`.
    pub fn from_byte_code(code: i32) -> Option<Opcode> {
        let op = match code {
            0 => Opcode::Move,
            1 => Opcode::TurnLeft,
            2 => Opcode::TurnRight,
            3 => Opcode::Infect,
            4 => Opcode::Skip,
            5 => Opcode::Jump,
            6 => Opcode::JumpIfNotNextIsEmpty,
            7 => Opcode::JumpIfNotNextIsNotEmpty,
            8 => Opcode::JumpIfNotNextIsEnemy,
            9 => Opcode::JumpIfNotNextIsNotEnemy,
            10 => Opcode::JumpIfNotNextIsFriend,
            11 => Opcode::JumpIfNotNextIsNotFriend,
            12 => Opcode::JumpIfNotNextIsWall,
            13 => Opcode::JumpIfNotNextIsNotWall,
            14 => Opcode::JumpIfNotRandom,
            15 => Opcode::JumpIfNotTrue,
            16 => Opcode::Halt,
            _ => return None,
        };
        Some(op)
    }

    /// The jump taken when `condition` tests false.
    pub fn jump_if_not(condition: Condition) -> Opcode {
        match condition {
            Condition::NextIsEmpty => Opcode::JumpIfNotNextIsEmpty,
            Condition::NextIsNotEmpty => Opcode::JumpIfNotNextIsNotEmpty,
            Condition::NextIsEnemy => Opcode::JumpIfNotNextIsEnemy,
            Condition::NextIsNotEnemy => Opcode::JumpIfNotNextIsNotEnemy,
            Condition::NextIsFriend => Opcode::JumpIfNotNextIsFriend,
            Condition::NextIsNotFriend => Opcode::JumpIfNotNextIsNotFriend,
            Condition::NextIsWall => Opcode::JumpIfNotNextIsWall,
            Condition::NextIsNotWall => Opcode::JumpIfNotNextIsNotWall,
            Condition::Random => Opcode::JumpIfNotRandom,
            Condition::True => Opcode::JumpIfNotTrue,
        }
    }

    /// The opcode for a primitive instruction name, if `name` is one.
    pub fn for_primitive(name: &str) -> Option<Opcode> {
        let op = match name {
            "move" => Opcode::Move,
            "turnleft" => Opcode::TurnLeft,
            "turnright" => Opcode::TurnRight,
            "infect" => Opcode::Infect,
            "skip" => Opcode::Skip,
            _ => return None,
        };
        Some(op)
    }

    /// How many cells follow the opcode. Jumps carry one address cell,
    /// everything else stands alone.
    pub fn operand_count(self) -> usize {
        match self {
            Opcode::Move
            | Opcode::TurnLeft
            | Opcode::TurnRight
            | Opcode::Infect
            | Opcode::Skip
            | Opcode::Halt => 0,
            _ => 1,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Move => "MOVE",
            Opcode::TurnLeft => "TURNLEFT",
            Opcode::TurnRight => "TURNRIGHT",
            Opcode::Infect => "INFECT",
            Opcode::Skip => "SKIP",
            Opcode::Jump => "JUMP",
            Opcode::JumpIfNotNextIsEmpty => "JUMP_IF_NOT_NEXT_IS_EMPTY",
            Opcode::JumpIfNotNextIsNotEmpty => "JUMP_IF_NOT_NEXT_IS_NOT_EMPTY",
            Opcode::JumpIfNotNextIsEnemy => "JUMP_IF_NOT_NEXT_IS_ENEMY",
            Opcode::JumpIfNotNextIsNotEnemy => "JUMP_IF_NOT_NEXT_IS_NOT_ENEMY",
            Opcode::JumpIfNotNextIsFriend => "JUMP_IF_NOT_NEXT_IS_FRIEND",
            Opcode::JumpIfNotNextIsNotFriend => "JUMP_IF_NOT_NEXT_IS_NOT_FRIEND",
            Opcode::JumpIfNotNextIsWall => "JUMP_IF_NOT_NEXT_IS_WALL",
            Opcode::JumpIfNotNextIsNotWall => "JUMP_IF_NOT_NEXT_IS_NOT_WALL",
            Opcode::JumpIfNotRandom => "JUMP_IF_NOT_RANDOM",
            Opcode::JumpIfNotTrue => "JUMP_IF_NOT_TRUE",
            Opcode::Halt => "HALT",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_values_are_stable() {
        let expected = [
            (Opcode::Move, 0),
            (Opcode::TurnLeft, 1),
            (Opcode::TurnRight, 2),
            (Opcode::Infect, 3),
            (Opcode::Skip, 4),
            (Opcode::Jump, 5),
            (Opcode::JumpIfNotNextIsEmpty, 6),
            (Opcode::JumpIfNotNextIsNotEmpty, 7),
            (Opcode::JumpIfNotNextIsEnemy, 8),
            (Opcode::JumpIfNotNextIsNotEnemy, 9),
            (Opcode::JumpIfNotNextIsFriend, 10),
            (Opcode::JumpIfNotNextIsNotFriend, 11),
            (Opcode::JumpIfNotNextIsWall, 12),
            (Opcode::JumpIfNotNextIsNotWall, 13),
            (Opcode::JumpIfNotRandom, 14),
            (Opcode::JumpIfNotTrue, 15),
            (Opcode::Halt, 16),
        ];
        for (op, code) in expected {
            assert_eq!(op.byte_code(), code, "{}", op);
            assert_eq!(Opcode::from_byte_code(code), Some(op));
        }
    }

    #[test]
    fn test_decoding_rejects_values_outside_the_opcode_range() {
        assert_eq!(Opcode::from_byte_code(-1), None);
        assert_eq!(Opcode::from_byte_code(17), None);
        assert_eq!(Opcode::from_byte_code(1000), None);
    }

    #[test]
    fn test_every_condition_has_a_conditional_jump() {
        assert_eq!(
            Opcode::jump_if_not(Condition::NextIsEmpty),
            Opcode::JumpIfNotNextIsEmpty
        );
        assert_eq!(
            Opcode::jump_if_not(Condition::NextIsNotEnemy),
            Opcode::JumpIfNotNextIsNotEnemy
        );
        assert_eq!(Opcode::jump_if_not(Condition::Random), Opcode::JumpIfNotRandom);
        assert_eq!(Opcode::jump_if_not(Condition::True), Opcode::JumpIfNotTrue);
    }

    #[test]
    fn test_primitive_names_map_to_their_opcodes() {
        assert_eq!(Opcode::for_primitive("move"), Some(Opcode::Move));
        assert_eq!(Opcode::for_primitive("turnleft"), Some(Opcode::TurnLeft));
        assert_eq!(Opcode::for_primitive("turnright"), Some(Opcode::TurnRight));
        assert_eq!(Opcode::for_primitive("infect"), Some(Opcode::Infect));
        assert_eq!(Opcode::for_primitive("skip"), Some(Opcode::Skip));
        assert_eq!(Opcode::for_primitive("sidestep"), None);
        assert_eq!(Opcode::for_primitive("MOVE"), None);
    }

    #[test]
    fn test_only_jumps_carry_an_address_operand() {
        assert_eq!(Opcode::Move.operand_count(), 0);
        assert_eq!(Opcode::Halt.operand_count(), 0);
        assert_eq!(Opcode::Jump.operand_count(), 1);
        assert_eq!(Opcode::JumpIfNotTrue.operand_count(), 1);
        assert_eq!(Opcode::JumpIfNotNextIsWall.operand_count(), 1);
    }
}
