use serde::{Deserialize, Serialize};

/// Sensor test guarding an `IF` or `WHILE` statement.
///
/// BL spells conditions as hyphenated lowercase words (`next-is-wall`).
/// Every `next-is-*` sensor has a negated twin; `random` and `true` do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    NextIsEmpty,
    NextIsNotEmpty,
    NextIsEnemy,
    NextIsNotEnemy,
    NextIsFriend,
    NextIsNotFriend,
    NextIsWall,
    NextIsNotWall,
    Random,
    True,
}

impl Condition {
    /// Parse a condition from its source spelling. Returns `None` for any
    /// token that is not one of the ten literals (case-sensitive).
    pub fn from_token(token: &str) -> Option<Condition> {
        use Condition::*;
        Some(match token {
            "next-is-empty" => NextIsEmpty,
            "next-is-not-empty" => NextIsNotEmpty,
            "next-is-enemy" => NextIsEnemy,
            "next-is-not-enemy" => NextIsNotEnemy,
            "next-is-friend" => NextIsFriend,
            "next-is-not-friend" => NextIsNotFriend,
            "next-is-wall" => NextIsWall,
            "next-is-not-wall" => NextIsNotWall,
            "random" => Random,
            "true" => True,
            _ => return None,
        })
    }

    /// Source spelling of the condition.
    pub fn as_str(self) -> &'static str {
        use Condition::*;
        match self {
            NextIsEmpty => "next-is-empty",
            NextIsNotEmpty => "next-is-not-empty",
            NextIsEnemy => "next-is-enemy",
            NextIsNotEnemy => "next-is-not-enemy",
            NextIsFriend => "next-is-friend",
            NextIsNotFriend => "next-is-not-friend",
            NextIsWall => "next-is-wall",
            NextIsNotWall => "next-is-not-wall",
            Random => "random",
            True => "true",
        }
    }

    /// For a negated sensor, the same sensor with the negation stripped.
    /// `None` for conditions that are not negated forms.
    pub fn without_negation(self) -> Option<Condition> {
        use Condition::*;
        match self {
            NextIsNotEmpty => Some(NextIsEmpty),
            NextIsNotEnemy => Some(NextIsEnemy),
            NextIsNotFriend => Some(NextIsFriend),
            NextIsNotWall => Some(NextIsWall),
            _ => None,
        }
    }
}

impl std::fmt::Display for Condition {
    /// Format a condition using BL surface syntax.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
