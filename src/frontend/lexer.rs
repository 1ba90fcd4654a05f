use crate::lang::condition::Condition;

/// Sentinel appended after the last source token. Contains whitespace, so
/// no real token can ever collide with it.
pub const END_OF_INPUT: &str = "### END OF INPUT ###";

/// The reserved words of BL. Reserved words are never identifiers.
pub const KEYWORDS: [&str; 10] = [
    "PROGRAM",
    "IS",
    "BEGIN",
    "END",
    "INSTRUCTION",
    "IF",
    "THEN",
    "ELSE",
    "WHILE",
    "DO",
];

#[derive(Debug, Clone)]
pub struct Span {
    pub line: usize,
    pub col: usize,
}

/// One whitespace-free word of BL source, with the position it started at.
#[derive(Debug, Clone)]
pub struct Token {
    pub text: String,
    pub span: Span,
}

/// Whether `token` is one of the ten reserved words.
pub fn is_keyword(token: &str) -> bool {
    KEYWORDS.contains(&token)
}

/// Whether `token` is one of the ten condition literals.
pub fn is_condition(token: &str) -> bool {
    Condition::from_token(token).is_some()
}

/// Whether `token` is a well-formed identifier: one or more ASCII letters
/// and digits, starting with a letter, and not a keyword or condition
/// literal. Primitive instruction names are identifiers.
pub fn is_identifier(token: &str) -> bool {
    let mut chars = token.chars();
    let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    starts_with_letter
        && chars.all(|c| c.is_ascii_alphanumeric())
        && !is_keyword(token)
        && !is_condition(token)
}

pub struct Lexer {
    source: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Lexer {
            source: source.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    fn current(&self) -> Option<char> {
        self.source.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.current();
        if ch == Some('\n') {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        self.pos += 1;
        ch
    }

    fn span(&self) -> Span {
        Span {
            line: self.line,
            col: self.col,
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(ch) = self.current() {
            if ch.is_whitespace() {
                break;
            }
            word.push(ch);
            self.advance();
        }
        word
    }

    /// Split the source into whitespace-free words and append the
    /// end-of-input sentinel. Never fails: malformed words are diagnosed
    /// later, by the parser, with the span recorded here.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();
            let span = self.span();

            if self.current().is_none() {
                tokens.push(Token {
                    text: END_OF_INPUT.to_string(),
                    span,
                });
                break;
            }

            let text = self.read_word();
            tokens.push(Token { text, span });
        }

        tokens
    }
}
