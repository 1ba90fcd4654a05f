use crate::frontend::lexer::{END_OF_INPUT, Token, is_condition, is_keyword};
use crate::lang::statement::is_primitive;

pub struct TokenDumper {
    pub color: bool,
}

impl Default for TokenDumper {
    fn default() -> Self {
        Self { color: true }
    }
}

impl TokenDumper {
    // ANSI colors
    const RESET: &'static str = "\x1b[0m";
    const DIM: &'static str = "\x1b[2m";
    const GRN: &'static str = "\x1b[32m";
    const YEL: &'static str = "\x1b[33m";
    const CYN: &'static str = "\x1b[36m";
    const MAG: &'static str = "\x1b[35m";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn no_color(mut self) -> Self {
        self.color = false;
        self
    }

    pub fn dump(&self, tokens: &[Token]) {
        for token in tokens {
            self.print_one(token);
        }
    }

    fn print_one(&self, token: &Token) {
        let line = token.span.line;
        let col = token.span.col;

        let kind = self.kind(token);
        let colr = if self.color { self.color(token) } else { "" };
        let reset = if self.color { Self::RESET } else { "" };

        println!(
            "[{:02}:{:02}] {}{:<8} {}{}",
            line, col, colr, kind, token.text, reset
        );
    }

    fn kind(&self, token: &Token) -> &'static str {
        let text = token.text.as_str();
        if text == END_OF_INPUT {
            "EOI"
        } else if is_keyword(text) {
            "KEYWORD"
        } else if is_condition(text) {
            "COND"
        } else if is_primitive(text) {
            "PRIM"
        } else {
            "IDENT"
        }
    }

    fn color(&self, token: &Token) -> &'static str {
        let text = token.text.as_str();
        if text == END_OF_INPUT {
            Self::DIM
        } else if is_keyword(text) {
            Self::MAG
        } else if is_condition(text) {
            Self::CYN
        } else if is_primitive(text) {
            Self::GRN
        } else {
            Self::YEL
        }
    }
}
