use crate::frontend::lexer::{self, END_OF_INPUT, Span, Token};
use crate::frontend::parser_error::ParserError;
use crate::lang::condition::Condition;
use crate::lang::program::{Context, Program};
use crate::lang::statement::{Statement, is_primitive};

/// Recursive-descent parser for BL.
///
/// The parser consumes the lexer's token stream and produces a `Program`:
/// - `name`: from the `PROGRAM <name> IS ... END <name>` frame
/// - `context`: one entry per `INSTRUCTION` definition
/// - `body`: the `BEGIN ... END` block
///
/// The grammar is LL(1) on the front token, so the parser never backtracks:
/// every decision looks at `front()` and either consumes it or fails. Blocks
/// end by the front token *not* starting a statement; there is no terminator
/// lookahead.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Span of the most recently consumed token.
    ///
    /// Used to provide stable source locations for errors raised after the
    /// parser has fallen off the end of the token list.
    last_span: Option<Span>,
}

impl Parser {
    /// Creates a new parser from lexer output.
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens,
            pos: 0,
            last_span: None,
        }
    }

    /// Text of the front token without consuming it.
    ///
    /// The lexer guarantees the stream ends with [`END_OF_INPUT`]; should
    /// the parser ever step past it, the sentinel is reported again rather
    /// than panicking.
    fn front(&self) -> &str {
        self.tokens
            .get(self.pos)
            .map(|t| t.text.as_str())
            .unwrap_or(END_OF_INPUT)
    }

    /// Consumes the front token and returns it.
    ///
    /// Also updates `last_span` so errors raised later can still report a
    /// useful location.
    fn advance(&mut self) -> Token {
        match self.tokens.get(self.pos) {
            Some(token) => {
                let token = token.clone();
                self.last_span = Some(token.span.clone());
                self.pos += 1;
                token
            }
            None => Token {
                text: END_OF_INPUT.to_string(),
                span: self.last_span.clone().unwrap_or(Span { line: 1, col: 1 }),
            },
        }
    }

    /// `front()` quoted for an error message, with the sentinel spelled as
    /// plain prose.
    fn describe_front(&self) -> String {
        if self.front() == END_OF_INPUT {
            "end of input".to_string()
        } else {
            format!("'{}'", self.front())
        }
    }

    /// Constructs a `ParserError` at the most relevant location.
    ///
    /// Priority:
    /// 1. If the front token exists, use its span.
    /// 2. Else, use `last_span`.
    /// 3. Else, default to (1,1) for truly empty input.
    fn error(&self, message: &str) -> ParserError {
        if let Some(token) = self.tokens.get(self.pos) {
            ParserError {
                message: message.to_string(),
                line: token.span.line,
                col: token.span.col,
            }
        } else if let Some(span) = &self.last_span {
            ParserError {
                message: message.to_string(),
                line: span.line,
                col: span.col,
            }
        } else {
            ParserError {
                message: message.to_string(),
                line: 1,
                col: 1,
            }
        }
    }

    /// Constructs a `ParserError` pointing at an already-consumed token.
    fn error_at(&self, span: &Span, message: &str) -> ParserError {
        ParserError {
            message: message.to_string(),
            line: span.line,
            col: span.col,
        }
    }

    /// Consumes the front token if it equals `keyword`, errors otherwise.
    fn expect(&mut self, keyword: &str) -> Result<(), ParserError> {
        if self.front() == keyword {
            self.advance();
            Ok(())
        } else {
            Err(self.error(&format!(
                "expected '{}', found {}",
                keyword,
                self.describe_front()
            )))
        }
    }

    /// Consumes the front token and requires it to be a well-formed
    /// identifier; `what` names its role for the error message.
    fn identifier(&mut self, what: &str) -> Result<Token, ParserError> {
        if self.front() == END_OF_INPUT {
            return Err(self.error(&format!("expected {}, found end of input", what)));
        }
        if !lexer::is_identifier(self.front()) {
            return Err(self.error(&format!("'{}' is not a valid {}", self.front(), what)));
        }
        Ok(self.advance())
    }

    /// Whether the front token can begin a statement (`IF`, `WHILE`, or an
    /// identifier). This is the block-continuation test: `ELSE`, `END` and
    /// the sentinel all fail it.
    fn starts_statement(&self) -> bool {
        let front = self.front();
        front == "IF" || front == "WHILE" || lexer::is_identifier(front)
    }

    /// Parses a complete BL program:
    ///
    /// ```text
    /// PROGRAM <name> IS
    ///     {INSTRUCTION <name> IS <block> END <name>}
    /// BEGIN
    ///     <block>
    /// END <name>
    /// ```
    ///
    /// On success exactly the end-of-input sentinel remains unconsumed.
    ///
    /// # Errors
    /// - Missing or misspelled frame keywords.
    /// - Malformed program name, or closing name differing from the
    ///   opening one.
    /// - Duplicate instruction definitions.
    /// - Any input left over after `END <name>`.
    pub fn parse_program(&mut self) -> Result<Program, ParserError> {
        self.expect("PROGRAM")?;
        let name = self.identifier("program name")?;
        self.expect("IS")?;

        let mut context = Context::new();
        while self.front() == "INSTRUCTION" {
            let (instr_name, body) = self.parse_instruction()?;
            if context.contains_key(&instr_name.text) {
                return Err(self.error_at(
                    &instr_name.span,
                    &format!("instruction '{}' is defined twice", instr_name.text),
                ));
            }
            context.insert(instr_name.text, body);
        }

        self.expect("BEGIN")?;
        let body = self.parse_block()?;
        self.expect("END")?;

        let end_name = self.identifier("program name after 'END'")?;
        if end_name.text != name.text {
            return Err(self.error_at(
                &end_name.span,
                &format!(
                    "'END {}' does not match program name '{}'",
                    end_name.text, name.text
                ),
            ));
        }

        if self.front() != END_OF_INPUT {
            return Err(self.error(&format!("unexpected input after 'END {}'", name.text)));
        }

        Ok(Program {
            name: name.text,
            context,
            body,
        })
    }

    /// Parses one user-instruction definition:
    ///
    /// ```text
    /// INSTRUCTION <name> IS <block> END <name>
    /// ```
    ///
    /// Returns the name token (the span is kept for the duplicate check in
    /// [`parse_program`](Self::parse_program)) and the body block.
    ///
    /// # Errors
    /// - Malformed name, or a name that is one of the five primitives.
    /// - Closing name differing from the opening one.
    fn parse_instruction(&mut self) -> Result<(Token, Statement), ParserError> {
        self.expect("INSTRUCTION")?;

        let name = self.identifier("instruction name")?;
        if is_primitive(&name.text) {
            return Err(self.error_at(
                &name.span,
                &format!(
                    "'{}' is a primitive instruction and cannot be redefined",
                    name.text
                ),
            ));
        }

        self.expect("IS")?;
        let body = self.parse_block()?;
        self.expect("END")?;

        let end_name = self.identifier("instruction name after 'END'")?;
        if end_name.text != name.text {
            return Err(self.error_at(
                &end_name.span,
                &format!(
                    "'END {}' does not match instruction name '{}'",
                    end_name.text, name.text
                ),
            ));
        }

        Ok((name, body))
    }

    /// Parses statements while the front token starts one, and wraps them
    /// in a `Block`. Never fails by itself: an empty block is valid, and
    /// whatever stopped the block is for the caller to judge.
    pub fn parse_block(&mut self) -> Result<Statement, ParserError> {
        let mut statements = Vec::new();
        while self.starts_statement() {
            statements.push(self.parse_statement()?);
        }
        Ok(Statement::Block(statements))
    }

    /// Parses a single statement, dispatching on the front token.
    pub fn parse_statement(&mut self) -> Result<Statement, ParserError> {
        match self.front() {
            "IF" => self.parse_if(),
            "WHILE" => self.parse_while(),
            t if lexer::is_identifier(t) => self.parse_call(),
            _ => Err(self.error(&format!(
                "expected a statement, found {}",
                self.describe_front()
            ))),
        }
    }

    /// Parses an `IF` statement, with or without an `ELSE` branch:
    ///
    /// ```text
    /// IF <condition> THEN <block> END IF
    /// IF <condition> THEN <block> ELSE <block> END IF
    /// ```
    fn parse_if(&mut self) -> Result<Statement, ParserError> {
        self.expect("IF")?;
        let condition = self.parse_condition()?;
        self.expect("THEN")?;
        let then_body = self.parse_block()?;

        match self.front() {
            "END" => {
                self.advance();
                self.expect("IF")?;
                Ok(Statement::If {
                    condition,
                    body: Box::new(then_body),
                })
            }
            "ELSE" => {
                self.advance();
                let else_body = self.parse_block()?;
                self.expect("END")?;
                self.expect("IF")?;
                Ok(Statement::IfElse {
                    condition,
                    then_body: Box::new(then_body),
                    else_body: Box::new(else_body),
                })
            }
            _ => Err(self.error(&format!(
                "expected 'ELSE' or 'END', found {}",
                self.describe_front()
            ))),
        }
    }

    /// Parses a `WHILE` statement:
    ///
    /// ```text
    /// WHILE <condition> DO <block> END WHILE
    /// ```
    fn parse_while(&mut self) -> Result<Statement, ParserError> {
        self.expect("WHILE")?;
        let condition = self.parse_condition()?;
        self.expect("DO")?;
        let body = self.parse_block()?;
        self.expect("END")?;
        self.expect("WHILE")?;
        Ok(Statement::While {
            condition,
            body: Box::new(body),
        })
    }

    /// Parses a call statement: a bare identifier, either a primitive or a
    /// user-defined instruction name. Whether a user-defined name actually
    /// exists is checked at compile time, not here.
    fn parse_call(&mut self) -> Result<Statement, ParserError> {
        let name = self.identifier("instruction name")?;
        Ok(Statement::Call(name.text))
    }

    /// Parses a condition literal (`next-is-wall`, `random`, ...).
    fn parse_condition(&mut self) -> Result<Condition, ParserError> {
        match Condition::from_token(self.front()) {
            Some(condition) => {
                self.advance();
                Ok(condition)
            }
            None => Err(self.error(&format!(
                "invalid condition {}",
                self.describe_front()
            ))),
        }
    }
}
