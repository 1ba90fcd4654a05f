pub mod lexer;
pub mod parser;
pub mod parser_error;
pub mod token_dumper;
