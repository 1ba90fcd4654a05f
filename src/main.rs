mod bytecode;
mod frontend;
mod lang;

use std::{env, fs, path::Path};

use crate::bytecode::CompiledProgram;
use crate::bytecode::compile::compile_program;
use crate::bytecode::disasm::print_bc;
use crate::frontend::lexer::Lexer;
use crate::frontend::parser::Parser;
use crate::frontend::token_dumper::TokenDumper;
use crate::lang::passes::{
    count_instruction_calls, count_primitive_calls, rename_in_program, simplify_program,
};
use crate::lang::pretty::print_program;
use crate::lang::program::Program;

fn main() {
    let args: Vec<String> = env::args().collect();

    let tokens_only = args.contains(&"--tokens".to_string());
    let no_color = args.contains(&"--no-color".to_string());
    let pretty = args.contains(&"--pretty".to_string());
    let stats = args.contains(&"--stats".to_string());
    let simplify = args.contains(&"--simplify".to_string());
    let disasm = args.contains(&"--bc".to_string()) || args.contains(&"--disasm".to_string());
    let binary = args.contains(&"--bin".to_string());
    let rename = args.iter().find_map(|a| a.strip_prefix("--rename="));

    // first non-flag argument is the filename
    let filename = args.iter().skip(1).find(|a| !a.starts_with('-'));

    match filename {
        Some(filename) => match Path::new(filename).extension().and_then(|e| e.to_str()) {
            Some("bl") => match fs::read_to_string(filename) {
                Ok(source) => {
                    if tokens_only {
                        dump_tokens(&source, no_color);
                        return;
                    }

                    let mut program = parse(&source);
                    if let Some(arg) = rename {
                        apply_rename(&mut program, arg);
                    }
                    if simplify {
                        simplify_program(&mut program);
                    }

                    if stats {
                        print_stats(&program);
                    } else if pretty {
                        print_program(&program);
                    } else {
                        compile_to_image(&program, filename, disasm, binary);
                    }
                }
                Err(e) => {
                    eprintln!("Failed to read '{}': {}", filename, e);
                    std::process::exit(1);
                }
            },
            Some("bc") => show_text_image(filename),
            Some("bcb") => show_binary_image(filename),
            _ => {
                eprintln!(
                    "Error: expected a .bl source file or a .bc/.bcb image, got {}",
                    filename
                );
                std::process::exit(1);
            }
        },
        None => print_usage(),
    }
}

fn dump_tokens(source: &str, no_color: bool) {
    let tokens = Lexer::new(source).tokenize();

    let mut dumper = TokenDumper::new();
    if no_color {
        dumper = dumper.no_color();
    }
    dumper.dump(&tokens);
}

fn parse(source: &str) -> Program {
    let tokens = Lexer::new(source).tokenize();

    match Parser::new(tokens).parse_program() {
        Ok(program) => program,
        Err(e) => {
            eprintln!("Parse error: {}", e);
            std::process::exit(1);
        }
    }
}

fn apply_rename(program: &mut Program, arg: &str) {
    match arg.split_once(':') {
        Some((old, new)) if !old.is_empty() && !new.is_empty() => {
            rename_in_program(program, old, new);
        }
        _ => {
            eprintln!("Error: --rename wants the form --rename=old:new");
            std::process::exit(1);
        }
    }
}

fn compile_to_image(program: &Program, filename: &str, disasm: bool, binary: bool) {
    let compiled = match compile_program(program) {
        Ok(compiled) => compiled,
        Err(e) => {
            eprintln!("Compile error: {}", e);
            std::process::exit(1);
        }
    };

    if disasm {
        print_bc(&compiled);
    }

    let out_path = Path::new(filename).with_extension("bc");
    if let Err(e) = fs::write(&out_path, compiled.to_text()) {
        eprintln!("Failed to write '{}': {}", out_path.display(), e);
        std::process::exit(1);
    }
    println!("wrote {} ({} cells)", out_path.display(), compiled.len());

    if binary {
        let bytes = match compiled.to_bytes() {
            Ok(bytes) => bytes,
            Err(e) => {
                eprintln!("Image error: {}", e);
                std::process::exit(1);
            }
        };
        let bin_path = Path::new(filename).with_extension("bcb");
        if let Err(e) = fs::write(&bin_path, bytes) {
            eprintln!("Failed to write '{}': {}", bin_path.display(), e);
            std::process::exit(1);
        }
        println!("wrote {}", bin_path.display());
    }
}

fn show_text_image(filename: &str) {
    let text = match fs::read_to_string(filename) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Failed to read '{}': {}", filename, e);
            std::process::exit(1);
        }
    };

    match CompiledProgram::from_text(&text) {
        Ok(image) => print_bc(&image),
        Err(e) => {
            eprintln!("Image error: {}", e);
            std::process::exit(1);
        }
    }
}

fn show_binary_image(filename: &str) {
    let bytes = match fs::read(filename) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Failed to read '{}': {}", filename, e);
            std::process::exit(1);
        }
    };

    match CompiledProgram::from_bytes(&bytes) {
        Ok(image) => print_bc(&image),
        Err(e) => {
            eprintln!("Image error: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_stats(program: &Program) {
    println!("=== PROGRAM STATISTICS ===\n");

    println!("Program:          {}", program.name);
    println!("Instructions:     {}", program.context.len());
    println!();

    let mut instructions: Vec<_> = program.context.iter().collect();
    instructions.sort_by_key(|(name, _)| *name);

    println!("Primitive calls:");
    println!("  body:           {}", count_primitive_calls(&program.body));
    for (name, body) in &instructions {
        println!("  {:<16}{}", format!("{}:", name), count_primitive_calls(body));
    }

    if !instructions.is_empty() {
        println!();
        println!("Calls from the body:");
        for (name, _) in &instructions {
            println!(
                "  {:<16}{}",
                format!("{}:", name),
                count_instruction_calls(&program.body, name)
            );
        }
    }
}

fn print_usage() {
    println!("BLC - BL Robot Language Compiler");
    println!();
    println!("Usage:");
    println!("  blc <file.bl>             Compile to a .bc bytecode image");
    println!("  blc <file.bc|.bcb>        Disassemble an existing image");
    println!("  blc --tokens <file.bl>    Show tokens only");
    println!("  blc --pretty <file.bl>    Parse and print the program back");
    println!("  blc --stats <file.bl>     Show call statistics");
    println!("  blc --bc <file.bl>        Also print a disassembly listing");
    println!("  blc --bin <file.bl>       Also write a .bcb binary image");
    println!("  blc --simplify <file.bl>  Rewrite negated conditions first");
    println!("  blc --rename=old:new      Rename an instruction first");
    println!("  blc --no-color            Plain token output");
    println!("  blc --help, -h            Show this help");
}
