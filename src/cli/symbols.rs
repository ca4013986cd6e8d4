use std::path::PathBuf;

use clap::Args;

use super::{compile_or_exit, load_program, resolve_options, CodegenArgs};

#[derive(Args)]
pub struct SymbolsArgs {
    /// Input program tree (.json)
    pub input: PathBuf,
    #[command(flatten)]
    pub codegen: CodegenArgs,
}

pub fn cmd_symbols(args: SymbolsArgs) {
    let options = resolve_options(&args.input, &args.codegen);
    let program = load_program(&args.input);
    let compiled = compile_or_exit(&program, &options);

    if compiled.symbols.is_empty() {
        eprintln!("No variables assigned.");
        return;
    }
    println!("{:<20} {:<10} {:>8}  string", "name", "kind", "value");
    for (name, info) in compiled.symbols.iter_sorted() {
        println!(
            "{:<20} {:<10} {:>8}  {}",
            name,
            info.kind.to_string(),
            info.int_value,
            info.str_value.as_deref().unwrap_or("-")
        );
    }
}
