use std::path::PathBuf;

use clap::Args;

use super::{compile_or_exit, load_program, resolve_options, CodegenArgs};

#[derive(Args)]
pub struct CheckArgs {
    /// Input program tree (.json)
    pub input: PathBuf,
    #[command(flatten)]
    pub codegen: CodegenArgs,
}

pub fn cmd_check(args: CheckArgs) {
    let options = resolve_options(&args.input, &args.codegen);
    let program = load_program(&args.input);
    let compiled = compile_or_exit(&program, &options);

    let warnings = compiled.warnings.len();
    if warnings == 0 {
        eprintln!("OK: {}", args.input.display());
    } else {
        eprintln!(
            "OK: {} ({} warning{})",
            args.input.display(),
            warnings,
            if warnings == 1 { "" } else { "s" }
        );
    }
}
