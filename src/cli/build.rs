use std::path::PathBuf;
use std::process;

use clap::Args;

use super::{compile_or_exit, load_program, output_base, resolve_options, CodegenArgs};

#[derive(Args)]
pub struct BuildArgs {
    /// Input program tree (.json)
    pub input: PathBuf,
    /// Output base name; `.asm` is appended (default: input without extension)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[command(flatten)]
    pub codegen: CodegenArgs,
}

pub fn cmd_build(args: BuildArgs) {
    let BuildArgs {
        input,
        output,
        codegen,
    } = args;
    let options = resolve_options(&input, &codegen);
    let program = load_program(&input);
    let compiled = compile_or_exit(&program, &options);

    let base = output_base(&input, output);
    match tasmgen::pipeline::write_listing(&base, &compiled.listing) {
        Ok(out_path) => eprintln!("Compiled -> {}", out_path.display()),
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}
