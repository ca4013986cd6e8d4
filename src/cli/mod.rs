pub mod build;
pub mod check;
pub mod data;
pub mod symbols;

use std::path::{Path, PathBuf};
use std::process;

use clap::Args;
use tracing::info;

use tasmgen::diagnostic::{render_diagnostics, Diagnostic};
use tasmgen::pipeline::LoadedProgram;
use tasmgen::project::ProjectConfig;
use tasmgen::{CompileFailure, CompileOptions, Compiled, RedeclarationPolicy};

/// Code generation settings shared by the compiling commands.
#[derive(Args)]
pub struct CodegenArgs {
    /// Redeclaration policy (default: tasmgen.toml, else warn)
    #[arg(long, value_enum, value_name = "POLICY")]
    pub redeclare: Option<RedeclarationPolicy>,
    /// Deepest node nesting to lower (default: tasmgen.toml, else 256)
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,
}

/// Load a program tree, exiting with rendered diagnostics on error.
pub fn load_program(input: &Path) -> LoadedProgram {
    match LoadedProgram::load(input) {
        Ok(program) => program,
        Err(diag) => {
            let source = std::fs::read_to_string(input).unwrap_or_default();
            diag.render(&input.to_string_lossy(), &source);
            process::exit(1);
        }
    }
}

/// Resolve options: defaults, then the nearest tasmgen.toml, then flags.
pub fn resolve_options(input: &Path, args: &CodegenArgs) -> CompileOptions {
    let mut options = CompileOptions::default();

    let start_dir = input.parent().unwrap_or(Path::new("."));
    if let Some(toml_path) = ProjectConfig::find(start_dir) {
        match ProjectConfig::load(&toml_path) {
            Ok(config) => {
                info!(path = %toml_path.display(), "using project configuration");
                config.apply(&mut options);
            }
            Err(e) => fail(&e),
        }
    }

    if let Some(policy) = args.redeclare {
        options.redeclaration = policy;
    }
    if let Some(depth) = args.max_depth {
        if depth == 0 {
            fail(&Diagnostic::error("--max-depth must be at least 1".to_string()));
        }
        options.max_depth = depth;
    }

    options
}

/// Compile a loaded program, rendering every diagnostic. Exits on failure.
pub fn compile_or_exit(program: &LoadedProgram, options: &CompileOptions) -> Compiled {
    let filename = program.filename();
    match tasmgen::compile_with_options(&program.root, options) {
        Ok(compiled) => {
            render_diagnostics(&compiled.warnings, &filename, &program.source);
            compiled
        }
        Err(CompileFailure { diagnostics, .. }) => {
            render_diagnostics(&diagnostics, &filename, &program.source);
            eprintln!("error: code generation failed for '{}'", filename);
            process::exit(1);
        }
    }
}

/// Default output base: the input path without its extension.
pub fn output_base(input: &Path, output: Option<PathBuf>) -> PathBuf {
    output.unwrap_or_else(|| tasmgen::pipeline::default_base(input))
}

fn fail(diag: &Diagnostic) -> ! {
    eprintln!("{}", diag);
    process::exit(1);
}
