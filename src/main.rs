use clap::{Parser, Subcommand};

mod cli;

use cli::build::{cmd_build, BuildArgs};
use cli::check::{cmd_check, CheckArgs};
use cli::data::{cmd_data, DataArgs};
use cli::symbols::{cmd_symbols, SymbolsArgs};

#[derive(Parser)]
#[command(
    name = "tasmgen",
    version,
    about = "Lower a program tree to a 16-bit DOS assembly listing"
)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a program tree (.json) to <base>.asm
    Build(BuildArgs),
    /// Run code generation and report diagnostics without writing
    Check(CheckArgs),
    /// Print the symbol table built during code generation
    Symbols(SymbolsArgs),
    /// Print the data segment for a program tree
    Data(DataArgs),
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Build(args) => cmd_build(args),
        Command::Check(args) => cmd_check(args),
        Command::Symbols(args) => cmd_symbols(args),
        Command::Data(args) => cmd_data(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(level)
        .init();
}
