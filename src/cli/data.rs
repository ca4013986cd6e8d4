use std::path::PathBuf;

use clap::Args;

use super::load_program;

#[derive(Args)]
pub struct DataArgs {
    /// Input program tree (.json)
    pub input: PathBuf,
}

pub fn cmd_data(args: DataArgs) {
    let program = load_program(&args.input);
    print!("{}", tasmgen::data_segment(&program.root));
}
