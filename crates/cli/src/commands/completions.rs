//! Shell completion generation.

use clap::CommandFactory as _;

use super::CompletionsArgs;

pub fn run(args: &CompletionsArgs) {
    let mut cmd = crate::Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(args.shell, &mut cmd, name, &mut std::io::stdout());
}
