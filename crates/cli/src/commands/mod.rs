//! CLI subcommand implementations.

use clap::Args;

pub mod bootstrap_token;
pub mod completions;
pub mod migrate;
pub mod serve;

#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Roll back the last applied migration instead of migrating up
    #[arg(long)]
    pub rollback: bool,
}

#[derive(Args, Debug)]
pub struct BootstrapTokenArgs {
    /// Token lifetime in hours
    #[arg(long, default_value = "24")]
    pub ttl_hours: i64,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
