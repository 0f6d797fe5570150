use clap::Parser;
use std::process;

use checktrail::cli;
use checktrail::cli::commands::{Cli, Commands};

fn main() {
    let cli_args = Cli::parse();
    let json_output = cli_args.json;
    let client_flag = cli_args.client.clone();

    let exit_code = match cli_args.command {
        Commands::Init => cli::init::run(json_output),
        Commands::Task(cmd) => cli::task::run(cmd, json_output, client_flag.as_deref()),
        Commands::Status => cli::status::run(json_output, client_flag.as_deref()),
    };

    process::exit(exit_code);
}
