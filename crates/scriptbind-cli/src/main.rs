//! scriptbind CLI
//!
//! Reads binding descriptors produced by a header front end and writes the
//! generated dispatchers:
//!
//! ```text
//! scriptbind generate bindings.json --config lua.toml --output lua_Node.cpp --class Node
//! scriptbind generate bindings.json --out-dir src/lua
//! scriptbind groups bindings.json
//! ```

mod cli;
mod commands;

use clap::Parser;
use std::process;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let result = match cli.command {
        Commands::Generate {
            input,
            output,
            out_dir,
            config,
            class,
        } => match out_dir {
            Some(dir) => commands::generate_units(&input, &dir, config.as_deref()),
            None => commands::generate(&input, output.as_deref(), config.as_deref(), class.as_deref()),
        },
        Commands::Groups { input, config } => commands::groups(&input, config.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
