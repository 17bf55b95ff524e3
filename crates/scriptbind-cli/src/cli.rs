//! CLI argument parsing and command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scriptbind")]
#[command(about = "Generate Lua dispatch trampolines for native C++ bindings", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Emit dispatchers for a descriptor file
    Generate {
        /// Descriptor file (JSON with `types` and `bindings`)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file path; standard output when omitted
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Write one `<prefix><Class>.cpp` file per class into this directory
        #[arg(long, value_name = "DIR", conflicts_with_all = ["output", "class"])]
        out_dir: Option<PathBuf>,

        /// Emission options (TOML)
        #[arg(short, long, value_name = "CONFIG")]
        config: Option<PathBuf>,

        /// Only emit the translation unit of this class
        #[arg(long, value_name = "CLASS")]
        class: Option<String>,
    },

    /// List the dispatchers a descriptor file produces and their arities
    Groups {
        /// Descriptor file (JSON with `types` and `bindings`)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Emission options (TOML)
        #[arg(short, long, value_name = "CONFIG")]
        config: Option<PathBuf>,
    },
}
