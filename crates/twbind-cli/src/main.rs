//! twbind CLI - Binding generator driver
//!
//! Commands:
//! - `twbind generate` - Render bindings for every annotated header
//! - `twbind check` - Parse headers and summarize what they declare
//! - `twbind dump` - Print the parsed declaration of one header as JSON

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use twbind_codegen::Language;

mod check;
mod dump;
mod generate;
mod logging;

#[derive(Parser)]
#[command(name = "twbind")]
#[command(author, version, about = "Generate language bindings from annotated C headers", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render bindings for every header in the include directory
    Generate {
        /// Path to twbind.toml (default: ./twbind.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory containing annotated headers
        #[arg(short, long)]
        include: Option<PathBuf>,

        /// Root directory for generated sources
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Target language (jni, java, kotlin, swift, js, typescript, wasm); repeatable
        #[arg(short, long = "lang")]
        languages: Vec<Language>,

        /// Skip headers that fail to parse instead of stopping
        #[arg(short, long)]
        keep_going: bool,
    },

    /// Parse headers and print one summary line for each
    Check {
        /// Header files to parse
        #[arg(required = true)]
        headers: Vec<PathBuf>,
    },

    /// Print the parsed declaration of a header as JSON
    Dump {
        /// Header file to parse
        header: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Generate {
            config,
            include,
            output,
            languages,
            keep_going,
        } => {
            generate::run(generate::GenerateOptions {
                config,
                include,
                output,
                languages,
                keep_going,
            })?;
        }
        Commands::Check { headers } => {
            check::run(&headers)?;
        }
        Commands::Dump { header } => {
            dump::run(&header)?;
        }
    }

    Ok(())
}
