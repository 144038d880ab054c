//! modelgraph command-line tool
//!
//! Assembles a JSON schema file and reports on the result.

mod commands;
mod formatter;
mod summary;

use clap::{Parser, Subcommand};
use formatter::OutputFormat;
use std::path::PathBuf;

/// modelgraph command-line tool
#[derive(Parser, Debug)]
#[command(name = "modelgraph")]
#[command(version, about = "Assemble and inspect modelgraph schemas")]
pub struct Args {
    /// Output format
    #[arg(long, default_value = "table", value_enum, global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Assemble a schema and summarize its models and relations
    Check {
        /// Schema file (JSON)
        schema: PathBuf,
    },
    /// Print the GraphQL SDL of a schema
    Schema {
        /// Schema file (JSON)
        schema: PathBuf,

        /// Write the SDL to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the Admin UI metadata of a schema
    AdminMeta {
        /// Schema file (JSON)
        schema: PathBuf,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("modelgraph=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let formatter = formatter::create_formatter(args.format);

    let output = match &args.command {
        Command::Check { schema } => commands::check(schema, &*formatter)?,
        Command::Schema { schema, output } => {
            commands::schema(schema, output.as_deref(), &*formatter)?
        }
        Command::AdminMeta { schema } => commands::admin_meta(schema, &*formatter)?,
    };

    println!("{}", output);
    Ok(())
}
