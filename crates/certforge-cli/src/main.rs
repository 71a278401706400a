use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::Result;
use tracing_subscriber::EnvFilter;

use certforge_cli::commands::{self, GenerateRequest};
use certforge_cli::config;

#[derive(Parser)]
#[command(name = "certforge")]
#[command(about = "Generate per-recipient PDF certificates from a template and a data file")]
struct Cli {
    /// Config file (default: <config dir>/certforge/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the `{{variables}}` used by a template
    Variables {
        template: PathBuf,
    },

    /// List the column names of a data file
    Columns {
        data: PathBuf,
    },

    /// Render one certificate per data row and zip the PDFs
    Generate {
        #[arg(long)]
        template: PathBuf,
        #[arg(long)]
        data: PathBuf,
        /// `variable=column`, repeatable
        #[arg(long = "map", value_name = "VAR=COLUMN")]
        map: Vec<String>,
        /// JSON object of variable → column
        #[arg(long)]
        mapping_file: Option<PathBuf>,
        /// Directory for the archive (default: next to the template)
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if cli.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    match cli.command {
        Command::Variables { template } => {
            print_json(&commands::variables(&template)?)?;
        }
        Command::Columns { data } => {
            print_json(&commands::columns(&data)?)?;
        }
        Command::Generate {
            template,
            data,
            map,
            mapping_file,
            output_dir,
        } => {
            let config = config::load_config(cli.config.as_deref())?;
            let request = GenerateRequest {
                template,
                data,
                map,
                mapping_file,
                output_dir,
            };
            let archive = commands::generate(&config, &request)?;

            println!("{}", archive.path.display());
            for certificate in &archive.certificates {
                println!("  row {}: {}", certificate.row, certificate.file_name);
            }
            for failure in &archive.failures {
                println!("  row {}: FAILED ({})", failure.row, failure.reason);
            }
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
