//! Scenegraph CLI
//!
//! Usage:
//!   scenegraph [OPTIONS] [FILE]
//!
//! Options:
//!   -o, --owners   Also list the owner of every owned property
//!   -h, --help     Print help

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use diagram_scenegraph::{render_with_config, RenderConfig};

#[derive(Parser)]
#[command(name = "scenegraph")]
#[command(about = "Resolve a TOML scene description and list effective node geometry")]
struct Cli {
    /// Scene file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Also list the owner of every owned property
    #[arg(short, long)]
    owners: bool,
}

fn main() {
    // Diagnostics are printed below; tracing only shows them with RUST_LOG=warn
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.input.is_none() && io::stdin().is_terminal() {
        eprintln!("usage: scenegraph [--owners] <scene.toml>   (or pipe a scene on stdin)");
        std::process::exit(2);
    }

    let (source, filename) = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let config = RenderConfig::new().with_owners(cli.owners);
    match render_with_config(&source, &config) {
        Ok(rendered) => {
            print!("{}", rendered.listing);
            for diagnostic in &rendered.diagnostics {
                eprintln!("{}", diagnostic);
            }
        }
        Err(e) => {
            eprintln!("{}", e.format(&source, &filename));
            std::process::exit(1);
        }
    }
}
