//! Print the OpenAPI document as JSON, or write it to a file.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use social_backend::ApiDoc;
use utoipa::OpenApi;

/// `openapi-dump` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "openapi-dump",
    about = "Emit the social backend OpenAPI document",
    version
)]
struct CliArgs {
    /// Write the document here instead of standard output.
    #[arg(long, short, value_name = "path")]
    output: Option<PathBuf>,
    /// Emit single-line JSON.
    #[arg(long)]
    compact: bool,
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    let doc = ApiDoc::openapi();
    let rendered = if args.compact {
        doc.to_json()
    } else {
        doc.to_pretty_json()
    };
    let json = match rendered {
        Ok(json) => json,
        Err(err) => {
            eprintln!("failed to serialise OpenAPI document: {err}");
            return ExitCode::FAILURE;
        }
    };
    match args.output {
        Some(path) => match std::fs::write(&path, json) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("failed to write {}: {err}", path.display());
                ExitCode::FAILURE
            }
        },
        None => {
            println!("{json}");
            ExitCode::SUCCESS
        }
    }
}
