//! The `taskdeck` binary: a thin wrapper around [`taskdeck::cli`].

use clap::Parser;
use std::process::ExitCode;
use taskdeck::cli::{run, Cli};
use taskdeck::storage::FileStorage;
use taskdeck::todos::TodoStore;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let storage = match FileStorage::in_data_dir() {
        Ok(storage) => storage,
        Err(e) => {
            eprintln!("taskdeck: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut store = TodoStore::load(storage);
    let output = run(cli.command, &mut store);
    if !output.is_empty() {
        println!("{}", output.trim_end());
    }

    if let Err(e) = store.flush() {
        eprintln!("taskdeck: failed to write data: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
