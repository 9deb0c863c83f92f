use oura::error::CliError;
use tracing_subscriber::EnvFilter;

/// Main entry point for the program
#[tokio::main]
async fn main() {
    // Diagnostics go to stderr; stdout carries command output only
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match oura::actions::run(std::env::args()).await {
        Ok(()) => {}
        Err(CliError::Usage(usage)) => {
            eprint!("{}", usage);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
