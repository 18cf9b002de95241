use clap::Parser;
use tracing_subscriber::EnvFilter;
use tristate::cmd::Cli;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = cli.command.run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
