use clap::Parser;
use srcpackc::cli::{self, Cli};
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let env_filter = cli::resolve_env_filter(&cli);

    fmt()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_writer(std::io::stderr)
        .init();

    cli::run_with_cli(cli)
}
