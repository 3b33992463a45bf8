use anyhow::Result;
use clap::Parser;
use shell_verifier::{run, Args};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let stdout = std::io::stdout();
    run(args, &mut stdout.lock())
}
