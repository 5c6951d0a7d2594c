use clap::Parser;
use minirag_cli::{Cli, run, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init_logging(cli.verbose);

    let stdout = std::io::stdout();
    run(cli, &mut stdout.lock()).await
}
