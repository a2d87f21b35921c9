use clap::Parser;
use estate_cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    estate_cli::init_tracing(cli.verbose);
    estate_cli::run(cli).await
}
