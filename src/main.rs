use anyhow::Result;
use clap::Parser;
use commitlens::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.execute()
}
