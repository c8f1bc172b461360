//! GST CLI - Command line tool for forecasting geotagged time series.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "gst-cli",
    version,
    about = "Geostradamus: forecast a time series at any location"
)]
struct Cli {
    #[command(subcommand)]
    command: gst_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    gst_cmd::run(cli.command)
}
