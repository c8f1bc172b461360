//! Command implementations for the GST CLI.
//!
//! Provides subcommands that load observations from CSV, synthesize the
//! series at a query point, and optionally forecast it.

use clap::{Args, Subcommand, ValueEnum};
use geostradamus::{KernelKind, SmootherKind};

pub mod forecast;
pub mod io;

#[derive(Subcommand)]
pub enum Command {
    /// Forecast the series at a location and write the prediction table
    Forecast {
        #[command(flatten)]
        query: QueryArgs,

        /// Number of future periods to predict
        #[arg(short = 'p', long, default_value_t = 0)]
        periods: usize,

        /// JSON file with forecast model settings
        #[arg(short = 's', long)]
        settings: Option<String>,

        /// Output path for the predictions CSV
        #[arg(short = 'o', long)]
        output: String,
    },

    /// Write only the synthesized series at a location
    Synthesize {
        #[command(flatten)]
        query: QueryArgs,

        /// Output path for the synthesized series CSV
        #[arg(short = 'o', long)]
        output: String,
    },
}

/// Arguments shared by every subcommand.
#[derive(Args)]
pub struct QueryArgs {
    /// Observations CSV with `date,y,lat,lng` columns
    #[arg(short = 'd', long)]
    pub data: String,

    /// Query latitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Query longitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lng: f64,

    /// Distance kernel
    #[arg(short = 'k', long, value_enum, default_value_t = KernelArg::Gaussian)]
    pub kernel: KernelArg,

    /// Kernel bandwidth in kilometers (radius for top-hat)
    #[arg(short = 'b', long, default_value_t = 1.0)]
    pub bandwidth: f64,

    /// Aggregation of values sharing a timestamp
    #[arg(long, value_enum, default_value_t = SmootherArg::WeightedMean)]
    pub smoother: SmootherArg,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum KernelArg {
    Gaussian,
    Exponential,
    InverseDistance,
    TopHat,
}

impl From<KernelArg> for KernelKind {
    fn from(arg: KernelArg) -> Self {
        match arg {
            KernelArg::Gaussian => KernelKind::Gaussian,
            KernelArg::Exponential => KernelKind::Exponential,
            KernelArg::InverseDistance => KernelKind::InverseDistance,
            KernelArg::TopHat => KernelKind::TopHat,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum SmootherArg {
    WeightedMean,
    WeightedMedian,
}

impl From<SmootherArg> for SmootherKind {
    fn from(arg: SmootherArg) -> Self {
        match arg {
            SmootherArg::WeightedMean => SmootherKind::WeightedMean,
            SmootherArg::WeightedMedian => SmootherKind::WeightedMedian,
        }
    }
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Forecast {
            query,
            periods,
            settings,
            output,
        } => forecast::run_forecast(&query, periods, settings.as_deref(), &output),
        Command::Synthesize { query, output } => forecast::run_synthesize(&query, &output),
    }
}
