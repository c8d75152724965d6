//! Command-line arguments for the air-quality dashboard

use std::path::PathBuf;

use clap::Parser;

use crate::view::View;

#[derive(Parser, Debug)]
#[command(name = "airview")]
#[command(version)]
#[command(about = "Air-quality and pollution dataset explorer", long_about = None)]
pub struct Cli {
    /// Dataset to open (CSV, JSON records or Parquet)
    #[arg(value_name = "FILE", default_value = "pollution.csv")]
    pub file: PathBuf,

    /// View shown on startup
    #[arg(long = "view", value_enum, default_value = "overview")]
    pub view: View,

    /// Write the missing-value report to PATH and exit without opening a window
    #[arg(long = "export-missing", value_name = "PATH")]
    pub export_missing: Option<PathBuf>,
}
