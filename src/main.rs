mod analysis;
mod app;
mod cli;
mod color;
mod data;
mod state;
mod ui;
mod view;

use std::path::Path;

use anyhow::{Context, Result};
use app::DashboardApp;
use clap::Parser;
use eframe::egui;

use analysis::missing::missing_report;
use cli::Cli;
use data::cache::DatasetCache;
use data::model::Dataset;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let dataset = match DatasetCache::global().load(&cli.file) {
        Ok(ds) => ds,
        Err(e) => {
            log::error!("{e}");
            return Err(e.into());
        }
    };

    if let Some(out) = &cli.export_missing {
        return export_missing(&dataset, out);
    }

    let mut state = AppState::new(cli.view);
    state.set_dataset(cli.file.clone(), dataset);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Analyse de la qualité de l'air",
        options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}

fn export_missing(dataset: &Dataset, out: &Path) -> Result<()> {
    let bytes = missing_report(dataset).to_csv()?;
    std::fs::write(out, bytes).with_context(|| format!("writing {}", out.display()))?;
    log::info!("Wrote missing-value report to {}", out.display());
    Ok(())
}
