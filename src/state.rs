use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::analysis::missing::missing_report;
use crate::data::cache::DatasetCache;
use crate::data::model::Dataset;
use crate::view::{PlotKind, View, ViewPayload, dispatch};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset, shared with the process-wide cache.
    pub dataset: Option<Arc<Dataset>>,

    /// File the dataset came from.
    pub source: Option<PathBuf>,

    /// Active sidebar view.
    pub view: View,

    /// Active plot kind inside the Visualizations view.
    pub plot_kind: PlotKind,

    /// Payload for the active (view, plot kind), recomputed on selection.
    pub payload: Option<ViewPayload>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            source: None,
            view: View::default(),
            plot_kind: PlotKind::default(),
            payload: None,
            status_message: None,
        }
    }
}

impl AppState {
    pub fn new(view: View) -> Self {
        Self {
            view,
            ..Self::default()
        }
    }

    /// Ingest a loaded dataset and compute the active view.
    pub fn set_dataset(&mut self, source: PathBuf, dataset: Arc<Dataset>) {
        self.dataset = Some(dataset);
        self.source = Some(source);
        self.status_message = None;
        self.refresh();
    }

    /// Load `path` through `cache`. A failure keeps the current dataset and
    /// is reported in the status line.
    pub fn open(&mut self, cache: &DatasetCache, path: &Path) {
        match cache.load(path) {
            Ok(dataset) => self.set_dataset(path.to_path_buf(), dataset),
            Err(e) => {
                log::error!("Failed to load file: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    pub fn select_view(&mut self, view: View) {
        if self.view != view {
            self.view = view;
            self.refresh();
        }
    }

    pub fn select_plot_kind(&mut self, kind: PlotKind) {
        if self.plot_kind != kind {
            self.plot_kind = kind;
            if self.view == View::Visualizations {
                self.refresh();
            }
        }
    }

    /// Recompute the payload for the current selection.
    pub fn refresh(&mut self) {
        self.payload = self
            .dataset
            .as_deref()
            .map(|ds| dispatch(ds, self.view, self.plot_kind));
    }

    /// Write the missing-value report of the current dataset to `path`.
    pub fn save_missing_report(&self, path: &Path) -> Result<()> {
        let dataset = self.dataset.as_deref().context("no dataset loaded")?;
        let bytes = missing_report(dataset).to_csv()?;
        std::fs::write(path, bytes)
            .with_context(|| format!("writing report to {}", path.display()))?;
        log::info!("Saved missing-value report to {}", path.display());
        Ok(())
    }
}
