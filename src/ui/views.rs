use eframe::egui::{self, Color32, RichText, Ui};

use crate::analysis::missing::{REPORT_FILE_NAME, REPORT_MIME};
use crate::state::AppState;
use crate::ui::{heatmap, panels, plot, table};
use crate::view::{
    CorrelationPayload, DescriptivePayload, Figure, MissingColumnWarning, MissingPayload,
    OverviewPayload, PlotKind, View, ViewPayload, VisualPayload,
};

const TITLE: &str = "Étude de la Qualité de l'air et Pollution";

/// Actions a view asks for that need mutable access to the state.
#[derive(Default)]
struct Requests {
    save_report: bool,
}

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the active view into the central panel.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading(TITLE);
    ui.separator();

    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("Aucun jeu de données chargé. Utilisez File → Open… pour en ouvrir un.");
        });
        return;
    }

    if state.view == View::Visualizations {
        plot_kind_selector(ui, state);
    }

    let mut requests = Requests::default();
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let Some(payload) = &state.payload else {
                return;
            };
            match payload {
                ViewPayload::Overview(p) => overview(ui, p),
                ViewPayload::MissingValues(p) => missing_values(ui, p, &mut requests),
                ViewPayload::DescriptiveStats(p) => descriptive(ui, p),
                ViewPayload::Visualizations(p) => visualizations(ui, p),
                ViewPayload::Correlations(p) => correlations(ui, p),
            }
        });

    if requests.save_report {
        panels::save_report_dialog(state);
    }
}

fn plot_kind_selector(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Visualisations");
    let mut selected = state.plot_kind;
    egui::ComboBox::from_label("Choisir le type de graphique :")
        .selected_text(selected.label())
        .show_ui(ui, |ui: &mut Ui| {
            for kind in PlotKind::ALL {
                ui.selectable_value(&mut selected, kind, kind.label());
            }
        });
    state.select_plot_kind(selected);
    ui.add_space(8.0);
}

fn warning(ui: &mut Ui, w: &MissingColumnWarning) {
    ui.colored_label(Color32::from_rgb(230, 140, 0), format!("⚠ {w}"))
        .on_hover_text(format!("Colonne attendue : {}", w.column));
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

fn overview(ui: &mut Ui, p: &OverviewPayload) {
    ui.heading("Aperçu des données brutes");
    table::preview_table(ui, &p.columns, &p.head);
    ui.add_space(12.0);

    ui.heading("Types de variables");
    table::dtype_table(ui, &p.dtypes);
    ui.add_space(12.0);

    ui.heading("Dimensions du jeu de données");
    ui.label(format!("{} lignes et {} colonnes", p.n_rows, p.n_cols));
}

fn missing_values(ui: &mut Ui, p: &MissingPayload, requests: &mut Requests) {
    ui.heading("Analyse des valeurs manquantes");
    table::missing_table(ui, &p.report);
    ui.add_space(6.0);

    if ui
        .button("Télécharger le rapport CSV")
        .on_hover_text(format!("{REPORT_FILE_NAME} ({REPORT_MIME})"))
        .clicked()
    {
        requests.save_report = true;
    }
    ui.add_space(12.0);

    ui.heading("Heatmap des valeurs manquantes");
    heatmap::missingness(ui, &p.columns, &p.matrix);
}

fn descriptive(ui: &mut Ui, p: &DescriptivePayload) {
    ui.heading("Statistiques descriptives");
    ui.label(RichText::new("Description statistique").strong());
    table::describe_table(ui, &p.summary);
    ui.add_space(12.0);

    match &p.classes {
        Some(classes) => {
            ui.heading("Répartition des classes de qualité d'air");
            table::class_table(ui, classes);
            plot::class_bars(ui, classes);
        }
        None => {
            if let Some(w) = &p.warning {
                warning(ui, w);
            }
        }
    }
}

fn visualizations(ui: &mut Ui, p: &VisualPayload) {
    if let Some(w) = &p.warning {
        warning(ui, w);
    }
    let Some(figure) = &p.figure else {
        return;
    };
    match figure {
        Figure::Histograms(h) => plot::histogram_grid(ui, h),
        Figure::Density(d) => plot::density_grid(ui, d),
        Figure::Boxplots(b) => plot::box_grid(ui, b),
        Figure::ScatterMatrix(m) => plot::matrix_grid(ui, "scatter_matrix", m),
        Figure::Pairplot(m) => plot::matrix_grid(ui, "pairplot", m),
    }
}

fn correlations(ui: &mut Ui, p: &CorrelationPayload) {
    ui.heading("Analyse de corrélation");
    if let Some(w) = &p.warning {
        warning(ui, w);
    }
    let Some(matrix) = &p.matrix else {
        return;
    };
    if p.coerced_columns > 0 {
        ui.label(
            RichText::new(format!("{} colonne(s) texte converties en nombres", p.coerced_columns))
                .small()
                .weak(),
        );
    }

    ui.label(RichText::new("Matrice de corrélation (Pearson)").strong());
    heatmap::correlation(ui, matrix);
    ui.add_space(12.0);

    ui.label(RichText::new("Corrélation avec la qualité de l'air").strong());
    plot::correlation_bars(ui, &p.against_class);
    table::correlation_list(ui, &p.against_class);
}
