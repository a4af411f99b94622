use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use gtex_plot::render::{PlotOptions, render_box_plot};
use gtex_plot::report::write_report;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – threshold and group list
// ---------------------------------------------------------------------------

/// Render the left panel: threshold slider and the visible groups.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading(&state.gene);
    ui.label(format!("grouped by {}", state.group_column));
    ui.separator();

    ui.strong("Minimum mean count");
    let mut threshold = state.threshold;
    let max = state.max_mean().max(1.0);
    if ui
        .add(egui::Slider::new(&mut threshold, 0.0..=max))
        .changed()
    {
        state.set_threshold(threshold);
    }
    ui.separator();

    ui.strong(format!("Groups  ({}/{})", state.visible.len(), state.grouped.len()));

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for group in &state.visible {
                let [r, g, b] = state.color_map.color_for(&group.label);
                ui.label(
                    RichText::new(format!("{}  (n={})", group.label, group.counts.len()))
                        .color(Color32::from_rgb(r, g, b)),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Export", |ui: &mut Ui| {
            if ui.button("Report…").clicked() {
                export_report_dialog(state);
                ui.close_menu();
            }
            if ui.button("Plot…").clicked() {
                export_plot_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} groups, {} visible",
            state.grouped.len(),
            state.visible.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Save dialogs
// ---------------------------------------------------------------------------

fn save_dialog(title: &str, file_name: &str, filters: &[(&str, &[&str])]) -> Option<PathBuf> {
    let mut dialog = rfd::FileDialog::new().set_title(title).set_file_name(file_name);
    for &(name, extensions) in filters {
        dialog = dialog.add_filter(name, extensions);
    }
    dialog.save_file()
}

/// Export the visible groups as a TSV, JSON or Parquet report.
pub fn export_report_dialog(state: &mut AppState) {
    let Some(path) = save_dialog(
        "Export grouped counts",
        &format!("{}_counts.tsv", state.gene),
        &[("TSV", &["tsv", "txt"][..]), ("JSON", &["json"][..]), ("Parquet", &["parquet", "pq"][..])],
    ) else {
        return;
    };

    state.status_message = match write_report(&path, &state.visible) {
        Ok(()) => None,
        Err(e) => {
            log::error!("Failed to export report: {e:#}");
            Some(format!("Error: {e:#}"))
        }
    };
}

/// Export the visible groups as a PNG or SVG box plot.
pub fn export_plot_dialog(state: &mut AppState) {
    let Some(path) = save_dialog(
        "Export box plot",
        &format!("{}_boxplot.png", state.gene),
        &[("PNG", &["png"][..]), ("SVG", &["svg"][..])],
    ) else {
        return;
    };

    let options = PlotOptions::new(&state.gene, &state.group_column);
    state.status_message = match render_box_plot(&path, &state.visible, &options) {
        Ok(()) => None,
        Err(e) => {
            log::error!("Failed to export plot: {e:#}");
            Some(format!("Error: {e:#}"))
        }
    };
}
