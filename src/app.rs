use anyhow::anyhow;
use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct GtexViewerApp {
    pub state: AppState,
}

impl GtexViewerApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for GtexViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: threshold ----
        egui::SidePanel::left("threshold_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: statistics ----
        egui::TopBottomPanel::bottom("stats_panel")
            .default_height(180.0)
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::horizontal().show(ui, |ui| {
                    plot::stats_table(ui, &self.state);
                });
            });

        // ---- Central panel: box plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::box_plot(ui, &self.state);
        });
    }
}

/// Open the viewer window; blocks until it is closed.
pub fn run_viewer(state: AppState) -> anyhow::Result<()> {
    let title = format!("{} read counts by {}", state.gene, state.group_column);
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(|_cc| Ok(Box::new(GtexViewerApp::new(state)))),
    )
    .map_err(|e| anyhow!("viewer failed: {e}"))
}
