use eframe::egui::{Color32, Stroke, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{BoxElem, BoxPlot, BoxSpread, Plot, PlotPoints, Points};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Box plot (central panel)
// ---------------------------------------------------------------------------

/// Render one box per visible group; x positions are the group ordinals.
pub fn box_plot(ui: &mut Ui, state: &AppState) {
    if state.visible.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No group passes the current threshold");
        });
        return;
    }

    let labels: Vec<String> = state.visible.iter().map(|g| g.label.clone()).collect();

    Plot::new("box_plot")
        .x_axis_label(state.group_column.clone())
        .y_axis_label("Gene Read Counts")
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (i, (group, summary)) in state.visible.iter().zip(&state.summaries).enumerate() {
                let Some(s) = summary else {
                    continue;
                };

                let [r, g, b] = state.color_map.color_for(&group.label);
                let color = Color32::from_rgb(r, g, b);
                let x = i as f64;

                let elem = BoxElem::new(
                    x,
                    BoxSpread::new(s.lower_whisker, s.q1, s.median, s.q3, s.upper_whisker),
                )
                .name(&group.label)
                .fill(color.gamma_multiply(0.5))
                .stroke(Stroke::new(1.5, color))
                .box_width(0.5)
                .whisker_width(0.25);

                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(&group.label));

                if !s.outliers.is_empty() {
                    let points: PlotPoints = s.outliers.iter().map(|&y| [x, y]).collect();
                    plot_ui.points(Points::new(points).color(color).radius(2.5));
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Statistics table (bottom panel)
// ---------------------------------------------------------------------------

/// One row per visible group with its count and box summary.
pub fn stats_table(ui: &mut Ui, state: &AppState) {
    let headers = ["group", "n", "mean", "median", "q1", "q3", "min", "max"];

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto().at_least(120.0))
        .columns(Column::auto().at_least(50.0), headers.len() - 1)
        .header(20.0, |mut header| {
            for name in headers {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|mut body| {
            for (group, summary) in state.visible.iter().zip(&state.summaries) {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(&group.label);
                    });
                    row.col(|ui| {
                        ui.label(group.counts.len().to_string());
                    });

                    let cells = match summary {
                        Some(s) => [s.mean, s.median, s.q1, s.q3, s.min, s.max].map(|v| v.to_string()),
                        None => ["0".to_string(), String::new(), String::new(), String::new(), String::new(), String::new()],
                    };
                    for cell in cells {
                        row.col(|ui| {
                            ui.label(cell);
                        });
                    }
                });
            }
        });
}
